//! Plain-text extraction

use crate::error::{Error, Result};
use crate::types::Segment;

/// Decode bytes as UTF-8 text, verbatim, as a single segment.
///
/// Invalid UTF-8 is a decode error: silently transcoding user documents
/// would corrupt retrieval text.
pub(super) fn parse(data: &[u8]) -> Result<Vec<Segment>> {
    let content = std::str::from_utf8(data)
        .map_err(|e| Error::Decode(format!("Input is not valid UTF-8: {}", e)))?;

    Ok(vec![Segment::new(1, content.to_string())])
}
