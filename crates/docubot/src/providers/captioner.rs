//! Image captioning provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for describing an image via a multimodal model.
///
/// A failed call returns `Error::Caption`; the extractor converts that into
/// a visible in-text failure marker instead of aborting the document.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Describe the image. `mime` is the image content type used for
    /// transport encoding (e.g. "image/png").
    async fn caption(&self, image_bytes: &[u8], mime: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
