//! Multi-format content extraction
//!
//! Each format module turns raw bytes into ordered segments plus a list of
//! pending embedded images; this module fans the images out to the
//! captioner with bounded, order-preserving concurrency and folds the
//! results back into the segments as in-text markers.

mod docx;
mod pdf;
mod slides;
mod text;

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::providers::Captioner;
use crate::types::{ExtractedText, Format, ImageNote, SourceDocument};

/// An embedded image discovered during parsing, waiting on captioning.
///
/// `segment` indexes into the parsed segment vec; `image_index` is the
/// 1-based position within that page/slide.
pub(crate) enum PendingImage {
    /// Image bytes were extracted and can be captioned
    Ready {
        segment: usize,
        image_index: u32,
        filename: String,
        mime: String,
        bytes: Vec<u8>,
    },
    /// Extraction itself failed; becomes a failure marker directly
    Failed {
        segment: usize,
        image_index: u32,
        error: String,
    },
}

/// Content extractor dispatching over the supported formats
pub struct DocumentExtractor {
    captioner: Arc<dyn Captioner>,
    caption_workers: usize,
}

impl DocumentExtractor {
    /// Create an extractor. `caption_workers` bounds how many captioning
    /// calls run concurrently within one document (min 1).
    pub fn new(captioner: Arc<dyn Captioner>, caption_workers: usize) -> Self {
        Self {
            captioner,
            caption_workers: caption_workers.max(1),
        }
    }

    /// Extract a document into ordered, captioned segments.
    ///
    /// A single damaged or uncaptionable image degrades to a visible
    /// failure marker; it never aborts the document.
    pub async fn extract(&self, doc: &SourceDocument) -> Result<ExtractedText> {
        let (segments, pending) = match doc.format {
            Format::Pdf => pdf::parse(&doc.bytes, &doc.filename)?,
            Format::Docx => docx::parse(&doc.bytes, &doc.filename)?,
            Format::Slides => slides::parse(&doc.bytes, &doc.filename)?,
            Format::Txt => (text::parse(&doc.bytes)?, Vec::new()),
        };

        let mut extracted = ExtractedText {
            format: doc.format,
            segments,
        };

        if !pending.is_empty() {
            tracing::info!(
                filename = %doc.filename,
                images = pending.len(),
                workers = self.caption_workers,
                "Captioning embedded images"
            );
            for (segment, note) in self.caption_all(pending).await {
                extracted.segments[segment].images.push(note);
            }
        }

        Ok(extracted)
    }

    /// Caption all pending images with bounded concurrency.
    ///
    /// `buffered` yields results in input order, so captions land in each
    /// segment in the order the images were encountered even though the
    /// calls overlap.
    async fn caption_all(&self, pending: Vec<PendingImage>) -> Vec<(usize, ImageNote)> {
        let captioner = &self.captioner;

        stream::iter(pending.into_iter().map(|image| async move {
            match image {
                PendingImage::Failed {
                    segment,
                    image_index,
                    error,
                } => (segment, ImageNote::Failed { image_index, error }),
                PendingImage::Ready {
                    segment,
                    image_index,
                    filename,
                    mime,
                    bytes,
                } => match captioner.caption(&bytes, &mime).await {
                    Ok(caption) => (segment, ImageNote::Captioned { filename, caption }),
                    Err(e) => {
                        tracing::warn!(
                            image = %filename,
                            error = %e,
                            "Captioning failed; emitting failure marker"
                        );
                        (
                            segment,
                            ImageNote::Failed {
                                image_index,
                                error: e.to_string(),
                            },
                        )
                    }
                },
            }
        }))
        .buffered(self.caption_workers)
        .collect()
        .await
    }
}

/// Trailing number in an OOXML part name ("slide12.xml" -> 12), for
/// numeric ordering of slides and media parts
pub(crate) fn part_number(name: &str) -> u32 {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
