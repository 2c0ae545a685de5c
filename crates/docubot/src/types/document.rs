//! Document, format, and extracted-text types

use serde::{Deserialize, Serialize};

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Slide deck (.ppt / .pptx)
    Slides,
}

impl Format {
    /// Detect format from a file extension.
    ///
    /// Returns `None` for anything outside the supported set; callers reject
    /// such uploads before extraction is attempted.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" => Some(Self::Txt),
            "ppt" | "pptx" => Some(Self::Slides),
            _ => None,
        }
    }

    /// Detect format from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next().unwrap_or("");
        Self::from_extension(ext)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Txt => "Text File",
            Self::Slides => "Slide Deck (.ppt/.pptx)",
        }
    }

    /// Header label for a segment of this format ("Page" or "Slide")
    pub fn segment_label(&self) -> &'static str {
        match self {
            Self::Slides => "Slide",
            _ => "Page",
        }
    }
}

/// A document handed to one ingestion call; transient
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Filename as uploaded
    pub filename: String,
    /// Upload format
    pub format: Format,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, format: Format, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            format,
            bytes,
        }
    }
}

/// Outcome of one embedded image: a caption, or a visible failure note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageNote {
    /// Image was captioned; carries the derived filename and caption text
    Captioned { filename: String, caption: String },
    /// Image extraction or captioning failed; carries the 1-based image
    /// index within the segment and the error message
    Failed { image_index: u32, error: String },
}

/// One page or slide of extracted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based page/slide index
    pub index: u32,
    /// Native text of the page/slide
    pub text: String,
    /// Image notes in encounter order
    pub images: Vec<ImageNote>,
}

impl Segment {
    pub fn new(index: u32, text: String) -> Self {
        Self {
            index,
            text,
            images: Vec::new(),
        }
    }
}

/// Ordered extraction output for one document.
///
/// Segment order matches the source document's page/slide order; image notes
/// are ordered as encountered within each segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Source format (decides the "Page"/"Slide" header label)
    pub format: Format,
    /// Ordered segments
    pub segments: Vec<Segment>,
}

impl ExtractedText {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            segments: Vec::new(),
        }
    }

    /// Render the linear text stream handed to the chunker.
    ///
    /// Each segment is prefixed with its index header, then its native text,
    /// then its image markers in order:
    ///
    /// ```text
    /// Page 1:
    /// <native text>
    ///
    /// [Image: page_1_img_1.png]
    /// Description: <caption>
    ///
    /// [Image Extraction Failed: Page 1, Image 2]
    /// Error: <message>
    /// Page 2:
    /// ...
    /// ```
    pub fn render(&self) -> String {
        let label = self.format.segment_label();
        let mut out = String::new();

        for segment in &self.segments {
            out.push_str(&format!("{} {}:\n{}\n", label, segment.index, segment.text));

            for note in &segment.images {
                match note {
                    ImageNote::Captioned { filename, caption } => {
                        out.push_str(&format!(
                            "\n[Image: {}]\nDescription: {}\n",
                            filename, caption
                        ));
                    }
                    ImageNote::Failed { image_index, error } => {
                        out.push_str(&format!(
                            "\n[Image Extraction Failed: {} {}, Image {}]\nError: {}\n",
                            label, segment.index, image_index, error
                        ));
                    }
                }
            }
        }

        out
    }

    /// Total number of image notes across all segments
    pub fn image_count(&self) -> usize {
        self.segments.iter().map(|s| s.images.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("pdf"), Some(Format::Pdf));
        assert_eq!(Format::from_extension("PDF"), Some(Format::Pdf));
        assert_eq!(Format::from_extension("pptx"), Some(Format::Slides));
        assert_eq!(Format::from_extension("ppt"), Some(Format::Slides));
        assert_eq!(Format::from_extension("exe"), None);
        assert_eq!(Format::from_filename("report.v2.docx"), Some(Format::Docx));
    }

    #[test]
    fn test_render_headers_and_markers() {
        let mut extracted = ExtractedText::new(Format::Pdf);
        let mut page1 = Segment::new(1, "First page text.\n".to_string());
        page1.images.push(ImageNote::Captioned {
            filename: "page_1_img_1.png".to_string(),
            caption: "A bar chart.".to_string(),
        });
        page1.images.push(ImageNote::Failed {
            image_index: 2,
            error: "unsupported encoding".to_string(),
        });
        extracted.segments.push(page1);
        extracted.segments.push(Segment::new(2, "Second page.\n".to_string()));

        let rendered = extracted.render();
        assert!(rendered.starts_with("Page 1:\nFirst page text.\n"));
        assert!(rendered.contains("[Image: page_1_img_1.png]\nDescription: A bar chart."));
        assert!(rendered.contains("[Image Extraction Failed: Page 1, Image 2]\nError: unsupported encoding"));
        assert!(rendered.contains("Page 2:\nSecond page.\n"));
    }

    #[test]
    fn test_render_uses_slide_label() {
        let mut extracted = ExtractedText::new(Format::Slides);
        extracted.segments.push(Segment::new(1, "Title slide\n".to_string()));
        assert!(extracted.render().starts_with("Slide 1:\n"));
    }
}
