//! DOCX extraction: paragraph text plus embedded media images
//!
//! DOCX has no intrinsic pagination, so the whole document forms a single
//! `Page 1:` segment. Text comes from the paragraph/run tree; images come
//! from the OOXML package's `word/media/` parts in numeric order.

use std::io::Read;

use crate::error::{Error, Result};
use crate::types::Segment;

use super::{part_number, PendingImage};

pub(super) fn parse(
    data: &[u8],
    filename: &str,
) -> Result<(Vec<Segment>, Vec<PendingImage>)> {
    let doc = docx_rs::read_docx(data)
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut content = String::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            content.push_str(&t.text);
                        }
                    }
                }
            }
            content.push('\n');
        }
    }

    let segments = vec![Segment::new(1, content)];
    let pending = media_images(data, filename)?;

    Ok((segments, pending))
}

/// Enumerate `word/media/*` image parts in numeric order
fn media_images(data: &[u8], filename: &str) -> Result<Vec<PendingImage>> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("word/media/"))
        .map(|s| s.to_string())
        .collect();
    names.sort_by_key(|name| part_number(name.rsplit('/').next().unwrap_or(name)));

    let mut pending = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let image_index = i as u32 + 1;
        let ext = name.rsplit('.').next().unwrap_or("bin").to_lowercase();
        let mime = mime_guess::from_path(name).first_or_octet_stream().to_string();

        match read_part(&mut archive, name) {
            Ok(bytes) => pending.push(PendingImage::Ready {
                segment: 0,
                image_index,
                filename: format!("page_1_img_{}.{}", image_index, ext),
                mime,
                bytes,
            }),
            Err(e) => pending.push(PendingImage::Failed {
                segment: 0,
                image_index,
                error: e.to_string(),
            }),
        }
    }

    Ok(pending)
}

fn read_part(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| Error::file_parse(name, e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use docx_rs::{Docx, Paragraph, Run};

    use crate::ingestion::extract::test_support::ScriptedCaptioner;
    use crate::ingestion::extract::DocumentExtractor;
    use crate::types::{Format, SourceDocument};

    fn fixture_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    #[tokio::test]
    async fn test_docx_text_under_single_page_header() {
        let captioner = Arc::new(ScriptedCaptioner::new());
        let extractor = DocumentExtractor::new(captioner.clone(), 2);
        let doc = SourceDocument::new(
            "memo.docx",
            Format::Docx,
            fixture_docx(&["First paragraph.", "Second paragraph."]),
        );

        let extracted = extractor.extract(&doc).await.unwrap();
        assert_eq!(extracted.segments.len(), 1);
        assert_eq!(captioner.call_count(), 0);

        let rendered = extracted.render();
        assert!(rendered.starts_with("Page 1:\n"));
        assert!(rendered.contains("First paragraph."));
        assert!(rendered.contains("Second paragraph."));
        // Exactly one page header for a DOCX
        assert_eq!(rendered.matches("Page 1:").count(), 1);
        assert!(!rendered.contains("Page 2:"));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_parse() {
        let extractor = DocumentExtractor::new(Arc::new(ScriptedCaptioner::new()), 1);
        let doc = SourceDocument::new("bad.docx", Format::Docx, b"not a docx".to_vec());
        assert!(extractor.extract(&doc).await.is_err());
    }
}
