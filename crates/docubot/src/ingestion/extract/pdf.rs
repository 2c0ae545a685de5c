//! PDF extraction: page-ordered text plus embedded raster images

use lopdf::{Dictionary, Document, Object};

use crate::error::{Error, Result};
use crate::types::Segment;

use super::PendingImage;

/// Parse a PDF into per-page segments and pending images.
///
/// Pages are walked in file order via `lopdf`; each page contributes its
/// native text and the raster XObjects reachable from its resources, in
/// resource order. When `lopdf` cannot produce any page text at all, the
/// whole document falls back to `pdf-extract` under a single page.
pub(super) fn parse(
    data: &[u8],
    filename: &str,
) -> Result<(Vec<Segment>, Vec<PendingImage>)> {
    let doc = match Document::load_mem(data) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(%filename, error = %e, "lopdf failed to load PDF, trying whole-document fallback");
            return fallback(data, filename);
        }
    };

    let mut segments = Vec::new();
    let mut pending = Vec::new();

    for (page_no, page_id) in doc.get_pages() {
        let text = match doc.extract_text(&[page_no]) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(%filename, page = page_no, error = %e, "No text for page");
                String::new()
            }
        };

        let segment_idx = segments.len();
        segments.push(Segment::new(page_no, text));

        let mut image_index = 0u32;
        for (name, object) in page_xobjects(&doc, page_id) {
            let stream = match resolve_stream(&doc, object) {
                Some(stream) => stream,
                None => continue,
            };

            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            image_index += 1;
            match image_payload(stream) {
                Ok((ext, mime, bytes)) => pending.push(PendingImage::Ready {
                    segment: segment_idx,
                    image_index,
                    filename: format!("page_{}_img_{}.{}", page_no, image_index, ext),
                    mime,
                    bytes,
                }),
                Err(e) => {
                    tracing::debug!(
                        %filename,
                        page = page_no,
                        xobject = %name,
                        error = %e,
                        "Could not extract image bytes"
                    );
                    pending.push(PendingImage::Failed {
                        segment: segment_idx,
                        image_index,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    let no_text = segments.iter().all(|s| s.text.trim().is_empty());
    if segments.is_empty() || (no_text && pending.is_empty()) {
        return fallback(data, filename);
    }

    Ok((segments, pending))
}

/// Whole-document text via `pdf-extract`, as a single `Page 1:` segment
fn fallback(data: &[u8], filename: &str) -> Result<(Vec<Segment>, Vec<PendingImage>)> {
    let content = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::file_parse(filename, format!("PDF extraction failed: {}", e)))?;

    if content.trim().is_empty() {
        return Err(Error::file_parse(
            filename,
            "No text content could be extracted from PDF",
        ));
    }

    Ok((vec![Segment::new(1, content)], Vec::new()))
}

/// XObject entries reachable from a page's resources, direct dictionary
/// first and inherited resource dictionaries after, preserving each
/// dictionary's entry order
fn page_xobjects<'a>(doc: &'a Document, page_id: (u32, u16)) -> Vec<(String, &'a Object)> {
    let mut entries = Vec::new();
    let (direct, inherited) = match doc.get_page_resources(page_id) {
        Ok(resources) => resources,
        Err(_) => return entries,
    };

    let mut dicts: Vec<&Dictionary> = Vec::new();
    if let Some(dict) = direct {
        dicts.push(dict);
    }
    for id in inherited {
        if let Ok(dict) = doc.get_object(id).and_then(|o| o.as_dict()) {
            dicts.push(dict);
        }
    }

    for dict in dicts {
        let xobjects = match dict.get(b"XObject") {
            Ok(Object::Dictionary(x)) => x,
            Ok(Object::Reference(id)) => match doc.get_object(*id).and_then(|o| o.as_dict()) {
                Ok(x) => x,
                Err(_) => continue,
            },
            _ => continue,
        };

        for (name, object) in xobjects.iter() {
            entries.push((String::from_utf8_lossy(name).to_string(), object));
        }
    }

    entries
}

/// Follow a reference (if any) down to the stream object
fn resolve_stream<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a lopdf::Stream> {
    match object {
        Object::Stream(stream) => Some(stream),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_stream().ok(),
        _ => None,
    }
}

/// Extract a transportable image payload from an image XObject.
///
/// DCTDecode streams are JPEG files as-is. Other encodings (FlateDecode
/// pixel buffers, JBIG2, CCITT) would need re-encoding to become a valid
/// image file, so they surface as extraction failures.
fn image_payload(stream: &lopdf::Stream) -> Result<(&'static str, String, Vec<u8>)> {
    let filter = primary_filter(&stream.dict);

    match filter.as_deref() {
        Some("DCTDecode") => Ok((
            "jpg",
            "image/jpeg".to_string(),
            stream.content.clone(),
        )),
        Some(other) => Err(Error::file_parse(
            "embedded image",
            format!("unsupported image encoding: {}", other),
        )),
        None => Err(Error::file_parse(
            "embedded image",
            "image stream has no filter",
        )),
    }
}

/// First filter name applied to a stream (filters may be a name or array)
fn primary_filter(dict: &Dictionary) -> Option<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).to_string()),
        Ok(Object::Array(filters)) => filters
            .first()
            .and_then(|f| f.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lopdf::{dictionary, Document, Object, Stream};

    use crate::ingestion::extract::test_support::ScriptedCaptioner;
    use crate::ingestion::extract::DocumentExtractor;
    use crate::types::{Format, SourceDocument};

    /// Build a minimal two-page PDF with one text line per page
    fn two_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = Vec::new();
        for line in ["First page text", "Second page text"] {
            let content = format!("BT /F1 24 Tf 100 700 Td ({}) Tj ET", line);
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.into_bytes(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|&id| id.into()).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_two_pages_no_images_yields_two_headers() {
        let captioner = Arc::new(ScriptedCaptioner::new());
        let extractor = DocumentExtractor::new(captioner.clone(), 2);
        let doc = SourceDocument::new("two_pages.pdf", Format::Pdf, two_page_pdf());

        let extracted = extractor.extract(&doc).await.unwrap();
        assert_eq!(extracted.segments.len(), 2);
        assert_eq!(extracted.image_count(), 0);
        assert_eq!(captioner.call_count(), 0);

        let rendered = extracted.render();
        assert!(rendered.contains("Page 1:\n"));
        assert!(rendered.contains("Page 2:\n"));
        assert!(rendered.contains("First page text"));
        assert!(rendered.contains("Second page text"));
        // Page order preserved
        assert!(rendered.find("Page 1:").unwrap() < rendered.find("Page 2:").unwrap());
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_parse() {
        let extractor = DocumentExtractor::new(Arc::new(ScriptedCaptioner::new()), 1);
        let doc = SourceDocument::new("bad.pdf", Format::Pdf, b"not a pdf".to_vec());
        assert!(extractor.extract(&doc).await.is_err());
    }
}
