//! Slide deck extraction (.ppt/.pptx OOXML packages)
//!
//! Slides are walked in numeric order. Text-bearing runs (`<a:t>`) are
//! concatenated per slide; picture references (`<a:blip r:embed>`) are then
//! resolved through the slide's relationship part to `ppt/media/*` and
//! queued for captioning in slide order.

use std::collections::HashMap;
use std::io::Read;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::types::Segment;

use super::{part_number, PendingImage};

pub(super) fn parse(
    data: &[u8],
    filename: &str,
) -> Result<(Vec<Segment>, Vec<PendingImage>)> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    slide_names.sort_by_key(|name| part_number(name.trim_start_matches("ppt/slides/slide")));

    if slide_names.is_empty() {
        return Err(Error::file_parse(filename, "No slides found in package"));
    }

    let mut segments = Vec::new();
    let mut pending = Vec::new();

    for (slide_idx, slide_name) in slide_names.iter().enumerate() {
        let slide_number = slide_idx as u32 + 1;
        let xml = read_part_string(&mut archive, slide_name)?;

        let text = slide_text_from_xml(&xml);
        segments.push(Segment::new(slide_number, text));

        // Resolve picture references through the slide's rels part
        let embeds = blip_embeds(&xml);
        if embeds.is_empty() {
            continue;
        }

        let rels_name = rels_part_name(slide_name);
        let targets = match read_part_string(&mut archive, &rels_name) {
            Ok(rels_xml) => relationship_targets(&rels_xml),
            Err(e) => {
                tracing::debug!(slide = %slide_name, error = %e, "No relationships part");
                HashMap::new()
            }
        };

        for (i, rid) in embeds.iter().enumerate() {
            let image_index = i as u32 + 1;

            let target = match targets.get(rid) {
                Some(target) => normalize_target(target),
                None => {
                    pending.push(PendingImage::Failed {
                        segment: slide_idx,
                        image_index,
                        error: format!("relationship {} not found", rid),
                    });
                    continue;
                }
            };

            let ext = target.rsplit('.').next().unwrap_or("bin").to_lowercase();
            let mime = mime_guess::from_path(&target)
                .first_or_octet_stream()
                .to_string();

            match read_part_bytes(&mut archive, &target) {
                Ok(bytes) => pending.push(PendingImage::Ready {
                    segment: slide_idx,
                    image_index,
                    filename: format!("slide_{}_img_{}.{}", slide_number, image_index, ext),
                    mime,
                    bytes,
                }),
                Err(e) => pending.push(PendingImage::Failed {
                    segment: slide_idx,
                    image_index,
                    error: e.to_string(),
                }),
            }
        }
    }

    Ok((segments, pending))
}

/// Extract text runs from a slide's XML (`<a:t>` elements), with a line
/// break after each paragraph
fn slide_text_from_xml(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_text_element {
                    if let Ok(t) = e.unescape() {
                        text.push_str(&t);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"t" {
                    in_text_element = false;
                }
                if name.as_ref() == b"p" && !text.ends_with('\n') && !text.is_empty() {
                    text.push('\n');
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    text
}

/// Relationship ids of `<a:blip r:embed="...">` picture fills, in document
/// order
fn blip_embeds(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut embeds = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(_) => break,
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if e.local_name().as_ref() == b"blip" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref().ends_with(b"embed") {
                            embeds.push(String::from_utf8_lossy(&attr.value).to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    embeds
}

/// Map relationship ids to targets from a slide's `.rels` part, keeping
/// only image relationships
fn relationship_targets(xml: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(_) => break,
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut target = None;
                    let mut is_image = false;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                            b"Target" => {
                                target = Some(String::from_utf8_lossy(&attr.value).to_string())
                            }
                            b"Type" => {
                                is_image =
                                    String::from_utf8_lossy(&attr.value).ends_with("/image")
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(target), true) = (id, target, is_image) {
                        targets.insert(id, target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    targets
}

/// `.rels` part name for a slide part ("ppt/slides/slide1.xml" ->
/// "ppt/slides/_rels/slide1.xml.rels")
fn rels_part_name(slide_name: &str) -> String {
    match slide_name.rfind('/') {
        Some(pos) => format!(
            "{}/_rels/{}.rels",
            &slide_name[..pos],
            &slide_name[pos + 1..]
        ),
        None => format!("_rels/{}.rels", slide_name),
    }
}

/// Resolve a relationship target relative to `ppt/slides/` into a package
/// part name ("../media/image1.png" -> "ppt/media/image1.png")
fn normalize_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix("../") {
        format!("ppt/{}", stripped)
    } else if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("ppt/slides/{}", target)
    }
}

fn read_part_string(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| Error::file_parse(name, e.to_string()))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

fn read_part_bytes(
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
