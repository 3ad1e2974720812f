//! Document-level facts read from a PDF source during encoding

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Maximum depth followed when resolving inherited page attributes
const MAX_PARENT_DEPTH: usize = 32;

/// Facts recorded in the container metadata for PDF sources
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfInfo {
    /// First page width and height in points, rotation applied
    pub first_page_pt: Option<(f32, f32)>,
    /// `/Author` from the info dictionary, empty when absent
    pub author: String,
    /// `/CreationDate` from the info dictionary, verbatim, empty when absent
    pub creation_date: String,
    pub page_count: usize,
}

/// Parse a PDF held in memory and collect its first-page size and info fields
pub fn read_pdf_info(bytes: &[u8]) -> Result<PdfInfo, lopdf::Error> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let first_page_pt = pages
        .values()
        .next()
        .and_then(|&page_id| page_size_pt(&doc, page_id));

    let info = info_dictionary(&doc);
    let author = info
        .and_then(|dict| text_entry(&doc, dict, b"Author"))
        .unwrap_or_default();
    let creation_date = info
        .and_then(|dict| text_entry(&doc, dict, b"CreationDate"))
        .unwrap_or_default();

    Ok(PdfInfo {
        first_page_pt,
        author,
        creation_date,
        page_count: pages.len(),
    })
}

/// Page size from the (possibly inherited) MediaBox, swapped for 90/270 rotation
fn page_size_pt(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?;
    let values = resolve(doc, media_box).as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut coords = [0.0f32; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = resolve(doc, value).as_float().ok()?;
    }
    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();

    let rotation = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj).as_i64().ok())
        .unwrap_or(0);

    if rotation.rem_euclid(180) == 90 {
        Some((height, width))
    } else {
        Some((width, height))
    }
}

/// Look up a page attribute, walking `/Parent` links for inheritable keys
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info).as_dict().ok()
}

fn text_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = resolve(doc, dict.get(key).ok()?);
    match value {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, UTF-8 otherwise
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf16_text_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x6E, 0x00, 0x6E];
        assert_eq!(decode_text_string(&bytes), "Ann");
    }

    #[test]
    fn test_decode_plain_text_string() {
        assert_eq!(decode_text_string(b"D:20240101120000"), "D:20240101120000");
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        assert!(read_pdf_info(b"not a pdf").is_err());
    }
}
