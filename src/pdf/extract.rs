use std::path::Path;

use lopdf::{Dictionary, Document, Object, Stream};

use crate::core::{OrderError, Profile};
use crate::xml::{OrderDocumentReader, resolve};

/// Reads the Order-X XML embedded in a hybrid PDF.
pub struct OrderDocumentPdfReader;

impl OrderDocumentPdfReader {
    /// Extract the embedded XML from the PDF at `path` and read it.
    pub fn read_and_guess_from_file(path: impl AsRef<Path>) -> Result<OrderDocumentReader, OrderError> {
        let pdf = std::fs::read(path)?;
        Self::read_and_guess_from_content(&pdf)
    }

    /// Extract the embedded XML from in-memory PDF bytes and read it.
    pub fn read_and_guess_from_content(pdf: &[u8]) -> Result<OrderDocumentReader, OrderError> {
        let xml = Self::extract_xml_from_content(pdf)?;
        OrderDocumentReader::read_bytes(&xml)
    }

    pub fn extract_xml_from_file(path: impl AsRef<Path>) -> Result<Vec<u8>, OrderError> {
        let pdf = std::fs::read(path)?;
        Self::extract_xml_from_content(&pdf)
    }

    /// Raw bytes of the Order-X attachment.
    ///
    /// Attachments named like a profile attachment file (`order-x.xml`) win.
    /// Failing that, an attachment typed `text/xml` / `application/xml` is
    /// taken only when its payload resolves to an Order-X profile. In both
    /// passes the `EmbeddedFiles` name tree is searched before the catalog's
    /// `AF` array.
    pub fn extract_xml_from_content(pdf: &[u8]) -> Result<Vec<u8>, OrderError> {
        let doc = Document::load_mem(pdf)
            .map_err(|e| OrderError::Pdf(format!("failed to load PDF: {e}")))?;

        let found = find_attachment(&doc, &by_file_name).or_else(|| find_attachment(&doc, &by_xml_content));
        match found {
            Some(bytes) => {
                log::debug!("found Order-X attachment ({} bytes)", bytes.len());
                Ok(bytes)
            }
            None => Err(OrderError::NoValidAttachmentFoundInPdf),
        }
    }
}

/// Decides whether an embedded file (name, stream, payload) is the order.
type Matcher = dyn Fn(&str, &Stream, &[u8]) -> bool;

fn find_attachment(doc: &Document, matcher: &Matcher) -> Option<Vec<u8>> {
    find_via_names(doc, matcher).or_else(|| find_via_af(doc, matcher))
}

fn find_via_names(doc: &Document, matcher: &Matcher) -> Option<Vec<u8>> {
    let catalog = doc.catalog().ok()?;
    let names = resolve_dict(doc, catalog.get(b"Names").ok()?)?;
    let tree = resolve_dict(doc, names.get(b"EmbeddedFiles").ok()?)?;
    search_name_tree(doc, tree, matcher, 0)
}

/// Walk a name tree node; `Kids` are followed to a bounded depth.
fn search_name_tree(doc: &Document, node: &Dictionary, matcher: &Matcher, depth: usize) -> Option<Vec<u8>> {
    if let Ok(Object::Array(pairs)) = node.get(b"Names") {
        for pair in pairs.chunks(2) {
            let [name, spec] = pair else { continue };
            let name = obj_to_string(name).unwrap_or_default();
            let found = resolve_dict(doc, spec).and_then(|spec| matching_attachment(doc, spec, &name, matcher));
            if found.is_some() {
                return found;
            }
        }
    }
    if depth >= 16 {
        log::warn!("EmbeddedFiles name tree deeper than 16 levels, stopping");
        return None;
    }
    if let Ok(Object::Array(kids)) = node.get(b"Kids") {
        for kid in kids {
            if let Some(found) = resolve_dict(doc, kid).and_then(|k| search_name_tree(doc, k, matcher, depth + 1)) {
                return Some(found);
            }
        }
    }
    None
}

fn find_via_af(doc: &Document, matcher: &Matcher) -> Option<Vec<u8>> {
    let catalog = doc.catalog().ok()?;
    let af = resolve_obj(doc, catalog.get(b"AF").ok()?)?.as_array().ok()?;
    af.iter().find_map(|obj| {
        let spec = resolve_dict(doc, obj)?;
        let name = spec
            .get(b"UF")
            .or_else(|_| spec.get(b"F"))
            .ok()
            .and_then(obj_to_string)
            .unwrap_or_default();
        matching_attachment(doc, spec, &name, matcher)
    })
}

fn is_order_x_filename(name: &str) -> bool {
    Profile::ALL
        .iter()
        .any(|p| p.descriptor().attachmentfilename.eq_ignore_ascii_case(name.trim()))
}

fn is_xml_subtype(subtype: &[u8]) -> bool {
    matches!(
        subtype,
        b"text/xml" | b"application/xml" | b"text#2Fxml" | b"application#2Fxml"
    )
}

fn by_file_name(name: &str, _stream: &Stream, _payload: &[u8]) -> bool {
    is_order_x_filename(name)
}

fn by_xml_content(name: &str, stream: &Stream, payload: &[u8]) -> bool {
    let typed_xml = stream
        .dict
        .get(b"Subtype")
        .and_then(Object::as_name)
        .is_ok_and(is_xml_subtype);
    if !typed_xml {
        return false;
    }
    let resolves = std::str::from_utf8(payload)
        .map(|xml| resolve(xml.trim_start_matches('\u{feff}')).is_ok())
        .unwrap_or(false);
    if !resolves {
        log::debug!("skipping XML attachment '{name}': not an Order-X document");
    }
    resolves
}

/// Payload of a file spec if `matcher` accepts it.
fn matching_attachment(doc: &Document, spec: &Dictionary, name: &str, matcher: &Matcher) -> Option<Vec<u8>> {
    let ef = resolve_dict(doc, spec.get(b"EF").ok()?)?;
    let stream = resolve_obj(doc, ef.get(b"F").or_else(|_| ef.get(b"UF")).ok()?)?
        .as_stream()
        .ok()?;
    // Streams without a Filter fail to decompress; use the raw content then.
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    if content.is_empty() {
        log::warn!("attachment '{name}' has no payload");
        return None;
    }
    matcher(name, stream, &content).then_some(content)
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn resolve_obj<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn obj_to_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => decode_text_string(bytes),
        _ => None,
    }
}

/// PDF text strings are PDFDocEncoding/ASCII or UTF-16BE with a BOM.
fn decode_text_string(bytes: &[u8]) -> Option<String> {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => String::from_utf8(bytes.to_vec()).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_and_subtype_matching() {
        assert!(is_order_x_filename("order-x.xml"));
        assert!(is_order_x_filename("ORDER-X.XML"));
        assert!(!is_order_x_filename("factur-x.xml"));
        assert!(is_xml_subtype(b"text/xml"));
        assert!(is_xml_subtype(b"application/xml"));
        assert!(!is_xml_subtype(b"application/pdf"));
    }

    #[test]
    fn utf16_names_decode() {
        let bytes = [0xFE, 0xFF, 0x00, b'o', 0x00, b'x'];
        assert_eq!(decode_text_string(&bytes).as_deref(), Some("ox"));
        assert_eq!(decode_text_string(b"order-x.xml").as_deref(), Some("order-x.xml"));
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        assert!(matches!(
            OrderDocumentPdfReader::extract_xml_from_content(b"not a pdf"),
            Err(OrderError::Pdf(_))
        ));
    }
}
