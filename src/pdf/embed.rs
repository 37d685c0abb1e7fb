use std::path::Path;

use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::PRODUCER;
use super::metadata::PdfMetadata;
use super::xmp;
use crate::core::{OrderError, Profile};
use crate::xml::OrderDocumentBuilder;

fn pdf_err(context: &str) -> impl Fn(lopdf::Error) -> OrderError + '_ {
    move |e| OrderError::Pdf(format!("{context}: {e}"))
}

/// Merges a built order into an existing PDF, producing a PDF/A-3 hybrid
/// document with `order-x.xml` attached.
///
/// ```no_run
/// use orderx::core::Profile;
/// use orderx::pdf::OrderDocumentPdfBuilder;
/// use orderx::xml::OrderDocumentBuilder;
///
/// let builder = OrderDocumentBuilder::new(Profile::Basic);
/// // ... populate the builder ...
/// OrderDocumentPdfBuilder::from_file(&builder, "order.pdf")
///     .unwrap()
///     .save("order-x.pdf")
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct OrderDocumentPdfBuilder<'a> {
    builder: &'a OrderDocumentBuilder,
    pdf: Vec<u8>,
}

impl<'a> OrderDocumentPdfBuilder<'a> {
    /// Use the PDF at `path` as the visual part.
    pub fn from_file(builder: &'a OrderDocumentBuilder, path: impl AsRef<Path>) -> Result<Self, OrderError> {
        let pdf = std::fs::read(path)?;
        Ok(Self { builder, pdf })
    }

    /// Use in-memory PDF bytes as the visual part.
    pub fn from_bytes(builder: &'a OrderDocumentBuilder, pdf: impl Into<Vec<u8>>) -> Self {
        Self {
            builder,
            pdf: pdf.into(),
        }
    }

    /// Metadata derived from the order.
    pub fn metadata(&self) -> PdfMetadata {
        PdfMetadata::from_document(self.builder.document())
    }

    /// Build the hybrid PDF and return its bytes.
    pub fn generate(&self) -> Result<Vec<u8>, OrderError> {
        let xml = self.builder.get_content()?;
        let mut doc = Document::load_mem(&self.pdf).map_err(pdf_err("failed to load PDF"))?;

        embed_xml_into_document(&mut doc, xml.as_bytes(), self.builder.profile(), &self.metadata())?;

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| OrderError::Pdf(format!("failed to save PDF: {e}")))?;
        log::debug!(
            "embedded {} bytes of Order-X XML, PDF grew from {} to {} bytes",
            xml.len(),
            self.pdf.len(),
            output.len()
        );
        Ok(output)
    }

    /// Build the hybrid PDF and write it to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OrderError> {
        std::fs::write(path, self.generate()?)?;
        Ok(())
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn embed_xml_into_document(
    doc: &mut Document,
    xml_bytes: &[u8],
    profile: Profile,
    metadata: &PdfMetadata,
) -> Result<(), OrderError> {
    let filename = profile.descriptor().attachmentfilename;
    let date = metadata.pdf_date();

    let mut params = dictionary! {
        "Size" => Object::Integer(xml_bytes.len() as i64),
    };
    if let Some(d) = &date {
        params.set("ModDate", Object::string_literal(d.as_str()));
    }
    let ef_stream = Stream::new(
        dictionary! {
            "Type" => "EmbeddedFile",
            "Subtype" => Object::Name(b"text/xml".to_vec()),
            "Params" => params,
        },
        xml_bytes.to_vec(),
    );
    let ef_stream_id = doc.add_object(ef_stream);

    let filespec = dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal(filename),
        "UF" => Object::string_literal(filename),
        "Desc" => Object::string_literal("Order-X XML"),
        "AFRelationship" => Object::Name(b"Alternative".to_vec()),
        "EF" => dictionary! {
            "F" => Object::Reference(ef_stream_id),
            "UF" => Object::Reference(ef_stream_id),
        },
    };
    let filespec_id = doc.add_object(filespec);

    let ef_name_tree_id = doc.add_object(dictionary! {
        "Names" => Object::Array(vec![
            Object::string_literal(filename),
            Object::Reference(filespec_id),
        ]),
    });
    let names_id = doc.add_object(dictionary! {
        "EmbeddedFiles" => Object::Reference(ef_name_tree_id),
    });

    // XMP must stay uncompressed for PDF/A.
    let metadata_stream = Stream::new(
        dictionary! {
            "Type" => "Metadata",
            "Subtype" => "XML",
        },
        xmp::build_xmp(profile, metadata).into_bytes(),
    )
    .with_compression(false);
    let metadata_id = doc.add_object(metadata_stream);

    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
        "Creator" => Object::string_literal(PRODUCER),
        "Author" => text_string(&metadata.author),
        "Title" => text_string(&metadata.title),
        "Subject" => text_string(&metadata.subject),
        "Keywords" => text_string(&metadata.keywords),
    };
    if let Some(d) = &date {
        info.set("CreationDate", Object::string_literal(d.as_str()));
        info.set("ModDate", Object::string_literal(d.as_str()));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    let catalog = doc.catalog_mut().map_err(pdf_err("failed to get catalog"))?;
    catalog.set("AF", Object::Array(vec![Object::Reference(filespec_id)]));
    catalog.set("Names", Object::Reference(names_id));
    catalog.set("Metadata", Object::Reference(metadata_id));
    catalog.set("MarkInfo", dictionary! { "Marked" => Object::Boolean(true) });

    Ok(())
}
