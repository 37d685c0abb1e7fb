//! Order-X PDF/A-3 hybrid documents.
//!
//! [`OrderDocumentPdfReader`] pulls the embedded `order-x.xml` out of a PDF
//! and reads it; [`OrderDocumentPdfBuilder`] attaches a built order to an
//! existing PDF together with Info and XMP metadata.

mod embed;
mod extract;
mod metadata;
mod xmp;

pub use embed::OrderDocumentPdfBuilder;
pub use extract::OrderDocumentPdfReader;
pub use metadata::PdfMetadata;
pub use xmp::{FX_NAMESPACE, build_xmp};

/// Producer written to the PDF Info dictionary and XMP packet.
pub const PRODUCER: &str = concat!("orderx ", env!("CARGO_PKG_VERSION"));
