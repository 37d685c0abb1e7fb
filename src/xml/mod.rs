//! Order-X XML reading and writing.
//!
//! Implements the UN/CEFACT `SCRDMCCBDACIOMessageStructure` syntax used by
//! all three Order-X profiles.
//!
//! # Entry points
//!
//! - [`resolve`] sniffs the profile of a raw document
//! - [`OrderDocumentReader`] reads a document and navigates it with cursors
//! - [`OrderDocumentBuilder`] authors a document and serializes it
//! - [`to_xml`] / [`from_xml`] map between the model and XML directly
//!
//! # Example
//!
//! ```no_run
//! use orderx::xml::OrderDocumentReader;
//!
//! let mut reader = OrderDocumentReader::read_file("order-x.xml").unwrap();
//! let info = reader.get_document_information().unwrap();
//! println!("{} {}", info.document_no, info.currency);
//! while reader.next_document_position() {
//!     let pos = reader.get_document_position_general_details().unwrap();
//!     println!("position {}", pos.line_id);
//! }
//! ```

mod builder;
mod mapper;
mod reader;
mod resolver;
pub(crate) mod xml_utils;

pub use builder::{OrderDocumentBuilder, PositionBuilder};
pub use mapper::{from_xml, to_xml};
pub use reader::{OrderDocumentReader, PositionView};
pub use resolver::{resolve, resolve_profile_def, resolve_profile_id};

/// Local name of the Order-X root element.
pub const ROOT_ELEMENT: &str = "SCRDMCCBDACIOMessageStructure";

/// Namespace URIs of the Order-X message structure.
pub mod ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:SCRDMCCBDACIOMessageStructure:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:128";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:128";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:128";
}
