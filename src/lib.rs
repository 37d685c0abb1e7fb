//! # orderx
//!
//! Order-X purchase orders (order, order change, order response) in the
//! UN/CEFACT `SCRDMCCBDACIOMessageStructure` syntax: profile detection,
//! cursor-based reading, building, and PDF/A-3 hybrid documents.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use orderx::core::{DocumentSummation, OrderTypeCode, PartyRole, Profile};
//! use orderx::xml::{OrderDocumentBuilder, OrderDocumentReader};
//! use rust_decimal_macros::dec;
//!
//! let mut builder = OrderDocumentBuilder::new(Profile::Comfort);
//! builder
//!     .set_document_information("PO-1001", OrderTypeCode::Order, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), "EUR")
//!     .set_document_party(PartyRole::Seller, "ACME GmbH", None, None)
//!     .set_document_party(PartyRole::Buyer, "Kunde AG", None, None)
//!     .set_document_summation(&DocumentSummation { grand_total: dec!(150), ..Default::default() });
//! builder
//!     .add_new_position("1")
//!     .set_product_details_name("Consulting")
//!     .set_quantity(dec!(1), "HUR");
//! assert!(builder.validate().is_empty());
//!
//! let xml = builder.get_content().unwrap();
//! let mut reader = OrderDocumentReader::read_content(&xml).unwrap();
//! assert_eq!(reader.profile(), Profile::Comfort);
//! assert!(reader.first_document_position());
//! assert_eq!(reader.get_document_position_general_details().unwrap().line_id, "1");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, node factory, profiles, cursors, validation |
//! | `xml` (default) | Profile resolver, XML reader and builder |
//! | `pdf` | PDF/A-3 embedding and extraction |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "core")]
pub use crate::core::{OrderDocument, OrderError, Profile};
