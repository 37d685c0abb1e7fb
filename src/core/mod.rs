//! Order document model, node factory, profiles and validation.
//!
//! This module carries everything that does not depend on a wire format:
//! the Order-X document tree, the null-propagating node constructors, the
//! profile table, cursor navigation and the validator collaborator.

pub mod cursor;
mod error;
pub mod factory;
pub mod mime;
pub mod nodes;
mod profile;
mod records;
mod settings;
mod types;
mod validation;

pub use cursor::Cursor;
pub use error::*;
pub use profile::*;
pub use records::*;
pub use settings::*;
pub use types::*;
pub use validation::*;
