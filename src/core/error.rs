use thiserror::Error;

/// Errors that can occur while resolving, reading, building or embedding
/// Order-X documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrderError {
    /// The XML root element or its namespace is not the Order-X message structure.
    #[error("the XML does not match the requirements for the expected syntax")]
    UnknownXmlContent,

    /// The guideline URN or numeric profile id is not in the profile table.
    #[error("{0}")]
    UnknownProfile(String),

    /// A cursor getter was called while the cursor is unset or past the end.
    #[error("cursor for {collection} is out of range (index {index:?}, {len} element(s))")]
    OutOfRange {
        /// Name of the repeating group the cursor walks.
        collection: &'static str,
        /// Current cursor index (`None` when unset).
        index: Option<usize>,
        /// Number of elements in the collection.
        len: usize,
    },

    /// The date/time format code is not one of 101, 102, 201, 202, 203, 204.
    #[error("unknown date format code: {0}")]
    UnknownDateFormat(String),

    /// The date/time value does not match its (known) format code.
    #[error("invalid date '{value}' for format {format}: {reason}")]
    InvalidDate {
        /// The date string as found in the document.
        value: String,
        /// The format code it was declared with.
        format: String,
        /// Parser message from chrono.
        reason: String,
    },

    /// The detected MIME type of an attachment is not on the allow-list.
    #[error("MIME type not supported: {0}")]
    MimeTypeNotSupported(String),

    /// The PDF does not carry a recognizable Order-X XML attachment.
    #[error("no valid Order-X attachment found in PDF")]
    NoValidAttachmentFoundInPdf,

    /// Filesystem error while reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// PDF loading, modification or saving error.
    #[error("PDF error: {0}")]
    Pdf(String),
}

impl OrderError {
    pub(crate) fn unknown_profile_content() -> Self {
        Self::UnknownProfile("cannot determine the profile by the given content".into())
    }

    pub(crate) fn unknown_profile_id(id: impl std::fmt::Display) -> Self {
        Self::UnknownProfile(format!("cannot determine the profile for the given id {id}"))
    }
}

/// A single validation finding with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending field (e.g. "positions[0].product.name").
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Rule identifier if applicable (e.g. "OX-03").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
