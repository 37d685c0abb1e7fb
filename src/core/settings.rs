use std::sync::OnceLock;

/// Formatting and attachment settings threaded through document building
/// and XML serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Decimal places for monetary amounts.
    pub amount_decimals: u32,
    /// Decimal places for unit prices (gross/net price charge amounts).
    pub unit_amount_decimals: u32,
    /// Decimal places for quantities.
    pub quantity_decimals: u32,
    /// Decimal places for percentages.
    pub percent_decimals: u32,
    /// Decimal places for measures.
    pub measure_decimals: u32,
    /// MIME types accepted for binary attachments of referenced documents.
    pub allowed_mime_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            amount_decimals: 2,
            unit_amount_decimals: 2,
            quantity_decimals: 2,
            percent_decimals: 2,
            measure_decimals: 2,
            allowed_mime_types: [
                "application/pdf",
                "image/png",
                "image/jpeg",
                "text/csv",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.oasis.opendocument.spreadsheet",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

static GLOBAL: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Process-wide settings. Falls back to [`Settings::default`] when
    /// [`Settings::install`] was never called.
    pub fn global() -> &'static Settings {
        GLOBAL.get_or_init(Settings::default)
    }

    /// Install process-wide settings. Only the first call wins; later calls
    /// hand the rejected value back.
    pub fn install(settings: Settings) -> Result<(), Settings> {
        GLOBAL.set(settings)
    }

    /// Whether `mime` is on the attachment allow-list.
    pub fn is_mime_type_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
    }
}
