use chrono::NaiveDateTime;

use crate::core::{OrderDocument, OrderTypeCode, PartyRole};

/// Document information derived from an order for the PDF Info dictionary
/// and the XMP packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfMetadata {
    pub author: String,
    pub keywords: String,
    pub title: String,
    pub subject: String,
    /// Creation and modification date; the order's issue date.
    pub created: Option<NaiveDateTime>,
}

impl PdfMetadata {
    pub fn from_document(document: &OrderDocument) -> Self {
        let seller = document
            .party(PartyRole::Seller)
            .map(|p| p.name.value.as_str())
            .unwrap_or_default();
        let order_id = document
            .header
            .id
            .as_ref()
            .map(|i| i.value.as_str())
            .unwrap_or_default();
        let type_name = document
            .header
            .type_code
            .as_ref()
            .map_or(OrderTypeCode::Order.display_name(), |c| {
                OrderTypeCode::display_name_for(&c.value)
            });
        let created = document
            .header
            .issue_date_time
            .as_ref()
            .and_then(|d| match d.to_date_time() {
                Ok(dt) => Some(dt),
                Err(e) => {
                    log::warn!("issue date not usable for PDF metadata: {e}");
                    None
                }
            });
        let dated = created
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Self {
            author: seller.to_string(),
            keywords: format!("{type_name}, Order-X"),
            title: format!("{seller}, {type_name} {order_id}"),
            subject: format!("Order-X {type_name} {order_id} dated {dated} issued by {seller}"),
            created,
        }
    }

    /// Date in PDF notation (`D:YYYYMMDDHHmmSS`).
    pub fn pdf_date(&self) -> Option<String> {
        self.created
            .map(|d| d.format("D:%Y%m%d%H%M%S").to_string())
    }

    /// Date in XMP notation (ISO 8601 without offset).
    pub fn xmp_date(&self) -> Option<String> {
        self.created
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}
