//! Flat scalar records.
//!
//! The reader returns these from its getters and the builder accepts them
//! for groups with many fields, so the same shape travels both ways.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header facts of an order (`ExchangedDocument` + currency).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInformation {
    pub document_no: String,
    pub document_type_code: String,
    pub document_date: Option<NaiveDateTime>,
    pub currency: String,
    pub document_name: Option<String>,
    pub language: Option<String>,
    pub purpose_code: Option<String>,
    pub requested_response_type_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentNote {
    pub content: Vec<String>,
    pub content_code: Option<String>,
    pub subject_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyInfo {
    pub name: String,
    pub ids: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line_one: Option<String>,
    pub line_two: Option<String>,
    pub line_three: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub sub_division: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalOrganisation {
    pub id: Option<String>,
    pub id_scheme: Option<String>,
    pub trading_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub person_name: Option<String>,
    pub department_name: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub type_code: Option<String>,
}

/// Electronic address of a party (`URIUniversalCommunication`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectronicAddress {
    pub uri: String,
    pub uri_scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTermsInfo {
    pub code: String,
    pub description: Option<String>,
    pub function_code: Option<String>,
    pub location_id: Option<String>,
    pub location_name: Option<String>,
}

/// Single-valued referenced document (buyer order, quotation, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencedDocumentInfo {
    pub issuer_assigned_id: String,
    pub line_id: Option<String>,
    pub issue_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryAttachment {
    pub data: Vec<u8>,
    pub mime_code: String,
    pub filename: String,
}

/// `AdditionalReferencedDocument` (document or position level).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalReference {
    pub issuer_assigned_id: String,
    pub type_code: Option<String>,
    pub uri_id: Option<String>,
    pub line_id: Option<String>,
    pub name: Option<String>,
    pub reference_type_code: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub attachment: Option<BinaryAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcuringProjectInfo {
    pub id: String,
    pub name: Option<String>,
}

/// Requested delivery/despatch event; occurrence and period bounds are
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainEventInfo {
    pub occurrence: Option<NaiveDateTime>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMeansInfo {
    pub type_code: String,
    pub information: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxInfo {
    pub category_code: String,
    pub type_code: Option<String>,
    pub basis_amount: Option<Decimal>,
    pub calculated_amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub exemption_reason: Option<String>,
    pub exemption_reason_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowanceChargeInfo {
    pub actual_amount: Decimal,
    pub is_charge: bool,
    pub calculation_percent: Option<Decimal>,
    pub basis_amount: Option<Decimal>,
    pub basis_quantity: Option<Decimal>,
    pub basis_quantity_unit: Option<String>,
    pub sequence: Option<Decimal>,
    pub reason_code: Option<String>,
    pub reason: Option<String>,
    pub tax_category_code: Option<String>,
    pub tax_type_code: Option<String>,
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogisticsServiceChargeInfo {
    pub description: String,
    pub amount: Decimal,
    pub tax_category_code: Option<String>,
    pub tax_type_code: Option<String>,
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTermInfo {
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountingAccountInfo {
    pub id: String,
    pub type_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummation {
    pub line_total: Option<Decimal>,
    pub charge_total: Option<Decimal>,
    pub allowance_total: Option<Decimal>,
    pub tax_basis_total: Option<Decimal>,
    pub tax_total: Option<Decimal>,
    pub grand_total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionGeneralDetails {
    pub line_id: String,
    pub status_code: Option<String>,
    pub status_reason_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub description: Option<String>,
    pub seller_assigned_id: Option<String>,
    pub buyer_assigned_id: Option<String>,
    pub global_id: Option<String>,
    pub global_id_scheme: Option<String>,
    pub industry_assigned_id: Option<String>,
    pub model_id: Option<String>,
    pub batch_id: Option<String>,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCharacteristicInfo {
    pub description: String,
    pub value: Option<String>,
    pub type_code: Option<String>,
    pub value_measure: Option<Decimal>,
    pub value_measure_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductClassificationInfo {
    pub class_code: String,
    pub list_id: Option<String>,
    pub list_version_id: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInstanceInfo {
    pub batch_id: Option<String>,
    pub serial_id: Option<String>,
}

/// Packaging with dimensions sharing one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingInfo {
    pub type_code: String,
    pub width: Option<Decimal>,
    pub length: Option<Decimal>,
    pub height: Option<Decimal>,
    pub unit_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencedProductInfo {
    pub name: String,
    pub id: Option<String>,
    pub global_id: Option<String>,
    pub global_id_scheme: Option<String>,
    pub seller_assigned_id: Option<String>,
    pub buyer_assigned_id: Option<String>,
    pub industry_assigned_id: Option<String>,
    pub description: Option<String>,
    pub unit_quantity: Option<Decimal>,
    pub unit_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub amount: Decimal,
    pub basis_quantity: Option<Decimal>,
    pub basis_quantity_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Decimal,
    pub unit_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionQuantities {
    pub requested: Option<Quantity>,
    pub package: Option<Quantity>,
    pub per_package: Option<Quantity>,
    pub agreed: Option<Quantity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSummation {
    pub line_total: Decimal,
    pub total_allowance_charge: Option<Decimal>,
}
