//! Composite node builders.
//!
//! Each builder follows the same rule as the leaf constructors in
//! [`nodes`](super::nodes): it returns `None` when its designated primary
//! argument is absent, whatever else is passed. The primary argument is
//! named in each builder's doc line.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::OrderError;
use super::mime::detect_mime_type;
use super::nodes::{self, AnyOf, keyed};
use super::records::*;
use super::settings::Settings;
use super::types::*;

/// Trade party. Primary: `name`.
pub fn trade_party(
    name: Option<&str>,
    id: Option<&str>,
    description: Option<&str>,
) -> Option<TradeParty> {
    Some(TradeParty {
        ids: nodes::id(id, None).into_iter().collect(),
        global_ids: Vec::new(),
        name: nodes::text(name)?,
        description: nodes::text(description),
        legal_organization: None,
        contacts: Vec::new(),
        address: None,
        uri_communication: None,
        tax_registrations: Vec::new(),
    })
}

/// Legal organization. Primary: `id`.
pub fn legal_organization(
    id: Option<&str>,
    id_scheme: Option<&str>,
    trading_name: Option<&str>,
) -> Option<LegalOrganization> {
    Some(LegalOrganization {
        id: nodes::id(id, id_scheme)?,
        trading_business_name: nodes::text(trading_name),
    })
}

/// Universal communication. Primary: `uri_id` or `complete_number`.
pub fn universal_communication(
    uri_id: Option<&str>,
    uri_scheme: Option<&str>,
    complete_number: Option<&str>,
) -> Option<UniversalCommunication> {
    keyed(AnyOf::of(&[&uri_id, &complete_number]), || {
        UniversalCommunication {
            uri_id: nodes::id(uri_id, uri_scheme),
            complete_number: nodes::text(complete_number),
        }
    })
}

/// Trade contact. Primary: any of its scalars.
pub fn trade_contact(contact: &ContactInfo) -> Option<TradeContact> {
    let ContactInfo {
        person_name,
        department_name,
        phone,
        fax,
        email,
        type_code,
    } = contact;
    keyed(
        AnyOf::of(&[&person_name.as_deref(), &department_name.as_deref(), &phone.as_deref(), &fax.as_deref(), &email.as_deref()]),
        || TradeContact {
            person_name: nodes::text(person_name.as_deref()),
            department_name: nodes::text(department_name.as_deref()),
            type_code: nodes::code(type_code.as_deref()),
            telephone: universal_communication(None, None, phone.as_deref()),
            fax: universal_communication(None, None, fax.as_deref()),
            email: universal_communication(email.as_deref(), None, None),
        },
    )
}

/// Postal address. Primary: any address line, postcode, city or country.
pub fn trade_address(address: &PostalAddress) -> Option<TradeAddress> {
    let a = address;
    keyed(
        AnyOf::of(&[
            &a.line_one.as_deref(),
            &a.line_two.as_deref(),
            &a.line_three.as_deref(),
            &a.postcode.as_deref(),
            &a.city.as_deref(),
            &a.country.as_deref(),
        ]),
        || TradeAddress {
            postcode: nodes::code(a.postcode.as_deref()),
            line_one: nodes::text(a.line_one.as_deref()),
            line_two: nodes::text(a.line_two.as_deref()),
            line_three: nodes::text(a.line_three.as_deref()),
            city: nodes::text(a.city.as_deref()),
            country_id: nodes::id(a.country.as_deref(), None),
            country_sub_division: nodes::text(a.sub_division.as_deref()),
        },
    )
}

/// Tax registration. Primary: `id`; `tax_type` becomes the scheme (e.g. "VA").
pub fn tax_registration(tax_type: Option<&str>, id: Option<&str>) -> Option<TaxRegistration> {
    Some(TaxRegistration {
        id: nodes::id(id, tax_type)?,
    })
}

/// Delivery terms. Primary: `code`.
pub fn delivery_terms(terms: &DeliveryTermsInfo) -> Option<DeliveryTerms> {
    Some(DeliveryTerms {
        delivery_type_code: nodes::code(Some(terms.code.as_str()))?,
        description: nodes::text(terms.description.as_deref()),
        function_code: nodes::code(terms.function_code.as_deref()),
        location_id: nodes::id(terms.location_id.as_deref(), None),
        location_name: nodes::text(terms.location_name.as_deref()),
    })
}

/// Procuring project. Primary: `id`.
pub fn procuring_project(id: Option<&str>, name: Option<&str>) -> Option<ProcuringProject> {
    Some(ProcuringProject {
        id: nodes::id(id, None)?,
        name: nodes::text(name),
    })
}

/// Supply-chain event. Primary: occurrence, start or end.
///
/// The three dates are independent: an occurrence and a period may both be
/// present when both are supplied.
pub fn supply_chain_event(
    occurrence: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<SupplyChainEvent> {
    keyed(AnyOf::of(&[&occurrence, &start, &end]), || SupplyChainEvent {
        occurrence: nodes::date_time(occurrence),
        period: nodes::specified_period(start, end),
    })
}

/// Payment means. Primary: `type_code`.
pub fn payment_means(type_code: Option<&str>, information: Option<&str>) -> Option<PaymentMeans> {
    Some(PaymentMeans {
        type_code: nodes::code(type_code)?,
        information: nodes::text(information),
    })
}

/// Payment terms. Primary: `description`.
pub fn payment_terms(description: Option<&str>) -> Option<PaymentTerms> {
    Some(PaymentTerms {
        description: nodes::text(description)?,
    })
}

/// Trade tax. Primary: `category_code`.
pub fn trade_tax(tax: &TaxInfo) -> Option<TradeTax> {
    Some(TradeTax {
        calculated_amount: nodes::amount(tax.calculated_amount, None),
        type_code: nodes::code(tax.type_code.as_deref()),
        exemption_reason: nodes::text(tax.exemption_reason.as_deref()),
        basis_amount: nodes::amount(tax.basis_amount, None),
        category_code: nodes::code(Some(tax.category_code.as_str()))?,
        exemption_reason_code: nodes::code(tax.exemption_reason_code.as_deref()),
        rate_applicable_percent: nodes::percent(tax.rate),
    })
}

fn category_tax(
    category_code: Option<&str>,
    type_code: Option<&str>,
    rate: Option<Decimal>,
) -> Option<TradeTax> {
    trade_tax(&TaxInfo {
        category_code: category_code.unwrap_or_default().to_string(),
        type_code: type_code.map(str::to_string),
        rate,
        ..TaxInfo::default()
    })
}

/// Allowance or charge with its nested category tax. Primary: `actual_amount`.
pub fn allowance_charge(ac: &AllowanceChargeInfo) -> Option<AllowanceCharge> {
    Some(AllowanceCharge {
        charge_indicator: nodes::indicator(Some(ac.is_charge))?,
        sequence_numeric: nodes::numeric(ac.sequence),
        calculation_percent: nodes::percent(ac.calculation_percent),
        basis_amount: nodes::amount(ac.basis_amount, None),
        basis_quantity: nodes::quantity(ac.basis_quantity, ac.basis_quantity_unit.as_deref()),
        actual_amount: nodes::amount(Some(ac.actual_amount), None)?,
        reason_code: nodes::code(ac.reason_code.as_deref()),
        reason: nodes::text(ac.reason.as_deref()),
        category_trade_tax: category_tax(
            ac.tax_category_code.as_deref(),
            ac.tax_type_code.as_deref(),
            ac.tax_rate,
        ),
    })
}

/// Logistics service charge. Primary: `description`.
pub fn logistics_service_charge(charge: &LogisticsServiceChargeInfo) -> Option<LogisticsServiceCharge> {
    Some(LogisticsServiceCharge {
        description: nodes::text(Some(charge.description.as_str()))?,
        applied_amount: nodes::amount(Some(charge.amount), None)?,
        applied_trade_tax: category_tax(
            charge.tax_category_code.as_deref(),
            charge.tax_type_code.as_deref(),
            charge.tax_rate,
        )
        .into_iter()
        .collect(),
    })
}

/// Header monetary summation. Primary: `grand_total`. The tax total carries
/// the document currency.
pub fn header_summation(summation: &DocumentSummation, currency: Option<&str>) -> Option<HeaderMonetarySummation> {
    Some(HeaderMonetarySummation {
        line_total_amount: nodes::amount(summation.line_total, None),
        charge_total_amount: nodes::amount(summation.charge_total, None),
        allowance_total_amount: nodes::amount(summation.allowance_total, None),
        tax_basis_total_amount: nodes::amount(summation.tax_basis_total, None),
        tax_total_amount: nodes::amount(summation.tax_total, currency),
        grand_total_amount: nodes::amount(Some(summation.grand_total), None)?,
    })
}

/// Line monetary summation. Primary: `line_total`.
pub fn line_summation(
    line_total: Option<Decimal>,
    total_allowance_charge: Option<Decimal>,
) -> Option<LineMonetarySummation> {
    Some(LineMonetarySummation {
        line_total_amount: nodes::amount(line_total, None)?,
        total_allowance_charge_amount: nodes::amount(total_allowance_charge, None),
    })
}

/// Receivable accounting account. Primary: `id`.
pub fn accounting_account(id: Option<&str>, type_code: Option<&str>) -> Option<AccountingAccount> {
    Some(AccountingAccount {
        id: nodes::id(id, None)?,
        type_code: nodes::code(type_code),
    })
}

/// Associated line document. Primary: `line_id`.
pub fn line_document(
    line_id: Option<&str>,
    status_code: Option<&str>,
    status_reason_code: Option<&str>,
) -> Option<LineDocument> {
    Some(LineDocument {
        line_id: nodes::id(line_id, None)?,
        line_status_code: nodes::code(status_code),
        line_status_reason_code: nodes::code(status_reason_code),
        notes: Vec::new(),
    })
}

/// Empty position. Primary: `line_id`.
pub fn line_item(line_id: Option<&str>) -> Option<LineItem> {
    Some(LineItem {
        document: line_document(line_id, None, None)?,
        product: None,
        agreement: LineTradeAgreement::default(),
        delivery: LineTradeDelivery::default(),
        settlement: LineTradeSettlement::default(),
    })
}

/// Trade product. Primary: `name`.
pub fn trade_product(product: &ProductDetails) -> Option<TradeProduct> {
    Some(TradeProduct {
        id: None,
        global_ids: nodes::id(product.global_id.as_deref(), product.global_id_scheme.as_deref())
            .into_iter()
            .collect(),
        seller_assigned_id: nodes::id(product.seller_assigned_id.as_deref(), None),
        buyer_assigned_id: nodes::id(product.buyer_assigned_id.as_deref(), None),
        industry_assigned_id: nodes::id(product.industry_assigned_id.as_deref(), None),
        model_id: nodes::id(product.model_id.as_deref(), None),
        name: nodes::text(Some(product.name.as_str()))?,
        description: nodes::text(product.description.as_deref()),
        batch_id: nodes::id(product.batch_id.as_deref(), None),
        brand_name: nodes::text(product.brand_name.as_deref()),
        model_name: nodes::text(product.model_name.as_deref()),
        characteristics: Vec::new(),
        classifications: Vec::new(),
        instances: Vec::new(),
        packaging: None,
        origin_country: None,
        referenced_products: Vec::new(),
    })
}

/// Product characteristic. Primary: `description`.
pub fn product_characteristic(c: &ProductCharacteristicInfo) -> Option<ProductCharacteristic> {
    Some(ProductCharacteristic {
        type_code: nodes::code(c.type_code.as_deref()),
        description: nodes::text(Some(c.description.as_str()))?,
        value_measure: nodes::measure(c.value_measure, c.value_measure_unit.as_deref()),
        value: nodes::text(c.value.as_deref()),
    })
}

/// Product classification. Primary: `class_code`.
pub fn product_classification(c: &ProductClassificationInfo) -> Option<ProductClassification> {
    Some(ProductClassification {
        class_code: nodes::code2(
            Some(c.class_code.as_str()),
            c.list_id.as_deref(),
            c.list_version_id.as_deref(),
        )?,
        class_name: nodes::text(c.class_name.as_deref()),
    })
}

/// Product instance. Primary: `batch_id` or `serial_id`.
pub fn product_instance(batch_id: Option<&str>, serial_id: Option<&str>) -> Option<ProductInstance> {
    keyed(AnyOf::of(&[&batch_id, &serial_id]), || ProductInstance {
        batch_id: nodes::id(batch_id, None),
        serial_id: nodes::id(serial_id, None),
    })
}

/// Packaging. Primary: `type_code`.
pub fn supply_chain_packaging(p: &PackagingInfo) -> Option<SupplyChainPackaging> {
    let unit = p.unit_code.as_deref();
    Some(SupplyChainPackaging {
        type_code: nodes::code(Some(p.type_code.as_str()))?,
        width: nodes::measure(p.width, unit),
        length: nodes::measure(p.length, unit),
        height: nodes::measure(p.height, unit),
    })
}

/// Referenced product. Primary: `name`.
pub fn referenced_product(p: &ReferencedProductInfo) -> Option<ReferencedProduct> {
    Some(ReferencedProduct {
        id: nodes::id(p.id.as_deref(), None),
        global_ids: nodes::id(p.global_id.as_deref(), p.global_id_scheme.as_deref())
            .into_iter()
            .collect(),
        seller_assigned_id: nodes::id(p.seller_assigned_id.as_deref(), None),
        buyer_assigned_id: nodes::id(p.buyer_assigned_id.as_deref(), None),
        industry_assigned_id: nodes::id(p.industry_assigned_id.as_deref(), None),
        name: nodes::text(Some(p.name.as_str()))?,
        description: nodes::text(p.description.as_deref()),
        unit_quantity: nodes::quantity(p.unit_quantity, p.unit_code.as_deref()),
    })
}

/// Gross or net price. Primary: `amount`.
pub fn trade_price(
    amount: Option<Decimal>,
    basis_quantity: Option<Decimal>,
    basis_quantity_unit: Option<&str>,
) -> Option<TradePrice> {
    Some(TradePrice {
        charge_amount: nodes::amount(amount, None)?,
        basis_quantity: nodes::quantity(basis_quantity, basis_quantity_unit),
        allowance_charges: Vec::new(),
        included_tax: None,
    })
}

/// Single-valued referenced document. Primary: `issuer_assigned_id`.
pub fn referenced_document(
    issuer_assigned_id: Option<&str>,
    line_id: Option<&str>,
    issue_date: Option<NaiveDate>,
) -> Option<ReferencedDocument> {
    Some(ReferencedDocument {
        issuer_assigned_id: nodes::id(issuer_assigned_id, None)?,
        uri_id: None,
        line_id: nodes::id(line_id, None),
        type_code: None,
        name: None,
        attachment: None,
        reference_type_code: None,
        issue_date: nodes::formatted_date_time(issue_date),
    })
}

/// Additional referenced document. Primary: `issuer_assigned_id`.
pub fn additional_referenced_document(r: &AdditionalReference) -> Option<ReferencedDocument> {
    let attachment = r.attachment.as_ref().and_then(|a| {
        nodes::binary_object(Some(a.data.as_slice()), Some(a.mime_code.as_str()), Some(a.filename.as_str()))
    });
    Some(ReferencedDocument {
        issuer_assigned_id: nodes::id(Some(r.issuer_assigned_id.as_str()), None)?,
        uri_id: nodes::id(r.uri_id.as_deref(), None),
        line_id: nodes::id(r.line_id.as_deref(), None),
        type_code: nodes::code(r.type_code.as_deref()),
        name: nodes::text(r.name.as_deref()),
        attachment,
        reference_type_code: nodes::code(r.reference_type_code.as_deref()),
        issue_date: nodes::formatted_date_time(r.issue_date),
    })
}

/// Load a file as a binary attachment, checking its MIME type against the
/// allow-list in `settings`.
pub fn attachment_from_file(
    path: impl AsRef<Path>,
    settings: &Settings,
) -> Result<BinaryAttachment, OrderError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = detect_mime_type(&filename, &data).unwrap_or("application/octet-stream");
    if !settings.is_mime_type_allowed(mime) {
        return Err(OrderError::MimeTypeNotSupported(mime.to_string()));
    }
    log::debug!("attachment {} detected as {} ({} bytes)", filename, mime, data.len());
    Ok(BinaryAttachment {
        data,
        mime_code: mime.to_string(),
        filename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn primary_keys_gate_composites() {
        assert!(trade_party(None, Some("ID"), Some("desc")).is_none());
        assert!(legal_organization(None, Some("0088"), Some("Trading")).is_none());
        assert!(tax_registration(Some("VA"), None).is_none());
        assert!(procuring_project(Some(""), Some("Project")).is_none());
        assert!(payment_means(None, Some("info")).is_none());
        assert!(payment_terms(Some("")).is_none());
        assert!(accounting_account(None, Some("1")).is_none());
        assert!(line_document(None, Some("1"), None).is_none());
        assert!(line_item(Some("")).is_none());
        assert!(trade_price(None, Some(dec!(1)), Some("C62")).is_none());
        assert!(referenced_document(None, Some("1"), None).is_none());
        assert!(supply_chain_event(None, None, None).is_none());
        assert!(product_instance(None, None).is_none());
        assert!(trade_contact(&ContactInfo::default()).is_none());
        assert!(trade_address(&PostalAddress {
            sub_division: Some("BY".into()),
            ..Default::default()
        })
        .is_none());
        assert!(trade_tax(&TaxInfo {
            rate: Some(dec!(19)),
            ..Default::default()
        })
        .is_none());
        assert!(trade_product(&ProductDetails {
            description: Some("only a description".into()),
            ..Default::default()
        })
        .is_none());
    }

    #[test]
    fn party_with_name() {
        let party = trade_party(Some("ACME"), Some("S-1"), None).unwrap();
        assert_eq!(party.name.value, "ACME");
        assert_eq!(party.ids.len(), 1);
        assert!(party.description.is_none());
    }

    #[test]
    fn allowance_charge_with_category_tax() {
        let ac = allowance_charge(&AllowanceChargeInfo {
            actual_amount: dec!(10),
            is_charge: false,
            reason: Some("Discount".into()),
            tax_category_code: Some("S".into()),
            tax_type_code: Some("VAT".into()),
            tax_rate: Some(dec!(19)),
            ..Default::default()
        })
        .unwrap();
        assert!(!ac.charge_indicator.indicator);
        let tax = ac.category_trade_tax.unwrap();
        assert_eq!(tax.category_code.value, "S");
        assert_eq!(tax.rate_applicable_percent.unwrap().value, dec!(19));
    }

    #[test]
    fn event_keeps_occurrence_and_period_independent() {
        let d = NaiveDate::from_ymd_opt(2022, 12, 31);
        let only_occurrence = supply_chain_event(d, None, None).unwrap();
        assert!(only_occurrence.occurrence.is_some());
        assert!(only_occurrence.period.is_none());

        let only_start = supply_chain_event(None, d, None).unwrap();
        assert!(only_start.occurrence.is_none());
        assert!(only_start.period.unwrap().end.is_none());

        let all = supply_chain_event(d, d, d).unwrap();
        assert!(all.occurrence.is_some() && all.period.is_some());
    }

    #[test]
    fn attachment_mime_allow_list() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("drawing.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        let att = attachment_from_file(&pdf, &Settings::default()).unwrap();
        assert_eq!(att.mime_code, "application/pdf");
        assert_eq!(att.filename, "drawing.pdf");

        let zip = dir.path().join("bundle.zip");
        std::fs::write(&zip, b"PK\x03\x04").unwrap();
        assert!(matches!(
            attachment_from_file(&zip, &Settings::default()),
            Err(OrderError::MimeTypeNotSupported(m)) if m == "application/zip"
        ));
    }
}
