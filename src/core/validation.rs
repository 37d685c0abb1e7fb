use super::error::ValidationError;
use super::profile::{Feature, Profile};
use super::types::*;

/// Pluggable document validator.
///
/// The reader and the builder hand their document to a validator and
/// return its findings unchanged. Schema or Schematron engines can be
/// plugged in by implementing this trait.
pub trait DocumentValidator {
    /// Validate `document`. Returns all findings (not just the first).
    fn validate(&self, document: &OrderDocument) -> Vec<ValidationError>;
}

/// Built-in validator: mandatory fields and profile gating.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileRulesValidator;

impl DocumentValidator for ProfileRulesValidator {
    fn validate(&self, document: &OrderDocument) -> Vec<ValidationError> {
        let mut errors = validate_mandatory(document);
        errors.extend(validate_profile_gating(document));
        errors
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Check the fields every Order-X profile requires.
pub fn validate_mandatory(document: &OrderDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // OX-01: guideline URN must name a known profile
    if Profile::from_urn(&document.context.guideline.value).is_none() {
        errors.push(ValidationError::with_rule(
            "context.guideline",
            format!("unknown guideline '{}'", document.context.guideline.value),
            "OX-01",
        ));
    }

    // OX-02: order number
    if is_blank(document.header.id.as_ref().map(|v| v.value.as_str())) {
        errors.push(ValidationError::with_rule(
            "header.id",
            "order number must not be empty",
            "OX-02",
        ));
    }

    // OX-03: document type code
    match &document.header.type_code {
        None => errors.push(ValidationError::with_rule(
            "header.type_code",
            "document type code must be present",
            "OX-03",
        )),
        Some(code) if OrderTypeCode::from_code(&code.value).is_none() => {
            errors.push(ValidationError::with_rule(
                "header.type_code",
                format!("'{}' is not an order type code (220, 230, 231)", code.value),
                "OX-03",
            ))
        }
        Some(_) => {}
    }

    // OX-04: issue date, parseable
    match &document.header.issue_date_time {
        None => errors.push(ValidationError::with_rule(
            "header.issue_date_time",
            "issue date must be present",
            "OX-04",
        )),
        Some(date) => {
            if let Err(e) = date.to_date_time() {
                errors.push(ValidationError::with_rule(
                    "header.issue_date_time",
                    e.to_string(),
                    "OX-04",
                ));
            }
        }
    }

    // OX-05: currency, ISO 4217 shape
    match document.settlement.currency_code.as_ref().map(|c| c.value.trim()) {
        None | Some("") => errors.push(ValidationError::with_rule(
            "settlement.currency_code",
            "currency code must not be empty",
            "OX-05",
        )),
        Some(c) if c.len() != 3 => errors.push(ValidationError::with_rule(
            "settlement.currency_code",
            "currency code must be 3 characters (ISO 4217)",
            "OX-05",
        )),
        Some(_) => {}
    }

    // OX-06 / OX-07: seller and buyer
    for (role, rule) in [(PartyRole::Seller, "OX-06"), (PartyRole::Buyer, "OX-07")] {
        let field = match role {
            PartyRole::Seller => "agreement.seller",
            _ => "agreement.buyer",
        };
        match document.party(role) {
            None => errors.push(ValidationError::with_rule(field, "party must be present", rule)),
            Some(p) if p.name.value.trim().is_empty() => errors.push(ValidationError::with_rule(
                format!("{field}.name"),
                "party name must not be empty",
                rule,
            )),
            Some(_) => {}
        }
    }

    // OX-08: grand total
    if document.settlement.summation.is_none() {
        errors.push(ValidationError::with_rule(
            "settlement.summation",
            "monetary summation with grand total must be present",
            "OX-08",
        ));
    }

    // OX-09: at least one position
    if document.positions.is_empty() {
        errors.push(ValidationError::with_rule(
            "positions",
            "an order must contain at least one position",
            "OX-09",
        ));
    }

    for (i, position) in document.positions.iter().enumerate() {
        validate_position(position, i, &mut errors);
    }

    errors
}

fn validate_position(position: &LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("positions[{index}]");

    // OX-10: line id
    if position.document.line_id.value.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.document.line_id"),
            "line id must not be empty",
            "OX-10",
        ));
    }

    // OX-11: product name
    match &position.product {
        None => errors.push(ValidationError::with_rule(
            format!("{prefix}.product"),
            "position must carry a product",
            "OX-11",
        )),
        Some(p) if p.name.value.trim().is_empty() => errors.push(ValidationError::with_rule(
            format!("{prefix}.product.name"),
            "product name must not be empty",
            "OX-11",
        )),
        Some(_) => {}
    }

    // OX-12: requested quantity
    if position.delivery.requested_quantity.is_none() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.delivery.requested_quantity"),
            "requested quantity must be present",
            "OX-12",
        ));
    }
}

/// Flag content that the document's profile does not carry.
pub fn validate_profile_gating(document: &OrderDocument) -> Vec<ValidationError> {
    let Some(profile) = Profile::from_urn(&document.context.guideline.value) else {
        return Vec::new();
    };
    present_features(document)
        .into_iter()
        .filter(|(feature, _)| !profile.supports(*feature))
        .map(|(feature, field)| {
            ValidationError::with_rule(
                field,
                format!(
                    "not allowed in profile {profile}, requires {}",
                    feature.min_profile()
                ),
                "OX-20",
            )
        })
        .collect()
}

/// Gated features a document actually uses, with the field that carries each.
pub fn present_features(document: &OrderDocument) -> Vec<(Feature, String)> {
    let mut found = Vec::new();
    let mut mark = |present: bool, feature: Feature, field: &str| {
        if present {
            found.push((feature, field.to_string()));
        }
    };

    let a = &document.agreement;
    mark(a.buyer_requisitioner.is_some(), Feature::BuyerRequisitioner, "agreement.buyer_requisitioner");
    mark(a.delivery_terms.is_some(), Feature::DeliveryTerms, "agreement.delivery_terms");
    mark(a.quotation_reference.is_some(), Feature::QuotationReference, "agreement.quotation_reference");
    mark(a.contract_reference.is_some(), Feature::ContractReference, "agreement.contract_reference");
    mark(a.requisition_reference.is_some(), Feature::RequisitionReference, "agreement.requisition_reference");
    mark(!a.additional_references.is_empty(), Feature::AdditionalReferences, "agreement.additional_references");
    mark(a.blanket_order_reference.is_some(), Feature::BlanketOrderReference, "agreement.blanket_order_reference");
    mark(
        a.previous_order_change_reference.is_some() || a.previous_order_response_reference.is_some(),
        Feature::PreviousOrderReferences,
        "agreement.previous_order_reference",
    );
    mark(a.procuring_project.is_some(), Feature::ProcuringProject, "agreement.procuring_project");
    mark(
        a.ultimate_customer_order_reference.is_some(),
        Feature::UltimateCustomerOrderReference,
        "agreement.ultimate_customer_order_reference",
    );

    let d = &document.delivery;
    mark(d.ship_from.is_some(), Feature::ShipFrom, "delivery.ship_from");
    mark(d.requested_despatch.is_some(), Feature::RequestedDespatch, "delivery.requested_despatch");

    let s = &document.settlement;
    mark(s.invoicee.is_some(), Feature::Invoicee, "settlement.invoicee");
    mark(!s.payment_means.is_empty(), Feature::PaymentMeans, "settlement.payment_means");
    mark(!s.taxes.is_empty(), Feature::DocumentTax, "settlement.taxes");
    mark(
        !s.logistics_service_charges.is_empty(),
        Feature::LogisticsServiceCharges,
        "settlement.logistics_service_charges",
    );
    mark(!s.accounting_accounts.is_empty(), Feature::AccountingAccounts, "settlement.accounting_accounts");

    for (i, position) in document.positions.iter().enumerate() {
        let field = |name: &str| format!("positions[{i}].{name}");
        if let Some(p) = &position.product {
            mark(!p.characteristics.is_empty(), Feature::ProductCharacteristics, &field("product.characteristics"));
            mark(!p.classifications.is_empty(), Feature::ProductClassifications, &field("product.classifications"));
            mark(!p.instances.is_empty(), Feature::ProductInstances, &field("product.instances"));
            mark(p.packaging.is_some(), Feature::ProductPackaging, &field("product.packaging"));
            mark(p.origin_country.is_some(), Feature::OriginCountry, &field("product.origin_country"));
            mark(!p.referenced_products.is_empty(), Feature::ReferencedProducts, &field("product.referenced_products"));
        }
        let la = &position.agreement;
        mark(la.quotation_reference.is_some(), Feature::QuotationReference, &field("agreement.quotation_reference"));
        mark(la.contract_reference.is_some(), Feature::ContractReference, &field("agreement.contract_reference"));
        mark(!la.additional_references.is_empty(), Feature::AdditionalReferences, &field("agreement.additional_references"));
        mark(la.catalogue_reference.is_some(), Feature::CatalogueReference, &field("agreement.catalogue_reference"));
        mark(la.blanket_order_reference.is_some(), Feature::BlanketOrderReference, &field("agreement.blanket_order_reference"));
        mark(
            la.ultimate_customer_order_reference.is_some(),
            Feature::UltimateCustomerOrderReference,
            &field("agreement.ultimate_customer_order_reference"),
        );
        mark(
            la.gross_price.as_ref().is_some_and(|g| !g.allowance_charges.is_empty()),
            Feature::GrossPriceAllowanceCharges,
            &field("agreement.gross_price.allowance_charges"),
        );
        mark(
            position.delivery.requested_despatch.is_some(),
            Feature::RequestedDespatch,
            &field("delivery.requested_despatch"),
        );
        let ls = &position.settlement;
        mark(ls.tax.is_some(), Feature::PositionTax, &field("settlement.tax"));
        mark(!ls.accounting_accounts.is_empty(), Feature::AccountingAccounts, &field("settlement.accounting_accounts"));
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory;
    use crate::core::nodes;
    use rust_decimal_macros::dec;

    fn minimal(profile: Profile) -> OrderDocument {
        let mut doc = OrderDocument::new(profile);
        doc.header.id = nodes::id(Some("PO-1"), None);
        doc.header.type_code = nodes::code(Some("220"));
        doc.header.issue_date_time = nodes::date_time(chrono::NaiveDate::from_ymd_opt(2022, 12, 31));
        doc.settlement.currency_code = nodes::code(Some("EUR"));
        doc.agreement.seller = factory::trade_party(Some("Seller"), None, None);
        doc.agreement.buyer = factory::trade_party(Some("Buyer"), None, None);
        doc.settlement.summation = nodes::amount(Some(dec!(100)), None).map(|grand| {
            crate::core::types::HeaderMonetarySummation {
                line_total_amount: None,
                charge_total_amount: None,
                allowance_total_amount: None,
                tax_basis_total_amount: None,
                tax_total_amount: None,
                grand_total_amount: grand,
            }
        });
        let mut item = factory::line_item(Some("1")).unwrap();
        item.product = factory::trade_product(&crate::core::records::ProductDetails {
            name: "Widget".into(),
            ..Default::default()
        });
        item.delivery.requested_quantity = nodes::quantity(Some(dec!(1)), Some("C62"));
        doc.positions.push(item);
        doc
    }

    #[test]
    fn minimal_document_is_valid() {
        let errors = ProfileRulesValidator.validate(&minimal(Profile::Basic));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn empty_document_lists_all_mandatory_findings() {
        let errors = ProfileRulesValidator.validate(&OrderDocument::new(Profile::Basic));
        let rules: Vec<_> = errors.iter().filter_map(|e| e.rule.as_deref()).collect();
        for rule in ["OX-02", "OX-03", "OX-04", "OX-05", "OX-06", "OX-07", "OX-08", "OX-09"] {
            assert!(rules.contains(&rule), "missing {rule}: {rules:?}");
        }
    }

    #[test]
    fn gated_content_above_profile_is_flagged() {
        let mut doc = minimal(Profile::Basic);
        doc.settlement.invoicee = factory::trade_party(Some("Invoicee"), None, None);
        doc.positions[0].agreement.catalogue_reference =
            factory::referenced_document(Some("CAT-1"), None, None);
        let errors = validate_profile_gating(&doc);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "settlement.invoicee");
        assert_eq!(errors[1].field, "positions[0].agreement.catalogue_reference");

        doc.context.guideline.value = Profile::Extended.urn().to_string();
        assert!(validate_profile_gating(&doc).is_empty());
    }

    #[test]
    fn unknown_type_code_is_reported() {
        let mut doc = minimal(Profile::Comfort);
        doc.header.type_code = nodes::code(Some("380"));
        let errors = validate_mandatory(&doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("OX-03"));
    }
}
