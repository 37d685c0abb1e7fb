use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::mapper::to_xml;
use crate::core::factory;
use crate::core::nodes::{self, IdType};
use crate::core::*;

/// Authoring facade for Order-X documents.
///
/// Setters take plain values and skip anything whose primary value is
/// empty. Groups that the chosen profile does not carry are skipped with a
/// debug log, so the same calling code can target every profile.
///
/// ```
/// use chrono::NaiveDate;
/// use orderx::core::{OrderTypeCode, PartyRole, Profile};
/// use orderx::xml::OrderDocumentBuilder;
/// use rust_decimal_macros::dec;
///
/// let mut builder = OrderDocumentBuilder::new(Profile::Basic);
/// builder
///     .set_document_information(
///         "PO-2024-17",
///         OrderTypeCode::Order,
///         NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
///         "EUR",
///     )
///     .set_document_party(PartyRole::Seller, "Supplier GmbH", None, None)
///     .set_document_party(PartyRole::Buyer, "Retail AG", None, None);
/// builder
///     .add_new_position("1")
///     .set_product_details_name("Pallet of bolts")
///     .set_quantity(dec!(4), "C62");
/// let xml = builder.get_content().unwrap();
/// assert!(xml.contains("PO-2024-17"));
/// ```
#[derive(Debug)]
pub struct OrderDocumentBuilder {
    document: OrderDocument,
    profile: Profile,
    settings: Settings,
}

/// Whether `profile` carries `feature`; logs the skip when it does not.
fn allowed(profile: Profile, feature: Feature, what: &str) -> bool {
    let ok = profile.supports(feature);
    if !ok {
        log::debug!(
            "skipping {what}: requires profile {} or higher, document is {profile}",
            feature.min_profile()
        );
    }
    ok
}

fn party_feature(role: PartyRole) -> Option<Feature> {
    match role {
        PartyRole::BuyerRequisitioner => Some(Feature::BuyerRequisitioner),
        PartyRole::ShipFrom => Some(Feature::ShipFrom),
        PartyRole::Invoicee => Some(Feature::Invoicee),
        PartyRole::Seller | PartyRole::Buyer | PartyRole::ShipTo => None,
    }
}

fn reference_feature(kind: ReferenceKind) -> Option<Feature> {
    match kind {
        ReferenceKind::SellerOrder | ReferenceKind::BuyerOrder => None,
        ReferenceKind::Quotation => Some(Feature::QuotationReference),
        ReferenceKind::Contract => Some(Feature::ContractReference),
        ReferenceKind::Requisition => Some(Feature::RequisitionReference),
        ReferenceKind::BlanketOrder => Some(Feature::BlanketOrderReference),
        ReferenceKind::PreviousOrderChange | ReferenceKind::PreviousOrderResponse => {
            Some(Feature::PreviousOrderReferences)
        }
        ReferenceKind::UltimateCustomerOrder => Some(Feature::UltimateCustomerOrderReference),
        ReferenceKind::Catalogue => Some(Feature::CatalogueReference),
    }
}

fn gate(profile: Profile, feature: Option<Feature>, what: &str) -> bool {
    feature.is_none_or(|f| allowed(profile, f, what))
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}

impl OrderDocumentBuilder {
    /// Start a document for `profile` with the process-wide settings.
    pub fn new(profile: Profile) -> Self {
        Self::with_settings(profile, Settings::global().clone())
    }

    pub fn with_settings(profile: Profile, settings: Settings) -> Self {
        Self {
            document: OrderDocument::new(profile),
            profile,
            settings,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // Header
    // -----------------------------------------------------------------------

    pub fn set_document_information(
        &mut self,
        document_no: &str,
        type_code: OrderTypeCode,
        document_date: NaiveDate,
        currency: &str,
    ) -> &mut Self {
        let h = &mut self.document.header;
        h.id = nodes::id(Some(document_no), None);
        h.type_code = nodes::code(Some(type_code.code()));
        h.issue_date_time = nodes::date_time(Some(document_date));
        self.document.settlement.currency_code = nodes::code(Some(currency));
        self
    }

    pub fn set_document_name(&mut self, name: &str) -> &mut Self {
        self.document.header.name = nodes::text(Some(name));
        self
    }

    pub fn set_document_language(&mut self, language: &str) -> &mut Self {
        self.document.header.language_id = nodes::id(Some(language), None);
        self
    }

    pub fn set_document_purpose_code(&mut self, code: &str) -> &mut Self {
        self.document.header.purpose_code = nodes::code(Some(code));
        self
    }

    pub fn set_document_requested_response_type_code(&mut self, code: &str) -> &mut Self {
        self.document.header.requested_response_type_code = nodes::code(Some(code));
        self
    }

    pub fn set_is_test_document(&mut self, test: bool) -> &mut Self {
        self.document.context.test_indicator = nodes::indicator(Some(test));
        self
    }

    pub fn set_is_copy(&mut self, copy: bool) -> &mut Self {
        self.document.header.copy_indicator = nodes::indicator(Some(copy));
        self
    }

    pub fn set_document_business_process(&mut self, id: &str) -> &mut Self {
        self.document.context.business_process = nodes::id(Some(id), None);
        self
    }

    pub fn set_document_buyer_reference(&mut self, reference: &str) -> &mut Self {
        self.document.agreement.buyer_reference = nodes::text(Some(reference));
        self
    }

    pub fn add_document_note(
        &mut self,
        content: &str,
        content_code: Option<&str>,
        subject_code: Option<&str>,
    ) -> &mut Self {
        if let Some(note) = nodes::note(Some(content), content_code, subject_code) {
            self.document.header.notes.push(note);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Parties
    // -----------------------------------------------------------------------

    /// Set (or replace) the party in `role`.
    pub fn set_document_party(
        &mut self,
        role: PartyRole,
        name: &str,
        id: Option<&str>,
        description: Option<&str>,
    ) -> &mut Self {
        if gate(self.profile, party_feature(role), role.element()) {
            *self.document.party_mut(role) = factory::trade_party(Some(name), id, description);
        }
        self
    }

    /// Apply `f` to an existing party; warns when the party was never set.
    fn with_party(&mut self, role: PartyRole, what: &str, f: impl FnOnce(&mut TradeParty)) -> &mut Self {
        match self.document.party_mut(role).as_mut() {
            Some(party) => f(party),
            None => log::warn!("ignoring {what}: no {} set", role.element()),
        }
        self
    }

    pub fn add_document_party_id(&mut self, role: PartyRole, id: &str) -> &mut Self {
        self.with_party(role, "party id", |p| {
            p.ids.extend(nodes::id(Some(id), None));
        })
    }

    pub fn add_document_party_global_id(&mut self, role: PartyRole, id: &str, scheme: &str) -> &mut Self {
        self.with_party(role, "party global id", |p| {
            p.global_ids.extend(nodes::id(Some(id), Some(scheme)));
        })
    }

    /// Add a tax registration; `tax_type` is `VA` for VAT ids, `FC` for
    /// fiscal numbers.
    pub fn add_document_party_tax_registration(&mut self, role: PartyRole, tax_type: &str, id: &str) -> &mut Self {
        self.with_party(role, "tax registration", |p| {
            p.tax_registrations
                .extend(factory::tax_registration(Some(tax_type), Some(id)));
        })
    }

    pub fn set_document_party_address(&mut self, role: PartyRole, address: &PostalAddress) -> &mut Self {
        self.with_party(role, "party address", |p| {
            p.address = factory::trade_address(address);
        })
    }

    pub fn set_document_party_legal_organisation(
        &mut self,
        role: PartyRole,
        organisation: &LegalOrganisation,
    ) -> &mut Self {
        self.with_party(role, "legal organisation", |p| {
            p.legal_organization = factory::legal_organization(
                organisation.id.as_deref(),
                organisation.id_scheme.as_deref(),
                organisation.trading_name.as_deref(),
            );
        })
    }

    pub fn add_document_party_contact(&mut self, role: PartyRole, contact: &ContactInfo) -> &mut Self {
        self.with_party(role, "party contact", |p| {
            p.contacts.extend(factory::trade_contact(contact));
        })
    }

    pub fn set_document_party_electronic_address(
        &mut self,
        role: PartyRole,
        uri: &str,
        scheme: Option<&str>,
    ) -> &mut Self {
        self.with_party(role, "electronic address", |p| {
            p.uri_communication = factory::universal_communication(Some(uri), scheme, None);
        })
    }

    // -----------------------------------------------------------------------
    // Agreement
    // -----------------------------------------------------------------------

    pub fn set_document_delivery_terms(&mut self, terms: &DeliveryTermsInfo) -> &mut Self {
        if allowed(self.profile, Feature::DeliveryTerms, "delivery terms") {
            self.document.agreement.delivery_terms = factory::delivery_terms(terms);
        }
        self
    }

    /// Set a single-valued document reference. Line-only kinds are ignored.
    pub fn set_document_reference(
        &mut self,
        kind: ReferenceKind,
        issuer_assigned_id: &str,
        line_id: Option<&str>,
        issue_date: Option<NaiveDate>,
    ) -> &mut Self {
        if !gate(self.profile, reference_feature(kind), kind.element()) {
            return self;
        }
        match self.document.agreement.reference_mut(kind) {
            Some(slot) => *slot = factory::referenced_document(Some(issuer_assigned_id), line_id, issue_date),
            None => log::warn!("{} is not a document-level reference", kind.element()),
        }
        self
    }

    pub fn add_document_additional_referenced_document(&mut self, reference: &AdditionalReference) -> &mut Self {
        if allowed(self.profile, Feature::AdditionalReferences, "additional referenced document") {
            self.document
                .agreement
                .additional_references
                .extend(factory::additional_referenced_document(reference));
        }
        self
    }

    /// Add an additional referenced document whose attachment is read from
    /// `path`. The file's MIME type must be on the settings allow-list.
    pub fn add_document_additional_referenced_document_from_file(
        &mut self,
        reference: &AdditionalReference,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, OrderError> {
        let attachment = factory::attachment_from_file(path, &self.settings)?;
        let reference = AdditionalReference {
            attachment: Some(attachment),
            ..reference.clone()
        };
        Ok(self.add_document_additional_referenced_document(&reference))
    }

    pub fn set_document_procuring_project(&mut self, id: &str, name: Option<&str>) -> &mut Self {
        if allowed(self.profile, Feature::ProcuringProject, "procuring project") {
            self.document.agreement.procuring_project = factory::procuring_project(Some(id), name);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    pub fn set_document_requested_delivery(
        &mut self,
        occurrence: Option<NaiveDate>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &mut Self {
        self.document.delivery.requested_delivery = factory::supply_chain_event(occurrence, start, end);
        self
    }

    pub fn set_document_requested_despatch(
        &mut self,
        occurrence: Option<NaiveDate>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &mut Self {
        if allowed(self.profile, Feature::RequestedDespatch, "requested despatch") {
            self.document.delivery.requested_despatch = factory::supply_chain_event(occurrence, start, end);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------------

    pub fn add_document_payment_means(&mut self, type_code: &str, information: Option<&str>) -> &mut Self {
        if allowed(self.profile, Feature::PaymentMeans, "payment means") {
            self.document
                .settlement
                .payment_means
                .extend(factory::payment_means(Some(type_code), information));
        }
        self
    }

    pub fn add_document_tax(&mut self, tax: &TaxInfo) -> &mut Self {
        if allowed(self.profile, Feature::DocumentTax, "document tax") {
            self.document.settlement.taxes.extend(factory::trade_tax(tax));
        }
        self
    }

    pub fn add_document_allowance_charge(&mut self, allowance_charge: &AllowanceChargeInfo) -> &mut Self {
        self.document
            .settlement
            .allowance_charges
            .extend(factory::allowance_charge(allowance_charge));
        self
    }

    pub fn add_document_logistics_service_charge(&mut self, charge: &LogisticsServiceChargeInfo) -> &mut Self {
        if allowed(self.profile, Feature::LogisticsServiceCharges, "logistics service charge") {
            self.document
                .settlement
                .logistics_service_charges
                .extend(factory::logistics_service_charge(charge));
        }
        self
    }

    pub fn add_document_payment_term(&mut self, description: &str) -> &mut Self {
        self.document
            .settlement
            .payment_terms
            .extend(factory::payment_terms(Some(description)));
        self
    }

    pub fn add_document_receivable_accounting_account(&mut self, id: &str, type_code: Option<&str>) -> &mut Self {
        if allowed(self.profile, Feature::AccountingAccounts, "receivable accounting account") {
            self.document
                .settlement
                .accounting_accounts
                .extend(factory::accounting_account(Some(id), type_code));
        }
        self
    }

    /// Set the header totals. The tax total carries the document currency.
    pub fn set_document_summation(&mut self, summation: &DocumentSummation) -> &mut Self {
        let currency = self
            .document
            .settlement
            .currency_code
            .as_ref()
            .map(|c| c.value.clone());
        self.document.settlement.summation = factory::header_summation(summation, currency.as_deref());
        self
    }

    // -----------------------------------------------------------------------
    // Positions
    // -----------------------------------------------------------------------

    /// Append a position and return a builder for it.
    pub fn add_new_position(&mut self, line_id: &str) -> PositionBuilder<'_> {
        let item = factory::line_item(Some(line_id)).unwrap_or_else(|| {
            log::warn!("position added without a line id");
            LineItem {
                document: LineDocument {
                    line_id: IdType {
                        value: String::new(),
                        scheme_id: None,
                    },
                    line_status_code: None,
                    line_status_reason_code: None,
                    notes: Vec::new(),
                },
                product: None,
                agreement: LineTradeAgreement::default(),
                delivery: LineTradeDelivery::default(),
                settlement: LineTradeSettlement::default(),
            }
        });
        let positions = &mut self.document.positions;
        positions.push(item);
        let index = positions.len() - 1;
        PositionBuilder {
            item: &mut positions[index],
            profile: self.profile,
            settings: &self.settings,
        }
    }

    /// Builder for the most recently added position.
    pub fn current_position(&mut self) -> Option<PositionBuilder<'_>> {
        let profile = self.profile;
        let settings = &self.settings;
        self.document
            .positions
            .last_mut()
            .map(|item| PositionBuilder { item, profile, settings })
    }

    // -----------------------------------------------------------------------
    // Finalization
    // -----------------------------------------------------------------------

    pub fn document(&self) -> &OrderDocument {
        &self.document
    }

    pub fn into_document(self) -> OrderDocument {
        self.document
    }

    /// Serialize the document to Order-X XML.
    pub fn get_content(&self) -> Result<String, OrderError> {
        let xml = to_xml(&self.document, &self.settings)?;
        log::debug!("serialized {} document ({} bytes)", self.profile, xml.len());
        Ok(xml)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), OrderError> {
        std::fs::write(path, self.get_content()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.validate_with(&ProfileRulesValidator)
    }

    pub fn validate_with(&self, validator: &dyn DocumentValidator) -> Vec<ValidationError> {
        validator.validate(&self.document)
    }
}

/// Setters for one position of an [`OrderDocumentBuilder`].
#[derive(Debug)]
pub struct PositionBuilder<'a> {
    item: &'a mut LineItem,
    profile: Profile,
    settings: &'a Settings,
}

impl PositionBuilder<'_> {
    fn with_product(&mut self, what: &str, f: impl FnOnce(&mut TradeProduct)) -> &mut Self {
        match self.item.product.as_mut() {
            Some(product) => f(product),
            None => log::warn!(
                "ignoring {what} on position {}: no product set",
                self.item.document.line_id.value
            ),
        }
        self
    }

    pub fn set_status(&mut self, status_code: Option<&str>, status_reason_code: Option<&str>) -> &mut Self {
        self.item.document.line_status_code = nodes::code(status_code);
        self.item.document.line_status_reason_code = nodes::code(status_reason_code);
        self
    }

    pub fn add_note(&mut self, content: &str, content_code: Option<&str>, subject_code: Option<&str>) -> &mut Self {
        self.item
            .document
            .notes
            .extend(nodes::note(Some(content), content_code, subject_code));
        self
    }

    pub fn set_product_details(&mut self, product: &ProductDetails) -> &mut Self {
        self.item.product = factory::trade_product(product);
        self
    }

    /// Shorthand for a product carrying only a name.
    pub fn set_product_details_name(&mut self, name: &str) -> &mut Self {
        self.set_product_details(&ProductDetails {
            name: name.to_string(),
            ..Default::default()
        })
    }

    pub fn add_product_characteristic(&mut self, characteristic: &ProductCharacteristicInfo) -> &mut Self {
        if !allowed(self.profile, Feature::ProductCharacteristics, "product characteristic") {
            return self;
        }
        self.with_product("product characteristic", |p| {
            p.characteristics
                .extend(factory::product_characteristic(characteristic));
        })
    }

    pub fn add_product_classification(&mut self, classification: &ProductClassificationInfo) -> &mut Self {
        if !allowed(self.profile, Feature::ProductClassifications, "product classification") {
            return self;
        }
        self.with_product("product classification", |p| {
            p.classifications
                .extend(factory::product_classification(classification));
        })
    }

    pub fn add_product_instance(&mut self, batch_id: Option<&str>, serial_id: Option<&str>) -> &mut Self {
        if !allowed(self.profile, Feature::ProductInstances, "product instance") {
            return self;
        }
        self.with_product("product instance", |p| {
            p.instances.extend(factory::product_instance(batch_id, serial_id));
        })
    }

    pub fn set_product_packaging(&mut self, packaging: &PackagingInfo) -> &mut Self {
        if !allowed(self.profile, Feature::ProductPackaging, "product packaging") {
            return self;
        }
        self.with_product("product packaging", |p| {
            p.packaging = factory::supply_chain_packaging(packaging);
        })
    }

    pub fn set_product_origin_country(&mut self, country: &str) -> &mut Self {
        if !allowed(self.profile, Feature::OriginCountry, "origin country") {
            return self;
        }
        self.with_product("origin country", |p| {
            p.origin_country = nodes::id(Some(country), None);
        })
    }

    pub fn add_referenced_product(&mut self, product: &ReferencedProductInfo) -> &mut Self {
        if !allowed(self.profile, Feature::ReferencedProducts, "referenced product") {
            return self;
        }
        self.with_product("referenced product", |p| {
            p.referenced_products.extend(factory::referenced_product(product));
        })
    }

    /// Set a single-valued line reference. Header-only kinds are ignored.
    pub fn set_reference(
        &mut self,
        kind: ReferenceKind,
        issuer_assigned_id: &str,
        line_id: Option<&str>,
        issue_date: Option<NaiveDate>,
    ) -> &mut Self {
        if !gate(self.profile, reference_feature(kind), kind.element()) {
            return self;
        }
        match self.item.agreement.reference_mut(kind) {
            Some(slot) => *slot = factory::referenced_document(Some(issuer_assigned_id), line_id, issue_date),
            None => log::warn!("{} is not a line-level reference", kind.element()),
        }
        self
    }

    pub fn add_additional_referenced_document(&mut self, reference: &AdditionalReference) -> &mut Self {
        if allowed(self.profile, Feature::AdditionalReferences, "additional referenced document") {
            self.item
                .agreement
                .additional_references
                .extend(factory::additional_referenced_document(reference));
        }
        self
    }

    pub fn add_additional_referenced_document_from_file(
        &mut self,
        reference: &AdditionalReference,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, OrderError> {
        let attachment = factory::attachment_from_file(path, self.settings)?;
        let reference = AdditionalReference {
            attachment: Some(attachment),
            ..reference.clone()
        };
        Ok(self.add_additional_referenced_document(&reference))
    }

    pub fn set_gross_price(
        &mut self,
        amount: Decimal,
        basis_quantity: Option<Decimal>,
        basis_quantity_unit: Option<&str>,
    ) -> &mut Self {
        self.item.agreement.gross_price =
            factory::trade_price(Some(amount), basis_quantity, basis_quantity_unit);
        self
    }

    pub fn add_gross_price_allowance_charge(&mut self, allowance_charge: &AllowanceChargeInfo) -> &mut Self {
        if !allowed(self.profile, Feature::GrossPriceAllowanceCharges, "gross price allowance/charge") {
            return self;
        }
        match self.item.agreement.gross_price.as_mut() {
            Some(price) => price
                .allowance_charges
                .extend(factory::allowance_charge(allowance_charge)),
            None => log::warn!(
                "ignoring gross price allowance/charge on position {}: no gross price set",
                self.item.document.line_id.value
            ),
        }
        self
    }

    pub fn set_net_price(
        &mut self,
        amount: Decimal,
        basis_quantity: Option<Decimal>,
        basis_quantity_unit: Option<&str>,
    ) -> &mut Self {
        self.item.agreement.net_price = factory::trade_price(Some(amount), basis_quantity, basis_quantity_unit);
        self
    }

    pub fn set_net_price_tax(&mut self, tax: &TaxInfo) -> &mut Self {
        if !allowed(self.profile, Feature::PositionTax, "net price tax") {
            return self;
        }
        match self.item.agreement.net_price.as_mut() {
            Some(price) => price.included_tax = factory::trade_tax(tax),
            None => log::warn!(
                "ignoring net price tax on position {}: no net price set",
                self.item.document.line_id.value
            ),
        }
        self
    }

    /// Requested quantity.
    pub fn set_quantity(&mut self, quantity: Decimal, unit_code: &str) -> &mut Self {
        self.item.delivery.requested_quantity = nodes::quantity(Some(quantity), non_empty(unit_code));
        self
    }

    pub fn set_package_quantity(&mut self, quantity: Decimal, unit_code: &str) -> &mut Self {
        self.item.delivery.package_quantity = nodes::quantity(Some(quantity), non_empty(unit_code));
        self
    }

    pub fn set_per_package_quantity(&mut self, quantity: Decimal, unit_code: &str) -> &mut Self {
        self.item.delivery.per_package_unit_quantity = nodes::quantity(Some(quantity), non_empty(unit_code));
        self
    }

    pub fn set_agreed_quantity(&mut self, quantity: Decimal, unit_code: &str) -> &mut Self {
        self.item.delivery.agreed_quantity = nodes::quantity(Some(quantity), non_empty(unit_code));
        self
    }

    pub fn set_partial_delivery_allowed(&mut self, allowed: bool) -> &mut Self {
        self.item.delivery.partial_delivery_allowed = nodes::indicator(Some(allowed));
        self
    }

    pub fn set_requested_delivery(
        &mut self,
        occurrence: Option<NaiveDate>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &mut Self {
        self.item.delivery.requested_delivery = factory::supply_chain_event(occurrence, start, end);
        self
    }

    pub fn set_requested_despatch(
        &mut self,
        occurrence: Option<NaiveDate>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &mut Self {
        if allowed(self.profile, Feature::RequestedDespatch, "requested despatch") {
            self.item.delivery.requested_despatch = factory::supply_chain_event(occurrence, start, end);
        }
        self
    }

    pub fn set_tax(&mut self, tax: &TaxInfo) -> &mut Self {
        if allowed(self.profile, Feature::PositionTax, "position tax") {
            self.item.settlement.tax = factory::trade_tax(tax);
        }
        self
    }

    pub fn add_allowance_charge(&mut self, allowance_charge: &AllowanceChargeInfo) -> &mut Self {
        self.item
            .settlement
            .allowance_charges
            .extend(factory::allowance_charge(allowance_charge));
        self
    }

    pub fn set_summation(&mut self, line_total: Decimal, total_allowance_charge: Option<Decimal>) -> &mut Self {
        self.item.settlement.summation = factory::line_summation(Some(line_total), total_allowance_charge);
        self
    }

    pub fn add_receivable_accounting_account(&mut self, id: &str, type_code: Option<&str>) -> &mut Self {
        if allowed(self.profile, Feature::AccountingAccounts, "receivable accounting account") {
            self.item
                .settlement
                .accounting_accounts
                .extend(factory::accounting_account(Some(id), type_code));
        }
        self
    }
}
