use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::mapper::from_xml;
use super::resolver::resolve;
use crate::core::nodes::{
    DateTimeType, FormattedDateTimeType, IdType, NoteType, QuantityType, TextType,
};
use crate::core::*;

/// Cursors over document-level repeating groups.
#[derive(Debug, Default)]
struct DocumentCursors {
    notes: Cursor,
    contacts: [Cursor; 6],
    additional_references: Cursor,
    payment_means: Cursor,
    taxes: Cursor,
    allowance_charges: Cursor,
    logistics_service_charges: Cursor,
    payment_terms: Cursor,
    accounting_accounts: Cursor,
}

/// Cursors scoped to the current position. Replaced as a whole whenever
/// the position cursor moves.
#[derive(Debug, Default)]
struct PositionCursors {
    notes: Cursor,
    characteristics: Cursor,
    classifications: Cursor,
    instances: Cursor,
    referenced_products: Cursor,
    additional_references: Cursor,
    gross_price_allowance_charges: Cursor,
    allowance_charges: Cursor,
    accounting_accounts: Cursor,
}

/// Reads an Order-X document and exposes it as flat records.
///
/// Repeating groups can be walked two ways: with the `first_*`/`next_*`/
/// `get_*` cursor methods, or with plain iterators such as
/// [`OrderDocumentReader::positions`]. Both produce the same records.
#[derive(Debug)]
pub struct OrderDocumentReader {
    document: OrderDocument,
    profile: Profile,
    cursors: DocumentCursors,
    position: Cursor,
    position_cursors: PositionCursors,
}

impl OrderDocumentReader {
    /// Read a document from XML text. The profile is resolved first, so
    /// foreign XML fails with `UnknownXmlContent` or `UnknownProfile`.
    pub fn read_content(xml: &str) -> Result<Self, OrderError> {
        let (profile, _) = resolve(xml)?;
        let document = from_xml(xml)?;
        Ok(Self {
            document,
            profile,
            cursors: DocumentCursors::default(),
            position: Cursor::new(),
            position_cursors: PositionCursors::default(),
        })
    }

    /// Read a document from raw bytes (UTF-8, optional BOM).
    pub fn read_bytes(bytes: &[u8]) -> Result<Self, OrderError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| OrderError::Xml(format!("document is not UTF-8: {e}")))?;
        Self::read_content(xml)
    }

    /// Read a document from a file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, OrderError> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("reading Order-X document from {}", path.as_ref().display());
        Self::read_bytes(&bytes)
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn profile_descriptor(&self) -> &'static ProfileDescriptor {
        self.profile.descriptor()
    }

    /// The underlying document model.
    pub fn document(&self) -> &OrderDocument {
        &self.document
    }

    pub fn into_document(self) -> OrderDocument {
        self.document
    }

    /// Validate the document with the built-in rules.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.validate_with(&ProfileRulesValidator)
    }

    pub fn validate_with(&self, validator: &dyn DocumentValidator) -> Vec<ValidationError> {
        validator.validate(&self.document)
    }

    // -----------------------------------------------------------------------
    // Header
    // -----------------------------------------------------------------------

    pub fn get_document_information(&self) -> Result<DocumentInformation, OrderError> {
        let h = &self.document.header;
        Ok(DocumentInformation {
            document_no: id_value(h.id.as_ref()),
            document_type_code: h.type_code.as_ref().map(|c| c.value.clone()).unwrap_or_default(),
            document_date: parse_date(h.issue_date_time.as_ref())?,
            currency: self
                .document
                .settlement
                .currency_code
                .as_ref()
                .map(|c| c.value.clone())
                .unwrap_or_default(),
            document_name: h.name.as_ref().map(|t| t.value.clone()),
            language: h.language_id.as_ref().map(|i| i.value.clone()),
            purpose_code: h.purpose_code.as_ref().map(|c| c.value.clone()),
            requested_response_type_code: h
                .requested_response_type_code
                .as_ref()
                .map(|c| c.value.clone()),
        })
    }

    pub fn get_document_is_test(&self) -> bool {
        self.document
            .context
            .test_indicator
            .is_some_and(|i| i.indicator)
    }

    pub fn get_document_is_copy(&self) -> bool {
        self.document
            .header
            .copy_indicator
            .is_some_and(|i| i.indicator)
    }

    pub fn get_document_business_process(&self) -> Option<String> {
        self.document
            .context
            .business_process
            .as_ref()
            .map(|i| i.value.clone())
    }

    pub fn get_document_buyer_reference(&self) -> Option<String> {
        self.document
            .agreement
            .buyer_reference
            .as_ref()
            .map(|t| t.value.clone())
    }

    pub fn first_document_note(&mut self) -> bool {
        self.cursors.notes.first(self.document.header.notes.len())
    }

    pub fn next_document_note(&mut self) -> bool {
        self.cursors.notes.next(self.document.header.notes.len())
    }

    pub fn get_document_note(&self) -> Result<DocumentNote, OrderError> {
        self.cursors
            .notes
            .get(&self.document.header.notes, "document note")
            .map(note_record)
    }

    pub fn document_notes(&self) -> impl Iterator<Item = DocumentNote> + '_ {
        self.document.header.notes.iter().map(note_record)
    }

    // -----------------------------------------------------------------------
    // Parties
    // -----------------------------------------------------------------------

    pub fn get_document_party(&self, role: PartyRole) -> Option<PartyInfo> {
        self.document.party(role).map(|p| PartyInfo {
            name: p.name.value.clone(),
            ids: p.ids.iter().map(|i| i.value.clone()).collect(),
            description: p.description.as_ref().map(|t| t.value.clone()),
        })
    }

    /// Global ids of a party, keyed by scheme.
    pub fn get_document_party_global_ids(&self, role: PartyRole) -> BTreeMap<String, String> {
        self.document
            .party(role)
            .map(|p| scheme_map(&p.global_ids))
            .unwrap_or_default()
    }

    /// Tax registrations of a party, keyed by tax type (e.g. `VA`, `FC`).
    pub fn get_document_party_tax_registrations(&self, role: PartyRole) -> BTreeMap<String, String> {
        self.document
            .party(role)
            .map(|p| {
                p.tax_registrations
                    .iter()
                    .map(|t| (t.id.scheme_id.clone().unwrap_or_default(), t.id.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_document_party_address(&self, role: PartyRole) -> Option<PostalAddress> {
        let a = self.document.party(role)?.address.as_ref()?;
        Some(PostalAddress {
            line_one: text_value(a.line_one.as_ref()),
            line_two: text_value(a.line_two.as_ref()),
            line_three: text_value(a.line_three.as_ref()),
            postcode: a.postcode.as_ref().map(|c| c.value.clone()),
            city: text_value(a.city.as_ref()),
            country: a.country_id.as_ref().map(|i| i.value.clone()),
            sub_division: text_value(a.country_sub_division.as_ref()),
        })
    }

    pub fn get_document_party_legal_organisation(&self, role: PartyRole) -> Option<LegalOrganisation> {
        let lo = self.document.party(role)?.legal_organization.as_ref()?;
        Some(LegalOrganisation {
            id: Some(lo.id.value.clone()),
            id_scheme: lo.id.scheme_id.clone(),
            trading_name: text_value(lo.trading_business_name.as_ref()),
        })
    }

    pub fn get_document_party_electronic_address(&self, role: PartyRole) -> Option<ElectronicAddress> {
        let uri = self.document.party(role)?.uri_communication.as_ref()?.uri_id.as_ref()?;
        Some(ElectronicAddress {
            uri: uri.value.clone(),
            uri_scheme: uri.scheme_id.clone(),
        })
    }

    fn party_contacts(&self, role: PartyRole) -> &[TradeContact] {
        self.document
            .party(role)
            .map(|p| p.contacts.as_slice())
            .unwrap_or_default()
    }

    pub fn first_document_party_contact(&mut self, role: PartyRole) -> bool {
        let len = self.party_contacts(role).len();
        self.cursors.contacts[role.index()].first(len)
    }

    pub fn next_document_party_contact(&mut self, role: PartyRole) -> bool {
        let len = self.party_contacts(role).len();
        self.cursors.contacts[role.index()].next(len)
    }

    pub fn get_document_party_contact(&self, role: PartyRole) -> Result<ContactInfo, OrderError> {
        self.cursors.contacts[role.index()]
            .get(self.party_contacts(role), contact_collection(role))
            .map(contact_record)
    }

    pub fn document_party_contacts(&self, role: PartyRole) -> impl Iterator<Item = ContactInfo> + '_ {
        self.party_contacts(role).iter().map(contact_record)
    }

    // -----------------------------------------------------------------------
    // Agreement
    // -----------------------------------------------------------------------

    pub fn get_document_delivery_terms(&self) -> Option<DeliveryTermsInfo> {
        let dt = self.document.agreement.delivery_terms.as_ref()?;
        Some(DeliveryTermsInfo {
            code: dt.delivery_type_code.value.clone(),
            description: text_value(dt.description.as_ref()),
            function_code: dt.function_code.as_ref().map(|c| c.value.clone()),
            location_id: dt.location_id.as_ref().map(|i| i.value.clone()),
            location_name: text_value(dt.location_name.as_ref()),
        })
    }

    /// A single-valued document-level reference (seller order, quotation, ...).
    pub fn get_document_reference(
        &self,
        kind: ReferenceKind,
    ) -> Result<Option<ReferencedDocumentInfo>, OrderError> {
        self.document
            .agreement
            .reference(kind)
            .map(reference_record)
            .transpose()
    }

    pub fn first_document_additional_referenced_document(&mut self) -> bool {
        let len = self.document.agreement.additional_references.len();
        self.cursors.additional_references.first(len)
    }

    pub fn next_document_additional_referenced_document(&mut self) -> bool {
        let len = self.document.agreement.additional_references.len();
        self.cursors.additional_references.next(len)
    }

    pub fn get_document_additional_referenced_document(&self) -> Result<AdditionalReference, OrderError> {
        let r = self.cursors.additional_references.get(
            &self.document.agreement.additional_references,
            "document additional referenced document",
        )?;
        additional_reference_record(r)
    }

    /// Write the binary attachment of the current additional referenced
    /// document into `dir`, named after its `filename` attribute. Returns
    /// the written path, or `None` when the reference has no attachment.
    pub fn write_document_additional_referenced_document_attachment(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>, OrderError> {
        let r = self.cursors.additional_references.get(
            &self.document.agreement.additional_references,
            "document additional referenced document",
        )?;
        let Some(bin) = &r.attachment else {
            return Ok(None);
        };
        // Only the final component of the attribute is used.
        let name = Path::new(&bin.filename)
            .file_name()
            .ok_or_else(|| OrderError::Xml(format!("invalid attachment filename '{}'", bin.filename)))?;
        let target = dir.as_ref().join(name);
        std::fs::write(&target, &bin.data)?;
        log::debug!("wrote attachment {} ({} bytes)", target.display(), bin.data.len());
        Ok(Some(target))
    }

    pub fn document_additional_referenced_documents(
        &self,
    ) -> impl Iterator<Item = Result<AdditionalReference, OrderError>> + '_ {
        self.document
            .agreement
            .additional_references
            .iter()
            .map(additional_reference_record)
    }

    pub fn get_document_procuring_project(&self) -> Option<ProcuringProjectInfo> {
        let pp = self.document.agreement.procuring_project.as_ref()?;
        Some(ProcuringProjectInfo {
            id: pp.id.value.clone(),
            name: text_value(pp.name.as_ref()),
        })
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    pub fn get_document_requested_delivery(&self) -> Result<Option<SupplyChainEventInfo>, OrderError> {
        self.document
            .delivery
            .requested_delivery
            .as_ref()
            .map(event_record)
            .transpose()
    }

    pub fn get_document_requested_despatch(&self) -> Result<Option<SupplyChainEventInfo>, OrderError> {
        self.document
            .delivery
            .requested_despatch
            .as_ref()
            .map(event_record)
            .transpose()
    }

    // -----------------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------------

    pub fn first_document_payment_means(&mut self) -> bool {
        let len = self.document.settlement.payment_means.len();
        self.cursors.payment_means.first(len)
    }

    pub fn next_document_payment_means(&mut self) -> bool {
        let len = self.document.settlement.payment_means.len();
        self.cursors.payment_means.next(len)
    }

    pub fn get_document_payment_means(&self) -> Result<PaymentMeansInfo, OrderError> {
        let pm = self
            .cursors
            .payment_means
            .get(&self.document.settlement.payment_means, "payment means")?;
        Ok(PaymentMeansInfo {
            type_code: pm.type_code.value.clone(),
            information: text_value(pm.information.as_ref()),
        })
    }

    pub fn first_document_tax(&mut self) -> bool {
        self.cursors.taxes.first(self.document.settlement.taxes.len())
    }

    pub fn next_document_tax(&mut self) -> bool {
        self.cursors.taxes.next(self.document.settlement.taxes.len())
    }

    pub fn get_document_tax(&self) -> Result<TaxInfo, OrderError> {
        self.cursors
            .taxes
            .get(&self.document.settlement.taxes, "document tax")
            .map(tax_record)
    }

    pub fn document_taxes(&self) -> impl Iterator<Item = TaxInfo> + '_ {
        self.document.settlement.taxes.iter().map(tax_record)
    }

    pub fn first_document_allowance_charge(&mut self) -> bool {
        let len = self.document.settlement.allowance_charges.len();
        self.cursors.allowance_charges.first(len)
    }

    pub fn next_document_allowance_charge(&mut self) -> bool {
        let len = self.document.settlement.allowance_charges.len();
        self.cursors.allowance_charges.next(len)
    }

    pub fn get_document_allowance_charge(&self) -> Result<AllowanceChargeInfo, OrderError> {
        self.cursors
            .allowance_charges
            .get(&self.document.settlement.allowance_charges, "document allowance/charge")
            .map(allowance_charge_record)
    }

    pub fn document_allowance_charges(&self) -> impl Iterator<Item = AllowanceChargeInfo> + '_ {
        self.document
            .settlement
            .allowance_charges
            .iter()
            .map(allowance_charge_record)
    }

    pub fn first_document_logistics_service_charge(&mut self) -> bool {
        let len = self.document.settlement.logistics_service_charges.len();
        self.cursors.logistics_service_charges.first(len)
    }

    pub fn next_document_logistics_service_charge(&mut self) -> bool {
        let len = self.document.settlement.logistics_service_charges.len();
        self.cursors.logistics_service_charges.next(len)
    }

    pub fn get_document_logistics_service_charge(&self) -> Result<LogisticsServiceChargeInfo, OrderError> {
        let lc = self.cursors.logistics_service_charges.get(
            &self.document.settlement.logistics_service_charges,
            "logistics service charge",
        )?;
        let tax = lc.applied_trade_tax.first();
        Ok(LogisticsServiceChargeInfo {
            description: lc.description.value.clone(),
            amount: lc.applied_amount.value,
            tax_category_code: tax.map(|t| t.category_code.value.clone()),
            tax_type_code: tax.and_then(|t| t.type_code.as_ref()).map(|c| c.value.clone()),
            tax_rate: tax.and_then(|t| t.rate_applicable_percent.as_ref()).map(|p| p.value),
        })
    }

    pub fn first_document_payment_term(&mut self) -> bool {
        let len = self.document.settlement.payment_terms.len();
        self.cursors.payment_terms.first(len)
    }

    pub fn next_document_payment_term(&mut self) -> bool {
        let len = self.document.settlement.payment_terms.len();
        self.cursors.payment_terms.next(len)
    }

    pub fn get_document_payment_term(&self) -> Result<PaymentTermInfo, OrderError> {
        let pt = self
            .cursors
            .payment_terms
            .get(&self.document.settlement.payment_terms, "payment term")?;
        Ok(PaymentTermInfo {
            description: pt.description.value.clone(),
        })
    }

    pub fn first_document_receivable_accounting_account(&mut self) -> bool {
        let len = self.document.settlement.accounting_accounts.len();
        self.cursors.accounting_accounts.first(len)
    }

    pub fn next_document_receivable_accounting_account(&mut self) -> bool {
        let len = self.document.settlement.accounting_accounts.len();
        self.cursors.accounting_accounts.next(len)
    }

    pub fn get_document_receivable_accounting_account(&self) -> Result<AccountingAccountInfo, OrderError> {
        self.cursors
            .accounting_accounts
            .get(
                &self.document.settlement.accounting_accounts,
                "document receivable accounting account",
            )
            .map(account_record)
    }

    pub fn get_document_summation(&self) -> Option<DocumentSummation> {
        let s = self.document.settlement.summation.as_ref()?;
        Some(DocumentSummation {
            line_total: s.line_total_amount.as_ref().map(|a| a.value),
            charge_total: s.charge_total_amount.as_ref().map(|a| a.value),
            allowance_total: s.allowance_total_amount.as_ref().map(|a| a.value),
            tax_basis_total: s.tax_basis_total_amount.as_ref().map(|a| a.value),
            tax_total: s.tax_total_amount.as_ref().map(|a| a.value),
            grand_total: s.grand_total_amount.value,
        })
    }

    // -----------------------------------------------------------------------
    // Positions
    // -----------------------------------------------------------------------

    /// Move to the first position. Every position-scoped cursor is reset.
    pub fn first_document_position(&mut self) -> bool {
        self.position_cursors = PositionCursors::default();
        self.position.first(self.document.positions.len())
    }

    /// Move to the next position. Every position-scoped cursor is reset.
    pub fn next_document_position(&mut self) -> bool {
        self.position_cursors = PositionCursors::default();
        self.position.next(self.document.positions.len())
    }

    fn current_position(&self) -> Result<&LineItem, OrderError> {
        self.position.get(&self.document.positions, "position")
    }

    fn current_product(&self) -> Option<&TradeProduct> {
        self.current_position().ok()?.product.as_ref()
    }

    /// View of the current position.
    pub fn current_position_view(&self) -> Result<PositionView<'_>, OrderError> {
        Ok(PositionView {
            item: self.current_position()?,
        })
    }

    /// All positions in document order.
    pub fn positions(&self) -> impl Iterator<Item = PositionView<'_>> + '_ {
        self.document.positions.iter().map(|item| PositionView { item })
    }

    pub fn get_document_position_general_details(&self) -> Result<PositionGeneralDetails, OrderError> {
        Ok(self.current_position_view()?.general_details())
    }

    pub fn first_document_position_note(&mut self) -> bool {
        let len = self.current_position().map_or(0, |p| p.document.notes.len());
        self.position_cursors.notes.first(len)
    }

    pub fn next_document_position_note(&mut self) -> bool {
        let len = self.current_position().map_or(0, |p| p.document.notes.len());
        self.position_cursors.notes.next(len)
    }

    pub fn get_document_position_note(&self) -> Result<DocumentNote, OrderError> {
        let p = self.current_position()?;
        self.position_cursors
            .notes
            .get(&p.document.notes, "position note")
            .map(note_record)
    }

    pub fn get_document_position_product_details(&self) -> Result<Option<ProductDetails>, OrderError> {
        Ok(self.current_position_view()?.product_details())
    }

    fn product_len(&self, f: impl Fn(&TradeProduct) -> usize) -> usize {
        self.current_product().map_or(0, f)
    }

    pub fn first_document_position_product_characteristic(&mut self) -> bool {
        let len = self.product_len(|p| p.characteristics.len());
        self.position_cursors.characteristics.first(len)
    }

    pub fn next_document_position_product_characteristic(&mut self) -> bool {
        let len = self.product_len(|p| p.characteristics.len());
        self.position_cursors.characteristics.next(len)
    }

    pub fn get_document_position_product_characteristic(&self) -> Result<ProductCharacteristicInfo, OrderError> {
        let items = self.current_product().map(|p| p.characteristics.as_slice());
        self.position_cursors
            .characteristics
            .get(items.unwrap_or_default(), "product characteristic")
            .map(characteristic_record)
    }

    pub fn first_document_position_product_classification(&mut self) -> bool {
        let len = self.product_len(|p| p.classifications.len());
        self.position_cursors.classifications.first(len)
    }

    pub fn next_document_position_product_classification(&mut self) -> bool {
        let len = self.product_len(|p| p.classifications.len());
        self.position_cursors.classifications.next(len)
    }

    pub fn get_document_position_product_classification(&self) -> Result<ProductClassificationInfo, OrderError> {
        let items = self.current_product().map(|p| p.classifications.as_slice());
        self.position_cursors
            .classifications
            .get(items.unwrap_or_default(), "product classification")
            .map(classification_record)
    }

    pub fn first_document_position_product_instance(&mut self) -> bool {
        let len = self.product_len(|p| p.instances.len());
        self.position_cursors.instances.first(len)
    }

    pub fn next_document_position_product_instance(&mut self) -> bool {
        let len = self.product_len(|p| p.instances.len());
        self.position_cursors.instances.next(len)
    }

    pub fn get_document_position_product_instance(&self) -> Result<ProductInstanceInfo, OrderError> {
        let items = self.current_product().map(|p| p.instances.as_slice());
        self.position_cursors
            .instances
            .get(items.unwrap_or_default(), "product instance")
            .map(instance_record)
    }

    pub fn first_document_position_product_referenced_product(&mut self) -> bool {
        let len = self.product_len(|p| p.referenced_products.len());
        self.position_cursors.referenced_products.first(len)
    }

    pub fn next_document_position_product_referenced_product(&mut self) -> bool {
        let len = self.product_len(|p| p.referenced_products.len());
        self.position_cursors.referenced_products.next(len)
    }

    pub fn get_document_position_product_referenced_product(&self) -> Result<ReferencedProductInfo, OrderError> {
        let items = self.current_product().map(|p| p.referenced_products.as_slice());
        self.position_cursors
            .referenced_products
            .get(items.unwrap_or_default(), "product referenced product")
            .map(referenced_product_record)
    }

    pub fn get_document_position_product_packaging(&self) -> Result<Option<PackagingInfo>, OrderError> {
        Ok(self.current_position_view()?.packaging())
    }

    pub fn get_document_position_product_origin_country(&self) -> Result<Option<String>, OrderError> {
        let p = self.current_position()?;
        Ok(p.product
            .as_ref()
            .and_then(|p| p.origin_country.as_ref())
            .map(|c| c.value.clone()))
    }

    /// A single-valued position-level reference (buyer order line, catalogue, ...).
    pub fn get_document_position_reference(
        &self,
        kind: ReferenceKind,
    ) -> Result<Option<ReferencedDocumentInfo>, OrderError> {
        self.current_position()?
            .agreement
            .reference(kind)
            .map(reference_record)
            .transpose()
    }

    pub fn first_document_position_additional_referenced_document(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.agreement.additional_references.len());
        self.position_cursors.additional_references.first(len)
    }

    pub fn next_document_position_additional_referenced_document(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.agreement.additional_references.len());
        self.position_cursors.additional_references.next(len)
    }

    pub fn get_document_position_additional_referenced_document(&self) -> Result<AdditionalReference, OrderError> {
        let p = self.current_position()?;
        let r = self.position_cursors.additional_references.get(
            &p.agreement.additional_references,
            "position additional referenced document",
        )?;
        additional_reference_record(r)
    }

    pub fn get_document_position_gross_price(&self) -> Result<Option<PriceInfo>, OrderError> {
        Ok(self.current_position()?.agreement.gross_price.as_ref().map(price_record))
    }

    fn gross_price_allowance_charges(&self) -> &[AllowanceCharge] {
        self.current_position()
            .ok()
            .and_then(|p| p.agreement.gross_price.as_ref())
            .map(|g| g.allowance_charges.as_slice())
            .unwrap_or_default()
    }

    pub fn first_document_gross_price_allowance_charge(&mut self) -> bool {
        let len = self.gross_price_allowance_charges().len();
        self.position_cursors.gross_price_allowance_charges.first(len)
    }

    pub fn next_document_gross_price_allowance_charge(&mut self) -> bool {
        let len = self.gross_price_allowance_charges().len();
        self.position_cursors.gross_price_allowance_charges.next(len)
    }

    pub fn get_document_gross_price_allowance_charge(&self) -> Result<AllowanceChargeInfo, OrderError> {
        self.position_cursors
            .gross_price_allowance_charges
            .get(self.gross_price_allowance_charges(), "gross price allowance/charge")
            .map(allowance_charge_record)
    }

    pub fn get_document_position_net_price(&self) -> Result<Option<PriceInfo>, OrderError> {
        Ok(self.current_position()?.agreement.net_price.as_ref().map(price_record))
    }

    pub fn get_document_position_net_price_tax(&self) -> Result<Option<TaxInfo>, OrderError> {
        Ok(self
            .current_position()?
            .agreement
            .net_price
            .as_ref()
            .and_then(|n| n.included_tax.as_ref())
            .map(tax_record))
    }

    pub fn get_document_position_quantities(&self) -> Result<PositionQuantities, OrderError> {
        Ok(self.current_position_view()?.quantities())
    }

    pub fn get_document_position_partial_delivery_allowed(&self) -> Result<Option<bool>, OrderError> {
        Ok(self
            .current_position()?
            .delivery
            .partial_delivery_allowed
            .map(|i| i.indicator))
    }

    pub fn get_document_position_requested_delivery(&self) -> Result<Option<SupplyChainEventInfo>, OrderError> {
        self.current_position()?
            .delivery
            .requested_delivery
            .as_ref()
            .map(event_record)
            .transpose()
    }

    pub fn get_document_position_requested_despatch(&self) -> Result<Option<SupplyChainEventInfo>, OrderError> {
        self.current_position()?
            .delivery
            .requested_despatch
            .as_ref()
            .map(event_record)
            .transpose()
    }

    pub fn get_document_position_tax(&self) -> Result<Option<TaxInfo>, OrderError> {
        Ok(self.current_position()?.settlement.tax.as_ref().map(tax_record))
    }

    pub fn first_document_position_allowance_charge(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.settlement.allowance_charges.len());
        self.position_cursors.allowance_charges.first(len)
    }

    pub fn next_document_position_allowance_charge(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.settlement.allowance_charges.len());
        self.position_cursors.allowance_charges.next(len)
    }

    pub fn get_document_position_allowance_charge(&self) -> Result<AllowanceChargeInfo, OrderError> {
        let p = self.current_position()?;
        self.position_cursors
            .allowance_charges
            .get(&p.settlement.allowance_charges, "position allowance/charge")
            .map(allowance_charge_record)
    }

    pub fn get_document_position_summation(&self) -> Result<Option<LineSummation>, OrderError> {
        Ok(self.current_position_view()?.summation())
    }

    pub fn first_document_position_receivable_accounting_account(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.settlement.accounting_accounts.len());
        self.position_cursors.accounting_accounts.first(len)
    }

    pub fn next_document_position_receivable_accounting_account(&mut self) -> bool {
        let len = self
            .current_position()
            .map_or(0, |p| p.settlement.accounting_accounts.len());
        self.position_cursors.accounting_accounts.next(len)
    }

    pub fn get_document_position_receivable_accounting_account(&self) -> Result<AccountingAccountInfo, OrderError> {
        let p = self.current_position()?;
        self.position_cursors
            .accounting_accounts
            .get(
                &p.settlement.accounting_accounts,
                "position receivable accounting account",
            )
            .map(account_record)
    }
}

/// Borrowed view of one position with iterators over its repeating groups.
#[derive(Debug, Clone, Copy)]
pub struct PositionView<'a> {
    item: &'a LineItem,
}

impl<'a> PositionView<'a> {
    pub fn line_item(&self) -> &'a LineItem {
        self.item
    }

    pub fn general_details(&self) -> PositionGeneralDetails {
        let d = &self.item.document;
        PositionGeneralDetails {
            line_id: d.line_id.value.clone(),
            status_code: d.line_status_code.as_ref().map(|c| c.value.clone()),
            status_reason_code: d.line_status_reason_code.as_ref().map(|c| c.value.clone()),
        }
    }

    pub fn notes(&self) -> impl Iterator<Item = DocumentNote> + 'a {
        self.item.document.notes.iter().map(note_record)
    }

    pub fn product_details(&self) -> Option<ProductDetails> {
        let p = self.item.product.as_ref()?;
        let global = p.global_ids.first();
        Some(ProductDetails {
            name: p.name.value.clone(),
            description: text_value(p.description.as_ref()),
            seller_assigned_id: id_opt(p.seller_assigned_id.as_ref()),
            buyer_assigned_id: id_opt(p.buyer_assigned_id.as_ref()),
            global_id: global.map(|g| g.value.clone()),
            global_id_scheme: global.and_then(|g| g.scheme_id.clone()),
            industry_assigned_id: id_opt(p.industry_assigned_id.as_ref()),
            model_id: id_opt(p.model_id.as_ref()),
            batch_id: id_opt(p.batch_id.as_ref()),
            brand_name: text_value(p.brand_name.as_ref()),
            model_name: text_value(p.model_name.as_ref()),
        })
    }

    fn product_items<T>(&self, f: impl Fn(&'a TradeProduct) -> &'a [T]) -> &'a [T] {
        self.item.product.as_ref().map(f).unwrap_or_default()
    }

    pub fn characteristics(&self) -> impl Iterator<Item = ProductCharacteristicInfo> + 'a {
        self.product_items(|p| p.characteristics.as_slice())
            .iter()
            .map(characteristic_record)
    }

    pub fn classifications(&self) -> impl Iterator<Item = ProductClassificationInfo> + 'a {
        self.product_items(|p| p.classifications.as_slice())
            .iter()
            .map(classification_record)
    }

    pub fn instances(&self) -> impl Iterator<Item = ProductInstanceInfo> + 'a {
        self.product_items(|p| p.instances.as_slice()).iter().map(instance_record)
    }

    pub fn referenced_products(&self) -> impl Iterator<Item = ReferencedProductInfo> + 'a {
        self.product_items(|p| p.referenced_products.as_slice())
            .iter()
            .map(referenced_product_record)
    }

    pub fn packaging(&self) -> Option<PackagingInfo> {
        let pk = self.item.product.as_ref()?.packaging.as_ref()?;
        let unit = [&pk.width, &pk.length, &pk.height]
            .into_iter()
            .flatten()
            .map(|m| m.unit_code.clone())
            .find(|u| !u.is_empty());
        Some(PackagingInfo {
            type_code: pk.type_code.value.clone(),
            width: pk.width.as_ref().map(|m| m.value),
            length: pk.length.as_ref().map(|m| m.value),
            height: pk.height.as_ref().map(|m| m.value),
            unit_code: unit,
        })
    }

    pub fn additional_references(
        &self,
    ) -> impl Iterator<Item = Result<AdditionalReference, OrderError>> + 'a {
        self.item
            .agreement
            .additional_references
            .iter()
            .map(additional_reference_record)
    }

    pub fn gross_price_allowance_charges(&self) -> impl Iterator<Item = AllowanceChargeInfo> + 'a {
        self.item
            .agreement
            .gross_price
            .as_ref()
            .map(|g| g.allowance_charges.as_slice())
            .unwrap_or_default()
            .iter()
            .map(allowance_charge_record)
    }

    pub fn quantities(&self) -> PositionQuantities {
        let d = &self.item.delivery;
        PositionQuantities {
            requested: d.requested_quantity.as_ref().map(quantity_record),
            package: d.package_quantity.as_ref().map(quantity_record),
            per_package: d.per_package_unit_quantity.as_ref().map(quantity_record),
            agreed: d.agreed_quantity.as_ref().map(quantity_record),
        }
    }

    pub fn allowance_charges(&self) -> impl Iterator<Item = AllowanceChargeInfo> + 'a {
        self.item
            .settlement
            .allowance_charges
            .iter()
            .map(allowance_charge_record)
    }

    pub fn summation(&self) -> Option<LineSummation> {
        let s = self.item.settlement.summation.as_ref()?;
        Some(LineSummation {
            line_total: s.line_total_amount.value,
            total_allowance_charge: s.total_allowance_charge_amount.as_ref().map(|a| a.value),
        })
    }

    pub fn accounting_accounts(&self) -> impl Iterator<Item = AccountingAccountInfo> + 'a {
        self.item
            .settlement
            .accounting_accounts
            .iter()
            .map(account_record)
    }
}

// ---------------------------------------------------------------------------
// Record conversion, shared by cursors and iterators
// ---------------------------------------------------------------------------

fn contact_collection(role: PartyRole) -> &'static str {
    match role {
        PartyRole::Seller => "seller contact",
        PartyRole::Buyer => "buyer contact",
        PartyRole::BuyerRequisitioner => "buyer requisitioner contact",
        PartyRole::ShipTo => "ship-to contact",
        PartyRole::ShipFrom => "ship-from contact",
        PartyRole::Invoicee => "invoicee contact",
    }
}

fn text_value(t: Option<&TextType>) -> Option<String> {
    t.map(|t| t.value.clone())
}

fn id_opt(i: Option<&IdType>) -> Option<String> {
    i.map(|i| i.value.clone())
}

fn id_value(i: Option<&IdType>) -> String {
    id_opt(i).unwrap_or_default()
}

fn scheme_map(ids: &[IdType]) -> BTreeMap<String, String> {
    ids.iter()
        .map(|i| (i.scheme_id.clone().unwrap_or_default(), i.value.clone()))
        .collect()
}

/// Parse an optional date node. Unknown format codes and malformed values
/// are errors.
fn parse_date(d: Option<&DateTimeType>) -> Result<Option<NaiveDateTime>, OrderError> {
    d.map(DateTimeType::to_date_time).transpose()
}

fn parse_formatted_date(d: Option<&FormattedDateTimeType>) -> Result<Option<NaiveDateTime>, OrderError> {
    d.map(FormattedDateTimeType::to_date_time).transpose()
}

fn note_record(n: &NoteType) -> DocumentNote {
    DocumentNote {
        content: n.content.iter().map(|c| c.value.clone()).collect(),
        content_code: n.content_code.as_ref().map(|c| c.value.clone()),
        subject_code: n.subject_code.as_ref().map(|c| c.value.clone()),
    }
}

fn contact_record(c: &TradeContact) -> ContactInfo {
    let number = |u: Option<&UniversalCommunication>| {
        u.and_then(|u| u.complete_number.as_ref()).map(|t| t.value.clone())
    };
    ContactInfo {
        person_name: text_value(c.person_name.as_ref()),
        department_name: text_value(c.department_name.as_ref()),
        phone: number(c.telephone.as_ref()),
        fax: number(c.fax.as_ref()),
        email: c
            .email
            .as_ref()
            .and_then(|u| u.uri_id.as_ref())
            .map(|i| i.value.clone()),
        type_code: c.type_code.as_ref().map(|t| t.value.clone()),
    }
}

fn reference_record(r: &ReferencedDocument) -> Result<ReferencedDocumentInfo, OrderError> {
    Ok(ReferencedDocumentInfo {
        issuer_assigned_id: r.issuer_assigned_id.value.clone(),
        line_id: id_opt(r.line_id.as_ref()),
        issue_date: parse_formatted_date(r.issue_date.as_ref())?,
    })
}

fn additional_reference_record(r: &ReferencedDocument) -> Result<AdditionalReference, OrderError> {
    Ok(AdditionalReference {
        issuer_assigned_id: r.issuer_assigned_id.value.clone(),
        type_code: r.type_code.as_ref().map(|c| c.value.clone()),
        uri_id: id_opt(r.uri_id.as_ref()),
        line_id: id_opt(r.line_id.as_ref()),
        name: text_value(r.name.as_ref()),
        reference_type_code: r.reference_type_code.as_ref().map(|c| c.value.clone()),
        issue_date: parse_formatted_date(r.issue_date.as_ref())?.map(|d| d.date()),
        attachment: r.attachment.as_ref().map(|b| BinaryAttachment {
            data: b.data.clone(),
            mime_code: b.mime_code.clone(),
            filename: b.filename.clone(),
        }),
    })
}

fn event_record(e: &SupplyChainEvent) -> Result<SupplyChainEventInfo, OrderError> {
    let period = e.period.as_ref();
    Ok(SupplyChainEventInfo {
        occurrence: parse_date(e.occurrence.as_ref())?,
        start: parse_date(period.and_then(|p| p.start.as_ref()))?,
        end: parse_date(period.and_then(|p| p.end.as_ref()))?,
    })
}

fn tax_record(t: &TradeTax) -> TaxInfo {
    TaxInfo {
        category_code: t.category_code.value.clone(),
        type_code: t.type_code.as_ref().map(|c| c.value.clone()),
        basis_amount: t.basis_amount.as_ref().map(|a| a.value),
        calculated_amount: t.calculated_amount.as_ref().map(|a| a.value),
        rate: t.rate_applicable_percent.as_ref().map(|p| p.value),
        exemption_reason: text_value(t.exemption_reason.as_ref()),
        exemption_reason_code: t.exemption_reason_code.as_ref().map(|c| c.value.clone()),
    }
}

fn allowance_charge_record(ac: &AllowanceCharge) -> AllowanceChargeInfo {
    let tax = ac.category_trade_tax.as_ref();
    AllowanceChargeInfo {
        actual_amount: ac.actual_amount.value,
        is_charge: ac.charge_indicator.indicator,
        calculation_percent: ac.calculation_percent.as_ref().map(|p| p.value),
        basis_amount: ac.basis_amount.as_ref().map(|a| a.value),
        basis_quantity: ac.basis_quantity.as_ref().map(|q| q.value),
        basis_quantity_unit: ac
            .basis_quantity
            .as_ref()
            .map(|q| q.unit_code.clone())
            .filter(|u| !u.is_empty()),
        sequence: ac.sequence_numeric.as_ref().map(|n| n.value),
        reason_code: ac.reason_code.as_ref().map(|c| c.value.clone()),
        reason: text_value(ac.reason.as_ref()),
        tax_category_code: tax.map(|t| t.category_code.value.clone()),
        tax_type_code: tax.and_then(|t| t.type_code.as_ref()).map(|c| c.value.clone()),
        tax_rate: tax.and_then(|t| t.rate_applicable_percent.as_ref()).map(|p| p.value),
    }
}

fn account_record(a: &AccountingAccount) -> AccountingAccountInfo {
    AccountingAccountInfo {
        id: a.id.value.clone(),
        type_code: a.type_code.as_ref().map(|c| c.value.clone()),
    }
}

fn characteristic_record(c: &ProductCharacteristic) -> ProductCharacteristicInfo {
    ProductCharacteristicInfo {
        description: c.description.value.clone(),
        value: text_value(c.value.as_ref()),
        type_code: c.type_code.as_ref().map(|t| t.value.clone()),
        value_measure: c.value_measure.as_ref().map(|m| m.value),
        value_measure_unit: c
            .value_measure
            .as_ref()
            .map(|m| m.unit_code.clone())
            .filter(|u| !u.is_empty()),
    }
}

fn classification_record(c: &ProductClassification) -> ProductClassificationInfo {
    ProductClassificationInfo {
        class_code: c.class_code.value.clone(),
        list_id: c.class_code.list_id.clone(),
        list_version_id: c.class_code.list_version_id.clone(),
        class_name: text_value(c.class_name.as_ref()),
    }
}

fn instance_record(i: &ProductInstance) -> ProductInstanceInfo {
    ProductInstanceInfo {
        batch_id: id_opt(i.batch_id.as_ref()),
        serial_id: id_opt(i.serial_id.as_ref()),
    }
}

fn referenced_product_record(r: &ReferencedProduct) -> ReferencedProductInfo {
    let global = r.global_ids.first();
    ReferencedProductInfo {
        name: r.name.value.clone(),
        id: id_opt(r.id.as_ref()),
        global_id: global.map(|g| g.value.clone()),
        global_id_scheme: global.and_then(|g| g.scheme_id.clone()),
        seller_assigned_id: id_opt(r.seller_assigned_id.as_ref()),
        buyer_assigned_id: id_opt(r.buyer_assigned_id.as_ref()),
        industry_assigned_id: id_opt(r.industry_assigned_id.as_ref()),
        description: text_value(r.description.as_ref()),
        unit_quantity: r.unit_quantity.as_ref().map(|q| q.value),
        unit_code: r
            .unit_quantity
            .as_ref()
            .map(|q| q.unit_code.clone())
            .filter(|u| !u.is_empty()),
    }
}

fn price_record(p: &TradePrice) -> PriceInfo {
    PriceInfo {
        amount: p.charge_amount.value,
        basis_quantity: p.basis_quantity.as_ref().map(|q| q.value),
        basis_quantity_unit: p
            .basis_quantity
            .as_ref()
            .map(|q| q.unit_code.clone())
            .filter(|u| !u.is_empty()),
    }
}

fn quantity_record(q: &QuantityType) -> Quantity {
    Quantity {
        value: q.value,
        unit_code: q.unit_code.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{factory, nodes};
    use crate::xml::to_xml;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_xml() -> String {
        let mut doc = OrderDocument::new(Profile::Extended);
        doc.header.id = nodes::id(Some("PO-1"), None);
        doc.header.type_code = nodes::code(Some("220"));
        doc.header.issue_date_time = nodes::date_time(NaiveDate::from_ymd_opt(2024, 3, 1));
        doc.header.notes.push(nodes::note(Some("first"), None, None).unwrap());
        doc.header.notes.push(nodes::note(Some("second"), None, Some("AAI")).unwrap());
        doc.settlement.currency_code = nodes::code(Some("EUR"));

        let mut seller = factory::trade_party(Some("Seller"), None, None).unwrap();
        seller.global_ids.push(nodes::id(Some("4000001123452"), Some("0088")).unwrap());
        seller
            .tax_registrations
            .push(factory::tax_registration(Some("VA"), Some("DE123456789")).unwrap());
        seller.contacts.push(
            factory::trade_contact(&ContactInfo {
                person_name: Some("Ann".into()),
                email: Some("ann@seller.example".into()),
                ..Default::default()
            })
            .unwrap(),
        );
        doc.agreement.seller = Some(seller);
        let mut buyer = factory::trade_party(Some("Buyer"), None, None).unwrap();
        for name in ["Bob", "Bea"] {
            buyer.contacts.push(
                factory::trade_contact(&ContactInfo {
                    person_name: Some(name.into()),
                    ..Default::default()
                })
                .unwrap(),
            );
        }
        doc.agreement.buyer = Some(buyer);
        doc.agreement.quotation_reference =
            factory::referenced_document(Some("Q-9"), None, NaiveDate::from_ymd_opt(2024, 2, 1));
        doc.agreement.additional_references.push(
            factory::additional_referenced_document(&AdditionalReference {
                issuer_assigned_id: "SPEC-1".into(),
                type_code: Some("916".into()),
                attachment: Some(BinaryAttachment {
                    data: b"spec sheet".to_vec(),
                    mime_code: "text/plain".into(),
                    filename: "../spec.txt".into(),
                }),
                ..Default::default()
            })
            .unwrap(),
        );
        doc.delivery.requested_delivery =
            factory::supply_chain_event(None, NaiveDate::from_ymd_opt(2024, 3, 10), None);
        doc.settlement.summation = factory::header_summation(
            &DocumentSummation {
                grand_total: dec!(30),
                ..Default::default()
            },
            None,
        );

        let mut first = factory::line_item(Some("1")).unwrap();
        first.document.notes.push(nodes::note(Some("line note a"), None, None).unwrap());
        first.document.notes.push(nodes::note(Some("line note b"), None, None).unwrap());
        first.product = factory::trade_product(&ProductDetails {
            name: "Bolt".into(),
            ..Default::default()
        });
        if let Some(p) = first.product.as_mut() {
            p.characteristics.push(
                factory::product_characteristic(&ProductCharacteristicInfo {
                    description: "Length".into(),
                    value_measure: Some(dec!(12)),
                    value_measure_unit: Some("MMT".into()),
                    ..Default::default()
                })
                .unwrap(),
            );
        }
        first.delivery.requested_quantity = nodes::quantity(Some(dec!(3)), Some("C62"));
        first.settlement.summation = factory::line_summation(Some(dec!(30)), None);
        doc.positions.push(first);

        let mut second = factory::line_item(Some("2")).unwrap();
        second.product = factory::trade_product(&ProductDetails {
            name: "Nut".into(),
            ..Default::default()
        });
        second.agreement.catalogue_reference = factory::referenced_document(Some("CAT-7"), Some("12"), None);
        doc.positions.push(second);

        to_xml(&doc, &Settings::default()).unwrap()
    }

    fn reader() -> OrderDocumentReader {
        OrderDocumentReader::read_content(&sample_xml()).unwrap()
    }

    #[test]
    fn reads_header() {
        let r = reader();
        assert_eq!(r.profile(), Profile::Extended);
        let info = r.get_document_information().unwrap();
        assert_eq!(info.document_no, "PO-1");
        assert_eq!(info.document_type_code, "220");
        assert_eq!(info.currency, "EUR");
        assert_eq!(
            info.document_date.map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        let q = r.get_document_reference(ReferenceKind::Quotation).unwrap().unwrap();
        assert_eq!(q.issuer_assigned_id, "Q-9");
        assert!(r.get_document_reference(ReferenceKind::Contract).unwrap().is_none());
        let delivery = r.get_document_requested_delivery().unwrap().unwrap();
        assert!(delivery.occurrence.is_none());
        assert!(delivery.start.is_some());
        assert!(delivery.end.is_none());
    }

    #[test]
    fn note_cursor_walks_and_stops() {
        let mut r = reader();
        assert!(matches!(
            r.get_document_note(),
            Err(OrderError::OutOfRange { index: None, .. })
        ));
        assert!(r.first_document_note());
        assert_eq!(r.get_document_note().unwrap().content, vec!["first"]);
        assert!(r.next_document_note());
        assert_eq!(r.get_document_note().unwrap().subject_code.as_deref(), Some("AAI"));
        assert!(!r.next_document_note());
        assert!(matches!(
            r.get_document_note(),
            Err(OrderError::OutOfRange { index: Some(2), len: 2, .. })
        ));
        assert!(r.first_document_note());
        assert_eq!(r.get_document_note().unwrap().content, vec!["first"]);
    }

    #[test]
    fn contact_cursors_are_per_role() {
        let mut r = reader();
        assert!(r.first_document_party_contact(PartyRole::Buyer));
        assert!(r.next_document_party_contact(PartyRole::Buyer));
        assert_eq!(
            r.get_document_party_contact(PartyRole::Buyer).unwrap().person_name.as_deref(),
            Some("Bea")
        );
        assert!(r.first_document_party_contact(PartyRole::Seller));
        assert_eq!(
            r.get_document_party_contact(PartyRole::Seller).unwrap().email.as_deref(),
            Some("ann@seller.example")
        );
        assert_eq!(
            r.get_document_party_contact(PartyRole::Buyer).unwrap().person_name.as_deref(),
            Some("Bea")
        );
        assert!(!r.first_document_party_contact(PartyRole::ShipTo));
    }

    #[test]
    fn party_maps_are_keyed_by_scheme() {
        let r = reader();
        let ids = r.get_document_party_global_ids(PartyRole::Seller);
        assert_eq!(ids.get("0088").map(String::as_str), Some("4000001123452"));
        let tax = r.get_document_party_tax_registrations(PartyRole::Seller);
        assert_eq!(tax.get("VA").map(String::as_str), Some("DE123456789"));
        assert!(r.get_document_party_global_ids(PartyRole::Invoicee).is_empty());
    }

    #[test]
    fn position_cursors_reset_on_position_change() {
        let mut r = reader();
        assert!(r.get_document_position_general_details().is_err());
        assert!(r.next_document_position());
        assert_eq!(r.get_document_position_general_details().unwrap().line_id, "1");

        assert!(r.first_document_position_note());
        assert!(r.next_document_position_note());
        assert_eq!(r.get_document_position_note().unwrap().content, vec!["line note b"]);
        assert!(r.first_document_position_product_characteristic());
        let c = r.get_document_position_product_characteristic().unwrap();
        assert_eq!(c.value_measure, Some(dec!(12)));
        assert_eq!(c.value_measure_unit.as_deref(), Some("MMT"));

        assert!(r.next_document_position());
        assert_eq!(r.get_document_position_general_details().unwrap().line_id, "2");
        assert!(r.get_document_position_note().is_err());
        assert!(!r.first_document_position_note());
        assert!(!r.first_document_position_product_characteristic());
        let cat = r
            .get_document_position_reference(ReferenceKind::Catalogue)
            .unwrap()
            .unwrap();
        assert_eq!(cat.line_id.as_deref(), Some("12"));

        assert!(!r.next_document_position());
        assert!(r.get_document_position_product_details().is_err());
    }

    #[test]
    fn iterators_match_cursors() {
        let mut r = reader();
        let notes: Vec<_> = r.document_notes().collect();
        let mut walked = Vec::new();
        let mut more = r.first_document_note();
        while more {
            walked.push(r.get_document_note().unwrap());
            more = r.next_document_note();
        }
        assert_eq!(notes, walked);

        let positions: Vec<_> = r.positions().collect();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].notes().count(), 2);
        assert_eq!(positions[0].characteristics().count(), 1);
        assert_eq!(
            positions[0].quantities().requested,
            Some(Quantity { value: dec!(3), unit_code: "C62".into() })
        );
        assert_eq!(positions[0].summation().map(|s| s.line_total), Some(dec!(30)));
        assert_eq!(positions[1].product_details().map(|p| p.name).as_deref(), Some("Nut"));
    }

    #[test]
    fn attachment_is_written_by_file_name_only() {
        let mut r = reader();
        let dir = tempfile::tempdir().unwrap();
        assert!(r.write_document_additional_referenced_document_attachment(dir.path()).is_err());
        assert!(r.first_document_additional_referenced_document());
        let path = r
            .write_document_additional_referenced_document_attachment(dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("spec.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"spec sheet");
    }

    #[test]
    fn malformed_date_is_an_error() {
        let xml = sample_xml().replace(">20240310<", ">20241350<");
        let r = OrderDocumentReader::read_content(&xml).unwrap();
        assert!(matches!(
            r.get_document_requested_delivery(),
            Err(OrderError::InvalidDate { .. })
        ));
    }

    #[test]
    fn unknown_date_format_is_an_error() {
        let xml = sample_xml().replacen(r#"format="102">20240301"#, r#"format="999">20240301"#, 1);
        let r = OrderDocumentReader::read_content(&xml).unwrap();
        assert!(matches!(
            r.get_document_information(),
            Err(OrderError::UnknownDateFormat(_))
        ));
    }

    #[test]
    fn bytes_with_bom_and_foreign_content() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(sample_xml().as_bytes());
        assert!(OrderDocumentReader::read_bytes(&bytes).is_ok());
        assert!(matches!(
            OrderDocumentReader::read_content("<Invoice/>"),
            Err(OrderError::UnknownXmlContent)
        ));
    }

    #[test]
    fn validates_read_document() {
        let r = reader();
        let errors = r.validate();
        assert!(errors.iter().all(|e| e.rule.as_deref() != Some("OX-02")), "{errors:?}");
    }
}
