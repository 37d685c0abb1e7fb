use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::xml_utils::{XmlElement, XmlResult, XmlWriter, format_decimal};
use super::{ROOT_ELEMENT, ns};
use crate::core::nodes::{
    AmountType, CodeType, DateTimeType, FormattedDateTimeType, IdType, IndicatorType, MeasureType,
    NoteType, NumericType, PercentType, QuantityType, SpecifiedPeriod, TextType, binary_object,
};
use crate::core::*;

type Res = Result<(), OrderError>;

// ===========================================================================
// Writing
// ===========================================================================

/// Serialize an order document to Order-X XML.
pub fn to_xml(doc: &OrderDocument, settings: &Settings) -> XmlResult {
    let mut w = XmlWriter::new()?;
    let s = settings;

    w.start_element_with_attrs(
        "rsm:SCRDMCCBDACIOMessageStructure",
        &[
            ("xmlns:rsm", ns::RSM),
            ("xmlns:ram", ns::RAM),
            ("xmlns:udt", ns::UDT),
            ("xmlns:qdt", ns::QDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element("rsm:ExchangedDocumentContext")?;
    indicator(&mut w, "ram:TestIndicator", doc.context.test_indicator.as_ref())?;
    if let Some(bp) = &doc.context.business_process {
        w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        id(&mut w, "ram:ID", Some(bp))?;
        w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
    }
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    id(&mut w, "ram:ID", Some(&doc.context.guideline))?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // --- ExchangedDocument ---
    let h = &doc.header;
    w.start_element("rsm:ExchangedDocument")?;
    id(&mut w, "ram:ID", h.id.as_ref())?;
    text(&mut w, "ram:Name", h.name.as_ref())?;
    code(&mut w, "ram:TypeCode", h.type_code.as_ref())?;
    date_time(&mut w, "ram:IssueDateTime", h.issue_date_time.as_ref())?;
    indicator(&mut w, "ram:CopyIndicator", h.copy_indicator.as_ref())?;
    id(&mut w, "ram:LanguageID", h.language_id.as_ref())?;
    code(&mut w, "ram:PurposeCode", h.purpose_code.as_ref())?;
    code(&mut w, "ram:RequestedResponseTypeCode", h.requested_response_type_code.as_ref())?;
    notes(&mut w, &h.notes)?;
    w.end_element("rsm:ExchangedDocument")?;

    // --- SupplyChainTradeTransaction ---
    w.start_element("rsm:SupplyChainTradeTransaction")?;
    for position in &doc.positions {
        line_item(&mut w, s, position)?;
    }

    let a = &doc.agreement;
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    text(&mut w, "ram:BuyerReference", a.buyer_reference.as_ref())?;
    party(&mut w, "ram:SellerTradeParty", a.seller.as_ref())?;
    party(&mut w, "ram:BuyerTradeParty", a.buyer.as_ref())?;
    party(&mut w, "ram:BuyerRequisitionerTradeParty", a.buyer_requisitioner.as_ref())?;
    if let Some(dt) = &a.delivery_terms {
        w.start_element("ram:ApplicableTradeDeliveryTerms")?;
        code(&mut w, "ram:DeliveryTypeCode", Some(&dt.delivery_type_code))?;
        text(&mut w, "ram:Description", dt.description.as_ref())?;
        code(&mut w, "ram:FunctionCode", dt.function_code.as_ref())?;
        if dt.location_id.is_some() || dt.location_name.is_some() {
            w.start_element("ram:RelevantTradeLocation")?;
            id(&mut w, "ram:ID", dt.location_id.as_ref())?;
            text(&mut w, "ram:Name", dt.location_name.as_ref())?;
            w.end_element("ram:RelevantTradeLocation")?;
        }
        w.end_element("ram:ApplicableTradeDeliveryTerms")?;
    }
    for kind in [
        ReferenceKind::SellerOrder,
        ReferenceKind::BuyerOrder,
        ReferenceKind::Quotation,
        ReferenceKind::Contract,
        ReferenceKind::Requisition,
    ] {
        referenced_document(&mut w, kind.element(), a.reference(kind))?;
    }
    for r in &a.additional_references {
        referenced_document(&mut w, "AdditionalReferencedDocument", Some(r))?;
    }
    for kind in [
        ReferenceKind::BlanketOrder,
        ReferenceKind::PreviousOrderChange,
        ReferenceKind::PreviousOrderResponse,
    ] {
        referenced_document(&mut w, kind.element(), a.reference(kind))?;
    }
    if let Some(pp) = &a.procuring_project {
        w.start_element("ram:SpecifiedProcuringProject")?;
        id(&mut w, "ram:ID", Some(&pp.id))?;
        text(&mut w, "ram:Name", pp.name.as_ref())?;
        w.end_element("ram:SpecifiedProcuringProject")?;
    }
    referenced_document(
        &mut w,
        ReferenceKind::UltimateCustomerOrder.element(),
        a.ultimate_customer_order_reference.as_ref(),
    )?;
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    let d = &doc.delivery;
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    party(&mut w, "ram:ShipToTradeParty", d.ship_to.as_ref())?;
    party(&mut w, "ram:ShipFromTradeParty", d.ship_from.as_ref())?;
    event(&mut w, "ram:RequestedDeliverySupplyChainEvent", d.requested_delivery.as_ref())?;
    event(&mut w, "ram:RequestedDespatchSupplyChainEvent", d.requested_despatch.as_ref())?;
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    let st = &doc.settlement;
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    code(&mut w, "ram:OrderCurrencyCode", st.currency_code.as_ref())?;
    party(&mut w, "ram:InvoiceeTradeParty", st.invoicee.as_ref())?;
    for pm in &st.payment_means {
        w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
        code(&mut w, "ram:TypeCode", Some(&pm.type_code))?;
        text(&mut w, "ram:Information", pm.information.as_ref())?;
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }
    for tax in &st.taxes {
        trade_tax(&mut w, s, "ram:ApplicableTradeTax", tax)?;
    }
    for ac in &st.allowance_charges {
        allowance_charge(&mut w, s, "ram:SpecifiedTradeAllowanceCharge", ac)?;
    }
    for lc in &st.logistics_service_charges {
        w.start_element("ram:SpecifiedLogisticsServiceCharge")?;
        text(&mut w, "ram:Description", Some(&lc.description))?;
        amount(&mut w, "ram:AppliedAmount", Some(&lc.applied_amount), s.amount_decimals)?;
        for tax in &lc.applied_trade_tax {
            trade_tax(&mut w, s, "ram:AppliedTradeTax", tax)?;
        }
        w.end_element("ram:SpecifiedLogisticsServiceCharge")?;
    }
    for pt in &st.payment_terms {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        text(&mut w, "ram:Description", Some(&pt.description))?;
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }
    if let Some(sum) = &st.summation {
        let dp = s.amount_decimals;
        w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
        amount(&mut w, "ram:LineTotalAmount", sum.line_total_amount.as_ref(), dp)?;
        amount(&mut w, "ram:ChargeTotalAmount", sum.charge_total_amount.as_ref(), dp)?;
        amount(&mut w, "ram:AllowanceTotalAmount", sum.allowance_total_amount.as_ref(), dp)?;
        amount(&mut w, "ram:TaxBasisTotalAmount", sum.tax_basis_total_amount.as_ref(), dp)?;
        amount(&mut w, "ram:TaxTotalAmount", sum.tax_total_amount.as_ref(), dp)?;
        amount(&mut w, "ram:GrandTotalAmount", Some(&sum.grand_total_amount), dp)?;
        w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    }
    accounting_accounts(&mut w, &st.accounting_accounts)?;
    w.end_element("ram:ApplicableHeaderTradeSettlement")?;

    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:SCRDMCCBDACIOMessageStructure")?;

    let xml = w.into_string()?;
    log::debug!(
        "serialized Order-X document ({} positions, {} bytes)",
        doc.positions.len(),
        xml.len()
    );
    Ok(xml)
}

fn line_item(w: &mut XmlWriter, s: &Settings, item: &LineItem) -> Res {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    let ld = &item.document;
    w.start_element("ram:AssociatedDocumentLineDocument")?;
    id(w, "ram:LineID", Some(&ld.line_id))?;
    code(w, "ram:LineStatusCode", ld.line_status_code.as_ref())?;
    code(w, "ram:LineStatusReasonCode", ld.line_status_reason_code.as_ref())?;
    notes(w, &ld.notes)?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    if let Some(p) = &item.product {
        product(w, s, p)?;
    }

    let la = &item.agreement;
    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    for kind in [ReferenceKind::BuyerOrder, ReferenceKind::Quotation, ReferenceKind::Contract] {
        referenced_document(w, kind.element(), la.reference(kind))?;
    }
    for r in &la.additional_references {
        referenced_document(w, "AdditionalReferencedDocument", Some(r))?;
    }
    if let Some(gross) = &la.gross_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        price_body(w, s, gross)?;
        for ac in &gross.allowance_charges {
            allowance_charge(w, s, "ram:AppliedTradeAllowanceCharge", ac)?;
        }
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    if let Some(net) = &la.net_price {
        w.start_element("ram:NetPriceProductTradePrice")?;
        price_body(w, s, net)?;
        if let Some(tax) = &net.included_tax {
            trade_tax(w, s, "ram:IncludedTradeTax", tax)?;
        }
        w.end_element("ram:NetPriceProductTradePrice")?;
    }
    for kind in [
        ReferenceKind::Catalogue,
        ReferenceKind::BlanketOrder,
        ReferenceKind::UltimateCustomerOrder,
    ] {
        referenced_document(w, kind.element(), la.reference(kind))?;
    }
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    let dl = &item.delivery;
    let qd = s.quantity_decimals;
    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    indicator(w, "ram:PartialDeliveryAllowedIndicator", dl.partial_delivery_allowed.as_ref())?;
    quantity(w, "ram:RequestedQuantity", dl.requested_quantity.as_ref(), qd)?;
    quantity(w, "ram:PackageQuantity", dl.package_quantity.as_ref(), qd)?;
    quantity(w, "ram:PerPackageUnitQuantity", dl.per_package_unit_quantity.as_ref(), qd)?;
    quantity(w, "ram:AgreedQuantity", dl.agreed_quantity.as_ref(), qd)?;
    event(w, "ram:RequestedDeliverySupplyChainEvent", dl.requested_delivery.as_ref())?;
    event(w, "ram:RequestedDespatchSupplyChainEvent", dl.requested_despatch.as_ref())?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    let ls = &item.settlement;
    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    if let Some(tax) = &ls.tax {
        trade_tax(w, s, "ram:ApplicableTradeTax", tax)?;
    }
    for ac in &ls.allowance_charges {
        allowance_charge(w, s, "ram:SpecifiedTradeAllowanceCharge", ac)?;
    }
    if let Some(sum) = &ls.summation {
        w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
        amount(w, "ram:LineTotalAmount", Some(&sum.line_total_amount), s.amount_decimals)?;
        amount(
            w,
            "ram:TotalAllowanceChargeAmount",
            sum.total_allowance_charge_amount.as_ref(),
            s.amount_decimals,
        )?;
        w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    }
    accounting_accounts(w, &ls.accounting_accounts)?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

fn product(w: &mut XmlWriter, s: &Settings, p: &TradeProduct) -> Res {
    w.start_element("ram:SpecifiedTradeProduct")?;
    id(w, "ram:ID", p.id.as_ref())?;
    for gid in &p.global_ids {
        id(w, "ram:GlobalID", Some(gid))?;
    }
    id(w, "ram:SellerAssignedID", p.seller_assigned_id.as_ref())?;
    id(w, "ram:BuyerAssignedID", p.buyer_assigned_id.as_ref())?;
    id(w, "ram:IndustryAssignedID", p.industry_assigned_id.as_ref())?;
    id(w, "ram:ModelID", p.model_id.as_ref())?;
    text(w, "ram:Name", Some(&p.name))?;
    text(w, "ram:Description", p.description.as_ref())?;
    id(w, "ram:BatchID", p.batch_id.as_ref())?;
    text(w, "ram:BrandName", p.brand_name.as_ref())?;
    text(w, "ram:ModelName", p.model_name.as_ref())?;
    for c in &p.characteristics {
        w.start_element("ram:ApplicableProductCharacteristic")?;
        code(w, "ram:TypeCode", c.type_code.as_ref())?;
        text(w, "ram:Description", Some(&c.description))?;
        measure(w, "ram:ValueMeasure", c.value_measure.as_ref(), s.measure_decimals)?;
        text(w, "ram:Value", c.value.as_ref())?;
        w.end_element("ram:ApplicableProductCharacteristic")?;
    }
    for c in &p.classifications {
        w.start_element("ram:DesignatedProductClassification")?;
        code(w, "ram:ClassCode", Some(&c.class_code))?;
        text(w, "ram:ClassName", c.class_name.as_ref())?;
        w.end_element("ram:DesignatedProductClassification")?;
    }
    for i in &p.instances {
        w.start_element("ram:IndividualTradeProductInstance")?;
        id(w, "ram:BatchID", i.batch_id.as_ref())?;
        id(w, "ram:SerialID", i.serial_id.as_ref())?;
        w.end_element("ram:IndividualTradeProductInstance")?;
    }
    if let Some(pk) = &p.packaging {
        w.start_element("ram:ApplicableSupplyChainPackaging")?;
        code(w, "ram:TypeCode", Some(&pk.type_code))?;
        if pk.width.is_some() || pk.length.is_some() || pk.height.is_some() {
            let md = s.measure_decimals;
            w.start_element("ram:LinearSpatialDimension")?;
            measure(w, "ram:WidthMeasure", pk.width.as_ref(), md)?;
            measure(w, "ram:LengthMeasure", pk.length.as_ref(), md)?;
            measure(w, "ram:HeightMeasure", pk.height.as_ref(), md)?;
            w.end_element("ram:LinearSpatialDimension")?;
        }
        w.end_element("ram:ApplicableSupplyChainPackaging")?;
    }
    if let Some(country) = &p.origin_country {
        w.start_element("ram:OriginTradeCountry")?;
        id(w, "ram:ID", Some(country))?;
        w.end_element("ram:OriginTradeCountry")?;
    }
    for rp in &p.referenced_products {
        w.start_element("ram:IncludedReferencedProduct")?;
        id(w, "ram:ID", rp.id.as_ref())?;
        for gid in &rp.global_ids {
            id(w, "ram:GlobalID", Some(gid))?;
        }
        id(w, "ram:SellerAssignedID", rp.seller_assigned_id.as_ref())?;
        id(w, "ram:BuyerAssignedID", rp.buyer_assigned_id.as_ref())?;
        id(w, "ram:IndustryAssignedID", rp.industry_assigned_id.as_ref())?;
        text(w, "ram:Name", Some(&rp.name))?;
        text(w, "ram:Description", rp.description.as_ref())?;
        quantity(w, "ram:UnitQuantity", rp.unit_quantity.as_ref(), s.quantity_decimals)?;
        w.end_element("ram:IncludedReferencedProduct")?;
    }
    w.end_element("ram:SpecifiedTradeProduct")?;
    Ok(())
}

fn price_body(w: &mut XmlWriter, s: &Settings, price: &TradePrice) -> Res {
    amount(w, "ram:ChargeAmount", Some(&price.charge_amount), s.unit_amount_decimals)?;
    quantity(w, "ram:BasisQuantity", price.basis_quantity.as_ref(), s.quantity_decimals)
}

fn party(w: &mut XmlWriter, name: &str, party: Option<&TradeParty>) -> Res {
    let Some(p) = party else { return Ok(()) };
    w.start_element(name)?;
    for pid in &p.ids {
        id(w, "ram:ID", Some(pid))?;
    }
    for gid in &p.global_ids {
        id(w, "ram:GlobalID", Some(gid))?;
    }
    text(w, "ram:Name", Some(&p.name))?;
    text(w, "ram:Description", p.description.as_ref())?;
    if let Some(lo) = &p.legal_organization {
        w.start_element("ram:SpecifiedLegalOrganization")?;
        id(w, "ram:ID", Some(&lo.id))?;
        text(w, "ram:TradingBusinessName", lo.trading_business_name.as_ref())?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }
    for c in &p.contacts {
        w.start_element("ram:DefinedTradeContact")?;
        text(w, "ram:PersonName", c.person_name.as_ref())?;
        text(w, "ram:DepartmentName", c.department_name.as_ref())?;
        code(w, "ram:TypeCode", c.type_code.as_ref())?;
        communication(w, "ram:TelephoneUniversalCommunication", c.telephone.as_ref())?;
        communication(w, "ram:FaxUniversalCommunication", c.fax.as_ref())?;
        communication(w, "ram:EmailURIUniversalCommunication", c.email.as_ref())?;
        w.end_element("ram:DefinedTradeContact")?;
    }
    if let Some(a) = &p.address {
        w.start_element("ram:PostalTradeAddress")?;
        code(w, "ram:PostcodeCode", a.postcode.as_ref())?;
        text(w, "ram:LineOne", a.line_one.as_ref())?;
        text(w, "ram:LineTwo", a.line_two.as_ref())?;
        text(w, "ram:LineThree", a.line_three.as_ref())?;
        text(w, "ram:CityName", a.city.as_ref())?;
        id(w, "ram:CountryID", a.country_id.as_ref())?;
        text(w, "ram:CountrySubDivisionName", a.country_sub_division.as_ref())?;
        w.end_element("ram:PostalTradeAddress")?;
    }
    communication(w, "ram:URIUniversalCommunication", p.uri_communication.as_ref())?;
    for tr in &p.tax_registrations {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        id(w, "ram:ID", Some(&tr.id))?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }
    w.end_element(name)?;
    Ok(())
}

fn communication(w: &mut XmlWriter, name: &str, uc: Option<&UniversalCommunication>) -> Res {
    let Some(uc) = uc else { return Ok(()) };
    w.start_element(name)?;
    id(w, "ram:URIID", uc.uri_id.as_ref())?;
    text(w, "ram:CompleteNumber", uc.complete_number.as_ref())?;
    w.end_element(name)?;
    Ok(())
}

/// `element` is the local name; the `ram:` prefix is added here.
fn referenced_document(w: &mut XmlWriter, element: &str, doc: Option<&ReferencedDocument>) -> Res {
    let Some(r) = doc else { return Ok(()) };
    let name = format!("ram:{element}");
    w.start_element(&name)?;
    id(w, "ram:IssuerAssignedID", Some(&r.issuer_assigned_id))?;
    id(w, "ram:URIID", r.uri_id.as_ref())?;
    id(w, "ram:LineID", r.line_id.as_ref())?;
    code(w, "ram:TypeCode", r.type_code.as_ref())?;
    text(w, "ram:Name", r.name.as_ref())?;
    if let Some(bin) = &r.attachment {
        w.text_element_with_attrs(
            "ram:AttachmentBinaryObject",
            &STANDARD.encode(&bin.data),
            &[("mimeCode", &bin.mime_code), ("filename", &bin.filename)],
        )?;
    }
    code(w, "ram:ReferenceTypeCode", r.reference_type_code.as_ref())?;
    if let Some(d) = &r.issue_date {
        w.start_element("ram:FormattedIssueDateTime")?;
        w.text_element_with_attrs("qdt:DateTimeString", &d.value, &[("format", &d.format)])?;
        w.end_element("ram:FormattedIssueDateTime")?;
    }
    w.end_element(&name)?;
    Ok(())
}

fn event(w: &mut XmlWriter, name: &str, ev: Option<&SupplyChainEvent>) -> Res {
    let Some(ev) = ev else { return Ok(()) };
    w.start_element(name)?;
    date_time(w, "ram:OccurrenceDateTime", ev.occurrence.as_ref())?;
    if let Some(period) = &ev.period {
        w.start_element("ram:OccurrenceSpecifiedPeriod")?;
        date_time(w, "ram:StartDateTime", period.start.as_ref())?;
        date_time(w, "ram:EndDateTime", period.end.as_ref())?;
        w.end_element("ram:OccurrenceSpecifiedPeriod")?;
    }
    w.end_element(name)?;
    Ok(())
}

fn trade_tax(w: &mut XmlWriter, s: &Settings, name: &str, tax: &TradeTax) -> Res {
    w.start_element(name)?;
    amount(w, "ram:CalculatedAmount", tax.calculated_amount.as_ref(), s.amount_decimals)?;
    code(w, "ram:TypeCode", tax.type_code.as_ref())?;
    text(w, "ram:ExemptionReason", tax.exemption_reason.as_ref())?;
    amount(w, "ram:BasisAmount", tax.basis_amount.as_ref(), s.amount_decimals)?;
    code(w, "ram:CategoryCode", Some(&tax.category_code))?;
    code(w, "ram:ExemptionReasonCode", tax.exemption_reason_code.as_ref())?;
    percent(w, "ram:RateApplicablePercent", tax.rate_applicable_percent.as_ref(), s.percent_decimals)?;
    w.end_element(name)?;
    Ok(())
}

fn allowance_charge(w: &mut XmlWriter, s: &Settings, name: &str, ac: &AllowanceCharge) -> Res {
    w.start_element(name)?;
    indicator(w, "ram:ChargeIndicator", Some(&ac.charge_indicator))?;
    if let Some(seq) = &ac.sequence_numeric {
        w.text_element("ram:SequenceNumeric", &format_decimal(seq.value, 0))?;
    }
    percent(w, "ram:CalculationPercent", ac.calculation_percent.as_ref(), s.percent_decimals)?;
    amount(w, "ram:BasisAmount", ac.basis_amount.as_ref(), s.amount_decimals)?;
    quantity(w, "ram:BasisQuantity", ac.basis_quantity.as_ref(), s.quantity_decimals)?;
    amount(w, "ram:ActualAmount", Some(&ac.actual_amount), s.amount_decimals)?;
    code(w, "ram:ReasonCode", ac.reason_code.as_ref())?;
    text(w, "ram:Reason", ac.reason.as_ref())?;
    if let Some(tax) = &ac.category_trade_tax {
        trade_tax(w, s, "ram:CategoryTradeTax", tax)?;
    }
    w.end_element(name)?;
    Ok(())
}

fn accounting_accounts(w: &mut XmlWriter, accounts: &[AccountingAccount]) -> Res {
    for acc in accounts {
        w.start_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
        id(w, "ram:ID", Some(&acc.id))?;
        code(w, "ram:TypeCode", acc.type_code.as_ref())?;
        w.end_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
    }
    Ok(())
}

fn notes(w: &mut XmlWriter, notes: &[NoteType]) -> Res {
    for note in notes {
        w.start_element("ram:IncludedNote")?;
        code(w, "ram:ContentCode", note.content_code.as_ref())?;
        for content in &note.content {
            text(w, "ram:Content", Some(content))?;
        }
        code(w, "ram:SubjectCode", note.subject_code.as_ref())?;
        w.end_element("ram:IncludedNote")?;
    }
    Ok(())
}

// --- leaf writers ----------------------------------------------------------

fn id(w: &mut XmlWriter, name: &str, v: Option<&IdType>) -> Res {
    if let Some(v) = v {
        let scheme = v.scheme_id.as_deref().unwrap_or_default();
        w.text_element_with_attrs(name, &v.value, &[("schemeID", scheme)])?;
    }
    Ok(())
}

fn text(w: &mut XmlWriter, name: &str, v: Option<&TextType>) -> Res {
    if let Some(v) = v {
        w.text_element(name, &v.value)?;
    }
    Ok(())
}

fn code(w: &mut XmlWriter, name: &str, v: Option<&CodeType>) -> Res {
    if let Some(v) = v {
        w.text_element_with_attrs(
            name,
            &v.value,
            &[
                ("listID", v.list_id.as_deref().unwrap_or_default()),
                ("listVersionID", v.list_version_id.as_deref().unwrap_or_default()),
            ],
        )?;
    }
    Ok(())
}

fn indicator(w: &mut XmlWriter, name: &str, v: Option<&IndicatorType>) -> Res {
    if let Some(v) = v {
        w.start_element(name)?;
        w.text_element("udt:Indicator", if v.indicator { "true" } else { "false" })?;
        w.end_element(name)?;
    }
    Ok(())
}

fn amount(w: &mut XmlWriter, name: &str, v: Option<&AmountType>, decimals: u32) -> Res {
    if let Some(v) = v {
        w.amount_element(name, v.value, &v.currency_id, decimals)?;
    }
    Ok(())
}

fn quantity(w: &mut XmlWriter, name: &str, v: Option<&QuantityType>, decimals: u32) -> Res {
    if let Some(v) = v {
        w.quantity_element(name, v.value, &v.unit_code, decimals)?;
    }
    Ok(())
}

fn measure(w: &mut XmlWriter, name: &str, v: Option<&MeasureType>, decimals: u32) -> Res {
    if let Some(v) = v {
        w.quantity_element(name, v.value, &v.unit_code, decimals)?;
    }
    Ok(())
}

fn percent(w: &mut XmlWriter, name: &str, v: Option<&PercentType>, decimals: u32) -> Res {
    if let Some(v) = v {
        w.text_element(name, &format_decimal(v.value, decimals))?;
    }
    Ok(())
}

fn date_time(w: &mut XmlWriter, name: &str, v: Option<&DateTimeType>) -> Res {
    if let Some(v) = v {
        w.start_element(name)?;
        w.text_element_with_attrs("udt:DateTimeString", &v.value, &[("format", &v.format)])?;
        w.end_element(name)?;
    }
    Ok(())
}

// ===========================================================================
// Reading
// ===========================================================================

/// Parse Order-X XML into the document model.
///
/// Element lookup uses local names, so any prefix binding is accepted. A
/// mandatory child that is missing reads as an empty value.
pub fn from_xml(xml: &str) -> Result<OrderDocument, OrderError> {
    let root = XmlElement::parse(xml)?;
    if root.name != ROOT_ELEMENT {
        return Err(OrderError::UnknownXmlContent);
    }
    let empty = XmlElement::default();
    let ctx = root.child("ExchangedDocumentContext").unwrap_or(&empty);
    let hdr = root.child("ExchangedDocument").unwrap_or(&empty);
    let tx = root.child("SupplyChainTradeTransaction").unwrap_or(&empty);

    let context = DocumentContext {
        test_indicator: read_indicator(ctx, "TestIndicator"),
        business_process: ctx
            .child("BusinessProcessSpecifiedDocumentContextParameter")
            .and_then(|e| read_id(e, "ID")),
        guideline: ctx
            .child("GuidelineSpecifiedDocumentContextParameter")
            .map(|e| req_id(e, "ID"))
            .unwrap_or_else(empty_id),
    };

    let header = ExchangedDocument {
        id: read_id(hdr, "ID"),
        name: read_text(hdr, "Name"),
        type_code: read_code(hdr, "TypeCode"),
        issue_date_time: read_date_time(hdr, "IssueDateTime"),
        copy_indicator: read_indicator(hdr, "CopyIndicator"),
        language_id: read_id(hdr, "LanguageID"),
        purpose_code: read_code(hdr, "PurposeCode"),
        requested_response_type_code: read_code(hdr, "RequestedResponseTypeCode"),
        notes: read_notes(hdr),
    };

    let positions = tx
        .children("IncludedSupplyChainTradeLineItem")
        .map(read_line_item)
        .collect::<Result<Vec<_>, _>>()?;

    let ag = tx.child("ApplicableHeaderTradeAgreement").unwrap_or(&empty);
    let agreement = HeaderTradeAgreement {
        buyer_reference: read_text(ag, "BuyerReference"),
        seller: read_party(ag, "SellerTradeParty"),
        buyer: read_party(ag, "BuyerTradeParty"),
        buyer_requisitioner: read_party(ag, "BuyerRequisitionerTradeParty"),
        delivery_terms: ag.child("ApplicableTradeDeliveryTerms").map(|e| DeliveryTerms {
            delivery_type_code: req_code(e, "DeliveryTypeCode"),
            description: read_text(e, "Description"),
            function_code: read_code(e, "FunctionCode"),
            location_id: e.child("RelevantTradeLocation").and_then(|l| read_id(l, "ID")),
            location_name: e.child("RelevantTradeLocation").and_then(|l| read_text(l, "Name")),
        }),
        seller_order_reference: read_reference(ag, ReferenceKind::SellerOrder.element())?,
        buyer_order_reference: read_reference(ag, ReferenceKind::BuyerOrder.element())?,
        quotation_reference: read_reference(ag, ReferenceKind::Quotation.element())?,
        contract_reference: read_reference(ag, ReferenceKind::Contract.element())?,
        requisition_reference: read_reference(ag, ReferenceKind::Requisition.element())?,
        additional_references: read_references(ag, "AdditionalReferencedDocument")?,
        blanket_order_reference: read_reference(ag, ReferenceKind::BlanketOrder.element())?,
        previous_order_change_reference: read_reference(ag, ReferenceKind::PreviousOrderChange.element())?,
        previous_order_response_reference: read_reference(ag, ReferenceKind::PreviousOrderResponse.element())?,
        procuring_project: ag.child("SpecifiedProcuringProject").map(|e| ProcuringProject {
            id: req_id(e, "ID"),
            name: read_text(e, "Name"),
        }),
        ultimate_customer_order_reference: read_reference(
            ag,
            ReferenceKind::UltimateCustomerOrder.element(),
        )?,
    };

    let dl = tx.child("ApplicableHeaderTradeDelivery").unwrap_or(&empty);
    let delivery = HeaderTradeDelivery {
        ship_to: read_party(dl, "ShipToTradeParty"),
        ship_from: read_party(dl, "ShipFromTradeParty"),
        requested_delivery: read_event(dl, "RequestedDeliverySupplyChainEvent"),
        requested_despatch: read_event(dl, "RequestedDespatchSupplyChainEvent"),
    };

    let st = tx.child("ApplicableHeaderTradeSettlement").unwrap_or(&empty);
    let settlement = HeaderTradeSettlement {
        currency_code: read_code(st, "OrderCurrencyCode"),
        invoicee: read_party(st, "InvoiceeTradeParty"),
        payment_means: st
            .children("SpecifiedTradeSettlementPaymentMeans")
            .map(|e| PaymentMeans {
                type_code: req_code(e, "TypeCode"),
                information: read_text(e, "Information"),
            })
            .collect(),
        taxes: st
            .children("ApplicableTradeTax")
            .map(read_trade_tax)
            .collect::<Result<_, _>>()?,
        allowance_charges: read_allowance_charges(st, "SpecifiedTradeAllowanceCharge")?,
        logistics_service_charges: st
            .children("SpecifiedLogisticsServiceCharge")
            .map(|e| {
                Ok(LogisticsServiceCharge {
                    description: req_text(e, "Description"),
                    applied_amount: req_amount(e, "AppliedAmount")?,
                    applied_trade_tax: e
                        .children("AppliedTradeTax")
                        .map(read_trade_tax)
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<_, OrderError>>()?,
        payment_terms: st
            .children("SpecifiedTradePaymentTerms")
            .map(|e| PaymentTerms {
                description: req_text(e, "Description"),
            })
            .collect(),
        summation: match st.child("SpecifiedTradeSettlementHeaderMonetarySummation") {
            Some(e) => Some(HeaderMonetarySummation {
                line_total_amount: read_amount(e, "LineTotalAmount")?,
                charge_total_amount: read_amount(e, "ChargeTotalAmount")?,
                allowance_total_amount: read_amount(e, "AllowanceTotalAmount")?,
                tax_basis_total_amount: read_amount(e, "TaxBasisTotalAmount")?,
                tax_total_amount: read_amount(e, "TaxTotalAmount")?,
                grand_total_amount: req_amount(e, "GrandTotalAmount")?,
            }),
            None => None,
        },
        accounting_accounts: read_accounts(st),
    };

    log::debug!(
        "parsed Order-X document '{}' with {} positions",
        header.id.as_ref().map(|i| i.value.as_str()).unwrap_or_default(),
        positions.len()
    );

    Ok(OrderDocument {
        context,
        header,
        positions,
        agreement,
        delivery,
        settlement,
    })
}

fn read_line_item(e: &XmlElement) -> Result<LineItem, OrderError> {
    let empty = XmlElement::default();
    let ld = e.child("AssociatedDocumentLineDocument").unwrap_or(&empty);
    let document = LineDocument {
        line_id: req_id(ld, "LineID"),
        line_status_code: read_code(ld, "LineStatusCode"),
        line_status_reason_code: read_code(ld, "LineStatusReasonCode"),
        notes: read_notes(ld),
    };

    let product = e.child("SpecifiedTradeProduct").map(read_product).transpose()?;

    let la = e.child("SpecifiedLineTradeAgreement").unwrap_or(&empty);
    let agreement = LineTradeAgreement {
        buyer_order_reference: read_reference(la, ReferenceKind::BuyerOrder.element())?,
        quotation_reference: read_reference(la, ReferenceKind::Quotation.element())?,
        contract_reference: read_reference(la, ReferenceKind::Contract.element())?,
        additional_references: read_references(la, "AdditionalReferencedDocument")?,
        gross_price: match la.child("GrossPriceProductTradePrice") {
            Some(p) => Some(TradePrice {
                allowance_charges: read_allowance_charges(p, "AppliedTradeAllowanceCharge")?,
                ..read_price(p)?
            }),
            None => None,
        },
        net_price: match la.child("NetPriceProductTradePrice") {
            Some(p) => Some(TradePrice {
                included_tax: p.child("IncludedTradeTax").map(read_trade_tax).transpose()?,
                ..read_price(p)?
            }),
            None => None,
        },
        catalogue_reference: read_reference(la, ReferenceKind::Catalogue.element())?,
        blanket_order_reference: read_reference(la, ReferenceKind::BlanketOrder.element())?,
        ultimate_customer_order_reference: read_reference(
            la,
            ReferenceKind::UltimateCustomerOrder.element(),
        )?,
    };

    let dl = e.child("SpecifiedLineTradeDelivery").unwrap_or(&empty);
    let delivery = LineTradeDelivery {
        partial_delivery_allowed: read_indicator(dl, "PartialDeliveryAllowedIndicator"),
        requested_quantity: read_quantity(dl, "RequestedQuantity")?,
        package_quantity: read_quantity(dl, "PackageQuantity")?,
        per_package_unit_quantity: read_quantity(dl, "PerPackageUnitQuantity")?,
        agreed_quantity: read_quantity(dl, "AgreedQuantity")?,
        requested_delivery: read_event(dl, "RequestedDeliverySupplyChainEvent"),
        requested_despatch: read_event(dl, "RequestedDespatchSupplyChainEvent"),
    };

    let ls = e.child("SpecifiedLineTradeSettlement").unwrap_or(&empty);
    let settlement = LineTradeSettlement {
        tax: ls.child("ApplicableTradeTax").map(read_trade_tax).transpose()?,
        allowance_charges: read_allowance_charges(ls, "SpecifiedTradeAllowanceCharge")?,
        summation: match ls.child("SpecifiedTradeSettlementLineMonetarySummation") {
            Some(s) => Some(LineMonetarySummation {
                line_total_amount: req_amount(s, "LineTotalAmount")?,
                total_allowance_charge_amount: read_amount(s, "TotalAllowanceChargeAmount")?,
            }),
            None => None,
        },
        accounting_accounts: read_accounts(ls),
    };

    Ok(LineItem {
        document,
        product,
        agreement,
        delivery,
        settlement,
    })
}

fn read_product(e: &XmlElement) -> Result<TradeProduct, OrderError> {
    Ok(TradeProduct {
        id: read_id(e, "ID"),
        global_ids: read_ids(e, "GlobalID"),
        seller_assigned_id: read_id(e, "SellerAssignedID"),
        buyer_assigned_id: read_id(e, "BuyerAssignedID"),
        industry_assigned_id: read_id(e, "IndustryAssignedID"),
        model_id: read_id(e, "ModelID"),
        name: req_text(e, "Name"),
        description: read_text(e, "Description"),
        batch_id: read_id(e, "BatchID"),
        brand_name: read_text(e, "BrandName"),
        model_name: read_text(e, "ModelName"),
        characteristics: e
            .children("ApplicableProductCharacteristic")
            .map(|c| {
                Ok(ProductCharacteristic {
                    type_code: read_code(c, "TypeCode"),
                    description: req_text(c, "Description"),
                    value_measure: read_measure(c, "ValueMeasure")?,
                    value: read_text(c, "Value"),
                })
            })
            .collect::<Result<_, OrderError>>()?,
        classifications: e
            .children("DesignatedProductClassification")
            .map(|c| ProductClassification {
                class_code: req_code(c, "ClassCode"),
                class_name: read_text(c, "ClassName"),
            })
            .collect(),
        instances: e
            .children("IndividualTradeProductInstance")
            .map(|i| ProductInstance {
                batch_id: read_id(i, "BatchID"),
                serial_id: read_id(i, "SerialID"),
            })
            .collect(),
        packaging: match e.child("ApplicableSupplyChainPackaging") {
            Some(p) => {
                let dim = p.child("LinearSpatialDimension");
                let m = |name| dim.map(|d| read_measure(d, name)).transpose().map(Option::flatten);
                Some(SupplyChainPackaging {
                    type_code: req_code(p, "TypeCode"),
                    width: m("WidthMeasure")?,
                    length: m("LengthMeasure")?,
                    height: m("HeightMeasure")?,
                })
            }
            None => None,
        },
        origin_country: e.child("OriginTradeCountry").and_then(|c| read_id(c, "ID")),
        referenced_products: e
            .children("IncludedReferencedProduct")
            .map(|r| {
                Ok(ReferencedProduct {
                    id: read_id(r, "ID"),
                    global_ids: read_ids(r, "GlobalID"),
                    seller_assigned_id: read_id(r, "SellerAssignedID"),
                    buyer_assigned_id: read_id(r, "BuyerAssignedID"),
                    industry_assigned_id: read_id(r, "IndustryAssignedID"),
                    name: req_text(r, "Name"),
                    description: read_text(r, "Description"),
                    unit_quantity: read_quantity(r, "UnitQuantity")?,
                })
            })
            .collect::<Result<_, OrderError>>()?,
    })
}

fn read_price(e: &XmlElement) -> Result<TradePrice, OrderError> {
    Ok(TradePrice {
        charge_amount: req_amount(e, "ChargeAmount")?,
        basis_quantity: read_quantity(e, "BasisQuantity")?,
        allowance_charges: Vec::new(),
        included_tax: None,
    })
}

fn read_party(parent: &XmlElement, name: &str) -> Option<TradeParty> {
    let e = parent.child(name)?;
    Some(TradeParty {
        ids: read_ids(e, "ID"),
        global_ids: read_ids(e, "GlobalID"),
        name: req_text(e, "Name"),
        description: read_text(e, "Description"),
        legal_organization: e.child("SpecifiedLegalOrganization").map(|lo| LegalOrganization {
            id: req_id(lo, "ID"),
            trading_business_name: read_text(lo, "TradingBusinessName"),
        }),
        contacts: e
            .children("DefinedTradeContact")
            .map(|c| TradeContact {
                person_name: read_text(c, "PersonName"),
                department_name: read_text(c, "DepartmentName"),
                type_code: read_code(c, "TypeCode"),
                telephone: read_communication(c, "TelephoneUniversalCommunication"),
                fax: read_communication(c, "FaxUniversalCommunication"),
                email: read_communication(c, "EmailURIUniversalCommunication"),
            })
            .collect(),
        address: e.child("PostalTradeAddress").map(|a| TradeAddress {
            postcode: read_code(a, "PostcodeCode"),
            line_one: read_text(a, "LineOne"),
            line_two: read_text(a, "LineTwo"),
            line_three: read_text(a, "LineThree"),
            city: read_text(a, "CityName"),
            country_id: read_id(a, "CountryID"),
            country_sub_division: read_text(a, "CountrySubDivisionName"),
        }),
        uri_communication: read_communication(e, "URIUniversalCommunication"),
        tax_registrations: e
            .children("SpecifiedTaxRegistration")
            .filter_map(|t| read_id(t, "ID"))
            .map(|id| TaxRegistration { id })
            .collect(),
    })
}

fn read_communication(parent: &XmlElement, name: &str) -> Option<UniversalCommunication> {
    let e = parent.child(name)?;
    Some(UniversalCommunication {
        uri_id: read_id(e, "URIID"),
        complete_number: read_text(e, "CompleteNumber"),
    })
}

fn read_reference(parent: &XmlElement, name: &str) -> Result<Option<ReferencedDocument>, OrderError> {
    parent.child(name).map(read_referenced_document).transpose()
}

fn read_references(parent: &XmlElement, name: &str) -> Result<Vec<ReferencedDocument>, OrderError> {
    parent.children(name).map(read_referenced_document).collect()
}

fn read_referenced_document(e: &XmlElement) -> Result<ReferencedDocument, OrderError> {
    let attachment = match e.child("AttachmentBinaryObject") {
        Some(bin) => {
            let cleaned: String = bin.text.chars().filter(|c| !c.is_whitespace()).collect();
            let data = STANDARD
                .decode(cleaned.as_bytes())
                .map_err(|err| OrderError::Xml(format!("invalid base64 attachment: {err}")))?;
            let object = binary_object(Some(data.as_slice()), bin.attr("mimeCode"), bin.attr("filename"));
            if object.is_none() {
                log::warn!("attachment without payload, MIME code or file name ignored");
            }
            object
        }
        None => None,
    };
    Ok(ReferencedDocument {
        issuer_assigned_id: req_id(e, "IssuerAssignedID"),
        uri_id: read_id(e, "URIID"),
        line_id: read_id(e, "LineID"),
        type_code: read_code(e, "TypeCode"),
        name: read_text(e, "Name"),
        attachment,
        reference_type_code: read_code(e, "ReferenceTypeCode"),
        issue_date: e
            .child("FormattedIssueDateTime")
            .and_then(|d| d.child("DateTimeString"))
            .filter(|d| !d.text.is_empty())
            .map(|d| FormattedDateTimeType {
                value: d.text.clone(),
                format: d.attr("format").unwrap_or("102").to_string(),
            }),
    })
}

fn read_event(parent: &XmlElement, name: &str) -> Option<SupplyChainEvent> {
    let e = parent.child(name)?;
    let period = e.child("OccurrenceSpecifiedPeriod").map(|p| SpecifiedPeriod {
        start: read_date_time(p, "StartDateTime"),
        end: read_date_time(p, "EndDateTime"),
    });
    Some(SupplyChainEvent {
        occurrence: read_date_time(e, "OccurrenceDateTime"),
        period,
    })
}

fn read_trade_tax(e: &XmlElement) -> Result<TradeTax, OrderError> {
    Ok(TradeTax {
        calculated_amount: read_amount(e, "CalculatedAmount")?,
        type_code: read_code(e, "TypeCode"),
        exemption_reason: read_text(e, "ExemptionReason"),
        basis_amount: read_amount(e, "BasisAmount")?,
        category_code: req_code(e, "CategoryCode"),
        exemption_reason_code: read_code(e, "ExemptionReasonCode"),
        rate_applicable_percent: read_decimal(e, "RateApplicablePercent")?.map(|value| PercentType { value }),
    })
}

fn read_allowance_charges(parent: &XmlElement, name: &str) -> Result<Vec<AllowanceCharge>, OrderError> {
    parent
        .children(name)
        .map(|e| {
            Ok(AllowanceCharge {
                charge_indicator: read_indicator(e, "ChargeIndicator")
                    .unwrap_or(IndicatorType { indicator: false }),
                sequence_numeric: read_decimal(e, "SequenceNumeric")?.map(|value| NumericType { value }),
                calculation_percent: read_decimal(e, "CalculationPercent")?
                    .map(|value| PercentType { value }),
                basis_amount: read_amount(e, "BasisAmount")?,
                basis_quantity: read_quantity(e, "BasisQuantity")?,
                actual_amount: req_amount(e, "ActualAmount")?,
                reason_code: read_code(e, "ReasonCode"),
                reason: read_text(e, "Reason"),
                category_trade_tax: e.child("CategoryTradeTax").map(read_trade_tax).transpose()?,
            })
        })
        .collect()
}

fn read_accounts(parent: &XmlElement) -> Vec<AccountingAccount> {
    parent
        .children("ReceivableSpecifiedTradeAccountingAccount")
        .map(|e| AccountingAccount {
            id: req_id(e, "ID"),
            type_code: read_code(e, "TypeCode"),
        })
        .collect()
}

fn read_notes(parent: &XmlElement) -> Vec<NoteType> {
    parent
        .children("IncludedNote")
        .map(|n| NoteType {
            content: n
                .children("Content")
                .map(|c| TextType {
                    value: c.text.clone(),
                })
                .collect(),
            content_code: read_code(n, "ContentCode"),
            subject_code: read_code(n, "SubjectCode"),
        })
        .collect()
}

// --- leaf readers ----------------------------------------------------------

fn id_of(e: &XmlElement) -> IdType {
    IdType {
        value: e.text.clone(),
        scheme_id: e.attr("schemeID").map(str::to_string),
    }
}

fn empty_id() -> IdType {
    IdType {
        value: String::new(),
        scheme_id: None,
    }
}

fn read_id(parent: &XmlElement, name: &str) -> Option<IdType> {
    parent.child(name).filter(|e| !e.text.is_empty()).map(id_of)
}

fn req_id(parent: &XmlElement, name: &str) -> IdType {
    parent.child(name).map(id_of).unwrap_or_else(empty_id)
}

fn read_ids(parent: &XmlElement, name: &str) -> Vec<IdType> {
    parent
        .children(name)
        .filter(|e| !e.text.is_empty())
        .map(id_of)
        .collect()
}

fn read_text(parent: &XmlElement, name: &str) -> Option<TextType> {
    parent.child_text(name).map(|value| TextType {
        value: value.to_string(),
    })
}

fn req_text(parent: &XmlElement, name: &str) -> TextType {
    TextType {
        value: parent.child_text(name).unwrap_or_default().to_string(),
    }
}

fn code_of(e: &XmlElement) -> CodeType {
    CodeType {
        value: e.text.clone(),
        list_id: e.attr("listID").map(str::to_string),
        list_version_id: e.attr("listVersionID").map(str::to_string),
    }
}

fn read_code(parent: &XmlElement, name: &str) -> Option<CodeType> {
    parent.child(name).filter(|e| !e.text.is_empty()).map(code_of)
}

fn req_code(parent: &XmlElement, name: &str) -> CodeType {
    parent.child(name).map(code_of).unwrap_or(CodeType {
        value: String::new(),
        list_id: None,
        list_version_id: None,
    })
}

fn read_indicator(parent: &XmlElement, name: &str) -> Option<IndicatorType> {
    let text = parent.child(name)?.child_text("Indicator")?;
    Some(IndicatorType {
        indicator: text.trim().eq_ignore_ascii_case("true") || text.trim() == "1",
    })
}

fn parse_decimal(e: &XmlElement) -> Result<Decimal, OrderError> {
    let t = e.text.trim();
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .map_err(|err| OrderError::Xml(format!("invalid decimal '{t}' in {}: {err}", e.name)))
}

fn read_decimal(parent: &XmlElement, name: &str) -> Result<Option<Decimal>, OrderError> {
    parent
        .child(name)
        .filter(|e| !e.text.is_empty())
        .map(parse_decimal)
        .transpose()
}

fn read_amount(parent: &XmlElement, name: &str) -> Result<Option<AmountType>, OrderError> {
    match parent.child(name).filter(|e| !e.text.is_empty()) {
        Some(e) => Ok(Some(AmountType {
            value: parse_decimal(e)?,
            currency_id: e.attr("currencyID").unwrap_or_default().to_string(),
        })),
        None => Ok(None),
    }
}

fn req_amount(parent: &XmlElement, name: &str) -> Result<AmountType, OrderError> {
    Ok(read_amount(parent, name)?.unwrap_or(AmountType {
        value: Decimal::ZERO,
        currency_id: String::new(),
    }))
}

fn read_quantity(parent: &XmlElement, name: &str) -> Result<Option<QuantityType>, OrderError> {
    match parent.child(name).filter(|e| !e.text.is_empty()) {
        Some(e) => Ok(Some(QuantityType {
            value: parse_decimal(e)?,
            unit_code: e.attr("unitCode").unwrap_or_default().to_string(),
        })),
        None => Ok(None),
    }
}

fn read_measure(parent: &XmlElement, name: &str) -> Result<Option<MeasureType>, OrderError> {
    Ok(read_quantity(parent, name)?.map(|q| MeasureType {
        value: q.value,
        unit_code: q.unit_code,
    }))
}

fn read_date_time(parent: &XmlElement, name: &str) -> Option<DateTimeType> {
    let e = parent.child(name)?.child("DateTimeString")?;
    if e.text.is_empty() {
        return None;
    }
    Some(DateTimeType {
        value: e.text.clone(),
        format: e.attr("format").unwrap_or("102").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> OrderDocument {
        let mut doc = OrderDocument::new(Profile::Extended);
        doc.header.id = nodes::id(Some("PO-4711"), None);
        doc.header.type_code = nodes::code(Some("220"));
        doc.header.issue_date_time = nodes::date_time(NaiveDate::from_ymd_opt(2022, 12, 31));
        doc.header.notes.push(nodes::note(Some("Deliver to gate 4"), None, Some("AAI")).unwrap());
        doc.settlement.currency_code = nodes::code(Some("EUR"));
        doc.agreement.seller = factory::trade_party(Some("Seller & Co"), Some("S-1"), None);
        doc.agreement.buyer = factory::trade_party(Some("Buyer AG"), None, None);
        doc.agreement.additional_references.push(
            factory::additional_referenced_document(&AdditionalReference {
                issuer_assigned_id: "DRAWING-1".into(),
                type_code: Some("916".into()),
                attachment: Some(BinaryAttachment {
                    data: b"%PDF-1.4 drawing".to_vec(),
                    mime_code: "application/pdf".into(),
                    filename: "drawing.pdf".into(),
                }),
                ..Default::default()
            })
            .unwrap(),
        );
        doc.delivery.requested_delivery =
            factory::supply_chain_event(None, NaiveDate::from_ymd_opt(2023, 1, 2), None);
        doc.settlement.summation = factory::header_summation(
            &DocumentSummation {
                line_total: Some(dec!(100)),
                tax_total: Some(dec!(19)),
                grand_total: dec!(119),
                ..Default::default()
            },
            Some("EUR"),
        );
        let mut item = factory::line_item(Some("1")).unwrap();
        item.product = factory::trade_product(&ProductDetails {
            name: "Widget".into(),
            ..Default::default()
        });
        item.agreement.net_price = factory::trade_price(Some(dec!(10.125)), Some(dec!(1)), Some("C62"));
        item.delivery.requested_quantity = nodes::quantity(Some(dec!(10)), Some("C62"));
        item.settlement.allowance_charges.push(
            factory::allowance_charge(&AllowanceChargeInfo {
                actual_amount: dec!(5),
                is_charge: true,
                reason: Some("Freight".into()),
                ..Default::default()
            })
            .unwrap(),
        );
        doc.positions.push(item);
        doc
    }

    #[test]
    fn round_trip_preserves_model() {
        let doc = sample();
        let xml = to_xml(&doc, &Settings::default()).unwrap();
        let back = from_xml(&xml).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn writes_expected_elements() {
        let xml = to_xml(&sample(), &Settings::default()).unwrap();
        assert!(xml.contains("<rsm:SCRDMCCBDACIOMessageStructure"));
        assert!(xml.contains("<ram:ID>urn:order-x.eu:1p0:extended</ram:ID>"));
        assert!(xml.contains("<ram:Name>Seller &amp; Co</ram:Name>"));
        assert!(xml.contains(r#"<udt:DateTimeString format="102">20221231</udt:DateTimeString>"#));
        assert!(xml.contains(r#"<ram:TaxTotalAmount currencyID="EUR">19.00</ram:TaxTotalAmount>"#));
        assert!(xml.contains("<ram:ChargeAmount>10.125</ram:ChargeAmount>"));
        assert!(xml.contains(r#"<ram:RequestedQuantity unitCode="C62">10.00</ram:RequestedQuantity>"#));
        assert!(xml.contains(r#"mimeCode="application/pdf""#));
        assert!(!xml.contains("ram:OccurrenceDateTime"));
    }

    #[test]
    fn foreign_root_is_rejected() {
        assert!(matches!(
            from_xml("<Invoice/>"),
            Err(OrderError::UnknownXmlContent)
        ));
    }

    #[test]
    fn invalid_amount_is_an_error() {
        let xml = to_xml(&sample(), &Settings::default())
            .unwrap()
            .replace(">119.00<", ">abc<");
        assert!(matches!(from_xml(&xml), Err(OrderError::Xml(_))));
    }
}
