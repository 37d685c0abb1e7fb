use serde::{Deserialize, Serialize};

use super::nodes::*;
use super::profile::Profile;

/// Root aggregate of an Order-X message (`SCRDMCCBDACIOMessageStructure`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
    pub context: DocumentContext,
    pub header: ExchangedDocument,
    /// Positions (`IncludedSupplyChainTradeLineItem`), in document order.
    pub positions: Vec<LineItem>,
    pub agreement: HeaderTradeAgreement,
    pub delivery: HeaderTradeDelivery,
    pub settlement: HeaderTradeSettlement,
}

impl OrderDocument {
    /// An empty document carrying only the guideline URN of `profile`.
    pub fn new(profile: Profile) -> Self {
        Self {
            context: DocumentContext {
                test_indicator: None,
                business_process: None,
                guideline: IdType {
                    value: profile.urn().to_string(),
                    scheme_id: None,
                },
            },
            header: ExchangedDocument::default(),
            positions: Vec::new(),
            agreement: HeaderTradeAgreement::default(),
            delivery: HeaderTradeDelivery::default(),
            settlement: HeaderTradeSettlement::default(),
        }
    }
}

/// `ExchangedDocumentContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub test_indicator: Option<IndicatorType>,
    pub business_process: Option<IdType>,
    pub guideline: IdType,
}

/// `ExchangedDocument` - the order header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangedDocument {
    pub id: Option<IdType>,
    pub name: Option<TextType>,
    pub type_code: Option<CodeType>,
    pub issue_date_time: Option<DateTimeType>,
    pub copy_indicator: Option<IndicatorType>,
    pub language_id: Option<IdType>,
    pub purpose_code: Option<CodeType>,
    pub requested_response_type_code: Option<CodeType>,
    pub notes: Vec<NoteType>,
}

/// Trade party (seller, buyer, ship-to, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeParty {
    pub ids: Vec<IdType>,
    pub global_ids: Vec<IdType>,
    pub name: TextType,
    pub description: Option<TextType>,
    pub legal_organization: Option<LegalOrganization>,
    pub contacts: Vec<TradeContact>,
    pub address: Option<TradeAddress>,
    pub uri_communication: Option<UniversalCommunication>,
    pub tax_registrations: Vec<TaxRegistration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalOrganization {
    pub id: IdType,
    pub trading_business_name: Option<TextType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeContact {
    pub person_name: Option<TextType>,
    pub department_name: Option<TextType>,
    pub type_code: Option<CodeType>,
    pub telephone: Option<UniversalCommunication>,
    pub fax: Option<UniversalCommunication>,
    pub email: Option<UniversalCommunication>,
}

/// Telephone/fax number (`CompleteNumber`) or URI (`URIID`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversalCommunication {
    pub uri_id: Option<IdType>,
    pub complete_number: Option<TextType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAddress {
    pub postcode: Option<CodeType>,
    pub line_one: Option<TextType>,
    pub line_two: Option<TextType>,
    pub line_three: Option<TextType>,
    pub city: Option<TextType>,
    pub country_id: Option<IdType>,
    pub country_sub_division: Option<TextType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRegistration {
    pub id: IdType,
}

/// `ApplicableTradeDeliveryTerms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTerms {
    pub delivery_type_code: CodeType,
    pub description: Option<TextType>,
    pub function_code: Option<CodeType>,
    pub location_id: Option<IdType>,
    pub location_name: Option<TextType>,
}

/// Any `...ReferencedDocument` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedDocument {
    pub issuer_assigned_id: IdType,
    pub uri_id: Option<IdType>,
    pub line_id: Option<IdType>,
    pub type_code: Option<CodeType>,
    pub name: Option<TextType>,
    pub attachment: Option<BinaryObject>,
    pub reference_type_code: Option<CodeType>,
    pub issue_date: Option<FormattedDateTimeType>,
}

/// `SpecifiedProcuringProject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcuringProject {
    pub id: IdType,
    pub name: Option<TextType>,
}

/// Requested delivery or despatch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainEvent {
    pub occurrence: Option<DateTimeType>,
    pub period: Option<SpecifiedPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMeans {
    pub type_code: CodeType,
    pub information: Option<TextType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub description: TextType,
}

/// `ApplicableTradeTax` / `CategoryTradeTax`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTax {
    pub calculated_amount: Option<AmountType>,
    pub type_code: Option<CodeType>,
    pub exemption_reason: Option<TextType>,
    pub basis_amount: Option<AmountType>,
    pub category_code: CodeType,
    pub exemption_reason_code: Option<CodeType>,
    pub rate_applicable_percent: Option<PercentType>,
}

/// `SpecifiedTradeAllowanceCharge` / `AppliedTradeAllowanceCharge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceCharge {
    pub charge_indicator: IndicatorType,
    pub sequence_numeric: Option<NumericType>,
    pub calculation_percent: Option<PercentType>,
    pub basis_amount: Option<AmountType>,
    pub basis_quantity: Option<QuantityType>,
    pub actual_amount: AmountType,
    pub reason_code: Option<CodeType>,
    pub reason: Option<TextType>,
    pub category_trade_tax: Option<TradeTax>,
}

/// `SpecifiedLogisticsServiceCharge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsServiceCharge {
    pub description: TextType,
    pub applied_amount: AmountType,
    pub applied_trade_tax: Vec<TradeTax>,
}

/// `SpecifiedTradeSettlementHeaderMonetarySummation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMonetarySummation {
    pub line_total_amount: Option<AmountType>,
    pub charge_total_amount: Option<AmountType>,
    pub allowance_total_amount: Option<AmountType>,
    pub tax_basis_total_amount: Option<AmountType>,
    pub tax_total_amount: Option<AmountType>,
    pub grand_total_amount: AmountType,
}

/// `SpecifiedTradeSettlementLineMonetarySummation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMonetarySummation {
    pub line_total_amount: AmountType,
    pub total_allowance_charge_amount: Option<AmountType>,
}

/// `ReceivableSpecifiedTradeAccountingAccount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingAccount {
    pub id: IdType,
    pub type_code: Option<CodeType>,
}

/// `AssociatedDocumentLineDocument`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDocument {
    pub line_id: IdType,
    pub line_status_code: Option<CodeType>,
    pub line_status_reason_code: Option<CodeType>,
    pub notes: Vec<NoteType>,
}

/// `IncludedSupplyChainTradeLineItem` - one order position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub document: LineDocument,
    pub product: Option<TradeProduct>,
    pub agreement: LineTradeAgreement,
    pub delivery: LineTradeDelivery,
    pub settlement: LineTradeSettlement,
}

/// `SpecifiedTradeProduct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeProduct {
    pub id: Option<IdType>,
    pub global_ids: Vec<IdType>,
    pub seller_assigned_id: Option<IdType>,
    pub buyer_assigned_id: Option<IdType>,
    pub industry_assigned_id: Option<IdType>,
    pub model_id: Option<IdType>,
    pub name: TextType,
    pub description: Option<TextType>,
    pub batch_id: Option<IdType>,
    pub brand_name: Option<TextType>,
    pub model_name: Option<TextType>,
    pub characteristics: Vec<ProductCharacteristic>,
    pub classifications: Vec<ProductClassification>,
    pub instances: Vec<ProductInstance>,
    pub packaging: Option<SupplyChainPackaging>,
    pub origin_country: Option<IdType>,
    pub referenced_products: Vec<ReferencedProduct>,
}

/// `ApplicableProductCharacteristic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCharacteristic {
    pub type_code: Option<CodeType>,
    pub description: TextType,
    pub value_measure: Option<MeasureType>,
    pub value: Option<TextType>,
}

/// `DesignatedProductClassification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductClassification {
    pub class_code: CodeType,
    pub class_name: Option<TextType>,
}

/// `IndividualTradeProductInstance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInstance {
    pub batch_id: Option<IdType>,
    pub serial_id: Option<IdType>,
}

/// `ApplicableSupplyChainPackaging`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainPackaging {
    pub type_code: CodeType,
    pub width: Option<MeasureType>,
    pub length: Option<MeasureType>,
    pub height: Option<MeasureType>,
}

/// `IncludedReferencedProduct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedProduct {
    pub id: Option<IdType>,
    pub global_ids: Vec<IdType>,
    pub seller_assigned_id: Option<IdType>,
    pub buyer_assigned_id: Option<IdType>,
    pub industry_assigned_id: Option<IdType>,
    pub name: TextType,
    pub description: Option<TextType>,
    pub unit_quantity: Option<QuantityType>,
}

/// Gross or net product price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePrice {
    pub charge_amount: AmountType,
    pub basis_quantity: Option<QuantityType>,
    pub allowance_charges: Vec<AllowanceCharge>,
    pub included_tax: Option<TradeTax>,
}

/// `SpecifiedLineTradeAgreement`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineTradeAgreement {
    pub buyer_order_reference: Option<ReferencedDocument>,
    pub quotation_reference: Option<ReferencedDocument>,
    pub contract_reference: Option<ReferencedDocument>,
    pub additional_references: Vec<ReferencedDocument>,
    pub gross_price: Option<TradePrice>,
    pub net_price: Option<TradePrice>,
    pub catalogue_reference: Option<ReferencedDocument>,
    pub blanket_order_reference: Option<ReferencedDocument>,
    pub ultimate_customer_order_reference: Option<ReferencedDocument>,
}

/// `SpecifiedLineTradeDelivery`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineTradeDelivery {
    pub partial_delivery_allowed: Option<IndicatorType>,
    pub requested_quantity: Option<QuantityType>,
    pub package_quantity: Option<QuantityType>,
    pub per_package_unit_quantity: Option<QuantityType>,
    pub agreed_quantity: Option<QuantityType>,
    pub requested_delivery: Option<SupplyChainEvent>,
    pub requested_despatch: Option<SupplyChainEvent>,
}

/// `SpecifiedLineTradeSettlement`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineTradeSettlement {
    pub tax: Option<TradeTax>,
    pub allowance_charges: Vec<AllowanceCharge>,
    pub summation: Option<LineMonetarySummation>,
    pub accounting_accounts: Vec<AccountingAccount>,
}

/// `ApplicableHeaderTradeAgreement`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTradeAgreement {
    pub buyer_reference: Option<TextType>,
    pub seller: Option<TradeParty>,
    pub buyer: Option<TradeParty>,
    pub buyer_requisitioner: Option<TradeParty>,
    pub delivery_terms: Option<DeliveryTerms>,
    pub seller_order_reference: Option<ReferencedDocument>,
    pub buyer_order_reference: Option<ReferencedDocument>,
    pub quotation_reference: Option<ReferencedDocument>,
    pub contract_reference: Option<ReferencedDocument>,
    pub requisition_reference: Option<ReferencedDocument>,
    pub additional_references: Vec<ReferencedDocument>,
    pub blanket_order_reference: Option<ReferencedDocument>,
    pub previous_order_change_reference: Option<ReferencedDocument>,
    pub previous_order_response_reference: Option<ReferencedDocument>,
    pub procuring_project: Option<ProcuringProject>,
    pub ultimate_customer_order_reference: Option<ReferencedDocument>,
}

/// `ApplicableHeaderTradeDelivery`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTradeDelivery {
    pub ship_to: Option<TradeParty>,
    pub ship_from: Option<TradeParty>,
    pub requested_delivery: Option<SupplyChainEvent>,
    pub requested_despatch: Option<SupplyChainEvent>,
}

/// `ApplicableHeaderTradeSettlement`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTradeSettlement {
    pub currency_code: Option<CodeType>,
    pub invoicee: Option<TradeParty>,
    pub payment_means: Vec<PaymentMeans>,
    pub taxes: Vec<TradeTax>,
    pub allowance_charges: Vec<AllowanceCharge>,
    pub logistics_service_charges: Vec<LogisticsServiceCharge>,
    pub payment_terms: Vec<PaymentTerms>,
    pub summation: Option<HeaderMonetarySummation>,
    pub accounting_accounts: Vec<AccountingAccount>,
}

/// Party roles of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyRole {
    Seller,
    Buyer,
    BuyerRequisitioner,
    ShipTo,
    ShipFrom,
    Invoicee,
}

impl PartyRole {
    pub const ALL: [PartyRole; 6] = [
        PartyRole::Seller,
        PartyRole::Buyer,
        PartyRole::BuyerRequisitioner,
        PartyRole::ShipTo,
        PartyRole::ShipFrom,
        PartyRole::Invoicee,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Element name of the party in the XML.
    pub fn element(self) -> &'static str {
        match self {
            Self::Seller => "SellerTradeParty",
            Self::Buyer => "BuyerTradeParty",
            Self::BuyerRequisitioner => "BuyerRequisitionerTradeParty",
            Self::ShipTo => "ShipToTradeParty",
            Self::ShipFrom => "ShipFromTradeParty",
            Self::Invoicee => "InvoiceeTradeParty",
        }
    }
}

impl OrderDocument {
    pub fn party(&self, role: PartyRole) -> Option<&TradeParty> {
        match role {
            PartyRole::Seller => self.agreement.seller.as_ref(),
            PartyRole::Buyer => self.agreement.buyer.as_ref(),
            PartyRole::BuyerRequisitioner => self.agreement.buyer_requisitioner.as_ref(),
            PartyRole::ShipTo => self.delivery.ship_to.as_ref(),
            PartyRole::ShipFrom => self.delivery.ship_from.as_ref(),
            PartyRole::Invoicee => self.settlement.invoicee.as_ref(),
        }
    }

    pub fn party_mut(&mut self, role: PartyRole) -> &mut Option<TradeParty> {
        match role {
            PartyRole::Seller => &mut self.agreement.seller,
            PartyRole::Buyer => &mut self.agreement.buyer,
            PartyRole::BuyerRequisitioner => &mut self.agreement.buyer_requisitioner,
            PartyRole::ShipTo => &mut self.delivery.ship_to,
            PartyRole::ShipFrom => &mut self.delivery.ship_from,
            PartyRole::Invoicee => &mut self.settlement.invoicee,
        }
    }
}

/// Kinds of single-valued referenced documents.
///
/// Document-level kinds live in the header agreement, line-level kinds in
/// the position agreement; [`ReferenceKind::is_line_level`] tells which
/// kinds a position may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    SellerOrder,
    BuyerOrder,
    Quotation,
    Contract,
    Requisition,
    BlanketOrder,
    PreviousOrderChange,
    PreviousOrderResponse,
    UltimateCustomerOrder,
    Catalogue,
}

impl ReferenceKind {
    pub fn element(self) -> &'static str {
        match self {
            Self::SellerOrder => "SellerOrderReferencedDocument",
            Self::BuyerOrder => "BuyerOrderReferencedDocument",
            Self::Quotation => "QuotationReferencedDocument",
            Self::Contract => "ContractReferencedDocument",
            Self::Requisition => "RequisitionerReferencedDocument",
            Self::BlanketOrder => "BlanketOrderReferencedDocument",
            Self::PreviousOrderChange => "PreviousOrderChangeReferencedDocument",
            Self::PreviousOrderResponse => "PreviousOrderResponseReferencedDocument",
            Self::UltimateCustomerOrder => "UltimateCustomerOrderReferencedDocument",
            Self::Catalogue => "CatalogueReferencedDocument",
        }
    }

    pub fn is_document_level(self) -> bool {
        !matches!(self, Self::Catalogue)
    }

    pub fn is_line_level(self) -> bool {
        matches!(
            self,
            Self::BuyerOrder
                | Self::Quotation
                | Self::Contract
                | Self::Catalogue
                | Self::BlanketOrder
                | Self::UltimateCustomerOrder
        )
    }
}

impl HeaderTradeAgreement {
    pub fn reference(&self, kind: ReferenceKind) -> Option<&ReferencedDocument> {
        match kind {
            ReferenceKind::SellerOrder => self.seller_order_reference.as_ref(),
            ReferenceKind::BuyerOrder => self.buyer_order_reference.as_ref(),
            ReferenceKind::Quotation => self.quotation_reference.as_ref(),
            ReferenceKind::Contract => self.contract_reference.as_ref(),
            ReferenceKind::Requisition => self.requisition_reference.as_ref(),
            ReferenceKind::BlanketOrder => self.blanket_order_reference.as_ref(),
            ReferenceKind::PreviousOrderChange => self.previous_order_change_reference.as_ref(),
            ReferenceKind::PreviousOrderResponse => {
                self.previous_order_response_reference.as_ref()
            }
            ReferenceKind::UltimateCustomerOrder => {
                self.ultimate_customer_order_reference.as_ref()
            }
            ReferenceKind::Catalogue => None,
        }
    }

    /// Mutable slot for a document-level reference; `None` for line-only kinds.
    pub fn reference_mut(&mut self, kind: ReferenceKind) -> Option<&mut Option<ReferencedDocument>> {
        Some(match kind {
            ReferenceKind::SellerOrder => &mut self.seller_order_reference,
            ReferenceKind::BuyerOrder => &mut self.buyer_order_reference,
            ReferenceKind::Quotation => &mut self.quotation_reference,
            ReferenceKind::Contract => &mut self.contract_reference,
            ReferenceKind::Requisition => &mut self.requisition_reference,
            ReferenceKind::BlanketOrder => &mut self.blanket_order_reference,
            ReferenceKind::PreviousOrderChange => &mut self.previous_order_change_reference,
            ReferenceKind::PreviousOrderResponse => &mut self.previous_order_response_reference,
            ReferenceKind::UltimateCustomerOrder => &mut self.ultimate_customer_order_reference,
            ReferenceKind::Catalogue => return None,
        })
    }
}

impl LineTradeAgreement {
    pub fn reference(&self, kind: ReferenceKind) -> Option<&ReferencedDocument> {
        match kind {
            ReferenceKind::BuyerOrder => self.buyer_order_reference.as_ref(),
            ReferenceKind::Quotation => self.quotation_reference.as_ref(),
            ReferenceKind::Contract => self.contract_reference.as_ref(),
            ReferenceKind::Catalogue => self.catalogue_reference.as_ref(),
            ReferenceKind::BlanketOrder => self.blanket_order_reference.as_ref(),
            ReferenceKind::UltimateCustomerOrder => {
                self.ultimate_customer_order_reference.as_ref()
            }
            _ => None,
        }
    }

    /// Mutable slot for a line-level reference; `None` for header-only kinds.
    pub fn reference_mut(&mut self, kind: ReferenceKind) -> Option<&mut Option<ReferencedDocument>> {
        Some(match kind {
            ReferenceKind::BuyerOrder => &mut self.buyer_order_reference,
            ReferenceKind::Quotation => &mut self.quotation_reference,
            ReferenceKind::Contract => &mut self.contract_reference,
            ReferenceKind::Catalogue => &mut self.catalogue_reference,
            ReferenceKind::BlanketOrder => &mut self.blanket_order_reference,
            ReferenceKind::UltimateCustomerOrder => &mut self.ultimate_customer_order_reference,
            _ => return None,
        })
    }
}

/// Order document type (UNTDID 1001 subset used by Order-X).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderTypeCode {
    /// 220 - Order.
    Order,
    /// 230 - Order change.
    OrderChange,
    /// 231 - Order response.
    OrderResponse,
}

impl OrderTypeCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Order => "220",
            Self::OrderChange => "230",
            Self::OrderResponse => "231",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "220" => Some(Self::Order),
            "230" => Some(Self::OrderChange),
            "231" => Some(Self::OrderResponse),
            _ => None,
        }
    }

    /// Display name used in PDF metadata.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Order => "Order",
            Self::OrderChange => "Order Change",
            Self::OrderResponse => "Order Response",
        }
    }

    /// Display name for a raw type code; unrecognized codes read as "Order".
    pub fn display_name_for(code: &str) -> &'static str {
        Self::from_code(code).unwrap_or(Self::Order).display_name()
    }
}
