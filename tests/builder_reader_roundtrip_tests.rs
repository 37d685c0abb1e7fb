//! Build documents with the authoring facade and read them back through the
//! navigator.
//!
//! Run with: `cargo test --test builder_reader_roundtrip_tests`

#![cfg(feature = "xml")]

use chrono::NaiveDate;
use orderx::core::*;
use orderx::xml::{OrderDocumentBuilder, OrderDocumentReader};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller_address() -> PostalAddress {
    PostalAddress {
        line_one: Some("Industriestr. 5".into()),
        postcode: Some("80333".into()),
        city: Some("München".into()),
        country: Some("DE".into()),
        ..Default::default()
    }
}

fn sales_contact() -> ContactInfo {
    ContactInfo {
        person_name: Some("Hans Muster".into()),
        department_name: Some("Sales".into()),
        phone: Some("+49 89 1234".into()),
        email: Some("hans@lieferant.de".into()),
        ..Default::default()
    }
}

fn volume_discount() -> AllowanceChargeInfo {
    AllowanceChargeInfo {
        actual_amount: dec!(11.50),
        is_charge: false,
        calculation_percent: Some(dec!(5)),
        basis_amount: Some(dec!(230)),
        reason_code: Some("95".into()),
        reason: Some("Volume discount".into()),
        tax_category_code: Some("S".into()),
        tax_type_code: Some("VAT".into()),
        tax_rate: Some(dec!(19)),
        ..Default::default()
    }
}

fn drawing() -> AdditionalReference {
    AdditionalReference {
        issuer_assigned_id: "DRAWING-1".into(),
        type_code: Some("916".into()),
        uri_id: Some("https://example.com/drawing-1".into()),
        name: Some("Assembly drawing".into()),
        attachment: Some(BinaryAttachment {
            data: b"a,b,c\n1,2,3\n".to_vec(),
            mime_code: "text/csv".into(),
            filename: "parts.csv".into(),
        }),
        ..Default::default()
    }
}

fn rack() -> ProductDetails {
    ProductDetails {
        name: "Server rack".into(),
        description: Some("42U, black".into()),
        seller_assigned_id: Some("S-100".into()),
        buyer_assigned_id: Some("B-100".into()),
        global_id: Some("4000000000017".into()),
        global_id_scheme: Some("0160".into()),
        industry_assigned_id: Some("I-100".into()),
        model_id: Some("M-100".into()),
        batch_id: Some("B-2024".into()),
        brand_name: Some("RackCo".into()),
        model_name: Some("R42".into()),
    }
}

/// An order touching every group the Extended profile carries.
fn extended_builder() -> OrderDocumentBuilder {
    let mut b = OrderDocumentBuilder::with_settings(Profile::Extended, Settings::default());
    b.set_document_information("PO-RT-1", OrderTypeCode::Order, date(2024, 3, 14), "EUR")
        .set_document_name("Rack order")
        .set_document_language("de")
        .set_document_purpose_code("9")
        .set_document_requested_response_type_code("AC")
        .set_is_test_document(true)
        .set_is_copy(false)
        .set_document_business_process("A1")
        .set_document_buyer_reference("BR-42")
        .add_document_note("Deliver to gate 3", Some("AAB"), Some("REG"))
        .add_document_note("Call before delivery", None, None);

    b.set_document_party(PartyRole::Seller, "Lieferant GmbH", Some("SUP-1"), Some("Wholesale"))
        .add_document_party_id(PartyRole::Seller, "SUP-2")
        .add_document_party_global_id(PartyRole::Seller, "4000001123452", "0088")
        .add_document_party_tax_registration(PartyRole::Seller, "VA", "DE123456789")
        .add_document_party_tax_registration(PartyRole::Seller, "FC", "201/113/40209")
        .set_document_party_address(PartyRole::Seller, &seller_address())
        .set_document_party_legal_organisation(
            PartyRole::Seller,
            &LegalOrganisation {
                id: Some("HRB 1234".into()),
                id_scheme: Some("0002".into()),
                trading_name: Some("Lieferant".into()),
            },
        )
        .add_document_party_contact(PartyRole::Seller, &sales_contact())
        .set_document_party_electronic_address(PartyRole::Seller, "sales@lieferant.de", Some("EM"))
        .set_document_party(PartyRole::Buyer, "Kunden AG", None, None)
        .set_document_party(PartyRole::BuyerRequisitioner, "Requisitioner", None, None)
        .set_document_party(PartyRole::ShipTo, "Kunden AG, Lager", None, None)
        .set_document_party(PartyRole::ShipFrom, "Lieferant Lager", None, None)
        .set_document_party(PartyRole::Invoicee, "Kunden AG Buchhaltung", None, None);

    b.set_document_delivery_terms(&DeliveryTermsInfo {
        code: "FCA".into(),
        description: Some("Free carrier".into()),
        ..Default::default()
    })
    .set_document_reference(ReferenceKind::SellerOrder, "SO-77", None, None)
    .set_document_reference(ReferenceKind::Quotation, "QUOT-1", None, Some(date(2024, 2, 1)))
    .set_document_reference(ReferenceKind::Contract, "CON-9", None, None)
    .set_document_reference(ReferenceKind::BlanketOrder, "BLANKET-1", None, None)
    .set_document_reference(ReferenceKind::PreviousOrderChange, "PO-RT-0", None, None)
    .set_document_reference(ReferenceKind::UltimateCustomerOrder, "ULT-9", None, Some(date(2024, 3, 1)))
    .add_document_additional_referenced_document(&drawing())
    .set_document_procuring_project("PROJ-1", Some("New warehouse"))
    .set_document_requested_delivery(None, Some(date(2024, 4, 1)), Some(date(2024, 4, 10)))
    .set_document_requested_despatch(Some(date(2024, 3, 28)), None, None);

    b.add_document_payment_means("58", Some("SEPA credit transfer"))
        .add_document_tax(&TaxInfo {
            category_code: "S".into(),
            type_code: Some("VAT".into()),
            basis_amount: Some(dec!(2070)),
            calculated_amount: Some(dec!(393.30)),
            rate: Some(dec!(19)),
            ..Default::default()
        })
        .add_document_allowance_charge(&volume_discount())
        .add_document_logistics_service_charge(&LogisticsServiceChargeInfo {
            description: "Freight".into(),
            amount: dec!(120),
            tax_category_code: Some("S".into()),
            tax_type_code: Some("VAT".into()),
            tax_rate: Some(dec!(19)),
        })
        .add_document_payment_term("30 days net")
        .add_document_receivable_accounting_account("ACC-4711", Some("1"))
        .set_document_summation(&DocumentSummation {
            line_total: Some(dec!(1950)),
            charge_total: Some(dec!(120)),
            allowance_total: Some(dec!(11.50)),
            tax_basis_total: Some(dec!(2058.50)),
            tax_total: Some(dec!(391.12)),
            grand_total: dec!(2449.62),
        });

    b.add_new_position("10")
        .set_status(Some("1"), Some("DET"))
        .add_note("Handle with care", None, Some("AAI"))
        .set_product_details(&rack())
        .add_product_characteristic(&ProductCharacteristicInfo {
            description: "Weight".into(),
            value_measure: Some(dec!(80)),
            value_measure_unit: Some("KGM".into()),
            ..Default::default()
        })
        .add_product_classification(&ProductClassificationInfo {
            class_code: "43211501".into(),
            list_id: Some("TST".into()),
            list_version_id: Some("26".into()),
            class_name: Some("Server".into()),
        })
        .add_product_instance(Some("B-2024"), Some("SN-0001"))
        .add_product_instance(None, Some("SN-0002"))
        .set_product_packaging(&PackagingInfo {
            type_code: "CT".into(),
            width: Some(dec!(60)),
            length: Some(dec!(100)),
            height: Some(dec!(200)),
            unit_code: Some("CMT".into()),
        })
        .set_product_origin_country("FR")
        .add_referenced_product(&ReferencedProductInfo {
            name: "Mounting kit".into(),
            global_id: Some("4000000000024".into()),
            global_id_scheme: Some("0160".into()),
            unit_quantity: Some(dec!(4)),
            unit_code: Some("C62".into()),
            ..Default::default()
        })
        .set_reference(ReferenceKind::BuyerOrder, "PO-RT-1", Some("10"), None)
        .set_reference(ReferenceKind::Quotation, "QUOT-1", Some("3"), None)
        .set_reference(ReferenceKind::Catalogue, "CAT-2024", Some("55"), None)
        .set_gross_price(dec!(1050), Some(dec!(1)), Some("C62"))
        .add_gross_price_allowance_charge(&AllowanceChargeInfo {
            actual_amount: dec!(50),
            reason: Some("Discount".into()),
            ..Default::default()
        })
        .set_net_price(dec!(1000), Some(dec!(1)), Some("C62"))
        .set_net_price_tax(&TaxInfo {
            category_code: "S".into(),
            type_code: Some("VAT".into()),
            calculated_amount: Some(dec!(190)),
            ..Default::default()
        })
        .set_partial_delivery_allowed(true)
        .set_quantity(dec!(2), "C62")
        .set_package_quantity(dec!(1), "XCT")
        .set_per_package_quantity(dec!(2), "C62")
        .set_agreed_quantity(dec!(2), "C62")
        .set_requested_delivery(Some(date(2024, 4, 5)), None, None)
        .set_requested_despatch(None, Some(date(2024, 3, 25)), Some(date(2024, 3, 28)))
        .set_tax(&TaxInfo {
            category_code: "S".into(),
            type_code: Some("VAT".into()),
            rate: Some(dec!(19)),
            ..Default::default()
        })
        .add_allowance_charge(&AllowanceChargeInfo {
            actual_amount: dec!(50),
            reason: Some("Loyalty".into()),
            ..Default::default()
        })
        .set_summation(dec!(1950), Some(dec!(50)))
        .add_receivable_accounting_account("ACC-LINE-1", None);

    b.add_new_position("20")
        .set_product_details_name("Blind panel")
        .set_quantity(dec!(0), "C62")
        .set_summation(dec!(0), None);
    b
}

#[test]
fn extended_order_is_valid_and_resolves() {
    let b = extended_builder();
    assert!(b.validate().is_empty(), "{:?}", b.validate());
    let xml = b.get_content().unwrap();
    let r = OrderDocumentReader::read_content(&xml).unwrap();
    assert_eq!(r.profile(), Profile::Extended);
    assert!(r.validate().is_empty());
}

#[test]
fn model_survives_serialization() {
    let b = extended_builder();
    let r = OrderDocumentReader::read_content(&b.get_content().unwrap()).unwrap();
    assert_eq!(r.document(), b.document());
}

#[test]
fn header_records() {
    let xml = extended_builder().get_content().unwrap();
    let r = OrderDocumentReader::read_content(&xml).unwrap();

    let info = r.get_document_information().unwrap();
    assert_eq!(
        info,
        DocumentInformation {
            document_no: "PO-RT-1".into(),
            document_type_code: "220".into(),
            document_date: date(2024, 3, 14).and_hms_opt(0, 0, 0),
            currency: "EUR".into(),
            document_name: Some("Rack order".into()),
            language: Some("de".into()),
            purpose_code: Some("9".into()),
            requested_response_type_code: Some("AC".into()),
        }
    );
    assert!(r.get_document_is_test());
    assert!(!r.get_document_is_copy());
    assert_eq!(r.get_document_business_process().as_deref(), Some("A1"));
    assert_eq!(r.get_document_buyer_reference().as_deref(), Some("BR-42"));

    let notes: Vec<DocumentNote> = r.document_notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].content, ["Deliver to gate 3"]);
    assert_eq!(notes[0].content_code.as_deref(), Some("AAB"));
    assert_eq!(notes[0].subject_code.as_deref(), Some("REG"));
    assert_eq!(notes[1].subject_code, None);
}

#[test]
fn party_records() {
    let xml = extended_builder().get_content().unwrap();
    let mut r = OrderDocumentReader::read_content(&xml).unwrap();

    let seller = r.get_document_party(PartyRole::Seller).unwrap();
    assert_eq!(seller.name, "Lieferant GmbH");
    assert_eq!(seller.ids, ["SUP-1", "SUP-2"]);
    assert_eq!(seller.description.as_deref(), Some("Wholesale"));

    let global = r.get_document_party_global_ids(PartyRole::Seller);
    assert_eq!(global.get("0088").map(String::as_str), Some("4000001123452"));
    let tax = r.get_document_party_tax_registrations(PartyRole::Seller);
    assert_eq!(tax.get("VA").map(String::as_str), Some("DE123456789"));
    assert_eq!(tax.get("FC").map(String::as_str), Some("201/113/40209"));

    assert_eq!(r.get_document_party_address(PartyRole::Seller), Some(seller_address()));
    assert_eq!(
        r.get_document_party_legal_organisation(PartyRole::Seller)
            .unwrap()
            .trading_name
            .as_deref(),
        Some("Lieferant")
    );
    assert_eq!(
        r.get_document_party_electronic_address(PartyRole::Seller),
        Some(ElectronicAddress {
            uri: "sales@lieferant.de".into(),
            uri_scheme: Some("EM".into()),
        })
    );

    assert!(r.first_document_party_contact(PartyRole::Seller));
    assert_eq!(r.get_document_party_contact(PartyRole::Seller).unwrap(), sales_contact());
    assert!(!r.next_document_party_contact(PartyRole::Seller));

    for (role, name) in [
        (PartyRole::Buyer, "Kunden AG"),
        (PartyRole::BuyerRequisitioner, "Requisitioner"),
        (PartyRole::ShipTo, "Kunden AG, Lager"),
        (PartyRole::ShipFrom, "Lieferant Lager"),
        (PartyRole::Invoicee, "Kunden AG Buchhaltung"),
    ] {
        assert_eq!(r.get_document_party(role).unwrap().name, name, "{role:?}");
    }
}

#[test]
fn agreement_and_delivery_records() {
    let xml = extended_builder().get_content().unwrap();
    let mut r = OrderDocumentReader::read_content(&xml).unwrap();

    assert_eq!(r.get_document_delivery_terms().unwrap().code, "FCA");

    let quotation = r.get_document_reference(ReferenceKind::Quotation).unwrap().unwrap();
    assert_eq!(quotation.issuer_assigned_id, "QUOT-1");
    assert_eq!(quotation.issue_date, date(2024, 2, 1).and_hms_opt(0, 0, 0));
    for (kind, id) in [
        (ReferenceKind::SellerOrder, "SO-77"),
        (ReferenceKind::Contract, "CON-9"),
        (ReferenceKind::BlanketOrder, "BLANKET-1"),
        (ReferenceKind::PreviousOrderChange, "PO-RT-0"),
        (ReferenceKind::UltimateCustomerOrder, "ULT-9"),
    ] {
        let reference = r.get_document_reference(kind).unwrap().unwrap();
        assert_eq!(reference.issuer_assigned_id, id, "{kind:?}");
    }
    assert!(r.get_document_reference(ReferenceKind::Requisition).unwrap().is_none());

    assert!(r.first_document_additional_referenced_document());
    assert_eq!(r.get_document_additional_referenced_document().unwrap(), drawing());
    assert!(!r.next_document_additional_referenced_document());

    let project = r.get_document_procuring_project().unwrap();
    assert_eq!(project.id, "PROJ-1");
    assert_eq!(project.name.as_deref(), Some("New warehouse"));

    let delivery = r.get_document_requested_delivery().unwrap().unwrap();
    assert_eq!(delivery.occurrence, None);
    assert_eq!(delivery.start, date(2024, 4, 1).and_hms_opt(0, 0, 0));
    assert_eq!(delivery.end, date(2024, 4, 10).and_hms_opt(0, 0, 0));
    let despatch = r.get_document_requested_despatch().unwrap().unwrap();
    assert_eq!(despatch.occurrence, date(2024, 3, 28).and_hms_opt(0, 0, 0));
}

#[test]
fn settlement_records() {
    let xml = extended_builder().get_content().unwrap();
    let mut r = OrderDocumentReader::read_content(&xml).unwrap();

    assert!(r.first_document_payment_means());
    let means = r.get_document_payment_means().unwrap();
    assert_eq!(means.type_code, "58");
    assert_eq!(means.information.as_deref(), Some("SEPA credit transfer"));

    let taxes: Vec<TaxInfo> = r.document_taxes().collect();
    assert_eq!(taxes.len(), 1);
    assert_eq!(taxes[0].calculated_amount, Some(dec!(393.30)));

    let charges: Vec<AllowanceChargeInfo> = r.document_allowance_charges().collect();
    assert_eq!(charges, [volume_discount()]);

    assert!(r.first_document_logistics_service_charge());
    let freight = r.get_document_logistics_service_charge().unwrap();
    assert_eq!(freight.description, "Freight");
    assert_eq!(freight.amount, dec!(120));
    assert_eq!(freight.tax_rate, Some(dec!(19)));

    assert!(r.first_document_payment_term());
    assert_eq!(r.get_document_payment_term().unwrap().description, "30 days net");
    assert!(r.first_document_receivable_accounting_account());
    let account = r.get_document_receivable_accounting_account().unwrap();
    assert_eq!(account.id, "ACC-4711");
    assert_eq!(account.type_code.as_deref(), Some("1"));

    let summation = r.get_document_summation().unwrap();
    assert_eq!(summation.grand_total, dec!(2449.62));
    assert_eq!(summation.allowance_total, Some(dec!(11.50)));
}

#[test]
fn position_records() {
    let xml = extended_builder().get_content().unwrap();
    let mut r = OrderDocumentReader::read_content(&xml).unwrap();

    assert!(r.first_document_position());
    let general = r.get_document_position_general_details().unwrap();
    assert_eq!(general.line_id, "10");
    assert_eq!(general.status_code.as_deref(), Some("1"));
    assert_eq!(general.status_reason_code.as_deref(), Some("DET"));

    assert!(r.first_document_position_note());
    assert_eq!(r.get_document_position_note().unwrap().content, ["Handle with care"]);

    assert_eq!(r.get_document_position_product_details().unwrap(), Some(rack()));
    assert!(r.first_document_position_product_characteristic());
    let weight = r.get_document_position_product_characteristic().unwrap();
    assert_eq!(weight.value_measure, Some(dec!(80)));
    assert_eq!(weight.value_measure_unit.as_deref(), Some("KGM"));
    assert!(r.first_document_position_product_classification());
    assert_eq!(
        r.get_document_position_product_classification().unwrap().list_version_id.as_deref(),
        Some("26")
    );

    assert!(r.first_document_position_product_instance());
    assert_eq!(
        r.get_document_position_product_instance().unwrap(),
        ProductInstanceInfo {
            batch_id: Some("B-2024".into()),
            serial_id: Some("SN-0001".into()),
        }
    );
    assert!(r.next_document_position_product_instance());
    assert_eq!(r.get_document_position_product_instance().unwrap().batch_id, None);
    assert!(!r.next_document_position_product_instance());

    let packaging = r.get_document_position_product_packaging().unwrap().unwrap();
    assert_eq!(packaging.height, Some(dec!(200)));
    assert_eq!(packaging.unit_code.as_deref(), Some("CMT"));
    assert_eq!(
        r.get_document_position_product_origin_country().unwrap().as_deref(),
        Some("FR")
    );
    assert!(r.first_document_position_product_referenced_product());
    assert_eq!(
        r.get_document_position_product_referenced_product().unwrap().unit_quantity,
        Some(dec!(4))
    );

    let catalogue = r
        .get_document_position_reference(ReferenceKind::Catalogue)
        .unwrap()
        .unwrap();
    assert_eq!(catalogue.line_id.as_deref(), Some("55"));
    assert_eq!(
        r.get_document_position_reference(ReferenceKind::Quotation)
            .unwrap()
            .unwrap()
            .line_id
            .as_deref(),
        Some("3")
    );

    let gross = r.get_document_position_gross_price().unwrap().unwrap();
    assert_eq!(gross.amount, dec!(1050));
    assert!(r.first_document_gross_price_allowance_charge());
    assert_eq!(r.get_document_gross_price_allowance_charge().unwrap().actual_amount, dec!(50));
    let net_tax = r.get_document_position_net_price_tax().unwrap().unwrap();
    assert_eq!(net_tax.calculated_amount, Some(dec!(190)));

    let q = r.get_document_position_quantities().unwrap();
    assert_eq!(q.package.unwrap().unit_code, "XCT");
    assert_eq!(q.agreed.unwrap().value, dec!(2));
    assert_eq!(r.get_document_position_partial_delivery_allowed().unwrap(), Some(true));
    let despatch = r.get_document_position_requested_despatch().unwrap().unwrap();
    assert_eq!(despatch.occurrence, None);
    assert_eq!(despatch.end, date(2024, 3, 28).and_hms_opt(0, 0, 0));

    assert_eq!(r.get_document_position_tax().unwrap().unwrap().rate, Some(dec!(19)));
    assert!(r.first_document_position_allowance_charge());
    assert_eq!(
        r.get_document_position_allowance_charge().unwrap().reason.as_deref(),
        Some("Loyalty")
    );
    assert_eq!(
        r.get_document_position_summation().unwrap(),
        Some(LineSummation {
            line_total: dec!(1950),
            total_allowance_charge: Some(dec!(50)),
        })
    );
    assert!(r.first_document_position_receivable_accounting_account());
    assert_eq!(
        r.get_document_position_receivable_accounting_account().unwrap().id,
        "ACC-LINE-1"
    );

    assert!(r.next_document_position());
    assert_eq!(r.get_document_position_general_details().unwrap().line_id, "20");
    assert!(!r.first_document_position_product_instance());
    assert_eq!(
        r.get_document_position_quantities().unwrap().requested.unwrap().value,
        dec!(0)
    );
    assert!(!r.next_document_position());
}

#[test]
fn basic_profile_drops_what_it_cannot_carry() {
    let mut b = OrderDocumentBuilder::with_settings(Profile::Basic, Settings::default());
    b.set_document_information("PO-B", OrderTypeCode::Order, date(2024, 1, 2), "EUR")
        .set_document_party(PartyRole::Seller, "Seller", None, None)
        .set_document_party(PartyRole::Buyer, "Buyer", None, None)
        .set_document_party(PartyRole::ShipFrom, "Warehouse", None, None)
        .set_document_procuring_project("PROJ-1", None)
        .set_document_requested_despatch(Some(date(2024, 1, 5)), None, None)
        .set_document_summation(&DocumentSummation {
            grand_total: dec!(10),
            ..Default::default()
        });
    b.add_new_position("1")
        .set_product_details_name("Widget")
        .set_product_origin_country("DE")
        .add_product_instance(None, Some("SN-1"))
        .set_quantity(dec!(1), "C62")
        .set_summation(dec!(10), None);

    let xml = b.get_content().unwrap();
    assert!(!xml.contains("ShipFromTradeParty"));
    assert!(!xml.contains("SpecifiedProcuringProject"));
    assert!(!xml.contains("RequestedDespatchSupplyChainEvent"));
    assert!(!xml.contains("OriginTradeCountry"));
    assert!(!xml.contains("IndividualTradeProductInstance"));

    let r = OrderDocumentReader::read_content(&xml).unwrap();
    assert_eq!(r.profile(), Profile::Basic);
    assert!(r.validate().is_empty(), "{:?}", r.validate());
}

#[test]
fn written_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order-x.xml");
    let b = extended_builder();
    b.write_file(&path).unwrap();

    let from_file = OrderDocumentReader::read_file(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let from_bytes = OrderDocumentReader::read_bytes(&bytes).unwrap();
    assert_eq!(from_file.document(), from_bytes.document());
    assert_eq!(from_file.document(), b.document());
}
