use chrono::NaiveDate;
use orderx::core::*;
use orderx::xml::OrderDocumentBuilder;
use rust_decimal_macros::dec;

fn main() {
    env_logger::init();

    let order_date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let mut builder = OrderDocumentBuilder::new(Profile::Comfort);
    builder
        .set_document_information("PO-2024-001", OrderTypeCode::Order, order_date, "EUR")
        .set_document_buyer_reference("04011000-12345-03")
        .add_document_note("Please deliver to the loading dock", None, Some("AAI"))
        .set_document_party(PartyRole::Seller, "ACME GmbH", Some("SUP-1"), None)
        .set_document_party_address(
            PartyRole::Seller,
            &PostalAddress {
                line_one: Some("Friedrichstraße 123".into()),
                postcode: Some("10115".into()),
                city: Some("Berlin".into()),
                country: Some("DE".into()),
                ..Default::default()
            },
        )
        .add_document_party_tax_registration(PartyRole::Seller, "VA", "DE123456789")
        .set_document_party(PartyRole::Buyer, "Kunde AG", None, None)
        .add_document_party_contact(
            PartyRole::Buyer,
            &ContactInfo {
                person_name: Some("Max Mustermann".into()),
                email: Some("max@kunde.de".into()),
                ..Default::default()
            },
        )
        .set_document_delivery_terms(&DeliveryTermsInfo {
            code: "FCA".into(),
            ..Default::default()
        })
        .set_document_requested_delivery(NaiveDate::from_ymd_opt(2024, 7, 1), None, None)
        .add_document_payment_means("58", Some("SEPA credit transfer"))
        .add_document_payment_term("30 days net")
        .set_document_summation(&DocumentSummation {
            line_total: Some(dec!(1249.90)),
            tax_basis_total: Some(dec!(1249.90)),
            tax_total: Some(dec!(237.48)),
            grand_total: dec!(1487.38),
            ..Default::default()
        });

    builder
        .add_new_position("1")
        .set_product_details(&ProductDetails {
            name: "Office chair".into(),
            seller_assigned_id: Some("CH-200".into()),
            ..Default::default()
        })
        .add_product_characteristic(&ProductCharacteristicInfo {
            description: "Colour".into(),
            value: Some("Black".into()),
            ..Default::default()
        })
        .set_net_price(dec!(240), None, None)
        .set_quantity(dec!(5), "C62")
        .set_summation(dec!(1200), None);
    builder
        .add_new_position("2")
        .set_product_details_name("Desk lamp")
        .set_net_price(dec!(49.90), None, None)
        .set_quantity(dec!(1), "C62")
        .set_summation(dec!(49.90), None);

    let errors = builder.validate();
    if errors.is_empty() {
        println!("Order is valid for profile {}", builder.profile());
    } else {
        for e in &errors {
            println!("  Validation: {e}");
        }
    }

    match builder.get_content() {
        Ok(xml) => println!("{xml}"),
        Err(e) => eprintln!("Serialization failed: {e}"),
    }
}
