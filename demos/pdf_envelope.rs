use chrono::NaiveDate;
use orderx::core::*;
use orderx::pdf::{OrderDocumentPdfBuilder, OrderDocumentPdfReader};
use orderx::xml::OrderDocumentBuilder;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Err("usage: pdf_envelope <visual.pdf> <order-x.pdf>".into());
    };

    let mut builder = OrderDocumentBuilder::new(Profile::Basic);
    builder
        .set_document_information(
            "PO-2024-002",
            OrderTypeCode::Order,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            "EUR",
        )
        .set_document_party(PartyRole::Seller, "ACME GmbH", None, None)
        .set_document_party(PartyRole::Buyer, "Kunde AG", None, None)
        .set_document_summation(&DocumentSummation {
            line_total: Some(dec!(150)),
            grand_total: dec!(178.50),
            ..Default::default()
        });
    builder
        .add_new_position("1")
        .set_product_details_name("Consulting")
        .set_quantity(dec!(1), "HUR")
        .set_summation(dec!(150), None);

    let envelope = OrderDocumentPdfBuilder::from_file(&builder, &input)?;
    println!("Title: {}", envelope.metadata().title);
    envelope.save(&output)?;
    println!("Wrote {output}");

    // Read it back to show the attachment is found.
    let reader = OrderDocumentPdfReader::read_and_guess_from_file(&output)?;
    println!(
        "Embedded order {} ({})",
        reader.get_document_information()?.document_no,
        reader.profile()
    );
    Ok(())
}
