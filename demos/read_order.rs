use orderx::core::PartyRole;
use orderx::xml::{self, OrderDocumentReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: read_order <order-x.xml>")?;
    let xml = std::fs::read_to_string(&path)?;

    let (profile, descriptor) = xml::resolve(&xml)?;
    println!("Profile: {profile} ({})", descriptor.contextparameter);

    let mut reader = OrderDocumentReader::read_content(&xml)?;
    let info = reader.get_document_information()?;
    println!("Order {} of type {} in {}", info.document_no, info.document_type_code, info.currency);
    if let Some(date) = info.document_date {
        println!("Issued: {}", date.format("%d.%m.%Y"));
    }
    for role in [PartyRole::Seller, PartyRole::Buyer, PartyRole::ShipTo] {
        if let Some(party) = reader.get_document_party(role) {
            println!("{role:?}: {}", party.name);
        }
    }

    // Cursor-style walk over the positions.
    let mut more = reader.first_document_position();
    while more {
        let general = reader.get_document_position_general_details()?;
        let name = reader
            .get_document_position_product_details()?
            .map(|p| p.name)
            .unwrap_or_default();
        let quantities = reader.get_document_position_quantities()?;
        match quantities.requested {
            Some(q) => println!("  {}: {} x {} {}", general.line_id, name, q.value, q.unit_code),
            None => println!("  {}: {}", general.line_id, name),
        }
        more = reader.next_document_position();
    }

    if let Some(summation) = reader.get_document_summation() {
        println!("{}", serde_json::to_string_pretty(&summation)?);
    }

    let errors = reader.validate();
    for e in &errors {
        println!("  Validation: {e}");
    }
    Ok(())
}
