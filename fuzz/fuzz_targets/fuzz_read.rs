#![no_main]

use libfuzzer_sys::fuzz_target;
use orderx::core::PartyRole;
use orderx::xml::OrderDocumentReader;

fuzz_target!(|data: &[u8]| {
    let Ok(mut reader) = OrderDocumentReader::read_bytes(data) else {
        return;
    };
    // Every getter must cope with whatever the parser accepted.
    let _ = reader.get_document_information();
    let _ = reader.get_document_party(PartyRole::Seller);
    let _ = reader.get_document_requested_delivery();
    let _ = reader.validate();
    let mut more = reader.first_document_position();
    while more {
        let _ = reader.get_document_position_product_details();
        let _ = reader.get_document_position_requested_delivery();
        let _ = reader.get_document_position_summation();
        more = reader.next_document_position();
    }
});
