use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use orderx::core::*;
use orderx::xml::{self, OrderDocumentBuilder, OrderDocumentReader};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn build_order(lines: u32) -> OrderDocumentBuilder {
    let mut builder = OrderDocumentBuilder::with_settings(Profile::Comfort, Settings::default());
    builder
        .set_document_information("BENCH-001", OrderTypeCode::Order, test_date(), "EUR")
        .set_document_party(PartyRole::Seller, "Benchmark GmbH", None, None)
        .add_document_party_tax_registration(PartyRole::Seller, "VA", "DE123456789")
        .set_document_party(PartyRole::Buyer, "Kunde AG", None, None)
        .set_document_summation(&DocumentSummation {
            line_total: Some(Decimal::from(lines) * dec!(600)),
            grand_total: Decimal::from(lines) * dec!(714),
            ..Default::default()
        });

    for i in 1..=lines {
        builder
            .add_new_position(&i.to_string())
            .set_product_details_name(&format!("Item {i}"))
            .set_net_price(dec!(120), None, None)
            .set_quantity(dec!(5), "H87")
            .set_tax(&TaxInfo {
                category_code: "S".into(),
                type_code: Some("VAT".into()),
                rate: Some(dec!(19)),
                ..Default::default()
            })
            .set_summation(dec!(600), None);
    }
    builder
}

fn bench_build_order(c: &mut Criterion) {
    c.bench_function("build_order_10_lines", |b| {
        b.iter(|| black_box(build_order(10)));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let builder = build_order(10);
    c.bench_function("serialize_10_lines", |b| {
        b.iter(|| black_box(black_box(&builder).get_content()));
    });
}

fn bench_resolve(c: &mut Criterion) {
    let content = build_order(10).get_content().unwrap();
    c.bench_function("resolve_profile", |b| {
        b.iter(|| black_box(xml::resolve(black_box(&content))));
    });
}

fn bench_read(c: &mut Criterion) {
    let content = build_order(10).get_content().unwrap();
    c.bench_function("read_10_lines", |b| {
        b.iter(|| black_box(OrderDocumentReader::read_content(black_box(&content))));
    });
}

fn bench_walk_positions(c: &mut Criterion) {
    let content = build_order(1000).get_content().unwrap();
    let mut reader = OrderDocumentReader::read_content(&content).unwrap();
    c.bench_function("walk_1000_positions", |b| {
        b.iter(|| {
            let mut total = Decimal::ZERO;
            let mut more = reader.first_document_position();
            while more {
                if let Ok(Some(s)) = reader.get_document_position_summation() {
                    total += s.line_total;
                }
                more = reader.next_document_position();
            }
            black_box(total)
        });
    });
}

fn bench_read_1000_lines(c: &mut Criterion) {
    let content = build_order(1000).get_content().unwrap();
    c.bench_function("read_1000_lines", |b| {
        b.iter(|| black_box(OrderDocumentReader::read_content(black_box(&content))));
    });
}

fn bench_validate(c: &mut Criterion) {
    let builder = build_order(10);
    c.bench_function("validate_10_lines", |b| {
        b.iter(|| black_box(black_box(&builder).validate()));
    });
}

criterion_group!(
    benches,
    bench_build_order,
    bench_serialize,
    bench_resolve,
    bench_read,
    bench_walk_positions,
    bench_read_1000_lines,
    bench_validate,
);
criterion_main!(benches);
