//! Property-based tests for the node constructors and the EDIFACT date parser.
//!
//! Run with: `cargo test --test node_factory_tests`

#![cfg(feature = "core")]

use chrono::{Datelike, NaiveDate, Timelike};
use orderx::core::nodes::{self, to_date_time};
use orderx::core::{OrderError, factory};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1950i32..2049, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._-]{1,24}"
}

proptest! {
    #[test]
    fn date_nodes_parse_back_to_the_same_day(date in arb_date()) {
        let node = nodes::date_time(Some(date)).unwrap();
        prop_assert_eq!(node.format.as_str(), "102");
        let parsed = node.to_date_time().unwrap();
        prop_assert_eq!(parsed.date(), date);
        prop_assert_eq!(parsed.hour(), 0);

        let formatted = nodes::formatted_date_time(Some(date)).unwrap();
        prop_assert_eq!(formatted.to_date_time().unwrap().date(), date);
    }

    #[test]
    fn every_known_format_agrees_on_the_calendar_day(
        date in arb_date(),
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let dt = date.and_hms_opt(hour, minute, second).unwrap();
        let cases = [
            ("101", dt.format("%y%m%d").to_string()),
            ("102", dt.format("%Y%m%d").to_string()),
            ("201", dt.format("%y%m%d%H%M").to_string()),
            ("202", dt.format("%y%m%d%H%M%S").to_string()),
            ("203", dt.format("%Y%m%d%H%M").to_string()),
            ("204", dt.format("%Y%m%d%H%M%S").to_string()),
        ];
        for (code, value) in cases {
            let parsed = to_date_time(&value, code).unwrap();
            prop_assert_eq!(parsed.month(), date.month());
            prop_assert_eq!(parsed.day(), date.day());
        }
        let full = to_date_time(&dt.format("%Y%m%d%H%M%S").to_string(), "204").unwrap();
        prop_assert_eq!(full, dt);
    }

    #[test]
    fn unknown_format_codes_are_rejected(code in "[0-9]{3}") {
        prop_assume!(!["101", "102", "201", "202", "203", "204"].contains(&code.as_str()));
        let is_unknown = matches!(
            to_date_time("20221231", &code),
            Err(OrderError::UnknownDateFormat(c)) if c == code
        );
        prop_assert!(is_unknown);
    }

    #[test]
    fn absent_primary_value_wins_over_secondaries(secondary in arb_text()) {
        let s = Some(secondary.as_str());
        prop_assert!(nodes::id(None, s).is_none());
        prop_assert!(nodes::id(Some(""), s).is_none());
        prop_assert!(nodes::code2(None, s, s).is_none());
        prop_assert!(nodes::note(None, s, s).is_none());
        prop_assert!(nodes::amount(None, s).is_none());
        prop_assert!(nodes::quantity(None, s).is_none());
        prop_assert!(nodes::measure(None, s).is_none());
        prop_assert!(factory::trade_party(None, s, s).is_none());
        prop_assert!(factory::payment_means(Some(""), s).is_none());
        prop_assert!(factory::referenced_document(None, s, None).is_none());
        prop_assert!(factory::procuring_project(None, s).is_none());
        prop_assert!(factory::accounting_account(None, s).is_none());
    }

    #[test]
    fn present_primary_value_is_kept_verbatim(value in arb_text(), scheme in arb_text()) {
        let id = nodes::id(Some(value.as_str()), Some(scheme.as_str())).unwrap();
        prop_assert_eq!(&id.value, &value);
        prop_assert_eq!(id.scheme_id.as_deref(), Some(scheme.as_str()));

        let party = factory::trade_party(Some(value.as_str()), None, None).unwrap();
        prop_assert_eq!(&party.name.value, &value);
        prop_assert!(party.ids.is_empty());
    }

    #[test]
    fn amounts_keep_their_value(mantissa in -1_000_000i64..1_000_000, scale in 0u32..4) {
        let value = Decimal::new(mantissa, scale);
        let amount = nodes::amount(Some(value), None).unwrap();
        prop_assert_eq!(amount.value, value);
        prop_assert!(amount.currency_id.is_empty());
    }
}

#[test]
fn display_of_parsed_dates() {
    let d = to_date_time("20221231", "102").unwrap();
    assert_eq!(d.format("%d.%m.%Y").to_string(), "31.12.2022");

    let d = to_date_time("221231143020", "202").unwrap();
    assert_eq!(d.format("%d.%m.%y %H:%M:%S").to_string(), "31.12.22 14:30:20");
}

#[test]
fn unknown_format_999() {
    let err = to_date_time("20221231", "999").unwrap_err();
    assert!(matches!(err, OrderError::UnknownDateFormat(ref c) if c == "999"));
    insta::assert_snapshot!(err.to_string(), @"unknown date format code: 999");
}

#[test]
fn period_bounds_are_independent() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1);
    let end = NaiveDate::from_ymd_opt(2024, 1, 31);

    let only_end = nodes::specified_period(None, end).unwrap();
    assert!(only_end.start.is_none());
    assert_eq!(only_end.end.unwrap().value, "20240131");

    let event = factory::supply_chain_event(start, start, end).unwrap();
    assert!(event.occurrence.is_some());
    let period = event.period.unwrap();
    assert!(period.start.is_some() && period.end.is_some());
}

#[test]
fn binary_object_needs_all_three_parts() {
    let data: &[u8] = b"%PDF-1.7";
    assert!(nodes::binary_object(Some(data), Some("application/pdf"), Some("a.pdf")).is_some());
    assert!(nodes::binary_object(None, Some("application/pdf"), Some("a.pdf")).is_none());
    assert!(nodes::binary_object(Some(data), Some(""), Some("a.pdf")).is_none());
    assert!(nodes::binary_object(Some(data), Some("application/pdf"), None).is_none());
}

#[test]
fn percent_and_numeric_wrap_values() {
    assert_eq!(nodes::percent(Some(dec!(19))).unwrap().value, dec!(19));
    assert!(nodes::numeric(None).is_none());
    assert!(nodes::indicator(Some(false)).is_some_and(|i| !i.indicator));
}
