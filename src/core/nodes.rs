//! Schema primitive nodes and their null-propagating constructors.
//!
//! Every constructor returns `None` when its primary value is absent or
//! empty, regardless of the secondary arguments. This keeps empty schema
//! elements out of the serialized document.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::OrderError;

/// Identifier with an optional scheme (`schemeID`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdType {
    pub value: String,
    pub scheme_id: Option<String>,
}

/// Free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextType {
    pub value: String,
}

/// Code with optional code list references (`listID`, `listVersionID`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeType {
    pub value: String,
    pub list_id: Option<String>,
    pub list_version_id: Option<String>,
}

/// Boolean indicator (`udt:Indicator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorType {
    pub indicator: bool,
}

/// Included note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteType {
    pub content: Vec<TextType>,
    pub content_code: Option<CodeType>,
    pub subject_code: Option<CodeType>,
}

/// Monetary amount; an empty `currency_id` means no `currencyID` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountType {
    pub value: Decimal,
    pub currency_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentType {
    pub value: Decimal,
}

/// Quantity; an empty `unit_code` means no `unitCode` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityType {
    pub value: Decimal,
    pub unit_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureType {
    pub value: Decimal,
    pub unit_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericType {
    pub value: Decimal,
}

/// Date/time string with its EDIFACT format code (`udt:DateTimeString`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeType {
    pub value: String,
    pub format: String,
}

/// Qualified date (`qdt:DateTimeString`), always format `102`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDateTimeType {
    pub value: String,
    pub format: String,
}

/// Period with independently optional start and end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecifiedPeriod {
    pub start: Option<DateTimeType>,
    pub end: Option<DateTimeType>,
}

/// Embedded binary payload (`AttachmentBinaryObject`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryObject {
    pub data: Vec<u8>,
    pub mime_code: String,
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Primary key rule
// ---------------------------------------------------------------------------

/// Whether a constructor argument counts as "present" for the primary key rule.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for &str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for &[u8] {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Decimal {
    fn is_present(&self) -> bool {
        true
    }
}

impl Presence for NaiveDate {
    fn is_present(&self) -> bool {
        true
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        true
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(|v| v.is_present())
    }
}

/// Composite key that is present when any of its parts is.
pub struct AnyOf(pub bool);

impl AnyOf {
    pub fn of(parts: &[&dyn Presence]) -> Self {
        Self(parts.iter().any(|p| p.is_present()))
    }
}

impl Presence for AnyOf {
    fn is_present(&self) -> bool {
        self.0
    }
}

/// Composite key that is present only when all of its parts are.
pub struct AllOf(pub bool);

impl AllOf {
    pub fn of(parts: &[&dyn Presence]) -> Self {
        Self(parts.iter().all(|p| p.is_present()))
    }
}

impl Presence for AllOf {
    fn is_present(&self) -> bool {
        self.0
    }
}

/// Build a node only when its primary key is present.
pub fn keyed<K: Presence, T>(key: K, build: impl FnOnce() -> T) -> Option<T> {
    if key.is_present() { Some(build()) } else { None }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Leaf constructors
// ---------------------------------------------------------------------------

pub fn id(value: Option<&str>, scheme_id: Option<&str>) -> Option<IdType> {
    keyed(value, || IdType {
        value: value.unwrap_or_default().to_string(),
        scheme_id: owned(scheme_id),
    })
}

pub fn text(value: Option<&str>) -> Option<TextType> {
    keyed(value, || TextType {
        value: value.unwrap_or_default().to_string(),
    })
}

pub fn code(value: Option<&str>) -> Option<CodeType> {
    code2(value, None, None)
}

pub fn code2(
    value: Option<&str>,
    list_id: Option<&str>,
    list_version_id: Option<&str>,
) -> Option<CodeType> {
    keyed(value, || CodeType {
        value: value.unwrap_or_default().to_string(),
        list_id: owned(list_id),
        list_version_id: owned(list_version_id),
    })
}

pub fn indicator(value: Option<bool>) -> Option<IndicatorType> {
    value.map(|indicator| IndicatorType { indicator })
}

pub fn note(
    content: Option<&str>,
    content_code: Option<&str>,
    subject_code: Option<&str>,
) -> Option<NoteType> {
    keyed(content, || NoteType {
        content: text(content).into_iter().collect(),
        content_code: code(content_code),
        subject_code: code(subject_code),
    })
}

pub fn amount(value: Option<Decimal>, currency_id: Option<&str>) -> Option<AmountType> {
    value.map(|value| AmountType {
        value,
        currency_id: currency_id.unwrap_or_default().to_string(),
    })
}

pub fn percent(value: Option<Decimal>) -> Option<PercentType> {
    value.map(|value| PercentType { value })
}

pub fn quantity(value: Option<Decimal>, unit_code: Option<&str>) -> Option<QuantityType> {
    value.map(|value| QuantityType {
        value,
        unit_code: unit_code.unwrap_or_default().to_string(),
    })
}

pub fn measure(value: Option<Decimal>, unit_code: Option<&str>) -> Option<MeasureType> {
    value.map(|value| MeasureType {
        value,
        unit_code: unit_code.unwrap_or_default().to_string(),
    })
}

pub fn numeric(value: Option<Decimal>) -> Option<NumericType> {
    value.map(|value| NumericType { value })
}

/// Date node in format `102` (CCYYMMDD).
pub fn date_time(date: Option<NaiveDate>) -> Option<DateTimeType> {
    date.map(|d| DateTimeType {
        value: d.format("%Y%m%d").to_string(),
        format: "102".into(),
    })
}

/// Qualified date node in format `102` (CCYYMMDD).
pub fn formatted_date_time(date: Option<NaiveDate>) -> Option<FormattedDateTimeType> {
    date.map(|d| FormattedDateTimeType {
        value: d.format("%Y%m%d").to_string(),
        format: "102".into(),
    })
}

/// Period node; start and end are independent, the node is absent only when
/// both are.
pub fn specified_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<SpecifiedPeriod> {
    keyed(AnyOf::of(&[&start, &end]), || SpecifiedPeriod {
        start: date_time(start),
        end: date_time(end),
    })
}

/// Binary attachment; absent unless data, MIME code and file name are all given.
pub fn binary_object(
    data: Option<&[u8]>,
    mime_code: Option<&str>,
    filename: Option<&str>,
) -> Option<BinaryObject> {
    keyed(AllOf::of(&[&data, &mime_code, &filename]), || BinaryObject {
        data: data.unwrap_or_default().to_vec(),
        mime_code: mime_code.unwrap_or_default().to_string(),
        filename: filename.unwrap_or_default().to_string(),
    })
}

// ---------------------------------------------------------------------------
// EDIFACT date parsing
// ---------------------------------------------------------------------------

/// Parse a date/time string according to its EDIFACT format code.
///
/// | code | layout |
/// |------|--------|
/// | 101 | YYMMDD |
/// | 102 | CCYYMMDD |
/// | 201 | YYMMDDHHMM |
/// | 202 | YYMMDDHHMMSS |
/// | 203 | CCYYMMDDHHMM |
/// | 204 | CCYYMMDDHHMMSS |
pub fn to_date_time(value: &str, format: &str) -> Result<NaiveDateTime, OrderError> {
    let value = value.trim();
    let parsed = match format.trim() {
        "101" => NaiveDate::parse_from_str(value, "%y%m%d").map(at_midnight),
        "102" => NaiveDate::parse_from_str(value, "%Y%m%d").map(at_midnight),
        "201" => NaiveDateTime::parse_from_str(value, "%y%m%d%H%M"),
        "202" => NaiveDateTime::parse_from_str(value, "%y%m%d%H%M%S"),
        "203" => NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M"),
        "204" => NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S"),
        other => return Err(OrderError::UnknownDateFormat(other.to_string())),
    };
    parsed.map_err(|e| OrderError::InvalidDate {
        value: value.to_string(),
        format: format.to_string(),
        reason: e.to_string(),
    })
}

fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl DateTimeType {
    pub fn to_date_time(&self) -> Result<NaiveDateTime, OrderError> {
        to_date_time(&self.value, &self.format)
    }
}

impl FormattedDateTimeType {
    pub fn to_date_time(&self) -> Result<NaiveDateTime, OrderError> {
        to_date_time(&self.value, &self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn date_codes() {
        let d = to_date_time("20221231", "102").unwrap();
        assert_eq!(d.format("%d.%m.%Y").to_string(), "31.12.2022");

        let d = to_date_time("221231", "101").unwrap();
        assert_eq!(d.format("%d.%m.%Y").to_string(), "31.12.2022");

        let d = to_date_time("2212311430", "201").unwrap();
        assert_eq!(d.format("%d.%m.%y %H:%M").to_string(), "31.12.22 14:30");

        let d = to_date_time("221231143020", "202").unwrap();
        assert_eq!(d.format("%d.%m.%y %H:%M:%S").to_string(), "31.12.22 14:30:20");

        let d = to_date_time("202212311430", "203").unwrap();
        assert_eq!(d.format("%d.%m.%Y %H:%M").to_string(), "31.12.2022 14:30");

        let d = to_date_time("20221231143020", "204").unwrap();
        assert_eq!(d.format("%d.%m.%Y %H:%M:%S").to_string(), "31.12.2022 14:30:20");
    }

    #[test]
    fn unknown_date_code() {
        assert!(matches!(
            to_date_time("20221231", "999"),
            Err(OrderError::UnknownDateFormat(code)) if code == "999"
        ));
    }

    #[test]
    fn malformed_date_value() {
        assert!(matches!(
            to_date_time("20221350", "102"),
            Err(OrderError::InvalidDate { .. })
        ));
    }

    #[test]
    fn leaf_nodes_propagate_absence() {
        assert!(id(None, Some("0088")).is_none());
        assert!(id(Some(""), Some("0088")).is_none());
        assert!(text(Some("")).is_none());
        assert!(code2(None, Some("L"), Some("1")).is_none());
        assert!(note(None, Some("CC"), Some("SC")).is_none());
        assert!(amount(None, Some("EUR")).is_none());
        assert!(quantity(None, Some("C62")).is_none());
        assert!(indicator(None).is_none());
        assert!(specified_period(None, None).is_none());
        assert!(binary_object(Some(b"x"), Some("application/pdf"), None).is_none());
    }

    #[test]
    fn leaf_nodes_carry_values() {
        let n = note(Some("Hello"), Some("CC"), None).unwrap();
        assert_eq!(n.content.len(), 1);
        assert_eq!(n.content[0].value, "Hello");
        assert_eq!(n.content_code.unwrap().value, "CC");
        assert!(n.subject_code.is_none());

        let a = amount(Some(dec!(10.5)), None).unwrap();
        assert_eq!(a.currency_id, "");

        assert!(!indicator(Some(false)).unwrap().indicator);

        let p = specified_period(NaiveDate::from_ymd_opt(2022, 1, 1), None).unwrap();
        assert_eq!(p.start.unwrap().value, "20220101");
        assert!(p.end.is_none());
    }
}
