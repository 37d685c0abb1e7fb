#![cfg(feature = "xml")]

use orderx::core::{OrderError, Profile, resolve_by_id, resolve_profile_def_by_id};
use orderx::xml::{self, OrderDocumentReader};

const BASIC: &str = include_str!("fixtures/basic.xml");
const COMFORT: &str = include_str!("fixtures/comfort.xml");
const EXTENDED: &str = include_str!("fixtures/extended.xml");

#[test]
fn fixtures_resolve_to_their_profile() {
    for (xml, expected) in [
        (BASIC, Profile::Basic),
        (COMFORT, Profile::Comfort),
        (EXTENDED, Profile::Extended),
    ] {
        let (profile, descriptor) = xml::resolve(xml).unwrap();
        assert_eq!(profile, expected);
        assert_eq!(descriptor.contextparameter, expected.urn());
        assert_eq!(xml::resolve_profile_id(xml).unwrap(), expected.id());
        assert_eq!(xml::resolve_profile_def(xml).unwrap().name, descriptor.name);
    }
}

#[test]
fn descriptors() {
    let basic = Profile::Basic.descriptor();
    assert_eq!(basic.name, "basic");
    assert_eq!(basic.altname, "BASIC");
    assert_eq!(basic.xmpname, "BASIC");
    assert_eq!(basic.attachmentfilename, "order-x.xml");

    let extended = Profile::Extended.descriptor();
    assert_eq!(extended.contextparameter, "urn:order-x.eu:1p0:extended");
    assert!(extended.schematronfilename.ends_with("_EXTENDED.sch"));
}

#[test]
fn profiles_are_ordered_by_capability() {
    assert!(Profile::Basic < Profile::Comfort);
    assert!(Profile::Comfort < Profile::Extended);
    let ids: Vec<u8> = Profile::ALL.iter().map(|p| p.id()).collect();
    assert_eq!(ids, [0, 1, 2]);
}

#[test]
fn lookup_by_id() {
    assert_eq!(resolve_by_id(1).unwrap(), Profile::Comfort);
    assert_eq!(resolve_profile_def_by_id(2).unwrap().altname, "EXTENDED");
    assert!(matches!(resolve_by_id(9), Err(OrderError::UnknownProfile(_))));
    assert!(matches!(resolve_profile_def_by_id(3), Err(OrderError::UnknownProfile(_))));
}

#[test]
fn urn_lookup_trims_whitespace() {
    assert_eq!(
        Profile::from_urn("  urn:order-x.eu:1p0:comfort\n"),
        Some(Profile::Comfort)
    );
    assert_eq!(Profile::from_urn("urn:factur-x.eu:1p0:basic"), None);
}

#[test]
fn guideline_with_surrounding_whitespace_resolves() {
    let xml = BASIC.replace(
        "<ram:ID>urn:order-x.eu:1p0:basic</ram:ID>",
        "<ram:ID>\n        urn:order-x.eu:1p0:basic\n      </ram:ID>",
    );
    assert_eq!(xml::resolve(&xml).unwrap().0, Profile::Basic);
}

#[test]
fn other_prefix_is_accepted() {
    let xml = BASIC
        .replace("rsm:", "o:")
        .replace("xmlns:rsm=", "xmlns:o=");
    assert_eq!(xml::resolve(&xml).unwrap().0, Profile::Basic);
    let reader = OrderDocumentReader::read_content(&xml).unwrap();
    assert_eq!(reader.get_document_information().unwrap().document_no, "PO123456789");
}

#[test]
fn invoice_document_is_unknown_content() {
    let cii = r#"<?xml version="1.0" encoding="UTF-8"?>
<rsm:CrossIndustryInvoice xmlns:rsm="urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100"
    xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100">
  <rsm:ExchangedDocumentContext>
    <ram:GuidelineSpecifiedDocumentContextParameter>
      <ram:ID>urn:cen.eu:en16931:2017</ram:ID>
    </ram:GuidelineSpecifiedDocumentContextParameter>
  </rsm:ExchangedDocumentContext>
</rsm:CrossIndustryInvoice>"#;
    assert!(matches!(xml::resolve(cii), Err(OrderError::UnknownXmlContent)));
    assert!(matches!(
        OrderDocumentReader::read_content(cii),
        Err(OrderError::UnknownXmlContent)
    ));
}

#[test]
fn missing_guideline_is_unknown_profile() {
    let xml = BASIC.replace("urn:order-x.eu:1p0:basic", "");
    assert!(matches!(xml::resolve(&xml), Err(OrderError::UnknownProfile(_))));
}

#[test]
fn unknown_profile_message_names_the_problem() {
    let xml = BASIC.replace("urn:order-x.eu:1p0:basic", "urn:order-x.eu:1p0:premium");
    let err = xml::resolve(&xml).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cannot determine the profile by the given content");
}
