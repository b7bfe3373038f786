use super::*;
use crate::model::{Chain, Platform};
use crate::store::test_helpers::record;

fn labels(rows: &[DetailRow]) -> Vec<&'static str> {
    rows.iter().map(|r| r.label).collect()
}

#[test]
fn required_fields_always_listed() {
    let rows = detail_rows(&record("1", Platform::MetaMask, Chain::Arb));
    assert_eq!(labels(&rows), vec!["Name", "Platform", "Chain", "Purpose", "Address"]);
    assert_eq!(rows[1].value, "MetaMask");
    assert_eq!(rows[2].value, "ARB");
}

#[test]
fn sensitive_fields_shown_unmasked_when_present() {
    let mut r = record("1", Platform::Binance, Chain::Bnb);
    r.private_key = Some("0xprivate".to_owned());
    r.email = Some("owner@example.com".to_owned());

    let rows = detail_rows(&r);
    assert_eq!(rows[5], DetailRow { label: "Private Key", value: "0xprivate".to_owned() });
    assert_eq!(rows[6], DetailRow { label: "Email", value: "owner@example.com".to_owned() });
}

#[test]
fn empty_optional_strings_are_omitted() {
    let mut r = record("1", Platform::Binance, Chain::Bnb);
    r.private_key = Some(String::new());
    r.email = Some("x@y.z".to_owned());

    assert_eq!(labels(&detail_rows(&r)), vec!["Name", "Platform", "Chain", "Purpose", "Address", "Email"]);
}
