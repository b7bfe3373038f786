//! Read-only detail view of one record.
//!
//! Sensitive fields (private key, email) are shown in full whenever present.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use crate::model::WalletRecord;

/// One labelled line of the detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Rows for `record`, in display order. Empty optional fields are omitted.
#[must_use]
pub fn detail_rows(record: &WalletRecord) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow { label: "Name", value: record.name.clone() },
        DetailRow { label: "Platform", value: record.platform.to_string() },
        DetailRow { label: "Chain", value: record.chain.to_string() },
        DetailRow { label: "Purpose", value: record.purpose.clone() },
        DetailRow { label: "Address", value: record.address.clone() },
    ];
    let optional = [("Private Key", &record.private_key), ("Email", &record.email)];
    for (label, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            rows.push(DetailRow { label, value: value.to_owned() });
        }
    }
    rows
}
