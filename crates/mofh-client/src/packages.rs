//! Package listing extraction.

use crate::response::{DecodedResponse, FieldValue};
use mofh_core::PackageSummary;
use tracing::warn;

/// Extracts package descriptors from a `listpkgs` response.
///
/// Descriptors are either bare names or records with `name`, `quota` and
/// `bandwidth`. Entries without a usable name are skipped.
pub fn parse_packages(response: &dyn DecodedResponse) -> Vec<PackageSummary> {
    let items = match response.get("package") {
        Some(value) => value.into_items(),
        None => response.root_items().unwrap_or_default(),
    };

    items
        .iter()
        .filter_map(|item| {
            let summary = summarize(item);
            if summary.is_none() {
                warn!("Skipping package descriptor without a name: {:?}", item);
            }
            summary
        })
        .collect()
}

fn summarize(item: &FieldValue) -> Option<PackageSummary> {
    match item {
        FieldValue::Scalar(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| PackageSummary::named(name))
        }
        FieldValue::Record(_) => {
            let name = text(item, &["name"])?;
            let title = text(item, &["title", "displayname"]).unwrap_or_else(|| name.clone());
            Some(PackageSummary {
                title,
                name,
                quota_bytes: number(item, &["quota", "QUOTA"]),
                bandwidth_bytes: number(item, &["bandwidth", "BWLIMIT"]),
            })
        }
        FieldValue::Null | FieldValue::List(_) => None,
    }
}

fn text(item: &FieldValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.field(key).and_then(FieldValue::as_text))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Non-numeric limits such as "unlimited" have no byte value.
fn number(item: &FieldValue, keys: &[&str]) -> Option<u64> {
    text(item, keys).and_then(|value| value.parse().ok())
}
