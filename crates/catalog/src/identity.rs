//! Identifier generation for catalog entries without a native identifier and
//! for custom specifications.
//!
//! Identifiers are UUID shaped (`xxxxxxxx-xxxx-4xxx-xxxx-xxxxxxxxxxxx`) but are
//! derived from a 32-bit rolling hash of a composite key, so the same key
//! always yields the same identifier. Records already stored reference these
//! values, so the algorithm must not change.

use chrono::{DateTime, Utc};
use models::{ComponentType, CustomFields, CustomSpecification};

/// `h = h * 31 + unit` over the UTF-16 code units of `key`, wrapping at 32 bits.
pub fn rolling_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Renders the hash of `key` as a UUID-shaped identifier. The third group
/// always starts with `4`.
pub fn identifier_from_key(key: &str) -> String {
    // widen first so that i32::MIN has a magnitude
    let magnitude = i64::from(rolling_hash(key)).abs();
    let hex = format!("{magnitude:032x}");

    format!(
        "{}-{}-4{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[13..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Composite key of a catalog model: `brand-series-model-index`, where index
/// is the position of the model within its brand/series group.
pub fn catalog_key(brand: &str, series: &str, model: &str, index: usize) -> String {
    format!("{brand}-{series}-{model}-{index}")
}

pub fn catalog_identifier(brand: &str, series: &str, model: &str, index: usize) -> String {
    identifier_from_key(&catalog_key(brand, series, model, index))
}

/// Composite key of a custom specification:
/// `componentType-serializedFields-millis`.
pub fn custom_key(component: ComponentType, fields: &CustomFields, at: DateTime<Utc>) -> String {
    let serialized =
        serde_json::to_string(&fields.field_map()).unwrap_or_else(|_| String::from("{}"));
    format!("{component}-{serialized}-{}", at.timestamp_millis())
}

/// Assigns an identifier to a custom specification. The timestamp is part of
/// the key, so the same fields submitted at different instants produce
/// different identifiers.
pub fn specify(fields: CustomFields, at: DateTime<Utc>) -> CustomSpecification {
    let identifier = identifier_from_key(&custom_key(fields.component_type(), &fields, at));
    CustomSpecification { fields, identifier }
}

/// Whether `s` has the `8-4-4-4-12` lowercase-or-uppercase hex shape.
pub fn is_identifier_shaped(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    let lens = [8, 4, 4, 4, 12];

    groups.len() == lens.len()
        && groups
            .iter()
            .zip(lens)
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}
