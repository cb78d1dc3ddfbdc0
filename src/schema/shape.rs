//! Structural validation against a reference format
//!
//! A document is reduced to a canonical signature: the sorted list of
//! `key:kind` pairs, recursing into objects. Arrays contribute the sorted,
//! de-duplicated set of their element signatures.
//!
//! Validation compares objects key by key with the same rules. Arrays are
//! length-agnostic: a list matches when each of its elements matches one of
//! the reference elements, so an empty list matches any reference list.

use super::{child_path, SchemaObject, SchemaValue};
use crate::error::{Result, StudioError};

/// Canonical shape signature of an object. Values do not participate.
pub fn signature(obj: &SchemaObject) -> String {
    let mut pairs: Vec<String> = obj
        .iter()
        .map(|(key, value)| format!("{}:{}", quote_key(key), value_signature(value)))
        .collect();
    pairs.sort();
    format!("{{{}}}", pairs.join(","))
}

fn value_signature(value: &SchemaValue) -> String {
    match value {
        SchemaValue::Object(obj) => signature(obj),
        SchemaValue::ObjectArray(items) => {
            let mut shapes: Vec<String> = items.iter().map(signature).collect();
            shapes.sort();
            shapes.dedup();
            format!("[{}]", shapes.join("|"))
        }
        leaf => leaf.kind().as_str().to_string(),
    }
}

// JSON quoting keeps keys containing separators unambiguous.
fn quote_key(key: &str) -> String {
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
}

/// True when `candidate` has the shape of `reference`
pub fn validate_shape(candidate: &SchemaObject, reference: &SchemaObject) -> bool {
    candidate.len() == reference.len()
        && candidate.iter().all(|(key, value)| {
            reference
                .get(key)
                .is_some_and(|expected| value_matches(value, expected))
        })
}

fn value_matches(value: &SchemaValue, expected: &SchemaValue) -> bool {
    match (value, expected) {
        (SchemaValue::Object(child), SchemaValue::Object(ref_child)) => {
            validate_shape(child, ref_child)
        }
        (SchemaValue::ObjectArray(items), SchemaValue::ObjectArray(ref_items)) => {
            items.iter().all(|item| element_known(item, ref_items))
        }
        _ => value.kind() == expected.kind(),
    }
}

fn element_known(item: &SchemaObject, ref_items: &[SchemaObject]) -> bool {
    ref_items.iter().any(|r| validate_shape(item, r))
}

/// Path of the first NaN or infinite number, in document order
pub fn find_non_finite(obj: &SchemaObject) -> Option<String> {
    find_non_finite_at(obj, "")
}

fn find_non_finite_at(obj: &SchemaObject, path: &str) -> Option<String> {
    for (key, value) in obj.iter() {
        let here = child_path(path, key);
        let found = match value {
            SchemaValue::Number(n) if !n.is_finite() => Some(here),
            SchemaValue::Object(child) => find_non_finite_at(child, &here),
            SchemaValue::ObjectArray(items) => items
                .iter()
                .enumerate()
                .find_map(|(i, item)| find_non_finite_at(item, &format!("{}[{}]", here, i))),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Accept `candidate` only if every number is finite and its shape matches `reference`.
///
/// The number check runs first, so a non-finite value is reported even when the
/// shape also differs.
pub fn load(candidate: SchemaObject, reference: &SchemaObject) -> Result<SchemaObject> {
    if let Some(path) = find_non_finite(&candidate) {
        tracing::warn!("Rejected document with invalid number at '{}'", path);
        return Err(StudioError::InvalidNumber { path });
    }

    if !validate_shape(&candidate, reference) {
        let detail = describe_mismatch(&candidate, reference, "")
            .unwrap_or_else(|| "document shape differs from the reference".to_string());
        tracing::warn!("Rejected document: {}", detail);
        return Err(StudioError::ShapeMismatch(detail));
    }

    Ok(candidate)
}

/// Parse JSON text and [`load`] it against `reference`
pub fn load_str(text: &str, reference: &SchemaObject) -> Result<SchemaObject> {
    let candidate = SchemaObject::parse_str(text)?;
    load(candidate, reference)
}

/// Human-readable description of the first structural difference
fn describe_mismatch(
    candidate: &SchemaObject,
    reference: &SchemaObject,
    path: &str,
) -> Option<String> {
    for key in reference.keys() {
        if candidate.get(key).is_none() {
            return Some(format!("missing key '{}'", child_path(path, key)));
        }
    }

    for (key, value) in candidate.iter() {
        let here = child_path(path, key);
        let Some(expected) = reference.get(key) else {
            return Some(format!("unexpected key '{}'", here));
        };

        if value.kind() != expected.kind() {
            return Some(format!(
                "'{}' is {}, expected {}",
                here,
                value.kind(),
                expected.kind()
            ));
        }

        match (value, expected) {
            (SchemaValue::Object(child), SchemaValue::Object(ref_child)) => {
                if let Some(detail) = describe_mismatch(child, ref_child, &here) {
                    return Some(detail);
                }
            }
            (SchemaValue::ObjectArray(items), SchemaValue::ObjectArray(ref_items)) => {
                let unknown = items
                    .iter()
                    .enumerate()
                    .find(|(_, item)| !element_known(item, ref_items));
                if let Some((index, item)) = unknown {
                    let item_path = format!("{}[{}]", here, index);
                    return Some(
                        ref_items
                            .first()
                            .and_then(|r| describe_mismatch(item, r, &item_path))
                            .unwrap_or_else(|| format!("'{}' has an unknown shape", item_path)),
                    );
                }
            }
            _ => {}
        }
    }

    None
}
