//! In-place edits applied by the form
//!
//! Numeric text policy: empty text becomes 0, text that does not parse to a
//! finite number is rejected and the previous value stays in place.

use super::{SchemaObject, SchemaValue};

/// Coerce numeric field text. `None` means the edit is rejected.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shift-click range select: set every boolean field between `anchor` and
/// `clicked` (inclusive, field positions within `obj`) to true.
///
/// Non-boolean fields inside the range are left alone. Returns how many
/// fields changed from false to true.
pub fn select_bool_range(obj: &mut SchemaObject, anchor: usize, clicked: usize) -> usize {
    let fields = obj.fields_mut();
    if fields.is_empty() {
        return 0;
    }
    let last = fields.len() - 1;
    let lo = anchor.min(clicked).min(last);
    let hi = anchor.max(clicked).min(last);

    let mut changed = 0;
    for (_, value) in &mut fields[lo..=hi] {
        if let SchemaValue::Bool(flag) = value {
            if !*flag {
                *flag = true;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels() -> SchemaObject {
        SchemaObject::new()
            .with_field("position", SchemaValue::Bool(false))
            .with_field("velocity", SchemaValue::Bool(false))
            .with_field("gain", SchemaValue::Number(2.0))
            .with_field("current", SchemaValue::Bool(false))
            .with_field("voltage", SchemaValue::Bool(false))
    }

    #[test]
    fn test_coerce_number_policy() {
        assert_eq!(coerce_number(""), Some(0.0));
        assert_eq!(coerce_number("   "), Some(0.0));
        assert_eq!(coerce_number(" 12.5 "), Some(12.5));
        assert_eq!(coerce_number("-3"), Some(-3.0));
        assert_eq!(coerce_number("1e3"), Some(1000.0));
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn test_range_select_sets_only_booleans() {
        let mut obj = channels();
        let changed = select_bool_range(&mut obj, 3, 1);
        assert_eq!(changed, 2);
        assert_eq!(obj.get("position"), Some(&SchemaValue::Bool(false)));
        assert_eq!(obj.get("velocity"), Some(&SchemaValue::Bool(true)));
        assert_eq!(obj.get("gain"), Some(&SchemaValue::Number(2.0)));
        assert_eq!(obj.get("current"), Some(&SchemaValue::Bool(true)));
        assert_eq!(obj.get("voltage"), Some(&SchemaValue::Bool(false)));
    }

    #[test]
    fn test_range_select_single_field_and_clamping() {
        let mut obj = channels();
        assert_eq!(select_bool_range(&mut obj, 0, 0), 1);
        assert_eq!(select_bool_range(&mut obj, 3, 99), 2);
        assert_eq!(obj.get("voltage"), Some(&SchemaValue::Bool(true)));
        assert_eq!(select_bool_range(&mut SchemaObject::new(), 0, 4), 0);
    }

    #[test]
    fn test_range_select_keeps_keys() {
        let mut obj = channels();
        let before: Vec<String> = obj.keys().map(String::from).collect();
        select_bool_range(&mut obj, 0, 4);
        let after: Vec<String> = obj.keys().map(String::from).collect();
        assert_eq!(before, after);
    }
}
