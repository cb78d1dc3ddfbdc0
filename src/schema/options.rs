//! Option lists for enum-string fields
//!
//! The option set of a string field is chosen by its key: `kind` selects a
//! condition, every other string key selects a combinator.

use serde::{Deserialize, Serialize};

/// Key whose values come from the conditions list
pub const CONDITION_KEY: &str = "kind";

/// Named option lists offered by enum-string selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCatalog {
    #[serde(default = "default_conditions")]
    pub conditions: Vec<String>,
    #[serde(default = "default_combinators")]
    pub combinators: Vec<String>,
}

fn default_conditions() -> Vec<String> {
    [
        "CONDITION_NONE",
        "CONDITION_POSITION_ERROR",
        "CONDITION_VELOCITY_ERROR",
        "CONDITION_OVERCURRENT",
        "CONDITION_OVERVOLTAGE",
        "CONDITION_UNDERVOLTAGE",
        "CONDITION_OVERTEMPERATURE",
        "CONDITION_LIMIT_SWITCH",
        "CONDITION_EMERGENCY_STOP",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_combinators() -> Vec<String> {
    ["COMBINATOR_AND", "COMBINATOR_OR"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            conditions: default_conditions(),
            combinators: default_combinators(),
        }
    }
}

impl OptionCatalog {
    /// Options offered for a string field named `key`
    pub fn options_for(&self, key: &str) -> &[String] {
        if key == CONDITION_KEY {
            &self.conditions
        } else {
            &self.combinators
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        let catalog = OptionCatalog::default();
        assert!(catalog
            .options_for("kind")
            .contains(&"CONDITION_OVERCURRENT".to_string()));
        assert_eq!(catalog.options_for("combine"), catalog.combinators.as_slice());
        assert_eq!(catalog.options_for("mode"), catalog.combinators.as_slice());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let catalog: OptionCatalog =
            serde_json::from_str(r#"{"combinators":["COMBINATOR_XOR"]}"#).unwrap();
        assert_eq!(catalog.combinators, vec!["COMBINATOR_XOR".to_string()]);
        assert_eq!(catalog.conditions, default_conditions());
    }
}
