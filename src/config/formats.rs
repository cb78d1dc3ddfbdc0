//! Reference formats for configuration and logging documents
//!
//! A reference format is an example document whose shape is normative: any
//! document loaded into an editor must match it key for key and kind for kind.
//! New documents start as a deep copy of the format.
//!
//! The built-in formats can be replaced by dropping a `formats.json` next to
//! the app state; missing sections fall back to the built-in ones.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::app_data_dir;
use crate::error::{Result, StudioError};
use crate::schema::{OptionCatalog, SchemaObject, SchemaValue};

/// Formats override filename
pub const FORMATS_FILE: &str = "formats.json";

/// Which reference format an editor validates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatKind {
    /// Drive parameters (`config.get` / `config.set`)
    #[default]
    Configuration,
    /// Logging channels and trigger (`log.start`)
    Logging,
}

impl FormatKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FormatKind::Configuration => "Configuration",
            FormatKind::Logging => "Log Settings",
        }
    }
}

/// Reference formats plus the option lists used by their enum fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatLibrary {
    #[serde(default = "default_configuration_format")]
    pub configuration: SchemaObject,
    #[serde(default = "default_logging_format")]
    pub logging: SchemaObject,
    #[serde(default)]
    pub options: OptionCatalog,
}

impl Default for FormatLibrary {
    fn default() -> Self {
        Self {
            configuration: default_configuration_format(),
            logging: default_logging_format(),
            options: OptionCatalog::default(),
        }
    }
}

impl FormatLibrary {
    /// Load the override from the app data dir, or the built-in formats
    pub fn load_or_default() -> Self {
        let Some(path) = app_data_dir().map(|d| d.join(FORMATS_FILE)) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(library) => {
                tracing::info!("Loaded reference formats from {:?}", path);
                library
            }
            Err(e) => {
                tracing::warn!("Ignoring {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StudioError::Config(format!("Failed to read formats: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| StudioError::Config(format!("Failed to parse formats: {}", e)))
    }

    pub fn reference(&self, kind: FormatKind) -> &SchemaObject {
        match kind {
            FormatKind::Configuration => &self.configuration,
            FormatKind::Logging => &self.logging,
        }
    }

    /// Fresh document: a deep copy of the reference format
    pub fn template(&self, kind: FormatKind) -> SchemaObject {
        self.reference(kind).clone()
    }
}

fn num(n: f64) -> SchemaValue {
    SchemaValue::Number(n)
}

fn flag(b: bool) -> SchemaValue {
    SchemaValue::Bool(b)
}

fn choice(s: &str) -> SchemaValue {
    SchemaValue::EnumString(s.to_string())
}

fn default_configuration_format() -> SchemaObject {
    let system = SchemaObject::new()
        .with_field("axis_count", num(2.0))
        .with_field("control_period_us", num(250.0))
        .with_field("auto_enable", flag(false));

    let limits = SchemaObject::new()
        .with_field("max_speed", num(3000.0))
        .with_field("max_acceleration", num(10000.0))
        .with_field("max_current", num(4.5))
        .with_field("soft_limits", flag(true));

    let motion = SchemaObject::new()
        .with_field("kp", num(12.0))
        .with_field("ki", num(0.5))
        .with_field("kd", num(0.05))
        .with_field("feedforward", flag(true));

    let condition = SchemaObject::new()
        .with_field("kind", choice("CONDITION_OVERCURRENT"))
        .with_field("threshold", num(5.0))
        .with_field("latch", flag(true))
        .with_field("combine", choice("COMBINATOR_OR"));

    let faults = SchemaObject::new()
        .with_field("stop_on_fault", flag(true))
        .with_field("conditions", SchemaValue::ObjectArray(vec![condition]));

    SchemaObject::new()
        .with_field("system", SchemaValue::Object(system))
        .with_field("limits", SchemaValue::Object(limits))
        .with_field("motion", SchemaValue::Object(motion))
        .with_field("faults", SchemaValue::Object(faults))
}

fn default_logging_format() -> SchemaObject {
    let channels = [
        ("position", true),
        ("velocity", true),
        ("following_error", false),
        ("current", false),
        ("voltage", false),
        ("temperature", false),
        ("state", true),
    ]
    .into_iter()
    .fold(SchemaObject::new(), |obj, (name, on)| {
        obj.with_field(name, flag(on))
    });

    let trigger = SchemaObject::new()
        .with_field("enabled", flag(false))
        .with_field("kind", choice("CONDITION_POSITION_ERROR"))
        .with_field("combine", choice("COMBINATOR_AND"))
        .with_field("level", num(0.0));

    let log = SchemaObject::new()
        .with_field("interval_ms", num(10.0))
        .with_field("max_samples", num(100_000.0))
        .with_field("channels", SchemaValue::Object(channels))
        .with_field("trigger", SchemaValue::Object(trigger));

    SchemaObject::new().with_field("log", SchemaValue::Object(log))
}
