use crate::error::SplitError;
use crate::patterns::schema::PatternTableDef;
use crate::patterns::PatternSet;

const LEGAL_US_JSON: &str = include_str!("../../../../patterns/legal-us.json");

/// Available predefined pattern tables.
pub const PRESETS: &[&str] = &["legal"];

/// Preset used when neither `--preset` nor `--patterns` is given.
pub const DEFAULT_PRESET: &str = "legal";

/// Load a predefined pattern table definition by name.
pub fn load_preset_def(name: &str) -> Result<PatternTableDef, SplitError> {
    match name {
        "legal" => {
            let def: PatternTableDef = serde_json::from_str(LEGAL_US_JSON)?;
            Ok(def)
        }
        _ => Err(SplitError::PatternInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Load and compile a predefined pattern table by name.
pub fn load_preset(name: &str) -> Result<PatternSet, SplitError> {
    PatternSet::compile(&load_preset_def(name)?)
}
