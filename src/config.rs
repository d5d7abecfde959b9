//! Synthesis configuration
//!
//! Loaded from an optional YAML file. Every key has a default, so an empty
//! file (or no file at all) yields the stock behavior.
//!
//! ```yaml
//! id_prefix: "TC_{requirement_id}_"
//! default_states: [INIT, ACTIVE, IDLE, ERROR]
//! full_table_limit: 3
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder substituted into `id_prefix`
pub const REQUIREMENT_PLACEHOLDER: &str = "{requirement_id}";

/// Tunables for one synthesis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisConfig {
    /// Test case id prefix; `{requirement_id}` is substituted
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// State vocabulary used when the state field has no allowed values
    #[serde(default = "default_states")]
    pub default_states: Vec<String>,

    /// Largest relevant-field count that still gets a full truth table
    #[serde(default = "default_full_table_limit")]
    pub full_table_limit: usize,
}

fn default_id_prefix() -> String {
    format!("TC_{}_", REQUIREMENT_PLACEHOLDER)
}

fn default_states() -> Vec<String> {
    ["INIT", "ACTIVE", "IDLE", "ERROR"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_full_table_limit() -> usize {
    3
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            default_states: default_states(),
            full_table_limit: default_full_table_limit(),
        }
    }
}

impl SynthesisConfig {
    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_norway::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_prefix.is_empty() {
            return Err(Error::Config("id_prefix must not be empty".into()));
        }
        if self.default_states.len() < 2 {
            return Err(Error::Config("default_states needs at least two states".into()));
        }
        Ok(())
    }

    /// Resolved id prefix for a requirement
    pub fn prefix_for(&self, requirement_id: &str) -> String {
        self.id_prefix.replace(REQUIREMENT_PLACEHOLDER, requirement_id)
    }
}
