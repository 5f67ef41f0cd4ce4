//! Reconciliation configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_TEXT_LEN;
use crate::errors::ConfigError;

/// Which persisted rows a run is allowed to reconcile (and therefore
/// delete).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileScope {
    /// Only rows whose standard appears in the incoming batch.
    #[default]
    AffectedStandards,
    /// Every row of the mapping table.
    AllStandards,
}

/// Pipeline configuration.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CONCORD_*`)
/// 2. Project config (`concord.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub scope: ReconcileScope,
    /// Standards whose persisted rows are never deleted by a reconcile,
    /// even when absent from the incoming batch.
    pub protected_standards: Vec<i64>,
    /// When true, in-batch duplicate keys are hard validation failures
    /// instead of last-write-wins warnings.
    pub strict_duplicates: bool,
    /// Byte cap for each free-text field.
    pub max_text_len: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            scope: ReconcileScope::AffectedStandards,
            protected_standards: Vec::new(),
            strict_duplicates: false,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

impl ReconcileConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("concord.toml");
        if project_config_path.exists() {
            let content = std::fs::read_to_string(&project_config_path).map_err(|_| {
                ConfigError::FileNotFound {
                    path: project_config_path.display().to_string(),
                }
            })?;
            config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: project_config_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_text_len == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "max_text_len".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// True when the standard's rows are shielded from deletion.
    pub fn is_protected(&self, standard_id: i64) -> bool {
        self.protected_standards.contains(&standard_id)
    }

    /// Apply environment variable overrides.
    /// Pattern: `CONCORD_SCOPE`, `CONCORD_STRICT_DUPLICATES`,
    /// `CONCORD_MAX_TEXT_LEN`.
    fn apply_env_overrides(config: &mut ReconcileConfig) {
        if let Ok(val) = std::env::var("CONCORD_SCOPE") {
            match val.as_str() {
                "affected_standards" => config.scope = ReconcileScope::AffectedStandards,
                "all_standards" => config.scope = ReconcileScope::AllStandards,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("CONCORD_STRICT_DUPLICATES") {
            if let Ok(v) = val.parse::<bool>() {
                config.strict_duplicates = v;
            }
        }
        if let Ok(val) = std::env::var("CONCORD_MAX_TEXT_LEN") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_text_len = v;
            }
        }
    }
}
