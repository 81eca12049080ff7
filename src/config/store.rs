//! Store configuration: file-name layout and template flags.
//!
//! Every field has a default, so an absent or partial configuration file is
//! valid. The configuration is TOML with kebab-case keys:
//!
//! ```toml
//! function-parameters-file = "function-parameters.json"
//! cfn-parameters-file = "parameters.json"
//! layer-parameters-file = "parameters.json"
//! layer-runtimes-file = "layer-runtimes.json"
//! enable-cors = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    CORS_HEADER_ENV_VAR, FUNCTION_PARAMETERS_FILE, LAYER_RUNTIMES_FILE, PARAMETERS_FILE,
};

/// File names and flags used by the resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreConfig {
    /// File holding a function's mutable parameter state.
    pub function_parameters_file: String,

    /// File holding CloudFormation parameters for a resource.
    pub cfn_parameters_file: String,

    /// File holding a layer's stored parameters.
    pub layer_parameters_file: String,

    /// File holding the runtimes of a multi-environment layer.
    pub layer_runtimes_file: String,

    /// Explicit CORS header switch for generated function templates.
    ///
    /// When `None`, [`CORS_HEADER_ENV_VAR`] is consulted at render time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_cors: Option<bool>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            function_parameters_file: FUNCTION_PARAMETERS_FILE.to_string(),
            cfn_parameters_file: PARAMETERS_FILE.to_string(),
            layer_parameters_file: PARAMETERS_FILE.to_string(),
            layer_runtimes_file: LAYER_RUNTIMES_FILE.to_string(),
            enable_cors: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file, falling back to defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No store config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse store config from {}", path.display()))
    }

    /// Save configuration as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize store config")?;
        crate::utils::write_text_file(path, &content)
    }

    /// Set the CORS switch explicitly, bypassing the environment variable.
    #[must_use]
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.enable_cors = Some(enabled);
        self
    }

    /// Whether generated function templates should include the CORS header.
    ///
    /// Re-reads the environment on every call when not set explicitly.
    pub fn cors_enabled(&self) -> bool {
        self.enable_cors
            .unwrap_or_else(|| cors_flag(std::env::var(CORS_HEADER_ENV_VAR).ok().as_deref()))
    }
}

/// Only the exact string `"true"` enables the header.
fn cors_flag(value: Option<&str>) -> bool {
    value == Some("true")
}
