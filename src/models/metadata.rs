//! Descriptors recorded in project metadata and breadcrumb files.

use serde::{Deserialize, Serialize};

use super::function::DependsOn;
use super::layer::StoredLayerParameters;

/// Project-metadata entry for a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOptions {
    pub build: bool,
    pub provider_plugin: String,
    pub service: String,

    /// Only plain functions carry dependency metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<DependsOn>>,
}

/// Project-metadata entry for a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetaParams {
    #[serde(flatten)]
    pub stored: StoredLayerParameters,
    pub provider_plugin: String,
    pub service: String,
    pub build: bool,
}

/// Locates a function's build plugin and runtime for later tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumbs {
    pub plugin_id: String,
    pub function_runtime: String,
    pub use_legacy_build: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_editor_file: Option<String>,
}
