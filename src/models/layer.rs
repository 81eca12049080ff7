//! Layer resource parameters and their stored projection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Parameters for creating or updating a layer resource.
///
/// Whether the layer is multi-environment is not part of this record; it is
/// derived from project configuration whenever a store is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerParameters {
    pub layer_name: String,

    /// Declared runtimes, in order.
    pub runtimes: Vec<LayerRuntime>,

    /// Version number -> version metadata.
    #[serde(default)]
    pub layer_version_map: BTreeMap<String, LayerVersionMetadata>,

    pub provider_context: ProviderContext,

    #[serde(default = "default_build")]
    pub build: bool,

    /// New layer version, when the caller is publishing one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_version: Option<u32>,
}

fn default_build() -> bool {
    true
}

/// A runtime a layer is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRuntime {
    /// Display name, e.g. `NodeJS`.
    pub name: String,

    /// Runtime identifier, e.g. `nodejs`.
    pub value: String,

    /// Folder under the layer's `lib/` directory holding this runtime's code.
    pub layer_executable_path: String,

    /// Scaffolding written into `lib/` when the runtime folder is first created.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer_default_files: Vec<LayerDefaultFile>,

    /// CloudFormation `CompatibleRuntimes` value, e.g. `nodejs12.x`.
    pub cloud_template_value: String,
}

/// A default file seeded for a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDefaultFile {
    /// Directory relative to the layer's `lib/` root.
    pub path: String,
    pub filename: String,
    pub content: String,
}

/// Runtime fields that are persisted; default files are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLayerRuntime {
    pub value: String,
    pub name: String,
    pub layer_executable_path: String,
    pub cloud_template_value: String,
}

impl From<&LayerRuntime> for StoredLayerRuntime {
    fn from(runtime: &LayerRuntime) -> Self {
        Self {
            value: runtime.value.clone(),
            name: runtime.name.clone(),
            layer_executable_path: runtime.layer_executable_path.clone(),
            cloud_template_value: runtime.cloud_template_value.clone(),
        }
    }
}

/// Durable projection of [`LayerParameters`].
///
/// `runtimes` is only present for single-environment layers; multi-environment
/// layers keep their runtimes per environment in the team-provider document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLayerParameters {
    #[serde(default)]
    pub layer_version_map: BTreeMap<String, LayerVersionMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtimes: Option<Vec<StoredLayerRuntime>>,
}

/// Metadata attached to one published layer version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerVersionMetadata {
    #[serde(default)]
    pub permissions: Vec<LayerPermission>,

    /// Other version fields (content hash, description, ...) kept verbatim.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Who may use a layer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerPermission {
    /// Only the owning account
    Private,
    /// Any AWS account
    Public,
    /// Listed AWS accounts
    AwsAccounts { accounts: Vec<String> },
    /// Listed AWS organizations
    AwsOrg { orgs: Vec<String> },
}

/// Provider and service a resource is deployed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderContext {
    pub provider: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// Stages of a layer update; every stage runs unless switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerUpdateOptions {
    /// Rewrite the layer state (parameter file or team-provider entry) and,
    /// when a new version is supplied, the version parameter file.
    pub layer_params: bool,

    /// Regenerate the CloudFormation template.
    pub cfn_file: bool,

    /// Refresh the project-metadata entry.
    pub amplify_meta: bool,
}

impl Default for LayerUpdateOptions {
    fn default() -> Self {
        Self {
            layer_params: true,
            cfn_file: true,
            amplify_meta: true,
        }
    }
}
