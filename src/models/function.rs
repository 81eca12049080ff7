//! Function resource parameters.
//!
//! A function is either a plain function or a trigger function. The two
//! shapes arrive as one JSON object and are told apart by the presence of a
//! `trigger` key; [`FunctionParameters`] makes that distinction explicit so
//! each consumer matches on it exactly once.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parameters for creating or updating a function resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionParameters {
    /// A user-authored function
    Plain(PlainFunctionParameters),
    /// A function generated to react to another resource's events
    Trigger(TriggerFunctionParameters),
}

impl<'de> Deserialize<'de> for FunctionParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_trigger = value.as_object().is_some_and(|fields| fields.contains_key("trigger"));

        if is_trigger {
            serde_json::from_value(value).map(Self::Trigger).map_err(D::Error::custom)
        } else {
            serde_json::from_value(value).map(Self::Plain).map_err(D::Error::custom)
        }
    }
}

impl FunctionParameters {
    /// Name of the function resource.
    pub fn resource_name(&self) -> &str {
        match self {
            Self::Plain(p) => &p.resource_name,
            Self::Trigger(t) => &t.resource_name,
        }
    }

    /// Template files used to scaffold the function source.
    pub fn function_template(&self) -> &FunctionTemplate {
        match self {
            Self::Plain(p) => &p.function_template,
            Self::Trigger(t) => &t.function_template,
        }
    }

    /// Path to the cloud resource template the function's CFN fragment is rendered from.
    pub fn cloud_resource_template_path(&self) -> &Path {
        match self {
            Self::Plain(p) => &p.cloud_resource_template_path,
            Self::Trigger(t) => &t.cloud_resource_template_path,
        }
    }

    /// Schedule expression, if the function runs on a CloudWatch rule.
    pub fn cloudwatch_rule(&self) -> Option<&str> {
        match self {
            Self::Plain(p) => p.cloudwatch_rule.as_deref(),
            Self::Trigger(t) => t.cloudwatch_rule.as_deref(),
        }
    }
}

/// Parameters of a plain function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainFunctionParameters {
    pub resource_name: String,

    #[serde(default)]
    pub depends_on: Vec<DependsOn>,

    /// Caller-owned fields persisted verbatim into the function parameters file.
    #[serde(default)]
    pub mutable_parameters_state: Map<String, Value>,

    /// Layers attached to the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_layers: Option<Vec<LambdaLayer>>,

    pub function_template: FunctionTemplate,

    pub cloud_resource_template_path: PathBuf,

    pub runtime: FunctionRuntime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudwatch_rule: Option<String>,

    /// Remaining caller-supplied fields, available to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters of a trigger function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFunctionParameters {
    pub resource_name: String,

    /// Marker field; its presence is what makes a parameter object a trigger.
    pub trigger: bool,

    /// Trigger modules enabled for this function.
    #[serde(default)]
    pub modules: Vec<String>,

    /// Resource whose events invoke the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudwatch_rule: Option<String>,

    /// JSON-encoded list of [`TriggerEnvVar`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_envs: Option<String>,

    pub function_template: FunctionTemplate,

    pub cloud_resource_template_path: PathBuf,

    /// Remaining caller-supplied fields, persisted and available to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TriggerFunctionParameters {
    /// Decodes [`Self::trigger_envs`]; an absent or `null` payload is an empty list.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload is malformed.
    pub fn decode_trigger_envs(&self) -> Result<Vec<TriggerEnvVar>, serde_json::Error> {
        match self.trigger_envs.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => {
                let decoded: Option<Vec<TriggerEnvVar>> = serde_json::from_str(raw)?;
                Ok(decoded.unwrap_or_default())
            }
        }
    }
}

/// One environment variable declared by a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEnvVar {
    pub key: String,
    pub value: String,
}

/// A resource the function depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependsOn {
    pub category: String,
    pub resource_name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Source templates copied into the function directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTemplate {
    /// Directory the source files are read from.
    pub source_root: PathBuf,

    /// Template files, relative to `source_root`.
    pub source_files: Vec<String>,

    /// Destination remapping: source file -> path inside the resource directory.
    #[serde(default)]
    pub dest_map: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_editor_file: Option<String>,
}

impl FunctionTemplate {
    /// Destination of `file` relative to the resource directory.
    pub fn destination_for<'a>(&'a self, file: &'a str) -> &'a str {
        self.dest_map.get(file).map_or(file, String::as_str)
    }
}

/// Runtime a plain function is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRuntime {
    pub name: String,

    /// Runtime identifier, e.g. `nodejs` or `python`.
    pub value: String,

    /// Build plugin responsible for this runtime.
    pub plugin_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_template_value: Option<String>,
}

impl FunctionRuntime {
    /// Functions on the legacy node runtime keep the legacy build pipeline.
    pub fn uses_legacy_build(&self) -> bool {
        self.value == crate::constants::LEGACY_NODE_RUNTIME
    }
}

/// A layer attached to a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LambdaLayer {
    /// A layer managed in this project
    ProjectLayer(ProjectLayerRef),
    /// A layer referenced by ARN
    ExternalLayer(ExternalLayerRef),
}

/// Reference to a layer resource of this project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLayerRef {
    pub resource_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Selected version, a number or a "latest" marker.
    pub version: Value,

    #[serde(default)]
    pub is_latest_version_selected: bool,
}

/// Reference to a layer outside the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLayerRef {
    pub arn: String,
}
