//! Projections of resource parameters onto the three metadata stores.
//!
//! Nothing here performs I/O. Given a parameter record (and, for layers,
//! whether the layer is multi-environment) these functions compute what the
//! local parameter file, the project metadata document, and the
//! team-provider document should contain.
//!
//! The multi-environment split rule: a multi-environment layer keeps its
//! runtimes per environment in the team-provider document, so neither its
//! local parameter file nor its project-metadata entry may carry `runtimes`.

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::constants::{
    LAMBDA_FUNCTION_SERVICE, LAMBDA_LAYERS_KEY, LEGACY_DEFAULT_EDITOR_FILE, LEGACY_NODE_PLUGIN_ID,
    LEGACY_NODE_RUNTIME, PROVIDER_PLUGIN,
};
use crate::models::{
    Breadcrumbs, FunctionParameters, LayerMetaParams, LayerParameters, ResourceOptions,
    StoredLayerParameters, StoredLayerRuntime,
};
use crate::parameters::to_object;

/// Durable projection of a layer; runtimes only for single-environment layers.
pub fn to_stored_params(parameters: &LayerParameters, is_multi_env: bool) -> StoredLayerParameters {
    StoredLayerParameters {
        layer_version_map: parameters.layer_version_map.clone(),
        runtimes: (!is_multi_env)
            .then(|| parameters.runtimes.iter().map(StoredLayerRuntime::from).collect()),
    }
}

/// Project-metadata entry of a layer.
pub fn to_amplify_meta_params(parameters: &LayerParameters, is_multi_env: bool) -> LayerMetaParams {
    LayerMetaParams {
        stored: to_stored_params(parameters, is_multi_env),
        provider_plugin: parameters.provider_context.provider.clone(),
        service: parameters.provider_context.service.clone(),
        build: parameters.build,
    }
}

/// Rebuilds a layer's project-metadata entry from what is already recorded.
///
/// Fields of `projected` win. A stale `runtimes` key is dropped for
/// multi-environment layers, since the projection alone would leave one
/// recorded while the layer was single-environment in place.
pub fn merge_layer_meta_entry(
    existing: Option<&Value>,
    projected: &LayerMetaParams,
    is_multi_env: bool,
) -> Result<Map<String, Value>> {
    let mut entry = existing.and_then(Value::as_object).cloned().unwrap_or_default();
    if is_multi_env {
        entry.remove("runtimes");
    }
    entry.extend(to_object(projected, "layer metadata entry")?);
    Ok(entry)
}

/// Project-metadata entry of a function; trigger functions never carry `dependsOn`.
pub fn to_resource_opts(parameters: &FunctionParameters) -> ResourceOptions {
    let depends_on = match parameters {
        FunctionParameters::Plain(plain) => Some(plain.depends_on.clone()),
        FunctionParameters::Trigger(_) => None,
    };

    ResourceOptions {
        build: true,
        provider_plugin: PROVIDER_PLUGIN.to_string(),
        service: LAMBDA_FUNCTION_SERVICE.to_string(),
        depends_on,
    }
}

/// Rebuilds a function's project-metadata entry from what is already recorded.
///
/// Fields of `options` win. A recorded `dependsOn` is dropped when the
/// options carry none, so a trigger function never keeps dependency metadata.
pub fn merge_function_meta_entry(
    existing: Option<&Value>,
    options: &ResourceOptions,
) -> Result<Map<String, Value>> {
    let mut entry = existing.and_then(Value::as_object).cloned().unwrap_or_default();
    if options.depends_on.is_none() {
        entry.remove("dependsOn");
    }
    entry.extend(to_object(options, "function resource options")?);
    Ok(entry)
}

/// Breadcrumbs locating a function's build plugin and runtime.
pub fn to_breadcrumbs(parameters: &FunctionParameters) -> Breadcrumbs {
    match parameters {
        FunctionParameters::Trigger(_) => Breadcrumbs {
            plugin_id: LEGACY_NODE_PLUGIN_ID.to_string(),
            function_runtime: LEGACY_NODE_RUNTIME.to_string(),
            use_legacy_build: true,
            default_editor_file: Some(LEGACY_DEFAULT_EDITOR_FILE.to_string()),
        },
        FunctionParameters::Plain(plain) => Breadcrumbs {
            plugin_id: plain.runtime.plugin_id.clone(),
            function_runtime: plain.runtime.value.clone(),
            use_legacy_build: plain.runtime.uses_legacy_build(),
            default_editor_file: plain.function_template.default_editor_file.clone(),
        },
    }
}

/// Document persisted as the function's mutable parameter state.
///
/// Trigger functions persist their full parameter set minus the template
/// descriptors; plain functions persist the caller's mutable state plus the
/// attached layers.
pub fn to_mutable_state_document(parameters: &FunctionParameters) -> Result<Map<String, Value>> {
    match parameters {
        FunctionParameters::Trigger(trigger) => {
            let mut document = to_object(trigger, "trigger function parameters")?;
            document.remove("functionTemplate");
            document.remove("cloudResourceTemplatePath");
            Ok(document)
        }
        FunctionParameters::Plain(plain) => {
            let mut document = plain.mutable_parameters_state.clone();
            if let Some(layers) = &plain.lambda_layers {
                document.insert(LAMBDA_LAYERS_KEY.to_string(), serde_json::to_value(layers)?);
            }
            Ok(document)
        }
    }
}

/// CloudFormation parameters of a function.
///
/// Trigger functions record their module list (comma-joined) and resource
/// name; any function with a CloudWatch rule records it as `CloudWatchRule`.
pub fn to_cfn_parameters(parameters: &FunctionParameters) -> Map<String, Value> {
    let mut document = Map::new();
    if let FunctionParameters::Trigger(trigger) = parameters {
        document.insert("modules".to_string(), json!(trigger.modules.join(",")));
        document.insert("resourceName".to_string(), json!(trigger.resource_name));
    }
    if let Some(rule) = parameters.cloudwatch_rule() {
        document.insert("CloudWatchRule".to_string(), json!(rule));
    }
    document
}
