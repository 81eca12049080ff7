//! Global constants used throughout the fnstore codebase.
//!
//! This module contains the file names, metadata keys, and legacy runtime
//! identifiers shared by the parameter store, the projector, and the
//! lifecycle orchestrator. Defining them centrally keeps the on-disk layout
//! discoverable in one place.

/// Category under which functions and layers live in the backend tree.
pub const FUNCTION_CATEGORY: &str = "function";

/// Provider plugin recorded for every resource managed by this crate.
pub const PROVIDER_PLUGIN: &str = "awscloudformation";

/// Service name recorded in project metadata for functions.
pub const LAMBDA_FUNCTION_SERVICE: &str = "Lambda";

/// Key of the attached-layer list in a function's mutable state.
pub const LAMBDA_LAYERS_KEY: &str = "lambdaLayers";

/// Default file holding a function's mutable parameter state.
pub const FUNCTION_PARAMETERS_FILE: &str = "function-parameters.json";

/// Default file holding CloudFormation parameters (and layer state).
pub const PARAMETERS_FILE: &str = "parameters.json";

/// Default file holding persisted runtimes of a multi-environment layer.
pub const LAYER_RUNTIMES_FILE: &str = "layer-runtimes.json";

/// Field written by mistake into parameter files by earlier versions.
///
/// It is stripped on every parameter-file write.
pub const DEPRECATED_MUTABLE_STATE_KEY: &str = "mutableParametersState";

/// Team-provider key for data that is not passed to CloudFormation.
pub const NON_CFN_DATA_KEY: &str = "nonCFNdata";

/// Team-provider key for per-environment resource parameters.
pub const CATEGORIES_KEY: &str = "categories";

/// Runtime value that implies the legacy build pipeline.
pub const LEGACY_NODE_RUNTIME: &str = "nodejs";

/// Runtime plugin used by every trigger function.
pub const LEGACY_NODE_PLUGIN_ID: &str = "amplify-nodejs-function-runtime-provider";

/// Editor entry point recorded for trigger functions.
pub const LEGACY_DEFAULT_EDITOR_FILE: &str = "src/index.js";

/// Placeholder file seeded into every freshly provisioned runtime folder.
pub const LAYER_README_FILE: &str = "README.txt";

/// Content of [`LAYER_README_FILE`].
pub const LAYER_README_CONTENT: &str = "Replace this file with your layer files";

/// Environment variable enabling the CORS header in generated function templates.
pub const CORS_HEADER_ENV_VAR: &str = "AMPLIFY_CLI_LAMBDA_CORS_HEADER";

/// Breadcrumbs file written into each function resource directory.
pub const BREADCRUMBS_FILE: &str = "amplify.state";

/// Builds the layer template file name, e.g. `myLayer-awscloudformation-template.json`.
pub fn layer_template_file_name(layer_name: &str) -> String {
    format!("{layer_name}-awscloudformation-template.json")
}

/// Builds the function template file name, e.g. `myFn-cloudformation-template.json`.
pub fn function_template_file_name(resource_name: &str) -> String {
    format!("{resource_name}-cloudformation-template.json")
}
