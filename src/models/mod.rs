//! Data model for function and layer resources.
//!
//! Parameter records ([`FunctionParameters`], [`LayerParameters`]) are built by
//! the caller for each invocation and never persisted as-is. The projector turns
//! them into the store-specific shapes defined here ([`StoredLayerParameters`],
//! [`ResourceOptions`], [`LayerMetaParams`], [`Breadcrumbs`]).
//!
//! All records serialize with camelCase keys, matching the documents they
//! are read from and written to.

mod function;
mod layer;
mod metadata;

pub use function::{
    DependsOn, ExternalLayerRef, FunctionParameters, FunctionRuntime, FunctionTemplate,
    LambdaLayer, PlainFunctionParameters, ProjectLayerRef, TriggerEnvVar,
    TriggerFunctionParameters,
};
pub use layer::{
    LayerDefaultFile, LayerParameters, LayerPermission, LayerRuntime, LayerUpdateOptions,
    LayerVersionMetadata, ProviderContext, StoredLayerParameters, StoredLayerRuntime,
};
pub use metadata::{Breadcrumbs, LayerMetaParams, ResourceOptions};
