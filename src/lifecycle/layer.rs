//! Layer resource operations.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use super::ResourceStore;
use crate::constants::{FUNCTION_CATEGORY, layer_template_file_name};
use crate::layer::{
    ensure_layer_folders, layer_dir_path, load_layer_runtimes, save_layer_runtimes,
};
use crate::models::{
    LayerParameters, LayerUpdateOptions, StoredLayerParameters, StoredLayerRuntime,
};
use crate::parameters::to_object;
use crate::projection::{merge_layer_meta_entry, to_amplify_meta_params, to_stored_params};
use crate::team_provider::{self, LAYER_CATEGORY_PATH};
use crate::utils::fs::write_json_file;

const RUNTIMES_KEY: &str = "runtimes";
const LAYER_VERSION_KEY: &str = "layerVersion";

impl ResourceStore<'_> {
    /// Creates a layer resource and returns its directory.
    ///
    /// In order: provisions the folder skeleton, writes the layer state,
    /// writes the version parameter file (`layerVersion`, 1 unless a version
    /// is supplied), generates the CloudFormation template, and registers the
    /// layer in project metadata.
    pub fn create_layer_artifacts(&self, parameters: &LayerParameters) -> Result<PathBuf> {
        let name = &parameters.layer_name;
        tracing::info!("Creating layer artifacts for '{}'", name);

        let layer_dir = ensure_layer_folders(&self.context.backend_dir_path(), parameters)?;
        self.write_layer_state(parameters, &layer_dir)?;
        self.write_layer_version(name, parameters.layer_version.unwrap_or(1))?;
        self.write_layer_template(parameters, &layer_dir)?;
        self.write_layer_meta(parameters)?;

        tracing::info!("Created layer '{}' at {}", name, layer_dir.display());
        Ok(layer_dir)
    }

    /// Updates a layer resource, running only the stages enabled in `options`.
    ///
    /// Folders are always provisioned. The version parameter file is only
    /// rewritten when `layer_params` is enabled and a new version is supplied.
    pub fn update_layer_artifacts(
        &self,
        parameters: &LayerParameters,
        options: LayerUpdateOptions,
    ) -> Result<PathBuf> {
        let name = &parameters.layer_name;
        tracing::info!("Updating layer artifacts for '{}' ({:?})", name, options);

        let layer_dir = ensure_layer_folders(&self.context.backend_dir_path(), parameters)?;
        if options.layer_params {
            self.write_layer_state(parameters, &layer_dir)?;
            if let Some(version) = parameters.layer_version {
                self.write_layer_version(name, version)?;
            }
        }
        if options.cfn_file {
            self.write_layer_template(parameters, &layer_dir)?;
        }
        if options.amplify_meta {
            self.write_layer_meta(parameters)?;
        }
        Ok(layer_dir)
    }

    /// Removes the per-environment state of a multi-environment layer.
    ///
    /// Single-environment layers have nothing outside their own directory,
    /// which the caller deletes; for them this is a no-op.
    pub fn remove_layer_artifacts(&self, layer_name: &str) -> Result<()> {
        if !self.context.is_multi_env_layer(layer_name)? {
            tracing::debug!("Layer '{}' is single-environment, nothing to remove", layer_name);
            return Ok(());
        }

        let env = self.context.env_name()?;
        let removed =
            team_provider::unset_resource(self.context, &env, &LAYER_CATEGORY_PATH, layer_name)?;
        if removed {
            tracing::info!("Removed layer '{}' from environment '{}'", layer_name, env);
        }
        Ok(())
    }

    /// Stored state of a layer, read from the store that owns it.
    ///
    /// Multi-environment layers are read from the current environment's
    /// team-provider entry, falling back to the local parameter file when
    /// the environment has no entry yet.
    pub fn read_layer_state(&self, layer_name: &str) -> Result<StoredLayerParameters> {
        if self.context.is_multi_env_layer(layer_name)? {
            let env = self.context.env_name()?;
            let entry =
                team_provider::get_resource(self.context, &env, &LAYER_CATEGORY_PATH, layer_name)?;
            if let Some(entry) = entry {
                return serde_json::from_value(entry).with_context(|| {
                    format!("Invalid team-provider state for layer '{layer_name}'")
                });
            }
        }

        let document =
            self.parameter_store().read(layer_name, &self.config.layer_parameters_file)?;
        serde_json::from_value(Value::Object(document))
            .with_context(|| format!("Invalid parameter file for layer '{layer_name}'"))
    }

    /// Runtimes declared for a layer.
    ///
    /// Taken from the layer state; multi-environment layers without
    /// per-environment runtimes fall back to the runtime persistence file.
    pub fn layer_runtimes(&self, layer_name: &str) -> Result<Vec<StoredLayerRuntime>> {
        if let Some(runtimes) = self.read_layer_state(layer_name)?.runtimes {
            return Ok(runtimes);
        }

        let layer_dir = layer_dir_path(&self.context.backend_dir_path(), layer_name);
        Ok(load_layer_runtimes(&layer_dir, &self.config.layer_runtimes_file)?.unwrap_or_default())
    }

    fn write_layer_state(&self, parameters: &LayerParameters, layer_dir: &Path) -> Result<()> {
        let name = &parameters.layer_name;
        let is_multi_env = self.context.is_multi_env_layer(name)?;

        if is_multi_env {
            let env = self.context.env_name()?;
            let entry = serde_json::to_value(to_stored_params(parameters, false))?;
            team_provider::set_resource(self.context, &env, &LAYER_CATEGORY_PATH, name, entry)?;

            let runtimes: Vec<StoredLayerRuntime> =
                parameters.runtimes.iter().map(StoredLayerRuntime::from).collect();
            save_layer_runtimes(layer_dir, &self.config.layer_runtimes_file, &runtimes)?;
        }

        let stored = to_object(&to_stored_params(parameters, is_multi_env), "layer state")?;
        let stale_keys: &[&str] = if is_multi_env { &[RUNTIMES_KEY] } else { &[] };
        self.parameter_store()
            .write_excluding(name, &self.config.layer_parameters_file, &stored, stale_keys)?;

        tracing::debug!(
            "Wrote state of layer '{}' ({})",
            name,
            if is_multi_env { "multi-environment" } else { "single-environment" }
        );
        Ok(())
    }

    fn write_layer_version(&self, layer_name: &str, version: u32) -> Result<()> {
        self.parameter_store().write_serializable(
            layer_name,
            &self.config.cfn_parameters_file,
            &json!({ LAYER_VERSION_KEY: version }),
        )?;
        Ok(())
    }

    fn write_layer_template(&self, parameters: &LayerParameters, layer_dir: &Path) -> Result<()> {
        let name = &parameters.layer_name;
        let template = self
            .layer_templates
            .generate(parameters)
            .with_context(|| format!("Failed to generate template for layer '{name}'"))?;

        let path = layer_dir.join(layer_template_file_name(name));
        write_json_file(&path, &template)?;
        tracing::debug!("Wrote layer template {}", path.display());
        Ok(())
    }

    fn write_layer_meta(&self, parameters: &LayerParameters) -> Result<()> {
        let name = &parameters.layer_name;
        let is_multi_env = self.context.is_multi_env_layer(name)?;

        let existing = self.context.resource_meta(FUNCTION_CATEGORY, name)?;
        let projected = to_amplify_meta_params(parameters, is_multi_env);
        let entry = merge_layer_meta_entry(existing.as_ref(), &projected, is_multi_env)?;
        self.context.update_resource_meta(FUNCTION_CATEGORY, name, entry)
    }
}
