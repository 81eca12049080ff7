//! Function resource operations.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

use super::ResourceStore;
use crate::constants::{FUNCTION_CATEGORY, LAMBDA_LAYERS_KEY, function_template_file_name};
use crate::core::StoreError;
use crate::models::FunctionParameters;
use crate::parameters::to_object;
use crate::projection::{
    merge_function_meta_entry, to_breadcrumbs, to_cfn_parameters, to_mutable_state_document,
    to_resource_opts,
};
use crate::templating::CopyJob;
use crate::utils::fs::is_safe_relative_path;

impl ResourceStore<'_> {
    /// Creates a function resource.
    ///
    /// In order: registers the function in project metadata, renders its
    /// source and CloudFormation templates (existing files are kept), writes
    /// the mutable-state and CFN parameter files, and records breadcrumbs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTriggerEnvironment`] when a trigger's
    /// serialized environment list is malformed, and any template or I/O
    /// error. Steps completed before the failure are not undone.
    pub fn create_function_resources(&self, parameters: &FunctionParameters) -> Result<()> {
        let name = parameters.resource_name();
        tracing::info!("Creating function resources for '{}'", name);

        let options = to_object(&to_resource_opts(parameters), "function resource options")?;
        self.context.update_resource_meta(FUNCTION_CATEGORY, name, options)?;

        self.copy_function_templates(parameters)
            .with_context(|| format!("Failed to copy templates for function '{name}'"))?;
        self.write_function_parameters(parameters)?;
        self.context.leave_breadcrumbs(FUNCTION_CATEGORY, name, &to_breadcrumbs(parameters))?;

        tracing::info!("Created function '{}'", name);
        Ok(())
    }

    /// Refreshes the stored state of an existing function.
    ///
    /// The project-metadata entry is merged over what is recorded (keeping
    /// fields such as deployment outputs), then the parameter files and
    /// breadcrumbs are rewritten. Source templates are not copied again.
    pub fn update_function_resources(&self, parameters: &FunctionParameters) -> Result<()> {
        let name = parameters.resource_name();
        tracing::info!("Updating function resources for '{}'", name);

        let existing = self.context.resource_meta(FUNCTION_CATEGORY, name)?;
        let entry = merge_function_meta_entry(existing.as_ref(), &to_resource_opts(parameters))?;
        self.context.update_resource_meta(FUNCTION_CATEGORY, name, entry)?;

        self.write_function_parameters(parameters)?;
        self.context.leave_breadcrumbs(FUNCTION_CATEGORY, name, &to_breadcrumbs(parameters))?;
        Ok(())
    }

    fn write_function_parameters(&self, parameters: &FunctionParameters) -> Result<()> {
        let name = parameters.resource_name();
        let store = self.parameter_store();

        let mutable_state = to_mutable_state_document(parameters)?;
        let detached: &[&str] = match parameters {
            FunctionParameters::Plain(plain) if plain.lambda_layers.is_none() => {
                &[LAMBDA_LAYERS_KEY]
            }
            _ => &[],
        };
        store.write_excluding(
            name,
            &self.config.function_parameters_file,
            &mutable_state,
            detached,
        )?;

        let cfn_parameters = to_cfn_parameters(parameters);
        if !cfn_parameters.is_empty() {
            store.write(name, &self.config.cfn_parameters_file, &cfn_parameters)?;
        }
        Ok(())
    }

    fn copy_function_templates(&self, parameters: &FunctionParameters) -> Result<()> {
        let jobs = self.function_copy_jobs(parameters)?;
        let template_params = self.function_template_params(parameters)?;
        self.renderer.render(&jobs, &template_params, false)?;

        tracing::debug!(
            "Rendered {} template(s) for function '{}'",
            jobs.len(),
            parameters.resource_name()
        );
        Ok(())
    }

    fn function_copy_jobs(&self, parameters: &FunctionParameters) -> Result<Vec<CopyJob>> {
        let name = parameters.resource_name();
        let resource_dir = self.context.backend_dir_path().join(FUNCTION_CATEGORY).join(name);
        let template = parameters.function_template();

        let mut jobs = Vec::with_capacity(template.source_files.len() + 1);
        for file in &template.source_files {
            let destination = template.destination_for(file);
            if !is_safe_relative_path(destination) {
                return Err(StoreError::UnsafePath {
                    path: destination.to_string(),
                    context: format!("template destination of function '{name}'"),
                }
                .into());
            }
            jobs.push(CopyJob::new(&template.source_root, file, resource_dir.join(destination)));
        }

        jobs.push(CopyJob::new(
            PathBuf::new(),
            parameters.cloud_resource_template_path(),
            resource_dir.join(function_template_file_name(name)),
        ));
        Ok(jobs)
    }

    /// Template context: the parameters themselves, trigger environment
    /// overlays, and the CORS flag.
    fn function_template_params(&self, parameters: &FunctionParameters) -> Result<Value> {
        let mut template_params = to_object(parameters, "function parameters")?;

        if let FunctionParameters::Trigger(trigger) = parameters {
            let env_vars = trigger.decode_trigger_envs().map_err(|source| {
                StoreError::InvalidTriggerEnvironment {
                    resource: trigger.resource_name.clone(),
                    source,
                }
            })?;

            let mut env_params: Map<String, Value> = self
                .context
                .load_env_resource_parameters(FUNCTION_CATEGORY, &trigger.resource_name)?;
            for var in &env_vars {
                env_params.insert(var.key.clone(), json!(var.value));
            }
            template_params.extend(env_params);
            template_params.insert("triggerEnvs".to_string(), serde_json::to_value(&env_vars)?);
        }

        template_params.insert("enableCors".to_string(), json!(self.config.cors_enabled()));
        Ok(Value::Object(template_params))
    }
}
