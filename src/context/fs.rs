//! Project context backed by the project's JSON documents on disk.
//!
//! Layout, relative to the project root:
//!
//! ```text
//! amplify/
//! ├── cli.json                    feature flags
//! ├── team-provider-info.json     per-environment, not version controlled
//! ├── .config/local-env-info.json current environment (envName)
//! └── backend/
//!     ├── amplify-meta.json       project metadata
//!     ├── backend-config.json     mirrored resource descriptors
//!     └── <category>/<resource>/amplify.state
//! ```
//!
//! Every accessor re-reads its document, so changes made by other writers
//! between calls are observed.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::{ProjectContext, has_env_layer_entry};
use crate::constants::BREADCRUMBS_FILE;
use crate::core::StoreError;
use crate::models::Breadcrumbs;
use crate::utils::fs::{read_json_file_opt, read_json_object, write_json_file};
use crate::utils::json_tree::{get_at, set_at};

/// Filesystem-backed [`ProjectContext`].
#[derive(Debug, Clone)]
pub struct FsProjectContext {
    project_root: PathBuf,
    env_name: Option<String>,
}

impl FsProjectContext {
    /// Context for the project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            env_name: None,
        }
    }

    /// Pins the environment instead of reading it from `local-env-info.json`.
    #[must_use]
    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn amplify_dir(&self) -> PathBuf {
        self.project_root.join("amplify")
    }

    pub fn team_provider_info_file_path(&self) -> PathBuf {
        self.amplify_dir().join("team-provider-info.json")
    }

    pub fn backend_config_file_path(&self) -> PathBuf {
        self.backend_dir_path().join("backend-config.json")
    }

    pub fn local_env_info_file_path(&self) -> PathBuf {
        self.amplify_dir().join(".config").join("local-env-info.json")
    }

    pub fn cli_config_file_path(&self) -> PathBuf {
        self.amplify_dir().join("cli.json")
    }

    /// `features.lambdalayers.multienv` from `cli.json`; absent means disabled.
    fn multi_env_layers_enabled(&self) -> Result<bool> {
        let cli_config: Option<Value> = read_json_file_opt(&self.cli_config_file_path())?;
        Ok(cli_config
            .as_ref()
            .and_then(|config| get_at(config, &["features", "lambdalayers", "multienv"]))
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    fn set_document_entry(
        path: &Path,
        category: &str,
        resource_name: &str,
        descriptor: Value,
    ) -> Result<()> {
        let mut document = Value::Object(read_json_object(path)?);
        set_at(&mut document, &[category, resource_name], descriptor);
        write_json_file(path, &document)
    }
}

impl ProjectContext for FsProjectContext {
    fn env_name(&self) -> Result<String> {
        if let Some(env) = &self.env_name {
            return Ok(env.clone());
        }

        let path = self.local_env_info_file_path();
        let env_info = read_json_object(&path)
            .with_context(|| format!("Failed to read environment info from {}", path.display()))?;
        env_info
            .get("envName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::EnvironmentNotFound { path }.into())
    }

    fn backend_dir_path(&self) -> PathBuf {
        self.amplify_dir().join("backend")
    }

    fn amplify_meta_file_path(&self) -> PathBuf {
        self.backend_dir_path().join("amplify-meta.json")
    }

    fn amplify_meta(&self) -> Result<Value> {
        read_json_object(&self.amplify_meta_file_path()).map(Value::Object)
    }

    fn update_resource_meta(
        &self,
        category: &str,
        resource_name: &str,
        descriptor: Map<String, Value>,
    ) -> Result<()> {
        let descriptor = Value::Object(descriptor);
        Self::set_document_entry(
            &self.amplify_meta_file_path(),
            category,
            resource_name,
            descriptor.clone(),
        )
        .with_context(|| format!("Failed to update project metadata for '{resource_name}'"))?;
        Self::set_document_entry(
            &self.backend_config_file_path(),
            category,
            resource_name,
            descriptor,
        )
        .with_context(|| format!("Failed to update backend config for '{resource_name}'"))?;

        tracing::debug!("Updated project metadata entry {}/{}", category, resource_name);
        Ok(())
    }

    fn team_provider_info(&self) -> Result<Value> {
        read_json_object(&self.team_provider_info_file_path()).map(Value::Object)
    }

    fn set_team_provider_info(&self, document: &Value) -> Result<()> {
        write_json_file(&self.team_provider_info_file_path(), document)
            .context("Failed to write team-provider info")
    }

    fn is_multi_env_layer(&self, layer_name: &str) -> Result<bool> {
        if self.multi_env_layers_enabled()? {
            return Ok(true);
        }
        has_env_layer_entry(self, layer_name)
    }

    fn leave_breadcrumbs(
        &self,
        category: &str,
        resource_name: &str,
        breadcrumbs: &Breadcrumbs,
    ) -> Result<()> {
        let path =
            self.backend_dir_path().join(category).join(resource_name).join(BREADCRUMBS_FILE);
        write_json_file(&path, breadcrumbs)
            .with_context(|| format!("Failed to write breadcrumbs for '{resource_name}'"))
    }
}
