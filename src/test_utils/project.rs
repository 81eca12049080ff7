//! Temporary project fixture.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::context::FsProjectContext;
use crate::utils::fs::{read_json_file, write_json_file};

/// A temporary project on environment `dev` with minimal metadata documents.
///
/// Function templates from [`super::write_function_templates`] are available
/// under [`Self::templates_dir`].
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Self::with_env("dev")
    }

    /// Project whose current environment is `env_name`.
    pub fn with_env(env_name: &str) -> Result<Self> {
        super::init_test_logging(None);

        let project = Self {
            temp_dir: TempDir::new()?,
        };
        project.write_json("amplify/.config/local-env-info.json", &json!({"envName": env_name}))?;
        project.write_json(
            "amplify/backend/amplify-meta.json",
            &json!({"providers": {"awscloudformation": {"Region": "us-east-1"}}}),
        )?;
        let mut team_provider_info = Map::new();
        team_provider_info.insert(
            env_name.to_string(),
            json!({"awscloudformation": {"Region": "us-east-1"}}),
        );
        project.write_json("amplify/team-provider-info.json", &Value::Object(team_provider_info))?;
        super::write_function_templates(&project.templates_dir())?;
        Ok(project)
    }

    /// Turns on the project-wide multi-environment layer feature flag.
    pub fn enable_multi_env_layers(&self) -> Result<()> {
        self.write_json(
            "amplify/cli.json",
            &json!({"features": {"lambdalayers": {"multienv": true}}}),
        )
    }

    /// Switches the current environment.
    pub fn switch_env(&self, env_name: &str) -> Result<()> {
        self.write_json("amplify/.config/local-env-info.json", &json!({"envName": env_name}))
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn backend_dir(&self) -> PathBuf {
        self.path("amplify/backend")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.path("templates")
    }

    /// Filesystem context over this project.
    pub fn context(&self) -> FsProjectContext {
        FsProjectContext::new(self.root())
    }

    pub fn read_json(&self, relative: &str) -> Result<Value> {
        read_json_file(&self.path(relative)).with_context(|| format!("Failed to read {relative}"))
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> Result<()> {
        write_json_file(&self.path(relative), value)
    }

    pub fn amplify_meta(&self) -> Result<Value> {
        self.read_json("amplify/backend/amplify-meta.json")
    }

    pub fn team_provider_info(&self) -> Result<Value> {
        self.read_json("amplify/team-provider-info.json")
    }
}
