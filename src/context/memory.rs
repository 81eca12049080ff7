//! In-memory project context.
//!
//! Holds the project metadata and team-provider documents in memory while
//! resource files still go to `backend_dir`. Useful for exercising the
//! reconciliation logic without a metadata fixture on disk.

use anyhow::Result;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{ProjectContext, has_env_layer_entry};
use crate::models::Breadcrumbs;
use crate::utils::json_tree::set_at;

/// [`ProjectContext`] keeping documents in memory.
#[derive(Debug)]
pub struct MemoryProjectContext {
    env_name: String,
    backend_dir: PathBuf,
    amplify_meta: RefCell<Value>,
    team_provider_info: RefCell<Value>,
    multi_env_layers: Cell<bool>,
    breadcrumbs: RefCell<BTreeMap<(String, String), Breadcrumbs>>,
}

impl MemoryProjectContext {
    /// Empty project on environment `env_name` whose resources live under `backend_dir`.
    pub fn new(env_name: impl Into<String>, backend_dir: impl Into<PathBuf>) -> Self {
        Self {
            env_name: env_name.into(),
            backend_dir: backend_dir.into(),
            amplify_meta: RefCell::new(Value::Object(Map::new())),
            team_provider_info: RefCell::new(Value::Object(Map::new())),
            multi_env_layers: Cell::new(false),
            breadcrumbs: RefCell::new(BTreeMap::new()),
        }
    }

    /// Toggles the project-wide multi-environment layer setting.
    pub fn set_multi_env_layers(&self, enabled: bool) {
        self.multi_env_layers.set(enabled);
    }

    /// Breadcrumbs recorded for a resource.
    pub fn breadcrumbs(&self, category: &str, resource_name: &str) -> Option<Breadcrumbs> {
        self.breadcrumbs
            .borrow()
            .get(&(category.to_string(), resource_name.to_string()))
            .cloned()
    }
}

impl ProjectContext for MemoryProjectContext {
    fn env_name(&self) -> Result<String> {
        Ok(self.env_name.clone())
    }

    fn backend_dir_path(&self) -> PathBuf {
        self.backend_dir.clone()
    }

    fn amplify_meta_file_path(&self) -> PathBuf {
        self.backend_dir.join("amplify-meta.json")
    }

    fn amplify_meta(&self) -> Result<Value> {
        Ok(self.amplify_meta.borrow().clone())
    }

    fn update_resource_meta(
        &self,
        category: &str,
        resource_name: &str,
        descriptor: Map<String, Value>,
    ) -> Result<()> {
        set_at(
            &mut self.amplify_meta.borrow_mut(),
            &[category, resource_name],
            Value::Object(descriptor),
        );
        Ok(())
    }

    fn team_provider_info(&self) -> Result<Value> {
        Ok(self.team_provider_info.borrow().clone())
    }

    fn set_team_provider_info(&self, document: &Value) -> Result<()> {
        *self.team_provider_info.borrow_mut() = document.clone();
        Ok(())
    }

    fn is_multi_env_layer(&self, layer_name: &str) -> Result<bool> {
        if self.multi_env_layers.get() {
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
        self.breadcrumbs
            .borrow_mut()
            .insert((category.to_string(), resource_name.to_string()), breadcrumbs.clone());
        Ok(())
    }
}
