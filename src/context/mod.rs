//! Project context: everything the store needs to know about the project it
//! operates in.
//!
//! The lifecycle operations never reach for ambient state. The current
//! environment, path resolution, the project metadata document, the
//! team-provider document, the multi-environment predicate, and breadcrumb
//! recording all come through [`ProjectContext`], which is passed explicitly.
//!
//! Two implementations are provided:
//! - [`FsProjectContext`] - reads and writes the project's JSON documents on disk
//! - [`MemoryProjectContext`] - keeps the documents in memory, for tests and
//!   embedding callers that persist them elsewhere

mod fs;
mod memory;

pub use fs::FsProjectContext;
pub use memory::MemoryProjectContext;

use anyhow::Result;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::constants::{CATEGORIES_KEY, FUNCTION_CATEGORY, NON_CFN_DATA_KEY};
use crate::models::Breadcrumbs;
use crate::utils::json_tree::get_at;

/// Access to project-wide state.
///
/// Methods take `&self`; implementations that hold documents in memory use
/// interior mutability. Execution is single-threaded and callers serialize
/// access across processes.
pub trait ProjectContext {
    /// Name of the current environment.
    fn env_name(&self) -> Result<String>;

    /// Directory holding `<category>/<resource>/` trees.
    fn backend_dir_path(&self) -> PathBuf;

    /// Location of the project metadata document.
    fn amplify_meta_file_path(&self) -> PathBuf;

    /// Current project metadata document.
    fn amplify_meta(&self) -> Result<Value>;

    /// Sets the project-metadata entry of one resource to `descriptor`.
    fn update_resource_meta(
        &self,
        category: &str,
        resource_name: &str,
        descriptor: Map<String, Value>,
    ) -> Result<()>;

    /// Current team-provider document.
    fn team_provider_info(&self) -> Result<Value>;

    /// Replaces the team-provider document.
    fn set_team_provider_info(&self, document: &Value) -> Result<()>;

    /// Whether `layer_name` keeps its runtime configuration per environment.
    ///
    /// Evaluated against current project configuration on every call.
    fn is_multi_env_layer(&self, layer_name: &str) -> Result<bool>;

    /// Records breadcrumbs for a resource.
    fn leave_breadcrumbs(
        &self,
        category: &str,
        resource_name: &str,
        breadcrumbs: &Breadcrumbs,
    ) -> Result<()>;

    /// Project-metadata entry of one resource, if recorded.
    fn resource_meta(&self, category: &str, resource_name: &str) -> Result<Option<Value>> {
        let meta = self.amplify_meta()?;
        Ok(get_at(&meta, &[category, resource_name]).cloned())
    }

    /// Environment-specific parameters of a resource from the team-provider document.
    ///
    /// Missing entries yield an empty map.
    fn load_env_resource_parameters(
        &self,
        category: &str,
        resource_name: &str,
    ) -> Result<Map<String, Value>> {
        let env = self.env_name()?;
        let document = self.team_provider_info()?;
        Ok(get_at(&document, &[env.as_str(), CATEGORIES_KEY, category, resource_name])
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }
}

/// Whether the current environment already has team-provider data for `layer_name`.
pub(crate) fn has_env_layer_entry(
    context: &(impl ProjectContext + ?Sized),
    layer_name: &str,
) -> Result<bool> {
    let env = context.env_name()?;
    let document = context.team_provider_info()?;
    let path = [env.as_str(), NON_CFN_DATA_KEY, FUNCTION_CATEGORY, layer_name];
    Ok(get_at(&document, &path).is_some())
}
