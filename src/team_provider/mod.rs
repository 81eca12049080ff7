//! Per-environment entries in the team-provider document.
//!
//! Entries live at `<env>/<category path...>/<resource>`. Layers use
//! [`LAYER_CATEGORY_PATH`] (`nonCFNdata/function`). Setting creates any missing
//! containers; unsetting removes the entry and prunes ancestors left empty, but
//! never the environment's own root object.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::constants::{FUNCTION_CATEGORY, NON_CFN_DATA_KEY};
use crate::context::ProjectContext;
use crate::utils::json_tree::{get_at, set_at, unset_and_prune};

/// Category path under an environment where layer state is kept.
pub const LAYER_CATEGORY_PATH: [&str; 2] = [NON_CFN_DATA_KEY, FUNCTION_CATEGORY];

fn entry_path<'a>(
    env_name: &'a str,
    category_path: &[&'a str],
    resource_name: &'a str,
) -> Vec<&'a str> {
    let mut path = Vec::with_capacity(category_path.len() + 2);
    path.push(env_name);
    path.extend_from_slice(category_path);
    path.push(resource_name);
    path
}

/// Entry of `resource_name` in `env_name`, if present.
pub fn get_resource(
    context: &(impl ProjectContext + ?Sized),
    env_name: &str,
    category_path: &[&str],
    resource_name: &str,
) -> Result<Option<Value>> {
    let document = context.team_provider_info()?;
    let path = entry_path(env_name, category_path, resource_name);
    Ok(get_at(&document, &path).cloned())
}

/// Stores `entry` for `resource_name` in `env_name`, replacing any previous entry.
pub fn set_resource(
    context: &(impl ProjectContext + ?Sized),
    env_name: &str,
    category_path: &[&str],
    resource_name: &str,
    entry: Value,
) -> Result<()> {
    let mut document = context.team_provider_info()?;
    let path = entry_path(env_name, category_path, resource_name);
    set_at(&mut document, &path, entry);
    context
        .set_team_provider_info(&document)
        .with_context(|| format!("Failed to store team-provider entry for '{resource_name}'"))?;

    tracing::debug!("Set team-provider entry {}", path.join("/"));
    Ok(())
}

/// Removes the entry of `resource_name` in `env_name` and prunes empty ancestors.
///
/// Returns whether an entry was removed. The document is only rewritten when
/// something changed.
pub fn unset_resource(
    context: &(impl ProjectContext + ?Sized),
    env_name: &str,
    category_path: &[&str],
    resource_name: &str,
) -> Result<bool> {
    let mut document = context.team_provider_info()?;
    let path = entry_path(env_name, category_path, resource_name);
    if !unset_and_prune(&mut document, &path, 1) {
        tracing::debug!("No team-provider entry at {}", path.join("/"));
        return Ok(false);
    }

    context
        .set_team_provider_info(&document)
        .with_context(|| format!("Failed to remove team-provider entry for '{resource_name}'"))?;
    tracing::debug!("Removed team-provider entry {}", path.join("/"));
    Ok(true)
}
