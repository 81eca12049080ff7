//! On-disk skeleton of a layer resource.
//!
//! ```text
//! <backend>/function/<layer>/
//! ├── opt/
//! └── lib/
//!     ├── <runtime executable path>/README.txt
//!     └── <default files of each runtime, relative to lib/>
//! ```
//!
//! Runtime folders are seeded only when they are first created; an existing
//! folder is never written to again, so user edits survive re-provisioning.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::constants::{FUNCTION_CATEGORY, LAYER_README_CONTENT, LAYER_README_FILE};
use crate::core::StoreError;
use crate::models::{LayerParameters, LayerRuntime, StoredLayerRuntime};
use crate::utils::fs::{
    ensure_dir, is_safe_relative_path, read_json_file_opt, write_json_file, write_text_file,
};

/// Root directory of a layer resource.
pub fn layer_dir_path(backend_dir: &Path, layer_name: &str) -> PathBuf {
    backend_dir.join(FUNCTION_CATEGORY).join(layer_name)
}

/// Ensures the layer's `opt/` folder and one `lib/` folder per runtime exist.
///
/// Returns the layer's root directory.
///
/// # Errors
///
/// Returns [`StoreError::UnsafePath`] if a runtime path or default-file path
/// would leave the `lib/` directory, or an I/O error from provisioning.
pub fn ensure_layer_folders(backend_dir: &Path, parameters: &LayerParameters) -> Result<PathBuf> {
    let layer_dir = layer_dir_path(backend_dir, &parameters.layer_name);
    ensure_dir(&layer_dir.join("opt")).with_context(|| {
        format!("Failed to create opt folder for layer '{}'", parameters.layer_name)
    })?;

    for runtime in &parameters.runtimes {
        ensure_layer_runtime_folder(&layer_dir, runtime)?;
    }

    Ok(layer_dir)
}

/// Provisions one runtime folder. Returns `true` if it was created by this call.
fn ensure_layer_runtime_folder(layer_dir: &Path, runtime: &LayerRuntime) -> Result<bool> {
    validate_runtime_paths(runtime)?;

    let lib_dir = layer_dir.join("lib");
    let runtime_dir = lib_dir.join(&runtime.layer_executable_path);
    if runtime_dir.exists() {
        tracing::debug!(
            "Runtime folder {} already exists, leaving it untouched",
            runtime_dir.display()
        );
        return Ok(false);
    }

    ensure_dir(&runtime_dir)?;
    write_text_file(&runtime_dir.join(LAYER_README_FILE), LAYER_README_CONTENT)?;

    // default files are shared scaffolding rooted at lib/, not at the runtime folder
    for default_file in &runtime.layer_default_files {
        let target = lib_dir.join(&default_file.path).join(&default_file.filename);
        write_text_file(&target, &default_file.content)?;
    }

    tracing::info!(
        "Provisioned {} runtime folder at {} ({} default file(s))",
        runtime.name,
        runtime_dir.display(),
        runtime.layer_default_files.len()
    );
    Ok(true)
}

fn validate_runtime_paths(runtime: &LayerRuntime) -> Result<()> {
    let unsafe_path = |path: &str, context: String| StoreError::UnsafePath {
        path: path.to_string(),
        context,
    };

    if runtime.layer_executable_path.is_empty()
        || !is_safe_relative_path(&runtime.layer_executable_path)
    {
        return Err(unsafe_path(
            &runtime.layer_executable_path,
            format!("executable path of runtime '{}'", runtime.name),
        )
        .into());
    }

    for default_file in &runtime.layer_default_files {
        let joined = Path::new(&default_file.path).join(&default_file.filename);
        if default_file.filename.is_empty() || !is_safe_relative_path(&joined) {
            return Err(unsafe_path(
                &joined.display().to_string(),
                format!("default file of runtime '{}'", runtime.name),
            )
            .into());
        }
    }

    Ok(())
}

/// Persists a layer's runtimes into `file_name` in the layer directory.
pub fn save_layer_runtimes(
    layer_dir: &Path,
    file_name: &str,
    runtimes: &[StoredLayerRuntime],
) -> Result<()> {
    let path = layer_dir.join(file_name);
    write_json_file(&path, runtimes)
        .with_context(|| format!("Failed to persist layer runtimes to {}", path.display()))
}

/// Loads runtimes saved by [`save_layer_runtimes`], if present.
pub fn load_layer_runtimes(
    layer_dir: &Path,
    file_name: &str,
) -> Result<Option<Vec<StoredLayerRuntime>>> {
    read_json_file_opt(&layer_dir.join(file_name))
}
