//! File system helpers for the structured documents fnstore maintains.
//!
//! All writes are atomic: content goes to a temporary file in the target
//! directory, is synced, and is then renamed over the destination, so readers
//! never observe a half-written parameter or metadata document.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fnstore::utils::fs::{read_json_file_opt, write_json_file};
//! use serde_json::{json, Value};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let path = Path::new("amplify/backend/function/myLayer/parameters.json");
//! write_json_file(path, &json!({ "layerVersion": 1 }))?;
//!
//! // Missing files read back as `None` instead of failing
//! let doc: Option<Value> = read_json_file_opt(path)?;
//! assert!(doc.is_some());
//! # Ok(())
//! # }
//! ```

use crate::core::error::json_type_name;
use crate::core::{FileOperation, FileResultExt, StoreError};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Component, Path};

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_file_context(
            FileOperation::CreateDir,
            path,
            "ensuring directory exists",
            "utils::fs::ensure_dir",
        )?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Parent directories are created when missing.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).with_file_context(
        FileOperation::Write,
        parent,
        "creating temporary file for atomic write",
        "utils::fs::atomic_write",
    )?;
    temp.write_all(content).with_file_context(
        FileOperation::Write,
        temp.path().to_path_buf(),
        "writing temporary file",
        "utils::fs::atomic_write",
    )?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_file_context(
            FileOperation::Write,
            path,
            "renaming temporary file into place",
            "utils::fs::atomic_write",
        )?;

    Ok(())
}

/// Writes a text file atomically.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_json_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "reading JSON document",
        "utils::fs::read_json_file",
    )?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}

/// Reads and parses a JSON file, returning `None` when it does not exist.
pub fn read_json_file_opt<T>(path: &Path) -> Result<Option<T>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.exists() {
        return Ok(None);
    }
    read_json_file(path).map(Some)
}

/// Reads a JSON document whose root must be an object.
///
/// A missing file yields an empty object.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDocument`] when the root is not an object.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    match read_json_file_opt::<Value>(path)? {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(StoreError::InvalidDocument {
            path: path.to_path_buf(),
            found: json_type_name(&other),
        }
        .into()),
    }
}

/// Writes data as pretty-printed JSON to a file atomically.
pub fn write_json_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let mut json = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize JSON for: {}", path.display()))?;
    json.push('\n');
    write_text_file(path, &json)
}

/// Checks that a declared path stays inside the directory it is joined onto.
///
/// Only plain relative components (and `.`) are accepted.
pub fn is_safe_relative_path(path: impl AsRef<Path>) -> bool {
    path.as_ref().components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
