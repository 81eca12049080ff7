//! Per-resource parameter files.
//!
//! Each resource directory (`<backend>/<category>/<resource>/`) holds small
//! JSON parameter documents. [`ParameterFileStore`] reads them leniently
//! (a missing file is an empty document) and writes them as a shallow merge
//! over whatever is already on disk, so independent writers can each own a
//! subset of keys in the same file.
//!
//! Every write strips [`DEPRECATED_MUTABLE_STATE_KEY`], a field earlier
//! versions wrote into parameter files by mistake.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::constants::{DEPRECATED_MUTABLE_STATE_KEY, FUNCTION_CATEGORY};
use crate::core::StoreError;
use crate::utils::fs::{read_json_object, write_json_file};

/// Reads and merge-writes parameter documents under one backend category.
#[derive(Debug, Clone)]
pub struct ParameterFileStore {
    category_dir: PathBuf,
}

impl ParameterFileStore {
    /// Store for the function category of `backend_dir`.
    pub fn new(backend_dir: &Path) -> Self {
        Self::for_category(backend_dir, FUNCTION_CATEGORY)
    }

    /// Store for an arbitrary category of `backend_dir`.
    pub fn for_category(backend_dir: &Path, category: &str) -> Self {
        Self {
            category_dir: backend_dir.join(category),
        }
    }

    /// Directory of `resource_name`.
    pub fn resource_dir(&self, resource_name: &str) -> PathBuf {
        self.category_dir.join(resource_name)
    }

    /// Path of `file_name` inside the resource directory.
    pub fn file_path(&self, resource_name: &str, file_name: &str) -> PathBuf {
        self.resource_dir(resource_name).join(file_name)
    }

    /// Loads a parameter document; a missing file yields an empty document.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but is unreadable, malformed, or not a JSON object.
    pub fn read(&self, resource_name: &str, file_name: &str) -> Result<Map<String, Value>> {
        let path = self.file_path(resource_name, file_name);
        read_json_object(&path)
            .with_context(|| format!("Failed to read parameters for '{resource_name}'"))
    }

    /// Merges `new_fields` over the existing document and persists the result.
    ///
    /// New values win on key collisions and the deprecated mutable-state field
    /// is removed. The file (and its directory) is created if absent. Returns
    /// the document as written.
    pub fn write(
        &self,
        resource_name: &str,
        file_name: &str,
        new_fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        self.write_excluding(resource_name, file_name, new_fields, &[])
    }

    /// Like [`Self::write`], but first drops `stale_keys` from the existing document.
    ///
    /// Used when a field must disappear rather than be overwritten, such as
    /// `runtimes` once a layer becomes multi-environment.
    pub fn write_excluding(
        &self,
        resource_name: &str,
        file_name: &str,
        new_fields: &Map<String, Value>,
        stale_keys: &[&str],
    ) -> Result<Map<String, Value>> {
        let mut document = self.read(resource_name, file_name)?;
        for key in stale_keys {
            document.remove(*key);
        }
        document.extend(new_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        if document.remove(DEPRECATED_MUTABLE_STATE_KEY).is_some() {
            tracing::debug!(
                "Removed deprecated '{}' from {}/{}",
                DEPRECATED_MUTABLE_STATE_KEY,
                resource_name,
                file_name
            );
        }

        let path = self.file_path(resource_name, file_name);
        write_json_file(&path, &document)
            .with_context(|| format!("Failed to write parameters for '{resource_name}'"))?;
        tracing::debug!("Wrote {} key(s) to {}", new_fields.len(), path.display());

        Ok(document)
    }

    /// Serializes `fields` and merge-writes them; see [`Self::write`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAnObject`] if `fields` does not serialize to a JSON object.
    pub fn write_serializable<T>(
        &self,
        resource_name: &str,
        file_name: &str,
        fields: &T,
    ) -> Result<Map<String, Value>>
    where
        T: Serialize + ?Sized,
    {
        let fields = to_object(fields, file_name)?;
        self.write(resource_name, file_name, &fields)
    }
}

/// Serializes a value that must become a JSON object.
pub(crate) fn to_object<T>(value: &T, what: &str) -> Result<Map<String, Value>>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value).with_context(|| format!("Failed to serialize {what}"))? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject { what: what.to_string() }.into()),
    }
}
