//! Error handling for fnstore
//!
//! Operations return [`anyhow::Result`] and attach context naming the file or
//! resource involved. Failures that callers may want to match on are
//! expressed as [`StoreError`] variants, which travel inside the
//! `anyhow::Error` and can be recovered with `downcast_ref`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fnstore::core::StoreError;
//!
//! fn classify(err: &anyhow::Error) -> &'static str {
//!     match err.downcast_ref::<StoreError>() {
//!         Some(StoreError::InvalidTriggerEnvironment { .. }) => "bad trigger env",
//!         Some(_) => "store error",
//!         None => "other",
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fnstore operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A JSON document whose root must be an object is something else
    #[error("Document at {} must be a JSON object, found {found}", .path.display())]
    InvalidDocument {
        /// Path of the offending document
        path: PathBuf,
        /// JSON type that was found instead
        found: &'static str,
    },

    /// A value that must serialize to a JSON object did not
    #[error("{what} must serialize to a JSON object")]
    NotAnObject {
        /// Description of the value
        what: String,
    },

    /// The serialized trigger environment list could not be decoded
    #[error("Invalid trigger environment variables for function '{resource}'")]
    InvalidTriggerEnvironment {
        /// Function whose trigger env failed to decode
        resource: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A declared relative path escapes the directory it must stay within
    #[error("Path '{path}' for {context} must be relative and must not contain '..'")]
    UnsafePath {
        /// The offending path
        path: String,
        /// What the path was declared for
        context: String,
    },

    /// No current environment could be resolved for the project
    #[error("No current environment found; expected envName in {}", .path.display())]
    EnvironmentNotFound {
        /// Where the environment name was looked up
        path: PathBuf,
    },

    /// A template source file does not exist
    #[error("Template file not found: {}", .path.display())]
    MissingTemplate {
        /// Resolved template path
        path: PathBuf,
    },

    /// The template engine failed to render a template
    #[error("Failed to render template {}: {message}", .template.display())]
    TemplateRender {
        /// Template that failed
        template: PathBuf,
        /// Engine error message (including its cause chain)
        message: String,
    },
}

/// Name of a JSON value's type, used in [`StoreError::InvalidDocument`].
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
