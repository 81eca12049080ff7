//! Test utilities for fnstore
//!
//! Helpers shared by unit tests and the integration suite (enable the
//! `test-utils` feature to use them outside this crate):
//! - [`TestProject`] - a temporary project with an environment configured
//! - parameter fixtures for layers, plain functions and trigger functions
//! - [`init_test_logging`] - opt-in tracing output
//!
//! # Example
//!
//! ```rust,no_run
//! use fnstore::lifecycle::ResourceStore;
//! use fnstore::test_utils::{TestProject, layer_parameters};
//!
//! let project = TestProject::new().unwrap();
//! let context = project.context();
//! let store = ResourceStore::new(&context);
//! store.create_layer_artifacts(&layer_parameters("myLayer")).unwrap();
//! assert!(project.path("amplify/backend/function/myLayer/opt").is_dir());
//! ```

mod fixtures;
mod project;

pub use fixtures::{
    layer_parameters, layer_runtime, plain_function, trigger_function, write_function_templates,
};
pub use project::TestProject;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise the
/// `RUST_LOG` environment variable; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=fnstore=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
