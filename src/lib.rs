//! fnstore - on-disk state for function and layer resources
//!
//! fnstore manages the files and metadata bookkeeping behind serverless
//! function and shared-code layer resources in a multi-environment
//! infrastructure-as-code project. It creates, updates and removes a
//! resource's directory tree, parameter files and CloudFormation fragments,
//! and keeps three independently persisted stores consistent:
//!
//! - the resource's local parameter files (`backend/function/<name>/*.json`)
//! - the project metadata document (`amplify-meta.json`), shared by all environments
//! - the team-provider document (`team-provider-info.json`), per environment
//!
//! # Multi-environment layers
//!
//! A layer is multi-environment when project configuration says so (see
//! [`context::ProjectContext::is_multi_env_layer`]). Such a layer keeps its
//! runtimes per environment in the team-provider document; neither its local
//! parameter file nor its project-metadata entry carries `runtimes`. The
//! predicate is evaluated at every write, never cached.
//!
//! # Modules
//!
//! ## Operations
//! - [`lifecycle`] - [`lifecycle::ResourceStore`], the create/update/remove entry points
//!
//! ## Stores
//! - [`parameters`] - per-resource parameter files with merge-on-write
//! - [`team_provider`] - per-environment entries with empty-ancestor pruning
//! - [`context`] - project context: environment, paths, metadata documents
//!
//! ## Derivation and generation
//! - [`projection`] - pure projections of parameters onto each store
//! - [`layer`] - layer folder provisioning and CloudFormation template
//! - [`templating`] - function template rendering (Tera)
//!
//! ## Supporting modules
//! - [`models`] - parameter records and stored shapes
//! - [`config`] - file layout and CORS flag
//! - [`core`] - error types
//! - [`utils`] - atomic file I/O and JSON tree helpers
//! - [`constants`] - well-known names
//!
//! # Example
//!
//! ```rust,no_run
//! use fnstore::context::FsProjectContext;
//! use fnstore::lifecycle::ResourceStore;
//! use fnstore::models::{LayerParameters, LayerUpdateOptions};
//!
//! # fn example(params: LayerParameters) -> anyhow::Result<()> {
//! let context = FsProjectContext::new("/path/to/project");
//! let store = ResourceStore::new(&context);
//!
//! store.create_layer_artifacts(&params)?;
//! store.update_layer_artifacts(
//!     &params,
//!     LayerUpdateOptions { amplify_meta: false, ..Default::default() },
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod layer;
pub mod lifecycle;
pub mod models;
pub mod parameters;
pub mod projection;
pub mod team_provider;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
