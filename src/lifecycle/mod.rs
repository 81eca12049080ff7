//! Resource lifecycle operations.
//!
//! [`ResourceStore`] is the entry point used by the resource-management layer.
//! Each operation sequences folder provisioning, template materialization and
//! writes to the three metadata stores:
//!
//! | Store | Functions | Layers |
//! |---|---|---|
//! | local parameter files | mutable state, CFN parameters | layer state, `layerVersion` |
//! | project metadata | resource options | provider fields + layer state |
//! | team-provider document | env parameters (read only) | per-env layer state (multi-env only) |
//!
//! Writes are issued in a fixed order and are not transactional: when a step
//! fails, earlier writes stay on disk. Every step is safe to repeat, so the
//! recovery is to run the operation again.
//!
//! Whether a layer is multi-environment is asked of the [`ProjectContext`] at
//! each write that depends on it.

mod function;
mod layer;

use crate::config::StoreConfig;
use crate::context::ProjectContext;
use crate::layer::{LayerTemplateGenerator, LayerVersionTemplate};
use crate::parameters::ParameterFileStore;
use crate::templating::{TemplateRenderer, TeraTemplateRenderer};

/// Creates, updates and removes function and layer resources.
///
/// # Examples
///
/// ```rust,no_run
/// use fnstore::context::FsProjectContext;
/// use fnstore::lifecycle::ResourceStore;
/// use fnstore::models::LayerParameters;
///
/// # fn example(params: LayerParameters) -> anyhow::Result<()> {
/// let context = FsProjectContext::new("/path/to/project");
/// let store = ResourceStore::new(&context);
/// let layer_dir = store.create_layer_artifacts(&params)?;
/// println!("layer provisioned at {}", layer_dir.display());
/// # Ok(())
/// # }
/// ```
pub struct ResourceStore<'a> {
    context: &'a dyn ProjectContext,
    renderer: &'a dyn TemplateRenderer,
    layer_templates: &'a dyn LayerTemplateGenerator,
    config: StoreConfig,
}

impl<'a> ResourceStore<'a> {
    /// Store over `context` using the Tera renderer, the default layer
    /// template and the default file layout.
    pub fn new(context: &'a dyn ProjectContext) -> Self {
        Self {
            context,
            renderer: &TeraTemplateRenderer,
            layer_templates: &LayerVersionTemplate,
            config: StoreConfig::default(),
        }
    }

    /// Replace the template renderer.
    pub fn renderer(mut self, renderer: &'a dyn TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the layer template generator.
    pub fn layer_templates(mut self, generator: &'a dyn LayerTemplateGenerator) -> Self {
        self.layer_templates = generator;
        self
    }

    /// Use `config` for file names and the CORS flag.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    fn parameter_store(&self) -> ParameterFileStore {
        ParameterFileStore::new(&self.context.backend_dir_path())
    }
}
