//! Layer-specific artifacts: folder skeleton, runtime persistence, and the
//! infrastructure template.

pub mod cfn;
pub mod folders;

pub use cfn::{LayerTemplateGenerator, LayerVersionTemplate};
pub use folders::{
    ensure_layer_folders, layer_dir_path, load_layer_runtimes, save_layer_runtimes,
};
