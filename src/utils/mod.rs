//! Shared helpers
//!
//! - [`fs`] - atomic writes and JSON document I/O
//! - [`json_tree`] - deep get / set / unset-with-pruning on JSON object trees

pub mod fs;
pub mod json_tree;

pub use fs::{
    atomic_write, ensure_dir, read_json_file, read_json_file_opt, read_json_object,
    write_json_file, write_text_file,
};
