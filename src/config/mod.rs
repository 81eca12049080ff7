//! Configuration for the resource store.
//!
//! [`StoreConfig`] names the files the store writes inside each resource
//! directory and controls template flags. It can be loaded from a TOML file
//! or built in code; unset keys take their defaults.

mod store;

pub use store::StoreConfig;
