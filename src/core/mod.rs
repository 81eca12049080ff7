//! Core error types shared by every fnstore module.
//!
//! - [`error`] - [`StoreError`], the typed failures callers can match on
//! - [`file_error`] - [`FileOperationError`], file I/O failures with call-site context

pub mod error;
pub mod file_error;

pub use error::StoreError;
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
