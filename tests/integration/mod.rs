//! Integration test suite for fnstore
//!
//! End-to-end tests driving [`fnstore::lifecycle::ResourceStore`] against a
//! real project tree on disk ([`fnstore::test_utils::TestProject`]).
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **function_lifecycle**: creating and updating plain and trigger functions
//! - **layer_lifecycle**: single-environment layer create/update/remove
//! - **multi_env**: multi-environment layers and the team-provider document
//! - **config**: file layout and CORS configuration

mod config;
mod function_lifecycle;
mod layer_lifecycle;
mod multi_env;
