//! Test Module
//!
//! Cross-module test suite for the wordmix core.
//!
//! ## Test Categories
//! - `engine_tests`: Exclusion outcomes, layout preservation, shuffle uniformity
//! - `database_tests`: Request history and user settings storage
//! - `dispatcher_tests`: Chat command flows for both backends

pub mod dispatcher_tests;
