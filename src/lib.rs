//! sql-quizzer - sandboxed SQL validation, execution and grading.
//!
//! This library exposes the core modules for use by the `sqlquiz` binary and
//! integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod grading;
pub mod logging;
pub mod output;
pub mod query;
pub mod quiz;
pub mod safety;
pub mod session;
