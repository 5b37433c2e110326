//! Statement execution and catalog introspection.
//!
//! This module isolates SQL execution from session lifecycle so that both can
//! be tested independently.

pub mod executor;
pub mod introspector;

pub use executor::QueryExecutor;
pub use introspector::{AdmissionPolicy, Introspector, DEFAULT_SAMPLE_ROWS};
