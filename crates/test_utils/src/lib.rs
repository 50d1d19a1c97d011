//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! settlement test suite.
//!
//! # Modules
//!
//! - `fixtures`: Ready-made groups and balance mappings
//! - `builders`: Builder patterns for test groups
//! - `assertions`: Assertion helpers for balances and payments
//! - `generators`: Property-based test data generators
//! - `logging`: Tracing subscriber setup for test runs

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use logging::*;
