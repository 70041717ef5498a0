//! Testing utilities for the verifier.
//!
//! - **mocks**: a scripted [`TypeChecker`](crate::adapter::TypeChecker) so
//!   the runner and matcher can be exercised without a TypeScript install.
//!
//! # Usage
//!
//! ```ignore
//! use tsvc::testing::FakeChecker;
//!
//! // Every line mentioning `"s"` assigned to a number gets a TS2322.
//! let checker = FakeChecker::new()
//!     .with_rule("number = \"s\"", "Type 'string' is not assignable to type 'number'.");
//! ```

pub mod mocks;

pub use mocks::{FakeChecker, FakeOutcome};
