//! Diagnostic model for the tsv verifier.
//!
//! A [`Diagnostic`] is what a type-checking front end reported for one
//! fragment: a line, an optional column, a message, and (when the front end
//! provides one) a code such as `TS2322`.
//!
//! The [`tsc`] module turns `tsc --pretty false` output into diagnostics.

mod code;
mod diagnostic;
pub mod tsc;

pub use code::DiagnosticCode;
pub use diagnostic::{Diagnostic, Location, Severity};
