//! Type-error assertion verifier.
//!
//! Checks that documentation fragments produce exactly the type errors their
//! inline `// ~~~ message` markers claim.
//!
//! # Architecture
//!
//! ```text
//! tsv_fragment           markers and options recovered from fragment text
//!     │
//!     ▼
//! adapter::TypeChecker   one isolated type check per fragment
//!     │
//!     ▼
//! verify                 match markers to diagnostics, aggregate, render
//! ```
//!
//! The binary (`tsv`) wires these together through [`commands`].

pub mod adapter;
pub mod commands;
pub mod testing;
pub mod verify;

use std::sync::Once;

pub use adapter::{AdapterError, SharedContext, SharedFile, TscChecker, TypeChecker};
pub use verify::{FragmentReport, Report, Verdict, Verifier, VerifyConfig};

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "TSV_LOG";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debugging.
///
/// Logging stays off unless `TSV_LOG` is set, e.g. `TSV_LOG=tsvc=debug`.
/// Output goes to stderr as an indented span tree so the per-fragment
/// events of a parallel run stay grouped under their fragment.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var(LOG_ENV).is_ok() {
            let filter = EnvFilter::from_env(LOG_ENV);
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(tree).with(filter).init();
        }
    });
}
