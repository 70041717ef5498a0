//! Fragment verification: matching, aggregation, rendering.
//!
//! # Flow
//!
//! ```text
//! Verifier::run(path)
//!     │  discover, filter
//!     ▼
//! per fragment (rayon pool)
//!     load ─► extract_markers ─► TypeChecker::check ─► match_markers
//!     │                                                     │
//!     ▼                                                     ▼
//! FragmentReport (Pass / Fail / Fatal) ◄────────────────────┘
//!     │  indexed, sorted back into input order
//!     ▼
//! Report ─► render_text / render_json, exit_code
//! ```

mod matching;
mod render;
mod report;
mod runner;
mod xfail;

pub use matching::{
    longest_common_substring, match_markers, message_matches, FragmentMatch, MarkerMatch,
    MatchStatus,
};
pub use render::{render_json, render_text, write_text};
pub use report::{FragmentReport, Report, Verdict};
pub use runner::{Verifier, VerifyConfig, DEFAULT_TOLERANCE};
pub use xfail::{XFailError, XFailSet};
