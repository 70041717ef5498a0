//! Fragments under test and the expectations embedded in them.
//!
//! # Pipeline
//!
//! ```text
//! discover_fragments(root) ──► Discovery (fragment paths + unreadable entries)
//!     │
//!     ▼
//! Fragment::load(path) ──► Fragment (text, lines, directive options)
//!     │
//!     ▼
//! extract_markers(&fragment) ──► MarkerSet (markers + malformed-marker errors)
//! ```
//!
//! Markers are plain data recovered by scanning comment text. Nothing here
//! talks to a compiler.

mod directives;
mod discovery;
mod fragment;
mod markers;

pub use directives::{parse_directives, CheckOptions};
pub use discovery::{
    discover_fragments, discover_fragments_in, is_fragment_path, Discovery, DiscoveryError,
    FragmentPath,
};
pub use fragment::{Fragment, FragmentError};
pub use markers::{extract_markers, ExpectedMarker, MarkerErrorKind, MarkerParseError, MarkerSet};
