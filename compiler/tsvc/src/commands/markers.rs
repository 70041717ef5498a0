//! The `markers` command: show what the extractor sees in one fragment.

use std::fmt::Write;
use std::path::Path;

use tsv_fragment::{extract_markers, Fragment, MarkerSet};

/// Print the options and markers of one fragment.
///
/// Returns the process exit code: 1 if the file cannot be read or has
/// malformed markers.
pub fn print_markers(path: &str) -> i32 {
    let fragment = match Fragment::load(Path::new(path)) {
        Ok(fragment) => fragment,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    let markers = extract_markers(&fragment);
    print!("{}", render_markers(&fragment, &markers));
    i32::from(markers.is_malformed())
}

/// Render a fragment's options, markers and marker errors.
pub fn render_markers(fragment: &Fragment, markers: &MarkerSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", fragment.path().display());
    for (name, value) in fragment.options().iter() {
        let _ = writeln!(out, "  @{name}: {value}");
    }
    if markers.markers.is_empty() && markers.errors.is_empty() {
        let _ = writeln!(out, "  (no markers)");
    }
    for marker in &markers.markers {
        let _ = writeln!(out, "  {marker}");
    }
    for error in &markers.errors {
        let _ = writeln!(out, "  ERROR: {error}");
    }
    out
}
