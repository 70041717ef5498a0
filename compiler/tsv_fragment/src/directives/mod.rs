//! Per-fragment compiler option directives.
//!
//! A fragment may open with comment lines of the form `// @name: value`
//! (the convention TypeScript's own test harness uses). They apply to that
//! fragment only and override the run-wide defaults.
//!
//! Directives end at the first line that is not blank and not a `//`
//! comment. `// @ts-ignore` style pragmas are not directives.

use std::collections::BTreeMap;

/// Compiler options for one type-checking invocation.
///
/// Stored sorted by name so the generated command line is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOptions {
    values: BTreeMap<String, String>,
}

impl CheckOptions {
    pub fn new() -> Self {
        CheckOptions::default()
    }

    /// Options applied when nothing else is configured: strict mode on.
    pub fn defaults() -> Self {
        let mut options = CheckOptions::new();
        options.set("strict", "true");
        options
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return a copy of `self` with every option in `overrides` applied.
    #[must_use]
    pub fn merged(&self, overrides: &CheckOptions) -> CheckOptions {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.set(name, value);
        }
        merged
    }

    /// Parse a `name=value` pair as given on the command line.
    pub fn parse_assignment(text: &str) -> Option<(String, String)> {
        let (name, value) = text.split_once('=')?;
        let name = name.trim();
        if !is_option_name(name) {
            return None;
        }
        Some((name.to_string(), value.trim().to_string()))
    }
}

/// Collect the `// @name: value` header of a fragment.
pub fn parse_directives(text: &str) -> CheckOptions {
    let mut options = CheckOptions::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(comment) = trimmed.strip_prefix("//") else {
            break;
        };
        let Some(directive) = comment.trim_start().strip_prefix('@') else {
            continue;
        };
        let Some((name, value)) = directive.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if !is_option_name(name) {
            continue;
        }
        tracing::trace!(option = name, value = value.trim(), "fragment directive");
        options.set(name, value.trim());
    }

    options
}

fn is_option_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests;
