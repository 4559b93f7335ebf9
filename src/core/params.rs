//! Data Pump request model
//!
//! Holds the normalized parameter map together with the operation and job
//! mode enumerations shared by the parser, the form adapter and the generator.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter names understood by the generator
pub const KNOWN_PARAMETERS: &[&str] = &[
    "directory",
    "dumpfile",
    "logfile",
    "schemas",
    "tables",
    "tablespaces",
    "full",
    "parallel",
    "compression",
    "exclude",
    "include",
    "query",
    "remap_schema",
    "remap_tablespace",
    "remap_table",
    "table_exists_action",
    "content",
    "estimate",
    "filesize",
    "flashback_scn",
    "flashback_time",
    "consistent",
    "network_link",
    "encryption",
    "encryption_password",
    "encryption_algorithm",
    "encryption_mode",
    "unique_name",
];

/// Data Pump operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Operation {
    Export,
    Import,
}

impl Operation {
    /// Value passed as `operation` to `DBMS_DATAPUMP.OPEN`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "EXPORT",
            Self::Import => "IMPORT",
        }
    }

    /// Short prefix used in generated job names
    pub const fn job_prefix(self) -> &'static str {
        match self {
            Self::Export => "EXP",
            Self::Import => "IMP",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data Pump job mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum JobMode {
    Full,
    Schema,
    Table,
    Tablespace,
}

impl JobMode {
    /// Value passed as `job_mode` to `DBMS_DATAPUMP.OPEN`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Schema => "SCHEMA",
            Self::Table => "TABLE",
            Self::Tablespace => "TABLESPACE",
        }
    }

    /// Parameter holding the object list for this mode
    pub const fn object_key(self) -> Option<&'static str> {
        match self {
            Self::Full => None,
            Self::Schema => Some("schemas"),
            Self::Table => Some("tables"),
            Self::Tablespace => Some("tablespaces"),
        }
    }

    /// Infer the job mode from request parameters
    ///
    /// Precedence: `full` flag, then schemas, tables, tablespaces. Defaults
    /// to schema mode.
    pub fn infer(params: &ParameterMap) -> Self {
        if params.is_enabled("full") {
            Self::Full
        } else if params.has("schemas") {
            Self::Schema
        } else if params.has("tables") {
            Self::Table
        } else if params.has("tablespaces") {
            Self::Tablespace
        } else {
            Self::Schema
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized Data Pump parameters keyed by lower-case name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMap {
    values: BTreeMap<String, String>,
}

impl ParameterMap {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any earlier value for the same key
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.values
            .insert(key.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Get a raw parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a parameter value if it is present and not blank
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Check whether a non-blank value is present
    pub fn has(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Interpret a parameter as a yes/no flag
    pub fn is_enabled(&self, key: &str) -> bool {
        self.value(key).is_some_and(is_truthy)
    }

    /// Split a comma-separated parameter into trimmed, non-empty entries
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.value(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Split a comma-separated parameter, ignoring commas inside quotes
    pub fn quoted_list(&self, key: &str) -> Vec<&str> {
        let Some(value) = self.value(key) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        let mut open_quote: Option<char> = None;
        let mut start = 0;
        for (i, c) in value.char_indices() {
            match (open_quote, c) {
                (Some(q), c) if c == q => open_quote = None,
                (None, '"' | '\'') => open_quote = Some(c),
                (None, ',') => {
                    entries.push(&value[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        entries.push(&value[start..]);

        entries
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Keys not in the known parameter set
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !KNOWN_PARAMETERS.contains(k))
            .collect()
    }

    /// Iterate over all parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_infer_full_wins() {
        let p = params(&[("full", "Y"), ("schemas", "hr"), ("tables", "emp")]);
        assert_eq!(JobMode::infer(&p), JobMode::Full);
    }

    #[test]
    fn test_infer_precedence() {
        assert_eq!(
            JobMode::infer(&params(&[("tables", "emp"), ("schemas", "hr")])),
            JobMode::Schema
        );
        assert_eq!(
            JobMode::infer(&params(&[("tables", "emp"), ("tablespaces", "users")])),
            JobMode::Table
        );
        assert_eq!(
            JobMode::infer(&params(&[("tablespaces", "users")])),
            JobMode::Tablespace
        );
    }

    #[test]
    fn test_infer_defaults_to_schema() {
        assert_eq!(JobMode::infer(&ParameterMap::new()), JobMode::Schema);
        assert_eq!(
            JobMode::infer(&params(&[("full", "n"), ("directory", "DIR")])),
            JobMode::Schema
        );
    }

    #[test]
    fn test_insert_lowercases_and_overwrites() {
        let mut p = ParameterMap::new();
        p.insert("DIRECTORY", "A");
        let previous = p.insert("directory", "B");
        assert_eq!(previous.as_deref(), Some("A"));
        assert_eq!(p.get("directory"), Some("B"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_list_trims_and_skips_empty() {
        let p = params(&[("schemas", " hr, scott ,,oe ")]);
        assert_eq!(p.list("schemas"), vec!["hr", "scott", "oe"]);
        assert!(p.list("tables").is_empty());
    }

    #[test]
    fn test_quoted_list_keeps_quoted_commas() {
        let p = params(&[("exclude", "INDEX, TABLE:\"IN ('A','B')\",STATISTICS")]);
        assert_eq!(
            p.quoted_list("exclude"),
            vec!["INDEX", "TABLE:\"IN ('A','B')\"", "STATISTICS"]
        );
    }

    #[test]
    fn test_blank_values_are_absent() {
        let p = params(&[("parallel", "  ")]);
        assert!(!p.has("parallel"));
        assert_eq!(p.get("parallel"), Some("  "));
    }

    #[test]
    fn test_unknown_keys() {
        let p = params(&[("directory", "D"), ("reuse_dumpfiles", "y")]);
        assert_eq!(p.unknown_keys(), vec!["reuse_dumpfiles"]);
    }
}
