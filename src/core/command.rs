//! expdp/impdp command line parsing
//!
//! Turns a raw Data Pump command line into a normalized [`ParameterMap`].
//!
//! Segments are split on `key=` markers rather than on whitespace, so a value
//! runs until the next marker and may contain spaces. Markers inside quoted
//! regions are ignored, which lets quoted values carry `=` as well.

use crate::{
    core::params::{Operation, ParameterMap},
    error::{Result, ScriptError},
};
use regex::Regex;
use tracing::{debug, instrument};

/// Result of parsing a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Operation selected by the utility name
    pub operation: Operation,
    /// Normalized parameters
    pub params: ParameterMap,
    /// Username from the leading credentials token, if any
    pub username: Option<String>,
}

/// Parser for expdp/impdp command lines
pub struct CommandParser {
    /// Regex matching the start of a `key=` segment
    re_key_start: Regex,
    /// Default `schemas` to the connecting user when no objects are named
    infer_schema: bool,
}

impl CommandParser {
    /// Create a new command parser
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_key_start: Regex::new(r"(?:^|\s)([A-Za-z_][A-Za-z0-9_]*)=")
                .map_err(|e| ScriptError::config(format!("Failed to compile regex: {}", e)))?,
            infer_schema: false,
        })
    }

    /// Enable or disable schema inference from the connecting username
    #[must_use]
    pub fn with_schema_inference(mut self, enabled: bool) -> Self {
        self.infer_schema = enabled;
        self
    }

    /// Parse a command line into an operation and parameter map
    #[instrument(skip(self, input))]
    pub fn parse(&self, input: &str) -> Result<ParsedCommand> {
        let (utility, rest) = split_first_token(input.trim());

        let operation = match utility.to_ascii_lowercase().as_str() {
            "expdp" => Operation::Export,
            "impdp" => Operation::Import,
            _ => {
                return Err(ScriptError::format(
                    "Command must start with expdp or impdp",
                    input,
                ));
            }
        };

        // A leading token without '=' is the username/password@connection
        let (first, after) = split_credentials(rest);
        let (username, body) = if !first.is_empty() && !first.contains('=') {
            debug!("Skipping credentials token");
            (username_from_credentials(first), after)
        } else {
            (None, rest)
        };

        let mut params = self.split_segments(body);

        if self.infer_schema {
            if let Some(user) = &username {
                if !has_object_selection(&params) {
                    debug!("Defaulting schemas to connecting user {}", user);
                    params.insert("schemas", user.to_ascii_uppercase());
                }
            }
        }

        debug!(
            "Parsed {} command with {} parameter(s)",
            operation,
            params.len()
        );

        Ok(ParsedCommand {
            operation,
            params,
            username,
        })
    }

    /// Split the parameter section into `key=value` segments
    fn split_segments(&self, body: &str) -> ParameterMap {
        let mut starts: Vec<(usize, usize, &str)> = Vec::new();
        let mut open_quote: Option<char> = None;
        let mut cursor = 0;

        for cap in self.re_key_start.captures_iter(body) {
            let (Some(whole), Some(key)) = (cap.get(0), cap.get(1)) else {
                continue;
            };

            // Quotes in text ahead of the first segment do not open a region
            if !starts.is_empty() {
                for c in body[cursor..key.start()].chars() {
                    match open_quote {
                        Some(q) if c == q => open_quote = None,
                        None if c == '"' || c == '\'' => open_quote = Some(c),
                        _ => {}
                    }
                }
            }
            cursor = key.start();

            if open_quote.is_some() {
                debug!("Ignoring quoted marker {}=", key.as_str());
                continue;
            }

            starts.push((key.start(), whole.end(), key.as_str()));
        }

        if let Some((first, _, _)) = starts.first() {
            let leading = body[..*first].trim();
            if !leading.is_empty() {
                debug!("Dropping text without '=': {}", leading);
            }
        }

        let mut params = ParameterMap::new();
        for (i, (_, value_start, key)) in starts.iter().enumerate() {
            let value_end = starts.get(i + 1).map_or(body.len(), |next| next.0);
            let value = strip_quotes(body[*value_start..value_end].trim());

            if let Some(previous) = params.insert(key, value) {
                debug!("Parameter {} repeated, replacing '{}'", key, previous);
            }
        }

        params
    }
}

/// Split off the first whitespace-delimited token
fn split_first_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (s, ""),
    }
}

/// Split off the credentials token, keeping a quoted connect string whole
fn split_credentials(s: &str) -> (&str, &str) {
    let Some(quote) = s.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return split_first_token(s);
    };
    match s[1..].find(quote) {
        Some(end) => {
            let (token, rest) = s.split_at(end + 2);
            (token, rest.trim_start())
        }
        None => split_first_token(s),
    }
}

/// Extract the username from `user/password@connection`
fn username_from_credentials(token: &str) -> Option<String> {
    let token = token.trim_matches(|c| c == '"' || c == '\'');
    let user = token
        .split(['/', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    (!user.is_empty()).then(|| user.to_string())
}

/// Remove one matching pair of surrounding quotes
pub(crate) fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn has_object_selection(params: &ParameterMap) -> bool {
    params.is_enabled("full")
        || params.has("schemas")
        || params.has("tables")
        || params.has("tablespaces")
}
