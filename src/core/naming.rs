//! Job and file naming rules

use crate::{
    config::GeneratorConfig,
    core::params::{JobMode, Operation, ParameterMap},
};
use chrono::NaiveDateTime;

/// Placeholder Data Pump expands to a two-digit file sequence number
pub const UNIQUE_PLACEHOLDER: &str = "%U";

/// Timestamp format embedded in job and log file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a generation timestamp for names
pub fn timestamp_suffix(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Keep only ASCII alphanumerics, upper-cased and truncated
pub fn sanitize_identifier(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(max_len)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Build the Data Pump job name
///
/// `<EXP|IMP>_<OBJECT>_<YYYYMMDDHHMMSS>`, where OBJECT is the first entry of
/// the mode's object list (or the mode name), upper-cased and cut to the
/// configured maximum length.
pub fn job_name(
    operation: Operation,
    job_mode: JobMode,
    params: &ParameterMap,
    timestamp: &NaiveDateTime,
    config: &GeneratorConfig,
) -> String {
    let object = job_mode
        .object_key()
        .and_then(|key| params.list(key).first().copied())
        .map(|first| sanitize_identifier(first, config.object_id_max_len))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| job_mode.as_str().to_string());

    let mut name = format!(
        "{}_{}_{}",
        operation.job_prefix(),
        object,
        timestamp_suffix(timestamp)
    )
    .to_ascii_uppercase();
    name.truncate(config.job_name_max_len);
    name
}

/// Insert the `%U` placeholder before the file extension
///
/// Names already carrying the placeholder are returned unchanged.
pub fn with_unique_placeholder(file: &str) -> String {
    if file.to_ascii_uppercase().contains(UNIQUE_PLACEHOLDER) {
        return file.to_string();
    }

    match split_extension(file) {
        (stem, Some(ext)) => format!("{stem}_{UNIQUE_PLACEHOLDER}.{ext}"),
        (stem, None) => format!("{stem}_{UNIQUE_PLACEHOLDER}"),
    }
}

/// Resolve the log file name
///
/// Explicit `logfile` first; otherwise the first dump file with its extension
/// and any `%U` placeholder dropped plus a timestamp suffix; otherwise the
/// configured default.
pub fn log_file_name(
    params: &ParameterMap,
    timestamp: &NaiveDateTime,
    config: &GeneratorConfig,
) -> String {
    if let Some(logfile) = params.value("logfile") {
        return logfile.to_string();
    }

    let dumpfiles = params.list("dumpfile");
    match dumpfiles.first() {
        Some(first) => {
            let (stem, _) = split_extension(first);
            let stem = strip_placeholder(stem);
            format!("{}_{}.log", stem, timestamp_suffix(timestamp))
        }
        None => config.default_logfile.clone(),
    }
}

fn split_extension(file: &str) -> (&str, Option<&str>) {
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (file, None),
    }
}

fn strip_placeholder(stem: &str) -> String {
    let cleaned = stem.replace("_%U", "").replace("_%u", "");
    let cleaned = cleaned.replace(UNIQUE_PLACEHOLDER, "").replace("%u", "");
    if cleaned.is_empty() {
        "datapump".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_job_name_from_first_schema() {
        let config = GeneratorConfig::default();
        let p = params(&[("schemas", "hr_app, scott")]);
        let name = job_name(Operation::Export, JobMode::Schema, &p, &ts(), &config);
        assert_eq!(name, "EXP_HRAPP_20240309140507");
    }

    #[test]
    fn test_job_name_without_objects_uses_mode() {
        let config = GeneratorConfig::default();
        let name = job_name(
            Operation::Import,
            JobMode::Full,
            &ParameterMap::new(),
            &ts(),
            &config,
        );
        assert_eq!(name, "IMP_FULL_20240309140507");
    }

    #[test]
    fn test_job_name_is_bounded_and_upper_case() {
        let config = GeneratorConfig::default();
        let long = "a_very-long.table$name_that_keeps_going";
        let p = params(&[("tables", long)]);
        let name = job_name(Operation::Export, JobMode::Table, &p, &ts(), &config);

        assert!(name.len() <= 30);
        assert_eq!(name, name.to_ascii_uppercase());
        assert!(name.starts_with("EXP_AVERYLONGT_"));
    }

    #[test]
    fn test_job_name_respects_custom_limit() {
        let config = GeneratorConfig {
            job_name_max_len: 12,
            ..GeneratorConfig::default()
        };
        let p = params(&[("schemas", "hr")]);
        let name = job_name(Operation::Export, JobMode::Schema, &p, &ts(), &config);
        assert_eq!(name, "EXP_HR_20240");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("hr.emp$1", 10), "HREMP1");
        assert_eq!(sanitize_identifier("abcdefghijkl", 4), "ABCD");
        assert_eq!(sanitize_identifier("__", 10), "");
    }

    #[test]
    fn test_unique_placeholder() {
        assert_eq!(with_unique_placeholder("exp.dmp"), "exp_%U.dmp");
        assert_eq!(with_unique_placeholder("exp"), "exp_%U");
        assert_eq!(with_unique_placeholder("exp_%U.dmp"), "exp_%U.dmp");
        assert_eq!(with_unique_placeholder("exp%u.dmp"), "exp%u.dmp");
        assert_eq!(with_unique_placeholder("a.b.dmp"), "a.b_%U.dmp");
    }

    #[test]
    fn test_log_file_explicit() {
        let config = GeneratorConfig::default();
        let p = params(&[("logfile", "mine.log"), ("dumpfile", "x.dmp")]);
        assert_eq!(log_file_name(&p, &ts(), &config), "mine.log");
    }

    #[test]
    fn test_log_file_from_dumpfile() {
        let config = GeneratorConfig::default();
        let p = params(&[("dumpfile", "hr_%U.dmp,hr2.dmp")]);
        assert_eq!(
            log_file_name(&p, &ts(), &config),
            "hr_20240309140507.log"
        );
    }

    #[test]
    fn test_log_file_default() {
        let config = GeneratorConfig::default();
        assert_eq!(
            log_file_name(&ParameterMap::new(), &ts(), &config),
            "datapump.log"
        );
    }
}
