//! PL/SQL job script generation
//!
//! Builds a `DBMS_DATAPUMP` job-control block by appending one stanza per
//! requested feature. Generation is total: every parameter is optional and
//! falls back to a default or is left out.

use crate::{
    config::{GeneratorConfig, GeneratorVariant},
    core::{
        command::strip_quotes,
        monitor::monitor_script,
        naming::{job_name, log_file_name, with_unique_placeholder},
        params::{JobMode, Operation, ParameterMap},
    },
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// A fully resolved generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub operation: Operation,
    pub job_mode: JobMode,
    pub params: ParameterMap,
    /// Time embedded in the job and log file names
    pub timestamp: NaiveDateTime,
}

/// Scripts produced for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedScripts {
    /// Generated Data Pump job name
    pub job_name: String,
    /// Resolved log file name
    pub log_file: String,
    /// Job-control PL/SQL block
    pub job_script: String,
    /// Monitoring script, only produced by the detach variant
    pub monitor_script: Option<String>,
}

/// How an export pins its read consistency point
#[derive(Debug, Clone, PartialEq, Eq)]
enum Consistency {
    /// No flashback parameter
    Off,
    /// Capture the current SCN before opening the job
    CaptureScn,
    /// Use an SCN given on the command line
    ExplicitScn(String),
    /// Use a timestamp expression given on the command line
    FlashbackTime(String),
}

impl Consistency {
    fn resolve(operation: Operation, params: &ParameterMap) -> Self {
        if operation != Operation::Export {
            return Self::Off;
        }
        if let Some(scn) = params.value("flashback_scn") {
            return Self::ExplicitScn(scn.to_string());
        }
        if let Some(time) = params.value("flashback_time") {
            return Self::FlashbackTime(time.to_string());
        }
        if let Some(v) = params.value("consistent") {
            if !params.is_enabled("consistent") {
                debug!("Consistency capture disabled by consistent={}", v);
                return Self::Off;
            }
        }
        if encryption_requested(params) {
            debug!("Consistency capture disabled by encryption parameters");
            return Self::Off;
        }
        Self::CaptureScn
    }
}

/// `encryption` other than NONE, or an `encryption_password`
fn encryption_requested(params: &ParameterMap) -> bool {
    let scope = params
        .value("encryption")
        .is_some_and(|v| !v.eq_ignore_ascii_case("none"));
    scope || params.has("encryption_password")
}

/// Generator for Data Pump job and monitoring scripts
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    config: GeneratorConfig,
}

impl ScriptGenerator {
    /// Create a new generator with the given configuration
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate the job script and, for the detach variant, the monitoring script
    #[instrument(
        skip(self, request),
        fields(operation = %request.operation, mode = %request.job_mode)
    )]
    pub fn generate(&self, request: &GenerationRequest) -> GeneratedScripts {
        let params = &request.params;
        let name = job_name(
            request.operation,
            request.job_mode,
            params,
            &request.timestamp,
            &self.config,
        );
        let log_file = log_file_name(params, &request.timestamp, &self.config);
        let consistency = Consistency::resolve(request.operation, params);

        for key in params.unknown_keys() {
            debug!("Passing over unrecognized parameter: {}", key);
        }

        let mut script = ScriptBuilder::new(&self.config.handle_var);

        self.header(&mut script, &consistency);
        if consistency == Consistency::CaptureScn {
            script.comment("Capture current SCN for a consistent export");
            script.line("v_scn := DBMS_FLASHBACK.GET_SYSTEM_CHANGE_NUMBER;");
            script.blank();
        }
        self.open_job(&mut script, request, &name);
        self.dump_files(&mut script, params);
        self.log_file(&mut script, params, &log_file);
        self.object_filters(&mut script, request.job_mode, params);
        self.path_filters(&mut script, params);

        if let Some(degree) = params.value("parallel") {
            script.call(
                "Set parallel degree",
                "SET_PARALLEL",
                &[("degree", degree.to_string())],
            );
        }

        self.consistency_parameter(&mut script, &consistency);

        if request.operation == Operation::Export {
            self.file_size(&mut script, params);
        }

        self.encryption(&mut script, params);
        self.compression(&mut script, params);
        self.data_options(&mut script, request.operation, params);

        if request.operation == Operation::Import {
            self.import_options(&mut script, params);
        }

        if let Some(content) = params.value("content") {
            script.set_parameter(
                "Set content type",
                "CONTENT",
                quoted(&content.to_ascii_uppercase()),
            );
        }

        self.start_and_finish(&mut script, &name, &consistency, &log_file);
        script.footer();

        let monitor = match self.config.variant {
            GeneratorVariant::Detach => Some(monitor_script(&name)),
            GeneratorVariant::Wait => None,
        };

        info!("Generated {} job {}", request.operation, name);

        GeneratedScripts {
            job_name: name,
            log_file,
            job_script: script.finish(),
            monitor_script: monitor,
        }
    }

    fn header(&self, script: &mut ScriptBuilder, consistency: &Consistency) {
        script.raw("SET SERVEROUTPUT ON\n");
        script.raw("DECLARE\n");
        script.line(&format!("{} NUMBER;", self.config.handle_var));
        if *consistency == Consistency::CaptureScn {
            script.line("v_scn NUMBER;");
        }
        if self.config.variant == GeneratorVariant::Wait {
            script.line("job_state VARCHAR2(30);");
        }
        script.raw("BEGIN\n");
    }

    fn open_job(&self, script: &mut ScriptBuilder, request: &GenerationRequest, name: &str) {
        let mut args = vec![
            ("operation", quoted(request.operation.as_str())),
            ("job_mode", quoted(request.job_mode.as_str())),
        ];

        if let Some(link) = request.params.value("network_link") {
            if request.operation == Operation::Import {
                args.push(("remote_link", quoted(&link.to_ascii_uppercase())));
            } else {
                warn!("network_link only applies to imports, ignoring");
            }
        }
        args.push(("job_name", quoted(name)));

        let target = self.config.handle_var.clone();
        script.assign_call("Create Data Pump job", &target, "OPEN", &args);
    }

    fn dump_files(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        let directory = self.directory(params);
        let unique = params.is_enabled("unique_name");

        for file in params.list("dumpfile") {
            let file = if unique {
                with_unique_placeholder(file)
            } else {
                file.to_string()
            };
            script.call(
                "Add dump file",
                "ADD_FILE",
                &[
                    ("filename", quoted(&file)),
                    ("directory", quoted(&directory)),
                    ("filetype", "DBMS_DATAPUMP.KU$_FILE_TYPE_DUMP_FILE".to_string()),
                ],
            );
        }
    }

    fn log_file(&self, script: &mut ScriptBuilder, params: &ParameterMap, log_file: &str) {
        let directory = self.directory(params);
        script.call(
            "Add log file",
            "ADD_FILE",
            &[
                ("filename", quoted(log_file)),
                ("directory", quoted(&directory)),
                ("filetype", "DBMS_DATAPUMP.KU$_FILE_TYPE_LOG_FILE".to_string()),
            ],
        );
    }

    fn object_filters(
        &self,
        script: &mut ScriptBuilder,
        job_mode: JobMode,
        params: &ParameterMap,
    ) {
        let (key, filter, label) = match job_mode {
            JobMode::Full => return,
            JobMode::Schema => ("schemas", "SCHEMA_EXPR", "schema"),
            JobMode::Table => ("tables", "NAME_EXPR", "table"),
            JobMode::Tablespace => ("tablespaces", "TABLESPACE_EXPR", "tablespace"),
        };

        for object in params.list(key) {
            let expr = format!("IN ('{}')", sql_escape(&object.to_ascii_uppercase()));
            script.call(
                &format!("Filter for {label}"),
                "METADATA_FILTER",
                &[("name", quoted(filter)), ("value", quoted(&expr))],
            );
        }
    }

    fn path_filters(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        for (key, filter, comment) in [
            ("exclude", "EXCLUDE_PATH_EXPR", "Exclude filter"),
            ("include", "INCLUDE_PATH_EXPR", "Include filter"),
        ] {
            for entry in params.quoted_list(key) {
                let (object_type, path) = match entry.split_once(':') {
                    Some((object_type, path)) => (object_type, Some(path)),
                    None => (entry, None),
                };

                let mut args = vec![
                    ("name", quoted(filter)),
                    ("value", quoted(&object_type.trim().to_ascii_uppercase())),
                ];
                let path = path.map(|p| strip_quotes(p.trim())).filter(|p| !p.is_empty());
                if let Some(path) = path {
                    args.push(("object_path", quoted(path)));
                }
                script.call(comment, "METADATA_FILTER", &args);
            }
        }
    }

    fn consistency_parameter(&self, script: &mut ScriptBuilder, consistency: &Consistency) {
        match consistency {
            Consistency::Off => {}
            Consistency::CaptureScn => {
                script.set_parameter(
                    "Export as of captured SCN",
                    "FLASHBACK_SCN",
                    "v_scn".to_string(),
                );
            }
            Consistency::ExplicitScn(scn) => {
                script.set_parameter("Export as of given SCN", "FLASHBACK_SCN", scn.clone());
            }
            Consistency::FlashbackTime(time) => {
                script.set_parameter(
                    "Export as of given time",
                    "FLASHBACK_TIME",
                    quoted(strip_quotes(time)),
                );
            }
        }
    }

    fn file_size(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        let Some(raw) = params.value("filesize") else {
            return;
        };

        match gigabytes_to_bytes(raw) {
            Some(bytes) => {
                script.set_parameter("Limit dump file size", "FILESIZE", bytes.to_string());
            }
            None => warn!("Ignoring filesize '{}': expected a size in GB", raw),
        }
    }

    fn encryption(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        if let Some(scope) = params.value("encryption") {
            script.set_parameter(
                "Set encryption",
                "ENCRYPTION",
                quoted(&scope.to_ascii_uppercase()),
            );
        }
        if let Some(mode) = params.value("encryption_mode") {
            script.set_parameter(
                "Set encryption mode",
                "ENCRYPTION_MODE",
                quoted(&mode.to_ascii_uppercase()),
            );
        }
        if let Some(password) = params.value("encryption_password") {
            script.set_parameter(
                "Set encryption password",
                "ENCRYPTION_PASSWORD",
                quoted(password),
            );
        }
        if let Some(algorithm) = params.value("encryption_algorithm") {
            script.set_parameter(
                "Set encryption algorithm",
                "ENCRYPTION_ALGORITHM",
                quoted(&algorithm.to_ascii_uppercase()),
            );
        }
    }

    fn compression(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        let Some(value) = params.value("compression") else {
            return;
        };

        let value = value.to_ascii_uppercase();
        if value == "NONE" {
            debug!("Compression disabled");
            return;
        }
        script.set_parameter("Set compression", "COMPRESSION", quoted(&value));
    }

    /// Row subsetting and size estimation
    fn data_options(
        &self,
        script: &mut ScriptBuilder,
        operation: Operation,
        params: &ParameterMap,
    ) {
        if let Some(query) = params.value("query") {
            let (table, clause) = split_query(query);
            let mut args = vec![
                ("name", quoted("SUBQUERY")),
                ("value", quoted(clause)),
            ];
            if let Some(table) = table {
                args.push(("table_name", quoted(&table.to_ascii_uppercase())));
            }
            script.call("Filter rows", "DATA_FILTER", &args);
        }

        if let Some(estimate) = params.value("estimate") {
            if operation == Operation::Export {
                script.set_parameter(
                    "Set size estimate method",
                    "ESTIMATE",
                    quoted(&estimate.to_ascii_uppercase()),
                );
            }
        }
    }

    fn import_options(&self, script: &mut ScriptBuilder, params: &ParameterMap) {
        for (key, remap, comment) in [
            ("remap_schema", "REMAP_SCHEMA", "Remap schema"),
            ("remap_tablespace", "REMAP_TABLESPACE", "Remap tablespace"),
            ("remap_table", "REMAP_TABLE", "Remap table"),
        ] {
            for entry in params.list(key) {
                let Some((old, new)) = entry.split_once(':') else {
                    warn!("Ignoring {} entry '{}': expected old:new", key, entry);
                    continue;
                };
                script.call(
                    comment,
                    "METADATA_REMAP",
                    &[
                        ("name", quoted(remap)),
                        ("old_value", quoted(&old.trim().to_ascii_uppercase())),
                        ("value", quoted(&new.trim().to_ascii_uppercase())),
                    ],
                );
            }
        }

        if let Some(action) = params.value("table_exists_action") {
            script.set_parameter(
                "Set table exists action",
                "TABLE_EXISTS_ACTION",
                quoted(&action.to_ascii_uppercase()),
            );
        }
    }

    fn start_and_finish(
        &self,
        script: &mut ScriptBuilder,
        name: &str,
        consistency: &Consistency,
        log_file: &str,
    ) {
        let handle = &self.config.handle_var;

        script.comment("Start the Data Pump job");
        script.line(&format!("DBMS_DATAPUMP.START_JOB(handle => {handle});"));
        script.blank();

        script.comment("Job summary");
        script.put_line(&quoted(&format!("Job name: {name}")));
        match consistency {
            Consistency::CaptureScn => script.put_line("'Export SCN: ' || v_scn"),
            Consistency::ExplicitScn(scn) => {
                script.put_line(&quoted(&format!("Export SCN: {scn}")));
            }
            _ => {}
        }
        script.put_line(&quoted(&format!("Log file: {log_file}")));
        script.blank();

        match self.config.variant {
            GeneratorVariant::Detach => {
                script.comment("Detach and leave the job running");
                script.line(&format!("DBMS_DATAPUMP.DETACH(handle => {handle});"));
                script.put_line("'Job detached. Use the monitoring script to track progress.'");
            }
            GeneratorVariant::Wait => {
                script.comment("Wait for job completion");
                script.line(&format!(
                    "DBMS_DATAPUMP.WAIT_FOR_JOB(handle => {handle}, job_state => job_state);"
                ));
                script.put_line("'Job completed with status: ' || job_state");
            }
        }
        script.blank();
    }

    fn directory(&self, params: &ParameterMap) -> String {
        params
            .value("directory")
            .map_or_else(|| self.config.default_directory.clone(), str::to_string)
    }
}

/// Appends indented PL/SQL statements to a script buffer
struct ScriptBuilder {
    buf: String,
    handle: String,
}

impl ScriptBuilder {
    fn new(handle: &str) -> Self {
        Self {
            buf: String::new(),
            handle: handle.to_string(),
        }
    }

    fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn line(&mut self, text: &str) {
        self.buf.push_str("  ");
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn comment(&mut self, text: &str) {
        self.line(&format!("-- {text}"));
    }

    fn put_line(&mut self, expr: &str) {
        self.line(&format!("DBMS_OUTPUT.PUT_LINE({expr});"));
    }

    /// `-- comment` followed by `DBMS_DATAPUMP.<proc>(<args>);`
    fn call(&mut self, comment: &str, proc: &str, args: &[(&str, String)]) {
        let mut all = vec![("handle", self.handle.clone())];
        all.extend(args.iter().map(|(k, v)| (*k, v.clone())));
        self.comment(comment);
        self.call_block(&format!("DBMS_DATAPUMP.{proc}("), &all);
    }

    fn assign_call(&mut self, comment: &str, target: &str, func: &str, args: &[(&str, String)]) {
        self.comment(comment);
        self.call_block(&format!("{target} := DBMS_DATAPUMP.{func}("), args);
    }

    fn set_parameter(&mut self, comment: &str, name: &str, value: String) {
        self.call(
            comment,
            "SET_PARAMETER",
            &[("name", quoted(name)), ("value", value)],
        );
    }

    fn call_block(&mut self, opening: &str, args: &[(&str, String)]) {
        let width = args.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        self.line(opening);
        let last = args.len().saturating_sub(1);
        for (i, (name, value)) in args.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            self.line(&format!("  {name:<width$} => {value}{sep}"));
        }
        self.line(");");
        self.blank();
    }

    fn footer(&mut self) {
        let handle = self.handle.clone();
        self.raw("EXCEPTION\n");
        self.raw("  WHEN OTHERS THEN\n");
        self.raw("    DBMS_OUTPUT.PUT_LINE('Error: ' || SQLERRM);\n");
        self.raw(&format!("    IF {handle} IS NOT NULL THEN\n"));
        self.raw(&format!("      DBMS_DATAPUMP.DETACH(handle => {handle});\n"));
        self.raw("    END IF;\n");
        self.raw("    RAISE;\n");
        self.raw("END;\n");
        self.raw("/\n");
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Double single quotes for use inside a SQL string literal
pub fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a SQL string literal
fn quoted(value: &str) -> String {
    format!("'{}'", sql_escape(value))
}

/// Convert a size in gigabytes (optionally suffixed `G`/`GB`) to bytes
pub fn gigabytes_to_bytes(raw: &str) -> Option<u64> {
    let lower = raw.trim().to_ascii_lowercase();
    let number = lower
        .strip_suffix("gb")
        .or_else(|| lower.strip_suffix('g'))
        .unwrap_or(lower.as_str())
        .trim();

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(BYTES_PER_GB);
    }

    let fractional = number.parse::<f64>().ok()?;
    if !fractional.is_finite() || fractional < 0.0 {
        return None;
    }
    let bytes = (fractional * BYTES_PER_GB as f64).round();
    (bytes <= u64::MAX as f64).then_some(bytes as u64)
}

/// Split `[table:]clause` into an optional table name and the row clause
fn split_query(query: &str) -> (Option<&str>, &str) {
    let query = strip_quotes(query.trim());
    if let Some((table, clause)) = query.split_once(':') {
        let table = table.trim();
        let is_name = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '#'));
        if is_name {
            return (Some(table), strip_quotes(clause.trim()));
        }
    }
    (None, query)
}
