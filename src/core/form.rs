//! Structured form input
//!
//! Converts explicitly named fields into a generation request. Unlike the
//! command parser, the job mode is chosen by the caller rather than inferred.

use crate::{
    core::{
        generator::GenerationRequest,
        params::{JobMode, Operation, ParameterMap},
    },
    error::{Result, ScriptError},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fields collected in form mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub operation: Operation,
    pub job_mode: JobMode,
    pub directory: String,
    pub dumpfile: String,
    /// Comma-separated schemas, tables or tablespaces depending on the mode
    pub objects: Option<String>,
    pub parallel: Option<u32>,
    /// File size limit in gigabytes
    pub filesize: Option<String>,
    /// Insert `%U` into dump file names
    pub unique_name: bool,
    pub remap_schema: Option<String>,
    pub remap_tablespace: Option<String>,
    pub logfile: Option<String>,
    pub compression: Option<String>,
    pub content: Option<String>,
    pub table_exists_action: Option<String>,
}

impl FormInput {
    /// Create form input with the required fields and no options
    pub fn new(
        operation: Operation,
        job_mode: JobMode,
        directory: impl Into<String>,
        dumpfile: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            job_mode,
            directory: directory.into(),
            dumpfile: dumpfile.into(),
            objects: None,
            parallel: None,
            filesize: None,
            unique_name: false,
            remap_schema: None,
            remap_tablespace: None,
            logfile: None,
            compression: None,
            content: None,
            table_exists_action: None,
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.directory.trim().is_empty() {
            missing.push("Directory");
        }
        if self.dumpfile.trim().is_empty() {
            missing.push("Dump File");
        }

        if !missing.is_empty() {
            return Err(ScriptError::validation(format!(
                "Please fill in required fields: {}",
                missing.join(" and ")
            )));
        }

        if self.parallel == Some(0) {
            return Err(ScriptError::validation("Parallel degree must be at least 1"));
        }

        Ok(())
    }

    /// Validate the form and build a generation request
    #[instrument(skip(self), fields(operation = %self.operation, mode = %self.job_mode))]
    pub fn into_request(self, timestamp: NaiveDateTime) -> Result<GenerationRequest> {
        self.validate()?;

        let mut params = ParameterMap::new();
        params.insert("directory", self.directory.trim());
        params.insert("dumpfile", self.dumpfile.trim());

        match self.job_mode.object_key() {
            Some(key) => {
                if let Some(objects) = non_blank(self.objects.as_deref()) {
                    params.insert(key, objects);
                }
            }
            None => {
                params.insert("full", "Y");
            }
        }

        if let Some(parallel) = self.parallel {
            params.insert("parallel", parallel.to_string());
        }
        if self.unique_name {
            params.insert("unique_name", "Y");
        }

        let optional = [
            ("filesize", self.filesize.as_deref()),
            ("remap_schema", self.remap_schema.as_deref()),
            ("remap_tablespace", self.remap_tablespace.as_deref()),
            ("logfile", self.logfile.as_deref()),
            ("compression", self.compression.as_deref()),
            ("content", self.content.as_deref()),
            ("table_exists_action", self.table_exists_action.as_deref()),
        ];
        for (key, value) in optional {
            if let Some(value) = non_blank(value) {
                params.insert(key, value);
            }
        }

        debug!("Form produced {} parameter(s)", params.len());

        Ok(GenerationRequest {
            operation: self.operation,
            job_mode: self.job_mode,
            params,
            timestamp,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
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

    #[test]
    fn test_missing_required_fields() {
        let form = FormInput::new(Operation::Export, JobMode::Schema, "", "  ");
        let err = form.into_request(ts()).unwrap_err();
        match err {
            ScriptError::Validation { message } => {
                assert!(message.contains("Directory"));
                assert!(message.contains("Dump File"));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }

        let form = FormInput::new(Operation::Export, JobMode::Schema, "DIR", "");
        assert!(matches!(
            form.into_request(ts()),
            Err(ScriptError::Validation { .. })
        ));
    }

    #[test]
    fn test_objects_follow_job_mode() {
        let mut form = FormInput::new(Operation::Export, JobMode::Table, "DIR", "t.dmp");
        form.objects = Some("emp,dept".to_string());
        let request = form.into_request(ts()).unwrap();

        assert_eq!(request.job_mode, JobMode::Table);
        assert_eq!(request.params.get("tables"), Some("emp,dept"));
        assert!(request.params.get("schemas").is_none());
    }

    #[test]
    fn test_full_mode_sets_flag() {
        let mut form = FormInput::new(Operation::Export, JobMode::Full, "DIR", "f.dmp");
        form.objects = Some("ignored".to_string());
        let request = form.into_request(ts()).unwrap();

        assert!(request.params.is_enabled("full"));
        assert_eq!(JobMode::infer(&request.params), JobMode::Full);
        assert_eq!(request.params.len(), 3);
    }

    #[test]
    fn test_optional_fields() {
        let mut form = FormInput::new(Operation::Import, JobMode::Schema, "DIR", "x.dmp");
        form.parallel = Some(4);
        form.unique_name = true;
        form.remap_schema = Some("hr:hr2".to_string());
        form.remap_tablespace = Some("  ".to_string());
        let request = form.into_request(ts()).unwrap();

        assert_eq!(request.params.get("parallel"), Some("4"));
        assert!(request.params.is_enabled("unique_name"));
        assert_eq!(request.params.get("remap_schema"), Some("hr:hr2"));
        assert!(request.params.get("remap_tablespace").is_none());
    }

    #[test]
    fn test_zero_parallel_rejected() {
        let mut form = FormInput::new(Operation::Export, JobMode::Schema, "DIR", "x.dmp");
        form.parallel = Some(0);
        assert!(form.validate().is_err());
    }
}
