//! Configuration management for the script generator
//!
//! Centralizes configuration options and provides validation.

use crate::{cli::Args, error::ScriptError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Directory receiving generated `.sql` files; stdout when unset
    pub output_dir: Option<PathBuf>,
    /// Script generation settings
    pub generator: GeneratorConfig,
}

/// How the job script finishes after starting the job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum GeneratorVariant {
    /// Detach and leave the job running; emit a separate monitoring script
    Detach,
    /// Block in `WAIT_FOR_JOB` and report the final state inline
    Wait,
}

/// Script generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Detach or wait variant
    pub variant: GeneratorVariant,
    /// PL/SQL variable holding the job handle
    pub handle_var: String,
    /// Directory object used when `directory` is not given
    pub default_directory: String,
    /// Log file name used when neither `logfile` nor `dumpfile` is given
    pub default_logfile: String,
    /// Oracle limit on job name length
    pub job_name_max_len: usize,
    /// Longest object identifier embedded in a job name
    pub object_id_max_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            output_dir: None,
            generator: GeneratorConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            variant: GeneratorVariant::Detach,
            handle_var: "h1".to_string(),
            default_directory: "DATA_PUMP_DIR".to_string(),
            default_logfile: "datapump.log".to_string(),
            job_name_max_len: 30,
            object_id_max_len: 10,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, ScriptError> {
        let mut config = Self {
            debug: args.debug,
            ..Self::default()
        };

        match &args.command {
            crate::cli::Command::Convert {
                variant,
                output_dir,
                ..
            }
            | crate::cli::Command::Form {
                variant,
                output_dir,
                ..
            } => {
                config.generator.variant = *variant;
                config.output_dir = output_dir.clone();
            }
            crate::cli::Command::Parse { .. } => {}
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ScriptError> {
        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ScriptError::config(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }

        if self.generator.handle_var.trim().is_empty() {
            return Err(ScriptError::config("Job handle variable name is empty"));
        }

        if self.generator.job_name_max_len == 0 {
            return Err(ScriptError::config("Job name length limit must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_generator_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.variant, GeneratorVariant::Detach);
        assert_eq!(config.default_directory, "DATA_PUMP_DIR");
        assert_eq!(config.job_name_max_len, 30);
    }

    #[test]
    fn test_validate_rejects_file_as_output_dir() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            output_dir: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ScriptError::Config { .. }));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_validate_accepts_missing_output_dir() {
        let config = Config {
            output_dir: Some(PathBuf::from("does/not/exist/yet")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
