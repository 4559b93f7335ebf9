//! # Data Pump Script Generator
//!
//! Turns Oracle Data Pump requests into PL/SQL built on `DBMS_DATAPUMP`.
//! A request is either an `expdp`/`impdp` command line or a set of form
//! fields; the output is a job-control block plus an optional monitoring
//! script.
//!
//! ## Features
//!
//! - Quote-aware parsing of `key=value` command lines
//! - Job mode inference (full, schema, table, tablespace)
//! - Consistent exports via captured SCN, flashback SCN or flashback time
//! - Filters, remaps, parallelism, file size limits, compression and encryption
//! - Detached jobs with a companion monitoring script, or inline waiting
//!
//! ## Example
//!
//! ```no_run
//! use datapump_scriptgen::{
//!     config::GeneratorConfig,
//!     core::{CommandParser, GenerationRequest, JobMode, ScriptGenerator},
//! };
//!
//! let parsed =
//!     CommandParser::new()?.parse("expdp hr/hr directory=DP dumpfile=hr.dmp schemas=hr")?;
//! let request = GenerationRequest {
//!     operation: parsed.operation,
//!     job_mode: JobMode::infer(&parsed.params),
//!     params: parsed.params,
//!     timestamp: chrono::Local::now().naive_local(),
//! };
//! let scripts = ScriptGenerator::new(GeneratorConfig::default()).generate(&request);
//! println!("{}", scripts.job_script);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr so generated scripts on stdout can be redirected.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
