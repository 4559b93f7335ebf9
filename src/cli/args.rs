//! Command-line argument parsing and validation

use crate::{
    config::GeneratorVariant,
    core::{
        form::FormInput,
        params::{JobMode, Operation},
    },
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Data Pump Script Generator - turn expdp/impdp requests into DBMS_DATAPUMP PL/SQL
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "dpgen")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an expdp/impdp command line into PL/SQL
    Convert {
        /// Finish by detaching (with a monitoring script) or by waiting
        #[arg(long, value_enum, default_value_t = GeneratorVariant::Detach)]
        variant: GeneratorVariant,

        /// Default schemas to the connecting user when no objects are named
        #[arg(long)]
        infer_schema: bool,

        /// Write scripts into this directory instead of stdout
        #[arg(short = 'o', long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// The command line, e.g. `expdp hr/hr directory=DP dumpfile=hr.dmp schemas=hr`
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command_line: Vec<String>,
    },

    /// Generate PL/SQL from individual form fields
    Form {
        /// Export or import
        #[arg(long, value_enum)]
        operation: Operation,

        /// Job mode
        #[arg(long = "job-mode", value_enum, default_value_t = JobMode::Schema)]
        job_mode: JobMode,

        /// Directory object name
        #[arg(long, default_value = "")]
        directory: String,

        /// Dump file name(s), comma-separated
        #[arg(long, default_value = "")]
        dumpfile: String,

        /// Schemas, tables or tablespaces, comma-separated
        #[arg(long)]
        objects: Option<String>,

        /// Parallel degree
        #[arg(long)]
        parallel: Option<u32>,

        /// Maximum dump file size in GB (export only)
        #[arg(long)]
        filesize: Option<String>,

        /// Add the %U placeholder to dump file names
        #[arg(long)]
        unique_name: bool,

        /// Schema remaps as old:new, comma-separated (import only)
        #[arg(long)]
        remap_schema: Option<String>,

        /// Tablespace remaps as old:new, comma-separated (import only)
        #[arg(long)]
        remap_tablespace: Option<String>,

        /// Log file name
        #[arg(long)]
        logfile: Option<String>,

        /// Compression setting
        #[arg(long)]
        compression: Option<String>,

        /// Content setting (ALL, DATA_ONLY, METADATA_ONLY)
        #[arg(long)]
        content: Option<String>,

        /// Action when a table exists (import only)
        #[arg(long)]
        table_exists_action: Option<String>,

        /// Finish by detaching (with a monitoring script) or by waiting
        #[arg(long, value_enum, default_value_t = GeneratorVariant::Detach)]
        variant: GeneratorVariant,

        /// Write scripts into this directory instead of stdout
        #[arg(short = 'o', long = "output-dir")]
        output_dir: Option<PathBuf>,
    },

    /// Show the normalized parameters of a command line
    Parse {
        /// Default schemas to the connecting user when no objects are named
        #[arg(long)]
        infer_schema: bool,

        /// The command line to inspect
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command_line: Vec<String>,
    },
}

impl Command {
    /// Collect form fields, if this is the form command
    pub fn form_input(&self) -> Option<FormInput> {
        match self {
            Self::Form {
                operation,
                job_mode,
                directory,
                dumpfile,
                objects,
                parallel,
                filesize,
                unique_name,
                remap_schema,
                remap_tablespace,
                logfile,
                compression,
                content,
                table_exists_action,
                ..
            } => Some(FormInput {
                operation: *operation,
                job_mode: *job_mode,
                directory: directory.clone(),
                dumpfile: dumpfile.clone(),
                objects: objects.clone(),
                parallel: *parallel,
                filesize: filesize.clone(),
                unique_name: *unique_name,
                remap_schema: remap_schema.clone(),
                remap_tablespace: remap_tablespace.clone(),
                logfile: logfile.clone(),
                compression: compression.clone(),
                content: content.clone(),
                table_exists_action: table_exists_action.clone(),
            }),
            _ => None,
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
