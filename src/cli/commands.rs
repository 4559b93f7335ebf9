//! Command implementations for the CLI

use crate::{
    cli::Command,
    config::Config,
    core::{
        command::CommandParser,
        form::FormInput,
        generator::{GeneratedScripts, GenerationRequest, ScriptGenerator},
        output::ScriptWriter,
        params::JobMode,
    },
};
use anyhow::Context;
use chrono::Local;
use tracing::{info, instrument};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config, command))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Convert {
            command_line,
            infer_schema,
            ..
        } => execute_convert_command(config, &command_line.join(" "), *infer_schema),
        Command::Form { .. } => {
            let form = command
                .form_input()
                .context("Form command without form fields")?;
            execute_form_command(config, form)
        }
        Command::Parse {
            command_line,
            infer_schema,
        } => execute_parse_command(&command_line.join(" "), *infer_schema),
    }
}

/// Execute the convert command
#[instrument(skip(config, command_line))]
fn execute_convert_command(
    config: &Config,
    command_line: &str,
    infer_schema: bool,
) -> anyhow::Result<()> {
    info!("Converting Data Pump command line...");

    let parsed = CommandParser::new()?
        .with_schema_inference(infer_schema)
        .parse(command_line)
        .context("Failed to parse command line")?;

    let request = GenerationRequest {
        operation: parsed.operation,
        job_mode: JobMode::infer(&parsed.params),
        params: parsed.params,
        timestamp: Local::now().naive_local(),
    };

    let scripts = ScriptGenerator::new(config.generator.clone()).generate(&request);
    emit_scripts(config, &scripts)
}

/// Execute the form command
#[instrument(skip(config, form))]
fn execute_form_command(config: &Config, form: FormInput) -> anyhow::Result<()> {
    info!("Generating script from form fields...");

    let request = form
        .into_request(Local::now().naive_local())
        .context("Invalid form input")?;

    let scripts = ScriptGenerator::new(config.generator.clone()).generate(&request);
    emit_scripts(config, &scripts)
}

/// Execute the parse command
#[instrument(skip(command_line))]
fn execute_parse_command(command_line: &str, infer_schema: bool) -> anyhow::Result<()> {
    let parsed = CommandParser::new()?
        .with_schema_inference(infer_schema)
        .parse(command_line)
        .context("Failed to parse command line")?;

    println!("operation={}", parsed.operation);
    println!("job_mode={}", JobMode::infer(&parsed.params));
    for (key, value) in parsed.params.iter() {
        let shown = if key == "encryption_password" { "********" } else { value };
        println!("{key}={shown}");
    }

    let unknown = parsed.params.unknown_keys();
    if !unknown.is_empty() {
        info!("Unrecognized parameters passed through: {:?}", unknown);
    }
    Ok(())
}

/// Print scripts to stdout or write them to the output directory
fn emit_scripts(config: &Config, scripts: &GeneratedScripts) -> anyhow::Result<()> {
    match &config.output_dir {
        Some(dir) => {
            let written = ScriptWriter::new(dir)
                .write(scripts)
                .context("Failed to write scripts")?;
            for path in &written {
                println!("{}", path.display());
            }
        }
        None => {
            print!("{}", scripts.job_script);
            if let Some(monitor) = &scripts.monitor_script {
                println!();
                println!("-- ============================================================");
                println!("-- Monitoring script");
                println!("-- ============================================================");
                print!("{monitor}");
            }
        }
    }

    info!(
        "Script generation completed for job {} (log file {})",
        scripts.job_name, scripts.log_file
    );
    Ok(())
}
