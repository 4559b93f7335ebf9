use anyhow::Result;
use datapump_scriptgen::{cli, config::Config, setup_logging};

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Logs go to stderr; stdout is reserved for generated scripts
    setup_logging(args.debug)?;

    let config = Config::from_args(&args)?;
    cli::execute_command(&config, &args.command)
}
