use anyhow::Result;
use std::process::ExitCode;
use usedef::cli::{self, CheckOutcome, Cli, Commands};
use usedef::config::{discover_config, load_config_file, UsedefConfig};

/// Exit code for a run that failed before producing a verdict
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match run(cli) {
        Ok(CheckOutcome::Clean) => ExitCode::SUCCESS,
        Ok(CheckOutcome::Findings) => ExitCode::FAILURE,
        Err(e) => {
            if cli::is_internal_failure(&e) {
                tracing::error!("internal consistency failure: {:#}", e);
            }
            eprint!("{}", cli::render_fatal(&e));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn load_config(cli: &Cli) -> Result<UsedefConfig> {
    match &cli.config {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(discover_config()),
    }
}

fn run(cli: Cli) -> Result<CheckOutcome> {
    let file_config = load_config(&cli)?;

    match cli.command {
        Commands::Check {
            files,
            format,
            no_color,
            jobs,
            max_iterations,
        } => {
            let config =
                cli::build_check_config(&file_config, files, format, no_color, jobs, max_iterations);
            cli::configure_thread_pool(config.jobs);
            cli::handle_check_command(config)
        }
        Commands::Cfg { file } => {
            cli::handle_cfg_command(&file)?;
            Ok(CheckOutcome::Clean)
        }
    }
}
