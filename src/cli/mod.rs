//! CLI module for usedef
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Report rendering (`output`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod output;
pub mod setup;

pub use args::{Cli, Commands};
pub use commands::{
    build_check_config, handle_cfg_command, handle_check_command, load_program, CheckConfig,
    CheckOutcome,
};
pub use output::{is_internal_failure, render_fatal, render_json, render_text, FileReport};
pub use setup::{configure_thread_pool, init_logging, LOG_ENV};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
