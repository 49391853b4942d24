//! Command handlers for CLI subcommands

pub mod cfg;
pub mod check;

pub use cfg::handle_cfg_command;
pub use check::{build_check_config, handle_check_command, CheckConfig, CheckOutcome};

use crate::ast::StmtList;
use crate::errors::{Error, Result, ResultExt};
use std::path::Path;

/// Read a JSON-encoded program from disk.
pub fn load_program(path: &Path) -> Result<StmtList> {
    let contents = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| Error::parse(path, e.to_string()))
}
