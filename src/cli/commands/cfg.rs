//! Cfg command handler

use crate::cfg::ControlFlowGraph;
use anyhow::Result;
use std::path::Path;

use super::load_program;

/// Print the program's control flow graph as Graphviz DOT.
pub fn handle_cfg_command(file: &Path) -> Result<()> {
    let program = load_program(file)?;
    let cfg = ControlFlowGraph::from_program(&program);
    tracing::debug!(nodes = cfg.len(), edges = cfg.edges().len(), "built CFG");
    print!("{}", cfg.to_dot());
    Ok(())
}
