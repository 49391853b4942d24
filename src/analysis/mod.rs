//! Dataflow analyses over the control flow graph.
//!
//! The pipeline has three phases:
//!
//! 1. **CFG Construction**: lower the AST into a [`ControlFlowGraph`]
//! 2. **Reaching Definitions**: forward fixed point giving, per node, the
//!    definitions that may reach it
//! 3. **Use-Before-Def**: flag identifier reads reached by a bare declaration
//!
//! # Example
//!
//! ```
//! use usedef::analysis::analyze_program;
//! use usedef::ast::builder::*;
//! use usedef::config::AnalysisConfig;
//!
//! // var x; y = x;
//! let program = program_of(vec![decl("x"), assign("y", ident("x"))]);
//! let report = analyze_program(&program, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.errors.len(), 1);
//! ```

pub mod reaching_definitions;
pub mod use_before_def;

pub use reaching_definitions::{gen_kill, Def, DefSet, GenKill, ReachingDefinitions};
pub use use_before_def::{UseBeforeDef, UseBeforeDefError};

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug_span;

use crate::ast::StmtList;
use crate::cfg::ControlFlowGraph;
use crate::config::AnalysisConfig;
use crate::errors::Result;

/// Result of checking one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub errors: BTreeSet<UseBeforeDefError>,
    /// Number of CFG nodes
    pub node_count: usize,
    /// Fixed-point passes taken by reaching definitions
    pub iterations: usize,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Build the CFG, compute reaching definitions and run the checker.
pub fn analyze_program(program: &StmtList, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let _span = debug_span!("analyze_program", statements = program.len()).entered();

    let cfg = ControlFlowGraph::from_program(program);
    let reaching = ReachingDefinitions::with_limit(&cfg, config.max_iterations)?;
    let errors = UseBeforeDef::new(&cfg, &reaching).compute_use_before_def_errors()?;

    Ok(AnalysisReport {
        errors,
        node_count: cfg.len(),
        iterations: reaching.iterations(),
    })
}

/// Analyze independent programs on the rayon pool.
///
/// Each program gets its own CFG and dataflow facts; output order matches
/// input order.
pub fn analyze_programs<'p, N>(
    programs: &'p [(N, StmtList)],
    config: &AnalysisConfig,
) -> Vec<(&'p N, Result<AnalysisReport>)>
where
    N: Sync,
{
    programs
        .par_iter()
        .map(|(name, program)| (name, analyze_program(program, config)))
        .collect()
}
