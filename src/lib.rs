// Export modules for library usage
pub mod analysis;
pub mod ast;
pub mod cfg;
pub mod cli;
pub mod config;
pub mod errors;
pub mod visitor;

// Re-export commonly used types
pub use crate::analysis::{
    analyze_program, analyze_programs, AnalysisReport, Def, DefSet, ReachingDefinitions,
    UseBeforeDef, UseBeforeDefError,
};
pub use crate::ast::StmtList;
pub use crate::cfg::{CfgNode, ControlFlowGraph, Edge, NodeId};
pub use crate::errors::{Error, Result};
pub use crate::visitor::{AnalysisVisitor, NodeKind, NodeRef};
