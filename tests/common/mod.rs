//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use usedef::analysis::{ReachingDefinitions, UseBeforeDef, UseBeforeDefError};
use usedef::ast::StmtList;
use usedef::cfg::ControlFlowGraph;

/// Run the full pipeline on `program`.
pub fn check(program: &StmtList) -> BTreeSet<UseBeforeDefError> {
    let cfg = ControlFlowGraph::from_program(program);
    let reaching = ReachingDefinitions::analyze(&cfg).unwrap();
    UseBeforeDef::new(&cfg, &reaching)
        .compute_use_before_def_errors()
        .unwrap()
}

/// Names of the variables flagged, one entry per finding.
pub fn flagged_names(errors: &BTreeSet<UseBeforeDefError>) -> Vec<&str> {
    errors.iter().map(|e| e.var_name.as_str()).collect()
}

/// Serialize `program` as JSON into `dir/name`.
pub fn write_program(dir: &Path, name: &str, program: &StmtList) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(program).unwrap()).unwrap();
    path
}
