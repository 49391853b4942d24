//! Shared error types for the crate
//!
//! Use-before-def findings are *not* errors: they are returned as data by the
//! checker. The variants here are fatal conditions, either bad input (config,
//! JSON, I/O) or internal inconsistencies between a CFG and the dataflow facts
//! computed for it.

use std::path::PathBuf;
use thiserror::Error;

use crate::cfg::NodeId;
use crate::visitor::NodeKind;

/// Main error type for usedef operations
#[derive(Debug, Error)]
pub enum Error {
    /// The CFG has a node with no reaching-definitions entry. The CFG and the
    /// dataflow map were built from different programs.
    #[error("internal error: no reaching definitions recorded for CFG node {node}")]
    MissingReachingDefs { node: NodeId },

    /// A visited AST node has no id in the CFG.
    #[error("internal error: {kind} node is not part of the control flow graph")]
    UnknownNode { kind: NodeKind },

    /// The fixed-point iteration did not converge within the configured bound.
    #[error("internal error: reaching definitions did not converge after {iterations} passes")]
    NoFixedPoint { iterations: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input program could not be decoded
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Internal errors are bugs in the analysis pipeline, not in the input.
    /// Context wrappers keep the classification of the wrapped error.
    pub fn is_internal(&self) -> bool {
        match self {
            Error::MissingReachingDefs { .. }
            | Error::UnknownNode { .. }
            | Error::NoFixedPoint { .. } => true,
            Error::WithContext { source, .. } => source.is_internal(),
            _ => false,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
