//! Reaching definitions (forward, may, union merge).
//!
//! # Algorithm
//!
//! ```text
//! Initialize: IN[n] = OUT[n] = ∅ for all nodes n
//! Repeat until no OUT changes in a full pass:
//!   For each node n in id order:
//!     IN[n]  = ⋃ OUT[p] for all predecessors p
//!     OUT[n] = GEN[n] ∪ (IN[n] - KILL[n])
//! ```
//!
//! Only declarations and assignments generate or kill. A declaration without
//! initializer generates a `Def` with `is_declaration = true`; an initialized
//! declaration or an assignment generates one with `is_declaration = false`.
//! Both kill every other `Def` of the same name.
//!
//! The lattice is the powerset of the program's (finite) definitions and the
//! transfer functions are monotone, so the sweep terminates and its result
//! does not depend on visiting order.

use std::collections::HashMap;

use im::OrdSet;
use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::ast::*;
use crate::cfg::{CfgNode, ControlFlowGraph, NodeId};
use crate::errors::{Error, Result};
use crate::visitor::AnalysisVisitor;

/// A point where a variable becomes bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Def {
    pub name: String,
    /// CFG node of the declaration or assignment.
    pub site: NodeId,
    /// `true` for a declaration without initializer.
    pub is_declaration: bool,
}

impl Def {
    pub fn declaration(name: impl Into<String>, site: NodeId) -> Self {
        Self {
            name: name.into(),
            site,
            is_declaration: true,
        }
    }

    pub fn assignment(name: impl Into<String>, site: NodeId) -> Self {
        Self {
            name: name.into(),
            site,
            is_declaration: false,
        }
    }
}

pub type DefSet = OrdSet<Def>;

/// Transfer inputs of a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenKill {
    pub gen: Option<Def>,
    /// Name whose other definitions are killed.
    pub kill: Option<String>,
}

impl GenKill {
    pub fn identity() -> Self {
        Self::default()
    }

    fn defines(def: Def) -> Self {
        Self {
            kill: Some(def.name.clone()),
            gen: Some(def),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.gen.is_none() && self.kill.is_none()
    }

    /// `OUT = GEN ∪ (IN - KILL)`
    pub fn apply(&self, input: &DefSet) -> DefSet {
        let mut out = match &self.kill {
            Some(name) => input.iter().filter(|d| &d.name != name).cloned().collect(),
            None => input.clone(),
        };
        if let Some(def) = &self.gen {
            out.insert(def.clone());
        }
        out
    }
}

/// GEN/KILL of a CFG node.
pub fn gen_kill(node: &CfgNode<'_>) -> GenKill {
    node.accept(&mut TransferVisitor { site: node.id })
}

struct TransferVisitor {
    site: NodeId,
}

impl AnalysisVisitor<GenKill> for TransferVisitor {
    fn visit_stmt_list(&mut self, _: &StmtList) -> GenKill {
        GenKill::identity()
    }

    fn visit_decl_stmt(&mut self, decl: &DeclStmt) -> GenKill {
        if decl.is_bare() {
            GenKill::defines(Def::declaration(&decl.name, self.site))
        } else {
            GenKill::defines(Def::assignment(&decl.name, self.site))
        }
    }

    fn visit_assign_stmt(&mut self, assign: &AssignStmt) -> GenKill {
        GenKill::defines(Def::assignment(&assign.name, self.site))
    }

    fn visit_if_stmt(&mut self, _: &IfStmt) -> GenKill {
        GenKill::identity()
    }

    fn visit_else_if_list(&mut self, _: &ElseIfList) -> GenKill {
        GenKill::identity()
    }

    fn visit_else_if(&mut self, _: &ElseIf) -> GenKill {
        GenKill::identity()
    }

    fn visit_for_stmt(&mut self, _: &ForStmt) -> GenKill {
        GenKill::identity()
    }

    fn visit_while_stmt(&mut self, _: &WhileStmt) -> GenKill {
        GenKill::identity()
    }

    fn visit_expr_stmt(&mut self, _: &ExprStmt) -> GenKill {
        GenKill::identity()
    }

    fn visit_return_stmt(&mut self, _: &ReturnStmt) -> GenKill {
        GenKill::identity()
    }

    fn visit_int_literal(&mut self, _: &IntLiteral) -> GenKill {
        GenKill::identity()
    }

    fn visit_boolean_literal(&mut self, _: &BooleanLiteral) -> GenKill {
        GenKill::identity()
    }

    fn visit_ident_expr(&mut self, _: &IdentExpr) -> GenKill {
        GenKill::identity()
    }

    fn visit_binary_expr(&mut self, _: &BinaryExpr) -> GenKill {
        GenKill::identity()
    }

    fn visit_unary_expr(&mut self, _: &UnaryExpr) -> GenKill {
        GenKill::identity()
    }

    fn visit_list_expr(&mut self, _: &ListExpr) -> GenKill {
        GenKill::identity()
    }

    fn visit_expr_list(&mut self, _: &ExprList) -> GenKill {
        GenKill::identity()
    }
}

/// Reaching definitions for every node of a CFG.
///
/// Built once, read-only afterwards. Holds no borrow of the CFG, so the
/// caller is responsible for pairing it with the graph it was computed from.
#[derive(Debug, Clone, Default)]
pub struct ReachingDefinitions {
    /// Definitions reaching the entry of each node
    reach_in: HashMap<NodeId, DefSet>,
    /// Definitions reaching the exit of each node
    reach_out: HashMap<NodeId, DefSet>,
    iterations: usize,
}

impl ReachingDefinitions {
    /// Upper bound on full passes before giving up.
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

    pub fn analyze(cfg: &ControlFlowGraph<'_>) -> Result<Self> {
        Self::with_limit(cfg, Self::DEFAULT_MAX_ITERATIONS)
    }

    /// Run the fixed point, failing with [`Error::NoFixedPoint`] if more than
    /// `max_iterations` passes are needed.
    pub fn with_limit(cfg: &ControlFlowGraph<'_>, max_iterations: usize) -> Result<Self> {
        let _span = debug_span!("reaching_definitions", nodes = cfg.len()).entered();

        let transfer: Vec<GenKill> = cfg.nodes().iter().map(gen_kill).collect();

        let mut reach_in: HashMap<NodeId, DefSet> = HashMap::with_capacity(cfg.len());
        let mut reach_out: HashMap<NodeId, DefSet> = HashMap::with_capacity(cfg.len());
        for node in cfg.nodes() {
            reach_in.insert(node.id, DefSet::new());
            reach_out.insert(node.id, DefSet::new());
        }

        let mut iterations = 0;
        loop {
            if iterations >= max_iterations {
                return Err(Error::NoFixedPoint { iterations });
            }
            iterations += 1;

            let mut changed = false;
            for node in cfg.nodes() {
                let new_in = merge(cfg, &reach_out, node.id);
                let new_out = transfer[node.id.index()].apply(&new_in);

                if reach_out.get(&node.id) != Some(&new_out) {
                    changed = true;
                    reach_out.insert(node.id, new_out);
                }
                reach_in.insert(node.id, new_in);
            }

            trace!(iteration = iterations, changed, "reaching definitions pass");
            if !changed {
                break;
            }
        }

        debug!(iterations, "reaching definitions converged");

        Ok(Self {
            reach_in,
            reach_out,
            iterations,
        })
    }

    /// Definitions that may reach the entry of `id`.
    pub fn reach_in(&self, id: NodeId) -> Option<&DefSet> {
        self.reach_in.get(&id)
    }

    /// Definitions that may reach the exit of `id`.
    pub fn reach_out(&self, id: NodeId) -> Option<&DefSet> {
        self.reach_out.get(&id)
    }

    /// Reaching definitions of `name` at the entry of `id`.
    pub fn defs_for<'s>(
        &'s self,
        id: NodeId,
        name: &'s str,
    ) -> Option<impl Iterator<Item = &'s Def> + 's> {
        self.reach_in
            .get(&id)
            .map(move |defs| defs.iter().filter(move |d| d.name == name))
    }

    /// Full passes performed, including the final pass that saw no change.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of nodes with recorded facts.
    pub fn len(&self) -> usize {
        self.reach_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reach_in.is_empty()
    }

    /// Whether one more merge/transfer step over `cfg` changes nothing.
    pub fn is_fixed_point(&self, cfg: &ControlFlowGraph<'_>) -> bool {
        cfg.nodes().iter().all(|node| {
            let new_in = merge(cfg, &self.reach_out, node.id);
            let new_out = gen_kill(node).apply(&new_in);
            self.reach_in.get(&node.id) == Some(&new_in)
                && self.reach_out.get(&node.id) == Some(&new_out)
        })
    }
}

fn merge(cfg: &ControlFlowGraph<'_>, reach_out: &HashMap<NodeId, DefSet>, id: NodeId) -> DefSet {
    cfg.predecessors(id)
        .iter()
        .filter_map(|pred| reach_out.get(pred))
        .fold(DefSet::new(), |acc, out| acc.union(out.clone()))
}
