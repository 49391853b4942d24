//! Use-before-def checker.
//!
//! Flags every identifier read at which some reaching definition of the same
//! name is a bare declaration, i.e. there is a path from `var x;` to the read
//! with no assignment to `x` on it. A read with no reaching definition at all
//! is an undeclared name and is left to scope checking.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::reaching_definitions::ReachingDefinitions;
use crate::ast::*;
use crate::cfg::{ControlFlowGraph, NodeId};
use crate::errors::{Error, Result};
use crate::visitor::{AnalysisVisitor, NodeKind, NodeRef};

/// A read of `var_name` at `node` reached by the bare declaration at
/// `declared_at`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UseBeforeDefError {
    pub node: NodeId,
    pub var_name: String,
    pub declared_at: NodeId,
}

impl fmt::Display for UseBeforeDefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {}: use of `{}` before definition (declared at node {})",
            self.node, self.var_name, self.declared_at
        )
    }
}

type Findings = Result<BTreeSet<UseBeforeDefError>>;

/// Checker over a CFG and the reaching definitions computed for it.
pub struct UseBeforeDef<'c, 'a> {
    cfg: &'c ControlFlowGraph<'a>,
    reaching: &'c ReachingDefinitions,
}

impl<'c, 'a> UseBeforeDef<'c, 'a> {
    pub fn new(cfg: &'c ControlFlowGraph<'a>, reaching: &'c ReachingDefinitions) -> Self {
        Self { cfg, reaching }
    }

    /// Collect every use-before-def finding of the program.
    ///
    /// Fails with [`Error::MissingReachingDefs`] if `reaching` has no entry
    /// for one of the CFG's nodes.
    pub fn compute_use_before_def_errors(&self) -> Findings {
        let mut visitor = UseBeforeDefVisitor {
            cfg: self.cfg,
            reaching: self.reaching,
        };

        let mut errors = BTreeSet::new();
        for node in self.cfg.nodes() {
            if self.reaching.reach_in(node.id).is_none() {
                return Err(Error::MissingReachingDefs { node: node.id });
            }
            errors.extend(node.accept(&mut visitor)?);
        }

        debug!(findings = errors.len(), "use-before-def check finished");
        Ok(errors)
    }
}

struct UseBeforeDefVisitor<'c, 'a> {
    cfg: &'c ControlFlowGraph<'a>,
    reaching: &'c ReachingDefinitions,
}

fn nothing() -> Findings {
    Ok(BTreeSet::new())
}

impl AnalysisVisitor<Findings> for UseBeforeDefVisitor<'_, '_> {
    fn visit_stmt_list(&mut self, _: &StmtList) -> Findings {
        nothing()
    }

    fn visit_decl_stmt(&mut self, _: &DeclStmt) -> Findings {
        nothing()
    }

    fn visit_assign_stmt(&mut self, _: &AssignStmt) -> Findings {
        nothing()
    }

    fn visit_if_stmt(&mut self, _: &IfStmt) -> Findings {
        nothing()
    }

    fn visit_else_if_list(&mut self, _: &ElseIfList) -> Findings {
        nothing()
    }

    fn visit_else_if(&mut self, _: &ElseIf) -> Findings {
        nothing()
    }

    fn visit_for_stmt(&mut self, _: &ForStmt) -> Findings {
        nothing()
    }

    fn visit_while_stmt(&mut self, _: &WhileStmt) -> Findings {
        nothing()
    }

    fn visit_expr_stmt(&mut self, _: &ExprStmt) -> Findings {
        nothing()
    }

    fn visit_return_stmt(&mut self, _: &ReturnStmt) -> Findings {
        nothing()
    }

    fn visit_int_literal(&mut self, _: &IntLiteral) -> Findings {
        nothing()
    }

    fn visit_boolean_literal(&mut self, _: &BooleanLiteral) -> Findings {
        nothing()
    }

    fn visit_ident_expr(&mut self, ident: &IdentExpr) -> Findings {
        let node = self
            .cfg
            .node_id(NodeRef::Ident(ident))
            .ok_or(Error::UnknownNode {
                kind: NodeKind::Ident,
            })?;

        // Definitions of this name that are only declarations
        let uninitialized = self
            .reaching
            .defs_for(node, &ident.name)
            .ok_or(Error::MissingReachingDefs { node })?
            .filter(|def| def.is_declaration);

        Ok(uninitialized
            .map(|def| UseBeforeDefError {
                node,
                var_name: def.name.clone(),
                declared_at: def.site,
            })
            .collect())
    }

    fn visit_binary_expr(&mut self, _: &BinaryExpr) -> Findings {
        nothing()
    }

    fn visit_unary_expr(&mut self, _: &UnaryExpr) -> Findings {
        nothing()
    }

    fn visit_list_expr(&mut self, _: &ListExpr) -> Findings {
        nothing()
    }

    fn visit_expr_list(&mut self, _: &ExprList) -> Findings {
        nothing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use pretty_assertions::assert_eq;

    fn check(program: &StmtList) -> BTreeSet<UseBeforeDefError> {
        let cfg = ControlFlowGraph::from_program(program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();
        UseBeforeDef::new(&cfg, &reaching)
            .compute_use_before_def_errors()
            .unwrap()
    }

    #[test]
    fn test_canonical_use_before_def() {
        // var x; y = x;
        let program = program_of(vec![decl("x"), assign("y", ident("x"))]);
        let errors = check(&program);

        // 0 stmt-list, 1 decl, 2 ident, 3 assign
        assert_eq!(
            errors,
            BTreeSet::from([UseBeforeDefError {
                node: NodeId(2),
                var_name: "x".to_string(),
                declared_at: NodeId(1),
            }])
        );
    }

    #[test]
    fn test_read_in_own_assignment_sees_old_value() {
        // var x; x = x + 1;
        let program = program_of(vec![
            decl("x"),
            assign("x", binary(BinOp::Add, ident("x"), int(1))),
        ]);
        let errors = check(&program);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().var_name, "x");
    }

    #[test]
    fn test_initialized_declaration_is_safe() {
        let program = program_of(vec![decl_init("x", int(0)), assign("y", ident("x"))]);
        assert!(check(&program).is_empty());
    }

    #[test]
    fn test_distinct_declaration_sites_are_distinct_errors() {
        // var x; if (c) { var x; } y = x;
        let program = program_of(vec![
            decl("x"),
            if_then(ident("c"), vec![decl("x")]),
            assign("y", ident("x")),
        ]);
        let errors = check(&program);

        assert_eq!(errors.len(), 2);
        let read_nodes: BTreeSet<NodeId> = errors.iter().map(|e| e.node).collect();
        assert_eq!(read_nodes.len(), 1);
        let sites: BTreeSet<NodeId> = errors.iter().map(|e| e.declared_at).collect();
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn test_undeclared_name_is_not_reported() {
        let program = program_of(vec![assign("y", ident("never_declared"))]);
        assert!(check(&program).is_empty());
    }

    #[test]
    fn test_other_names_do_not_interfere() {
        // var x; var z; z = 1; y = z;
        let program = program_of(vec![
            decl("x"),
            decl("z"),
            assign("z", int(1)),
            assign("y", ident("z")),
        ]);
        assert!(check(&program).is_empty());
    }

    #[test]
    fn test_only_declarations_of_the_read_name_are_reported() {
        // var x; var z; y = x;
        // 0 stmt-list, 1 decl x, 2 decl z, 3 ident x, 4 assign
        let program = program_of(vec![decl("x"), decl("z"), assign("y", ident("x"))]);
        let errors = check(&program);

        assert_eq!(
            errors,
            BTreeSet::from([UseBeforeDefError {
                node: NodeId(3),
                var_name: "x".to_string(),
                declared_at: NodeId(1),
            }])
        );
    }

    #[test]
    fn test_checker_is_idempotent() {
        let program = program_of(vec![
            decl("x"),
            while_loop(ident("c"), vec![assign("y", ident("x")), assign("x", int(1))]),
        ]);
        let cfg = ControlFlowGraph::from_program(&program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();
        let checker = UseBeforeDef::new(&cfg, &reaching);

        let first = checker.compute_use_before_def_errors().unwrap();
        let second = checker.compute_use_before_def_errors().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_mismatched_reaching_definitions_fail_loudly() {
        let small = program_of(vec![decl("x")]);
        let small_cfg = ControlFlowGraph::from_program(&small);
        let stale = ReachingDefinitions::analyze(&small_cfg).unwrap();

        let program = program_of(vec![decl("x"), assign("y", ident("x"))]);
        let cfg = ControlFlowGraph::from_program(&program);

        let err = UseBeforeDef::new(&cfg, &stale)
            .compute_use_before_def_errors()
            .unwrap_err();
        assert!(matches!(err, Error::MissingReachingDefs { node: NodeId(2) }));
    }

    #[test]
    fn test_display() {
        let err = UseBeforeDefError {
            node: NodeId(4),
            var_name: "x".into(),
            declared_at: NodeId(1),
        };
        assert_eq!(
            err.to_string(),
            "node 4: use of `x` before definition (declared at node 1)"
        );
    }
}
