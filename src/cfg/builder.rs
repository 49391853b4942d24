//! AST to CFG lowering.
//!
//! Lowering threads a *frontier* through the tree: the set of dangling
//! control transfers (source node plus edge label) that the next node to be
//! allocated must be connected to. A statement consumes the incoming frontier
//! and returns its own outgoing one; `return` returns an empty frontier.

use std::collections::HashMap;

use tracing::debug;

use super::{CfgNode, ControlFlowGraph, Edge, NodeId};
use crate::ast::{Expr, IfStmt, Stmt, StmtList};
use crate::visitor::{NodeKind, NodeRef};

impl<'a> ControlFlowGraph<'a> {
    /// Build the CFG of a whole program.
    pub fn from_program(program: &'a StmtList) -> Self {
        let mut builder = CfgBuilder::new();
        let frontier = builder.lower_stmt_list(program, Vec::new());
        builder.finalize(frontier)
    }
}

/// A control transfer waiting for its target.
#[derive(Debug, Clone, Copy)]
struct Pending {
    from: NodeId,
    edge: Edge,
}

type Frontier = Vec<Pending>;

fn fallthrough(from: NodeId) -> Frontier {
    vec![Pending {
        from,
        edge: Edge::Sequential,
    }]
}

fn branch(from: NodeId, taken: bool) -> Frontier {
    vec![Pending {
        from,
        edge: Edge::Branch { taken },
    }]
}

pub(crate) struct CfgBuilder<'a> {
    nodes: Vec<CfgNode<'a>>,
    edges: Vec<(NodeId, NodeId, Edge)>,
    index: HashMap<(NodeKind, usize), NodeId>,
    returns: Vec<NodeId>,
}

impl<'a> CfgBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            returns: Vec::new(),
        }
    }

    /// Id the next allocated node will receive.
    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    fn add_node(&mut self, node: NodeRef<'a>, preds: &[Pending]) -> NodeId {
        let id = self.next_id();
        self.nodes.push(CfgNode { id, node });
        self.index.insert((node.kind(), node.address()), id);
        for pending in preds {
            self.edges.push((pending.from, id, pending.edge));
        }
        id
    }

    fn connect(&mut self, frontier: &[Pending], target: NodeId, edge: Edge) {
        for pending in frontier {
            self.edges.push((pending.from, target, edge));
        }
    }

    fn lower_stmt_list(&mut self, list: &'a StmtList, preds: Frontier) -> Frontier {
        let id = self.add_node(NodeRef::StmtList(list), &preds);
        list.stmts
            .iter()
            .fold(fallthrough(id), |frontier, stmt| self.lower_stmt(stmt, frontier))
    }

    fn lower_stmt(&mut self, stmt: &'a Stmt, preds: Frontier) -> Frontier {
        match stmt {
            Stmt::Block(list) => self.lower_stmt_list(list, preds),
            Stmt::Decl(decl) => {
                let frontier = match &decl.init {
                    Some(init) => self.lower_expr(init, preds),
                    None => preds,
                };
                fallthrough(self.add_node(NodeRef::Decl(decl), &frontier))
            }
            Stmt::Assign(assign) => {
                let frontier = self.lower_expr(&assign.value, preds);
                fallthrough(self.add_node(NodeRef::Assign(assign), &frontier))
            }
            Stmt::Expr(expr_stmt) => {
                let frontier = self.lower_expr(&expr_stmt.expr, preds);
                fallthrough(self.add_node(NodeRef::ExprStmt(expr_stmt), &frontier))
            }
            Stmt::Return(ret) => {
                let frontier = match &ret.value {
                    Some(value) => self.lower_expr(value, preds),
                    None => preds,
                };
                let id = self.add_node(NodeRef::Return(ret), &frontier);
                self.returns.push(id);
                Vec::new()
            }
            Stmt::If(if_stmt) => self.lower_if(if_stmt, preds),
            Stmt::While(while_stmt) => {
                // The first node of the condition is the loop header.
                let header = self.next_id();
                let frontier = self.lower_expr(&while_stmt.cond, preds);
                let id = self.add_node(NodeRef::While(while_stmt), &frontier);
                let body_exit = self.lower_stmt_list(&while_stmt.body, branch(id, true));
                self.connect(&body_exit, header, Edge::LoopBack);
                branch(id, false)
            }
            Stmt::For(for_stmt) => {
                let frontier = self.lower_stmt(&for_stmt.init, preds);
                let header = self.next_id();
                let frontier = self.lower_expr(&for_stmt.cond, frontier);
                let id = self.add_node(NodeRef::For(for_stmt), &frontier);
                let body_exit = self.lower_stmt_list(&for_stmt.body, branch(id, true));
                let update_exit = self.lower_stmt(&for_stmt.update, body_exit);
                self.connect(&update_exit, header, Edge::LoopBack);
                branch(id, false)
            }
        }
    }

    fn lower_if(&mut self, if_stmt: &'a IfStmt, preds: Frontier) -> Frontier {
        let frontier = self.lower_expr(&if_stmt.cond, preds);
        let id = self.add_node(NodeRef::If(if_stmt), &frontier);

        let mut exits = self.lower_stmt_list(&if_stmt.then_branch, branch(id, true));
        let mut not_taken = branch(id, false);

        for clause in &if_stmt.else_ifs.clauses {
            let frontier = self.lower_expr(&clause.cond, not_taken);
            let clause_id = self.add_node(NodeRef::ElseIf(clause), &frontier);
            exits.extend(self.lower_stmt_list(&clause.branch, branch(clause_id, true)));
            not_taken = branch(clause_id, false);
        }

        match &if_stmt.else_branch {
            Some(else_branch) => exits.extend(self.lower_stmt_list(else_branch, not_taken)),
            None => exits.extend(not_taken),
        }
        exits
    }

    /// Lower an expression in evaluation order. Always allocates at least one
    /// node, and the first node allocated is the entry of the expression.
    fn lower_expr(&mut self, expr: &'a Expr, preds: Frontier) -> Frontier {
        let frontier = match expr {
            Expr::Int(_) | Expr::Bool(_) | Expr::Ident(_) => preds,
            Expr::Binary(bin) => {
                let frontier = self.lower_expr(&bin.lhs, preds);
                self.lower_expr(&bin.rhs, frontier)
            }
            Expr::Unary(un) => self.lower_expr(&un.operand, preds),
            Expr::List(list) => list
                .items
                .exprs
                .iter()
                .fold(preds, |frontier, item| self.lower_expr(item, frontier)),
        };
        fallthrough(self.add_node(NodeRef::from(expr), &frontier))
    }

    pub(crate) fn finalize(mut self, frontier: Frontier) -> ControlFlowGraph<'a> {
        self.edges.sort_by_key(|(from, to, _)| (*from, *to));
        self.edges.dedup_by_key(|(from, to, _)| (*from, *to));

        let mut predecessors = vec![Vec::new(); self.nodes.len()];
        let mut successors = vec![Vec::new(); self.nodes.len()];
        for (from, to, _) in &self.edges {
            successors[from.0].push(*to);
            predecessors[to.0].push(*from);
        }

        let mut exits = self.returns;
        exits.extend(frontier.iter().map(|pending| pending.from));
        exits.sort();
        exits.dedup();

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            exits = exits.len(),
            "built control flow graph"
        );

        ControlFlowGraph {
            nodes: self.nodes,
            edges: self.edges,
            predecessors,
            successors,
            index: self.index,
            exits,
        }
    }
}
