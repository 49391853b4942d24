//! Control flow graph over statement and expression nodes.
//!
//! Every statement (including every statement list and `else if` clause) and
//! every expression of the program becomes exactly one [`CfgNode`]. Expression
//! nodes are chained in evaluation order, operands before operators, and a
//! statement's expressions precede the statement node itself. This puts each
//! identifier read strictly before the definition made by its enclosing
//! statement, so `x = x + 1` reads the old `x`.
//!
//! # Node identity
//!
//! [`NodeId`]s are dense arena indices handed out during construction. The
//! graph borrows the AST for its whole lifetime, so a node's address cannot
//! change while ids are in use; [`ControlFlowGraph::node_id`] maps an AST node
//! back to its id through `(kind, address)`. Two syntactically identical nodes
//! at different positions therefore get different ids.
//!
//! # Example
//!
//! ```
//! use usedef::ast::builder::*;
//! use usedef::cfg::ControlFlowGraph;
//! use usedef::visitor::NodeRef;
//!
//! let program = program_of(vec![decl("x"), assign("y", ident("x"))]);
//! let cfg = ControlFlowGraph::from_program(&program);
//!
//! // stmt-list, decl, ident, assign
//! assert_eq!(cfg.len(), 4);
//! let decl_id = cfg.node_id(NodeRef::from(&program.stmts[0])).unwrap();
//! assert_eq!(cfg.successors(decl_id).len(), 1);
//! ```

mod builder;
mod dot;

use crate::visitor::{AnalysisVisitor, NodeKind, NodeRef};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label of a control flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Sequential,
    /// Out of an `if`, `else if`, `while` or `for` node.
    Branch { taken: bool },
    /// From the end of a loop body back to the loop condition.
    LoopBack,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Sequential => Ok(()),
            Edge::Branch { taken: true } => f.write_str("true"),
            Edge::Branch { taken: false } => f.write_str("false"),
            Edge::LoopBack => f.write_str("loop"),
        }
    }
}

/// A CFG node wrapping exactly one statement or expression.
#[derive(Debug, Clone, Copy)]
pub struct CfgNode<'a> {
    pub id: NodeId,
    pub node: NodeRef<'a>,
}

impl<'a> CfgNode<'a> {
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn accept<R, V>(&self, visitor: &mut V) -> R
    where
        V: AnalysisVisitor<R> + ?Sized,
    {
        self.node.accept(visitor)
    }

    /// Short human readable label, e.g. `3: assignment y`.
    pub fn label(&self) -> String {
        let detail = match self.node {
            NodeRef::Decl(decl) => Some(decl.name.clone()),
            NodeRef::Assign(assign) => Some(assign.name.clone()),
            NodeRef::Ident(ident) => Some(ident.name.clone()),
            NodeRef::Int(lit) => Some(lit.value.to_string()),
            NodeRef::Bool(lit) => Some(lit.value.to_string()),
            NodeRef::Binary(bin) => Some(bin.op.to_string()),
            NodeRef::Unary(un) => Some(un.op.to_string()),
            _ => None,
        };

        match detail {
            Some(detail) => format!("{}: {} {}", self.id, self.kind(), detail),
            None => format!("{}: {}", self.id, self.kind()),
        }
    }
}

/// Immutable control flow graph borrowing the AST it was built from.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph<'a> {
    nodes: Vec<CfgNode<'a>>,
    edges: Vec<(NodeId, NodeId, Edge)>,
    predecessors: Vec<Vec<NodeId>>,
    successors: Vec<Vec<NodeId>>,
    index: HashMap<(NodeKind, usize), NodeId>,
    exits: Vec<NodeId>,
}

impl<'a> ControlFlowGraph<'a> {
    /// All nodes, ordered by id.
    pub fn nodes(&self) -> &[CfgNode<'a>] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&CfgNode<'a>> {
        self.nodes.get(id.0)
    }

    /// Id of an AST node of the program this graph was built from.
    ///
    /// Returns `None` for container nodes (`ElseIfList`, `ExprList`) and for
    /// nodes belonging to another tree.
    pub fn node_id(&self, node: NodeRef<'_>) -> Option<NodeId> {
        self.index.get(&(node.kind(), node.address())).copied()
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors
            .get(id.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> &[(NodeId, NodeId, Edge)] {
        &self.edges
    }

    /// Label of the edge `from -> to`, if there is one.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Edge> {
        self.edges
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, edge)| *edge)
    }

    /// The root statement list.
    pub fn entry(&self) -> NodeId {
        NodeId(0)
    }

    /// Nodes where execution may leave the program: `return` statements and
    /// the fallthrough end of the root list.
    pub fn exits(&self) -> &[NodeId] {
        &self.exits
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes of the given kind, in id order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &CfgNode<'a>> + '_ {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }
}
