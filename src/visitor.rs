//! Exhaustive visitor dispatch over AST nodes.
//!
//! [`NodeRef`] is a borrowed handle to any node of the tree, with one variant
//! per node kind. [`AnalysisVisitor`] has one required handler per variant and
//! no default bodies: adding a node kind does not compile until every analysis
//! handles it. Handlers an analysis does not care about return a neutral
//! value such as an empty set.
//!
//! ```
//! use usedef::ast::builder::*;
//! use usedef::visitor::{NodeRef, NodeKind};
//!
//! let stmt = assign("y", ident("x"));
//! let node = NodeRef::from(&stmt);
//! assert_eq!(node.kind(), NodeKind::Assign);
//! assert_eq!(node.children().len(), 1);
//! ```

use crate::ast::*;
use serde::Serialize;
use std::fmt;

/// Borrowed reference to a single AST node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    StmtList(&'a StmtList),
    Decl(&'a DeclStmt),
    Assign(&'a AssignStmt),
    If(&'a IfStmt),
    ElseIfList(&'a ElseIfList),
    ElseIf(&'a ElseIf),
    For(&'a ForStmt),
    While(&'a WhileStmt),
    ExprStmt(&'a ExprStmt),
    Return(&'a ReturnStmt),
    Int(&'a IntLiteral),
    Bool(&'a BooleanLiteral),
    Ident(&'a IdentExpr),
    Binary(&'a BinaryExpr),
    Unary(&'a UnaryExpr),
    List(&'a ListExpr),
    ExprList(&'a ExprList),
}

/// Fieldless mirror of [`NodeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    StmtList,
    Decl,
    Assign,
    If,
    ElseIfList,
    ElseIf,
    For,
    While,
    ExprStmt,
    Return,
    Int,
    Bool,
    Ident,
    Binary,
    Unary,
    List,
    ExprList,
}

impl NodeKind {
    /// Container kinds group other nodes and are not units of control flow.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::ElseIfList | NodeKind::ExprList)
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::Int
                | NodeKind::Bool
                | NodeKind::Ident
                | NodeKind::Binary
                | NodeKind::Unary
                | NodeKind::List
                | NodeKind::ExprList
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::StmtList => "stmt-list",
            NodeKind::Decl => "declaration",
            NodeKind::Assign => "assignment",
            NodeKind::If => "if",
            NodeKind::ElseIfList => "else-if-list",
            NodeKind::ElseIf => "else-if",
            NodeKind::For => "for",
            NodeKind::While => "while",
            NodeKind::ExprStmt => "expression-statement",
            NodeKind::Return => "return",
            NodeKind::Int => "int",
            NodeKind::Bool => "bool",
            NodeKind::Ident => "identifier",
            NodeKind::Binary => "binary",
            NodeKind::Unary => "unary",
            NodeKind::List => "list",
            NodeKind::ExprList => "expr-list",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One handler per node kind. Implementations must cover every kind.
pub trait AnalysisVisitor<R> {
    fn visit_stmt_list(&mut self, node: &StmtList) -> R;
    fn visit_decl_stmt(&mut self, node: &DeclStmt) -> R;
    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> R;
    fn visit_if_stmt(&mut self, node: &IfStmt) -> R;
    fn visit_else_if_list(&mut self, node: &ElseIfList) -> R;
    fn visit_else_if(&mut self, node: &ElseIf) -> R;
    fn visit_for_stmt(&mut self, node: &ForStmt) -> R;
    fn visit_while_stmt(&mut self, node: &WhileStmt) -> R;
    fn visit_expr_stmt(&mut self, node: &ExprStmt) -> R;
    fn visit_return_stmt(&mut self, node: &ReturnStmt) -> R;
    fn visit_int_literal(&mut self, node: &IntLiteral) -> R;
    fn visit_boolean_literal(&mut self, node: &BooleanLiteral) -> R;
    fn visit_ident_expr(&mut self, node: &IdentExpr) -> R;
    fn visit_binary_expr(&mut self, node: &BinaryExpr) -> R;
    fn visit_unary_expr(&mut self, node: &UnaryExpr) -> R;
    fn visit_list_expr(&mut self, node: &ListExpr) -> R;
    fn visit_expr_list(&mut self, node: &ExprList) -> R;
}

impl<'a> NodeRef<'a> {
    /// Invoke the handler matching this node's kind.
    pub fn accept<R, V>(self, visitor: &mut V) -> R
    where
        V: AnalysisVisitor<R> + ?Sized,
    {
        match self {
            NodeRef::StmtList(n) => visitor.visit_stmt_list(n),
            NodeRef::Decl(n) => visitor.visit_decl_stmt(n),
            NodeRef::Assign(n) => visitor.visit_assign_stmt(n),
            NodeRef::If(n) => visitor.visit_if_stmt(n),
            NodeRef::ElseIfList(n) => visitor.visit_else_if_list(n),
            NodeRef::ElseIf(n) => visitor.visit_else_if(n),
            NodeRef::For(n) => visitor.visit_for_stmt(n),
            NodeRef::While(n) => visitor.visit_while_stmt(n),
            NodeRef::ExprStmt(n) => visitor.visit_expr_stmt(n),
            NodeRef::Return(n) => visitor.visit_return_stmt(n),
            NodeRef::Int(n) => visitor.visit_int_literal(n),
            NodeRef::Bool(n) => visitor.visit_boolean_literal(n),
            NodeRef::Ident(n) => visitor.visit_ident_expr(n),
            NodeRef::Binary(n) => visitor.visit_binary_expr(n),
            NodeRef::Unary(n) => visitor.visit_unary_expr(n),
            NodeRef::List(n) => visitor.visit_list_expr(n),
            NodeRef::ExprList(n) => visitor.visit_expr_list(n),
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::StmtList(_) => NodeKind::StmtList,
            NodeRef::Decl(_) => NodeKind::Decl,
            NodeRef::Assign(_) => NodeKind::Assign,
            NodeRef::If(_) => NodeKind::If,
            NodeRef::ElseIfList(_) => NodeKind::ElseIfList,
            NodeRef::ElseIf(_) => NodeKind::ElseIf,
            NodeRef::For(_) => NodeKind::For,
            NodeRef::While(_) => NodeKind::While,
            NodeRef::ExprStmt(_) => NodeKind::ExprStmt,
            NodeRef::Return(_) => NodeKind::Return,
            NodeRef::Int(_) => NodeKind::Int,
            NodeRef::Bool(_) => NodeKind::Bool,
            NodeRef::Ident(_) => NodeKind::Ident,
            NodeRef::Binary(_) => NodeKind::Binary,
            NodeRef::Unary(_) => NodeKind::Unary,
            NodeRef::List(_) => NodeKind::List,
            NodeRef::ExprList(_) => NodeKind::ExprList,
        }
    }

    /// Address of the referenced node.
    ///
    /// Only meaningful together with [`NodeRef::kind`]: a node and its first
    /// field may share an address, two nodes of the same kind never do.
    pub fn address(self) -> usize {
        fn addr<T>(node: &T) -> usize {
            node as *const T as usize
        }

        match self {
            NodeRef::StmtList(n) => addr(n),
            NodeRef::Decl(n) => addr(n),
            NodeRef::Assign(n) => addr(n),
            NodeRef::If(n) => addr(n),
            NodeRef::ElseIfList(n) => addr(n),
            NodeRef::ElseIf(n) => addr(n),
            NodeRef::For(n) => addr(n),
            NodeRef::While(n) => addr(n),
            NodeRef::ExprStmt(n) => addr(n),
            NodeRef::Return(n) => addr(n),
            NodeRef::Int(n) => addr(n),
            NodeRef::Bool(n) => addr(n),
            NodeRef::Ident(n) => addr(n),
            NodeRef::Binary(n) => addr(n),
            NodeRef::Unary(n) => addr(n),
            NodeRef::List(n) => addr(n),
            NodeRef::ExprList(n) => addr(n),
        }
    }

    /// Direct children in source order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::StmtList(list) => list.stmts.iter().map(NodeRef::from).collect(),
            NodeRef::Decl(decl) => decl.init.iter().map(NodeRef::from).collect(),
            NodeRef::Assign(assign) => vec![NodeRef::from(&assign.value)],
            NodeRef::If(if_stmt) => {
                let mut children = vec![
                    NodeRef::from(&if_stmt.cond),
                    NodeRef::StmtList(&if_stmt.then_branch),
                    NodeRef::ElseIfList(&if_stmt.else_ifs),
                ];
                children.extend(if_stmt.else_branch.iter().map(NodeRef::StmtList));
                children
            }
            NodeRef::ElseIfList(list) => list.clauses.iter().map(NodeRef::ElseIf).collect(),
            NodeRef::ElseIf(clause) => vec![
                NodeRef::from(&clause.cond),
                NodeRef::StmtList(&clause.branch),
            ],
            NodeRef::For(for_stmt) => vec![
                NodeRef::from(&*for_stmt.init),
                NodeRef::from(&for_stmt.cond),
                NodeRef::from(&*for_stmt.update),
                NodeRef::StmtList(&for_stmt.body),
            ],
            NodeRef::While(while_stmt) => vec![
                NodeRef::from(&while_stmt.cond),
                NodeRef::StmtList(&while_stmt.body),
            ],
            NodeRef::ExprStmt(stmt) => vec![NodeRef::from(&stmt.expr)],
            NodeRef::Return(stmt) => stmt.value.iter().map(NodeRef::from).collect(),
            NodeRef::Int(_) | NodeRef::Bool(_) | NodeRef::Ident(_) => Vec::new(),
            NodeRef::Binary(expr) => vec![
                NodeRef::from(&*expr.lhs),
                NodeRef::from(&*expr.rhs),
            ],
            NodeRef::Unary(expr) => vec![NodeRef::from(&*expr.operand)],
            NodeRef::List(expr) => vec![NodeRef::ExprList(&expr.items)],
            NodeRef::ExprList(list) => list.exprs.iter().map(NodeRef::from).collect(),
        }
    }

    /// Number of nodes in the subtree rooted here, this node included.
    pub fn subtree_size(self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(NodeRef::subtree_size)
            .sum::<usize>()
    }
}

impl<'a> From<&'a Stmt> for NodeRef<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Block(list) => NodeRef::StmtList(list),
            Stmt::Decl(decl) => NodeRef::Decl(decl),
            Stmt::Assign(assign) => NodeRef::Assign(assign),
            Stmt::If(if_stmt) => NodeRef::If(if_stmt),
            Stmt::For(for_stmt) => NodeRef::For(for_stmt),
            Stmt::While(while_stmt) => NodeRef::While(while_stmt),
            Stmt::Expr(expr_stmt) => NodeRef::ExprStmt(expr_stmt),
            Stmt::Return(ret) => NodeRef::Return(ret),
        }
    }
}

impl<'a> From<&'a Expr> for NodeRef<'a> {
    fn from(expr: &'a Expr) -> Self {
        match expr {
            Expr::Int(lit) => NodeRef::Int(lit),
            Expr::Bool(lit) => NodeRef::Bool(lit),
            Expr::Ident(ident) => NodeRef::Ident(ident),
            Expr::Binary(bin) => NodeRef::Binary(bin),
            Expr::Unary(un) => NodeRef::Unary(un),
            Expr::List(list) => NodeRef::List(list),
        }
    }
}

impl<'a> From<&'a StmtList> for NodeRef<'a> {
    fn from(list: &'a StmtList) -> Self {
        NodeRef::StmtList(list)
    }
}
