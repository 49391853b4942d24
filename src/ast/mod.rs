//! AST model for the analyzed toy language.
//!
//! The tree is produced by an external parser and is never mutated by the
//! analyses. Every node has exactly one parent, so the position of a node in
//! the tree is its identity (see [`crate::cfg::ControlFlowGraph::node_id`]).
//!
//! All node types are serde-(de)serializable. Enums are internally tagged by
//! `"kind"`, which is the JSON shape the CLI accepts:
//!
//! ```json
//! { "stmts": [
//!     { "kind": "decl", "name": "x" },
//!     { "kind": "assign", "name": "y", "value": { "kind": "ident", "name": "x" } }
//! ] }
//! ```

pub mod builder;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sequence of statements. Root of every program and body of every
/// branch and loop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StmtList {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl StmtList {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// Nested statement list.
    Block(StmtList),
    Decl(DeclStmt),
    Assign(AssignStmt),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Expr(ExprStmt),
    Return(ReturnStmt),
}

/// `var name;` or `var name = init;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclStmt {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Expr>,
}

impl DeclStmt {
    /// A declaration without initializer leaves the variable unassigned.
    pub fn is_bare(&self) -> bool {
        self.init.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: StmtList,
    #[serde(default)]
    pub else_ifs: ElseIfList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<StmtList>,
}

/// Ordered `else if` clauses of an [`IfStmt`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElseIfList {
    #[serde(default)]
    pub clauses: Vec<ElseIf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseIf {
    pub cond: Expr,
    pub branch: StmtList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Box<Stmt>,
    pub cond: Expr,
    pub update: Box<Stmt>,
    pub body: StmtList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: StmtList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Int(IntLiteral),
    Bool(BooleanLiteral),
    Ident(IdentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    List(ListExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntLiteral {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
}

/// Read of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
}

/// List literal `[a, b, c]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListExpr {
    pub items: ExprList,
}

/// Ordered sequence of expressions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExprList {
    #[serde(default)]
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
