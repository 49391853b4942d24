//! Constructor helpers for assembling ASTs in code.
//!
//! ```
//! use usedef::ast::builder::*;
//!
//! // var x; if (c) { x = 1; } y = x;
//! let program = program_of(vec![
//!     decl("x"),
//!     if_then(ident("c"), vec![assign("x", int(1))]),
//!     assign("y", ident("x")),
//! ]);
//! assert_eq!(program.len(), 3);
//! ```

use super::*;

pub fn program_of(stmts: Vec<Stmt>) -> StmtList {
    StmtList::new(stmts)
}

pub fn block(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(StmtList::new(stmts))
}

/// `var name;`
pub fn decl(name: &str) -> Stmt {
    Stmt::Decl(DeclStmt {
        name: name.to_string(),
        init: None,
    })
}

/// `var name = init;`
pub fn decl_init(name: &str, init: Expr) -> Stmt {
    Stmt::Decl(DeclStmt {
        name: name.to_string(),
        init: Some(init),
    })
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign(AssignStmt {
        name: name.to_string(),
        value,
    })
}

pub fn if_then(cond: Expr, then_branch: Vec<Stmt>) -> Stmt {
    if_full(cond, then_branch, Vec::new(), None)
}

pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    if_full(cond, then_branch, Vec::new(), Some(else_branch))
}

pub fn if_full(
    cond: Expr,
    then_branch: Vec<Stmt>,
    else_ifs: Vec<ElseIf>,
    else_branch: Option<Vec<Stmt>>,
) -> Stmt {
    Stmt::If(IfStmt {
        cond,
        then_branch: StmtList::new(then_branch),
        else_ifs: ElseIfList { clauses: else_ifs },
        else_branch: else_branch.map(StmtList::new),
    })
}

pub fn else_if(cond: Expr, branch: Vec<Stmt>) -> ElseIf {
    ElseIf {
        cond,
        branch: StmtList::new(branch),
    }
}

pub fn for_loop(init: Stmt, cond: Expr, update: Stmt, body: Vec<Stmt>) -> Stmt {
    Stmt::For(ForStmt {
        init: Box::new(init),
        cond,
        update: Box::new(update),
        body: StmtList::new(body),
    })
}

pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While(WhileStmt {
        cond,
        body: StmtList::new(body),
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt { expr })
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt { value })
}

pub fn int(value: i64) -> Expr {
    Expr::Int(IntLiteral { value })
}

pub fn boolean(value: bool) -> Expr {
    Expr::Bool(BooleanLiteral { value })
}

pub fn ident(name: &str) -> Expr {
    Expr::Ident(IdentExpr {
        name: name.to_string(),
    })
}

pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

pub fn unary(op: UnOp, operand: Expr) -> Expr {
    Expr::Unary(UnaryExpr {
        op,
        operand: Box::new(operand),
    })
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(ListExpr {
        items: ExprList { exprs: items },
    })
}
