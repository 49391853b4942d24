//! Property-based tests for reaching definitions and the checker
//!
//! These tests verify invariants that should hold for all programs:
//! - The fixed point is reached and is stable
//! - Analysis is deterministic across independently built CFGs
//! - Every definition in a fact set comes from a definition site of that name
//! - On straight-line code the findings match a direct simulation

use proptest::prelude::*;
use std::collections::HashMap;
use usedef::analysis::{ReachingDefinitions, UseBeforeDef};
use usedef::ast::builder::*;
use usedef::ast::{BinOp, Expr, Stmt, StmtList, UnOp};
use usedef::cfg::ControlFlowGraph;
use usedef::visitor::NodeRef;

/// Small variable pool so definitions and reads collide often
fn var_name() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c")].prop_map(String::from)
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (0i64..10).prop_map(int),
        any::<bool>().prop_map(boolean),
        var_name().prop_map(|name| ident(&name)),
    ];
    leaf.prop_recursive(3, 12, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| binary(BinOp::Add, l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| binary(BinOp::And, l, r)),
            inner.clone().prop_map(|e| unary(UnOp::Not, e)),
            prop::collection::vec(inner, 0..3).prop_map(list),
        ]
    })
}

fn simple_stmt() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        var_name().prop_map(|name| decl(&name)),
        (var_name(), expr_strategy()).prop_map(|(name, e)| decl_init(&name, e)),
        (var_name(), expr_strategy()).prop_map(|(name, e)| assign(&name, e)),
        expr_strategy().prop_map(expr_stmt),
    ]
}

fn stmt_strategy() -> impl Strategy<Value = Stmt> {
    simple_stmt().prop_recursive(3, 24, 4, |inner| {
        let body = || prop::collection::vec(inner.clone(), 0..4);
        prop_oneof![
            (expr_strategy(), body()).prop_map(|(c, b)| if_then(c, b)),
            (expr_strategy(), body(), body()).prop_map(|(c, t, e)| if_else(c, t, e)),
            (expr_strategy(), body(), expr_strategy(), body())
                .prop_map(|(c, t, c2, b)| if_full(c, t, vec![else_if(c2, b)], None)),
            (expr_strategy(), body()).prop_map(|(c, b)| while_loop(c, b)),
            (var_name(), expr_strategy(), body()).prop_map(|(name, c, b)| {
                for_loop(decl_init(&name, int(0)), c, assign(&name, int(1)), b)
            }),
            body().prop_map(block),
            prop::option::of(expr_strategy()).prop_map(ret),
        ]
    })
}

fn program_strategy() -> impl Strategy<Value = StmtList> {
    prop::collection::vec(stmt_strategy(), 0..8).prop_map(program_of)
}

fn straight_line_strategy() -> impl Strategy<Value = StmtList> {
    prop::collection::vec(simple_stmt(), 0..12).prop_map(program_of)
}

/// Identifier reads of `expr`, in evaluation order
fn reads(expr: &Expr, out: &mut Vec<String>) {
    match expr {
        Expr::Int(_) | Expr::Bool(_) => {}
        Expr::Ident(id) => out.push(id.name.clone()),
        Expr::Binary(bin) => {
            reads(&bin.lhs, out);
            reads(&bin.rhs, out);
        }
        Expr::Unary(un) => reads(&un.operand, out),
        Expr::List(l) => l.items.exprs.iter().for_each(|e| reads(e, out)),
    }
}

/// Count reads whose latest definition is a bare declaration.
fn simulate(program: &StmtList) -> usize {
    let mut bare: HashMap<String, bool> = HashMap::new();
    let mut count = 0;
    let mut flag = |expr: &Expr, bare: &HashMap<String, bool>| {
        let mut names = Vec::new();
        reads(expr, &mut names);
        count += names
            .iter()
            .filter(|name| bare.get(*name).copied().unwrap_or(false))
            .count();
    };

    for stmt in &program.stmts {
        match stmt {
            Stmt::Decl(d) => {
                if let Some(init) = &d.init {
                    flag(init, &bare);
                }
                bare.insert(d.name.clone(), d.init.is_none());
            }
            Stmt::Assign(a) => {
                flag(&a.value, &bare);
                bare.insert(a.name.clone(), false);
            }
            Stmt::Expr(e) => flag(&e.expr, &bare),
            other => panic!("not straight-line: {:?}", other),
        }
    }
    count
}

proptest! {
    /// Property: the iteration terminates at a stable fixed point
    #[test]
    fn prop_reaches_fixed_point(program in program_strategy()) {
        let cfg = ControlFlowGraph::from_program(&program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();

        prop_assert_eq!(reaching.len(), cfg.len());
        prop_assert!(reaching.is_fixed_point(&cfg));
    }

    /// Property: two CFGs of the same program yield identical findings
    #[test]
    fn prop_analysis_is_deterministic(program in program_strategy()) {
        let copy = program.clone();

        let cfg1 = ControlFlowGraph::from_program(&program);
        let rd1 = ReachingDefinitions::analyze(&cfg1).unwrap();
        let errors1 = UseBeforeDef::new(&cfg1, &rd1).compute_use_before_def_errors().unwrap();

        let cfg2 = ControlFlowGraph::from_program(&copy);
        let rd2 = ReachingDefinitions::analyze(&cfg2).unwrap();
        let errors2 = UseBeforeDef::new(&cfg2, &rd2).compute_use_before_def_errors().unwrap();

        prop_assert_eq!(errors1, errors2);
    }

    /// Property: every reaching definition names its own definition site
    #[test]
    fn prop_defs_come_from_definition_sites(program in program_strategy()) {
        let cfg = ControlFlowGraph::from_program(&program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();

        for node in cfg.nodes() {
            for def in reaching.reach_in(node.id).unwrap() {
                let site = cfg.node(def.site).unwrap();
                match site.node {
                    NodeRef::Decl(d) => {
                        prop_assert_eq!(&d.name, &def.name);
                        prop_assert_eq!(d.is_bare(), def.is_declaration);
                    }
                    NodeRef::Assign(a) => {
                        prop_assert_eq!(&a.name, &def.name);
                        prop_assert!(!def.is_declaration);
                    }
                    other => prop_assert!(false, "definition at {:?}", other.kind()),
                }
            }
        }
    }

    /// Property: findings name the variable read at the flagged node
    #[test]
    fn prop_findings_match_reads(program in program_strategy()) {
        let cfg = ControlFlowGraph::from_program(&program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();
        let errors = UseBeforeDef::new(&cfg, &reaching).compute_use_before_def_errors().unwrap();

        for err in &errors {
            match cfg.node(err.node).unwrap().node {
                NodeRef::Ident(id) => prop_assert_eq!(&id.name, &err.var_name),
                other => prop_assert!(false, "finding at {:?}", other.kind()),
            }
            match cfg.node(err.declared_at).unwrap().node {
                NodeRef::Decl(d) => prop_assert!(d.is_bare()),
                other => prop_assert!(false, "declared at {:?}", other.kind()),
            }
        }
    }

    /// Property: straight-line code agrees with a direct simulation
    #[test]
    fn prop_straight_line_matches_simulation(program in straight_line_strategy()) {
        let cfg = ControlFlowGraph::from_program(&program);
        let reaching = ReachingDefinitions::analyze(&cfg).unwrap();
        let errors = UseBeforeDef::new(&cfg, &reaching).compute_use_before_def_errors().unwrap();

        prop_assert_eq!(errors.len(), simulate(&program));
    }
}
