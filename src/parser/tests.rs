//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Package clause and imports
//! - Constant, type and variable declarations
//! - Function declarations
//! - Expressions and composite literals
//! - Control flow statements

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Decl, SourceFile, TopLevelDecl},
        expressions::{BinaryOp, ExprKind, UnaryOp},
        statements::{SimpleStmt, StmtKind},
        types::{ArrayLength, TypeExprKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<SourceFile, Error> {
    let tokens = tokenize(source.to_string(), Some("test.go".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.go".to_string()));
    result
}

/// Wraps `body` in a function so statements can be parsed.
fn parse_body(body: &str) -> Vec<StmtKind> {
    let file = parse_source(&format!("package main\nfunc main() {{\n{}\n}}\n", body)).unwrap();
    match file.decls.into_iter().next() {
        Some(TopLevelDecl::Function(function)) => function
            .body
            .unwrap()
            .stmts
            .into_iter()
            .map(|stmt| stmt.kind)
            .collect(),
        other => panic!("expected function, got {:?}", other),
    }
}

fn first_expr(body: &str) -> ExprKind {
    match parse_body(body).into_iter().next() {
        Some(StmtKind::Simple(SimpleStmt::Expr(expr))) => expr.kind,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_package_clause() {
    let file = parse_source("package main").unwrap();

    assert_eq!(file.package.name, "main");
    assert!(file.imports.is_empty());
    assert!(file.decls.is_empty());
}

#[test]
fn test_missing_package_clause() {
    let err = parse_source("func main() {}").unwrap_err();

    assert!(matches!(err.get_internal(), ErrorImpl::UnexpectedTokenDetailed { .. }));
}

#[test]
fn test_parse_imports() {
    let file = parse_source("package main\nimport \"fmt\"\nimport (\n\"strings\"\n\"math\"\n)\n").unwrap();

    let paths: Vec<&str> = file.imports.iter().map(|import| import.path.as_str()).collect();
    assert_eq!(paths, vec!["fmt", "strings", "math"]);
}

#[test]
fn test_import_after_declaration() {
    let result = parse_source("package main\nvar x int\nimport \"fmt\"\n");

    assert!(result.is_err());
}

#[test]
fn test_parse_const_declaration() {
    let file = parse_source("package main\nconst a, b int32 = 1, 2\n").unwrap();

    match &file.decls[0] {
        TopLevelDecl::Decl(Decl::Const(specs)) => {
            assert_eq!(specs.len(), 1);
            assert_eq!(specs[0].names.len(), 2);
            assert!(specs[0].ty.is_some());
            assert_eq!(specs[0].values.len(), 2);
        }
        other => panic!("expected const declaration, got {:?}", other),
    }
}

#[test]
fn test_const_requires_value() {
    let err = parse_source("package main\nconst a int\n").unwrap_err();

    assert_eq!(err.get_line(), 2);
}

#[test]
fn test_parse_grouped_var_declaration() {
    let file = parse_source("package main\nvar (\nx int\ny, z = 1, 2.5\n)\n").unwrap();

    match &file.decls[0] {
        TopLevelDecl::Decl(Decl::Var(specs)) => {
            assert_eq!(specs.len(), 2);
            assert!(specs[0].values.is_empty());
            assert!(specs[1].ty.is_none());
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_type_declarations() {
    let source = "package main\ntype (\nDays int32\nPoint struct {\nx, y float64\nname string\n}\nGrid [3][4]int\nList []*Point\n)\n";
    let file = parse_source(source).unwrap();

    let TopLevelDecl::Decl(Decl::Type(specs)) = &file.decls[0] else {
        panic!("expected type declaration");
    };
    assert_eq!(specs.len(), 4);

    match &specs[1].ty.kind {
        TypeExprKind::Struct(fields) => {
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].names.len(), 2);
        }
        other => panic!("expected struct type, got {:?}", other),
    }

    match &specs[2].ty.kind {
        TypeExprKind::Array { len, elem } => {
            assert!(matches!(len, ArrayLength::Expr(_)));
            assert!(matches!(elem.kind, TypeExprKind::Array { .. }));
        }
        other => panic!("expected array type, got {:?}", other),
    }

    match &specs[3].ty.kind {
        TypeExprKind::Slice(elem) => assert!(matches!(elem.kind, TypeExprKind::Pointer(_))),
        other => panic!("expected slice type, got {:?}", other),
    }
}

#[test]
fn test_parse_qualified_type() {
    let file = parse_source("package main\nvar b strings.Builder\n").unwrap();

    let TopLevelDecl::Decl(Decl::Var(specs)) = &file.decls[0] else {
        panic!("expected var declaration");
    };
    match &specs[0].ty.as_ref().unwrap().kind {
        TypeExprKind::Name { package, name } => {
            assert_eq!(package.as_ref().unwrap().name, "strings");
            assert_eq!(name.name, "Builder");
        }
        other => panic!("expected type name, got {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let file = parse_source("package main\nfunc add(a, b int, c float64) int {\nreturn a + b\n}\n").unwrap();

    let TopLevelDecl::Function(function) = &file.decls[0] else {
        panic!("expected function");
    };
    assert_eq!(function.name.name, "add");
    assert_eq!(function.signature.params.len(), 2);
    assert_eq!(function.signature.params[0].names.len(), 2);
    assert!(function.signature.result.is_some());
    assert_eq!(function.body.as_ref().unwrap().stmts.len(), 1);
}

#[test]
fn test_parse_function_without_body() {
    let file = parse_source("package main\nfunc external(x int)\n").unwrap();

    let TopLevelDecl::Function(function) = &file.decls[0] else {
        panic!("expected function");
    };
    assert!(function.body.is_none());
    assert!(function.signature.result.is_none());
}

#[test]
fn test_parse_binary_precedence() {
    match first_expr("1 + 2 * 3") {
        ExprKind::Binary { op, right, .. } => {
            assert_eq!(op, BinaryOp::Add);
            assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_logical_precedence() {
    match first_expr("a || b && c == d") {
        ExprKind::Binary { op, right, .. } => {
            assert_eq!(op, BinaryOp::LogOr);
            match right.kind {
                ExprKind::Binary { op, right, .. } => {
                    assert_eq!(op, BinaryOp::LogAnd);
                    assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Eq, .. }));
                }
                other => panic!("expected &&, got {:?}", other),
            }
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_unary_binds_tighter() {
    match first_expr("-x * *p") {
        ExprKind::Binary { op, left, right } => {
            assert_eq!(op, BinaryOp::Mul);
            assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
            assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Deref, .. }));
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_call_and_selector() {
    match first_expr("fmt.Println(a[1], s[1:2], s[:3:4])") {
        ExprKind::Call { callee, args } => {
            assert!(matches!(callee.kind, ExprKind::Selector { .. }));
            assert_eq!(args.len(), 3);
            assert!(matches!(args[0].kind, ExprKind::Index { .. }));
            assert!(matches!(args[1].kind, ExprKind::Slice { max: None, .. }));
            assert!(matches!(args[2].kind, ExprKind::Slice { low: None, max: Some(_), .. }));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_parse_composite_literals() {
    let stmts = parse_body("p := Point{1, 2}\ng := [2][2]int{{1, 2}, {3, 4}}\nb := []byte(\"hi\")\n");

    assert_eq!(stmts.len(), 3);
    for stmt in &stmts {
        assert!(matches!(stmt, StmtKind::Simple(SimpleStmt::ShortVarDecl { .. })));
    }

    let StmtKind::Simple(SimpleStmt::ShortVarDecl { values, .. }) = &stmts[1] else {
        unreachable!()
    };
    match &values[0].kind {
        ExprKind::Composite { elements, .. } => assert_eq!(elements.len(), 2),
        other => panic!("expected composite literal, got {:?}", other),
    }

    let StmtKind::Simple(SimpleStmt::ShortVarDecl { values, .. }) = &stmts[2] else {
        unreachable!()
    };
    assert!(matches!(values[0].kind, ExprKind::Conversion { .. }));
}

#[test]
fn test_parse_assignments() {
    let stmts = parse_body("a, b = b, a\nx += 2\ni++\nj--\n");

    assert!(matches!(&stmts[0], StmtKind::Simple(SimpleStmt::Assign { op: None, lhs, .. }) if lhs.len() == 2));
    assert!(matches!(&stmts[1], StmtKind::Simple(SimpleStmt::Assign { op: Some(BinaryOp::Add), .. })));
    assert!(matches!(&stmts[2], StmtKind::Simple(SimpleStmt::IncDec { increment: true, .. })));
    assert!(matches!(&stmts[3], StmtKind::Simple(SimpleStmt::IncDec { increment: false, .. })));
}

#[test]
fn test_short_var_decl_needs_names() {
    let result = parse_source("package main\nfunc main() {\na.b := 1\n}\n");

    assert!(result.is_err());
}

#[test]
fn test_parse_if_else_statement() {
    let stmts = parse_body("if x := f(); x > 0 {\ny = 1\n} else if x < 0 {\ny = 2\n} else {\ny = 3\n}");

    match &stmts[0] {
        StmtKind::If(stmt) => {
            assert!(stmt.init.is_some());
            assert!(stmt.otherwise.is_some());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_if_condition_is_not_composite() {
    let stmts = parse_body("if x {\ny = 1\n}");

    assert!(matches!(&stmts[0], StmtKind::If(stmt) if stmt.then.stmts.len() == 1));
}

#[test]
fn test_parse_for_loops() {
    let stmts = parse_body("for {\nbreak\n}\nfor i < 10 {\ni++\n}\nfor i := 0; i < 10; i++ {\ncontinue\n}\nfor ;; {\n}");

    assert_eq!(stmts.len(), 4);
    assert!(matches!(&stmts[0], StmtKind::For { init: None, cond: None, post: None, .. }));
    assert!(matches!(&stmts[1], StmtKind::For { init: None, cond: Some(_), post: None, .. }));
    assert!(matches!(&stmts[2], StmtKind::For { init: Some(_), cond: Some(_), post: Some(_), .. }));
    assert!(matches!(&stmts[3], StmtKind::For { init: None, cond: None, post: None, .. }));
}

#[test]
fn test_parse_labels_and_branches() {
    let stmts = parse_body("outer:\nfor {\nbreak outer\n}\ngoto outer\n");

    match &stmts[0] {
        StmtKind::Labeled { label, stmt } => {
            assert_eq!(label.name, "outer");
            assert!(matches!(stmt.kind, StmtKind::For { .. }));
        }
        other => panic!("expected labeled statement, got {:?}", other),
    }
    assert!(matches!(&stmts[1], StmtKind::Goto(label) if label.name == "outer"));
}

#[test]
fn test_goto_requires_label() {
    let result = parse_source("package main\nfunc main() {\ngoto\n}\n");

    assert!(result.is_err());
}

#[test]
fn test_parse_return_forms() {
    let stmts = parse_body("return\n");
    assert!(matches!(&stmts[0], StmtKind::Return(values) if values.is_empty()));

    let file = parse_source("package main\nfunc f() int { return 1 }\n").unwrap();
    let TopLevelDecl::Function(function) = &file.decls[0] else {
        panic!("expected function");
    };
    assert!(matches!(&function.body.as_ref().unwrap().stmts[0].kind, StmtKind::Return(values) if values.len() == 1));
}

#[test]
fn test_parse_nested_blocks_and_local_decls() {
    let stmts = parse_body("{\ntype Days int32\nvar d Days\n;;\n}\nconst k = 3\n");

    match &stmts[0] {
        StmtKind::Block(block) => assert_eq!(block.stmts.len(), 2),
        other => panic!("expected block, got {:?}", other),
    }
    assert!(matches!(&stmts[1], StmtKind::Decl(Decl::Const(_))));
}

#[test]
fn test_syntax_error_position() {
    let err = parse_source("package main\n\nfunc main() {\nx := (1 + 2\n}\n").unwrap_err();

    assert_eq!(err.get_line(), 4);
    assert_eq!(err.get_error_name(), "UnexpectedTokenDetailed");
}
