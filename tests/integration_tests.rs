//! Integration tests for the whole front end.
//!
//! These run source text through tokenization, parsing and both semantic
//! passes, through the library and through the `goo` binary.

use std::{io::Write, process::Command, rc::Rc};

use goo::{
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{
        context::{Context, Options},
        type_checker::{type_check, CompilationHalted, Stage},
    },
};
use tempfile::NamedTempFile;

const PROG1: &str = "package main

func main() {

  type Days int32
  type Kilograms int32

  var v1 Days
  var v2 Kilograms
  var x = v1;

  v1 = v2 // type mismatch error
  v1 = 3 // OK
  v2 = 3 // OK
}
";

const VALID: &str = "package main

import \"fmt\"

type Shape struct {
    name  string
    sides int
}

const limit = 1 << 4

var shapes = []Shape{{\"triangle\", 3}, {\"square\", 4}}

func total(list []Shape) int {
    sum := 0
    for i := 0; i < len(list); i++ {
        sum += list[i].sides
    }
    return sum
}

func main() {
    if n := total(shapes); n < limit {
        fmt.Println(\"sides:\", n)
    } else {
        fmt.Println(\"too many\")
    }
}
";

fn check(source: &str) -> (Context, Option<CompilationHalted>) {
    let tokens = tokenize(source.to_string(), Some("test.go".to_string())).unwrap();
    let (_, file) = parse(tokens, Rc::new("test.go".to_string()));
    type_check(&file.unwrap(), Options::default())
}

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn run_goo(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_goo"))
        .args(args)
        .output()
        .unwrap();

    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_valid_program_checks_cleanly() {
    let (ctx, halted) = check(VALID);
    let errors: Vec<String> = ctx.diagnostics.errors().iter().map(|error| error.to_string()).collect();
    assert!(halted.is_none(), "{:?}", errors);
}

#[test]
fn test_named_types_in_function_scope() {
    let (ctx, halted) = check(PROG1);

    assert_eq!(halted, Some(CompilationHalted { stage: Stage::Resolution, errors: 1 }));

    let errors: Vec<String> = ctx.diagnostics.errors().iter().map(|error| error.to_string()).collect();
    assert_eq!(errors, vec!["line 12: type Kilograms is incompatible with Days"]);
}

#[test]
fn test_binary_accepts_valid_file() {
    let file = source_file(VALID);
    let (success, _, stderr) = run_goo(&[file.path().to_str().unwrap()]);

    assert!(success, "{}", stderr);
}

#[test]
fn test_binary_reports_semantic_errors() {
    let file = source_file(PROG1);
    let (success, _, stderr) = run_goo(&[file.path().to_str().unwrap()]);

    assert!(!success);
    assert!(stderr.contains("line 12: type Kilograms is incompatible with Days"));
    assert!(stderr.contains("* Compilation halted -- there were 1 errors"));
}

#[test]
fn test_binary_renders_syntax_errors() {
    let file = source_file("package main\nvar a = #\n");
    let (success, _, stderr) = run_goo(&[file.path().to_str().unwrap()]);

    assert!(!success);
    assert!(stderr.contains("Error: UnrecognisedToken"));
    assert!(stderr.contains("2 | var a = #"));
    assert!(stderr.contains("* Compilation halted -- there were 1 errors"));
}

#[test]
fn test_binary_dumps_scopes() {
    let file = source_file("package main\nvar x int\n");
    let (success, stdout, _) = run_goo(&["--dsym", "--dtsy", file.path().to_str().unwrap()]);

    assert!(success);
    assert!(stdout.contains("SY: defined Variable x:int in package level names"));
    assert!(stdout.contains("--- package level names ---"));
}

#[test]
fn test_binary_missing_file() {
    let (success, _, stderr) = run_goo(&["/nonexistent/prog.go"]);

    assert!(!success);
    assert!(stderr.contains("cannot read source"));
}
