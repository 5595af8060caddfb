//! Unit tests for both semantic passes.

use std::rc::Rc;

use crate::{
    ast::ast::{Decl, SourceFile, TopLevelDecl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::symbol::{Symbol, SymbolKind},
    types::types::{ConstValue, TypeId},
    Position,
};

use super::{
    context::{Context, Options},
    engine::{identical_types, is_assignable},
    type_checker::{type_check, CompilationHalted, Stage},
};

fn parse_source(source: &str) -> SourceFile {
    let tokens = tokenize(source.to_string(), Some("test.go".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.go".to_string()));
    result.unwrap()
}

fn check_with(source: &str, options: Options) -> (SourceFile, Context, Option<CompilationHalted>) {
    let file = parse_source(source);
    let (ctx, halted) = type_check(&file, options);
    (file, ctx, halted)
}

fn check(source: &str) -> (SourceFile, Context, Option<CompilationHalted>) {
    check_with(source, Options::default())
}

fn error_names(ctx: &Context) -> Vec<&str> {
    ctx.diagnostics
        .errors()
        .iter()
        .map(|error| error.get_error_name())
        .collect()
}

fn messages(ctx: &Context) -> Vec<String> {
    ctx.diagnostics
        .errors()
        .iter()
        .map(|error| error.get_internal().to_string())
        .collect()
}

/// Type of the package-level symbol `name`.
fn package_symbol_type(file: &SourceFile, ctx: &Context, name: &str) -> TypeId {
    let package = ctx.scope_of(file.id).unwrap();
    let id = ctx.symbols.resolve(package, name).unwrap();
    ctx.symbols.symbol(id).ty
}

#[test]
fn test_identity_is_reflexive() {
    let mut ctx = Context::new(Options::default());
    let b = ctx.builtins();

    let table = ctx.symbols.new_field_table(ctx.symbols.predefined());
    ctx.define_field(
        table,
        Symbol::new("x", SymbolKind::Field, b.int32, 1),
        &Position::null(),
    );

    let candidates = vec![
        b.int32,
        b.string,
        ctx.types.array(b.int32, 3),
        ctx.types.slice(b.float64),
        ctx.types.pointer(b.uint8),
        ctx.types.struct_type(table),
        ctx.types.function(vec![b.int, b.string], vec![b.boolean]),
        ctx.types.type_list(vec![b.int, b.int]),
    ];

    for ty in candidates {
        assert!(identical_types(&ctx, ty, ty), "{} is not identical to itself", ctx.display(ty));
    }
}

#[test]
fn test_naming_makes_structs_distinct() {
    let mut ctx = Context::new(Options::default());
    let int32 = ctx.builtins().int32;
    let scope = ctx.symbols.predefined();

    let mut anonymous = vec![];
    for _ in 0..2 {
        let table = ctx.symbols.new_field_table(scope);
        ctx.define_field(table, Symbol::new("x", SymbolKind::Field, int32, 1), &Position::null());
        anonymous.push(ctx.types.struct_type(table));
    }

    assert!(identical_types(&ctx, anonymous[0], anonymous[1]));

    let a = ctx.types.make_named_copy(anonymous[0], "A");
    let b = ctx.types.make_named_copy(anonymous[1], "B");
    assert!(!identical_types(&ctx, a, b));
    assert!(!is_assignable(&ctx, a, b));
}

#[test]
fn test_untyped_constant_assignability() {
    let mut ctx = Context::new(Options::default());
    let b = ctx.builtins();
    let seven = ctx.types.untyped_number("7").unwrap();
    let half = ctx.types.untyped_number("2.5").unwrap();

    let numeric = [
        b.int, b.int8, b.int16, b.int32, b.int64, b.uint, b.uint8, b.uint16, b.uint32, b.uint64, b.float32,
        b.float64,
    ];
    for ty in numeric {
        assert!(is_assignable(&ctx, ty, seven), "7 should fit {}", ctx.display(ty));
    }

    for ty in [b.int, b.int32, b.uint8] {
        assert!(!is_assignable(&ctx, ty, half), "2.5 should not fit {}", ctx.display(ty));
    }
    assert!(is_assignable(&ctx, b.float64, half));
    assert!(!is_assignable(&ctx, b.string, seven));
}

#[test]
fn test_forward_reference_resolves_to_same_type() {
    let (file, ctx, halted) = check(
        "package main
var early T
type T struct {
    next *T
    value int32
}
var late T
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));

    let early = package_symbol_type(&file, &ctx, "early");
    let late = package_symbol_type(&file, &ctx, "late");
    assert_eq!(early, late);
    assert!(ctx.is_complete(early));
    assert_eq!(ctx.display(early), "T");
}

#[test]
fn test_nested_scope_shadows() {
    let (_, ctx, halted) = check(
        "package main
func main() {
    x := 1
    {
        x := \"inner\"
        var y string = x
    }
    var z int = x
}
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));
}

#[test]
fn test_duplicate_in_same_scope() {
    let (_, ctx, halted) = check(
        "package main
func main() {
    var x int
    var x string
}
",
    );

    assert_eq!(halted.unwrap().stage, Stage::Resolution);
    assert_eq!(error_names(&ctx), vec!["DuplicateDeclaration"]);
}

#[test]
fn test_constant_folding() {
    let (file, ctx, halted) = check("package main\nconst c = 3 + 4\n");
    assert!(halted.is_none());

    let Some(TopLevelDecl::Decl(Decl::Const(specs))) = file.decls.first() else {
        panic!("expected a const declaration");
    };
    let folded = ctx.type_of(specs[0].values[0].id).unwrap();

    assert_eq!(ctx.types.untyped(folded).unwrap().value, ConstValue::Int(7));
    assert_eq!(package_symbol_type(&file, &ctx, "c"), folded);
}

#[test]
fn test_constant_folding_errors() {
    let (_, ctx, _) = check(
        "package main
const a = 1 / 0
const b = 9223372036854775807 + 1
const c = 1 << 70
const d = 2.5 * 2
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["DivisionByZero", "ConstantOverflow", "ConstantOverflow"]
    );
}

#[test]
fn test_call_arity() {
    let (_, ctx, _) = check(
        "package main
func add(a, b int) int {
    return a + b
}
func main() {
    add(1, 2, 3)
    add(1)
}
",
    );

    assert_eq!(error_names(&ctx), vec!["UnexpectedArguments", "MissingArguments"]);
}

#[test]
fn test_struct_field_selection() {
    let (file, ctx, _) = check(
        "package main
var p struct { x int32 }
var a = p.x
var b = p.y
",
    );

    assert_eq!(package_symbol_type(&file, &ctx, "a"), ctx.builtins().int32);
    assert_eq!(messages(&ctx), vec!["field y not found"]);
}

#[test]
fn test_selector_through_pointer() {
    let (_, ctx, halted) = check(
        "package main
type Point struct { x, y int32 }
func norm(p *Point) int32 {
    return p.x*p.x + p.y*p.y
}
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));
}

#[test]
fn test_declaration_errors_stop_the_pipeline() {
    let (_, ctx, halted) = check(
        "package main
var x int
var x int
func main() {
    y = 1
}
",
    );

    let halted = halted.unwrap();
    assert_eq!(halted.stage, Stage::Declarations);
    assert_eq!(halted.errors, 1);
    assert_eq!(error_names(&ctx), vec!["DuplicateDeclaration"]);
    assert_eq!(halted.to_string(), "* Compilation halted -- there were 1 errors");
}

#[test]
fn test_named_numeric_types() {
    let (_, ctx, _) = check(
        "package main
type Days int32
type Kilograms int32
func main() {
    var d Days = 3
    var k Kilograms = 3
    d = k
    d = Days(k)
}
",
    );

    assert_eq!(
        messages(&ctx),
        vec!["type Kilograms is incompatible with Days"]
    );
}

#[test]
fn test_recursive_types() {
    let (_, ctx, _) = check(
        "package main
type List struct {
    next *List
    items []List
}
type Bad [2]Bad
type A B
type B A
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["InvalidRecursiveType", "InvalidRecursiveType"]
    );
}

#[test]
fn test_mutual_recursion_through_pointer() {
    let orders = [
        "package main
type A struct { b *B }
type B struct { a A }
var x B
",
        "package main
type B struct { a A }
type A struct { b *B }
var x B
",
    ];

    for source in orders {
        let (file, ctx, halted) = check(source);
        assert!(halted.is_none(), "{}: {:?}", source, messages(&ctx));

        let x = package_symbol_type(&file, &ctx, "x");
        assert_eq!(ctx.display(x), "B");
        assert!(ctx.is_complete(x));
    }
}

#[test]
fn test_mutual_recursion_without_pointer() {
    let orders = [
        "package main
type A struct { b B }
type B struct { a A }
",
        "package main
type A struct { b *B }
type B struct { c C }
type C struct { b B }
",
    ];

    for source in orders {
        let (_, ctx, _) = check(source);
        assert_eq!(error_names(&ctx), vec!["InvalidRecursiveType"], "{}", source);
    }
}

#[test]
fn test_call_to_later_function_with_composite_params() {
    let (_, ctx, halted) = check(
        "package main
type Point struct { x, y int }
func f() {
    var a [3]int
    var p Point
    g(a, &p, []Point{p})
    var n int = h(a)
}
func g(values [3]int, at *Point, all []Point) {}
func h(values [3]int) int { return len(values) }
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));
}

#[test]
fn test_constant_declared_after_use() {
    let (file, ctx, halted) = check(
        "package main
type P struct { x [N]int }
var early = M + 1
const N = 3
const M = N * 2
var p P
var a [3]int = p.x
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));

    let a = package_symbol_type(&file, &ctx, "a");
    assert_eq!(ctx.display(a), "[3]int");
    let early = package_symbol_type(&file, &ctx, "early");
    assert_eq!(ctx.display(early), "int");
}

#[test]
fn test_constant_cycle() {
    let (_, ctx, _) = check(
        "package main
const a = b + 1
const b = a * 2
var size [c]int
const c = c
",
    );

    assert_eq!(
        messages(&ctx),
        vec!["initialization cycle for a", "initialization cycle for c"]
    );
}

#[test]
fn test_local_type_declarations() {
    let (_, ctx, halted) = check(
        "package main
func main() {
    type Pair struct { a, b int }
    var p Pair
    p.a = 1
    var q = Pair{1, 2}
    p = q
}
",
    );

    assert!(halted.is_none(), "{:?}", messages(&ctx));
}

#[test]
fn test_labels_and_branches() {
    let (_, ctx, _) = check(
        "package main
func main() {
outer:
    for {
        for i := 0; i < 3; i++ {
            continue outer
        }
        break outer
    }
    goto missing
    break
}
",
    );

    assert_eq!(messages(&ctx), vec!["label missing not defined", "break is not in a loop"]);
}

#[test]
fn test_return_checks() {
    let (_, ctx, _) = check(
        "package main
func f() int {
    return
}
func g() {
    return 1
}
func h() int {
    return \"s\"
}
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["NotEnoughResults", "TooManyResults", "TypeMatchError"]
    );
}

#[test]
fn test_imported_packages() {
    let (_, ctx, _) = check(
        "package main
import \"fmt\"
import \"math\"
func main() {
    fmt.Println(\"hi\", 1)
    var r float64 = math.Sqrt(2)
    var pi float64 = math.Pi
    fmt.Nope()
}
",
    );

    assert_eq!(messages(&ctx), vec!["fmt.Nope not found"]);
}

#[test]
fn test_unknown_import() {
    let (_, ctx, halted) = check("package main\nimport \"net/http\"\n");

    assert_eq!(halted.unwrap().stage, Stage::Declarations);
    assert_eq!(messages(&ctx), vec!["package \"net/http\" not found"]);
}

#[test]
fn test_undeclared_identifier_reported_once() {
    let (_, ctx, _) = check(
        "package main
func main() {
    x = 1
    x = 2
}
",
    );

    assert_eq!(messages(&ctx), vec!["undeclared identifier: x"]);
}

#[test]
fn test_composite_literals() {
    let (file, ctx, _) = check(
        "package main
var a = [...]int{1, 2, 3}
var b [2]int = [2]int{1, 2, 3}
var grid = [2][2]int{{1, 2}, {3, 4}}
",
    );

    assert_eq!(ctx.display(package_symbol_type(&file, &ctx, "a")), "[3]int");
    assert_eq!(ctx.display(package_symbol_type(&file, &ctx, "grid")), "[2][2]int");
    assert_eq!(error_names(&ctx), vec!["TooManyElements"]);
}

#[test]
fn test_array_sizes() {
    let (_, ctx, _) = check(
        "package main
const n = 4
var ok [n * 2]int
var fraction [1.5]int
var negative [-1]int
var s = \"x\"
var dynamic [len(s)]int
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["ArraySizeNotInteger", "InvalidArraySize", "ArraySizeNotConstant"]
    );
}

#[test]
fn test_operators() {
    let (_, ctx, _) = check(
        "package main
func main() {
    var i int32 = 1
    var f float64 = 2
    var s string = \"a\" + \"b\"
    var ok bool = i < 3 && s != \"\"
    var u uint = 2
    i = i << u
    i = i % 2
    f = f % 2
    ok = s + 1
    i = i << i
    p := &i
    i = *p
    i = *i
}
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["InvalidOperation", "MismatchedTypes", "InvalidShiftCount", "InvalidIndirect"]
    );
}

#[test]
fn test_untyped_operand_takes_typed_operand_type() {
    let (_, ctx, _) = check(
        "package main
func main() {
    var x int32
    var y int32 = x + 2.5
    var z int32 = x * 2.0
    var big bool = x < 2.5
    var ok bool = x == 3
    var f float64
    f = f + 2.5
    var u uint8 = 2
    u = u - 1.5
}
",
    );

    assert_eq!(
        messages(&ctx),
        vec![
            "type (2.5) is incompatible with int32",
            "type (2.5) is incompatible with int32",
            "type (1.5) is incompatible with uint8",
        ]
    );
}

#[test]
fn test_indexing_and_slicing() {
    let (_, ctx, _) = check(
        "package main
func main() {
    var a [4]int
    var s []int = a[1:3]
    var x int = s[0]
    var b uint8 = \"text\"[1]
    var t string = \"text\"[1:]
    var n int
    n[0] = 1
}
",
    );

    assert_eq!(error_names(&ctx), vec!["NotIndexable"]);
}

#[test]
fn test_conversions() {
    let (_, ctx, _) = check(
        "package main
func main() {
    var f float64 = 1.5
    var i int = int(f)
    var bytes []byte = []byte(\"hi\")
    var s string = string(bytes)
    var bad = bool(i)
    var two = int(1, 2)
}
",
    );

    assert_eq!(error_names(&ctx), vec!["TypeMatchError", "ConversionArity"]);
}

#[test]
fn test_not_a_function_and_not_a_type() {
    let (_, ctx, _) = check(
        "package main
var x int
var y x
func main() {
    x()
}
",
    );

    assert_eq!(error_names(&ctx), vec!["NotAType"]);

    let (_, ctx, _) = check(
        "package main
var x int
func main() {
    x()
}
",
    );
    assert_eq!(error_names(&ctx), vec!["NotAFunction"]);
}

#[test]
fn test_address_of_requires_addressable_operand() {
    let (_, ctx, _) = check(
        "package main
func f() int {
    return 1
}
func main() {
    x := 1
    p := &x
    q := &f()
}
",
    );

    assert_eq!(error_names(&ctx), vec!["NotAddressable"]);
}

#[test]
fn test_assignment_counts() {
    let (_, ctx, _) = check(
        "package main
func main() {
    a, b := 1, 2
    a, b = b, a
    a, b = 1
    _, c := 3, 4
    var d, e int = 1
}
",
    );

    assert_eq!(
        error_names(&ctx),
        vec!["AssignmentCountMismatch", "InitializerCountMismatch"]
    );
}

#[test]
fn test_trace_and_dump_listing() {
    let options = Options {
        trace_symbols: true,
        dump_scopes: true,
        ..Options::default()
    };
    let (_, ctx, _) = check_with("package main\nvar x int\n", options);

    assert!(ctx
        .listing
        .contains(&"SY: defined Variable x:int in package level names".to_string()));
    assert!(ctx.listing.contains(&"--- package level names ---".to_string()));
    assert!(ctx.listing.iter().any(|line| line.starts_with("Variable x:int")));
}
