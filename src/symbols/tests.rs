//! Unit tests for scopes and symbols.

use crate::errors::errors::ErrorImpl;
use crate::symbols::scope::ScopeKind;
use crate::symbols::symbol::{Symbol, SymbolKind, SymbolTable};
use crate::types::types::TypeArena;

#[test]
fn test_define_and_resolve() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());

    let x = symbols
        .define(package, Symbol::new("x", SymbolKind::Variable, types.builtins.int32, 3))
        .unwrap();

    assert_eq!(symbols.resolve(package, "x"), Some(x));
    assert_eq!(symbols.symbol(x).scope, Some(package));
    assert_eq!(symbols.resolve(package, "y"), None);
}

#[test]
fn test_duplicate_definition_is_rejected() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());

    symbols
        .define(package, Symbol::new("x", SymbolKind::Variable, types.builtins.int32, 1))
        .unwrap();
    let result = symbols.define(package, Symbol::new("x", SymbolKind::Constant, types.builtins.string, 2));

    assert_eq!(
        result.unwrap_err(),
        ErrorImpl::DuplicateDeclaration {
            name: "x".to_string()
        }
    );
    // the first definition is untouched
    let x = symbols.resolve(package, "x").unwrap();
    assert_eq!(symbols.symbol(x).kind, SymbolKind::Variable);
    assert_eq!(symbols.scope(package).symbols().len(), 1);
}

#[test]
fn test_shadowing_in_nested_scope() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());
    let block = symbols.open_scope("block", ScopeKind::Block, package);

    let outer = symbols
        .define(package, Symbol::new("x", SymbolKind::Variable, types.builtins.int32, 1))
        .unwrap();
    let inner = symbols
        .define(block, Symbol::new("x", SymbolKind::Variable, types.builtins.string, 2))
        .unwrap();

    assert_eq!(symbols.resolve(block, "x"), Some(inner));
    assert_eq!(symbols.resolve(package, "x"), Some(outer));
    assert_eq!(symbols.resolve_in_current(block, "x"), Some(inner));
}

#[test]
fn test_resolve_in_current_does_not_walk_outward() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());
    let block = symbols.open_scope("block", ScopeKind::Block, package);

    symbols
        .define(package, Symbol::new("x", SymbolKind::Variable, types.builtins.int32, 1))
        .unwrap();

    assert!(symbols.resolve_in_current(block, "x").is_none());
    assert!(symbols.resolve(block, "x").is_some());
    assert_eq!(symbols.enclosing(block), Some(package));
    assert_eq!(symbols.enclosing(symbols.predefined()), None);
}

#[test]
fn test_enclosing_function() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());

    let function = symbols
        .define(package, Symbol::new("f", SymbolKind::Function, types.builtins.void, 1))
        .unwrap();
    let params = symbols.open_scope("f", ScopeKind::Function { symbol: function }, package);
    let body = symbols.open_scope("block", ScopeKind::Block, params);
    let nested = symbols.open_scope("block", ScopeKind::Block, body);

    assert_eq!(symbols.enclosing_function(nested), Some(function));
    assert_eq!(symbols.enclosing_function(package), None);
}

#[test]
fn test_field_tables() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());
    let table = symbols.new_field_table(package);

    let x = symbols
        .define_field(table, Symbol::new("x", SymbolKind::Field, types.builtins.int32, 1))
        .unwrap();
    let y = symbols
        .define_field(table, Symbol::new("y", SymbolKind::Field, types.builtins.int32, 1))
        .unwrap();
    let duplicate = symbols.define_field(table, Symbol::new("x", SymbolKind::Field, types.builtins.int32, 1));

    assert!(duplicate.is_err());
    assert_eq!(symbols.field(table, "y"), Some(y));
    assert_eq!(symbols.fields(table), &[x, y]);
    assert_eq!(symbols.symbol(x).scope, Some(package));
    // fields never leak into the scope
    assert!(symbols.resolve(package, "x").is_none());
}

#[test]
fn test_dump_lists_symbols_in_order() {
    let types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let package = symbols.open_scope("main", ScopeKind::Package, symbols.predefined());

    symbols
        .define(package, Symbol::new("b", SymbolKind::Variable, types.builtins.int32, 4))
        .unwrap();
    symbols
        .define(package, Symbol::new("a", SymbolKind::Constant, types.builtins.string, 5))
        .unwrap();

    assert_eq!(
        symbols.dump(package, &types),
        "Variable b:int32 (line 4)\nConstant a:string (line 5)\n"
    );
}
