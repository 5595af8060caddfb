use crate::{
    symbols::symbol::{Symbol, SymbolKind},
    Position,
};

use super::context::Context;

/// Seeds the predefined scope: basic types, `true`/`false`/`nil` and the
/// builtin functions.
pub fn add_predefined_names(ctx: &mut Context) {
    let scope = ctx.symbols.predefined();
    let builtins = ctx.builtins();
    let position = Position::null();

    let types = [
        ("bool", builtins.boolean),
        ("string", builtins.string),
        ("int", builtins.int),
        ("int8", builtins.int8),
        ("int16", builtins.int16),
        ("int32", builtins.int32),
        ("int64", builtins.int64),
        ("uint", builtins.uint),
        ("uint8", builtins.uint8),
        ("uint16", builtins.uint16),
        ("uint32", builtins.uint32),
        ("uint64", builtins.uint64),
        ("float32", builtins.float32),
        ("float64", builtins.float64),
        // aliases share the slot
        ("byte", builtins.uint8),
        ("rune", builtins.int32),
    ];
    for (name, ty) in types {
        ctx.define(scope, Symbol::new(name, SymbolKind::TypeName, ty, 0), &position);
    }

    ctx.define(scope, Symbol::new("true", SymbolKind::Constant, builtins.boolean, 0), &position);
    ctx.define(scope, Symbol::new("false", SymbolKind::Constant, builtins.boolean, 0), &position);
    ctx.define(scope, Symbol::new("nil", SymbolKind::Constant, builtins.nil, 0), &position);

    let length = ctx.types.function(vec![builtins.aps], vec![builtins.int]);
    let print = ctx.types.function(vec![builtins.variadic_any], vec![]);

    for (name, ty) in [("len", length), ("cap", length), ("print", print), ("println", print)] {
        ctx.define(scope, Symbol::new(name, SymbolKind::Function, ty, 0), &position);
    }
}
