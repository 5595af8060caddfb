//! The importable standard packages.
//!
//! Each known import path gets a member scope enclosed by the predefined
//! scope, and a package symbol naming it in the importing scope.

use crate::{
    errors::errors::ErrorImpl,
    symbols::{
        scope::{ScopeId, ScopeKind},
        symbol::{Symbol, SymbolKind},
    },
    types::types::{Builtins, ConstValue, TypeArena, TypeId},
    Position,
};

use super::context::Context;

enum Member {
    Function(Vec<TypeId>, Vec<TypeId>),
    Variable(TypeId),
    Constant(TypeId),
}

fn members(path: &str, types: &mut TypeArena) -> Option<Vec<(&'static str, Member)>> {
    let Builtins {
        boolean,
        string,
        int,
        float64,
        variadic_any,
        ..
    } = types.builtins;

    let members = match path {
        "fmt" => vec![
            ("Print", Member::Function(vec![variadic_any], vec![])),
            ("Println", Member::Function(vec![variadic_any], vec![])),
            ("Printf", Member::Function(vec![string, variadic_any], vec![])),
            ("Sprint", Member::Function(vec![variadic_any], vec![string])),
            ("Sprintf", Member::Function(vec![string, variadic_any], vec![string])),
        ],
        "strings" => vec![
            ("Contains", Member::Function(vec![string, string], vec![boolean])),
            ("HasPrefix", Member::Function(vec![string, string], vec![boolean])),
            ("Index", Member::Function(vec![string, string], vec![int])),
            ("Repeat", Member::Function(vec![string, int], vec![string])),
            ("ToLower", Member::Function(vec![string], vec![string])),
            ("ToUpper", Member::Function(vec![string], vec![string])),
        ],
        "math" => vec![
            ("Abs", Member::Function(vec![float64], vec![float64])),
            ("Sqrt", Member::Function(vec![float64], vec![float64])),
            ("Pow", Member::Function(vec![float64, float64], vec![float64])),
            ("Pi", Member::Constant(types.untyped_value(ConstValue::Float(std::f64::consts::PI)))),
            ("MaxInt32", Member::Constant(types.untyped_value(ConstValue::Int(i32::MAX as i64)))),
        ],
        "os" => {
            let args = types.slice(string);
            vec![
                ("Exit", Member::Function(vec![int], vec![])),
                ("Args", Member::Variable(args)),
            ]
        }
        _ => return None,
    };

    Some(members)
}

/// Defines a package symbol for `path` in `scope`. Unknown paths are
/// reported.
pub fn handle_import(ctx: &mut Context, path: &str, scope: ScopeId, position: &Position) {
    let Some(members) = members(path, &mut ctx.types) else {
        ctx.report(
            ErrorImpl::ImportNotFound {
                path: String::from(path),
            },
            position,
        );
        return;
    };

    let predefined = ctx.symbols.predefined();
    let member_scope = ctx.symbols.open_scope(
        &format!("package {}", path),
        ScopeKind::Imported {
            path: String::from(path),
        },
        predefined,
    );

    for (name, member) in members {
        let symbol = match member {
            Member::Function(params, results) => {
                let ty = ctx.types.function(params, results);
                Symbol::new(name, SymbolKind::Function, ty, 0)
            }
            Member::Variable(ty) => Symbol::new(name, SymbolKind::Variable, ty, 0),
            Member::Constant(ty) => Symbol::new(name, SymbolKind::Constant, ty, 0),
        };
        ctx.define(member_scope, symbol, position);
    }

    let name = path.rsplit('/').next().unwrap_or(path);
    let void = ctx.builtins().void;
    ctx.define(
        scope,
        Symbol::new(
            name,
            SymbolKind::Package {
                members: member_scope,
            },
            void,
            position.line,
        ),
        position,
    );
}
