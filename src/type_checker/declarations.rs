//! First pass: declares every package-level name and builds skeleton types.
//!
//! Types that refer forward are left as pending slots or carry the unknown
//! sentinel; the second pass completes them in place.

use tracing::debug;

use crate::{
    ast::{
        ast::{Decl, FunctionDecl, SourceFile, TopLevelDecl, TypeSpec},
        types::{TypeExpr, TypeExprKind},
    },
    errors::errors::ErrorImpl,
    symbols::{
        scope::{ScopeId, ScopeKind},
        symbol::{Symbol, SymbolKind},
    },
    types::types::TypeId,
};

use super::{context::Context, packages::handle_import};

pub fn build_declarations(ctx: &mut Context, file: &SourceFile) {
    debug!(file = %file.span.start.file, "building declarations");

    let predefined = ctx.symbols.predefined();
    let package = ctx
        .symbols
        .open_scope("package level names", ScopeKind::Package, predefined);
    ctx.save_scope(file.id, package);

    for import in &file.imports {
        handle_import(ctx, &import.path, package, &import.span.start);
    }

    // forward references between top-level types land on these slots
    for decl in &file.decls {
        if let TopLevelDecl::Decl(Decl::Type(specs)) = decl {
            for spec in specs {
                predeclare_type(ctx, spec, package);
            }
        }
    }

    for decl in &file.decls {
        match decl {
            TopLevelDecl::Decl(decl) => build_decl(ctx, decl, package),
            TopLevelDecl::Function(function) => build_function(ctx, function, package),
        }
    }

    if ctx.options.dump_scopes {
        ctx.dump_scope(package);
    }
    if ctx.options.dump_predefined {
        ctx.dump_scope(predefined);
    }

    debug!(errors = ctx.diagnostics.error_count(), "declarations built");
}

fn predeclare_type(ctx: &mut Context, spec: &TypeSpec, scope: ScopeId) {
    let slot = ctx.types.pending();
    let symbol = Symbol::new(&spec.name.name, SymbolKind::TypeName, slot, spec.name.line());

    if ctx.define(scope, symbol, &spec.name.span.start).is_some() {
        ctx.save_type(spec.id, slot);
    }
}

fn build_decl(ctx: &mut Context, decl: &Decl, scope: ScopeId) {
    let unknown = ctx.builtins().unknown;

    match decl {
        Decl::Const(specs) => {
            for spec in specs {
                let ty = match &spec.ty {
                    Some(ty) => build_type(ctx, ty, scope),
                    None => unknown,
                };
                for name in &spec.names {
                    let symbol = Symbol::new(&name.name, SymbolKind::Constant, ty, name.line());
                    ctx.define(scope, symbol, &name.span.start);
                }
                ctx.save_type(spec.id, ty);
            }
        }
        Decl::Type(specs) => {
            for spec in specs {
                let underlying = build_type(ctx, &spec.ty, scope);

                // a redeclared name never got a slot
                let Some(slot) = ctx.type_of(spec.id) else {
                    continue;
                };
                if !ctx.types.is_pending(underlying) && underlying != slot {
                    ctx.types.fill_named(slot, underlying, &spec.name.name);
                }
            }
        }
        Decl::Var(specs) => {
            for spec in specs {
                let ty = match &spec.ty {
                    Some(ty) => build_type(ctx, ty, scope),
                    None => unknown,
                };
                for name in &spec.names {
                    let symbol = Symbol::new(&name.name, SymbolKind::Variable, ty, name.line());
                    ctx.define(scope, symbol, &name.span.start);
                }
                ctx.save_type(spec.id, ty);
            }
        }
    }
}

fn build_function(ctx: &mut Context, function: &FunctionDecl, scope: ScopeId) {
    let unknown = ctx.builtins().unknown;
    let symbol = Symbol::new(
        &function.name.name,
        SymbolKind::Function,
        unknown,
        function.name.line(),
    );

    let kind = match ctx.define(scope, symbol, &function.name.span.start) {
        Some(symbol) => ScopeKind::Function { symbol },
        // keep going with a detached scope so the parameters still get checked
        None => ScopeKind::Block,
    };
    let function_scope = ctx.symbols.open_scope(&function.name.name, kind.clone(), scope);
    ctx.save_scope(function.id, function_scope);

    let mut params = Vec::new();
    for param in &function.signature.params {
        let ty = build_type(ctx, &param.ty, function_scope);
        for name in &param.names {
            let symbol = Symbol::new(&name.name, SymbolKind::Formal, ty, name.line());
            ctx.define(function_scope, symbol, &name.span.start);
            params.push(ty);
        }
    }

    let results = match &function.signature.result {
        Some(result) => vec![build_type(ctx, result, function_scope)],
        None => vec![],
    };

    let signature = ctx.types.function(params, results);
    ctx.save_type(function.signature.id, signature);

    if let ScopeKind::Function { symbol } = kind {
        ctx.symbols.symbol_mut(symbol).ty = signature;
    }
}

/// Builds the skeleton of a type expression. Names not declared yet are
/// left unknown without complaint; array lengths wait for the second pass.
pub fn build_type(ctx: &mut Context, expr: &TypeExpr, scope: ScopeId) -> TypeId {
    let unknown = ctx.builtins().unknown;

    let ty = match &expr.kind {
        TypeExprKind::Name {
            package: Some(package),
            name,
        } => match ctx.resolve_qualified(scope, package, name) {
            Some(id) if ctx.symbols.symbol(id).kind == SymbolKind::TypeName => ctx.symbols.symbol(id).ty,
            Some(_) => {
                ctx.report(
                    ErrorImpl::NotAType {
                        name: format!("{}.{}", package.name, name.name),
                    },
                    &name.span.start,
                );
                unknown
            }
            None => unknown,
        },
        TypeExprKind::Name { package: None, name } => match ctx.symbols.resolve(scope, &name.name) {
            None => unknown,
            Some(id) if ctx.symbols.symbol(id).kind == SymbolKind::TypeName => ctx.symbols.symbol(id).ty,
            Some(_) => {
                ctx.report(
                    ErrorImpl::NotAType {
                        name: name.name.clone(),
                    },
                    &name.span.start,
                );
                unknown
            }
        },
        TypeExprKind::Array { elem, .. } => {
            let elem = build_type(ctx, elem, scope);
            ctx.types.array(elem, -1)
        }
        TypeExprKind::Slice(elem) => {
            let elem = build_type(ctx, elem, scope);
            ctx.types.slice(elem)
        }
        TypeExprKind::Pointer(base) => {
            let base = build_type(ctx, base, scope);
            ctx.types.pointer(base)
        }
        TypeExprKind::Struct(fields) => {
            let table = ctx.symbols.new_field_table(scope);
            for field in fields {
                let ty = build_type(ctx, &field.ty, scope);
                for name in &field.names {
                    let symbol = Symbol::new(&name.name, SymbolKind::Field, ty, name.line());
                    ctx.define_field(table, symbol, &name.span.start);
                }
            }
            ctx.types.struct_type(table)
        }
    };

    ctx.save_type(expr.id, ty)
}
