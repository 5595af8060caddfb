//! Second pass: completes the skeleton types and checks every statement.
//!
//! The walk starts in the package scope recorded by the first pass.
//! Package-level declarations are resolved first, then every function
//! signature, then the function bodies. A package type or constant used
//! before its declaration is resolved on demand.
//! Errors are reported and the walk carries on with the unknown sentinel.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    ast::{
        ast::{ConstSpec, Decl, FunctionDecl, Ident, NodeId, SourceFile, TopLevelDecl, TypeSpec, VarSpec},
        expressions::{Expr, ExprKind, UnaryOp},
        statements::{Block, ElseBranch, IfStmt, SimpleStmt, Stmt, StmtKind},
        types::{ArrayLength, TypeExpr, TypeExprKind},
    },
    errors::errors::ErrorImpl,
    symbols::{
        scope::{ScopeId, ScopeKind},
        symbol::{Symbol, SymbolKind},
    },
    types::types::{ConstValue, TypeId, TypeKind},
    Position,
};

use super::{
    context::Context,
    engine::{check_assignability, check_bin_op, check_unary_op},
    expressions::{check_expr, is_addressable},
};

pub struct Resolver<'a> {
    pub ctx: &'a mut Context,
    /// Scope the walk is currently in.
    pub scope: ScopeId,
    package: ScopeId,
    /// Package-level type specs by their pre-declared slot.
    type_specs: HashMap<TypeId, &'a TypeSpec>,
    resolved: HashSet<TypeId>,
    /// Named types being completed, with the pointer depth they started at.
    in_progress: HashMap<TypeId, usize>,
    /// Pointers and slices entered while resolving the current type.
    indirection: usize,
    /// Package-level constant specs by name.
    const_specs: HashMap<&'a str, &'a ConstSpec>,
    consts_done: HashSet<NodeId>,
    consts_in_progress: HashSet<NodeId>,
    /// Labels of the function being checked.
    labels: HashSet<String>,
    loop_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a mut Context, file: &'a SourceFile) -> Self {
        let package = ctx.scope_of(file.id).unwrap_or(ctx.symbols.predefined());

        let mut type_specs = HashMap::new();
        let mut const_specs = HashMap::new();
        for decl in &file.decls {
            match decl {
                TopLevelDecl::Decl(Decl::Type(specs)) => {
                    for spec in specs {
                        if let Some(slot) = ctx.type_of(spec.id) {
                            type_specs.insert(slot, spec);
                        }
                    }
                }
                TopLevelDecl::Decl(Decl::Const(specs)) => {
                    for spec in specs {
                        for name in &spec.names {
                            // a duplicate keeps the first declaration
                            const_specs.entry(name.name.as_str()).or_insert(spec);
                        }
                    }
                }
                _ => (),
            }
        }

        Resolver {
            ctx,
            scope: package,
            package,
            type_specs,
            resolved: HashSet::new(),
            in_progress: HashMap::new(),
            indirection: 0,
            const_specs,
            consts_done: HashSet::new(),
            consts_in_progress: HashSet::new(),
            labels: HashSet::new(),
            loop_depth: 0,
        }
    }

    pub fn unknown(&self) -> TypeId {
        self.ctx.builtins().unknown
    }

    /// Opens a block scope for `node` and makes it current. Returns the
    /// scope to go back to.
    fn open_block(&mut self, node: NodeId, name: &str) -> ScopeId {
        let scope = self.ctx.symbols.open_scope(name, ScopeKind::Block, self.scope);
        self.ctx.save_scope(node, scope);
        std::mem::replace(&mut self.scope, scope)
    }

    fn close_block(&mut self, previous: ScopeId) {
        if self.ctx.options.dump_scopes {
            self.ctx.dump_scope(self.scope);
        }
        self.scope = previous;
    }

    /// Resolves a package-level constant declared after its first use, so
    /// that its symbol carries the constant's type. Returns false when the
    /// constant depends on itself.
    pub fn resolve_constant(&mut self, name: &str) -> bool {
        let Some(spec) = self.const_specs.get(name).copied() else {
            return true;
        };
        if self.consts_in_progress.contains(&spec.id) {
            return false;
        }
        if self.consts_done.contains(&spec.id) {
            return true;
        }

        let saved = std::mem::replace(&mut self.scope, self.package);
        let indirection = std::mem::replace(&mut self.indirection, 0);
        resolve_const_spec(self, spec);
        self.indirection = indirection;
        self.scope = saved;
        true
    }

    pub fn is_package(&self, scope: Option<ScopeId>) -> bool {
        scope == Some(self.package)
    }
}

pub fn resolve_source_file(ctx: &mut Context, file: &SourceFile) {
    debug!(file = %file.span.start.file, "resolving");
    let mut resolver = Resolver::new(ctx, file);

    for decl in &file.decls {
        if let TopLevelDecl::Decl(decl) = decl {
            resolve_decl(&mut resolver, decl);
        }
    }

    // every signature is complete before any body calls it
    for decl in &file.decls {
        if let TopLevelDecl::Function(function) = decl {
            resolve_signature(&mut resolver, function);
        }
    }

    for decl in &file.decls {
        if let TopLevelDecl::Function(function) = decl {
            resolve_function(&mut resolver, function);
        }
    }

    if resolver.ctx.options.dump_scopes {
        let package = resolver.package;
        resolver.ctx.dump_scope(package);
    }

    debug!(errors = resolver.ctx.diagnostics.error_count(), "resolved");
}

fn resolve_decl(resolver: &mut Resolver, decl: &Decl) {
    match decl {
        Decl::Const(specs) => specs.iter().for_each(|spec| resolve_const_spec(resolver, spec)),
        Decl::Var(specs) => specs.iter().for_each(|spec| resolve_var_spec(resolver, spec)),
        Decl::Type(specs) => specs.iter().for_each(|spec| resolve_type_spec(resolver, spec)),
    }
}

/// Package-level names already exist from the first pass and get their
/// type updated; anything else is defined here.
fn update_or_define(resolver: &mut Resolver, name: &Ident, kind: SymbolKind, ty: TypeId) {
    if resolver.scope == resolver.package {
        if let Some(id) = resolver.ctx.symbols.resolve_in_current(resolver.scope, &name.name) {
            let symbol = resolver.ctx.symbols.symbol_mut(id);
            if symbol.kind == kind {
                symbol.ty = ty;
                return;
            }
        }
    }

    let symbol = Symbol::new(&name.name, kind, ty, name.line());
    resolver.ctx.define(resolver.scope, symbol, &name.span.start);
}

/// The type a variable takes from an untyped constant initializer.
fn default_type(resolver: &Resolver, ty: TypeId) -> TypeId {
    match resolver.ctx.types.untyped(ty) {
        Some(number) => match number.value {
            ConstValue::Int(_) => resolver.ctx.builtins().int,
            ConstValue::Float(_) => resolver.ctx.builtins().float64,
        },
        None => ty,
    }
}

fn check_values(resolver: &mut Resolver, values: &[Expr]) -> Vec<TypeId> {
    values.iter().map(|value| check_expr(resolver, value)).collect()
}

fn resolve_const_spec(resolver: &mut Resolver, spec: &ConstSpec) {
    if !resolver.consts_done.insert(spec.id) {
        return;
    }
    resolver.consts_in_progress.insert(spec.id);

    let declared = spec.ty.as_ref().map(|ty| resolve_type(resolver, ty));
    let values = check_values(resolver, &spec.values);

    if values.len() != spec.names.len() {
        resolver.ctx.report(
            ErrorImpl::InitializerCountMismatch {
                names: spec.names.len(),
                values: values.len(),
            },
            &spec.span.start,
        );
    }

    for (index, name) in spec.names.iter().enumerate() {
        let value = values.get(index).copied();
        let ty = match (declared, value) {
            (Some(declared), Some(value)) => {
                check_assignability(resolver.ctx, declared, value, &spec.values[index].span.start);
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(value)) => value,
            (None, None) => resolver.unknown(),
        };
        update_or_define(resolver, name, SymbolKind::Constant, ty);
    }

    if let Some(declared) = declared {
        resolver.ctx.save_type(spec.id, declared);
    }
    resolver.consts_in_progress.remove(&spec.id);
}

fn resolve_var_spec(resolver: &mut Resolver, spec: &VarSpec) {
    let declared = spec.ty.as_ref().map(|ty| resolve_type(resolver, ty));
    let values = check_values(resolver, &spec.values);

    if !values.is_empty() && values.len() != spec.names.len() {
        resolver.ctx.report(
            ErrorImpl::InitializerCountMismatch {
                names: spec.names.len(),
                values: values.len(),
            },
            &spec.span.start,
        );
    }

    for (index, name) in spec.names.iter().enumerate() {
        let value = values.get(index).copied();
        let ty = match (declared, value) {
            (Some(declared), Some(value)) => {
                check_assignability(resolver.ctx, declared, value, &spec.values[index].span.start);
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(value)) => default_type(resolver, value),
            (None, None) => resolver.unknown(),
        };
        update_or_define(resolver, name, SymbolKind::Variable, ty);
    }

    if let Some(declared) = declared {
        resolver.ctx.save_type(spec.id, declared);
    }
}

fn resolve_type_spec(resolver: &mut Resolver, spec: &TypeSpec) {
    match resolver.ctx.type_of(spec.id) {
        // package level, pre-declared by the first pass
        Some(slot) if resolver.type_specs.contains_key(&slot) => complete_named_type(resolver, slot, spec),
        _ if resolver.scope == resolver.package => {
            // a duplicate the first pass already reported
        }
        _ => {
            let slot = resolver.ctx.types.pending();
            let symbol = Symbol::new(&spec.name.name, SymbolKind::TypeName, slot, spec.name.line());
            if resolver.ctx.define(resolver.scope, symbol, &spec.name.span.start).is_some() {
                resolver.ctx.save_type(spec.id, slot);
                complete_named_type(resolver, slot, spec);
            }
        }
    }
}

/// Resolves the underlying type of `spec` and copies it into the named
/// slot, once per slot.
fn complete_named_type(resolver: &mut Resolver, slot: TypeId, spec: &TypeSpec) {
    if !resolver.resolved.insert(slot) {
        return;
    }

    resolver.in_progress.insert(slot, resolver.indirection);
    let underlying = resolve_type(resolver, &spec.ty);
    resolver.in_progress.remove(&slot);

    if underlying != slot {
        resolver.ctx.types.fill_named(slot, underlying, &spec.name.name);
    }
}

/// Resolves the type expression `expr` and records its final type.
///
/// A named type may refer to itself only below a pointer or slice.
pub fn resolve_type(resolver: &mut Resolver, expr: &TypeExpr) -> TypeId {
    let recorded = resolver.ctx.type_of(expr.id);

    let ty = match &expr.kind {
        TypeExprKind::Name { package, name } => resolve_type_name(resolver, package.as_ref(), name),
        TypeExprKind::Array { len, elem } => {
            let elem = resolve_type(resolver, elem);
            let size = match len {
                ArrayLength::Expr(len) => array_size(resolver, len),
                ArrayLength::Inferred => -1,
            };
            rewrite(resolver, recorded, TypeKind::Array { elem, size })
        }
        TypeExprKind::Slice(elem) => {
            let elem = resolve_indirect(resolver, elem);
            rewrite(resolver, recorded, TypeKind::Slice { elem })
        }
        TypeExprKind::Pointer(base) => {
            let base = resolve_indirect(resolver, base);
            resolver.ctx.types.pointer(base)
        }
        TypeExprKind::Struct(fields) => {
            let table = match recorded.map(|id| resolver.ctx.types.kind(id)) {
                Some(TypeKind::Struct { fields }) => Some(*fields),
                _ => None,
            };

            match table {
                Some(table) => {
                    for field in fields {
                        let ty = resolve_type(resolver, &field.ty);
                        for name in &field.names {
                            if let Some(id) = resolver.ctx.symbols.field(table, &name.name) {
                                resolver.ctx.symbols.symbol_mut(id).ty = ty;
                            }
                        }
                    }
                    recorded.unwrap_or(resolver.unknown())
                }
                None => {
                    let table = resolver.ctx.symbols.new_field_table(resolver.scope);
                    for field in fields {
                        let ty = resolve_type(resolver, &field.ty);
                        for name in &field.names {
                            let symbol = Symbol::new(&name.name, SymbolKind::Field, ty, name.line());
                            resolver.ctx.define_field(table, symbol, &name.span.start);
                        }
                    }
                    resolver.ctx.types.struct_type(table)
                }
            }
        }
    };

    resolver.ctx.save_type(expr.id, ty)
}

fn resolve_indirect(resolver: &mut Resolver, expr: &TypeExpr) -> TypeId {
    resolver.indirection += 1;
    let ty = resolve_type(resolver, expr);
    resolver.indirection -= 1;
    ty
}

/// Rewrites an incomplete recorded slot in place, or allocates a new one.
fn rewrite(resolver: &mut Resolver, recorded: Option<TypeId>, kind: TypeKind) -> TypeId {
    match recorded {
        Some(slot) if resolver.ctx.is_complete(slot) => slot,
        Some(slot) => {
            resolver.ctx.types.replace(slot, kind);
            slot
        }
        None => match kind {
            TypeKind::Array { elem, size } => resolver.ctx.types.array(elem, size),
            TypeKind::Slice { elem } => resolver.ctx.types.slice(elem),
            other => {
                let slot = resolver.ctx.types.pending();
                resolver.ctx.types.replace(slot, other);
                slot
            }
        },
    }
}

fn resolve_type_name(resolver: &mut Resolver, package: Option<&Ident>, name: &Ident) -> TypeId {
    let (symbol, spelled) = match package {
        Some(package) => (
            resolver.ctx.resolve_qualified(resolver.scope, package, name),
            format!("{}.{}", package.name, name.name),
        ),
        None => (
            resolver.ctx.symbols.resolve(resolver.scope, &name.name),
            name.name.clone(),
        ),
    };

    let symbol = match symbol {
        Some(id) if resolver.ctx.symbols.symbol(id).kind == SymbolKind::TypeName => id,
        // a missing package member was reported already
        None if package.is_some() => return resolver.unknown(),
        _ => {
            resolver
                .ctx
                .report(ErrorImpl::NotAType { name: spelled }, &name.span.start);
            return resolver.unknown();
        }
    };

    let slot = resolver.ctx.symbols.symbol(symbol).ty;
    if let Some(&started) = resolver.in_progress.get(&slot) {
        // the path back to `slot` passed through a pointer or slice
        if resolver.indirection > started {
            return slot;
        }
        resolver
            .ctx
            .report(ErrorImpl::InvalidRecursiveType { name: spelled }, &name.span.start);
        return resolver.unknown();
    }

    if let Some(spec) = resolver.type_specs.get(&slot).copied() {
        if !resolver.resolved.contains(&slot) {
            // declared later at package level; resolve it now, in its own scope
            let saved = std::mem::replace(&mut resolver.scope, resolver.package);
            complete_named_type(resolver, slot, spec);
            resolver.scope = saved;
        }
    }

    slot
}

/// Length of an array type: a constant, non-negative integer.
fn array_size(resolver: &mut Resolver, len: &Expr) -> i64 {
    let errors = resolver.ctx.diagnostics.error_count();
    let ty = check_expr(resolver, len);
    let position = &len.span.start;

    let value = match resolver.ctx.types.kind(ty) {
        TypeKind::Untyped(number) => number.value,
        // already reported by the length expression
        TypeKind::Unknown if resolver.ctx.diagnostics.error_count() > errors => return -1,
        _ => {
            resolver.ctx.report(ErrorImpl::ArraySizeNotConstant, position);
            return -1;
        }
    };

    match value.as_integer() {
        None => {
            resolver.ctx.report(ErrorImpl::ArraySizeNotInteger, position);
            -1
        }
        Some(size) if size < 0 => {
            resolver.ctx.report(
                ErrorImpl::InvalidArraySize {
                    size: size.to_string(),
                },
                position,
            );
            -1
        }
        Some(size) => size,
    }
}

/// Completes the parameter and result types of `function` and rewrites its
/// signature slot.
fn resolve_signature(resolver: &mut Resolver, function: &FunctionDecl) {
    let Some(function_scope) = resolver.ctx.scope_of(function.id) else {
        return;
    };
    let previous = std::mem::replace(&mut resolver.scope, function_scope);

    let mut params = Vec::new();
    for param in &function.signature.params {
        let ty = resolve_type(resolver, &param.ty);
        for name in &param.names {
            if let Some(id) = resolver.ctx.symbols.resolve_in_current(function_scope, &name.name) {
                resolver.ctx.symbols.symbol_mut(id).ty = ty;
            }
            params.push(ty);
        }
    }

    let results = match &function.signature.result {
        Some(result) => vec![resolve_type(resolver, result)],
        None => vec![],
    };

    match resolver.ctx.type_of(function.signature.id) {
        Some(signature) => resolver.ctx.types.replace(signature, TypeKind::Function { params, results }),
        None => {
            let signature = resolver.ctx.types.function(params, results);
            resolver.ctx.save_type(function.signature.id, signature);
        }
    }

    resolver.scope = previous;
}

fn resolve_function(resolver: &mut Resolver, function: &FunctionDecl) {
    let Some(function_scope) = resolver.ctx.scope_of(function.id) else {
        return;
    };
    let previous = std::mem::replace(&mut resolver.scope, function_scope);

    if let Some(body) = &function.body {
        resolver.labels = HashSet::new();
        collect_labels(&body.stmts, &mut resolver.labels);
        resolver.loop_depth = 0;

        resolve_block(resolver, body);
    }

    if resolver.ctx.options.dump_scopes {
        resolver.ctx.dump_scope(function_scope);
    }
    resolver.scope = previous;
}

fn collect_labels(stmts: &[Stmt], labels: &mut HashSet<String>) {
    for stmt in stmts {
        collect_stmt_labels(stmt, labels);
    }
}

fn collect_stmt_labels(stmt: &Stmt, labels: &mut HashSet<String>) {
    match &stmt.kind {
        StmtKind::Labeled { label, stmt } => {
            labels.insert(label.name.clone());
            collect_stmt_labels(stmt, labels);
        }
        StmtKind::Block(block) | StmtKind::For { body: block, .. } => collect_labels(&block.stmts, labels),
        StmtKind::If(stmt) => {
            collect_labels(&stmt.then.stmts, labels);
            match &stmt.otherwise {
                Some(ElseBranch::If(stmt)) => collect_stmt_labels(stmt, labels),
                Some(ElseBranch::Block(block)) => collect_labels(&block.stmts, labels),
                None => (),
            }
        }
        _ => (),
    }
}

pub fn resolve_block(resolver: &mut Resolver, block: &Block) {
    let previous = resolver.open_block(block.id, "block");

    for stmt in &block.stmts {
        resolve_stmt(resolver, stmt);
    }

    resolver.close_block(previous);
}

pub fn resolve_stmt(resolver: &mut Resolver, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Decl(decl) => resolve_decl(resolver, decl),
        StmtKind::Labeled { label, stmt } => {
            let ty = resolver.ctx.builtins().label;
            let symbol = Symbol::new(&label.name, SymbolKind::Label, ty, label.line());
            resolver.ctx.define(resolver.scope, symbol, &label.span.start);
            resolve_stmt(resolver, stmt);
        }
        StmtKind::Simple(simple) => resolve_simple_stmt(resolver, simple, &stmt.span.start),
        StmtKind::Return(values) => resolve_return(resolver, values, &stmt.span.start),
        StmtKind::Break(label) => resolve_branch(resolver, "break", label.as_ref(), &stmt.span.start),
        StmtKind::Continue(label) => resolve_branch(resolver, "continue", label.as_ref(), &stmt.span.start),
        StmtKind::Goto(label) => check_label(resolver, label),
        StmtKind::Block(block) => resolve_block(resolver, block),
        StmtKind::If(if_stmt) => resolve_if(resolver, stmt.id, if_stmt),
        StmtKind::For {
            init,
            cond,
            post,
            body,
        } => {
            let previous = resolver.open_block(stmt.id, "for");

            if let Some(init) = init {
                resolve_simple_stmt(resolver, init, &stmt.span.start);
            }
            if let Some(cond) = cond {
                check_condition(resolver, cond);
            }
            if let Some(post) = post {
                resolve_simple_stmt(resolver, post, &stmt.span.start);
            }

            resolver.loop_depth += 1;
            resolve_block(resolver, body);
            resolver.loop_depth -= 1;

            resolver.close_block(previous);
        }
    }
}

fn resolve_if(resolver: &mut Resolver, node: NodeId, if_stmt: &IfStmt) {
    let previous = resolver.open_block(node, "if");

    if let Some(init) = &if_stmt.init {
        resolve_simple_stmt(resolver, init, &if_stmt.cond.span.start);
    }
    check_condition(resolver, &if_stmt.cond);
    resolve_block(resolver, &if_stmt.then);

    match &if_stmt.otherwise {
        Some(ElseBranch::If(stmt)) => resolve_stmt(resolver, stmt),
        Some(ElseBranch::Block(block)) => resolve_block(resolver, block),
        None => (),
    }

    resolver.close_block(previous);
}

fn check_condition(resolver: &mut Resolver, cond: &Expr) {
    let ty = check_expr(resolver, cond);
    let boolean = resolver.ctx.builtins().boolean;
    check_assignability(resolver.ctx, boolean, ty, &cond.span.start);
}

fn check_label(resolver: &mut Resolver, label: &Ident) {
    if !resolver.labels.contains(&label.name) {
        resolver.ctx.report(
            ErrorImpl::LabelNotDefined {
                label: label.name.clone(),
            },
            &label.span.start,
        );
    }
}

fn resolve_branch(resolver: &mut Resolver, keyword: &str, label: Option<&Ident>, position: &Position) {
    if let Some(label) = label {
        check_label(resolver, label);
    }

    if resolver.loop_depth == 0 {
        resolver.ctx.report(
            ErrorImpl::BranchOutsideLoop {
                keyword: String::from(keyword),
            },
            position,
        );
    }
}

fn resolve_return(resolver: &mut Resolver, values: &[Expr], position: &Position) {
    let values_ty = check_values(resolver, values);

    let results = resolver
        .ctx
        .symbols
        .enclosing_function(resolver.scope)
        .map(|function| resolver.ctx.symbols.symbol(function).ty)
        .and_then(|signature| match resolver.ctx.types.kind(signature) {
            TypeKind::Function { results, .. } => Some(results.clone()),
            _ => None,
        });
    let Some(results) = results else {
        return;
    };

    if values_ty.len() > results.len() {
        resolver.ctx.report(ErrorImpl::TooManyResults, position);
    } else if values_ty.len() < results.len() {
        resolver.ctx.report(ErrorImpl::NotEnoughResults, position);
    }

    for ((value, ty), result) in values.iter().zip(values_ty).zip(results) {
        check_assignability(resolver.ctx, result, ty, &value.span.start);
    }
}

fn is_blank(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Name(name) if name.name == "_")
}

pub fn resolve_simple_stmt(resolver: &mut Resolver, stmt: &SimpleStmt, position: &Position) {
    match stmt {
        SimpleStmt::Empty => (),
        SimpleStmt::Expr(expr) => {
            check_expr(resolver, expr);
        }
        SimpleStmt::IncDec { expr, increment } => {
            let ty = check_expr(resolver, expr);
            let op = if *increment { UnaryOp::Inc } else { UnaryOp::Dec };
            let addressable = is_addressable(resolver, expr);
            check_unary_op(resolver.ctx, ty, op, addressable, &expr.span.start);
        }
        SimpleStmt::Assign { lhs, op, rhs } => {
            let left: Vec<TypeId> = lhs
                .iter()
                .map(|expr| match is_blank(expr) {
                    true => resolver.ctx.builtins().any,
                    false => check_expr(resolver, expr),
                })
                .collect();
            let right = check_values(resolver, rhs);

            if left.len() != right.len() {
                resolver.ctx.report(
                    ErrorImpl::AssignmentCountMismatch {
                        left: left.len(),
                        right: right.len(),
                    },
                    position,
                );
                return;
            }

            for ((dest, src), value) in left.into_iter().zip(right).zip(rhs) {
                let src = match op {
                    Some(op) => check_bin_op(resolver.ctx, dest, src, *op, &value.span.start),
                    None => src,
                };
                check_assignability(resolver.ctx, dest, src, &value.span.start);
            }
        }
        SimpleStmt::ShortVarDecl { names, values } => {
            let values_ty = check_values(resolver, values);

            if values_ty.len() != names.len() {
                resolver.ctx.report(
                    ErrorImpl::InitializerCountMismatch {
                        names: names.len(),
                        values: values_ty.len(),
                    },
                    position,
                );
            }

            for (index, name) in names.iter().enumerate() {
                if name.name == "_" {
                    continue;
                }

                let ty = match values_ty.get(index) {
                    Some(ty) => default_type(resolver, *ty),
                    None => resolver.unknown(),
                };

                let existing = resolver
                    .ctx
                    .symbols
                    .resolve_in_current(resolver.scope, &name.name)
                    .filter(|id| resolver.ctx.symbols.symbol(*id).kind == SymbolKind::Variable);

                match existing {
                    Some(id) => {
                        let dest = resolver.ctx.symbols.symbol(id).ty;
                        let src = values_ty.get(index).copied().unwrap_or(ty);
                        check_assignability(resolver.ctx, dest, src, &name.span.start);
                    }
                    None => {
                        let symbol = Symbol::new(&name.name, SymbolKind::Variable, ty, name.line());
                        resolver.ctx.define(resolver.scope, symbol, &name.span.start);
                    }
                }
            }
        }
    }
}
