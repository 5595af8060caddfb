use std::collections::HashMap;

use crate::{
    ast::ast::{Ident, NodeId},
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    symbols::{
        scope::{FieldTableId, ScopeId},
        symbol::{Symbol, SymbolId, SymbolKind, SymbolTable},
    },
    types::types::{Builtins, TypeArena, TypeId},
    Position,
};

use super::predefined::add_predefined_names;

/// Debug switches. None of them changes what gets accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Log every symbol definition.
    pub trace_symbols: bool,
    /// Dump each scope when it closes.
    pub dump_scopes: bool,
    /// Dump the predefined scope after the first pass.
    pub dump_predefined: bool,
    /// Pretty-print the syntax tree before checking.
    pub print_tree: bool,
}

/// State shared by both passes of one compilation.
pub struct Context {
    pub types: TypeArena,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    /// Scope opened for a node: source file, function, block, if/for header.
    pub node_scopes: HashMap<NodeId, ScopeId>,
    /// Type attached to an expression or type-expression node.
    pub node_types: HashMap<NodeId, TypeId>,
    pub options: Options,
    /// Trace and dump lines produced under `options`, in order.
    pub listing: Vec<String>,
}

impl Context {
    pub fn new(options: Options) -> Self {
        let mut ctx = Context {
            types: TypeArena::new(),
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            node_scopes: HashMap::new(),
            node_types: HashMap::new(),
            options,
            listing: vec![],
        };

        add_predefined_names(&mut ctx);
        ctx
    }

    pub fn builtins(&self) -> Builtins {
        self.types.builtins
    }

    pub fn report(&mut self, error: ErrorImpl, position: &Position) {
        self.diagnostics.report(error, position.clone());
    }

    /// Defines `symbol` in `scope`, reporting a duplicate at `position`.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol, position: &Position) -> Option<SymbolId> {
        match self.symbols.define(scope, symbol) {
            Ok(id) => {
                if self.options.trace_symbols {
                    let line = format!(
                        "SY: defined {} in {}",
                        self.symbols.describe(id, &self.types),
                        self.symbols.scope(scope).name
                    );
                    self.listing.push(line);
                }
                Some(id)
            }
            Err(error) => {
                self.report(error, position);
                None
            }
        }
    }

    pub fn define_field(&mut self, table: FieldTableId, symbol: Symbol, position: &Position) -> Option<SymbolId> {
        match self.symbols.define_field(table, symbol) {
            Ok(id) => Some(id),
            Err(error) => {
                self.report(error, position);
                None
            }
        }
    }

    pub fn save_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.node_scopes.insert(node, scope);
    }

    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    pub fn save_type(&mut self, node: NodeId, ty: TypeId) -> TypeId {
        self.node_types.insert(node, ty);
        ty
    }

    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    pub fn display(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.symbols)
    }

    pub fn is_complete(&self, ty: TypeId) -> bool {
        self.types.is_complete(ty, &self.symbols)
    }

    /// Interns a numeric literal. Malformed text is reported and stands in
    /// as zero.
    pub fn untyped_number(&mut self, text: &str, position: &Position) -> TypeId {
        match self.types.untyped_number(text) {
            Ok(id) => id,
            Err(error) => {
                self.report(error, position);
                self.types.builtins.zero
            }
        }
    }

    /// Resolves `package.member`, reporting a missing package or member.
    pub fn resolve_qualified(&mut self, scope: ScopeId, package: &Ident, member: &Ident) -> Option<SymbolId> {
        let members = self
            .symbols
            .resolve(scope, &package.name)
            .and_then(|id| match self.symbols.symbol(id).kind {
                SymbolKind::Package { members } => Some(members),
                _ => None,
            });

        let Some(members) = members else {
            self.report(
                ErrorImpl::PackageNotFound {
                    package: package.name.clone(),
                },
                &package.span.start,
            );
            return None;
        };

        let found = self.symbols.resolve_in_current(members, &member.name);
        if found.is_none() {
            self.report(
                ErrorImpl::PackageMemberNotFound {
                    package: package.name.clone(),
                    member: member.name.clone(),
                },
                &member.span.start,
            );
        }
        found
    }

    /// Appends the symbols of `scope` to the listing.
    pub fn dump_scope(&mut self, scope: ScopeId) {
        let header = format!("--- {} ---", self.symbols.scope(scope).name);
        let body = self.symbols.dump(scope, &self.types);

        self.listing.push(header);
        self.listing.extend(body.lines().map(String::from));
    }
}
