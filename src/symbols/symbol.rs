use std::{collections::HashMap, fmt::Display};

use id_arena::{Arena, Id};
use tracing::trace;

use crate::{
    errors::errors::ErrorImpl,
    types::types::{TypeArena, TypeId},
};

use super::scope::{FieldTable, FieldTableId, Scope, ScopeId, ScopeKind};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Placeholder left behind for an undeclared identifier.
    Unknown,
    Variable,
    Function,
    Formal,
    Field,
    Constant,
    TypeName,
    Package { members: ScopeId },
    Label,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::Unknown => "Unknown",
            SymbolKind::Variable => "Variable",
            SymbolKind::Function => "Function",
            SymbolKind::Formal => "Formal",
            SymbolKind::Field => "Field",
            SymbolKind::Constant => "Constant",
            SymbolKind::TypeName => "Type",
            SymbolKind::Package { .. } => "Package",
            SymbolKind::Label => "Label",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
    /// Set once the symbol is defined somewhere.
    pub scope: Option<ScopeId>,
    pub line: u32,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, ty: TypeId, line: u32) -> Self {
        Symbol {
            name: String::from(name),
            kind,
            ty,
            scope: None,
            line,
        }
    }
}

/// Owns every scope, symbol and field table of a compilation.
pub struct SymbolTable {
    scopes: Arena<Scope>,
    symbols: Arena<Symbol>,
    field_tables: Arena<FieldTable>,
    predefined: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let predefined = scopes.alloc_with_id(|id| Scope {
            id,
            name: String::from("predefined"),
            kind: ScopeKind::Predefined,
            parent: None,
            symbols: vec![],
            index: HashMap::new(),
        });

        SymbolTable {
            scopes,
            symbols: Arena::new(),
            field_tables: Arena::new(),
            predefined,
        }
    }

    /// Root of the scope tree.
    pub fn predefined(&self) -> ScopeId {
        self.predefined
    }

    pub fn open_scope(&mut self, name: &str, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        self.scopes.alloc_with_id(|id| Scope {
            id,
            name: String::from(name),
            kind,
            parent: Some(parent),
            symbols: vec![],
            index: HashMap::new(),
        })
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    pub fn enclosing(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    /// Adds `symbol` to `scope`. A name already present in that scope is
    /// rejected and nothing changes.
    pub fn define(&mut self, scope: ScopeId, mut symbol: Symbol) -> Result<SymbolId, ErrorImpl> {
        if self.scopes[scope].index.contains_key(&symbol.name) {
            return Err(ErrorImpl::DuplicateDeclaration { name: symbol.name });
        }

        trace!(name = %symbol.name, kind = %symbol.kind, scope = %self.scopes[scope].name, "define");

        symbol.scope = Some(scope);
        let name = symbol.name.clone();
        let id = self.symbols.alloc(symbol);

        let scope = &mut self.scopes[scope];
        scope.symbols.push(id);
        scope.index.insert(name, id);
        Ok(id)
    }

    /// Looks `name` up in `scope`, then outward through its enclosing scopes.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(symbol) = scope.lookup(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }

        None
    }

    pub fn resolve_in_current(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope].lookup(name)
    }

    /// The function whose scope encloses `scope`, if any.
    pub fn enclosing_function(&self, scope: ScopeId) -> Option<SymbolId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            if let ScopeKind::Function { symbol } = self.scopes[id].kind {
                return Some(symbol);
            }
            current = self.scopes[id].parent;
        }

        None
    }

    pub fn new_field_table(&mut self, scope: ScopeId) -> FieldTableId {
        self.field_tables.alloc_with_id(|id| FieldTable {
            id,
            scope,
            fields: vec![],
            index: HashMap::new(),
        })
    }

    pub fn define_field(&mut self, table: FieldTableId, mut symbol: Symbol) -> Result<SymbolId, ErrorImpl> {
        if self.field_tables[table].index.contains_key(&symbol.name) {
            return Err(ErrorImpl::DuplicateDeclaration { name: symbol.name });
        }

        symbol.scope = Some(self.field_tables[table].scope);
        let name = symbol.name.clone();
        let id = self.symbols.alloc(symbol);

        let table = &mut self.field_tables[table];
        table.fields.push(id);
        table.index.insert(name, id);
        Ok(id)
    }

    pub fn field(&self, table: FieldTableId, name: &str) -> Option<SymbolId> {
        self.field_tables[table].index.get(name).copied()
    }

    pub fn fields(&self, table: FieldTableId) -> &[SymbolId] {
        &self.field_tables[table].fields
    }

    /// `Kind name:type`
    pub fn describe(&self, symbol: SymbolId, types: &TypeArena) -> String {
        let symbol = &self.symbols[symbol];
        format!("{} {}:{}", symbol.kind, symbol.name, types.display(symbol.ty, self))
    }

    /// One line per symbol of `scope`, in declaration order.
    pub fn dump(&self, scope: ScopeId, types: &TypeArena) -> String {
        self.scopes[scope]
            .symbols
            .iter()
            .map(|id| format!("{} (line {})\n", self.describe(*id, types), self.symbols[*id].line))
            .collect()
    }
}
