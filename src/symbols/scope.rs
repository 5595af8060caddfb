use std::{collections::HashMap, fmt::Display};

use id_arena::Id;

use super::symbol::SymbolId;

pub type ScopeId = Id<Scope>;
pub type FieldTableId = Id<FieldTable>;

#[derive(Debug, Clone, PartialEq)]
pub enum ScopeKind {
    Predefined,
    Package,
    Block,
    Function { symbol: SymbolId },
    Imported { path: String },
}

impl Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Predefined => write!(f, "predefined"),
            ScopeKind::Package => write!(f, "package"),
            ScopeKind::Block => write!(f, "block"),
            ScopeKind::Function { .. } => write!(f, "function"),
            ScopeKind::Imported { path } => write!(f, "imported {:?}", path),
        }
    }
}

/// One level of the namespace tree. Symbols keep their declaration order.
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub(super) symbols: Vec<SymbolId>,
    pub(super) index: HashMap<String, SymbolId>,
}

impl Scope {
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.index.get(name).copied()
    }
}

/// Members of a struct type, owned apart from the scope tree.
#[derive(Debug)]
pub struct FieldTable {
    pub id: FieldTableId,
    /// Scope the struct type was declared in.
    pub scope: ScopeId,
    pub(super) fields: Vec<SymbolId>,
    pub(super) index: HashMap<String, SymbolId>,
}
