//! Symbols, scopes and struct field tables.
//!
//! Scopes form a tree rooted at the predefined scope. Every scope, symbol
//! and field table lives in an arena owned by `SymbolTable` and is
//! addressed by id.

pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;
