//! Parser module for building the syntax tree of a Goo source file.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`SourceFile`](crate::ast::ast::SourceFile). It uses a Pratt
//! parser for expressions with Go's operator precedence and handles:
//!
//! - Package clause, imports and top-level declarations
//! - Statement parsing (declarations, assignments, control flow)
//! - Expression parsing (operators, calls, selectors, composite literals)
//! - Type parsing for declarations and conversions
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Parsing stops at the first syntax error.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
