//! Semantic analysis.
//!
//! Checking runs in two passes over the syntax tree:
//!
//! - `declarations` declares package-level names and builds skeleton types,
//!   leaving pending slots where a type refers forward
//! - `resolver` completes those types in place, declares locals and types
//!   every statement and expression through `expressions` and `engine`
//!
//! Errors are collected in the context's diagnostics. The pipeline in
//! `type_checker` stops after a pass that reported any.

pub mod context;
pub mod declarations;
pub mod engine;
pub mod expressions;
pub mod packages;
pub mod predefined;
pub mod resolver;
pub mod type_checker;

#[cfg(test)]
mod tests;
