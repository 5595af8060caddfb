//! Error types and error reporting.
//!
//! - `errors`: the `Error` value (an `ErrorImpl` plus a source position),
//!   its stable name and an optional tip
//! - `diagnostics`: the counting collector the semantic passes report into
//!
//! Lexing and parsing stop at the first `Error`. The semantic passes never
//! stop; they report into `Diagnostics` and carry on.

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
