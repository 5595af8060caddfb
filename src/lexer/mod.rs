//! Lexical analysis for Goo source.
//!
//! Converts source text into a token stream for the parser. It handles:
//!
//! - Tokenization with an ordered table of anchored regex patterns
//! - Keywords, identifiers, numeric, rune and string literals
//! - Go's automatic semicolon insertion at line ends
//! - Line tracking for error reporting

pub mod lexer;
pub mod tokens;
