//! Type parsing implementation.
//!
//! Go types are written prefix-first, so every type form is selected by
//! its leading token:
//!
//! - Type names, optionally package-qualified
//! - Array and slice types
//! - Pointer types
//! - Struct types
//! - Parenthesized types

use std::collections::HashMap;

use crate::{
    ast::types::{ArrayLength, FieldDecl, TypeExpr, TypeExprKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::Parser,
    stmt::parse_ident_list,
};

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

/// Type alias for the type handler lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type lookup table.
///
/// Registers a handler for each token a type can start with.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::Star, parse_pointer_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
    parser.type_nud(TokenKind::OpenParen, parse_paren_type);
}

/// Whether a type can start at the current token.
pub fn at_type_start(parser: &Parser) -> bool {
    parser
        .get_type_nud_lookup()
        .contains_key(&parser.current_token_kind())
}

/// Parses a type expression at the current token.
///
/// # Returns
///
/// The parsed `TypeExpr`, or an error when no type starts here.
pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("expected type"));
    };

    nud_fn(parser)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let first = parser.expect_ident()?;
    let start = first.span.start.clone();

    let kind = if parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        TypeExprKind::Name {
            package: Some(first),
            name: parser.expect_ident()?,
        }
    } else {
        TypeExprKind::Name {
            package: None,
            name: first,
        }
    };

    Ok(TypeExpr {
        id: parser.advance_id(),
        kind,
        span: parser.span_from(&start),
    })
}

/// `[]T`, `[N]T` or `[...]T`.
pub fn parse_array_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;

    let kind = match parser.current_token_kind() {
        TokenKind::CloseBracket => {
            parser.advance();
            TypeExprKind::Slice(Box::new(parse_type(parser)?))
        }
        TokenKind::Ellipsis => {
            parser.advance();
            parser.expect(TokenKind::CloseBracket)?;
            TypeExprKind::Array {
                len: ArrayLength::Inferred,
                elem: Box::new(parse_type(parser)?),
            }
        }
        _ => {
            let len = parser.with_composites(|parser| parse_expr(parser, BindingPower::Default))?;
            parser.expect(TokenKind::CloseBracket)?;
            TypeExprKind::Array {
                len: ArrayLength::Expr(Box::new(len)),
                elem: Box::new(parse_type(parser)?),
            }
        }
    };

    Ok(TypeExpr {
        id: parser.advance_id(),
        kind,
        span: parser.span_from(&start),
    })
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.expect(TokenKind::Star)?.span.start;
    let base = parse_type(parser)?;

    Ok(TypeExpr {
        id: parser.advance_id(),
        kind: TypeExprKind::Pointer(Box::new(base)),
        span: parser.span_from(&start),
    })
}

/// `struct { x, y int32; name string }`
pub fn parse_struct_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.expect(TokenKind::Struct)?.span.start;
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = Vec::new();
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::Semicolon => {
                parser.advance();
                continue;
            }
            _ => (),
        }

        let names = parse_ident_list(parser)?;
        let ty = parse_type(parser)?;
        fields.push(FieldDecl {
            id: parser.advance_id(),
            names,
            ty,
        });

        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        parser.expect(TokenKind::Semicolon)?;
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(TypeExpr {
        id: parser.advance_id(),
        kind: TypeExprKind::Struct(fields),
        span: parser.span_from(&start),
    })
}

pub fn parse_paren_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(ty)
}
