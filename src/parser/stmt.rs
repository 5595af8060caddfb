use crate::{
    ast::{
        ast::{
            ConstSpec, Decl, FunctionDecl, Ident, ImportSpec, ParameterDecl, Signature, SourceFile,
            TopLevelDecl, TypeSpec, VarSpec,
        },
        expressions::ExprKind,
        statements::{Block, ElseBranch, IfStmt, SimpleStmt, Stmt, StmtKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{assign_op, parse_expr, parse_expr_list},
    lookups::BindingPower,
    parser::Parser,
    types::{at_type_start, parse_type},
};

/// `package p; import ...; decl; decl; ...`
pub fn parse_source_file(parser: &mut Parser) -> Result<SourceFile, Error> {
    let start = parser.get_position();
    let id = parser.advance_id();

    let error = parser.unexpected("expected package clause");
    parser.expect_error(TokenKind::Package, Some(error))?;
    let package = parser.expect_ident()?;
    expect_terminator(parser)?;

    let mut imports = vec![];
    while parser.current_token_kind() == TokenKind::Import {
        parser.advance();
        imports.extend(parse_group(parser, parse_import_spec)?);
        expect_terminator(parser)?;
    }

    let mut decls = vec![];
    while parser.has_tokens() {
        let decl = match parser.current_token_kind() {
            TokenKind::Func => TopLevelDecl::Function(parse_function_decl(parser)?),
            TokenKind::Const | TokenKind::Var | TokenKind::Type => TopLevelDecl::Decl(parse_decl(parser)?),
            TokenKind::Import => return Err(parser.unexpected("imports must precede declarations")),
            _ => return Err(parser.unexpected("expected declaration")),
        };
        decls.push(decl);
        expect_terminator(parser)?;
    }

    Ok(SourceFile {
        id,
        package,
        imports,
        decls,
        span: parser.span_from(&start),
    })
}

/// A `;` (possibly inserted at a line end), or the end of input.
fn expect_terminator(parser: &mut Parser) -> Result<(), Error> {
    if parser.current_token_kind() != TokenKind::EOF {
        parser.expect(TokenKind::Semicolon)?;
    }
    Ok(())
}

/// One spec, or a parenthesized list of `;`-separated specs.
fn parse_group<T>(parser: &mut Parser, parse_spec: fn(&mut Parser) -> Result<T, Error>) -> Result<Vec<T>, Error> {
    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(vec![parse_spec(parser)?]);
    }

    parser.advance();
    let mut specs = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        specs.push(parse_spec(parser)?);

        if parser.current_token_kind() == TokenKind::CloseParen {
            break;
        }
        parser.expect(TokenKind::Semicolon)?;
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(specs)
}

fn parse_import_spec(parser: &mut Parser) -> Result<ImportSpec, Error> {
    let error = parser.unexpected("expected import path");
    let token = parser.expect_error(TokenKind::String, Some(error))?;

    Ok(ImportSpec {
        id: parser.advance_id(),
        path: token.value,
        span: token.span,
    })
}

pub fn parse_ident_list(parser: &mut Parser) -> Result<Vec<Ident>, Error> {
    let mut names = vec![parser.expect_ident()?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect_ident()?);
    }

    Ok(names)
}

pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let keyword = parser.advance().kind;

    match keyword {
        TokenKind::Const => Ok(Decl::Const(parse_group(parser, parse_const_spec)?)),
        TokenKind::Type => Ok(Decl::Type(parse_group(parser, parse_type_spec)?)),
        _ => Ok(Decl::Var(parse_group(parser, parse_var_spec)?)),
    }
}

/// `a, b [T] = 1, 2`; constants always carry values.
fn parse_const_spec(parser: &mut Parser) -> Result<ConstSpec, Error> {
    let start = parser.get_position();
    let names = parse_ident_list(parser)?;

    let ty = if parser.current_token_kind() != TokenKind::Assignment {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let error = parser.unexpected("expected = in constant declaration");
    parser.expect_error(TokenKind::Assignment, Some(error))?;
    let values = parse_expr_list(parser)?;

    Ok(ConstSpec {
        id: parser.advance_id(),
        names,
        ty,
        values,
        span: parser.span_from(&start),
    })
}

fn parse_type_spec(parser: &mut Parser) -> Result<TypeSpec, Error> {
    let start = parser.get_position();
    let name = parser.expect_ident()?;
    let ty = parse_type(parser)?;

    Ok(TypeSpec {
        id: parser.advance_id(),
        name,
        ty,
        span: parser.span_from(&start),
    })
}

/// `a, b T`, `a, b = 1, 2` or `a, b T = 1, 2`
fn parse_var_spec(parser: &mut Parser) -> Result<VarSpec, Error> {
    let start = parser.get_position();
    let names = parse_ident_list(parser)?;

    let ty = if parser.current_token_kind() != TokenKind::Assignment {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let values = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        parse_expr_list(parser)?
    } else {
        vec![]
    };

    Ok(VarSpec {
        id: parser.advance_id(),
        names,
        ty,
        values,
        span: parser.span_from(&start),
    })
}

/// `func name(params) result { body }`; the body is optional.
pub fn parse_function_decl(parser: &mut Parser) -> Result<FunctionDecl, Error> {
    let start = parser.expect(TokenKind::Func)?.span.start;
    let name = parser.expect_ident()?;
    let signature = parse_signature(parser)?;

    let body = if parser.current_token_kind() == TokenKind::OpenCurly {
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(FunctionDecl {
        id: parser.advance_id(),
        name,
        signature,
        body,
        span: parser.span_from(&start),
    })
}

fn parse_signature(parser: &mut Parser) -> Result<Signature, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let names = parse_ident_list(parser)?;
        let ty = parse_type(parser)?;
        params.push(ParameterDecl {
            id: parser.advance_id(),
            names,
            ty,
        });

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::CloseParen)?;

    let result = if at_type_start(parser) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    Ok(Signature {
        id: parser.advance_id(),
        params,
        result,
        span: parser.span_from(&start),
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return stmt_fn(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind(1) == TokenKind::Colon {
        return parse_labeled_stmt(parser);
    }

    let start = parser.get_position();
    let simple = parse_simple_stmt(parser)?;

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::Simple(simple),
        span: parser.span_from(&start),
    })
}

/// `{ stmt; stmt; ... }`. The `;` before the closing brace may be omitted.
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut stmts = Vec::new();
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::Semicolon => {
                parser.advance();
                continue;
            }
            _ => (),
        }

        stmts.push(parse_stmt(parser)?);

        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        parser.expect(TokenKind::Semicolon)?;
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Block {
        id: parser.advance_id(),
        stmts,
        span: parser.span_from(&start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let block = parse_block(parser)?;

    Ok(Stmt {
        id: parser.advance_id(),
        span: block.span.clone(),
        kind: StmtKind::Block(block),
    })
}

pub fn parse_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let decl = parse_decl(parser)?;

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::Decl(decl),
        span: parser.span_from(&start),
    })
}

fn parse_labeled_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let label = parser.expect_ident()?;
    parser.expect(TokenKind::Colon)?;

    let stmt = match parser.current_token_kind() {
        TokenKind::CloseCurly | TokenKind::Semicolon => Stmt {
            id: parser.advance_id(),
            kind: StmtKind::Simple(SimpleStmt::Empty),
            span: parser.span_from(&start),
        },
        _ => parse_stmt(parser)?,
    };

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::Labeled {
            label,
            stmt: Box::new(stmt),
        },
        span: parser.span_from(&start),
    })
}

/// Expression, `++`/`--`, assignment or short variable declaration.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<SimpleStmt, Error> {
    let lhs = parse_expr_list(parser)?;
    let kind = parser.current_token_kind();

    if kind == TokenKind::Define {
        let mut names = Vec::with_capacity(lhs.len());
        for expr in lhs {
            match expr.kind {
                ExprKind::Name(name) => names.push(name),
                _ => {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: String::from(":="),
                            message: String::from("non-name on left side of :="),
                        },
                        expr.span.start,
                    ))
                }
            }
        }

        parser.advance();
        let values = parse_expr_list(parser)?;
        return Ok(SimpleStmt::ShortVarDecl { names, values });
    }

    if kind.is_assign_op() {
        parser.advance();
        let rhs = parse_expr_list(parser)?;
        return Ok(SimpleStmt::Assign {
            lhs,
            op: assign_op(kind),
            rhs,
        });
    }

    let mut lhs = lhs;
    if lhs.len() > 1 {
        return Err(parser.unexpected("expected := or = after expression list"));
    }
    let Some(expr) = lhs.pop() else {
        return Err(parser.unexpected("expected expression"));
    };

    match kind {
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            parser.advance();
            Ok(SimpleStmt::IncDec {
                expr,
                increment: kind == TokenKind::PlusPlus,
            })
        }
        _ => Ok(SimpleStmt::Expr(expr)),
    }
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let values = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly => vec![],
        _ => parse_expr_list(parser)?,
    };

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::Return(values),
        span: parser.span_from(&start),
    })
}

/// `break [L]`, `continue [L]` and `goto L`.
pub fn parse_branch_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    let label = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.expect_ident()?)
    } else {
        None
    };

    let kind = match token.kind {
        TokenKind::Break => StmtKind::Break(label),
        TokenKind::Continue => StmtKind::Continue(label),
        _ => match label {
            Some(label) => StmtKind::Goto(label),
            None => return Err(parser.unexpected("expected label after goto")),
        },
    };

    Ok(Stmt {
        id: parser.advance_id(),
        kind,
        span: parser.span_from(&token.span.start),
    })
}

/// `if [init;] cond { ... } [else (if ... | { ... })]`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;

    let (init, cond) = parser.without_composites(|parser| {
        let first = if parser.current_token_kind() == TokenKind::Semicolon {
            SimpleStmt::Empty
        } else {
            parse_simple_stmt(parser)?
        };

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            let cond = parse_expr(parser, BindingPower::Default)?;
            return Ok((Some(first), cond));
        }

        match first {
            SimpleStmt::Expr(cond) => Ok((None, cond)),
            _ => Err(parser.unexpected("expected condition in if statement")),
        }
    })?;

    let then = parse_block(parser)?;

    let otherwise = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        match parser.current_token_kind() {
            TokenKind::If => Some(ElseBranch::If(Box::new(parse_if_stmt(parser)?))),
            TokenKind::OpenCurly => Some(ElseBranch::Block(parse_block(parser)?)),
            _ => return Err(parser.unexpected("expected if statement or block after else")),
        }
    } else {
        None
    };

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::If(IfStmt {
            init,
            cond,
            then,
            otherwise,
        }),
        span: parser.span_from(&start),
    })
}

/// `for { }`, `for cond { }` or `for [init]; [cond]; [post] { }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::For)?.span.start;

    let (init, cond, post) = parser.without_composites(|parser| {
        if parser.current_token_kind() == TokenKind::OpenCurly {
            return Ok((None, None, None));
        }

        let first = if parser.current_token_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(parse_simple_stmt(parser)?)
        };

        if parser.current_token_kind() != TokenKind::Semicolon {
            return match first {
                Some(SimpleStmt::Expr(cond)) => Ok((None, Some(cond), None)),
                _ => Err(parser.unexpected("expected for loop condition")),
            };
        }

        parser.advance();
        let cond = if parser.current_token_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(parse_expr(parser, BindingPower::Default)?)
        };
        parser.expect(TokenKind::Semicolon)?;

        let post = if parser.current_token_kind() == TokenKind::OpenCurly {
            None
        } else {
            Some(parse_simple_stmt(parser)?)
        };

        Ok((first, cond, post))
    })?;

    let body = parse_block(parser)?;

    Ok(Stmt {
        id: parser.advance_id(),
        kind: StmtKind::For {
            init,
            cond,
            post,
            body,
        },
        span: parser.span_from(&start),
    })
}
