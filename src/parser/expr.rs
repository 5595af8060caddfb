use crate::{
    ast::{
        ast::Ident,
        expressions::{BinaryOp, Element, Expr, ExprKind, LiteralValue, UnaryOp},
        types::{TypeExpr, TypeExprKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected("expected expression"));
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        // `{` after a type name opens a composite literal, except in
        // if/for headers where it opens the body
        if token_kind == TokenKind::OpenCurly && (parser.no_composite || as_type_name(&left).is_none()) {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };
        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_expr_list(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut exprs = vec![parse_expr(parser, BindingPower::Default)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        exprs.push(parse_expr(parser, BindingPower::Default)?);
    }

    Ok(exprs)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::Int => ExprKind::IntLit(token.value),
        TokenKind::Float => ExprKind::FloatLit(token.value),
        TokenKind::String => ExprKind::StringLit(token.value),
        TokenKind::Rune => ExprKind::RuneLit(token.value),
        TokenKind::Identifier => ExprKind::Name(Ident {
            name: token.value,
            span: token.span.clone(),
        }),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr {
        id: parser.advance_id(),
        kind,
        span: token.span,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Or => BinaryOp::LogOr,
        TokenKind::And => BinaryOp::LogAnd,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEquals => BinaryOp::Ge,
        TokenKind::Plus | TokenKind::PlusEquals => BinaryOp::Add,
        TokenKind::Dash | TokenKind::MinusEquals => BinaryOp::Sub,
        TokenKind::Pipe | TokenKind::PipeEquals => BinaryOp::Or,
        TokenKind::Caret | TokenKind::CaretEquals => BinaryOp::Xor,
        TokenKind::Star | TokenKind::StarEquals => BinaryOp::Mul,
        TokenKind::Slash | TokenKind::SlashEquals => BinaryOp::Div,
        TokenKind::Percent | TokenKind::PercentEquals => BinaryOp::Rem,
        TokenKind::ShiftLeft | TokenKind::ShiftLeftEquals => BinaryOp::Shl,
        TokenKind::ShiftRight | TokenKind::ShiftRightEquals => BinaryOp::Shr,
        TokenKind::Ampersand | TokenKind::AmpersandEquals => BinaryOp::And,
        TokenKind::AmpCaret | TokenKind::AmpCaretEquals => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

/// Operator applied by an assignment token; `None` for plain `=`.
pub fn assign_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Assignment => None,
        _ => binary_op(kind),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(op) = binary_op(parser.current_token_kind()) else {
        return Err(parser.unexpected("expected binary operator"));
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr {
        id: parser.advance_id(),
        span: left.span.to(&right.span),
        kind: ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Dash => UnaryOp::Neg,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::Caret => UnaryOp::BitNot,
        TokenKind::Star => UnaryOp::Deref,
        TokenKind::Ampersand => UnaryOp::AddressOf,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.span.start,
            ))
        }
    };

    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr {
        id: parser.advance_id(),
        span: operator_token.span.to(&rhs.span),
        kind: ExprKind::Unary {
            op,
            operand: Box::new(rhs),
        },
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let expr = parser.with_composites(|parser| parse_expr(parser, BindingPower::Default))?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr {
        id: parser.advance_id(),
        kind: ExprKind::Paren(Box::new(expr)),
        span: parser.span_from(&start),
    })
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let args = parser.with_composites(|parser| {
        let mut args = vec![];

        while parser.current_token_kind() != TokenKind::CloseParen {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }

        parser.expect(TokenKind::CloseParen)?;
        Ok(args)
    })?;

    Ok(Expr {
        id: parser.advance_id(),
        span: parser.span_from(&left.span.start),
        kind: ExprKind::Call {
            callee: Box::new(left),
            args,
        },
    })
}

/// `a[i]`, `a[lo:hi]` and `a[lo:hi:max]`.
pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let kind = parser.with_composites(|parser| {
        let low = if parser.current_token_kind() != TokenKind::Colon {
            Some(Box::new(parse_expr(parser, BindingPower::Default)?))
        } else {
            None
        };

        if parser.current_token_kind() == TokenKind::CloseBracket {
            parser.advance();
            return match low {
                Some(index) => Ok(ExprKind::Index {
                    operand: Box::new(left),
                    index,
                }),
                None => Err(parser.unexpected("expected index")),
            };
        }

        parser.expect(TokenKind::Colon)?;

        let high = match parser.current_token_kind() {
            TokenKind::Colon | TokenKind::CloseBracket => None,
            _ => Some(Box::new(parse_expr(parser, BindingPower::Default)?)),
        };

        let max = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(Box::new(parse_expr(parser, BindingPower::Default)?))
        } else {
            None
        };

        parser.expect(TokenKind::CloseBracket)?;

        Ok(ExprKind::Slice {
            operand: Box::new(left),
            low,
            high,
            max,
        })
    })?;

    let start = match &kind {
        ExprKind::Index { operand, .. } | ExprKind::Slice { operand, .. } => operand.span.start.clone(),
        _ => parser.get_position(),
    };

    Ok(Expr {
        id: parser.advance_id(),
        span: parser.span_from(&start),
        kind,
    })
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let field = parser.expect_ident()?;

    Ok(Expr {
        id: parser.advance_id(),
        span: parser.span_from(&left.span.start),
        kind: ExprKind::Selector {
            operand: Box::new(left),
            field,
        },
    })
}

/// The type named by `expr`, if it could name one: `T` or `pkg.T`.
fn as_type_name(expr: &Expr) -> Option<TypeExprKind> {
    match &expr.kind {
        ExprKind::Name(name) => Some(TypeExprKind::Name {
            package: None,
            name: name.clone(),
        }),
        ExprKind::Selector { operand, field } => match &operand.kind {
            ExprKind::Name(package) => Some(TypeExprKind::Name {
                package: Some(package.clone()),
                name: field.clone(),
            }),
            _ => None,
        },
        _ => None,
    }
}

/// `T{...}` where `T` was parsed as an expression.
pub fn parse_composite_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let Some(kind) = as_type_name(&left) else {
        return Err(parser.unexpected("composite literal needs a type"));
    };

    let ty = TypeExpr {
        id: parser.advance_id(),
        kind,
        span: left.span.clone(),
    };

    finish_composite(parser, ty)
}

fn finish_composite(parser: &mut Parser, ty: TypeExpr) -> Result<Expr, Error> {
    let start = ty.span.start.clone();
    let value = parser.with_composites(parse_literal_value)?;

    Ok(Expr {
        id: parser.advance_id(),
        span: parser.span_from(&start),
        kind: ExprKind::Composite {
            ty,
            elements: value.elements,
        },
    })
}

/// `{ element, ... }` with an optional trailing comma.
pub fn parse_literal_value(parser: &mut Parser) -> Result<LiteralValue, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;
    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::OpenCurly {
            elements.push(Element::Literal(parse_literal_value(parser)?));
        } else {
            elements.push(Element::Expr(parse_expr(parser, BindingPower::Default)?));
        }

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(LiteralValue {
        id: parser.advance_id(),
        elements,
        span: parser.span_from(&start),
    })
}

/// An expression starting with a type that has no expression form:
/// `[]int{1, 2}`, `struct{x int}{1}` or `[]byte(s)`.
pub fn parse_type_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let ty = parse_type(parser)?;

    match parser.current_token_kind() {
        TokenKind::OpenCurly => finish_composite(parser, ty),
        TokenKind::OpenParen => {
            parser.advance();
            let arg = parser.with_composites(|parser| parse_expr(parser, BindingPower::Default))?;
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            }
            parser.expect(TokenKind::CloseParen)?;

            let span = Span {
                start: ty.span.start.clone(),
                end: parser.previous_end(),
            };

            Ok(Expr {
                id: parser.advance_id(),
                kind: ExprKind::Conversion {
                    ty,
                    arg: Box::new(arg),
                },
                span,
            })
        }
        _ => Err(parser.unexpected("expected composite literal or conversion")),
    }
}
