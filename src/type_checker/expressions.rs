//! Expression typing for the second pass, including constant folding.

use crate::{
    ast::{
        ast::Ident,
        expressions::{BinaryOp, Element, Expr, ExprKind, UnaryOp},
        types::{ArrayLength, TypeExprKind},
    },
    errors::errors::ErrorImpl,
    symbols::symbol::{Symbol, SymbolId, SymbolKind},
    types::types::{ConstValue, TypeId, TypeKind},
    Position,
};

use super::{
    engine::{check_assignability, check_bin_op, check_function_call, check_unary_op, is_convertible},
    resolver::{resolve_type, Resolver},
};

/// Types `expr`, records the type for its node and returns it.
pub fn check_expr(resolver: &mut Resolver, expr: &Expr) -> TypeId {
    let position = &expr.span.start;

    let ty = match &expr.kind {
        ExprKind::IntLit(text) | ExprKind::FloatLit(text) => resolver.ctx.untyped_number(text, position),
        ExprKind::StringLit(_) => resolver.ctx.builtins().string,
        ExprKind::RuneLit(_) => resolver.ctx.builtins().int32,
        ExprKind::Name(name) => check_name(resolver, name),
        ExprKind::Paren(inner) => check_expr(resolver, inner),
        ExprKind::Composite { ty, elements } => {
            let literal_ty = resolve_type(resolver, ty);
            let values = check_elements(resolver, elements);

            // `[...]T` takes its length from the elements
            let literal_ty = match (&ty.kind, resolver.ctx.types.kind(literal_ty)) {
                (
                    TypeExprKind::Array {
                        len: ArrayLength::Inferred,
                        ..
                    },
                    TypeKind::Array { elem, .. },
                ) => {
                    let elem = *elem;
                    let array = resolver.ctx.types.array(elem, elements.len() as i64);
                    resolver.ctx.save_type(ty.id, array)
                }
                _ => literal_ty,
            };

            check_assignability(resolver.ctx, literal_ty, values, position);
            literal_ty
        }
        ExprKind::Selector { operand, field } => check_selector(resolver, operand, field),
        ExprKind::Index { operand, index } => {
            let operand_ty = check_expr(resolver, operand);
            let index_ty = check_expr(resolver, index);
            let int = resolver.ctx.builtins().int;
            check_assignability(resolver.ctx, int, index_ty, &index.span.start);

            match resolver.ctx.types.kind(indirect_array(resolver, operand_ty)) {
                TypeKind::Array { elem, .. } | TypeKind::Slice { elem } => *elem,
                TypeKind::String => resolver.ctx.builtins().uint8,
                TypeKind::Unknown => resolver.unknown(),
                _ => {
                    resolver.ctx.report(ErrorImpl::NotIndexable, position);
                    resolver.unknown()
                }
            }
        }
        ExprKind::Slice {
            operand,
            low,
            high,
            max,
        } => {
            let operand_ty = check_expr(resolver, operand);
            for bound in [low, high, max].into_iter().flatten() {
                let bound_ty = check_expr(resolver, bound);
                let int = resolver.ctx.builtins().int;
                check_assignability(resolver.ctx, int, bound_ty, &bound.span.start);
            }

            match resolver.ctx.types.kind(indirect_array(resolver, operand_ty)) {
                TypeKind::Array { elem, .. } | TypeKind::Slice { elem } => {
                    let elem = *elem;
                    resolver.ctx.types.slice(elem)
                }
                TypeKind::String => operand_ty,
                TypeKind::Unknown => resolver.unknown(),
                _ => {
                    resolver.ctx.report(ErrorImpl::NotIndexable, position);
                    resolver.unknown()
                }
            }
        }
        ExprKind::Call { callee, args } => check_call(resolver, callee, args, position),
        ExprKind::Conversion { ty, arg } => {
            let target = resolve_type(resolver, ty);
            let arg_ty = check_expr(resolver, arg);
            check_conversion(resolver, target, arg_ty, position)
        }
        ExprKind::Unary { op, operand } => {
            let operand_ty = check_expr(resolver, operand);
            match fold_unary(resolver, *op, operand_ty, position) {
                Some(folded) => folded,
                None => {
                    let addressable = is_addressable(resolver, operand);
                    check_unary_op(resolver.ctx, operand_ty, *op, addressable, position)
                }
            }
        }
        ExprKind::Binary { op, left, right } => {
            let lhs = check_expr(resolver, left);
            let rhs = check_expr(resolver, right);
            match fold_binary(resolver, *op, lhs, rhs, position) {
                Some(folded) => folded,
                None => check_bin_op(resolver.ctx, lhs, rhs, *op, position),
            }
        }
    };

    resolver.ctx.save_type(expr.id, ty)
}

/// An undeclared name is reported once: a placeholder symbol is left
/// behind in the current scope.
fn check_name(resolver: &mut Resolver, name: &Ident) -> TypeId {
    if let Some(id) = resolver.ctx.symbols.resolve(resolver.scope, &name.name) {
        let symbol = resolver.ctx.symbols.symbol(id);
        if symbol.kind == SymbolKind::Constant
            && resolver.is_package(symbol.scope)
            && !resolver.resolve_constant(&name.name)
        {
            resolver.ctx.report(
                ErrorImpl::ConstantCycle {
                    name: name.name.clone(),
                },
                &name.span.start,
            );
            return resolver.unknown();
        }

        let symbol = resolver.ctx.symbols.symbol(id);
        return match symbol.kind {
            SymbolKind::Package { .. } => resolver.unknown(),
            _ => symbol.ty,
        };
    }

    let unknown = resolver.unknown();
    let placeholder = Symbol::new(&name.name, SymbolKind::Unknown, unknown, name.line());
    resolver.ctx.define(resolver.scope, placeholder, &name.span.start);
    resolver.ctx.report(
        ErrorImpl::UndeclaredIdentifier {
            name: name.name.clone(),
        },
        &name.span.start,
    );
    unknown
}

/// Element values of a composite literal as a type list. Nested `{...}`
/// values become nested lists.
fn check_elements(resolver: &mut Resolver, elements: &[Element]) -> TypeId {
    let types = elements
        .iter()
        .map(|element| match element {
            Element::Expr(expr) => check_expr(resolver, expr),
            Element::Literal(value) => {
                let list = check_elements(resolver, &value.elements);
                resolver.ctx.save_type(value.id, list)
            }
        })
        .collect();

    resolver.ctx.types.type_list(types)
}

/// The package member named by `operand.field`, when `operand` names an
/// imported package.
fn package_member(resolver: &Resolver, operand: &Expr, field: &Ident) -> Option<Option<SymbolId>> {
    let ExprKind::Name(package) = &operand.kind else {
        return None;
    };

    let id = resolver.ctx.symbols.resolve(resolver.scope, &package.name)?;
    match resolver.ctx.symbols.symbol(id).kind {
        SymbolKind::Package { members } => Some(resolver.ctx.symbols.resolve_in_current(members, &field.name)),
        _ => None,
    }
}

fn check_selector(resolver: &mut Resolver, operand: &Expr, field: &Ident) -> TypeId {
    if let Some(member) = package_member(resolver, operand, field) {
        let void = resolver.ctx.builtins().void;
        resolver.ctx.save_type(operand.id, void);

        return match member {
            Some(id) => resolver.ctx.symbols.symbol(id).ty,
            None => {
                let package = match &operand.kind {
                    ExprKind::Name(package) => package.name.clone(),
                    _ => String::new(),
                };
                resolver.ctx.report(
                    ErrorImpl::PackageMemberNotFound {
                        package,
                        member: field.name.clone(),
                    },
                    &field.span.start,
                );
                resolver.unknown()
            }
        };
    }

    let operand_ty = check_expr(resolver, operand);

    // one implicit dereference
    let base = match resolver.ctx.types.kind(operand_ty) {
        TypeKind::Pointer { base } => *base,
        _ => operand_ty,
    };

    match resolver.ctx.types.kind(base) {
        TypeKind::Struct { fields } => match resolver.ctx.symbols.field(*fields, &field.name) {
            Some(id) => resolver.ctx.symbols.symbol(id).ty,
            None => {
                resolver.ctx.report(
                    ErrorImpl::FieldNotFound {
                        field: field.name.clone(),
                    },
                    &field.span.start,
                );
                resolver.unknown()
            }
        },
        TypeKind::Unknown => resolver.unknown(),
        _ => {
            resolver.ctx.report(ErrorImpl::NonStructSelector, &field.span.start);
            resolver.unknown()
        }
    }
}

/// A pointer to an array indexes and slices like the array.
fn indirect_array(resolver: &Resolver, ty: TypeId) -> TypeId {
    match resolver.ctx.types.kind(ty) {
        TypeKind::Pointer { base } if matches!(resolver.ctx.types.kind(*base), TypeKind::Array { .. }) => *base,
        _ => ty,
    }
}

/// The type `callee` names, if a call through it is a conversion.
fn conversion_target(resolver: &Resolver, callee: &Expr) -> Option<TypeId> {
    let symbol = match &callee.kind {
        ExprKind::Paren(inner) => return conversion_target(resolver, inner),
        ExprKind::Name(name) => resolver.ctx.symbols.resolve(resolver.scope, &name.name)?,
        ExprKind::Selector { operand, field } => package_member(resolver, operand, field)??,
        _ => return None,
    };

    let symbol = resolver.ctx.symbols.symbol(symbol);
    match symbol.kind {
        SymbolKind::TypeName => Some(symbol.ty),
        _ => None,
    }
}

fn check_call(resolver: &mut Resolver, callee: &Expr, args: &[Expr], position: &Position) -> TypeId {
    if let Some(target) = conversion_target(resolver, callee) {
        resolver.ctx.save_type(callee.id, target);

        let arg_types: Vec<TypeId> = args.iter().map(|arg| check_expr(resolver, arg)).collect();
        if arg_types.len() != 1 {
            resolver.ctx.report(
                ErrorImpl::ConversionArity {
                    received: arg_types.len(),
                },
                position,
            );
            return target;
        }
        return check_conversion(resolver, target, arg_types[0], position);
    }

    let callee_ty = check_expr(resolver, callee);
    let arg_types: Vec<TypeId> = args.iter().map(|arg| check_expr(resolver, arg)).collect();

    match resolver.ctx.types.kind(callee_ty) {
        TypeKind::Function { .. } => check_function_call(resolver.ctx, callee_ty, &arg_types, position),
        TypeKind::Unknown => resolver.unknown(),
        _ => {
            resolver.ctx.report(ErrorImpl::NotAFunction, position);
            resolver.unknown()
        }
    }
}

fn check_conversion(resolver: &mut Resolver, target: TypeId, arg: TypeId, position: &Position) -> TypeId {
    if !is_convertible(resolver.ctx, target, arg) {
        let error = ErrorImpl::TypeMatchError {
            expected: resolver.ctx.display(target),
            received: resolver.ctx.display(arg),
        };
        resolver.ctx.report(error, position);
    }
    target
}

/// Whether `&expr` is allowed.
pub fn is_addressable(resolver: &Resolver, expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Name(name) => resolver
            .ctx
            .symbols
            .resolve(resolver.scope, &name.name)
            .is_some_and(|id| {
                matches!(
                    resolver.ctx.symbols.symbol(id).kind,
                    SymbolKind::Variable | SymbolKind::Formal | SymbolKind::Unknown
                )
            }),
        ExprKind::Selector { operand, field } => match package_member(resolver, operand, field) {
            Some(member) => member.is_some_and(|id| resolver.ctx.symbols.symbol(id).kind == SymbolKind::Variable),
            None => true,
        },
        ExprKind::Index { .. } | ExprKind::Composite { .. } => true,
        ExprKind::Unary {
            op: UnaryOp::Deref, ..
        } => true,
        ExprKind::Paren(inner) => is_addressable(resolver, inner),
        _ => false,
    }
}

fn constant_value(resolver: &Resolver, ty: TypeId) -> Option<ConstValue> {
    resolver.ctx.types.untyped(ty).map(|number| number.value)
}

fn finish_fold(resolver: &mut Resolver, result: Result<ConstValue, ErrorImpl>, position: &Position) -> TypeId {
    match result {
        Ok(value) => resolver.ctx.types.untyped_value(value),
        Err(error) => {
            resolver.ctx.report(error, position);
            resolver.unknown()
        }
    }
}

/// Folds `-c`, `+c` and `^c` on an untyped constant. `None` leaves the
/// expression to the operator rules.
fn fold_unary(resolver: &mut Resolver, op: UnaryOp, operand: TypeId, position: &Position) -> Option<TypeId> {
    let value = constant_value(resolver, operand)?;

    let result = match (op, value) {
        (UnaryOp::Plus, _) => return Some(operand),
        (UnaryOp::Neg, ConstValue::Int(value)) => value.checked_neg().map(ConstValue::Int).ok_or(overflow(op)),
        (UnaryOp::Neg, ConstValue::Float(value)) => Ok(ConstValue::Float(-value)),
        (UnaryOp::BitNot, ConstValue::Int(value)) => Ok(ConstValue::Int(!value)),
        _ => return None,
    };

    Some(finish_fold(resolver, result, position))
}

/// Folds a binary operation on two untyped constants.
fn fold_binary(resolver: &mut Resolver, op: BinaryOp, lhs: TypeId, rhs: TypeId, position: &Position) -> Option<TypeId> {
    if op.is_logical() || op.is_relational() {
        return None;
    }

    let left = constant_value(resolver, lhs)?;
    let right = constant_value(resolver, rhs)?;

    let result = match (left, right) {
        (ConstValue::Int(a), ConstValue::Int(b)) => fold_integers(op, a, b),
        _ => fold_floats(op, left.as_float(), right.as_float())?,
    };

    Some(finish_fold(resolver, result, position))
}

fn overflow(op: impl ToString) -> ErrorImpl {
    ErrorImpl::ConstantOverflow {
        operator: op.to_string(),
    }
}

fn fold_integers(op: BinaryOp, a: i64, b: i64) -> Result<ConstValue, ErrorImpl> {
    let value = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(ErrorImpl::DivisionByZero),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Rem => a.checked_rem(b),
        BinaryOp::Or => Some(a | b),
        BinaryOp::Xor => Some(a ^ b),
        BinaryOp::And => Some(a & b),
        BinaryOp::AndNot => Some(a & !b),
        BinaryOp::Shl | BinaryOp::Shr if b < 0 => {
            return Err(ErrorImpl::InvalidShiftCount {
                type_: format!("({})", b),
            })
        }
        BinaryOp::Shl if b >= 64 => (a == 0).then_some(0),
        BinaryOp::Shl => {
            let shifted = a << b;
            (shifted >> b == a).then_some(shifted)
        }
        BinaryOp::Shr if b >= 64 => Some(if a < 0 { -1 } else { 0 }),
        BinaryOp::Shr => Some(a >> b),
        // logical and relational operators are never folded
        _ => Some(a),
    };

    value.map(ConstValue::Int).ok_or(overflow(op))
}

/// Floating folds cover `+ - * /` only.
fn fold_floats(op: BinaryOp, a: f64, b: f64) -> Option<Result<ConstValue, ErrorImpl>> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div if b == 0.0 => return Some(Err(ErrorImpl::DivisionByZero)),
        BinaryOp::Div => a / b,
        _ => return None,
    };

    if !value.is_finite() {
        return Some(Err(overflow(op)));
    }
    Some(Ok(ConstValue::Float(value)))
}
