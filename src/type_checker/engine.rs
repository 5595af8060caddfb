//! Assignability, type identity and operator typing.
//!
//! Every `check_*` function reports what it rejects and hands back the
//! unknown sentinel, so callers can keep going.

use crate::{
    ast::expressions::{BinaryOp, UnaryOp},
    errors::errors::ErrorImpl,
    types::types::{ConstValue, TypeId, TypeKind},
    Position,
};

use super::context::Context;

/// Reports why `src` cannot be stored into `dest`, if it cannot.
pub fn check_assignability(ctx: &mut Context, dest: TypeId, src: TypeId, position: &Position) -> bool {
    match assignability(ctx, dest, src) {
        Ok(()) => true,
        Err(error) => {
            ctx.report(error, position);
            false
        }
    }
}

pub fn is_assignable(ctx: &Context, dest: TypeId, src: TypeId) -> bool {
    assignability(ctx, dest, src).is_ok()
}

fn assignability(ctx: &Context, dest: TypeId, src: TypeId) -> Result<(), ErrorImpl> {
    if dest == src {
        return Ok(());
    }

    let types = &ctx.types;
    match (types.kind(dest), types.kind(src)) {
        (TypeKind::Unknown | TypeKind::Any | TypeKind::VariadicAny | TypeKind::Pending, _) => return Ok(()),
        (_, TypeKind::Unknown | TypeKind::Pending) => return Ok(()),

        (TypeKind::Int { .. } | TypeKind::Uint { .. }, TypeKind::Untyped(number)) if number.value.as_integer().is_some() => {
            return Ok(())
        }
        (TypeKind::Float { .. }, TypeKind::Untyped(_)) => return Ok(()),

        (TypeKind::Array { elem, size }, TypeKind::List(elems)) => {
            if *size >= 0 && elems.len() as i64 > *size {
                return Err(ErrorImpl::TooManyElements {
                    expected: *size as usize,
                    received: elems.len(),
                });
            }
            return elems.iter().try_for_each(|src| assignability(ctx, *elem, *src));
        }
        (TypeKind::Slice { elem }, TypeKind::List(elems)) => {
            return elems.iter().try_for_each(|src| assignability(ctx, *elem, *src));
        }
        (TypeKind::Struct { fields }, TypeKind::List(elems)) => {
            let fields = ctx.symbols.fields(*fields);
            if !elems.is_empty() && elems.len() != fields.len() {
                return Err(ErrorImpl::StructLiteralCount {
                    expected: fields.len(),
                    received: elems.len(),
                });
            }
            return fields
                .iter()
                .zip(elems)
                .try_for_each(|(field, src)| assignability(ctx, ctx.symbols.symbol(*field).ty, *src));
        }

        (TypeKind::Pointer { .. } | TypeKind::Slice { .. } | TypeKind::Function { .. }, TypeKind::Nil) => return Ok(()),

        (TypeKind::Aps, TypeKind::Array { .. } | TypeKind::Slice { .. } | TypeKind::String) => return Ok(()),
        (TypeKind::Aps, TypeKind::Pointer { base }) if matches!(types.kind(*base), TypeKind::Array { .. }) => {
            return Ok(())
        }

        _ => (),
    }

    if !types.is_named(dest) && !types.is_named(src) && identical_types(ctx, dest, src) {
        return Ok(());
    }

    Err(ErrorImpl::TypeMatchError {
        expected: ctx.display(dest),
        received: ctx.display(src),
    })
}

/// Named types are identical only to a type of the same name; anything
/// else is compared structurally.
pub fn identical_types(ctx: &Context, a: TypeId, b: TypeId) -> bool {
    if a == b {
        return true;
    }

    let types = &ctx.types;
    if types.is_named(a) || types.is_named(b) {
        return types.is_named(a) && types.is_named(b) && types.get(a).name == types.get(b).name;
    }

    let all_identical = |xs: &[TypeId], ys: &[TypeId]| {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| identical_types(ctx, *x, *y))
    };

    match (types.kind(a), types.kind(b)) {
        (TypeKind::Array { elem: x, size: m }, TypeKind::Array { elem: y, size: n }) => {
            m == n && identical_types(ctx, *x, *y)
        }
        (TypeKind::Slice { elem: x }, TypeKind::Slice { elem: y }) => identical_types(ctx, *x, *y),
        (TypeKind::Pointer { base: x }, TypeKind::Pointer { base: y }) => identical_types(ctx, *x, *y),
        (TypeKind::Struct { fields: x }, TypeKind::Struct { fields: y }) => {
            let xs = ctx.symbols.fields(*x);
            let ys = ctx.symbols.fields(*y);

            xs.len() == ys.len()
                && xs.iter().zip(ys).all(|(x, y)| {
                    let x = ctx.symbols.symbol(*x);
                    let y = ctx.symbols.symbol(*y);
                    x.name == y.name && identical_types(ctx, x.ty, y.ty)
                })
        }
        (
            TypeKind::Function {
                params: xp,
                results: xr,
            },
            TypeKind::Function {
                params: yp,
                results: yr,
            },
        ) => all_identical(xp, yp) && all_identical(xr, yr),
        (TypeKind::List(xs), TypeKind::List(ys)) => all_identical(xs, ys),
        (x, y) => x == y,
    }
}

/// Checks `args` against the formals of `signature` and returns the
/// first result type, or void.
pub fn check_function_call(ctx: &mut Context, signature: TypeId, args: &[TypeId], position: &Position) -> TypeId {
    let (params, results) = match ctx.types.kind(signature) {
        TypeKind::Function { params, results } => (params.clone(), results.clone()),
        TypeKind::Unknown => return ctx.builtins().unknown,
        _ => {
            ctx.report(ErrorImpl::NotAFunction, position);
            return ctx.builtins().unknown;
        }
    };

    let mut variadic = false;
    for (index, param) in params.iter().enumerate() {
        if matches!(ctx.types.kind(*param), TypeKind::VariadicAny) {
            variadic = true;
            break;
        }

        let Some(arg) = args.get(index) else {
            ctx.report(
                ErrorImpl::MissingArguments {
                    expected: params.len(),
                    received: args.len(),
                },
                position,
            );
            break;
        };
        check_assignability(ctx, *param, *arg, position);
    }

    if !variadic && args.len() > params.len() {
        ctx.report(
            ErrorImpl::UnexpectedArguments {
                expected: params.len(),
                received: args.len(),
            },
            position,
        );
    }

    results.first().copied().unwrap_or(ctx.builtins().void)
}

/// Whether `T(x)` is allowed for an `x` of type `src`.
pub fn is_convertible(ctx: &Context, dest: TypeId, src: TypeId) -> bool {
    if is_assignable(ctx, dest, src) || (ctx.types.is_numeric(dest) && ctx.types.is_numeric(src)) {
        return true;
    }

    // same underlying type under different names
    if ctx.types.kind(dest) == ctx.types.kind(src) {
        return true;
    }

    let is_byte_or_rune_slice = |ty: TypeId| match ctx.types.kind(ty) {
        TypeKind::Slice { elem } => *elem == ctx.builtins().uint8 || *elem == ctx.builtins().int32,
        _ => false,
    };

    match (is_string(ctx, dest), is_string(ctx, src)) {
        (true, false) => is_integral(ctx, src) || is_byte_or_rune_slice(src),
        (false, true) => is_byte_or_rune_slice(dest),
        _ => false,
    }
}

fn is_unknown(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.kind(ty), TypeKind::Unknown | TypeKind::Pending)
}

fn is_bool(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.kind(ty), TypeKind::Bool)
}

fn is_string(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.kind(ty), TypeKind::String)
}

/// Integer types, plus untyped constants with an integral value.
pub fn is_integral(ctx: &Context, ty: TypeId) -> bool {
    match ctx.types.untyped(ty) {
        Some(number) => number.value.as_integer().is_some(),
        None => ctx.types.is_integer(ty),
    }
}

fn is_nilable(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.kind(ty), TypeKind::Pointer { .. } | TypeKind::Slice { .. })
}

fn bits(ctx: &Context, ty: TypeId) -> u8 {
    match ctx.types.kind(ty) {
        TypeKind::Int { bits } | TypeKind::Uint { bits } | TypeKind::Float { bits } => *bits,
        _ => 0,
    }
}

/// The operand type a numeric operation yields: floats beat integers,
/// wider beats narrower, typed beats untyped.
fn higher_precision(ctx: &Context, lhs: TypeId, rhs: TypeId) -> TypeId {
    match (ctx.types.untyped(lhs), ctx.types.untyped(rhs)) {
        (Some(_), Some(right)) if matches!(right.value, ConstValue::Float(_)) => return rhs,
        (Some(_), Some(_)) => return lhs,
        (Some(_), None) => return rhs,
        (None, Some(_)) => return lhs,
        (None, None) => (),
    }

    match (ctx.types.is_float(lhs), ctx.types.is_float(rhs)) {
        (true, false) => lhs,
        (false, true) => rhs,
        _ if bits(ctx, rhs) > bits(ctx, lhs) => rhs,
        _ => lhs,
    }
}

/// An untyped constant operand takes the type of the typed one and must
/// be representable in it.
fn check_untyped_operand(ctx: &mut Context, lhs: TypeId, rhs: TypeId, position: &Position) -> bool {
    match (ctx.types.untyped(lhs).is_some(), ctx.types.untyped(rhs).is_some()) {
        (true, false) => check_assignability(ctx, rhs, lhs, position),
        (false, true) => check_assignability(ctx, lhs, rhs, position),
        _ => true,
    }
}

fn invalid_operation(ctx: &mut Context, operator: impl ToString, ty: TypeId, position: &Position) -> TypeId {
    let error = ErrorImpl::InvalidOperation {
        operator: operator.to_string(),
        type_: ctx.display(ty),
    };
    ctx.report(error, position);
    ctx.builtins().unknown
}

fn mismatched(ctx: &mut Context, op: BinaryOp, lhs: TypeId, rhs: TypeId, position: &Position) -> TypeId {
    let error = ErrorImpl::MismatchedTypes {
        operator: op.to_string(),
        left: ctx.display(lhs),
        right: ctx.display(rhs),
    };
    ctx.report(error, position);
    ctx.builtins().unknown
}

fn comparable(ctx: &Context, lhs: TypeId, rhs: TypeId) -> bool {
    (ctx.types.is_numeric(lhs) && ctx.types.is_numeric(rhs))
        || (is_string(ctx, lhs) && is_string(ctx, rhs))
        || identical_types(ctx, lhs, rhs)
        || (matches!(ctx.types.kind(lhs), TypeKind::Nil) && is_nilable(ctx, rhs))
        || (matches!(ctx.types.kind(rhs), TypeKind::Nil) && is_nilable(ctx, lhs))
}

pub fn check_bin_op(ctx: &mut Context, lhs: TypeId, rhs: TypeId, op: BinaryOp, position: &Position) -> TypeId {
    if is_unknown(ctx, lhs) || is_unknown(ctx, rhs) {
        return ctx.builtins().unknown;
    }

    if op.is_logical() {
        for ty in [lhs, rhs] {
            if !is_bool(ctx, ty) {
                return invalid_operation(ctx, op, ty, position);
            }
        }
        return ctx.builtins().boolean;
    }

    if op.is_relational() {
        if !comparable(ctx, lhs, rhs) {
            return mismatched(ctx, op, lhs, rhs, position);
        }
        let numeric = ctx.types.is_numeric(lhs) && ctx.types.is_numeric(rhs);
        if numeric && !check_untyped_operand(ctx, lhs, rhs, position) {
            return ctx.builtins().boolean;
        }
        if op.is_ordering() {
            for ty in [lhs, rhs] {
                if matches!(
                    ctx.types.kind(ty),
                    TypeKind::Bool | TypeKind::Pointer { .. } | TypeKind::Struct { .. }
                ) {
                    return invalid_operation(ctx, op, ty, position);
                }
            }
        }
        return ctx.builtins().boolean;
    }

    if op.is_shift() {
        if !is_integral(ctx, lhs) {
            return invalid_operation(ctx, op, lhs, position);
        }

        let unsigned_count = match ctx.types.untyped(rhs) {
            Some(number) => number.value.as_integer().is_some_and(|count| count >= 0),
            None => ctx.types.is_unsigned(rhs),
        };
        if !unsigned_count {
            let error = ErrorImpl::InvalidShiftCount {
                type_: ctx.display(rhs),
            };
            ctx.report(error, position);
            return ctx.builtins().unknown;
        }
        return lhs;
    }

    match op {
        BinaryOp::Add if is_string(ctx, lhs) && is_string(ctx, rhs) => ctx.builtins().string,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            for ty in [lhs, rhs] {
                if !ctx.types.is_numeric(ty) {
                    if op == BinaryOp::Add && (is_string(ctx, lhs) || is_string(ctx, rhs)) {
                        return mismatched(ctx, op, lhs, rhs, position);
                    }
                    return invalid_operation(ctx, op, ty, position);
                }
            }
            if !check_untyped_operand(ctx, lhs, rhs, position) {
                return ctx.builtins().unknown;
            }
            higher_precision(ctx, lhs, rhs)
        }
        // remainder and the bitwise operators
        _ => {
            for ty in [lhs, rhs] {
                if !is_integral(ctx, ty) {
                    return invalid_operation(ctx, op, ty, position);
                }
            }
            if !check_untyped_operand(ctx, lhs, rhs, position) {
                return ctx.builtins().unknown;
            }
            higher_precision(ctx, lhs, rhs)
        }
    }
}

pub fn check_unary_op(ctx: &mut Context, operand: TypeId, op: UnaryOp, addressable: bool, position: &Position) -> TypeId {
    if is_unknown(ctx, operand) {
        return ctx.builtins().unknown;
    }

    match op {
        UnaryOp::Plus | UnaryOp::Neg | UnaryOp::Inc | UnaryOp::Dec if ctx.types.is_numeric(operand) => operand,
        UnaryOp::Not if is_bool(ctx, operand) => operand,
        UnaryOp::BitNot if is_integral(ctx, operand) => operand,
        UnaryOp::Deref => match ctx.types.kind(operand) {
            TypeKind::Pointer { base } => *base,
            _ => {
                let error = ErrorImpl::InvalidIndirect {
                    type_: ctx.display(operand),
                };
                ctx.report(error, position);
                ctx.builtins().unknown
            }
        },
        UnaryOp::AddressOf if addressable => ctx.types.pointer(operand),
        UnaryOp::AddressOf => {
            ctx.report(ErrorImpl::NotAddressable, position);
            ctx.builtins().unknown
        }
        _ => invalid_operation(ctx, op, operand, position),
    }
}
