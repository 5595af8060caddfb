use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_line(&self) -> u32 {
        self.position.line
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::NotAType { .. } => "NotAType",
            ErrorImpl::NotAFunction => "NotAFunction",
            ErrorImpl::NonStructSelector => "NonStructSelector",
            ErrorImpl::FieldNotFound { .. } => "FieldNotFound",
            ErrorImpl::PackageNotFound { .. } => "PackageNotFound",
            ErrorImpl::PackageMemberNotFound { .. } => "PackageMemberNotFound",
            ErrorImpl::ImportNotFound { .. } => "ImportNotFound",
            ErrorImpl::NotIndexable => "NotIndexable",
            ErrorImpl::ConversionArity { .. } => "ConversionArity",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::InitializerCountMismatch { .. } => "InitializerCountMismatch",
            ErrorImpl::AssignmentCountMismatch { .. } => "AssignmentCountMismatch",
            ErrorImpl::TooManyResults => "TooManyResults",
            ErrorImpl::NotEnoughResults => "NotEnoughResults",
            ErrorImpl::ArraySizeNotInteger => "ArraySizeNotInteger",
            ErrorImpl::InvalidArraySize { .. } => "InvalidArraySize",
            ErrorImpl::ArraySizeNotConstant => "ArraySizeNotConstant",
            ErrorImpl::TooManyElements { .. } => "TooManyElements",
            ErrorImpl::StructLiteralCount { .. } => "StructLiteralCount",
            ErrorImpl::InvalidOperation { .. } => "InvalidOperation",
            ErrorImpl::MismatchedTypes { .. } => "MismatchedTypes",
            ErrorImpl::InvalidShiftCount { .. } => "InvalidShiftCount",
            ErrorImpl::InvalidIndirect { .. } => "InvalidIndirect",
            ErrorImpl::NotAddressable => "NotAddressable",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::ConstantOverflow { .. } => "ConstantOverflow",
            ErrorImpl::InvalidRecursiveType { .. } => "InvalidRecursiveType",
            ErrorImpl::ConstantCycle { .. } => "ConstantCycle",
            ErrorImpl::LabelNotDefined { .. } => "LabelNotDefined",
            ErrorImpl::BranchOutsideLoop { .. } => "BranchOutsideLoop",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon or a closing brace?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::DuplicateDeclaration { name } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope, rename one of them",
                name
            )),
            ErrorImpl::UndeclaredIdentifier { name } => {
                ErrorTip::Suggestion(format!("Declare `{}` before using it", name))
            }
            ErrorImpl::UnexpectedArguments { expected, received }
            | ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ImportNotFound { .. } => ErrorTip::Suggestion(String::from(
                "Only the fmt, strings, math and os packages are available",
            )),
            ErrorImpl::InvalidRecursiveType { name } => ErrorTip::Suggestion(format!(
                "Refer to `{}` through a pointer, slice or field instead",
                name
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.line, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("bad number: {token}")]
    NumberParseError { token: String },
    #[error("duplicate declaration of {name}")]
    DuplicateDeclaration { name: String },
    #[error("undeclared identifier: {name}")]
    UndeclaredIdentifier { name: String },
    #[error("{name} is not a type")]
    NotAType { name: String },
    #[error("arguments can be passed only to a function")]
    NotAFunction,
    #[error("dot operator applied to non-struct value")]
    NonStructSelector,
    #[error("field {field} not found")]
    FieldNotFound { field: String },
    #[error("package {package} not found")]
    PackageNotFound { package: String },
    #[error("{package}.{member} not found")]
    PackageMemberNotFound { package: String, member: String },
    #[error("package {path:?} not found")]
    ImportNotFound { path: String },
    #[error("only an array or slice can be indexed")]
    NotIndexable,
    #[error("type conversion requires one argument, received {received}")]
    ConversionArity { received: usize },
    #[error("too many arguments in function call: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("too few arguments in function call: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("type {received} is incompatible with {expected}")]
    TypeMatchError { expected: String, received: String },
    #[error("number of initializers does not match number of identifiers ({names} names, {values} values)")]
    InitializerCountMismatch { names: usize, values: usize },
    #[error("assignment requires equal numbers of terms on left and right ({left} vs {right})")]
    AssignmentCountMismatch { left: usize, right: usize },
    #[error("too many results returned from function")]
    TooManyResults,
    #[error("not enough results returned from function")]
    NotEnoughResults,
    #[error("array size is not an integer")]
    ArraySizeNotInteger,
    #[error("invalid array size: {size}")]
    InvalidArraySize { size: String },
    #[error("array size must be a constant expression")]
    ArraySizeNotConstant,
    #[error("too many values in literal: expected at most {expected}, received {received}")]
    TooManyElements { expected: usize, received: usize },
    #[error("struct literal has {received} values for {expected} fields")]
    StructLiteralCount { expected: usize, received: usize },
    #[error("operator {operator} not defined on {type_}")]
    InvalidOperation { operator: String, type_: String },
    #[error("invalid operation: {left} {operator} {right} (mismatched types)")]
    MismatchedTypes {
        operator: String,
        left: String,
        right: String,
    },
    #[error("shift count type {type_} must be an unsigned integer")]
    InvalidShiftCount { type_: String },
    #[error("invalid indirect of value of type {type_}")]
    InvalidIndirect { type_: String },
    #[error("cannot take the address of the expression")]
    NotAddressable,
    #[error("division by zero")]
    DivisionByZero,
    #[error("constant overflow in {operator} operation")]
    ConstantOverflow { operator: String },
    #[error("invalid recursive type {name}")]
    InvalidRecursiveType { name: String },
    #[error("initialization cycle for {name}")]
    ConstantCycle { name: String },
    #[error("label {label} not defined")]
    LabelNotDefined { label: String },
    #[error("{keyword} is not in a loop")]
    BranchOutsideLoop { keyword: String },
}
