//! Unit tests for error handling.

use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at_line(line: u32) -> Position {
    Position::new(0, line, Rc::new("test.go".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::new(10, 1, Rc::new("test.go".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().offset, 10);
}

#[test]
fn test_error_display_carries_line() {
    let error = Error::new(
        ErrorImpl::UndeclaredIdentifier {
            name: "foo".to_string(),
        },
        at_line(7),
    );

    assert_eq!(error.to_string(), "line 7: undeclared identifier: foo");
    assert_eq!(error.get_line(), 7);
}

#[test]
fn test_type_mismatch_message() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: "Days".to_string(),
            received: "Kilograms".to_string(),
        },
        at_line(12),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(
        error.get_internal().to_string(),
        "type Kilograms is incompatible with Days"
    );
}

#[test]
fn test_arity_messages() {
    let too_many = ErrorImpl::UnexpectedArguments {
        expected: 2,
        received: 3,
    };
    let too_few = ErrorImpl::MissingArguments {
        expected: 2,
        received: 1,
    };

    assert!(too_many.to_string().starts_with("too many arguments in function call"));
    assert!(too_few.to_string().starts_with("too few arguments in function call"));
}

#[test]
fn test_qualified_member_message() {
    let error = ErrorImpl::PackageMemberNotFound {
        package: "fmt".to_string(),
        member: "Prinln".to_string(),
    };

    assert_eq!(error.to_string(), "fmt.Prinln not found");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::NotIndexable, at_line(1));

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        at_line(1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostics_counts_reports() {
    let mut diagnostics = Diagnostics::new();
    assert!(!diagnostics.has_errors());

    diagnostics.report(
        ErrorImpl::DuplicateDeclaration {
            name: "x".to_string(),
        },
        at_line(3),
    );
    diagnostics.report(ErrorImpl::TooManyResults, at_line(9));

    assert_eq!(diagnostics.error_count(), 2);
    assert_eq!(
        diagnostics
            .errors()
            .iter()
            .map(|error| error.get_internal().to_string())
            .collect::<Vec<_>>(),
        vec![
            "duplicate declaration of x".to_string(),
            "too many results returned from function".to_string()
        ]
    );
    assert_eq!(diagnostics.errors()[1].get_line(), 9);
}
