/// Unit tests for DiError and DiResult types

use ferrous_container::{ContainerErrorKind, DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_service_not_found() {
    let error = DiError::ServiceNotFound("mailer".into());
    assert_eq!(error.to_string(), "Service not found: mailer");
}

#[test]
fn test_error_display_parameter_not_found() {
    let error = DiError::ParameterNotFound("db.missing".into());
    assert_eq!(error.to_string(), "Parameter not found: db.missing");
}

#[test]
fn test_error_display_unknown_class() {
    let error = DiError::container("app", ContainerErrorKind::UnknownClass("App".into()));
    assert_eq!(error.to_string(), "app service class does not exist: App");
    assert_eq!(error.service_id(), Some("app"));
}

#[test]
fn test_error_display_host_errors() {
    let arity = DiError::Arity { target: "App".into(), expected: 2, found: 1 };
    assert_eq!(arity.to_string(), "App expects 2 argument(s), got 1");

    let shape = DiError::ArgumentType {
        target: "App::boot".into(),
        index: 0,
        expected: "string",
        found: "integer",
    };
    assert_eq!(shape.to_string(), "App::boot argument #0 must be string, got integer");

    assert_eq!(DiError::host("disk full").to_string(), "Host error: disk full");
    assert_eq!(DiError::DepthExceeded(100).to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_circular_classification() {
    assert!(DiError::container("a", ContainerErrorKind::CircularReference).is_circular());
    assert!(!DiError::container("a", ContainerErrorKind::MissingClass).is_circular());
    assert!(!DiError::ServiceNotFound("a".into()).is_circular());
}

#[test]
fn test_diresult_question_mark() {
    fn inner() -> DiResult<u8> {
        Err(DiError::ParameterNotFound("x".into()))
    }
    fn outer() -> DiResult<u8> {
        let v = inner()?;
        Ok(v + 1)
    }

    assert_eq!(outer(), Err(DiError::ParameterNotFound("x".into())));
}

#[test]
fn test_error_clone() {
    let error = DiError::container("svc", ContainerErrorKind::UncallableMethod("boot".into()));
    let cloned = error.clone();
    assert_eq!(error, cloned);
    assert_eq!(format!("{}", error), format!("{}", cloned));
}

#[test]
fn test_error_as_std_error() {
    let error = DiError::ServiceNotFound("svc".into());
    let _: &dyn std::error::Error = &error;
    assert!(error.source().is_none());
}
