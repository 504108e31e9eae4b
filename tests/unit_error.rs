/// Unit tests for DiError and ContainerError
///
/// The injector decides between "miss" and "real failure" from these helpers,
/// so their exact behavior matters as much as the messages.

use ferrous_locator::{ContainerError, DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("Mailer".to_string());
    assert_eq!(error.to_string(), "Service not found: Mailer");

    let datum = DiError::DatumNotFound("settings".to_string());
    assert_eq!(datum.to_string(), "Datum not found: settings");
}

#[test]
fn test_error_display_circular() {
    let error: DiError = ContainerError::Circular(vec![
        "ServiceA".to_string(),
        "ServiceB".to_string(),
        "ServiceA".to_string(),
    ])
    .into();
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error: DiError = ContainerError::DepthExceeded {
        limit: 2,
        path: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    }
    .into();
    assert_eq!(error.to_string(), "Max depth 2 exceeded: a -> b -> c");
}

#[test]
fn test_error_display_unresolvable() {
    let error: DiError = ContainerError::Unresolvable {
        id: "db".to_string(),
        target: "Nope".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Could not make service db from string \"Nope\"");
}

#[test]
fn test_error_display_missing_datum() {
    let error: DiError = ContainerError::MissingDatum {
        service: "region".to_string(),
        datum: "settings".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Service region refers to missing datum settings");
}

#[test]
fn test_error_display_injector_failures() {
    assert_eq!(DiError::MissingParameter("mailer".to_string()).to_string(), "Missing parameter: mailer");
    assert_eq!(
        DiError::Visibility {
            target: "Mailer".to_string(),
            member: "secret".to_string(),
        }
        .to_string(),
        "Member secret of Mailer is not public"
    );
    assert_eq!(DiError::Uncallable("42".to_string()).to_string(), "Uncallable: 42");
    assert_eq!(DiError::invocation("boom").to_string(), "Invocation failed: boom");
}

#[test]
fn test_not_found_for_matches_exact_id() {
    let service = DiError::NotFound("Mailer".to_string());
    assert!(service.is_not_found_for("Mailer"));
    assert!(!service.is_not_found_for("mailer"));
    assert!(!service.is_not_found_for("Logger"));

    let datum = DiError::DatumNotFound("Mailer".to_string());
    assert!(datum.is_not_found_for("Mailer"));

    let other = DiError::MissingParameter("Mailer".to_string());
    assert!(!other.is_not_found_for("Mailer"));
}

#[test]
fn test_kind_helpers() {
    assert!(DiError::NotFound("x".to_string()).is_not_found());
    assert!(!DiError::DatumNotFound("x".to_string()).is_not_found());
    assert!(!DiError::NotFound("x".to_string()).is_container_error());

    let circular: DiError = ContainerError::Circular(vec!["x".to_string()]).into();
    assert!(circular.is_container_error());
    assert!(!circular.is_not_found());
}

#[test]
fn test_error_trait_implementation() {
    let error = DiError::NotFound("Mailer".to_string());
    let as_error: &dyn Error = &error;
    assert!(as_error.source().is_none());

    // transparent wrapper delegates to the inner error
    let wrapped: DiError = ContainerError::Circular(vec!["a".to_string()]).into();
    assert_eq!(wrapped.to_string(), ContainerError::Circular(vec!["a".to_string()]).to_string());
}

#[test]
fn test_error_equality_and_clone() {
    let error = DiError::Uncallable("thing".to_string());
    assert_eq!(error.clone(), error);
    assert_ne!(error, DiError::Uncallable("other".to_string()));
}

#[test]
fn test_di_result_alias() {
    fn lookup(found: bool) -> DiResult<i64> {
        if found {
            Ok(1)
        } else {
            Err(DiError::NotFound("thing".to_string()))
        }
    }

    assert_eq!(lookup(true).unwrap(), 1);
    assert!(lookup(false).unwrap_err().is_not_found_for("thing"));
}
