use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use domain::services::{PolicyError, StoreError, SubmissionError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    /// A policy violation about the submitted team (size bounds,
    /// intra-team duplicates).
    #[error("{0}")]
    Policy(String),

    /// The event does not accept registrations right now.
    #[error("{0}")]
    RegistrationClosed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error body per the public contract: a human message plus optional
/// per-field violations.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

/// One field-level violation with a machine-readable path
/// (e.g. `teamMembers[1].email`).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, message, Some(details))
            }
            ApiError::Policy(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::RegistrationClosed(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::InvalidToken(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".into(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable, please retry".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: message,
            details: details.filter(|d| !d.is_empty()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_errors("", &errors, &mut details);

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(errors) => errors.into(),
            SubmissionError::Policy(policy) => policy.into(),
            SubmissionError::Storage(store) => store.into(),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        if err.is_registration_closed() {
            ApiError::RegistrationClosed(err.to_string())
        } else {
            ApiError::Policy(err.to_string())
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

/// Flattens `validator`'s nested error tree into dotted camelCase paths
/// matching the wire payload, e.g. `teamMembers[0].phone`.
fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationDetail>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let path = if *field == "__all__" {
                        schema_error_path(prefix, &error.code)
                    } else {
                        join_path(prefix, field)
                    };
                    out.push(ValidationDetail {
                        field: path,
                        message: error
                            .message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_errors(&join_path(prefix, field), nested, out);
            }
            ValidationErrorsKind::List(items) => {
                let path = join_path(prefix, field);
                for (index, nested) in items {
                    flatten_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Struct-level (schema) errors land under `"__all__"`; attribute them to
/// the field the rule is actually about so the path stays machine-readable.
fn schema_error_path(prefix: &str, code: &str) -> String {
    match code {
        "team_name_required" => join_path(prefix, "team_name"),
        "other_college_required" => join_path(prefix, "other_college"),
        _ => prefix.to_string(),
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    let field = snake_to_camel(field);
    if prefix.is_empty() {
        field
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use domain::models::{Participant, RegistrationRequest, Year};
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::Validation {
                    message: "bad".into(),
                    details: vec![],
                },
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Policy("team too big".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::RegistrationClosed("closed".into()),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("no event".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ApiError::InvalidToken("bad token".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::ServiceUnavailable("db down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("team_members"), "teamMembers");
        assert_eq!(snake_to_camel("college_id_url"), "collegeIdUrl");
        assert_eq!(snake_to_camel("email"), "email");
    }

    #[test]
    fn test_policy_mapping() {
        let err: ApiError = PolicyError::Closed.into();
        assert!(matches!(err, ApiError::RegistrationClosed(_)));

        let err: ApiError = PolicyError::DuplicateTeamEmail("a@b.c".into()).into();
        match err {
            ApiError::Policy(msg) => assert!(msg.contains("a@b.c")),
            other => panic!("Expected Policy, got {:?}", other),
        }
    }

    #[test]
    fn test_store_mapping() {
        let err: ApiError = StoreError::Conflict("other key".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = StoreError::Unavailable("refused".into()).into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    fn participant(email: &str, phone: &str) -> Participant {
        Participant {
            name: "P".into(),
            email: email.into(),
            phone: phone.into(),
            roll_number: "21/1".into(),
            course: "B.Sc.".into(),
            year: Year::First,
            college: "Shivaji College".into(),
            other_college: None,
        }
    }

    #[test]
    fn test_nested_errors_flatten_to_wire_paths() {
        let request = RegistrationRequest {
            event_id: "e1".into(),
            event_name: "E".into(),
            is_team_event: true,
            team_name: Some("Team".into()),
            main_participant: participant("ok@du.ac.in", "9876543210"),
            team_members: vec![
                participant("ok2@du.ac.in", "9876543211"),
                participant("broken", "12"),
            ],
            college_id_url: "".into(),
            query: None,
        };

        let err: ApiError = request.validate().unwrap_err().into();
        let ApiError::Validation { details, .. } = err else {
            panic!("Expected validation error");
        };

        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"collegeIdUrl"));
        assert!(fields.contains(&"teamMembers[1].email"));
        assert!(fields.contains(&"teamMembers[1].phone"));
        // The valid member produced no entries.
        assert!(!fields.iter().any(|f| f.starts_with("teamMembers[0]")));
    }

    #[test]
    fn test_schema_errors_attributed_to_concrete_fields() {
        let mut other = participant("other@du.ac.in", "9876543212");
        other.college = "Other".into();
        other.other_college = None;

        // Team event without a team name, and a member whose college
        // sentinel lacks the supplementary name.
        let request = RegistrationRequest {
            event_id: "e1".into(),
            event_name: "E".into(),
            is_team_event: true,
            team_name: None,
            main_participant: participant("ok@du.ac.in", "9876543210"),
            team_members: vec![other],
            college_id_url: "url".into(),
            query: None,
        };

        let err: ApiError = request.validate().unwrap_err().into();
        let ApiError::Validation { details, .. } = err else {
            panic!("Expected validation error");
        };

        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"teamName"), "got {:?}", fields);
        assert!(
            fields.contains(&"teamMembers[0].otherCollege"),
            "got {:?}",
            fields
        );
        assert!(!fields.contains(&""), "got {:?}", fields);
    }

    #[test]
    fn test_all_violations_in_one_response() {
        let request = RegistrationRequest {
            event_id: "".into(),
            event_name: "".into(),
            is_team_event: false,
            team_name: None,
            main_participant: participant("broken", "12"),
            team_members: vec![],
            college_id_url: "".into(),
            query: None,
        };

        let err: ApiError = request.validate().unwrap_err().into();
        let ApiError::Validation { details, message } = err else {
            panic!("Expected validation error");
        };
        assert!(details.len() >= 5, "got {}: {:?}", details.len(), details);
        assert!(message.contains("validation errors"));
    }
}
