//! Registration models: the submission payload, the persisted record and
//! the wire responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::event::EventConfig;
use super::participant::Participant;

/// Raw submission payload for the registration endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_team_name", skip_on_field_errors = false))]
pub struct RegistrationRequest {
    #[validate(length(min = 1, message = "Event id is required"))]
    pub event_id: String,

    #[validate(length(min = 1, message = "Event name is required"))]
    pub event_name: String,

    #[serde(default)]
    pub is_team_event: bool,

    #[serde(default)]
    pub team_name: Option<String>,

    #[validate(nested)]
    pub main_participant: Participant,

    #[serde(default)]
    #[validate(nested)]
    pub team_members: Vec<Participant>,

    /// Reference to the uploaded college ID document. The upload itself is
    /// handled elsewhere; this workflow only requires the reference.
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub college_id_url: String,

    #[serde(default)]
    pub query: Option<String>,
}

impl RegistrationRequest {
    /// Team size as recomputed on the server. Client-declared sizes are
    /// never trusted.
    pub fn team_size(&self) -> u32 {
        1 + self.team_members.len() as u32
    }
}

/// Team events must carry a non-empty team name.
fn validate_team_name(request: &RegistrationRequest) -> Result<(), ValidationError> {
    if request.is_team_event
        && request
            .team_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
    {
        let mut err = ValidationError::new("team_name_required");
        err.message = Some("Team name is required for team events".into());
        return Err(err);
    }
    Ok(())
}

/// A persisted registration. Created once on first successful submission
/// and never mutated by the public workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: String,
    pub event_name: String,
    pub is_team_event: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub main_participant: Participant,
    pub team_members: Vec<Participant>,
    pub college_id_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Builds the record to persist from a validated, policy-checked
    /// request.
    pub fn from_request(request: RegistrationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            event_name: request.event_name,
            is_team_event: request.is_team_event,
            team_name: request.team_name,
            main_participant: request.main_participant,
            team_members: request.team_members,
            college_id_url: request.college_id_url,
            query: request.query,
            created_at: Utc::now(),
        }
    }

    pub fn team_size(&self) -> u32 {
        1 + self.team_members.len() as u32
    }
}

/// Response body for the submission endpoint. The token shape is identical
/// on the new-registration and already-registered paths; only the
/// discriminator flags differ.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_registered: Option<bool>,
    pub registration_token: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

impl SubmissionResponse {
    pub fn created(token: String, email_sent: bool) -> Self {
        Self {
            success: Some(true),
            already_registered: None,
            registration_token: token,
            message: "Registration successful".into(),
            email_sent: Some(email_sent),
        }
    }

    pub fn already_registered(token: String) -> Self {
        Self {
            success: None,
            already_registered: Some(true),
            registration_token: token,
            message: "You are already registered for this event".into(),
            email_sent: None,
        }
    }
}

/// Response body for the post-submission confirmation lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationLookup {
    pub registration: Registration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participant::Year;

    fn participant(email: &str, phone: &str) -> Participant {
        Participant {
            name: "Test Participant".into(),
            email: email.into(),
            phone: phone.into(),
            roll_number: "21/1001".into(),
            course: "B.Tech".into(),
            year: Year::First,
            college: "Shivaji College".into(),
            other_college: None,
        }
    }

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            event_id: "techelons-code-sprint".into(),
            event_name: "Code Sprint".into(),
            is_team_event: false,
            team_name: None,
            main_participant: participant("alice@du.ac.in", "9876543210"),
            team_members: vec![],
            college_id_url: "https://uploads.example.com/id/123.png".into(),
            query: None,
        }
    }

    #[test]
    fn test_valid_individual_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_team_event_requires_team_name() {
        let mut req = request();
        req.is_team_event = true;
        req.team_name = None;
        assert!(req.validate().is_err());

        req.team_name = Some("  ".into());
        assert!(req.validate().is_err());

        req.team_name = Some("Null Pointers".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_nested_member_errors_surface() {
        let mut req = request();
        req.team_members = vec![participant("broken", "12345")];
        let errors = req.validate().unwrap_err();
        // The nested list entry carries the member's field errors.
        assert!(errors.errors().contains_key("team_members"));
    }

    #[test]
    fn test_missing_document_reference() {
        let mut req = request();
        req.college_id_url = "  ".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("college_id_url"));
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let mut req = request();
        req.event_id = "".into();
        req.college_id_url = "".into();
        req.main_participant.email = "broken".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().len() >= 3);
    }

    #[test]
    fn test_server_side_team_size() {
        let mut req = request();
        assert_eq!(req.team_size(), 1);
        req.team_members = vec![
            participant("b@du.ac.in", "9876543211"),
            participant("c@du.ac.in", "9876543212"),
        ];
        assert_eq!(req.team_size(), 3);
    }

    #[test]
    fn test_camel_case_payload_shape() {
        let json = serde_json::json!({
            "eventId": "e1",
            "eventName": "Event One",
            "isTeamEvent": false,
            "mainParticipant": {
                "name": "Alice",
                "email": "alice@du.ac.in",
                "phone": "9876543210",
                "rollNumber": "21/1",
                "course": "B.Sc.",
                "year": "2nd",
                "college": "Shivaji College"
            },
            "collegeIdUrl": "https://uploads.example.com/id.png"
        });
        let req: RegistrationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.event_id, "e1");
        assert_eq!(req.main_participant.roll_number, "21/1");
        assert!(req.team_members.is_empty());
    }

    #[test]
    fn test_submission_response_shapes() {
        let created = SubmissionResponse::created("tok".into(), false);
        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["registrationToken"], "tok");
        assert_eq!(value["emailSent"], false);
        assert!(value.get("alreadyRegistered").is_none());

        let dup = SubmissionResponse::already_registered("tok".into());
        let value = serde_json::to_value(&dup).unwrap();
        assert_eq!(value["alreadyRegistered"], true);
        assert_eq!(value["registrationToken"], "tok");
        assert!(value.get("success").is_none());
    }
}
