//! Registration entity (database row mapping).
//!
//! Participant details are stored as JSONB; the main participant's email is
//! additionally lifted into the `main_email` column so the uniqueness index
//! on `(event_id, LOWER(main_email))` can enforce one registration per
//! person per event.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Participant, Registration};

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub event_id: String,
    pub event_name: String,
    pub is_team_event: bool,
    pub team_name: Option<String>,
    pub main_email: String,
    pub main_participant: serde_json::Value,
    pub team_members: serde_json::Value,
    pub college_id_url: String,
    pub query: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationEntity> for Registration {
    type Error = serde_json::Error;

    fn try_from(entity: RegistrationEntity) -> Result<Self, Self::Error> {
        let main_participant: Participant = serde_json::from_value(entity.main_participant)?;
        let team_members: Vec<Participant> = serde_json::from_value(entity.team_members)?;
        Ok(Registration {
            id: entity.id,
            event_id: entity.event_id,
            event_name: entity.event_name,
            is_team_event: entity.is_team_event,
            team_name: entity.team_name,
            main_participant,
            team_members,
            college_id_url: entity.college_id_url,
            query: entity.query,
            created_at: entity.created_at,
        })
    }
}
