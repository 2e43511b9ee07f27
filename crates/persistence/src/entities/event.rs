//! Event entity (database row mapping).

use sqlx::FromRow;

use domain::models::{EventConfig, RegistrationStatus, TeamSize};

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: String,
    pub name: String,
    pub fest: Option<String>,
    pub description: Option<String>,
    pub registration_status: String,
    pub team_size_min: i32,
    pub team_size_max: i32,
}

impl EventEntity {
    /// Converts the row into the domain event configuration.
    ///
    /// The CHECK constraint keeps `registration_status` in the known set;
    /// if the column ever drifts, the event fails closed.
    pub fn into_config(self) -> EventConfig {
        let registration_status = self.registration_status.parse().unwrap_or_else(|_| {
            tracing::warn!(
                event_id = %self.id,
                status = %self.registration_status,
                "Unknown registration status in database, treating event as closed"
            );
            RegistrationStatus::Closed
        });

        EventConfig {
            id: self.id,
            name: self.name,
            fest: self.fest,
            description: self.description,
            registration_status,
            team_size: TeamSize {
                min: self.team_size_min.max(1) as u32,
                max: self.team_size_max.max(1) as u32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str) -> EventEntity {
        EventEntity {
            id: "e1".into(),
            name: "Event".into(),
            fest: None,
            description: None,
            registration_status: status.into(),
            team_size_min: 2,
            team_size_max: 4,
        }
    }

    #[test]
    fn test_into_config() {
        let config = entity("open").into_config();
        assert_eq!(config.registration_status, RegistrationStatus::Open);
        assert_eq!(config.team_size, TeamSize { min: 2, max: 4 });
        assert!(config.is_team_event());
    }

    #[test]
    fn test_unknown_status_fails_closed() {
        let config = entity("paused").into_config();
        assert_eq!(config.registration_status, RegistrationStatus::Closed);
    }
}
