//! Repository for event catalog reads.
//!
//! Events are written by admin tooling only; this workflow reads them.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::EventConfig;
use domain::services::{EventSource, StoreError};

use crate::entities::EventEntity;

/// Repository for event catalog operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds an event by its identifier.
    ///
    /// Returns `None` if no event with the given id exists.
    pub async fn find_by_id(&self, event_id: &str) -> Result<Option<EventEntity>, sqlx::Error> {
        sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, fest, description, registration_status,
                   team_size_min, team_size_max
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lists the whole catalog, optionally filtered by fest.
    pub async fn list(&self, fest: Option<&str>) -> Result<Vec<EventEntity>, sqlx::Error> {
        match fest {
            Some(fest) => {
                sqlx::query_as::<_, EventEntity>(
                    r#"
                    SELECT id, name, fest, description, registration_status,
                           team_size_min, team_size_max
                    FROM events
                    WHERE fest = $1
                    ORDER BY name
                    "#,
                )
                .bind(fest)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, EventEntity>(
                    r#"
                    SELECT id, name, fest, description, registration_status,
                           team_size_min, team_size_max
                    FROM events
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }
}

#[async_trait]
impl EventSource for EventRepository {
    async fn fetch_event(&self, event_id: &str) -> Result<Option<EventConfig>, StoreError> {
        let entity = self
            .find_by_id(event_id)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Event lookup failed: {}", e)))?;
        Ok(entity.map(EventEntity::into_config))
    }
}
