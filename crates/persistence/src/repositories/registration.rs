//! Repository for registration database operations.
//!
//! The unique index `idx_registrations_event_email` on
//! `(event_id, LOWER(main_email))` is the final arbiter for the
//! one-registration-per-person-per-event invariant. Concurrent submissions
//! take no application-level lock; a write-time violation of that index is
//! reported as a duplicate, not an error.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Registration;
use domain::services::{InsertOutcome, RegistrationStore, StoreError};

use crate::entities::RegistrationEntity;

/// Name of the unique index enforcing the `(event, email)` key.
const EVENT_EMAIL_UNIQUE_INDEX: &str = "idx_registrations_event_email";

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Repository for registration operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new registration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a registration by event and main-participant email,
    /// case-insensitively.
    pub async fn find_by_event_and_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, event_id, event_name, is_team_event, team_name, main_email,
                   main_participant, team_members, college_id_url, query, created_at
            FROM registrations
            WHERE event_id = $1 AND LOWER(main_email) = LOWER($2)
            "#,
        )
        .bind(event_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds the most recent registration for an email, optionally scoped
    /// to one event. Backs the post-submission confirmation lookup.
    pub async fn find_latest_by_email(
        &self,
        email: &str,
        event_id: Option<&str>,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        match event_id {
            Some(event_id) => self.find_by_event_and_email(event_id, email).await,
            None => {
                sqlx::query_as::<_, RegistrationEntity>(
                    r#"
                    SELECT id, event_id, event_name, is_team_event, team_name, main_email,
                           main_participant, team_members, college_id_url, query, created_at
                    FROM registrations
                    WHERE LOWER(main_email) = LOWER($1)
                    ORDER BY created_at DESC
                    LIMIT 1
                    "#,
                )
                .bind(email)
                .fetch_optional(&self.pool)
                .await
            }
        }
    }

    /// Persists a registration row.
    ///
    /// Returns the underlying `sqlx::Error` untranslated; the
    /// [`RegistrationStore`] impl decides how unique violations map.
    pub async fn create(&self, registration: &Registration) -> Result<(), sqlx::Error> {
        let main_participant = serde_json::to_value(&registration.main_participant)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let team_members = serde_json::to_value(&registration.team_members)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        sqlx::query(
            r#"
            INSERT INTO registrations
                (id, event_id, event_name, is_team_event, team_name, main_email,
                 main_participant, team_members, college_id_url, query, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(registration.id)
        .bind(&registration.event_id)
        .bind(&registration.event_name)
        .bind(registration.is_team_event)
        .bind(&registration.team_name)
        .bind(registration.main_participant.normalized_email())
        .bind(main_participant)
        .bind(team_members)
        .bind(&registration.college_id_url)
        .bind(&registration.query)
        .bind(registration.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Lists registrations for an event, newest first. Used by admin
    /// tooling.
    pub async fn list_by_event(
        &self,
        event_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, event_id, event_name, is_team_event, team_name, main_email,
                   main_participant, team_members, college_id_url, query, created_at
            FROM registrations
            WHERE event_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Deletes a registration by id. Used by admin tooling.
    ///
    /// Returns true if a registration was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepository {
    async fn find_by_event_and_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let entity = RegistrationRepository::find_by_event_and_email(self, event_id, email)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Duplicate check failed: {}", e)))?;
        entity
            .map(Registration::try_from)
            .transpose()
            .map_err(|e| StoreError::Unavailable(format!("Stored registration corrupt: {}", e)))
    }

    async fn insert(&self, registration: &Registration) -> Result<InsertOutcome, StoreError> {
        match self.create(registration).await {
            Ok(()) => Ok(InsertOutcome::Created),
            Err(e) => map_insert_error(e),
        }
    }
}

/// Translates a failed insert into the store contract: a violation of the
/// registration key is a duplicate, any other unique violation is a
/// conflict, everything else is retryable.
fn map_insert_error(error: sqlx::Error) -> Result<InsertOutcome, StoreError> {
    match error {
        sqlx::Error::Database(db_err) => {
            let is_unique = db_err
                .code()
                .map(|code| code.as_ref() == UNIQUE_VIOLATION)
                .unwrap_or(false);
            if is_unique && db_err.constraint() == Some(EVENT_EMAIL_UNIQUE_INDEX) {
                // A concurrent submission won the race between the
                // pre-check and this write.
                Ok(InsertOutcome::DuplicateRegistration)
            } else if is_unique {
                Err(StoreError::Conflict(format!(
                    "Unique constraint violated: {}",
                    db_err
                )))
            } else {
                Err(StoreError::Unavailable(format!("Insert failed: {}", db_err)))
            }
        }
        e => Err(StoreError::Unavailable(format!("Insert failed: {}", e))),
    }
}
