//! Storage trait seams.
//!
//! The persistence crate implements these against PostgreSQL; tests inject
//! in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EventConfig, Registration};

/// Errors surfaced by storage implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write-time constraint conflict that is NOT the registration
    /// uniqueness key (those are reported as [`InsertOutcome::DuplicateRegistration`]).
    #[error("Storage conflict: {0}")]
    Conflict(String),

    /// The store is unreachable or failed transiently. Retryable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of an insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    /// The store's uniqueness constraint on `(event, email)` fired, meaning
    /// a concurrent submission won the race. Not an error.
    DuplicateRegistration,
}

/// Registration persistence.
///
/// Implementations must never cache: the duplicate pre-check has to read
/// current state on every call.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Finds a registration by event and main-participant email. The email
    /// comparison is case-insensitive.
    async fn find_by_event_and_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<Registration>, StoreError>;

    /// Persists a registration. A uniqueness-key violation is reported as
    /// [`InsertOutcome::DuplicateRegistration`], not as an error.
    async fn insert(&self, registration: &Registration) -> Result<InsertOutcome, StoreError>;
}

/// Read access to the externally configured event catalog.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_event(&self, event_id: &str) -> Result<Option<EventConfig>, StoreError>;
}
