//! Idempotent registration submission workflow.
//!
//! Orchestrates validate → policy check → duplicate pre-check → persist →
//! notify, in that order. Exactly one persisted registration exists per
//! `(event, email)` pair regardless of client retries: the pre-check reads
//! current state, and a uniqueness-key violation at write time (a race with
//! the pre-check) is remapped to the same already-registered outcome.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::models::{EventConfig, Registration, RegistrationRequest};
use crate::services::notification::{NotificationResult, RegistrationNotifier};
use crate::services::policy::{self, PolicyError};
use crate::services::store::{InsertOutcome, RegistrationStore, StoreError};

/// Terminal outcome of a submission. The token shape is identical on both
/// success paths; `already_registered` distinguishes them for messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub token: String,
    pub already_registered: bool,
    /// Advisory only; a failed confirmation email never fails the
    /// submission.
    pub email_sent: bool,
}

/// Rejection or failure of a submission. Conflict-with-self is not here:
/// "already registered" is a successful receipt, not an error.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// The submission workflow over injectable store and notifier seams.
pub struct SubmissionService {
    store: Arc<dyn RegistrationStore>,
    notifier: Arc<dyn RegistrationNotifier>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn RegistrationStore>, notifier: Arc<dyn RegistrationNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Handles one submission against the given event configuration.
    ///
    /// Validation and policy errors never reach the store; storage
    /// failures after the record is persisted cannot occur in this flow
    /// (notification is the only later step and is error-swallowed).
    pub async fn submit(
        &self,
        event: &EventConfig,
        request: RegistrationRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        request.validate()?;
        policy::admit(event, &request)?;

        let email = request.main_participant.normalized_email();
        let token = shared::token::encode_email(&request.main_participant.email);

        // Duplicate pre-check. Always reads current state; never cached.
        if self
            .store
            .find_by_event_and_email(&request.event_id, &email)
            .await?
            .is_some()
        {
            info!(
                event_id = %request.event_id,
                email = %email,
                "Duplicate submission, returning existing registration token"
            );
            return Ok(SubmissionReceipt {
                token,
                already_registered: true,
                email_sent: false,
            });
        }

        let registration = Registration::from_request(request);
        match self.store.insert(&registration).await? {
            InsertOutcome::DuplicateRegistration => {
                // Lost the race between pre-check and write. Same outcome
                // as a pre-check duplicate.
                info!(
                    event_id = %registration.event_id,
                    email = %email,
                    "Uniqueness constraint hit at write time, treating as duplicate"
                );
                Ok(SubmissionReceipt {
                    token,
                    already_registered: true,
                    email_sent: false,
                })
            }
            InsertOutcome::Created => {
                info!(
                    event_id = %registration.event_id,
                    registration_id = %registration.id,
                    team_size = registration.team_size(),
                    "Registration persisted"
                );

                // Best-effort confirmation. The registration is already
                // durable; a transport failure is logged and advisory only.
                let result = self.notifier.send_confirmation(&registration).await;
                if let NotificationResult::Failed(reason) = &result {
                    warn!(
                        recipient = %registration.main_participant.email,
                        error = %reason,
                        "Confirmation email failed, registration kept"
                    );
                }

                Ok(SubmissionReceipt {
                    token,
                    already_registered: false,
                    email_sent: result.delivered(),
                })
            }
        }
    }
}
