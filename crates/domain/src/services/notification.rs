//! Notification seam for registration confirmations.
//!
//! The API layer provides an email-backed implementation; the submission
//! workflow only depends on this trait so notification transports can be
//! swapped and tests can observe delivery attempts.

use async_trait::async_trait;

use crate::models::Registration;

/// Result of a confirmation send attempt. Failures never fail the
/// submission; they surface only as the advisory `emailSent` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// All recipients were notified.
    Sent,
    /// The main participant was notified but one or more team-member
    /// messages failed.
    PartiallySent,
    /// No message was delivered.
    Failed(String),
    /// Notifications are disabled in configuration.
    Skipped,
}

impl NotificationResult {
    /// Whether the main confirmation reached the participant.
    pub fn delivered(&self) -> bool {
        matches!(
            self,
            NotificationResult::Sent | NotificationResult::PartiallySent
        )
    }
}

/// Sends registration confirmations.
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    /// Attempts one confirmation to the main participant and, for team
    /// registrations, one per team member naming the team.
    async fn send_confirmation(&self, registration: &Registration) -> NotificationResult;
}
