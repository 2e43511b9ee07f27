//! Admission policy: the checks that run after field validation and before
//! any persistence.

use std::collections::HashSet;
use std::iter;

use thiserror::Error;

use crate::models::{EventConfig, RegistrationRequest, RegistrationStatus};

/// A policy violation. Each variant renders as a single descriptive message
/// naming the constraint that failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Registrations for this event have not opened yet")]
    ComingSoon,

    #[error("Registrations for this event are closed")]
    Closed,

    #[error("Team size must be between {min} and {max}, got {actual}")]
    TeamSizeOutOfBounds { min: u32, max: u32, actual: u32 },

    #[error("Duplicate email within team: {0}")]
    DuplicateTeamEmail(String),

    #[error("Duplicate mobile number within team: {0}")]
    DuplicateTeamPhone(String),
}

impl PolicyError {
    /// Whether the violation is about the event accepting registrations at
    /// all, as opposed to the submitted team.
    pub fn is_registration_closed(&self) -> bool {
        matches!(self, PolicyError::ComingSoon | PolicyError::Closed)
    }
}

/// Decides admit/reject for a candidate registration against the event's
/// current rules. Pure; runs before the duplicate pre-check against the
/// store.
pub fn admit(event: &EventConfig, request: &RegistrationRequest) -> Result<(), PolicyError> {
    match event.registration_status {
        RegistrationStatus::Open => {}
        RegistrationStatus::ComingSoon => return Err(PolicyError::ComingSoon),
        RegistrationStatus::Closed => return Err(PolicyError::Closed),
    }

    // Team size is recomputed server-side; the client-declared flag is not
    // trusted for the bounds check.
    let actual = request.team_size();
    if !event.team_size.contains(actual) {
        return Err(PolicyError::TeamSizeOutOfBounds {
            min: event.team_size.min,
            max: event.team_size.max,
            actual,
        });
    }

    // Intra-team uniqueness, in submission order: main participant first,
    // then members in array order; each member's email is checked before
    // its phone. This fixes which duplicate is reported when several exist.
    let mut emails = HashSet::new();
    let mut phones = HashSet::new();
    for participant in iter::once(&request.main_participant).chain(request.team_members.iter()) {
        let email = participant.normalized_email();
        if !emails.insert(email.clone()) {
            return Err(PolicyError::DuplicateTeamEmail(email));
        }
        let phone = participant.normalized_phone();
        if !phones.insert(phone.clone()) {
            return Err(PolicyError::DuplicateTeamPhone(phone));
        }
    }

    Ok(())
}
