//! Domain models.

pub mod event;
pub mod participant;
pub mod registration;

pub use event::{EventConfig, RegistrationStatus, TeamSize};
pub use participant::{Participant, Year, OTHER_COLLEGE_SENTINEL};
pub use registration::{
    Registration, RegistrationLookup, RegistrationRequest, SubmissionResponse,
};
