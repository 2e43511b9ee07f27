//! Entity definitions (database row mappings).

pub mod event;
pub mod registration;

pub use event::EventEntity;
pub use registration::RegistrationEntity;
