//! Application services.

pub mod email;

pub use email::{EmailNotifier, EmailService};
