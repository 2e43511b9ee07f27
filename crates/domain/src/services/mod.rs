//! Business logic services.

pub mod cache;
pub mod notification;
pub mod policy;
pub mod store;
pub mod submission;

pub use cache::EventCache;
pub use notification::{NotificationResult, RegistrationNotifier};
pub use policy::{admit, PolicyError};
pub use store::{EventSource, InsertOutcome, RegistrationStore, StoreError};
pub use submission::{SubmissionError, SubmissionReceipt, SubmissionService};
