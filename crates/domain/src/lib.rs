//! Domain layer for the society backend.
//!
//! This crate contains:
//! - Domain models (events, participants, registrations)
//! - The admission policy and the idempotent submission workflow
//! - Trait seams for storage, event lookup and notification

pub mod models;
pub mod services;
