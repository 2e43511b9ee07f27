//! Shared utilities for the society backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Participant field validation (email, mobile number)
//! - The reversible registration-token codec

pub mod token;
pub mod validation;
