//! Participant model shared by individual and team registrations.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// College value that requires the supplementary `otherCollege` field.
pub const OTHER_COLLEGE_SENTINEL: &str = "Other";

/// Year of study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Year {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
}

/// A single participant: the main registrant or a team member.
///
/// Email and mobile number are the uniqueness keys within a team.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_other_college", skip_on_field_errors = false))]
pub struct Participant {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_email_address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_mobile_number"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,

    #[validate(length(min = 1, message = "Course is required"))]
    pub course: String,

    pub year: Year,

    #[validate(length(min = 1, message = "College is required"))]
    pub college: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_college: Option<String>,
}

impl Participant {
    /// Email normalized for duplicate comparisons.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Mobile number normalized for duplicate comparisons.
    pub fn normalized_phone(&self) -> String {
        self.phone.trim().to_string()
    }
}

/// When the college sentinel "Other" is chosen, a non-empty supplementary
/// college name is required.
fn validate_other_college(participant: &Participant) -> Result<(), ValidationError> {
    if participant.college.trim() == OTHER_COLLEGE_SENTINEL
        && participant
            .other_college
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
    {
        let mut err = ValidationError::new("other_college_required");
        err.message = Some("Please specify your college name".into());
        return Err(err);
    }
    Ok(())
}
