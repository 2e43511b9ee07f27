//! Event catalog models.
//!
//! Events are configured externally (seeded by admin tooling) and are
//! read-only to the registration workflow.

use serde::{Deserialize, Serialize};

/// Whether an event currently accepts registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationStatus {
    Open,
    ComingSoon,
    Closed,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Open => "open",
            RegistrationStatus::ComingSoon => "coming-soon",
            RegistrationStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(RegistrationStatus::Open),
            "coming-soon" => Ok(RegistrationStatus::ComingSoon),
            "closed" => Ok(RegistrationStatus::Closed),
            other => Err(format!("Unknown registration status: {}", other)),
        }
    }
}

/// Team-size bounds for an event.
///
/// Invariant: `1 <= min <= max`. `max == 1` means an individual event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSize {
    pub min: u32,
    pub max: u32,
}

impl TeamSize {
    pub fn individual() -> Self {
        Self { min: 1, max: 1 }
    }

    pub fn contains(&self, size: u32) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

/// Externally configured event, as served to the public site and consumed
/// by the registration workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    /// Unique event identifier, e.g. `"techelons-code-sprint"`.
    pub id: String,
    pub name: String,
    /// Festival or programme the event belongs to (e.g. `"techelons"`,
    /// `"workshops"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub registration_status: RegistrationStatus,
    pub team_size: TeamSize,
}

impl EventConfig {
    /// A team event allows more than one participant per registration and
    /// requires a team name.
    pub fn is_team_event(&self) -> bool {
        self.team_size.max > 1
    }

    pub fn is_open(&self) -> bool {
        self.registration_status == RegistrationStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Open,
            RegistrationStatus::ComingSoon,
            RegistrationStatus::Closed,
        ] {
            let parsed: RegistrationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("paused".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&RegistrationStatus::ComingSoon).unwrap();
        assert_eq!(json, "\"coming-soon\"");
    }

    #[test]
    fn test_team_size_bounds() {
        let size = TeamSize { min: 2, max: 4 };
        assert!(!size.contains(1));
        assert!(size.contains(2));
        assert!(size.contains(4));
        assert!(!size.contains(5));
    }

    #[test]
    fn test_individual_event() {
        let event = EventConfig {
            id: "e1".into(),
            name: "Solo Quiz".into(),
            fest: Some("techelons".into()),
            description: None,
            registration_status: RegistrationStatus::Open,
            team_size: TeamSize::individual(),
        };
        assert!(!event.is_team_event());
        assert!(event.is_open());
    }
}
