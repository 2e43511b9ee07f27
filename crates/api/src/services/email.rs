//! Email service for sending registration confirmations.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses SendGrid API

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use domain::models::Registration;
use domain::services::{NotificationResult, RegistrationNotifier};

use crate::config::EmailConfig;
use crate::middleware::metrics::record_confirmation_email_failed;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name
    pub to_name: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Builds the confirmation for the main participant.
    pub fn confirmation_message(&self, registration: &Registration) -> EmailMessage {
        let team_line = registration
            .team_name
            .as_deref()
            .map(|team| format!("Your team \"{}\" is registered.\n\n", team))
            .unwrap_or_default();

        let body_text = format!(
            r#"Hi {name},

Your registration for {event} has been confirmed.

{team_line}Keep this email for your records. See you there!

Best regards,
{sender}"#,
            name = registration.main_participant.name,
            event = registration.event_name,
            team_line = team_line,
            sender = self.config.sender_name,
        );

        EmailMessage {
            to: registration.main_participant.email.clone(),
            to_name: registration.main_participant.name.clone(),
            subject: format!("Registration confirmed - {}", registration.event_name),
            body_text,
        }
    }

    /// Builds the confirmation for one team member, naming their team.
    pub fn team_member_message(
        &self,
        registration: &Registration,
        member_index: usize,
    ) -> Option<EmailMessage> {
        let member = registration.team_members.get(member_index)?;
        let team = registration.team_name.as_deref().unwrap_or("your team");

        let body_text = format!(
            r#"Hi {name},

You have been registered for {event} as part of team "{team}"
by {leader}.

See you there!

Best regards,
{sender}"#,
            name = member.name,
            event = registration.event_name,
            team = team,
            leader = registration.main_participant.name,
            sender = self.config.sender_name,
        );

        Some(EmailMessage {
            to: member.email.clone(),
            to_name: member.name.clone(),
            subject: format!("You're registered - {}", registration.event_name),
            body_text,
        })
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = %message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );
        debug!(body_text = %message.body_text, "Email body");
        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let body = serde_json::json!({
            "personalizations": [{
                "to": [{
                    "email": message.to,
                    "name": message.to_name
                }]
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

/// Adapter exposing the email service to the submission workflow.
#[derive(Clone)]
pub struct EmailNotifier {
    service: EmailService,
}

impl EmailNotifier {
    pub fn new(service: EmailService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RegistrationNotifier for EmailNotifier {
    async fn send_confirmation(&self, registration: &Registration) -> NotificationResult {
        if !self.service.is_enabled() {
            return NotificationResult::Skipped;
        }

        let main_message = self.service.confirmation_message(registration);
        if let Err(err) = self.service.send(main_message).await {
            record_confirmation_email_failed();
            error!(
                recipient = %registration.main_participant.email,
                error = %err,
                "Failed to send confirmation to main participant"
            );
            return NotificationResult::Failed(err.to_string());
        }

        // Team-member confirmations are individually best-effort too.
        let mut member_failures = 0usize;
        for index in 0..registration.team_members.len() {
            let Some(message) = self.service.team_member_message(registration, index) else {
                continue;
            };
            let recipient = message.to.clone();
            if let Err(err) = self.service.send(message).await {
                member_failures += 1;
                record_confirmation_email_failed();
                error!(
                    recipient = %recipient,
                    error = %err,
                    "Failed to send confirmation to team member"
                );
            }
        }

        if member_failures > 0 {
            NotificationResult::PartiallySent
        } else {
            NotificationResult::Sent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Participant, Year};
    use uuid::Uuid;

    fn test_config(enabled: bool) -> EmailConfig {
        EmailConfig {
            enabled,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "noreply@example.org".to_string(),
            sender_name: "Society Web Team".to_string(),
        }
    }

    fn participant(name: &str, email: &str) -> Participant {
        Participant {
            name: name.into(),
            email: email.into(),
            phone: "9876543210".into(),
            roll_number: "21/1".into(),
            course: "B.Sc.".into(),
            year: Year::First,
            college: "Shivaji College".into(),
            other_college: None,
        }
    }

    fn team_registration() -> Registration {
        Registration {
            id: Uuid::new_v4(),
            event_id: "techelons-hackathon".into(),
            event_name: "Hackathon".into(),
            is_team_event: true,
            team_name: Some("Null Pointers".into()),
            main_participant: participant("Alice", "alice@du.ac.in"),
            team_members: vec![participant("Bob", "bob@du.ac.in")],
            college_id_url: "https://uploads.example.com/id.png".into(),
            query: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_confirmation_message_names_event_and_team() {
        let service = EmailService::new(test_config(true));
        let message = service.confirmation_message(&team_registration());
        assert_eq!(message.to, "alice@du.ac.in");
        assert!(message.subject.contains("Hackathon"));
        assert!(message.body_text.contains("Null Pointers"));
    }

    #[test]
    fn test_team_member_message_addresses_member() {
        let service = EmailService::new(test_config(true));
        let registration = team_registration();
        let message = service.team_member_message(&registration, 0).unwrap();
        assert_eq!(message.to, "bob@du.ac.in");
        assert!(message.body_text.contains("Null Pointers"));
        assert!(message.body_text.contains("Alice"));

        assert!(service.team_member_message(&registration, 5).is_none());
    }

    #[tokio::test]
    async fn test_console_send_succeeds() {
        let service = EmailService::new(test_config(true));
        let message = service.confirmation_message(&team_registration());
        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_service_skips() {
        let notifier = EmailNotifier::new(EmailService::new(test_config(false)));
        let result = notifier.send_confirmation(&team_registration()).await;
        assert_eq!(result, NotificationResult::Skipped);
        assert!(!result.delivered());
    }

    #[tokio::test]
    async fn test_console_notifier_sends_all() {
        let notifier = EmailNotifier::new(EmailService::new(test_config(true)));
        let result = notifier.send_confirmation(&team_registration()).await;
        assert_eq!(result, NotificationResult::Sent);
    }

    #[tokio::test]
    async fn test_unknown_provider_reports_failure() {
        let mut config = test_config(true);
        config.provider = "carrier-pigeon".into();
        let notifier = EmailNotifier::new(EmailService::new(config));
        let result = notifier.send_confirmation(&team_registration()).await;
        assert!(matches!(result, NotificationResult::Failed(_)));
    }
}
