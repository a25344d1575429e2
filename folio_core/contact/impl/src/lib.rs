use std::{sync::Arc, time::Duration};

use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_email_contracts::{Email, EmailBody, EmailService};
use folio_models::{
    contact::{escape_html, ContactSubmission, SanitizedSubmission},
    email_address::EmailAddress,
};
use folio_templates_contracts::{ContactHtmlTemplate, ContactTextTemplate, TemplateService};
use tracing::{debug, error, info, warn};

pub const SUBJECT_PREFIX: &str = "Portfolio Contact: ";

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// `None` if the smtp credentials are missing. Submissions are then
    /// rejected without contacting the mail transport.
    pub delivery: Option<Arc<ContactDeliveryConfig>>,
    /// Upper bound for handing a single message to the mail transport
    pub send_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDeliveryConfig {
    pub sender: EmailAddress,
    pub recipient: EmailAddress,
}

impl<Email, Template> ContactServiceImpl<Email, Template> {
    pub fn new(email: Email, template: Template, config: ContactServiceConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, TemplateS> ContactService for ContactServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let submission = submission
            .validate()
            .inspect_err(|errors| debug!(?errors, "rejecting invalid contact submission"))?
            .sanitize();

        let Some(delivery) = self.config.delivery.as_deref() else {
            error!("Email credentials not configured, refusing to relay contact message");
            return Err(ContactSendMessageError::NotConfigured);
        };

        let email = self.compose(delivery, &submission)?;

        match tokio::time::timeout(self.config.send_timeout, self.email.send(email)).await {
            Ok(Ok(true)) => {
                info!("Relayed contact message");
                Ok(())
            }
            Ok(Ok(false)) => {
                error!("Smtp server rejected contact message");
                Err(ContactSendMessageError::Send)
            }
            Ok(Err(err)) => Err(err.context("Failed to send contact message").into()),
            Err(_) => {
                error!(timeout = ?self.config.send_timeout, "Timed out sending contact message");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}

impl<EmailS, TemplateS> ContactServiceImpl<EmailS, TemplateS>
where
    TemplateS: TemplateService,
{
    fn compose(
        &self,
        delivery: &ContactDeliveryConfig,
        submission: &SanitizedSubmission,
    ) -> anyhow::Result<Email> {
        // The validation pattern is looser than RFC 5321, so a few accepted
        // addresses cannot be used as a header value.
        let reply_to = submission
            .email()
            .parse::<EmailAddress>()
            .inspect_err(|err| warn!("Omitting reply-to header, invalid address: {err}"))
            .ok();

        let html = self.template.render(&ContactHtmlTemplate {
            name: submission.name().into(),
            email: escape_html(submission.email()),
            subject: submission.subject().into(),
            message: submission.message().replace('\n', "<br>"),
        })?;

        let text = self.template.render(&ContactTextTemplate {
            name: submission.name().into(),
            email: submission.email().into(),
            subject: submission.subject().into(),
            message: submission.message_text().into(),
        })?;

        Ok(Email {
            from: delivery.sender.clone(),
            recipient: delivery.recipient.clone(),
            reply_to,
            subject: format!("{SUBJECT_PREFIX}{}", submission.subject()),
            body: EmailBody::Alternative { text, html },
        })
    }
}

#[cfg(test)]
mod tests {
    use folio_email_contracts::MockEmailService;
    use folio_models::contact::{ContactValidationError, SubmissionField};
    use folio_templates_contracts::MockTemplateService;
    use folio_utils::assert_matches;

    use super::*;

    fn config() -> ContactServiceConfig {
        ContactServiceConfig {
            delivery: Some(Arc::new(ContactDeliveryConfig {
                sender: "portfolio@example.com".parse().unwrap(),
                recipient: "inbox@example.com".parse().unwrap(),
            })),
            send_timeout: Duration::from_secs(5),
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello there".into(),
            message: "This is a test message.".into(),
        }
    }

    fn templates() -> MockTemplateService {
        MockTemplateService::new()
            .with_render(
                ContactHtmlTemplate {
                    name: "Jane Doe".into(),
                    email: "jane@example.com".into(),
                    subject: "Hello there".into(),
                    message: "This is a test message.".into(),
                },
                "<p>html</p>".into(),
            )
            .with_render(
                ContactTextTemplate {
                    name: "Jane Doe".into(),
                    email: "jane@example.com".into(),
                    subject: "Hello there".into(),
                    message: "This is a test message.".into(),
                },
                "text".into(),
            )
    }

    fn expected_email() -> Email {
        Email {
            from: "portfolio@example.com".parse().unwrap(),
            recipient: "inbox@example.com".parse().unwrap(),
            reply_to: Some("jane@example.com".parse().unwrap()),
            subject: "Portfolio Contact: Hello there".into(),
            body: EmailBody::Alternative {
                text: "text".into(),
                html: "<p>html</p>".into(),
            },
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let email = MockEmailService::new().with_send(expected_email(), true);
        let sut = ContactServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn sanitized_fields_reach_templates() {
        // Arrange
        let submission = ContactSubmission {
            name: "  <Jane> & Co ".into(),
            email: " Jane@Example.COM ".into(),
            subject: "Re: \"Work\"".into(),
            message: "Hi,\nI'd like <b>this</b>.\n".into(),
        };

        let template = MockTemplateService::new()
            .with_render(
                ContactHtmlTemplate {
                    name: "&lt;Jane&gt; &amp; Co".into(),
                    email: "jane@example.com".into(),
                    subject: "Re: &quot;Work&quot;".into(),
                    message: "Hi,<br>I&#x27;d like &lt;b&gt;this&lt;&#x2F;b&gt;.".into(),
                },
                "html".into(),
            )
            .with_render(
                ContactTextTemplate {
                    name: "&lt;Jane&gt; &amp; Co".into(),
                    email: "jane@example.com".into(),
                    subject: "Re: &quot;Work&quot;".into(),
                    message: "Hi,\nI'd like <b>this</b>.".into(),
                },
                "text".into(),
            );

        let email = MockEmailService::new().with_send(
            Email {
                from: "portfolio@example.com".parse().unwrap(),
                recipient: "inbox@example.com".parse().unwrap(),
                reply_to: Some("jane@example.com".parse().unwrap()),
                subject: "Portfolio Contact: Re: &quot;Work&quot;".into(),
                body: EmailBody::Alternative {
                    text: "text".into(),
                    html: "html".into(),
                },
            },
            true,
        );

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut.send_message(submission).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn invalid_submission() {
        // Arrange
        let sut = ContactServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            config(),
        );

        // Act
        let result = sut
            .send_message(ContactSubmission {
                name: "A".into(),
                message: SubmissionField::NotText,
                ..submission()
            })
            .await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSendMessageError::Invalid(errors))
                if errors.first() == ContactValidationError::NameTooShort
        );
    }

    #[tokio::test]
    async fn validation_precedes_configuration_check() {
        // Arrange
        let sut = ContactServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            ContactServiceConfig {
                delivery: None,
                ..config()
            },
        );

        // Act
        let result = sut.send_message(ContactSubmission::default()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Invalid(_)));
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut = ContactServiceImpl::new(
            MockEmailService::new(),
            MockTemplateService::new(),
            ContactServiceConfig {
                delivery: None,
                ..config()
            },
        );

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::NotConfigured));
    }

    #[tokio::test]
    async fn rejected_by_smtp_server() {
        // Arrange
        let email = MockEmailService::new().with_send(expected_email(), false);
        let sut = ContactServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn transport_error() {
        // Arrange
        let email =
            MockEmailService::new().with_send_error(expected_email(), "connection refused");
        let sut = ContactServiceImpl::new(email, templates(), config());

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSendMessageError::Other(err))
                if format!("{err:#}").contains("connection refused")
        );
    }

    #[tokio::test]
    async fn transport_timeout() {
        // Arrange
        let email = MockEmailService::new().with_send_pending(expected_email());
        let sut = ContactServiceImpl::new(
            email,
            templates(),
            ContactServiceConfig {
                send_timeout: Duration::from_millis(10),
                ..config()
            },
        );

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn unusable_reply_to_is_omitted() {
        // Arrange
        let submission = ContactSubmission {
            email: "jane(work)@example.com".into(),
            ..submission()
        };

        let template = MockTemplateService::new()
            .with_render(
                ContactHtmlTemplate {
                    name: "Jane Doe".into(),
                    email: "jane(work)@example.com".into(),
                    subject: "Hello there".into(),
                    message: "This is a test message.".into(),
                },
                "<p>html</p>".into(),
            )
            .with_render(
                ContactTextTemplate {
                    name: "Jane Doe".into(),
                    email: "jane(work)@example.com".into(),
                    subject: "Hello there".into(),
                    message: "This is a test message.".into(),
                },
                "text".into(),
            );

        let email = MockEmailService::new().with_send(
            Email {
                reply_to: None,
                ..expected_email()
            },
            true,
        );

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut.send_message(submission).await;

        // Assert
        result.unwrap();
    }
}
