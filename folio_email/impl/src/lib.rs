use std::time::Duration;

use anyhow::anyhow;
use folio_email_contracts::{Email, EmailBody, EmailService};
use folio_models::{email_address::EmailAddress, Sensitive};
use folio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: u16,
    pub encryption: SmtpEncryption,
    pub credentials: Option<SmtpCredentials>,
    /// Socket timeout of the smtp connection
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpEncryption {
    Tls,
    StartTls,
    Plain,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: Sensitive<String>,
}

impl EmailServiceImpl {
    /// Create the pooled transport. No connection is opened until the first
    /// email is sent or [`EmailService::ping`] is called.
    pub fn new(config: &SmtpTransportConfig) -> anyhow::Result<Self> {
        let builder = match config.encryption {
            SmtpEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpEncryption::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        let transport = builder
            .port(config.port)
            .timeout(Some(config.timeout))
            .apply_map(config.credentials.clone(), |builder, credentials| {
                builder.credentials(Credentials::new(
                    credentials.username,
                    credentials.password.0,
                ))
            })
            .build();

        Ok(Self { transport })
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn build_message(email: Email) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .from(email.from.into_mailbox())
        .to(email.recipient.into_mailbox())
        .apply_map(
            email.reply_to.map(EmailAddress::into_mailbox),
            MessageBuilder::reply_to,
        )
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(body) => builder.header(header::ContentType::TEXT_PLAIN).body(body)?,
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))?
        }
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(body: EmailBody) -> Email {
        Email {
            from: "portfolio@example.com".parse().unwrap(),
            recipient: "inbox@example.com".parse().unwrap(),
            reply_to: Some("jane@example.com".parse().unwrap()),
            subject: "Portfolio Contact: Hello there".into(),
            body,
        }
    }

    fn format(message: Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn alternative_message() {
        let message = build_message(email(EmailBody::Alternative {
            text: "Plain body".into(),
            html: "<p>Html body</p>".into(),
        }))
        .unwrap();

        let formatted = format(message);
        assert!(formatted.contains("From: portfolio@example.com\r\n"));
        assert!(formatted.contains("To: inbox@example.com\r\n"));
        assert!(formatted.contains("Reply-To: jane@example.com\r\n"));
        assert!(formatted.contains("Subject: Portfolio Contact: Hello there\r\n"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/plain"));
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("Plain body"));
        assert!(formatted.contains("<p>Html body</p>"));
    }

    #[test]
    fn text_message_without_reply_to() {
        let message = build_message(Email {
            reply_to: None,
            ..email(EmailBody::Text("Email deliverability seems to be working!".into()))
        })
        .unwrap();

        let formatted = format(message);
        assert!(!formatted.contains("Reply-To:"));
        assert!(formatted.contains("text/plain"));
        assert!(!formatted.contains("multipart"));
    }

    #[tokio::test]
    async fn transport_config() {
        for encryption in [
            SmtpEncryption::Tls,
            SmtpEncryption::StartTls,
            SmtpEncryption::Plain,
        ] {
            EmailServiceImpl::new(&SmtpTransportConfig {
                host: "smtp.example.com".into(),
                port: 2525,
                encryption,
                credentials: Some(SmtpCredentials {
                    username: "user".into(),
                    password: "password".to_owned().into(),
                }),
                timeout: Duration::from_secs(5),
            })
            .unwrap();
        }
    }
}
