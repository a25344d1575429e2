use anyhow::{ensure, Context};
use clap::Subcommand;
use folio_config::Config;
use folio_email_contracts::{Email, EmailBody, EmailService};
use folio_models::email_address::EmailAddress;

use crate::{email, environment};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddress },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let delivery = environment::delivery_config(&config)
        .context("Email delivery is not configured, set EMAIL_USER and EMAIL_PASS")?;

    let email_service = email::connect(&config.email)?;

    let ok = email_service
        .send(Email {
            from: delivery.sender,
            recipient,
            reply_to: None,
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("Email deliverability seems to be working!".into()),
        })
        .await?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
