use anyhow::Context;
use folio_config::{EmailConfig, SmtpEncryption};
use folio_email_impl::{EmailServiceImpl, SmtpCredentials, SmtpTransportConfig};

/// Create the smtp transport. The connection is opened lazily.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(&transport_config(config))
        .with_context(|| format!("Failed to configure smtp transport for {}", config.host))
}

/// Both the username and the password, if configured.
pub fn credentials(config: &EmailConfig) -> Option<SmtpCredentials> {
    Some(SmtpCredentials {
        username: config.username.clone()?,
        password: config.password.clone()?,
    })
}

pub fn transport_config(config: &EmailConfig) -> SmtpTransportConfig {
    SmtpTransportConfig {
        host: config.host.clone(),
        port: config.port,
        encryption: match config.encryption {
            SmtpEncryption::Tls => folio_email_impl::SmtpEncryption::Tls,
            SmtpEncryption::StartTls => folio_email_impl::SmtpEncryption::StartTls,
            SmtpEncryption::Plain => folio_email_impl::SmtpEncryption::Plain,
        },
        credentials: credentials(config),
        timeout: *config.timeout,
    }
}
