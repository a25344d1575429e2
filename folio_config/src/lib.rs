use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use folio_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;

mod duration;

/// Built-in defaults, always loaded first.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

/// Environment variables which override single config keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("EMAIL_USER", "email.username"),
    ("EMAIL_PASS", "email.password"),
    ("EMAIL_FROM", "email.from"),
    ("EMAIL_TO", "contact.recipient"),
    ("ALLOWED_ORIGIN", "function.allowed_origin"),
    ("HOST", "http.host"),
    ("PORT", "http.port"),
];

/// Load the config from the defaults, the files in `FOLIO_CONFIG` and the
/// process environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATH_ENV)
        .map(|paths| {
            paths
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    load_from(&paths, |key| std::env::var(key).ok())
}

pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    // Empty values count as unset
    let builder = ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            builder.set_override_option(key, env(var).filter(|value| !value.is_empty()))
        })?;

    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub function: FunctionConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub encryption: SmtpEncryption,
    pub timeout: Duration,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub from: Option<EmailAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    /// Implicit TLS, usually on port 465
    Tls,
    /// Upgrade a plain connection via `STARTTLS`, usually on port 587
    StartTls,
    /// No encryption at all, only for local development
    #[serde(rename = "none")]
    Plain,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: Option<EmailAddress>,
    pub send_timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct FunctionConfig {
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration as StdDuration};

    use pretty_assertions::assert_eq;

    use super::*;

    const NO_PATHS: &[&str] = &[];

    #[test]
    fn load_default_config() {
        let config = load_from(NO_PATHS, |_| None).unwrap();

        assert_eq!(config.http.port, 3000);
        assert_eq!(config.http.static_dir, PathBuf::from("."));
        assert_eq!(config.email.host, "smtp.gmail.com");
        assert_eq!(config.email.port, 465);
        assert_eq!(config.email.encryption, SmtpEncryption::Tls);
        assert_eq!(config.email.username, None);
        assert!(config.email.password.is_none());
        assert_eq!(config.email.from, None);
        assert_eq!(config.contact.recipient, None);
        assert_eq!(*config.contact.send_timeout, StdDuration::from_secs(30));
        assert_eq!(config.function.allowed_origin, "*");
        assert!(config.sentry.is_none());
    }

    #[test]
    fn environment_overrides() {
        let env = HashMap::from([
            ("EMAIL_USER", "portfolio@example.com"),
            ("EMAIL_PASS", "app password"),
            ("EMAIL_TO", "inbox@example.com"),
            ("ALLOWED_ORIGIN", "https://portfolio.example.com"),
            ("PORT", "8080"),
        ]);

        let config = load_from(NO_PATHS, |key| env.get(key).map(|&v| v.to_owned())).unwrap();

        assert_eq!(config.email.username.as_deref(), Some("portfolio@example.com"));
        assert_eq!(
            config.email.password.as_deref().map(String::as_str),
            Some("app password")
        );
        assert_eq!(
            config.contact.recipient,
            Some("inbox@example.com".parse().unwrap())
        );
        assert_eq!(
            config.function.allowed_origin,
            "https://portfolio.example.com"
        );
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let config = load_from(NO_PATHS, |key| {
            matches!(key, "EMAIL_USER" | "ALLOWED_ORIGIN").then(String::new)
        })
        .unwrap();

        assert_eq!(config.email.username, None);
        assert_eq!(config.function.allowed_origin, "*");
    }

    #[test]
    fn config_files_override_defaults() {
        let path = std::env::temp_dir().join(format!("folio-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            [email]
            host = "localhost"
            port = 1025
            encryption = "none"

            [contact]
            send_timeout = "5s"

            [sentry]
            dsn = "https://key@sentry.example.com/1"
            "#,
        )
        .unwrap();

        let config = load_from(&[&path], |_| None);
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.email.host, "localhost");
        assert_eq!(config.email.port, 1025);
        assert_eq!(config.email.encryption, SmtpEncryption::Plain);
        assert_eq!(*config.contact.send_timeout, StdDuration::from_secs(5));
        assert_eq!(
            config.sentry.map(|sentry| sentry.dsn).as_deref(),
            Some("https://key@sentry.example.com/1")
        );
    }

    #[test]
    fn missing_config_file() {
        let result = load_from(&["/nonexistent/folio.toml"], |_| None);
        assert!(result.is_err());
    }
}
