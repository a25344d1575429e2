//! Wiring of the concrete services.

use std::sync::Arc;

use anyhow::Context;
use folio_api_function::ContactFunctionConfig;
use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::{ContactDeliveryConfig, ContactServiceConfig, ContactServiceImpl};
use folio_email_impl::EmailServiceImpl;
use folio_models::email_address::EmailAddress;
use folio_templates_impl::TemplateServiceImpl;
use lambda_http::http::HeaderValue;
use tracing::error;

pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;
pub type Contact = ContactServiceImpl<Email, Template>;
pub type RestServer = folio_api_rest::RestServer<Contact>;
pub type ContactFunction = folio_api_function::ContactFunction<Contact>;

pub fn contact_service(config: &Config, email: Email) -> anyhow::Result<Contact> {
    let template = TemplateServiceImpl::new()?;
    Ok(ContactServiceImpl::new(
        email,
        template,
        contact_service_config(config),
    ))
}

pub fn contact_service_config(config: &Config) -> ContactServiceConfig {
    ContactServiceConfig {
        delivery: delivery_config(config).map(Arc::new),
        send_timeout: *config.contact.send_timeout,
    }
}

/// Resolve sender and recipient of relayed messages.
///
/// Returns `None` unless both smtp credentials are configured. The sender
/// defaults to the smtp username, the recipient to the sender.
pub fn delivery_config(config: &Config) -> Option<ContactDeliveryConfig> {
    let email = &config.email;

    let (Some(username), Some(_)) = (&email.username, &email.password) else {
        error!("Smtp credentials are not configured, contact messages cannot be relayed");
        return None;
    };

    let sender = match &email.from {
        Some(from) => from.clone(),
        None => match username.parse::<EmailAddress>() {
            Ok(sender) => sender,
            Err(err) => {
                error!("Smtp username is not an email address and no sender is configured: {err}");
                return None;
            }
        },
    };

    let recipient = config
        .contact
        .recipient
        .clone()
        .unwrap_or_else(|| sender.clone());

    Some(ContactDeliveryConfig { sender, recipient })
}

pub fn rest_server(config: &Config, contact: Contact) -> RestServer {
    RestServer::new(
        contact,
        RestServerConfig {
            static_dir: config.http.static_dir.clone(),
        },
    )
}

pub fn contact_function(config: &Config, contact: Contact) -> anyhow::Result<ContactFunction> {
    let allowed_origin = HeaderValue::from_str(&config.function.allowed_origin)
        .context("Invalid allowed origin")?;
    Ok(ContactFunction::new(
        contact,
        ContactFunctionConfig { allowed_origin },
    ))
}
