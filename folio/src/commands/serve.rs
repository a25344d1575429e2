use folio_config::Config;
use folio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email)?;
    if email::credentials(&config.email).is_some() {
        info!("Connecting to smtp server");
        match email.ping().await {
            Ok(()) => info!("Smtp server is reachable"),
            Err(err) => warn!("Failed to reach smtp server, sending may fail: {err:#}"),
        }
    }

    let contact = environment::contact_service(&config, email)?;
    let server = environment::rest_server(&config, contact);

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
