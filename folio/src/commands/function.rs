use folio_config::Config;

use crate::{email, environment};

pub async fn function(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email)?;
    let contact = environment::contact_service(&config, email)?;
    environment::contact_function(&config, contact)?.run().await
}
