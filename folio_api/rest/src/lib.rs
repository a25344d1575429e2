use std::{net::IpAddr, path::PathBuf};

use axum::Router;
use folio_core_contact_contracts::ContactService;
use folio_utils::Apply;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

mod middlewares;
pub mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Directory served for every path without a matching api route
    pub static_dir: PathBuf,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener, e.g. one bound to port `0`.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        info!(
            "Serving {} on http://{}",
            self.config.static_dir.display(),
            listener.local_addr()?
        );
        let router = self.router();
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        Router::new()
            .merge(routes::health::router())
            .merge(routes::contact::router(self.contact.into()))
            .merge(routes::assets::router(self.config.static_dir))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::trace::add)
            .apply(middlewares::request_id::add)
            .layer(CorsLayer::permissive())
    }
}
