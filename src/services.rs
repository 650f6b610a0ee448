use async_trait::async_trait;
use axum::Router;
use tokio::{net::TcpListener, sync::mpsc};

use crate::repositories::pix::ProviderError;
use crate::settings::Settings;

pub mod http;
pub mod pix;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// Spawns the Pix service and returns the HTTP router wired to it.
pub fn build_app(settings: &Settings) -> Result<Router, anyhow::Error> {
    let (pix_tx, mut pix_rx) = mpsc::channel(512);

    if settings.mercadopago.access_token.is_empty() {
        log::warn!("No Mercado Pago access token configured, provider calls will be rejected.");
    }

    let handler = pix::PixRequestHandler::new(&settings.mercadopago)?;
    let mut pix_service = pix::PixService::new();

    log::info!("Starting Pix service.");
    tokio::spawn(async move {
        pix_service.run(handler, &mut pix_rx).await;
    });

    Ok(http::router(pix_tx))
}

pub async fn start_services(settings: Settings) -> Result<(), anyhow::Error> {
    let app = build_app(&settings)?;

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    log::info!("Starting HTTP server.");

    http::serve(listener, app).await
}
