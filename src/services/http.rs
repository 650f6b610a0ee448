use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{pix::PixServiceRequest, ServiceError};
use crate::models::{pix::PaymentRequest, server::pix::PixPayment};

#[derive(Clone)]
struct AppState {
    pix_channel: mpsc::Sender<PixServiceRequest>,
}

fn error_body(error: &ServiceError) -> Value {
    match error {
        ServiceError::Provider(e) => match e.payload() {
            Some(payload) => payload.clone(),
            None => json!(e.to_string()),
        },
        ServiceError::InvalidRequest(message) => json!(message),
        other => json!(other.to_string()),
    }
}

fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn into_response(result: Result<Value, ServiceError>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(payment) => (StatusCode::OK, Json(payment)),
        Err(e) => (error_status(&e), Json(json!({ "error": error_body(&e) }))),
    }
}

async fn dispatch<F>(state: &AppState, build: F) -> Result<Value, ServiceError>
where
    F: FnOnce(oneshot::Sender<Result<Value, ServiceError>>) -> PixServiceRequest,
{
    let (response_tx, response_rx) = oneshot::channel();

    state
        .pix_channel
        .send(build(response_tx))
        .await
        .map_err(|e| ServiceError::Communication("Pix".to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication("Pix".to_string(), e.to_string()))?
}

async fn create_pix_payment(
    State(state): State<AppState>,
    body: Result<Json<PixPayment>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            log::warn!("Rejected PIX request body: {}", rejection.body_text());
            return into_response(Err(ServiceError::InvalidRequest(rejection.body_text())));
        }
    };

    let request = match PaymentRequest::try_from(body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected PIX request: {}", e);
            return into_response(Err(ServiceError::InvalidRequest(e.to_string())));
        }
    };

    let result = dispatch(&state, |response| PixServiceRequest::CreatePayment {
        request,
        response,
    })
    .await;

    into_response(result)
}

async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = dispatch(&state, |response| PixServiceRequest::GetPayment { id, response }).await;

    into_response(result)
}

async fn receive_webhook(body: Bytes) -> StatusCode {
    log::info!("Webhook received: {}", String::from_utf8_lossy(&body));

    StatusCode::OK
}

async fn health() -> &'static str {
    "PIX gateway is running"
}

pub fn router(pix_channel: mpsc::Sender<PixServiceRequest>) -> Router {
    let app_state = AppState { pix_channel };

    Router::new()
        .route("/", get(health))
        .route("/pix", post(create_pix_payment))
        .route("/payment/{id}", get(get_payment))
        .route("/webhook", post(receive_webhook))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), anyhow::Error> {
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    log::info!("Shutting down HTTP server.");
}
