use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use pix_gateway::settings::{self, Settings};

pub const TOKEN: &str = "TEST-access-token";

/// A request the stub provider received on `POST /v1/payments`.
#[derive(Clone, Debug)]
pub struct Captured {
    pub idempotency_key: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct StubState {
    pub create_status: StatusCode,
    pub create_body: Value,
    pub delay: Option<Duration>,
    pub captured: Arc<Mutex<Vec<Captured>>>,
    pub lookups: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl StubState {
    pub fn new(create_status: StatusCode, create_body: Value) -> Self {
        StubState {
            create_status,
            create_body,
            delay: None,
            captured: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<(String, Option<String>)> {
        self.lookups.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn authorized(headers: &HeaderMap) -> bool {
    header(headers, "authorization").as_deref() == Some(format!("Bearer {}", TOKEN).as_str())
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "invalid access token", "status": 401})),
    )
}

async fn create_payment(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.captured.lock().unwrap().push(Captured {
        idempotency_key: header(&headers, "x-idempotency-key"),
        authorization: header(&headers, "authorization"),
        body,
    });

    if !authorized(&headers) {
        return unauthorized();
    }

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (state.create_status, Json(state.create_body.clone()))
}

async fn get_payment(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state
        .lookups
        .lock()
        .unwrap()
        .push((id.clone(), header(&headers, "authorization")));

    if !authorized(&headers) {
        return unauthorized();
    }

    if id == "123" {
        (StatusCode::OK, Json(json!({"id": 123, "status": "approved"})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Payment not found", "status": 404})),
        )
    }
}

/// Starts the stub provider and returns its base url.
pub async fn spawn_provider(state: StubState) -> String {
    let app = Router::new()
        .route("/v1/payments", post(create_payment))
        .route("/v1/payments/{id}", get(get_payment))
        .with_state(state);

    spawn(app).await
}

/// Starts the gateway against the given provider url and returns its base url.
pub async fn spawn_gateway(provider_url: &str, timeout_secs: u64) -> String {
    spawn_gateway_with_token(provider_url, TOKEN, timeout_secs).await
}

pub async fn spawn_gateway_with_token(provider_url: &str, token: &str, timeout_secs: u64) -> String {
    let settings = Settings {
        server: settings::Server {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        mercadopago: settings::MercadoPago {
            url: provider_url.to_string(),
            access_token: token.to_string(),
            description: settings::DEFAULT_DESCRIPTION.to_string(),
            timeout_secs,
            connect_timeout_secs: 1,
        },
    };

    let app = pix_gateway::services::build_app(&settings).expect("gateway should build");

    spawn(app).await
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{}", addr)
}
