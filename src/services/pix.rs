use super::{RequestHandler, Service, ServiceError};

use crate::models::pix::PaymentRequest;
use crate::repositories::pix::PixRepository;
use crate::settings;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

pub enum PixServiceRequest {
    CreatePayment {
        request: PaymentRequest,
        response: oneshot::Sender<Result<Value, ServiceError>>,
    },
    GetPayment {
        id: String,
        response: oneshot::Sender<Result<Value, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct PixRequestHandler {
    repository: PixRepository,
}

impl PixRequestHandler {
    pub fn new(mercadopago: &settings::MercadoPago) -> Result<Self, anyhow::Error> {
        let repository = PixRepository::new(mercadopago)?;

        Ok(PixRequestHandler { repository })
    }

    async fn new_pix_payment(&self, request: PaymentRequest) -> Result<Value, ServiceError> {
        match self.repository.new_pix_payment(request).await {
            Ok(payment) => {
                log::info!("PIX payment created: {}", payment_summary(&payment));
                log::debug!("PIX payment response: {}", payment);
                Ok(payment)
            }
            Err(e) => {
                log::error!("Failed to create PIX payment: {}", error_detail(&e));
                Err(e.into())
            }
        }
    }

    async fn get_payment(&self, id: &str) -> Result<Value, ServiceError> {
        self.repository.get_payment(id).await.map_err(|e| {
            log::error!("Failed to fetch payment {}: {}", id, error_detail(&e));
            e.into()
        })
    }
}

fn payment_summary(payment: &Value) -> String {
    format!(
        "id={} status={}",
        payment.get("id").unwrap_or(&Value::Null),
        payment.get("status").unwrap_or(&Value::Null)
    )
}

fn error_detail(e: &crate::repositories::pix::ProviderError) -> String {
    match e.payload() {
        Some(payload) => format!("{} {}", e, payload),
        None => e.to_string(),
    }
}

#[async_trait]
impl RequestHandler<PixServiceRequest> for PixRequestHandler {
    async fn handle_request(&self, request: PixServiceRequest) {
        match request {
            PixServiceRequest::CreatePayment { request, response } => {
                let payment = self.new_pix_payment(request).await;
                let _ = response.send(payment);
            }
            PixServiceRequest::GetPayment { id, response } => {
                let payment = self.get_payment(&id).await;
                let _ = response.send(payment);
            }
        }
    }
}

pub struct PixService;

impl PixService {
    pub fn new() -> Self {
        PixService {}
    }
}

#[async_trait]
impl Service<PixServiceRequest, PixRequestHandler> for PixService {}
