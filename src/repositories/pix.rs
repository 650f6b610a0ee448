use serde_json::Value;

use crate::models::pix::{IdempotencyKey, MercadoPagoPayment, PaymentRequest};
use crate::settings;

pub mod mercadopago;

pub use mercadopago::ProviderError;

#[derive(Clone)]
pub struct PixRepository {
    mercadopago_api: mercadopago::MercadoPagoApi,
    description: String,
}

impl PixRepository {
    pub fn new(settings: &settings::MercadoPago) -> Result<Self, anyhow::Error> {
        let mercadopago_api = mercadopago::MercadoPagoApi::new(settings)?;

        Ok(PixRepository {
            mercadopago_api,
            description: settings.description.clone(),
        })
    }

    pub async fn new_pix_payment(&self, request: PaymentRequest) -> Result<Value, ProviderError> {
        let idempotency_key = IdempotencyKey::new();
        let payment = MercadoPagoPayment::pix(request, &self.description);

        log::debug!(
            "Creating PIX payment of {} with idempotency key {}",
            payment.transaction_amount,
            idempotency_key
        );

        self.mercadopago_api
            .create_payment(&payment, idempotency_key)
            .await
    }

    pub async fn get_payment(&self, id: &str) -> Result<Value, ProviderError> {
        self.mercadopago_api.get_payment(id).await
    }
}
