use serde::Deserialize;
use serde_json::Value;

use crate::models::pix::{self, AmountError, PaymentRequest};

/// Body of `POST /pix` as sent by callers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixPayment {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub full_name: Option<Value>,
}

impl TryFrom<PixPayment> for PaymentRequest {
    type Error = AmountError;

    fn try_from(body: PixPayment) -> Result<Self, Self::Error> {
        let amount = pix::parse_amount(body.amount.as_ref())?;

        Ok(PaymentRequest {
            amount,
            email: body.email,
            full_name: body.full_name,
        })
    }
}
