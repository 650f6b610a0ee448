use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const PIX_PAYMENT_METHOD: &str = "pix";

/// Payment creation request with a validated amount. Payer fields are
/// forwarded to the provider untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub email: Option<Value>,
    pub full_name: Option<Value>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is required")]
    Missing,
    #[error("amount must be numeric, got {0}")]
    NotNumeric(String),
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),
}

/// Converts the caller's amount (JSON number or numeric string) into a
/// positive decimal.
pub fn parse_amount(raw: Option<&Value>) -> Result<Decimal, AmountError> {
    let amount = match raw {
        None | Some(Value::Null) => return Err(AmountError::Missing),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(other) => return Err(AmountError::NotNumeric(other.to_string())),
    };

    let amount = amount.ok_or_else(|| AmountError::NotNumeric(raw_repr(raw)))?;
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }

    Ok(amount.normalize())
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn raw_repr(raw: Option<&Value>) -> String {
    raw.map(Value::to_string).unwrap_or_default()
}

/// Random token sent as `X-Idempotency-Key`, one per creation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    pub fn new() -> Self {
        IdempotencyKey(Uuid::new_v4())
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Payer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
}

/// Body of `POST /v1/payments`.
#[derive(Clone, Debug, Serialize)]
pub struct MercadoPagoPayment {
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_amount: Decimal,
    pub description: String,
    pub payment_method_id: String,
    pub payer: Payer,
}

impl MercadoPagoPayment {
    pub fn pix(request: PaymentRequest, description: &str) -> Self {
        MercadoPagoPayment {
            transaction_amount: request.amount,
            description: description.to_string(),
            payment_method_id: PIX_PAYMENT_METHOD.to_string(),
            payer: Payer {
                email: request.email,
                first_name: request.full_name,
            },
        }
    }
}
