use crate::domain::ids::{PAYMENT_PREFIX, new_id};
use crate::domain::instrument::CardNetwork;
use crate::domain::merchant::MerchantId;
use crate::domain::order::Order;
use crate::error::{GatewayError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FAILURE_CODE: &str = "PAYMENT_FAILED";
pub const FAILURE_DESCRIPTION: &str = "Bank declined transaction";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(GatewayError::BadRequest(format!(
                "Unsupported payment method: {other}"
            ))),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `processing` is entered at creation; `success` and `failed` are terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Processing,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Processing => "processing",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw card input. Lives only until validation has reduced it to an
/// [`Instrument::Card`].
#[derive(Clone, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub holder_name: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"<redacted>")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"<redacted>")
            .field("holder_name", &self.holder_name)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub order_id: String,
    pub method: String,
    #[serde(default)]
    pub vpa: Option<String>,
    #[serde(default)]
    pub card: Option<CardDetails>,
}

/// The part of a payment instrument that is safe to retain.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instrument {
    Upi { vpa: String },
    Card { network: CardNetwork, last4: String },
}

impl Instrument {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Instrument::Upi { .. } => PaymentMethod::Upi,
            Instrument::Card { .. } => PaymentMethod::Card,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub merchant_id: MerchantId,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub vpa: Option<String>,
    pub card_network: Option<CardNetwork>,
    pub card_last4: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Opens a `processing` payment against `order`. Amount and currency are
    /// always taken from the order.
    pub fn open(order: &Order, instrument: Instrument) -> Self {
        let now = Utc::now();
        let method = instrument.method();
        let (vpa, card_network, card_last4) = match instrument {
            Instrument::Upi { vpa } => (Some(vpa), None, None),
            Instrument::Card { network, last4 } => (None, Some(network), Some(last4)),
        };

        Self {
            id: new_id(PAYMENT_PREFIX),
            order_id: order.id.clone(),
            merchant_id: order.merchant_id,
            amount: order.amount,
            currency: order.currency.clone(),
            method,
            status: PaymentStatus::Processing,
            vpa,
            card_network,
            card_last4,
            error_code: None,
            error_description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, merchant_id: MerchantId) -> bool {
        self.merchant_id == merchant_id
    }

    /// Applies the one terminal transition out of `processing`.
    pub(crate) fn settle(&mut self, succeeded: bool) -> Result<()> {
        if self.status.is_terminal() {
            return Err(GatewayError::AlreadySettled {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }

        if succeeded {
            self.status = PaymentStatus::Success;
        } else {
            self.status = PaymentStatus::Failed;
            self.error_code = Some(FAILURE_CODE.to_string());
            self.error_description = Some(FAILURE_DESCRIPTION.to_string());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
