use crate::domain::ids::{ORDER_PREFIX, new_id};
use crate::domain::merchant::MerchantId;
use crate::error::{GatewayError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest order amount accepted, in minor units.
pub const MIN_ORDER_AMOUNT: i64 = 100;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Opaque merchant-supplied annotations ("notes").
pub type Notes = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRequest {
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<Notes>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl OrderRequest {
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            currency: default_currency(),
            receipt: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < MIN_ORDER_AMOUNT {
            return Err(GatewayError::BadRequest(format!(
                "amount must be at least {MIN_ORDER_AMOUNT}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: String,
    pub merchant_id: MerchantId,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub notes: Option<Notes>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a `created` order under a freshly minted id.
    ///
    /// The request must already have passed [`OrderRequest::validate`].
    pub fn create(merchant_id: MerchantId, request: OrderRequest) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(ORDER_PREFIX),
            merchant_id,
            amount: request.amount,
            currency: request.currency,
            receipt: request.receipt,
            notes: request.notes,
            status: OrderStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, merchant_id: MerchantId) -> bool {
        self.merchant_id == merchant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_amount() {
        assert!(matches!(
            OrderRequest::new(99).validate(),
            Err(GatewayError::BadRequest(_))
        ));
        assert!(OrderRequest::new(100).validate().is_ok());
        assert!(OrderRequest::new(-500).validate().is_err());
    }

    #[test]
    fn test_currency_is_stored_as_given() {
        for currency in ["usd", "RUPEES", ""] {
            let mut request = OrderRequest::new(500);
            request.currency = currency.to_string();
            assert!(request.validate().is_ok());

            let order = Order::create(MerchantId::new(), request);
            assert_eq!(order.currency, currency);
        }
    }

    #[test]
    fn test_request_defaults() {
        let request: OrderRequest = serde_json::from_str(r#"{"amount": 5000}"#).unwrap();
        assert_eq!(request.currency, "INR");
        assert_eq!(request.receipt, None);
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_create_order() {
        let merchant = MerchantId::new();
        let mut request = OrderRequest::new(500);
        request.receipt = Some("rcpt_1".to_string());
        let order = Order::create(merchant, request);

        assert!(order.id.starts_with("order_"));
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.amount, 500);
        assert_eq!(order.receipt.as_deref(), Some("rcpt_1"));
        assert!(order.is_owned_by(merchant));
        assert!(!order.is_owned_by(MerchantId::new()));
    }
}
