use super::merchant::{Credentials, Merchant, MerchantId};
use super::order::Order;
use super::payment::Payment;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fails with `Conflict` if an order with the same id already exists.
    async fn insert(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: &str) -> Result<Option<Order>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Fails with `Conflict` if a payment with the same id already exists.
    async fn insert(&self, payment: Payment) -> Result<()>;
    /// Overwrites an existing payment; fails with `NotFound` otherwise.
    async fn update(&self, payment: Payment) -> Result<()>;
    async fn get(&self, payment_id: &str) -> Result<Option<Payment>>;
    /// All payments of a merchant, newest first.
    async fn list_by_merchant(&self, merchant_id: MerchantId) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait AuthenticationGate: Send + Sync {
    /// Resolves credentials to a merchant or fails with `Authentication`.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Merchant>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type AuthenticationGateBox = Box<dyn AuthenticationGate>;
