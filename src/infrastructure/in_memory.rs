use crate::domain::merchant::{Credentials, Merchant, MerchantId};
use crate::domain::order::Order;
use crate::domain::payment::Payment;
use crate::domain::ports::{AuthenticationGate, OrderStore, PaymentStore};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap<String, Order>>>` to allow shared concurrent access.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.entry(order.id.clone()) {
            Entry::Occupied(entry) => Err(GatewayError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(order);
                Ok(())
            }
        }
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }
}

#[derive(Default)]
struct PaymentTable {
    by_id: HashMap<String, Payment>,
    // Insertion order, oldest first.
    sequence: Vec<String>,
}

/// A thread-safe in-memory store for payments.
///
/// Lists newest `created_at` first and keeps insertion order so payments
/// created at the same instant come back newest insert first.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<PaymentTable>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, payment: Payment) -> Result<()> {
        let mut table = self.payments.write().await;
        if table.by_id.contains_key(&payment.id) {
            return Err(GatewayError::Conflict(payment.id));
        }
        table.sequence.push(payment.id.clone());
        table.by_id.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        let mut table = self.payments.write().await;
        match table.by_id.get_mut(&payment.id) {
            Some(existing) => {
                *existing = payment;
                Ok(())
            }
            None => Err(GatewayError::NotFound("Payment")),
        }
    }

    async fn get(&self, payment_id: &str) -> Result<Option<Payment>> {
        let table = self.payments.read().await;
        Ok(table.by_id.get(payment_id).cloned())
    }

    async fn list_by_merchant(&self, merchant_id: MerchantId) -> Result<Vec<Payment>> {
        let table = self.payments.read().await;
        let mut payments: Vec<Payment> = table
            .sequence
            .iter()
            .rev()
            .filter_map(|id| table.by_id.get(id))
            .filter(|p| p.merchant_id == merchant_id)
            .cloned()
            .collect();
        // Stable, so equal timestamps keep reverse insertion order
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }
}

/// Merchants keyed by api key. Stands in for the credential lookup a real
/// deployment does against its merchant table.
#[derive(Default, Clone)]
pub struct InMemoryMerchantDirectory {
    merchants: Arc<RwLock<HashMap<String, Merchant>>>,
}

impl InMemoryMerchantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory seeded with [`Merchant::test_merchant`].
    pub async fn with_test_merchant() -> Self {
        let directory = Self::new();
        directory.register(Merchant::test_merchant()).await;
        directory
    }

    /// Adds or replaces a merchant under its api key.
    pub async fn register(&self, merchant: Merchant) {
        let mut merchants = self.merchants.write().await;
        merchants.insert(merchant.credentials.api_key.clone(), merchant);
    }
}

#[async_trait]
impl AuthenticationGate for InMemoryMerchantDirectory {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Merchant> {
        let merchants = self.merchants.read().await;
        merchants
            .get(&credentials.api_key)
            .filter(|m| m.credentials.api_secret == credentials.api_secret)
            .cloned()
            .ok_or(GatewayError::Authentication)
    }
}
