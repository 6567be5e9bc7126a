use crate::application::gateway::PaymentGateway;
use crate::domain::merchant::Credentials;
use crate::domain::order::OrderRequest;
use crate::domain::payment::{CardDetails, Payment, PaymentRequest};
use crate::domain::ports::AuthenticationGateBox;
use crate::error::{GatewayError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// One end-to-end purchase: authenticate, create an order, pay for it.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub credentials: Credentials,
    pub order: OrderRequest,
    pub method: String,
    pub vpa: Option<String>,
    pub card: Option<CardDetails>,
}

/// Runs checkouts against a [`PaymentGateway`] on behalf of the merchants
/// the authentication gate resolves.
pub struct CheckoutService {
    gateway: Arc<PaymentGateway>,
    gate: AuthenticationGateBox,
}

impl CheckoutService {
    pub fn new(gateway: Arc<PaymentGateway>, gate: AuthenticationGateBox) -> Self {
        Self { gateway, gate }
    }

    pub fn gateway(&self) -> &Arc<PaymentGateway> {
        &self.gateway
    }

    pub async fn checkout(&self, checkout: Checkout) -> Result<Payment> {
        let merchant = self.gate.authenticate(&checkout.credentials).await?;
        let order = self.gateway.create_order(&merchant, checkout.order).await?;

        let request = PaymentRequest {
            order_id: order.id,
            method: checkout.method,
            vpa: checkout.vpa,
            card: checkout.card,
        };
        self.gateway.create_payment(&merchant, request).await
    }

    /// Runs all checkouts concurrently. Results come back in input order; a
    /// checkout whose task panicked reports the `JoinError` in its own slot.
    pub async fn run_all(self: &Arc<Self>, checkouts: Vec<Checkout>) -> Vec<Result<Payment>> {
        let handles: Vec<JoinHandle<Result<Payment>>> = checkouts
            .into_iter()
            .map(|checkout| {
                let service = Arc::clone(self);
                tokio::spawn(async move { service.checkout(checkout).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap_or_else(|e| Err(GatewayError::from(e))));
        }
        debug!(completed = results.len(), "checkout batch finished");
        results
    }
}
