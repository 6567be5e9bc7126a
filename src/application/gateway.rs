use crate::domain::ids::{ORDER_PREFIX, PAYMENT_PREFIX, new_id};
use crate::domain::instrument::{
    classify_network, is_valid_expiry, is_valid_luhn, is_valid_vpa, strip_separators,
};
use crate::domain::merchant::Merchant;
use crate::domain::order::{Order, OrderRequest};
use crate::domain::payment::{Instrument, Payment, PaymentMethod, PaymentRequest};
use crate::domain::ports::{OrderStoreBox, PaymentStoreBox};
use crate::domain::settlement::SettlementSimulatorBox;
use crate::error::{GatewayError, InstrumentError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The payment workflow.
///
/// `PaymentGateway` creates orders, validates instruments, opens payments in
/// `processing` and drives each one to exactly one terminal status. Every
/// operation is scoped to the authenticated merchant: records owned by
/// someone else are reported as not found.
pub struct PaymentGateway {
    orders: OrderStoreBox,
    payments: PaymentStoreBox,
    settlement: SettlementSimulatorBox,
}

impl PaymentGateway {
    /// Creates a new `PaymentGateway` instance.
    ///
    /// # Arguments
    ///
    /// * `orders` - The store for orders.
    /// * `payments` - The store for payments.
    /// * `settlement` - Produces the delay and outcome of each settlement.
    pub fn new(
        orders: OrderStoreBox,
        payments: PaymentStoreBox,
        settlement: SettlementSimulatorBox,
    ) -> Self {
        Self {
            orders,
            payments,
            settlement,
        }
    }

    pub async fn create_order(&self, merchant: &Merchant, request: OrderRequest) -> Result<Order> {
        request.validate()?;

        let mut order = Order::create(merchant.id, request);
        match self.orders.insert(order.clone()).await {
            Ok(()) => {}
            Err(GatewayError::Conflict(id)) => {
                warn!(order_id = %id, "order id collision, retrying with a fresh id");
                order.id = new_id(ORDER_PREFIX);
                self.orders.insert(order.clone()).await?;
            }
            Err(err) => return Err(err),
        }

        info!(order_id = %order.id, merchant_id = %merchant.id, amount = order.amount, "order created");
        Ok(order)
    }

    pub async fn get_order(&self, merchant: &Merchant, order_id: &str) -> Result<Order> {
        self.orders
            .get(order_id)
            .await?
            .filter(|o| o.is_owned_by(merchant.id))
            .ok_or(GatewayError::NotFound("Order"))
    }

    /// Creates a payment and waits for it to settle.
    ///
    /// A declined payment is not an error: it comes back with status `failed`.
    pub async fn create_payment(
        &self,
        merchant: &Merchant,
        request: PaymentRequest,
    ) -> Result<Payment> {
        let payment = self.open_payment(merchant, request).await?;
        self.settle(payment).await
    }

    /// Creates a payment and settles it on a background task.
    ///
    /// Returns the `processing` payment immediately together with the handle
    /// resolving to the settled payment.
    pub async fn submit_payment(
        self: &Arc<Self>,
        merchant: &Merchant,
        request: PaymentRequest,
    ) -> Result<(Payment, JoinHandle<Result<Payment>>)> {
        let payment = self.open_payment(merchant, request).await?;
        let gateway = Arc::clone(self);
        let pending = payment.clone();
        let handle = tokio::spawn(async move { gateway.settle(pending).await });
        Ok((payment, handle))
    }

    pub async fn get_payment(&self, merchant: &Merchant, payment_id: &str) -> Result<Payment> {
        self.payments
            .get(payment_id)
            .await?
            .filter(|p| p.is_owned_by(merchant.id))
            .ok_or(GatewayError::NotFound("Payment"))
    }

    /// All payments of the merchant, newest first.
    pub async fn list_payments(&self, merchant: &Merchant) -> Result<Vec<Payment>> {
        self.payments.list_by_merchant(merchant.id).await
    }

    /// Resolves the order, validates the instrument and persists the payment
    /// in `processing`.
    async fn open_payment(&self, merchant: &Merchant, request: PaymentRequest) -> Result<Payment> {
        let order = self.get_order(merchant, &request.order_id).await?;
        let instrument = validate_instrument(request)?;

        let mut payment = Payment::open(&order, instrument);
        match self.payments.insert(payment.clone()).await {
            Ok(()) => {}
            Err(GatewayError::Conflict(id)) => {
                warn!(payment_id = %id, "payment id collision, retrying with a fresh id");
                payment.id = new_id(PAYMENT_PREFIX);
                self.payments.insert(payment.clone()).await?;
            }
            Err(err) => return Err(err),
        }

        info!(
            payment_id = %payment.id,
            order_id = %payment.order_id,
            method = %payment.method,
            "payment processing"
        );
        Ok(payment)
    }

    /// The only place a payment leaves `processing`.
    async fn settle(&self, mut payment: Payment) -> Result<Payment> {
        let outcome = self.settlement.simulate(payment.method);
        debug!(payment_id = %payment.id, delay_ms = outcome.delay.as_millis() as u64, "awaiting settlement");
        tokio::time::sleep(outcome.delay).await;

        payment.settle(outcome.succeeded)?;
        self.payments.update(payment.clone()).await?;

        info!(payment_id = %payment.id, status = %payment.status, "payment settled");
        Ok(payment)
    }
}

/// Checks the method-specific fields and reduces them to what may be stored.
///
/// Consumes the request so the raw card number and CVV are dropped here.
fn validate_instrument(request: PaymentRequest) -> Result<Instrument> {
    match request.method.parse::<PaymentMethod>()? {
        PaymentMethod::Upi => {
            let vpa = request.vpa.unwrap_or_default();
            if !is_valid_vpa(&vpa) {
                return Err(InstrumentError::InvalidVpa.into());
            }
            Ok(Instrument::Upi { vpa })
        }
        PaymentMethod::Card => {
            let card = request
                .card
                .ok_or_else(|| GatewayError::BadRequest("Card details required".to_string()))?;
            if !is_valid_luhn(&card.number) {
                return Err(InstrumentError::InvalidCard.into());
            }
            if !is_valid_expiry(&card.expiry_month, &card.expiry_year) {
                return Err(InstrumentError::ExpiredCard.into());
            }

            let digits = strip_separators(&card.number);
            let last4 = digits[digits.len() - 4..].to_string();
            Ok(Instrument::Card {
                network: classify_network(&digits),
                last4,
            })
        }
    }
}
