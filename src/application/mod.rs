//! Application layer containing the payment workflow orchestration.
//!
//! This module defines the `PaymentGateway`, the entry point the transport
//! layer calls once a merchant has been authenticated. Settlement delays are
//! awaited on the tokio timer so concurrent payments never block each other.

pub mod checkout;
pub mod gateway;
