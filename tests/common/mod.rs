#![allow(dead_code)]

use paygate::application::gateway::PaymentGateway;
use paygate::domain::merchant::{Credentials, Merchant};
use paygate::domain::payment::{CardDetails, PaymentRequest};
use paygate::domain::settlement::{ExecutionMode, SimulatedSettlement};
use paygate::infrastructure::in_memory::{InMemoryOrderStore, InMemoryPaymentStore};
use std::io::Write;
use tempfile::NamedTempFile;

pub const CHECKOUT_HEADER: &str = "api_key,api_secret,amount,currency,receipt,notes,method,vpa,card_number,expiry_month,expiry_year,cvv,holder_name";

pub const TEST_KEY: &str = "key_test_abc123";
pub const TEST_SECRET: &str = "secret_test_xyz789";

/// Writes a checkouts CSV with the standard header and the given rows.
pub fn write_checkouts(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{CHECKOUT_HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

pub fn card_row(amount: i64, number: &str, month: &str, year: &str) -> String {
    format!("{TEST_KEY},{TEST_SECRET},{amount},INR,,,card,,{number},{month},{year},123,Jane Doe")
}

pub fn upi_row(amount: i64, vpa: &str) -> String {
    format!("{TEST_KEY},{TEST_SECRET},{amount},INR,,,upi,{vpa},,,,,")
}

/// A gateway over in-memory stores that settles instantly with a fixed outcome.
pub fn deterministic_gateway(succeed: bool) -> PaymentGateway {
    PaymentGateway::new(
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemoryPaymentStore::new()),
        Box::new(SimulatedSettlement::new(ExecutionMode::deterministic(
            succeed, 0,
        ))),
    )
}

pub fn other_merchant() -> Merchant {
    Merchant::new(
        "Other Merchant",
        "other@example.com",
        Credentials::new("key_other", "secret_other"),
    )
}

pub fn card(number: &str) -> CardDetails {
    CardDetails {
        number: number.to_string(),
        expiry_month: "12".to_string(),
        expiry_year: "2099".to_string(),
        cvv: "123".to_string(),
        holder_name: "Jane Doe".to_string(),
    }
}

pub fn card_payment(order_id: &str, number: &str) -> PaymentRequest {
    PaymentRequest {
        order_id: order_id.to_string(),
        method: "card".to_string(),
        vpa: None,
        card: Some(card(number)),
    }
}

pub fn upi_payment(order_id: &str, vpa: &str) -> PaymentRequest {
    PaymentRequest {
        order_id: order_id.to_string(),
        method: "upi".to_string(),
        vpa: Some(vpa.to_string()),
        card: None,
    }
}
