use crate::domain::payment::Payment;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct PaymentRow<'a> {
    id: &'a str,
    order_id: &'a str,
    amount: i64,
    currency: &'a str,
    method: &'static str,
    status: &'static str,
    vpa: Option<&'a str>,
    card_network: Option<&'static str>,
    card_last4: Option<&'a str>,
    error_code: Option<&'a str>,
    error_description: Option<&'a str>,
}

impl<'a> From<&'a Payment> for PaymentRow<'a> {
    fn from(p: &'a Payment) -> Self {
        Self {
            id: &p.id,
            order_id: &p.order_id,
            amount: p.amount,
            currency: &p.currency,
            method: p.method.as_str(),
            status: p.status.as_str(),
            vpa: p.vpa.as_deref(),
            card_network: p.card_network.map(|n| n.as_str()),
            card_last4: p.card_last4.as_deref(),
            error_code: p.error_code.as_deref(),
            error_description: p.error_description.as_deref(),
        }
    }
}

/// Writes settled payments as CSV, one row per payment.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments<'a, I>(&mut self, payments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Payment>,
    {
        for payment in payments {
            self.writer.serialize(PaymentRow::from(payment))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
