use crate::application::checkout::Checkout;
use crate::domain::merchant::Credentials;
use crate::domain::order::{DEFAULT_CURRENCY, Notes, OrderRequest};
use crate::domain::payment::CardDetails;
use crate::error::{GatewayError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of a checkouts file.
///
/// `notes`, when present, is a JSON object. Card columns are only used when
/// number, expiry and CVV are all filled in.
#[derive(Deserialize)]
pub struct CheckoutRecord {
    pub api_key: String,
    pub api_secret: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub method: String,
    #[serde(default)]
    pub vpa: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<String>,
    #[serde(default)]
    pub expiry_year: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
}

impl TryFrom<CheckoutRecord> for Checkout {
    type Error = GatewayError;

    fn try_from(record: CheckoutRecord) -> Result<Self> {
        let notes = record
            .notes
            .map(|raw| {
                serde_json::from_str::<Notes>(&raw)
                    .map_err(|e| GatewayError::BadRequest(format!("notes must be a JSON object: {e}")))
            })
            .transpose()?;

        let card = match (
            record.card_number,
            record.expiry_month,
            record.expiry_year,
            record.cvv,
        ) {
            (Some(number), Some(expiry_month), Some(expiry_year), Some(cvv)) => Some(CardDetails {
                number,
                expiry_month,
                expiry_year,
                cvv,
                holder_name: record.holder_name.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Checkout {
            credentials: Credentials::new(record.api_key, record.api_secret),
            order: OrderRequest {
                amount: record.amount,
                currency: record
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                receipt: record.receipt,
                notes,
            },
            method: record.method,
            vpa: record.vpa,
            card,
        })
    }
}

/// Reads checkouts from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Checkout>`.
/// It handles whitespace trimming and short records automatically.
pub struct CheckoutReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CheckoutReader<R> {
    /// Creates a new `CheckoutReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and converts checkouts.
    pub fn checkouts(self) -> impl Iterator<Item = Result<Checkout>> {
        self.reader
            .into_deserialize::<CheckoutRecord>()
            .map(|result| Checkout::try_from(result?))
    }
}
