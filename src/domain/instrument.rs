//! Payment instrument checks.
//!
//! Every function here is total: malformed input yields `false` or
//! [`CardNetwork::Unknown`], never a panic or an error. The workflow runs
//! these before anything is persisted.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;

pub const MIN_CARD_DIGITS: usize = 13;
pub const MAX_CARD_DIGITS: usize = 19;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Rupay,
    Unknown,
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "visa",
            CardNetwork::Mastercard => "mastercard",
            CardNetwork::Amex => "amex",
            CardNetwork::Rupay => "rupay",
            CardNetwork::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removes the spaces and hyphens customers type between digit groups.
pub fn strip_separators(number: &str) -> String {
    number.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// Luhn checksum over a card number of 13 to 19 digits.
pub fn is_valid_luhn(number: &str) -> bool {
    let cleaned = strip_separators(number);
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&cleaned.len())
        || !cleaned.bytes().all(|b| b.is_ascii_digit())
    {
        return false;
    }

    let sum: u32 = cleaned
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Classifies the card network from the leading digits.
///
/// Only affects stored metadata; an `Unknown` network never blocks a payment.
pub fn classify_network(number: &str) -> CardNetwork {
    let cleaned = strip_separators(number);
    if cleaned.starts_with('4') {
        return CardNetwork::Visa;
    }

    // Range checks only apply when the first two characters are digits.
    let Some(prefix) = cleaned
        .get(..2)
        .filter(|p| p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse::<u8>().ok())
    else {
        return CardNetwork::Unknown;
    };

    match prefix {
        51..=55 => CardNetwork::Mastercard,
        34 | 37 => CardNetwork::Amex,
        60 | 65 | 81..=89 => CardNetwork::Rupay,
        _ => CardNetwork::Unknown,
    }
}

/// Whether a card with this expiry is still usable this month.
pub fn is_valid_expiry(month: &str, year: &str) -> bool {
    is_valid_expiry_at(month, year, Utc::now().date_naive())
}

/// Same as [`is_valid_expiry`] against a fixed `today`.
pub fn is_valid_expiry_at(month: &str, year: &str, today: NaiveDate) -> bool {
    let (Ok(month), Some(year)) = (month.trim().parse::<u32>(), parse_year(year)) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let year = if (0..100).contains(&year) {
        year + 2000
    } else {
        year
    };
    let current = i64::from(today.year());

    year > current || (year == current && month >= today.month())
}

/// Parses a year of any magnitude. Values beyond `i64` saturate, so an
/// absurdly distant year is still in the future.
fn parse_year(year: &str) -> Option<i64> {
    match year.trim().parse::<i64>() {
        Ok(year) => Some(year),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Validates a `user@bank` virtual payment address.
///
/// The local part allows `[A-Za-z0-9._-]`, the handle only `[A-Za-z0-9]`,
/// and both must be non-empty.
pub fn is_valid_vpa(address: &str) -> bool {
    let Some((local, handle)) = address.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !handle.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        && handle.bytes().all(|b| b.is_ascii_alphanumeric())
}
