use rand::Rng;
use rand::distributions::Alphanumeric;

pub const ORDER_PREFIX: &str = "order";
pub const PAYMENT_PREFIX: &str = "pay";

/// Length of the random suffix appended after `<prefix>_`.
pub const ID_SUFFIX_LEN: usize = 16;

/// Mints an identifier of the form `<prefix>_XXXXXXXXXXXXXXXX`.
///
/// The suffix is drawn uniformly from `[A-Za-z0-9]` using the thread-local RNG.
/// Uniqueness is not guaranteed here; stores reject duplicates with
/// [`GatewayError::Conflict`](crate::error::GatewayError::Conflict).
pub fn new_id(prefix: &str) -> String {
    new_id_with(&mut rand::thread_rng(), prefix)
}

pub fn new_id_with<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{prefix}_{suffix}")
}
