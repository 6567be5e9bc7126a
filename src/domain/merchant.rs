use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(transparent)]
pub struct MerchantId(pub Uuid);

impl MerchantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MerchantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The api key/secret pair a caller presents to the authentication gate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A resolved merchant identity. Orders and payments are scoped to its `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    pub id: MerchantId,
    pub name: String,
    pub email: String,
    pub credentials: Credentials,
}

impl Merchant {
    pub fn new(name: impl Into<String>, email: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            id: MerchantId::new(),
            name: name.into(),
            email: email.into(),
            credentials,
        }
    }

    /// The merchant seeded for local testing.
    pub fn test_merchant() -> Self {
        Self {
            id: MerchantId(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000)),
            name: "Test Merchant".to_string(),
            email: "test@example.com".to_string(),
            credentials: Credentials::new("key_test_abc123", "secret_test_xyz789"),
        }
    }
}
