use std::fmt;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::format_instant;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("API secret must not be empty")]
    EmptyApiSecret,

    #[error("API secret cannot be used as an HMAC key")]
    InvalidKey,
}

#[derive(Clone)]
/// API key/secret pair that signs every request.
///
/// Each call to [`Authenticator::generate_auth_info`] uses a fresh salt and
/// the current time; nothing is cached.
pub struct Authenticator {
    api_key: String,
    api_secret: String,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Authenticator {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build the `Authorization` header value for one request:
    /// `HMAC-SHA256 Apikey=<key>, Date=<date>, salt=<salt>, signature=<signature>`.
    pub fn generate_auth_info(&self) -> Result<String, CredentialError> {
        let date = format_instant(&Utc::now());
        let salt = Uuid::new_v4().simple().to_string();
        self.sign(&date, &salt)
    }

    /// Deterministic variant of [`Authenticator::generate_auth_info`] for a
    /// given date string and salt.
    pub fn sign(&self, date: &str, salt: &str) -> Result<String, CredentialError> {
        if self.api_key.is_empty() {
            return Err(CredentialError::EmptyApiKey);
        }
        if self.api_secret.is_empty() {
            return Err(CredentialError::EmptyApiSecret);
        }

        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|_| CredentialError::InvalidKey)?;
        mac.update(date.as_bytes());
        mac.update(salt.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!(
            "HMAC-SHA256 Apikey={}, Date={date}, salt={salt}, signature={signature}",
            self.api_key
        ))
    }
}
