use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::{
    OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERSION_KEY, REALM_KEY,
};

/// Realm sent in front of every authorization header.
pub const REALM: &str = "Schoology API";
/// The only `oauth_version` this client speaks.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
    Plaintext,
}

impl SignatureMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::Plaintext => "PLAINTEXT",
        }
    }
}

impl Default for SignatureMethod {
    fn default() -> Self {
        SignatureMethod::Plaintext
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The OAuth parameters carried by one request.
///
/// Fields are kept in the order they are serialized, both in the header
/// and in the signature base string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderComponents {
    pub consumer_key: String,
    pub nonce: String,
    pub signature_method: SignatureMethod,
    pub timestamp: i64,
    pub token: String,
    pub version: &'static str,
}

impl AuthHeaderComponents {
    /// Fresh components with a random nonce and the current time.
    pub fn generate<TKey, TToken>(
        consumer_key: TKey,
        signature_method: SignatureMethod,
        token: TToken,
    ) -> Self
    where
        TKey: Into<String>,
        TToken: Into<String>,
    {
        AuthHeaderComponents {
            consumer_key: consumer_key.into(),
            nonce: generate_nonce(),
            signature_method,
            timestamp: Utc::now().timestamp(),
            token: token.into(),
            version: OAUTH_VERSION,
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<String>,
    {
        AuthHeaderComponents {
            nonce: nonce.into(),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp(self, timestamp: i64) -> Self {
        AuthHeaderComponents { timestamp, ..self }
    }

    /// Key/value pairs in serialization order, realm and signature excluded.
    pub fn pairs(&self) -> [(&'static str, String); 6] {
        [
            (OAUTH_CONSUMER_KEY, self.consumer_key.clone()),
            (OAUTH_NONCE_KEY, self.nonce.clone()),
            (
                OAUTH_SIGNATURE_METHOD_KEY,
                self.signature_method.as_str().to_string(),
            ),
            (OAUTH_TIMESTAMP_KEY, self.timestamp.to_string()),
            (OAUTH_TOKEN_KEY, self.token.clone()),
            (OAUTH_VERSION_KEY, self.version.to_string()),
        ]
    }

    /// Renders `OAuth realm="...",oauth_consumer_key="...",...,oauth_signature="..."`.
    ///
    /// Values are written as-is; the signature must already be in the form
    /// the server expects.
    pub fn to_header(&self, signature: &str) -> String {
        let mut parts = Vec::with_capacity(8);
        parts.push(format!("OAuth {}=\"{}\"", REALM_KEY, REALM));
        for (key, value) in self.pairs().iter() {
            parts.push(format!("{}=\"{}\"", key, value));
        }
        parts.push(format!("{}=\"{}\"", OAUTH_SIGNATURE_KEY, signature));
        parts.join(",")
    }
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}
