use std::{collections::HashMap, str::FromStr};

use serde::Deserialize;

use crate::{Token, TokenReaderError, TokenReaderResult, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// Represents response of token acquisition.
///
/// Bodies are read as a generic url-encoded form, so a response without the
/// standard keys still parses: `token=🔑` yields no `oauth_token`, no
/// `oauth_token_secret` and `{"token": "🔑"}` in `remain`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: Option<String>,
    /// OAuth Token Secret
    pub oauth_token_secret: Option<String>,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl TokenResponse {
    /// Strict conversion, failing when either standard key is absent.
    pub fn into_token(self) -> TokenReaderResult<Token> {
        let raw = self.to_string_lossy();
        match (self.oauth_token, self.oauth_token_secret) {
            (Some(t), Some(s)) => Ok(Token::new(t, s)),
            (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, raw)),
            (_, None) => Err(TokenReaderError::TokenKeyNotFound(
                OAUTH_TOKEN_SECRET_KEY,
                raw,
            )),
        }
    }

    /// The token as it is held by the client; absent keys become empty strings.
    pub fn to_token_lossy(&self) -> Token {
        Token::new(
            self.oauth_token.clone().unwrap_or_default(),
            self.oauth_token_secret.clone().unwrap_or_default(),
        )
    }

    fn to_string_lossy(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = self
            .remain
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort();
        if let Some(ref secret) = self.oauth_token_secret {
            pairs.insert(0, (OAUTH_TOKEN_SECRET_KEY, secret.as_str()));
        }
        if let Some(ref token) = self.oauth_token {
            pairs.insert(0, (OAUTH_TOKEN_KEY, token.as_str()));
        }
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }
}

impl FromStr for TokenResponse {
    type Err = TokenReaderError;

    fn from_str(text: &str) -> TokenReaderResult<Self> {
        read_oauth_token(text)
    }
}

pub(crate) fn read_oauth_token(text: &str) -> TokenReaderResult<TokenResponse> {
    serde_urlencoded::from_str::<TokenResponse>(text)
        .map_err(|e| TokenReaderError::Malformed(format!("{} in {}", e, text)))
}
