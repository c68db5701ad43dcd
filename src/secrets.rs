use serde::{Deserialize, Serialize};

pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    /// Token and token secret, each falling back to the empty string.
    fn get_token_pair_or_empty<'a>(&'a self) -> (&'a str, &'a str) {
        self.get_token_pair_option().unwrap_or(("", ""))
    }
}

/// Consumer key and secret issued to the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl Credentials {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }
}

/// Request token or access token, whichever the handshake last produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Token {
    #[serde(rename = "oauth_token")]
    pub token: String,
    #[serde(rename = "oauth_token_secret")]
    pub token_secret: String,
}

impl Token {
    pub fn new<TKey, TSecret>(token: TKey, token_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Token {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

/// Credentials plus the token currently held by a client.
#[derive(Debug, Clone)]
pub struct Secrets {
    credentials: Credentials,
    token: Option<Token>,
}

impl Secrets {
    pub fn new(credentials: Credentials) -> Self {
        Secrets {
            credentials,
            token: None,
        }
    }

    pub fn token(self, token: Token) -> Self {
        Secrets {
            token: Some(token),
            ..self
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Overwrites the held token; the previous one is dropped.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }
}

impl SecretsProvider for Secrets {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (
            &self.credentials.consumer_key,
            &self.credentials.consumer_secret,
        )
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        self.token
            .as_ref()
            .map(|t| (t.token.as_str(), t.token_secret.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CONSUMER_KEY: &str = "<CONSUMER_KEY>";
    static CONSUMER_SECRET: &str = "<CONSUMER_SECRET>";
    static TOKEN: &str = "<ACCESS_TOKEN>";
    static TOKEN_SECRET: &str = "<ACCESS_TOKEN_SECRET>";

    #[test]
    fn secrets_without_token() {
        let secrets = Secrets::new(Credentials::new(CONSUMER_KEY, CONSUMER_SECRET));
        assert_eq!(
            secrets.get_consumer_key_pair(),
            (CONSUMER_KEY, CONSUMER_SECRET)
        );
        assert_eq!(secrets.get_token_pair_option(), None);
        assert_eq!(secrets.get_token_pair_or_empty(), ("", ""));
    }

    #[test]
    fn set_token_overwrites_previous() {
        let mut secrets = Secrets::new(Credentials::new(CONSUMER_KEY, CONSUMER_SECRET))
            .token(Token::new("request", "request_secret"));
        secrets.set_token(Token::new(TOKEN, TOKEN_SECRET));
        assert_eq!(secrets.get_token_pair_option(), Some((TOKEN, TOKEN_SECRET)));

        secrets.clear_token();
        assert!(secrets.current_token().is_none());
    }

    #[test]
    fn token_serde_uses_oauth_keys() {
        let token: Token =
            serde_urlencoded::from_str("oauth_token=abc&oauth_token_secret=def").unwrap();
        assert_eq!(token, Token::new("abc", "def"));
    }
}
