use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("transport failed : {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    #[error("response is not the expected json : {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid endpoint url : {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("signing key rejected by hmac, length {0}")]
    InvalidKey(usize),
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("response is not an url-encoded form : {0}")]
    Malformed(String),
}
