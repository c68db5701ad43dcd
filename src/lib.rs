/*!
schoology-oauth1: Schoology API client speaking OAuth 1.0a over reqwest.

# Overview

This library builds the OAuth 1.0a `Authorization` headers Schoology expects
(unsigned, PLAINTEXT and HMAC-SHA1), walks through the three-legged
handshake, and issues authenticated calls against the API, including
streamed file downloads.

Network calls go through the [`Transport`] trait; [`ReqwestTransport`] is the
default implementation.

# How to use

## Acquiring an access token

```no_run
use schoology_oauth1::SchoologyClient;

# async fn run() -> schoology_oauth1::Result<()> {
let mut client = SchoologyClient::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");

// step 1: acquire request token & token secret, held by the client
client.get_request_token().await?;

// step 2: send the user to authorize it
println!(
    "please access to: {}",
    client.connect_url("https://example.com/schoology/callback")
);

// step 3: once the user comes back, exchange it for an access token
let access = client.get_access_token(None).await?;
println!("your token is: {:?}", access.oauth_token);

// the client now holds the access token
let me = client.get_user_info(None).await?;
println!("{:#}", me);
# Ok(())
# }
```

## Calling the API with a stored access token

```no_run
use schoology_oauth1::{ClientConfig, SchoologyClient, Token};

# async fn run() -> schoology_oauth1::Result<()> {
let config: ClientConfig = serde_json::from_str(
    r#"{"consumer_key": "[KEY]", "consumer_secret": "[SECRET]",
        "site_base": "https://district.schoologytest.com"}"#,
)?;
let mut client = SchoologyClient::from_config(&config)?;
client.set_token(Token::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]"));

let sections = client
    .make_request(http::Method::GET, "/users/1234/sections", None)
    .await?;
println!("{}", sections);

let mut file = client
    .download_file("https://api.schoologytest.com/v1/attachment/1/source/abc.pdf")
    .await?;
while let Some(chunk) = file.chunk().await? {
    println!("received {} bytes", chunk.len());
}
# Ok(())
# }
```

A client holds one token at a time. Methods that replace it take
`&mut self`; to share a client across tasks, put it behind your own lock.
*/
mod client;
mod config;
mod error;
mod header;
mod secrets;
mod signer;
mod token_reader;
mod transport;

// exposed to external program
pub use client::SchoologyClient;
pub use config::{
    ClientConfig, Endpoints, DEFAULT_SITE_BASE, SCHOOLOGYTEST_API_HOST, SCHOOLOGY_API_HOST,
};
pub use error::{Error, Result, SignError, SignResult, TokenReaderError, TokenReaderResult};
pub use header::{AuthHeaderComponents, SignatureMethod, OAUTH_VERSION, REALM};
pub use secrets::{Credentials, Secrets, SecretsProvider, Token};
pub use signer::{base_string, percent_encode, Signer};
pub use token_reader::TokenResponse;
pub use transport::{ReqwestTransport, ResponseMode, Transport, TransportRequest};

// exposed constant variables
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";
