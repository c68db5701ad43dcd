use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use tracing::debug;

use crate::{AuthHeaderComponents, SecretsProvider, SignError, SignResult, SignatureMethod};

type HmacSha1 = Hmac<Sha1>;

/// Encoded form of `&` used when no token secret exists yet.
const ENCODED_AMPERSAND: &str = "%26";

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
pub(crate) const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Produces authorization headers from whatever secrets it borrows.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider) -> Self {
        Signer { secrets }
    }

    /// Components for the given method, carrying the consumer key and `token`.
    pub fn components(
        &self,
        signature_method: SignatureMethod,
        token: &str,
    ) -> AuthHeaderComponents {
        let (consumer_key, _) = self.secrets.get_consumer_key_pair();
        AuthHeaderComponents::generate(consumer_key, signature_method, token)
    }

    /// Header for the request-token call, before any token exists.
    pub fn unsigned_header(&self) -> String {
        self.unsigned_header_with(&self.components(SignatureMethod::Plaintext, ""))
    }

    pub fn unsigned_header_with(&self, components: &AuthHeaderComponents) -> String {
        let (_, consumer_secret) = self.secrets.get_consumer_key_pair();
        debug!(
            timestamp = components.timestamp,
            "built unsigned authorization header"
        );
        components.to_header(&format!("{}{}", consumer_secret, ENCODED_AMPERSAND))
    }

    /// PLAINTEXT header carrying the held token.
    pub fn plaintext_header(&self) -> String {
        let (token, _) = self.secrets.get_token_pair_or_empty();
        self.plaintext_header_with(&self.components(SignatureMethod::Plaintext, token))
    }

    pub fn plaintext_header_with(&self, components: &AuthHeaderComponents) -> String {
        debug!(
            timestamp = components.timestamp,
            "built plaintext authorization header"
        );
        components.to_header(&self.signing_key())
    }

    /// HMAC-SHA1 header for `method` on `url`, carrying the held token.
    pub fn signed_header(&self, method: &str, url: &str) -> SignResult<String> {
        let (token, _) = self.secrets.get_token_pair_or_empty();
        self.signed_header_with(
            &self.components(SignatureMethod::HmacSha1, token),
            method,
            url,
        )
    }

    pub fn signed_header_with(
        &self,
        components: &AuthHeaderComponents,
        method: &str,
        url: &str,
    ) -> SignResult<String> {
        let signature = self.sign(components, method, url)?;
        debug!(
            timestamp = components.timestamp,
            "built hmac-sha1 authorization header"
        );
        Ok(components.to_header(&signature))
    }

    /// base64(HMAC-SHA1(consumer_secret&token_secret, base_string)).
    pub fn sign(
        &self,
        components: &AuthHeaderComponents,
        method: &str,
        url: &str,
    ) -> SignResult<String> {
        let base = base_string(components, method, url);
        debug!(base_string = %base, "built signature base string");

        let key = self.signing_key();
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|_| SignError::InvalidKey(key.len()))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// `consumer_secret&token_secret`; the token secret is empty without a token.
    pub fn signing_key(&self) -> String {
        let (_, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (_, token_secret) = self.secrets.get_token_pair_or_empty();
        format!("{}&{}", consumer_secret, token_secret)
    }
}

/// `METHOD&url&params`, each segment percent-encoded on its own.
///
/// The parameter segment is the components as `key=value` joined by `&`,
/// in declaration order and without encoding the values first.
pub fn base_string(components: &AuthHeaderComponents, method: &str, url: &str) -> String {
    let params = components
        .pairs()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<String>>()
        .join("&");
    [method.to_uppercase().as_str(), url, params.as_str()]
        .iter()
        .map(|segment| percent_encode(segment))
        .collect::<Vec<String>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credentials, Secrets, Token};

    const URL: &str = "https://api.schoology.com/v1/users/me";

    fn secrets() -> Secrets {
        Secrets::new(Credentials::new("TEST_KEY", "TEST_SECRET"))
            .token(Token::new("TOKEN", "TOKEN_SECRET"))
    }

    fn fixed(signature_method: SignatureMethod) -> AuthHeaderComponents {
        AuthHeaderComponents::generate("TEST_KEY", signature_method, "TOKEN")
            .nonce("bm9uY2U=")
            .timestamp(1_600_000_000)
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(percent_encode("a b&c=d/e+f"), "a%20b%26c%3Dd%2Fe%2Bf");
        assert_eq!(percent_encode("-._~AZaz09"), "-._~AZaz09");
        assert_eq!(percent_encode("🔑"), "%F0%9F%94%91");
    }

    #[test]
    fn base_string_layout() {
        let base = base_string(&fixed(SignatureMethod::HmacSha1), "get", URL);
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.schoology.com%2Fv1%2Fusers%2Fme&\
             oauth_consumer_key%3DTEST_KEY%26oauth_nonce%3Dbm9uY2U%3D%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1600000000%26\
             oauth_token%3DTOKEN%26oauth_version%3D1.0"
        );
    }

    #[test]
    fn signed_header_golden_value() {
        let secrets = secrets();
        let header = Signer::new(&secrets)
            .signed_header_with(&fixed(SignatureMethod::HmacSha1), "get", URL)
            .unwrap();
        assert_eq!(
            header,
            "OAuth realm=\"Schoology API\",oauth_consumer_key=\"TEST_KEY\",\
             oauth_nonce=\"bm9uY2U=\",oauth_signature_method=\"HMAC-SHA1\",\
             oauth_timestamp=\"1600000000\",oauth_token=\"TOKEN\",oauth_version=\"1.0\",\
             oauth_signature=\"WwpS/R2F8FD6gq71jbPs9/rqvIQ=\""
        );
    }

    #[test]
    fn signature_is_deterministic() {
        let secrets = secrets();
        let signer = Signer::new(&secrets);
        let components = fixed(SignatureMethod::HmacSha1);
        assert_eq!(
            signer.sign(&components, "GET", URL).unwrap(),
            signer.sign(&components, "GET", URL).unwrap()
        );
    }

    #[test]
    fn signature_depends_on_every_input() {
        let components = fixed(SignatureMethod::HmacSha1);
        let secrets = secrets();
        let original = Signer::new(&secrets).sign(&components, "GET", URL).unwrap();

        let other_method = Signer::new(&secrets).sign(&components, "POST", URL).unwrap();
        let other_url = Signer::new(&secrets)
            .sign(&components, "GET", "https://api.schoology.com/v1/users")
            .unwrap();
        let other_consumer = Secrets::new(Credentials::new("TEST_KEY", "OTHER_SECRET"))
            .token(Token::new("TOKEN", "TOKEN_SECRET"));
        let other_consumer = Signer::new(&other_consumer)
            .sign(&components, "GET", URL)
            .unwrap();
        let other_token = Secrets::new(Credentials::new("TEST_KEY", "TEST_SECRET"))
            .token(Token::new("TOKEN", "OTHER_TOKEN_SECRET"));
        let other_token = Signer::new(&other_token)
            .sign(&components, "GET", URL)
            .unwrap();

        for changed in &[other_method, other_url, other_consumer, other_token] {
            assert_ne!(changed, &original);
        }
    }

    #[test]
    fn method_case_does_not_matter() {
        let secrets = secrets();
        let signer = Signer::new(&secrets);
        let components = fixed(SignatureMethod::HmacSha1);
        assert_eq!(
            signer.sign(&components, "get", URL).unwrap(),
            signer.sign(&components, "GET", URL).unwrap()
        );
    }

    #[test]
    fn unsigned_header_uses_encoded_ampersand() {
        let secrets = secrets();
        let header = Signer::new(&secrets).unsigned_header();
        assert!(header.starts_with("OAuth realm=\"Schoology API\","));
        assert!(header.contains("oauth_signature=\"TEST_SECRET%26\""));
        assert!(header.contains("oauth_token=\"\""));
        assert!(header.contains("oauth_signature_method=\"PLAINTEXT\""));
    }

    #[test]
    fn plaintext_header_joins_secrets() {
        let secrets = secrets();
        let header = Signer::new(&secrets).plaintext_header();
        assert!(header.contains("oauth_token=\"TOKEN\""));
        assert!(header.contains("oauth_signature=\"TEST_SECRET&TOKEN_SECRET\""));
    }

    #[test]
    fn missing_token_leaves_key_open() {
        let secrets = Secrets::new(Credentials::new("TEST_KEY", "TEST_SECRET"));
        let signer = Signer::new(&secrets);
        assert_eq!(signer.signing_key(), "TEST_SECRET&");
        let header = signer.signed_header("GET", URL).unwrap();
        assert!(header.contains("oauth_token=\"\""));
    }
}
