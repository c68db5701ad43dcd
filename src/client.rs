use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::signer::percent_encode;
use crate::token_reader::read_oauth_token;
use crate::{
    AuthHeaderComponents, ClientConfig, Credentials, Endpoints, ReqwestTransport, ResponseMode,
    Result, Secrets, SecretsProvider, SignResult, SignatureMethod, Signer, Token, TokenResponse,
    Transport, TransportRequest,
};

const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";
const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";
const AUTHORIZE_PATH: &str = "/oauth/authorize";
const USER_INFO_PATH: &str = "/app-user-info";

/// Schoology API client holding the consumer credentials and the current token.
///
/// Operations that replace the token take `&mut self`, so one instance can
/// only run one handshake at a time. Share a client between tasks behind
/// your own lock, or use one client per in-flight handshake.
#[derive(Debug)]
pub struct SchoologyClient<TTransport = ReqwestTransport> {
    secrets: Secrets,
    endpoints: Endpoints,
    transport: TTransport,
}

impl SchoologyClient<ReqwestTransport> {
    /// Constructs a client for the production site on a default `reqwest::Client`.
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        SchoologyClient::with_transport(
            Credentials::new(consumer_key, consumer_secret),
            Endpoints::default(),
            ReqwestTransport::new(),
        )
    }

    /// Constructs a client from loaded settings on a default `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Fails when the configured site base or API host is not an absolute URL.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(SchoologyClient::with_transport(
            config.credentials(),
            config.endpoints()?,
            ReqwestTransport::new(),
        ))
    }
}

impl<TTransport> SchoologyClient<TTransport>
where
    TTransport: Transport,
{
    pub fn with_transport(
        credentials: Credentials,
        endpoints: Endpoints,
        transport: TTransport,
    ) -> Self {
        SchoologyClient {
            secrets: Secrets::new(credentials),
            endpoints,
            transport,
        }
    }

    /// Points the client at another site; the API host is resolved again.
    ///
    /// # Errors
    ///
    /// Fails when either value is not an absolute URL.
    pub fn site_base(self, site_base: &str, api_host: Option<&str>) -> Result<Self> {
        Ok(SchoologyClient {
            endpoints: Endpoints::new(Some(site_base), api_host)?,
            ..self
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &TTransport {
        &self.transport
    }

    // ------------------------------------------------------------------------
    // Token state

    pub fn token(&self) -> Option<&Token> {
        self.secrets.current_token()
    }

    /// Replaces the held token.
    pub fn set_token(&mut self, token: Token) {
        debug!("token replaced");
        self.secrets.set_token(token);
    }

    pub fn clear_token(&mut self) {
        debug!("token cleared");
        self.secrets.clear_token();
    }

    // ------------------------------------------------------------------------
    // Authorization headers

    fn signer(&self) -> Signer<'_, Secrets> {
        Signer::new(&self.secrets)
    }

    /// Fresh OAuth parameters carrying this client's consumer key.
    pub fn build_auth_components(
        &self,
        signature_method: SignatureMethod,
        token: &str,
    ) -> AuthHeaderComponents {
        self.signer().components(signature_method, token)
    }

    /// Header for the request-token call, signed with `consumer_secret%26`.
    pub fn unsigned_header(&self) -> String {
        self.signer().unsigned_header()
    }

    /// PLAINTEXT header with the held token, signed with `consumer_secret&token_secret`.
    pub fn plaintext_header(&self) -> String {
        self.signer().plaintext_header()
    }

    /// HMAC-SHA1 header with the held token, signed over `method` and `url`.
    pub fn signed_header(&self, method: &str, url: &str) -> SignResult<String> {
        self.signer().signed_header(method, url)
    }

    // ------------------------------------------------------------------------
    // Handshake

    /// Fetches a request token with the unsigned header and holds it.
    pub async fn get_request_token(&mut self) -> Result<TokenResponse> {
        let request = TransportRequest {
            method: Method::GET,
            url: self.api_url(REQUEST_TOKEN_PATH),
            authorization: self.unsigned_header(),
            body: None,
            response_mode: ResponseMode::Buffered,
        };
        let body = self.fetch_text(request).await?;
        self.hold_token_response(&body)
    }

    /// Where to send the user to authorize the held request token.
    ///
    /// Both the token and `return_url` are percent-encoded here, so pass
    /// `return_url` unencoded.
    pub fn connect_url(&self, return_url: &str) -> String {
        let (token, _) = self.secrets.get_token_pair_or_empty();
        format!(
            "{}{}?oauth_token={}&return_url={}",
            self.endpoints.site_base(),
            AUTHORIZE_PATH,
            percent_encode(token),
            percent_encode(return_url)
        )
    }

    /// Exchanges the request token (the given one, or the held one) for an
    /// access token and holds it.
    pub async fn get_access_token(
        &mut self,
        request_token: Option<Token>,
    ) -> Result<TokenResponse> {
        if let Some(token) = request_token {
            self.set_token(token);
        }
        let body = self.make_request(Method::GET, ACCESS_TOKEN_PATH, None).await?;
        self.hold_token_response(&body)
    }

    /// Details of the user the access token (the given one, or the held one)
    /// belongs to.
    ///
    /// A body that is not JSON comes back as `Value::String`.
    pub async fn get_user_info(&mut self, access_token: Option<Token>) -> Result<Value> {
        if let Some(token) = access_token {
            self.set_token(token);
        }
        let body = self.make_request(Method::GET, USER_INFO_PATH, None).await?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    // ------------------------------------------------------------------------
    // Authenticated calls

    /// Calls `{api_base}{path}` with the PLAINTEXT header and returns the body.
    pub async fn make_request(
        &self,
        method: Method,
        path: &str,
        data: Option<Value>,
    ) -> Result<String> {
        let request = TransportRequest {
            method,
            url: self.api_url(path),
            authorization: self.plaintext_header(),
            body: data,
            response_mode: ResponseMode::Buffered,
        };
        self.fetch_text(request).await
    }

    /// Like [`make_request`](Self::make_request), serializing `data` and
    /// decoding the JSON response into `T`.
    pub async fn make_json_request<TData, T>(
        &self,
        method: Method,
        path: &str,
        data: Option<&TData>,
    ) -> Result<T>
    where
        TData: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = match data {
            Some(data) => Some(serde_json::to_value(data)?),
            None => None,
        };
        let body = self.make_request(method, path, data).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GETs an absolute `url` with the PLAINTEXT header and returns the raw
    /// response unread, so the body can be streamed.
    pub async fn download_file(&self, url: &str) -> Result<TTransport::Response> {
        let request = TransportRequest {
            method: Method::GET,
            url: url.to_string(),
            authorization: self.plaintext_header(),
            body: None,
            response_mode: ResponseMode::Stream,
        };
        self.transport.send(request).await
    }

    // ------------------------------------------------------------------------
    // Helpers

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_base(), path)
    }

    async fn fetch_text(&self, request: TransportRequest) -> Result<String> {
        let response = self.transport.send(request).await?;
        self.transport.read_body(response).await
    }

    fn hold_token_response(&mut self, body: &str) -> Result<TokenResponse> {
        let parsed = read_oauth_token(body)?;
        self.set_token(parsed.to_token_lossy());
        Ok(parsed)
    }
}
