use serde::Deserialize;
use url::Url;

use crate::{Credentials, Result};

/// Site the users sign in to when no other is configured.
pub const DEFAULT_SITE_BASE: &str = "https://www.schoology.com";
/// Production API host.
pub const SCHOOLOGY_API_HOST: &str = "https://api.schoology.com";
/// API host backing the `schoologytest` sandbox sites.
pub const SCHOOLOGYTEST_API_HOST: &str = "https://api.schoologytest.com";

const TEST_SITE_MARKER: &str = "schoologytest";
const API_VERSION_PATH: &str = "/v1";

/// Client settings in a shape that can be loaded with any serde format.
///
/// ```
/// let config: schoology_oauth1::ClientConfig = serde_json::from_str(
///     r#"{"consumer_key": "key", "consumer_secret": "secret",
///         "site_base": "https://district.schoologytest.com"}"#,
/// ).unwrap();
/// assert_eq!(config.site_base.as_deref(), Some("https://district.schoologytest.com"));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default)]
    pub site_base: Option<String>,
    #[serde(default)]
    pub api_host: Option<String>,
}

impl ClientConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.consumer_key.as_str(), self.consumer_secret.as_str())
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(self.site_base.as_deref(), self.api_host.as_deref())
    }
}

/// Where users are sent to authorize and where API calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    site_base: String,
    api_host: String,
}

impl Endpoints {
    /// Resolves the API host: an explicit `api_host` always wins, otherwise a
    /// site base containing `schoologytest` selects the test host.
    ///
    /// # Errors
    ///
    /// Fails when either value is not an absolute URL.
    pub fn new(site_base: Option<&str>, api_host: Option<&str>) -> Result<Self> {
        let site_base = normalize(site_base.unwrap_or(DEFAULT_SITE_BASE))?;
        let api_host = match api_host {
            Some(host) => normalize(host)?,
            None if site_base.contains(TEST_SITE_MARKER) => SCHOOLOGYTEST_API_HOST.to_string(),
            None => SCHOOLOGY_API_HOST.to_string(),
        };
        Ok(Endpoints {
            site_base,
            api_host,
        })
    }

    pub fn site_base(&self) -> &str {
        &self.site_base
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Versioned prefix every API path is appended to.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.api_host, API_VERSION_PATH)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            site_base: DEFAULT_SITE_BASE.to_string(),
            api_host: SCHOOLOGY_API_HOST.to_string(),
        }
    }
}

fn normalize(base: &str) -> Result<String> {
    Url::parse(base)?;
    Ok(base.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn default_site_uses_production_host() {
        let endpoints = Endpoints::new(None, None).unwrap();
        assert_eq!(endpoints.site_base(), "https://www.schoology.com");
        assert_eq!(endpoints.api_base(), "https://api.schoology.com/v1");
        assert_eq!(endpoints, Endpoints::default());
    }

    #[test]
    fn production_site_uses_production_host() {
        let endpoints = Endpoints::new(Some("https://www.schoology.com"), None).unwrap();
        assert_eq!(endpoints.api_host(), "https://api.schoology.com");
    }

    #[test]
    fn test_site_uses_test_host() {
        let endpoints = Endpoints::new(Some("https://districtABC.schoologytest.com"), None).unwrap();
        assert_eq!(endpoints.api_host(), "https://api.schoologytest.com");
        assert_eq!(endpoints.api_base(), "https://api.schoologytest.com/v1");
    }

    #[test]
    fn explicit_host_wins() {
        let endpoints = Endpoints::new(
            Some("https://districtABC.schoologytest.com"),
            Some("http://localhost:8080/"),
        )
        .unwrap();
        assert_eq!(endpoints.api_base(), "http://localhost:8080/v1");
        assert_eq!(endpoints.site_base(), "https://districtABC.schoologytest.com");
    }

    #[test]
    fn relative_site_base_is_rejected() {
        let result = Endpoints::new(Some("www.schoology.com"), None);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn config_without_optional_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"consumer_key": "k", "consumer_secret": "s"}"#).unwrap();
        assert_eq!(config.credentials(), Credentials::new("k", "s"));
        assert_eq!(config.endpoints().unwrap(), Endpoints::default());
    }
}
