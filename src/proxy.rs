use reqwest::Proxy;
use std::env;

use crate::error::ConfigError;

/// HTTP proxy endpoint with optional Basic credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<ProxyCredentials>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl ProxyConfig {
    pub fn to_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Proxy for all schemes, without credentials.
    pub fn to_proxy(&self) -> Result<Proxy, reqwest::Error> {
        Proxy::all(self.to_url())
    }

    /// Proxy for all schemes carrying Basic credentials, if any are configured.
    pub fn to_authenticated_proxy(&self) -> Option<Result<Proxy, reqwest::Error>> {
        self.credentials.as_ref().map(|c| {
            self.to_proxy()
                .map(|proxy| proxy.basic_auth(&c.username, &c.password))
        })
    }
}

/// Validated, immutable proxy settings shared by every check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    proxy: Option<ProxyConfig>,
}

impl ProxySettings {
    /// Settings without a proxy; requests go direct.
    pub fn direct() -> Self {
        Self { proxy: None }
    }

    /// Validate raw settings. Host and port go together, a username needs a
    /// proxy, and a password needs a username.
    pub fn new(
        host: Option<String>,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        if password.is_some() && username.is_none() {
            return Err(ConfigError::PasswordWithoutUsername);
        }

        let (host, port) = match (host, port) {
            (Some(host), Some(port)) => (host, port),
            (Some(host), None) => return Err(ConfigError::MissingProxyPort(host)),
            (None, Some(port)) => return Err(ConfigError::MissingProxyHost(port)),
            (None, None) if username.is_some() => {
                return Err(ConfigError::CredentialsWithoutProxy)
            }
            (None, None) => return Ok(Self::direct()),
        };

        let credentials = username.map(|username| ProxyCredentials {
            username,
            password: password.unwrap_or_default(),
        });

        Ok(Self {
            proxy: Some(ProxyConfig {
                host,
                port,
                credentials,
            }),
        })
    }

    /// Load settings from the environment, reading `.env` first if present.
    ///
    /// Variables: `PHONE_CHECK_PROXY_HOST`, `PHONE_CHECK_PROXY_PORT`,
    /// `PHONE_CHECK_PROXY_USER`, `PHONE_CHECK_PROXY_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PHONE_CHECK_PROXY_PORT") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidProxyPort(raw.clone()))?,
            ),
            None => None,
        };

        Self::new(
            var("PHONE_CHECK_PROXY_HOST").map(|h| h.trim().to_string()),
            port,
            var("PHONE_CHECK_PROXY_USER"),
            var("PHONE_CHECK_PROXY_PASSWORD"),
        )
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }
}
