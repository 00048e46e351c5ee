use reqwest::StatusCode;
use thiserror::Error;

/// Invalid proxy configuration, rejected before any client is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("proxy host `{0}` given without a proxy port")]
    MissingProxyPort(String),

    #[error("proxy port {0} given without a proxy host")]
    MissingProxyHost(u16),

    #[error("invalid proxy port `{0}`")]
    InvalidProxyPort(String),

    #[error("proxy username given but no proxy is configured")]
    CredentialsWithoutProxy,

    #[error("proxy password given without a proxy username")]
    PasswordWithoutUsername,
}

/// A provider page could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned {first}, retry returned {retry}")]
    Status {
        url: String,
        first: StatusCode,
        retry: StatusCode,
    },

    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown provider `{0}`")]
pub struct UnknownProvider(pub String);
