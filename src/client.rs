use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::proxy::ProxySettings;

pub const USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 5.1; Trident/4.0; Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.1; SV1) ;  QIHU 360EE)";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Headers sent with every request, mimicking a desktop browser.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers
}

/// Fetches provider pages, optionally through an HTTP proxy.
///
/// Safe to share between threads; each `fetch` is independent.
#[derive(Debug, Clone)]
pub struct RetrievalClient {
    client: Client,
    /// Used only after the proxy challenges an unauthenticated request.
    authenticated: Option<Client>,
}

impl RetrievalClient {
    pub fn new(settings: &ProxySettings) -> Result<Self, FetchError> {
        let proxy = match settings.proxy() {
            Some(proxy) => proxy,
            None => {
                info!("Retrieval client without proxy");
                let client = Self::builder().no_proxy().build().map_err(FetchError::Client)?;
                return Ok(Self {
                    client,
                    authenticated: None,
                });
            }
        };

        info!(
            proxy = %proxy.to_url(),
            authenticated = proxy.credentials.is_some(),
            "Retrieval client with proxy"
        );

        let client = Self::builder()
            .proxy(proxy.to_proxy().map_err(FetchError::Client)?)
            .build()
            .map_err(FetchError::Client)?;

        let authenticated = match proxy.to_authenticated_proxy() {
            Some(auth_proxy) => Some(
                Self::builder()
                    .proxy(auth_proxy.map_err(FetchError::Client)?)
                    .build()
                    .map_err(FetchError::Client)?,
            ),
            None => None,
        };

        Ok(Self {
            client,
            authenticated,
        })
    }

    fn builder() -> ClientBuilder {
        Client::builder().default_headers(browser_headers())
    }

    /// Fetch `url` and return its body. A non-success status is retried once.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.send(url)?;
        if response.status().is_success() {
            return read_body(url, response);
        }

        let first = response.status();
        drop(response);
        warn!(url, status = %first, "Unsuccessful response, retrying once");

        let response = self.send(url)?;
        if response.status().is_success() {
            return read_body(url, response);
        }

        Err(FetchError::Status {
            url: url.to_string(),
            first,
            retry: response.status(),
        })
    }

    /// One request, answering a proxy authentication challenge if credentials exist.
    fn send(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let authenticated = match &self.authenticated {
            Some(client) => client,
            None => return self.client.get(url).send().map_err(transport),
        };

        match self.client.get(url).send() {
            Ok(response) if response.status() == StatusCode::PROXY_AUTHENTICATION_REQUIRED => {
                drop(response);
                debug!(url, "Proxy challenge, resending with credentials");
                authenticated.get(url).send().map_err(transport)
            }
            Err(e) if is_proxy_challenge(&e) => {
                debug!(url, "Proxy tunnel challenge, resending with credentials");
                authenticated.get(url).send().map_err(transport)
            }
            other => other.map_err(transport),
        }
    }
}

fn read_body(url: &str, response: Response) -> Result<String, FetchError> {
    response.text().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

/// A refused CONNECT tunnel surfaces as an error rather than a 407 response.
fn is_proxy_challenge(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.to_string().contains("proxy authentication required") {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{html_response, ScriptedServer};
    use httpmock::prelude::*;

    fn direct_client() -> RetrievalClient {
        RetrievalClient::new(&ProxySettings::direct()).unwrap()
    }

    fn proxied_client(port: u16, username: Option<&str>) -> RetrievalClient {
        let settings = ProxySettings::new(
            Some("127.0.0.1".to_string()),
            Some(port),
            username.map(str::to_string),
            username.map(|_| "s3cret".to_string()),
        )
        .unwrap();
        RetrievalClient::new(&settings).unwrap()
    }

    #[test]
    fn test_sends_browser_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/s")
                .header("connection", "keep-alive")
                .header("pragma", "no-cache")
                .header("cache-control", "no-cache")
                .header("upgrade-insecure-requests", "1")
                .header("user-agent", USER_AGENT)
                .header("accept", ACCEPT)
                .header("dnt", "1")
                .header("accept-language", ACCEPT_LANGUAGE);
            then.status(200).body("<html>ok</html>");
        });

        let body = direct_client().fetch(&server.url("/s?wd=10086")).unwrap();

        mock.assert();
        assert_eq!(body, "<html>ok</html>");
    }

    #[test]
    fn test_two_failures_report_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/s");
            then.status(503);
        });

        let result = direct_client().fetch(&server.url("/s?wd=10086"));

        mock.assert_hits(2);
        match result {
            Err(FetchError::Status { first, retry, .. }) => {
                assert_eq!(first, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(retry, StatusCode::SERVICE_UNAVAILABLE);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_success_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/s");
            then.status(200).body("done");
        });

        direct_client().fetch(&server.url("/s")).unwrap();
        mock.assert_hits(1);
    }

    #[test]
    fn test_retry_then_success() {
        let server = ScriptedServer::start(vec![
            html_response("500 Internal Server Error", ""),
            html_response("200 OK", "<p>second</p>"),
        ]);

        let body = direct_client().fetch(&server.url("/s?wd=1")).unwrap();

        assert_eq!(body, "<p>second</p>");
        assert_eq!(server.requests().len(), 2);
    }

    #[test]
    fn test_transport_error_is_not_retried() {
        let port = ScriptedServer::unused_port();
        let result = direct_client().fetch(&format!("http://127.0.0.1:{}/s", port));
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }

    #[test]
    fn test_requests_go_through_proxy() {
        let proxy = ScriptedServer::start(vec![html_response("200 OK", "via proxy")]);

        let body = proxied_client(proxy.port(), None)
            .fetch("http://provider.test/s?wd=13800138000")
            .unwrap();

        assert_eq!(body, "via proxy");
        let requests = proxy.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET http://provider.test/s?wd=13800138000 HTTP/1.1"));
        assert!(!requests[0].to_lowercase().contains("proxy-authorization"));
    }

    #[test]
    fn test_proxy_credentials_only_after_challenge() {
        let challenge = "HTTP/1.1 407 Proxy Authentication Required\r\n\
            Proxy-Authenticate: Basic realm=\"proxy\"\r\n\
            Content-Length: 0\r\n\
            Connection: close\r\n\r\n"
            .to_string();
        let proxy = ScriptedServer::start(vec![challenge, html_response("200 OK", "authorized")]);

        let body = proxied_client(proxy.port(), Some("robin"))
            .fetch("http://provider.test/s?wd=1")
            .unwrap();

        assert_eq!(body, "authorized");
        let requests: Vec<String> = proxy.requests().iter().map(|r| r.to_lowercase()).collect();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].contains("proxy-authorization"));
        let expected = format!("proxy-authorization: basic {}", "cm9iaW46czNjcmV0".to_lowercase());
        assert!(requests[1].contains(&expected));
    }

    #[test]
    fn test_tunnel_challenge_resends_with_credentials() {
        let challenge = "HTTP/1.1 407 Proxy Authentication Required\r\n\
            Proxy-Authenticate: Basic realm=\"proxy\"\r\n\
            Content-Length: 0\r\n\
            Connection: close\r\n\r\n"
            .to_string();
        let proxy = ScriptedServer::start(vec![challenge.clone(), challenge]);

        let result = proxied_client(proxy.port(), Some("robin")).fetch("https://provider.test/s?q=1");

        assert!(matches!(result, Err(FetchError::Transport { .. })));
        let requests: Vec<String> = proxy.requests().iter().map(|r| r.to_lowercase()).collect();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("connect provider.test:443"));
        assert!(!requests[0].contains("proxy-authorization"));
        assert!(requests[1].starts_with("connect provider.test:443"));
        let expected = format!("proxy-authorization: basic {}", "cm9iaW46czNjcmV0".to_lowercase());
        assert!(requests[1].contains(&expected));
    }

    #[test]
    fn test_no_challenge_means_no_credentials() {
        let proxy = ScriptedServer::start(vec![html_response("200 OK", "open proxy")]);

        let body = proxied_client(proxy.port(), Some("robin"))
            .fetch("http://provider.test/s?wd=1")
            .unwrap();

        assert_eq!(body, "open proxy");
        let requests = proxy.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].to_lowercase().contains("proxy-authorization"));
    }
}
