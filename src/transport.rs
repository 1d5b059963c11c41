use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::classify::RawResponse;
use crate::{ErrorKind, Request, RequestMethod, Result};

/// Public OpenDota instance
pub const DEFAULT_HOST: &str = "https://api.opendota.com/api/";

/// Name of the query parameter carrying the API key
const API_KEY_PARAM: &str = "api_key";

/// Sends a single request and hands back whatever came back.
///
/// Implementations know nothing about pacing or retries; the client decides
/// when to call `send` and what to make of the result.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> RawResponse;
}

/// Parse `host` as the base URL every endpoint path is resolved against.
///
/// A missing trailing slash is added, otherwise the last path segment of
/// the host (e.g. `/api`) would be replaced when joining.
pub fn parse_host(host: &str) -> Result<Url> {
    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    let mut base = Url::parse(host)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// [`Transport`] over HTTP(S) using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    reqwest_client: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the API at `base`.
    ///
    /// `allow_insecure` disables TLS certificate verification. The public
    /// client enables it by default for compatibility with self-hosted nodes
    /// behind self-signed certificates; turn it off where that matters.
    pub fn new(
        base: Url,
        api_key: Option<String>,
        allow_insecure: bool,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| ErrorKind::InvalidArgument(format!("Invalid user agent: {}", e)))?,
        );

        let builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers)
            .danger_accept_invalid_certs(allow_insecure);

        let builder = match timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        };

        let reqwest_client = builder.build()?;
        let api_key = api_key.filter(|key| !key.is_empty());

        Ok(HttpTransport {
            reqwest_client,
            base,
            api_key,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint_url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base.join(endpoint.trim_start_matches('/'))
    }

    /// Build the outgoing request.
    ///
    /// The API key travels in the query string for both methods: merged into
    /// the parameters for GET, appended to the URL (not the form body) for
    /// POST.
    fn build(&self, request: &Request, url: Url) -> reqwest::RequestBuilder {
        match request.method {
            RequestMethod::Get => {
                let mut params = request.params.clone();
                if let Some(key) = &self.api_key {
                    params.insert(API_KEY_PARAM, key);
                }
                let builder = self.reqwest_client.get(url);
                if params.is_empty() {
                    builder
                } else {
                    builder.query(&params)
                }
            }
            RequestMethod::Post => {
                let builder = self.reqwest_client.post(url);
                let builder = match &self.api_key {
                    Some(key) => builder.query(&[(API_KEY_PARAM, key)]),
                    None => builder,
                };
                builder.form(&request.params)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> RawResponse {
        let url = match self.endpoint_url(&request.endpoint) {
            Ok(url) => url,
            Err(e) => return RawResponse::Failed(format!("invalid endpoint: {}", e)),
        };

        let response = match self.build(request, url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to /{} failed: {}", request.endpoint, e);
                return RawResponse::Failed(e.to_string());
            }
        };

        match response.text().await {
            Ok(body) => RawResponse::from_body(body),
            Err(e) => {
                warn!("Cannot read response body of /{}: {}", request.endpoint, e);
                RawResponse::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::mock_server_with_body;
    use crate::Params;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer, api_key: Option<&str>) -> HttpTransport {
        HttpTransport::new(
            parse_host(&format!("{}/api", server.uri())).unwrap(),
            api_key.map(String::from),
            true,
            Some(Duration::from_secs(5)),
            "odota-test",
        )
        .unwrap()
    }

    #[test]
    fn test_parse_host_adds_trailing_slash() {
        let base = parse_host("https://api.opendota.com/api").unwrap();
        assert_eq!(base.as_str(), "https://api.opendota.com/api/");
        assert_eq!(
            base.join("matches/1").unwrap().as_str(),
            "https://api.opendota.com/api/matches/1"
        );
        assert_eq!(parse_host("").unwrap().as_str(), DEFAULT_HOST);
        assert!(parse_host("not a host").is_err());
    }

    #[tokio::test]
    async fn test_get_merges_api_key_into_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/players/7/wl"))
            .and(query_param("win", "1"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"win":3}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = Request::get("players/7/wl").with_params(Params::new().with("win", 1));
        let raw = transport(&mock_server, Some("secret")).send(&request).await;
        assert_eq!(raw, RawResponse::Body(r#"{"win":3}"#.to_string()));
    }

    #[tokio::test]
    async fn test_post_puts_api_key_in_url_and_params_in_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/request/99"))
            .and(query_param("api_key", "secret"))
            .and(body_string("priority=high"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"job":{"jobId":5}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = Request::post("request/99").with_params(Params::new().with("priority", "high"));
        let raw = transport(&mock_server, Some("secret")).send(&request).await;
        assert_eq!(raw, RawResponse::Body(r#"{"job":{"jobId":5}}"#.to_string()));
    }

    #[tokio::test]
    async fn test_error_status_bodies_are_returned() {
        let mock_server = mock_server_with_body(404, r#"{"error":"Not Found"}"#).await;
        let raw = transport(&mock_server, None)
            .send(&Request::get("matches/1"))
            .await;
        assert_eq!(raw, RawResponse::Body(r#"{"error":"Not Found"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_html_page_is_node_disabled() {
        let mock_server =
            mock_server_with_body(200, "<!DOCTYPE HTML><html><body>Login</body></html>").await;
        let raw = transport(&mock_server, None)
            .send(&Request::post("players/1/refresh"))
            .await;
        assert_eq!(raw, RawResponse::NodeDisabled);
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(
            parse_host(&mock_server.uri()).unwrap(),
            None,
            true,
            Some(Duration::from_millis(20)),
            "odota-test",
        )
        .unwrap();
        let raw = transport.send(&Request::get("health")).await;
        assert!(matches!(raw, RawResponse::Failed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_failure() {
        // Port 9 (discard) is assumed closed on the test machine
        let transport = HttpTransport::new(
            parse_host("http://127.0.0.1:9/api/").unwrap(),
            None,
            true,
            Some(Duration::from_secs(2)),
            "odota-test",
        )
        .unwrap();
        let raw = transport.send(&Request::get("status")).await;
        assert!(matches!(raw, RawResponse::Failed(_)));
    }
}
