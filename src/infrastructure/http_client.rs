use crate::application::services::HttpClient;
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::value_objects::{JsonBody, Url};
use crate::infrastructure::config::Config;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HOST, HeaderValue, USER_AGENT};
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioIo};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, native_tls};

const DEFAULT_USER_AGENT: &str = concat!("hep/", env!("CARGO_PKG_VERSION"));

/// Infrastructure implementation of HttpClient using Hyper
/// This is a low-level HTTP transport that the application service uses
pub struct HyperHttpClient {
    client: Client<HttpConnector, Full<Bytes>>,
    timeout: Option<Duration>,
}

impl HyperHttpClient {
    pub fn new(config: &Config) -> Self {
        let connector = HttpConnector::new();
        let client = Client::builder(TokioExecutor::new())
            .build::<HttpConnector, Full<Bytes>>(connector);
        Self {
            client,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        let secure = request.url.scheme() == "https";
        let hyper_request = RequestAdapter::to_hyper_request(request)?;

        let exchange = async {
            let hyper_response = if secure {
                self.execute_https_request(hyper_request).await?
            } else {
                self.execute_http_request(hyper_request).await?
            };
            ResponseAdapter::to_domain_response(hyper_response).await
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| anyhow!("Request timed out after {:?}", limit))?,
            None => exchange.await,
        }
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>> {
        self.client
            .request(request)
            .await
            .map_err(|e| anyhow!("HTTP request execution failed: {}", e))
    }

    /// Sends one request over a fresh TLS connection
    async fn execute_https_request(
        &self,
        mut request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>> {
        let uri = request.uri().clone();
        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
            .ok_or_else(|| anyhow!("HTTPS URL has no host: {}", uri))?;
        let port = uri.port_u16().unwrap_or(443);

        let tcp = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| anyhow!("Failed to connect to {}:{}: {}", host, port, e))?;
        let tls = native_tls::TlsConnector::new()
            .map_err(|e| anyhow!("Failed to initialize TLS: {}", e))?;
        let stream = TlsConnector::from(tls)
            .connect(&host, tcp)
            .await
            .map_err(|e| anyhow!("TLS handshake with {} failed: {}", host, e))?;

        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| anyhow!("HTTP handshake with {} failed: {}", host, e))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        UriAdapter::to_origin_form(&mut request, &uri)?;
        sender
            .send_request(request)
            .await
            .map_err(|e| anyhow!("HTTP request execution failed: {}", e))
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(domain_request: Request) -> Result<HyperRequest<Full<Bytes>>> {
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let uri = UriAdapter::to_hyper_uri(&domain_request.url)?;
        let body = BodyAdapter::to_hyper_body(&domain_request.body);

        let mut builder = HyperRequest::builder().method(method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(domain_request.headers);
        }

        builder = HeaderAdapter::add_json_content_type(builder, &domain_request.body);
        builder = HeaderAdapter::add_user_agent(builder);

        builder
            .body(body)
            .map_err(|e| anyhow!("Failed to build HTTP request: {}", e))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(hyper_response: hyper::Response<Incoming>) -> Result<Response> {
        let (parts, body) = hyper_response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?
            .to_bytes();

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Connect => Method::CONNECT,
            DomainMethod::Options => Method::OPTIONS,
            DomainMethod::Trace => Method::TRACE,
        }
    }
}

/// Adapter for converting domain URLs to Hyper URIs
struct UriAdapter;

impl UriAdapter {
    fn to_hyper_uri(domain_url: &Url) -> Result<Uri> {
        domain_url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| anyhow!("Invalid URL '{}': {}", domain_url, e))
    }

    /// A bare connection expects `/path?query` plus a Host header instead of
    /// an absolute URI
    fn to_origin_form(request: &mut HyperRequest<Full<Bytes>>, uri: &Uri) -> Result<()> {
        let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
        *request.uri_mut() = path
            .parse()
            .map_err(|e| anyhow!("Invalid request path '{}': {}", path, e))?;

        if !request.headers().contains_key(HOST) {
            if let Some(authority) = uri.authority() {
                let value = HeaderValue::from_str(authority.as_str())
                    .map_err(|e| anyhow!("Invalid Host header '{}': {}", authority, e))?;
                request.headers_mut().insert(HOST, value);
            }
        }
        Ok(())
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<JsonBody>) -> Full<Bytes> {
        match domain_body {
            Some(json_body) => Full::new(Bytes::from(json_body.0.clone())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers; user-supplied values always win
struct HeaderAdapter;

impl HeaderAdapter {
    fn add_json_content_type(
        builder: http::request::Builder,
        body: &Option<JsonBody>,
    ) -> http::request::Builder {
        if body.is_some() && !Self::has_header(&builder, CONTENT_TYPE) {
            builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        } else {
            builder
        }
    }

    fn add_user_agent(builder: http::request::Builder) -> http::request::Builder {
        if Self::has_header(&builder, USER_AGENT) {
            builder
        } else {
            builder.header(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT))
        }
    }

    fn has_header(builder: &http::request::Builder, name: http::HeaderName) -> bool {
        builder
            .headers_ref()
            .is_some_and(|headers| headers.contains_key(name))
    }
}
