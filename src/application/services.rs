use crate::application::builders::request_builder::RequestBuilder;
use crate::domain::entities::{Method, Request, Response};
use anyhow::Result;
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Application service for orchestrating HTTP request workflows
/// This contains business logic and use cases
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Turns command-line tokens into a validated request without sending it
    pub fn prepare<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Request> {
        let assembled = RequestBuilder::from_tokens(tokens)?;
        for token in &assembled.unrecognized {
            tracing::warn!(argument = %token, "ignoring unrecognized argument");
        }

        let request = assembled.request;
        RequestValidator::validate(&request)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            query_params = request.query.pairs().count(),
            body_bytes = request.body.as_ref().map_or(0, |b| b.len()),
            "prepared request"
        );
        Ok(request)
    }

    /// Builds the request from tokens and sends it; nothing is sent if the
    /// build fails
    pub async fn execute<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Response> {
        let request = self.prepare(tokens)?;
        self.send_request(request).await
    }

    /// Sends an already built request
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        self.validate_request(&request)?;
        self.http_client.send(request).await
    }

    fn validate_request(&self, request: &Request) -> Result<()> {
        RequestValidator::validate(request)
    }
}

/// Domain service for request validation
/// This contains domain business rules
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<()> {
        Self::validate_url(&request.url)?;
        Self::validate_method_body_combination(request)?;
        Ok(())
    }

    fn validate_url(url: &crate::domain::value_objects::Url) -> Result<()> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!("URL must start with http:// or https://"));
        }
        if url.0.host_str().is_none_or(str::is_empty) {
            return Err(anyhow::anyhow!("URL '{}' has no host", url));
        }
        Ok(())
    }

    fn validate_method_body_combination(request: &Request) -> Result<()> {
        match (&request.method, &request.body) {
            (Method::Trace, Some(_)) => {
                Err(anyhow::anyhow!("TRACE requests must not have a body"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use hyper::body::Bytes;

    fn ok_response() -> Response {
        Response {
            status: StatusCode::OK,
            headers: http::HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        }
    }

    fn service_never_sending() -> HttpRequestService {
        let mut client = MockHttpClient::new();
        client.expect_send().times(0);
        HttpRequestService::new(Box::new(client))
    }

    #[tokio::test]
    async fn execute_sends_the_assembled_request() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|request| {
                request.method == Method::Post
                    && request.url.as_str() == "http://localhost:8080/users?page=2"
                    && request.body.as_ref().map(|b| b.as_bytes())
                        == Some(&br#"{"name":"brett"}"#[..])
            })
            .times(1)
            .returning(|_| Ok(ok_response()));

        let service = HttpRequestService::new(Box::new(client));
        let response = service
            .execute(&["POST", ":8080/users", "name=brett", "page==2", "stray"])
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn failed_build_never_reaches_the_client() {
        let service = service_never_sending();

        assert!(service.execute(&["GET", "http://[::1"]).await.is_err());
        assert!(service.execute(&[":", "a=1", "a.b=2"]).await.is_err());
        assert!(service.execute(&["DELETE"]).await.is_err());
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_client() {
        let service = service_never_sending();

        let err = service.execute(&["TRACE", ":", "a=b"]).await.unwrap_err();
        assert_eq!(err.to_string(), "TRACE requests must not have a body");
    }

    #[tokio::test]
    async fn client_errors_propagate() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let service = HttpRequestService::new(Box::new(client));
        let request = service.prepare(&["localhost"]).unwrap();
        let err = service.send_request(request).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn prepare_does_not_send() {
        let service = service_never_sending();
        let request = service.prepare(&["HEAD", "example.com", "Accept:*/*"]).unwrap();
        assert_eq!(request.method, Method::Head);
        assert!(request.body.is_none());
    }
}
