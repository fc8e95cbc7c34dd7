use anyhow::{Result, bail};
use reqwest::{Client, Response};
use std::time::Duration;

/// Maximum accepted photo payload (10 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build a `reqwest::Client` with standard timeouts (10 s connect, 30 s overall).
///
/// Falls back to the default client if the builder fails.
pub fn default_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Download a response body as bytes, rejecting anything over `max_bytes`.
///
/// Checks the `Content-Length` header first, then streams with a running
/// counter so chunked responses cannot blow past the limit either.
pub async fn limited_body(resp: Response, max_bytes: usize) -> Result<Vec<u8>> {
    if let Some(cl) = resp.content_length()
        && cl as usize > max_bytes
    {
        bail!(
            "response body too large: Content-Length {} exceeds limit {}",
            cl,
            max_bytes
        );
    }

    let mut buf = Vec::new();
    let mut stream = resp;
    while let Some(chunk) = stream.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            bail!("response body too large: exceeds limit {}", max_bytes);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get_response(server: &MockServer) -> Response {
        Client::new().get(server.uri()).send().await.unwrap()
    }

    #[tokio::test]
    async fn limited_body_under_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world"))
            .mount(&server)
            .await;
        let resp = get_response(&server).await;
        let result = limited_body(resp, 1024).await.unwrap();
        assert_eq!(result, b"hello world");
    }

    #[tokio::test]
    async fn limited_body_content_length_over_limit_rejects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 10000]))
            .mount(&server)
            .await;
        let resp = get_response(&server).await;
        let result = limited_body(resp, 100).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[tokio::test]
    async fn limited_body_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let resp = get_response(&server).await;
        let result = limited_body(resp, 1024).await.unwrap();
        assert!(result.is_empty());
    }
}
