// src/fetch/page.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Single GET of the index page. Any failure is returned as-is; no retry.
#[instrument(level = "info", skip(client, url, timeout), fields(url = %url))]
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> Result<String> {
    debug!("fetching page");
    let body = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("non-success status from {}", url))?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    debug!(bytes = body.len(), "page fetched");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn sends_user_agent_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profiles"))
            .and(header("user-agent", "test-agent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder().user_agent("test-agent/1.0").build().unwrap();
        let url = Url::parse(&format!("{}/profiles", server.uri())).unwrap();
        let body = fetch_page(&client, &url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let err = fetch_page(&Client::new(), &url, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("403"));
    }

    #[tokio::test]
    async fn slow_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let res = fetch_page(&Client::new(), &url, Duration::from_millis(200)).await;
        assert!(res.is_err());
    }
}
