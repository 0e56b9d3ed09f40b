//! JSON HTTP client for the release API.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::check_status;

/// HTTP client for JSON endpoints.
///
/// Failures surface once to the caller; nothing is retried here.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_query(url, &[]).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiError;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: TestResponse = client.get_json(&format!("{}/test", url)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_json_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<serde_json::Value> = client.get_json(&format!("{}/test", url)).await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_json_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<serde_json::Value> = client.get_json(&format!("{}/test", url)).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_json_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<TestResponse> = client.get_json(&format!("{}/test", url)).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON response"));
    }

    #[tokio::test]
    async fn test_get_json_with_query_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test?per_page=10")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["item1", "item2"]"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Vec<String> = client
            .get_json_with_query(&format!("{}/test", url), &[("per_page", "10")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["item1", "item2"]);
    }
}
