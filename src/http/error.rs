//! Classification of failed API responses.

use reqwest::StatusCode;

/// A non-success response from the release API.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// HTTP 403 with a rate limit message, or 429
    #[error("Rate limit exceeded: {0}. Try again later or set GITHUB_TOKEN environment variable.")]
    RateLimitExceeded(String),
    /// HTTP 401
    #[error("Authentication failed: {0}. Check your GITHUB_TOKEN.")]
    AuthenticationFailed(String),
    /// HTTP 404
    #[error("Not found: {0}")]
    NotFound(String),
    /// HTTP 403 without a rate limit message
    #[error("Access forbidden: {0}. You may need authentication.")]
    Forbidden(String),
    /// Other 4xx
    #[error("Request error: HTTP {0}")]
    ClientError(u16),
    /// 5xx
    #[error("Server error: HTTP {0}")]
    ServerError(u16),
}

/// Map a non-success status (and the response body, for 403s) to an [`ApiError`].
///
/// Returns `None` for success statuses.
pub fn classify_status(status: StatusCode, body: &str) -> Option<ApiError> {
    if status.is_success() {
        return None;
    }

    let err = match status {
        StatusCode::UNAUTHORIZED => {
            ApiError::AuthenticationFailed("Invalid or missing authentication token".to_string())
        }
        StatusCode::FORBIDDEN => {
            if body.to_lowercase().contains("rate limit") {
                ApiError::RateLimitExceeded("GitHub API rate limit exceeded".to_string())
            } else {
                ApiError::Forbidden("Access to this resource is forbidden".to_string())
            }
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ApiError::RateLimitExceeded("Too many requests".to_string())
        }
        StatusCode::NOT_FOUND => {
            ApiError::NotFound("The requested resource was not found".to_string())
        }
        s if s.is_client_error() => ApiError::ClientError(s.as_u16()),
        s => ApiError::ServerError(s.as_u16()),
    };

    Some(err)
}

/// Turn a non-success response into an error, passing successful ones through.
pub async fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let err = classify_status(status, &body).unwrap_or(ApiError::ServerError(status.as_u16()));
    Err(anyhow::Error::from(err).context(format!("GET {} failed", url)))
}
