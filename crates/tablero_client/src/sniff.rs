use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::types::ApiError;

/// Decode a response that must be JSON.
///
/// This boundary runs before any parse attempt, on every expected-JSON
/// call: a redirect is an authentication expiry, and so is an HTML body
/// served where JSON belongs (the login page rendered in place). Anything
/// else non-JSON is an unexpected body. The HTTP status is returned
/// alongside the payload so callers can pick the user-facing `error` field
/// out of non-2xx bodies.
pub(crate) async fn expect_json<T: DeserializeOwned>(
    response: Response,
    login_path: &str,
) -> Result<(StatusCode, T), ApiError> {
    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(login_path)
            .to_string();
        return Err(ApiError::SessionExpired { location });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response.text().await?;

    if !content_type.contains("application/json") {
        let lower = body.to_lowercase();
        if lower.contains("<!doctype") || lower.contains("<html") {
            return Err(ApiError::SessionExpired {
                location: login_path.to_string(),
            });
        }
        return Err(ApiError::UnexpectedBody);
    }

    let payload = serde_json::from_str(&body).map_err(|_| ApiError::UnexpectedBody)?;
    Ok((status, payload))
}

/// Collapse a decoded response into the payload, mapping non-2xx statuses
/// to [`ApiError::Api`] with the body's `error` message when present.
pub(crate) fn into_result<T>(
    status: StatusCode,
    payload: T,
    error: Option<String>,
    fallback: &str,
) -> Result<T, ApiError> {
    if status.is_success() {
        Ok(payload)
    } else {
        Err(ApiError::Api {
            status: status.as_u16(),
            message: error.unwrap_or_else(|| fallback.to_string()),
        })
    }
}
