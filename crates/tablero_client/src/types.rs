use serde::Deserialize;
use thiserror::Error;

/// Server-assigned row identifier.
pub type RowId = i64;

/// Connection settings for the admin panel.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub login_path: String,
    pub csrf_token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            login_path: "/login".to_string(),
            csrf_token: None,
        }
    }
}

/// Errors from the expected-JSON endpoints, classified the way the UI
/// reacts to them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// A redirect or an HTML body where JSON was expected: the session is
    /// gone and the user must log in again.
    #[error("sesion expirada; iniciar sesion en {location}")]
    SessionExpired { location: String },
    /// A JSON response with a non-2xx status; `message` is user-facing.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// A body that is neither JSON nor HTML.
    #[error("respuesta inesperada del servidor")]
    UnexpectedBody,
    #[error("error de red: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Body of a table refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshPayload {
    pub html: String,
    #[serde(default)]
    pub pagination: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_pending: bool,
}

/// Body of the job-creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPayload {
    #[serde(default)]
    pub row_html: Option<String>,
    #[serde(default)]
    pub taller_id: Option<i64>,
    #[serde(default)]
    pub taller_nombre: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryPayload {
    #[serde(default)]
    pub row_html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletePayload {
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TallerPayload {
    #[serde(default)]
    pub taller_id: Option<i64>,
    #[serde(default)]
    pub taller_nombre: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the session-status endpoint; `state` is one of
/// none/running/active/cooldown/unknown, deadlines are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionStatusPayload {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub active_until: Option<i64>,
    #[serde(default)]
    pub cooldown_until: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewPayload {
    #[serde(default)]
    pub previews: Vec<PreviewEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewEntry {
    pub id: serde_json::Value,
    pub data_url: String,
    #[serde(default)]
    pub full_data_url: Option<String>,
    #[serde(default)]
    pub source_key: Option<String>,
}

impl PreviewEntry {
    /// The server may emit numeric or string ids; normalize to a string.
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(value) => value.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePayload {
    #[serde(default)]
    pub row_html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// An image queued for upload, read from disk by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub key: String,
}
