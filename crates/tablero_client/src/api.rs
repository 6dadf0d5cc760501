use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL};

use crate::sniff::{expect_json, into_result};
use crate::types::{
    ApiError, ApiSettings, CreatedPayload, DeletePayload, GeneratePayload, PreviewPayload,
    RefreshPayload, RetryPayload, RowId, SessionStatusPayload, TallerPayload, UploadFile,
};

const CSRF_HEADER: &str = "X-CSRFToken";
const REQUESTED_WITH: &str = "X-Requested-With";

/// The workshop sent with a job submission: an existing id or an inline
/// name for the server to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallerSpec {
    Existing { id: String },
    New { nombre: String },
}

/// The admin panel's HTTP surface. One method per endpoint; every body is
/// decoded through the JSON/auth-expiry boundary first.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn refresh_table(&self, target: &str) -> Result<RefreshPayload, ApiError>;
    async fn create_job(
        &self,
        patente: &str,
        taller: &TallerSpec,
    ) -> Result<CreatedPayload, ApiError>;
    async fn retry_job(&self, id: RowId) -> Result<RetryPayload, ApiError>;
    async fn delete_jobs(&self, ids: &[RowId]) -> Result<DeletePayload, ApiError>;
    async fn assign_taller(&self, id: RowId, taller_id: &str) -> Result<TallerPayload, ApiError>;
    async fn session_status(&self) -> Result<SessionStatusPayload, ApiError>;
    async fn preview_images(
        &self,
        files: Vec<UploadFile>,
        enhance_mode: &str,
    ) -> Result<PreviewPayload, ApiError>;
    async fn generate_document(
        &self,
        images: &[String],
        filename: &str,
    ) -> Result<GeneratePayload, ApiError>;
    /// Submit a server-rendered form by its action path; the response body
    /// is not part of any JSON contract and is discarded.
    async fn submit_form(&self, path: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    /// Redirects are never followed: a 3xx on a JSON endpoint is the
    /// authentication-expiry signal. No request timeouts are set; a hung
    /// poll simply delays the next one.
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn json_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUESTED_WITH, HeaderValue::from_static("fetch"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.settings.csrf_token {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(CSRF_HEADER, value);
            }
        }
        headers
    }

    /// Polling GETs check the status before the body sniff: a plain HTTP
    /// failure is a retryable error, not an expired session. Redirects are
    /// still the expiry signal.
    async fn poll_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        failure: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let status = response.status();
        if !status.is_redirection() && !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: failure.to_string(),
            });
        }
        let (_, payload) = expect_json(response, &self.settings.login_path).await?;
        Ok(payload)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn refresh_table(&self, target: &str) -> Result<RefreshPayload, ApiError> {
        self.poll_json(target, "refresh failed").await
    }

    async fn create_job(
        &self,
        patente: &str,
        taller: &TallerSpec,
    ) -> Result<CreatedPayload, ApiError> {
        let mut form = vec![("patente".to_string(), patente.to_string())];
        match taller {
            TallerSpec::Existing { id } => form.push(("taller_id".to_string(), id.clone())),
            TallerSpec::New { nombre } => {
                form.push(("taller_id".to_string(), "new".to_string()));
                form.push(("taller_name".to_string(), nombre.clone()));
            }
        }
        let response = self
            .client
            .post(self.url("/tools/rpa-enargas"))
            .headers(self.json_headers())
            .form(&form)
            .send()
            .await?;
        let (status, payload) =
            expect_json::<CreatedPayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(status, payload, error, "Error al crear proceso.")
    }

    async fn retry_job(&self, id: RowId) -> Result<RetryPayload, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/tools/rpa-enargas/{id}/retry")))
            .headers(self.json_headers())
            .send()
            .await?;
        let (status, payload) =
            expect_json::<RetryPayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(status, payload, error, "Error al reintentar.")
    }

    async fn delete_jobs(&self, ids: &[RowId]) -> Result<DeletePayload, ApiError> {
        let response = self
            .client
            .post(self.url("/tools/rpa-enargas/delete"))
            .headers(self.json_headers())
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await?;
        let (status, payload) =
            expect_json::<DeletePayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(
            status,
            payload,
            error,
            "No se pudieron eliminar los procesos.",
        )
    }

    async fn assign_taller(&self, id: RowId, taller_id: &str) -> Result<TallerPayload, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/tools/rpa-enargas/{id}/taller")))
            .headers(self.json_headers())
            .json(&serde_json::json!({ "taller_id": taller_id }))
            .send()
            .await?;
        let (status, payload) =
            expect_json::<TallerPayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(status, payload, error, "No se pudo actualizar el taller.")
    }

    async fn session_status(&self) -> Result<SessionStatusPayload, ApiError> {
        self.poll_json("/tools/rpa-enargas/session-status", "status failed")
            .await
    }

    async fn preview_images(
        &self,
        files: Vec<UploadFile>,
        enhance_mode: &str,
    ) -> Result<PreviewPayload, ApiError> {
        let mut form = reqwest::multipart::Form::new().text("enhance_mode", enhance_mode.to_string());
        for file in files {
            form = form
                .part(
                    "images",
                    reqwest::multipart::Part::bytes(file.bytes).file_name(file.name),
                )
                .text("file_keys", file.key);
        }
        let response = self
            .client
            .post(self.url("/tools/img-to-pdf/preview"))
            .headers(self.json_headers())
            .multipart(form)
            .send()
            .await?;
        let (status, payload) =
            expect_json::<PreviewPayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(status, payload, error, "No se pudo procesar las imagenes.")
    }

    async fn generate_document(
        &self,
        images: &[String],
        filename: &str,
    ) -> Result<GeneratePayload, ApiError> {
        let response = self
            .client
            .post(self.url("/tools/img-to-pdf/generate"))
            .headers(self.json_headers())
            .json(&serde_json::json!({ "images": images, "filename": filename }))
            .send()
            .await?;
        let (status, payload) =
            expect_json::<GeneratePayload>(response, &self.settings.login_path).await?;
        let error = payload.error.clone();
        into_result(status, payload, error, "No se pudo generar el PDF.")
    }

    async fn submit_form(&self, path: &str) -> Result<(), ApiError> {
        // Server-rendered forms answer with redirects or full pages; only
        // transport failures matter here.
        self.client
            .post(self.url(path))
            .headers(self.json_headers())
            .send()
            .await?;
        Ok(())
    }
}
