use std::sync::{mpsc, Arc};
use std::thread;

use panel_logging::panel_warn;

use crate::api::{ApiClient, ReqwestApiClient, TallerSpec};
use crate::fragment::{self, ParsedRow};
use crate::types::{
    ApiError, ApiSettings, PreviewEntry, RowId, SessionStatusPayload, UploadFile,
};

/// Which synchronized table a command or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTable {
    Procesos,
    Documentos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    FetchTable { table: PanelTable, target: String },
    Create {
        placeholder: String,
        patente: String,
        taller: TallerSpec,
    },
    Retry { id: RowId },
    Delete { ids: Vec<RowId> },
    AssignTaller { id: RowId, taller_id: String },
    FetchSessionStatus,
    Preview {
        files: Vec<UploadFile>,
        enhance_mode: String,
    },
    Generate {
        images: Vec<String>,
        filename: String,
    },
    SubmitForm { path: String },
}

/// A refresh response with its fragments already digested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigestedTable {
    pub rows: Vec<ParsedRow>,
    pub taller_options: Vec<(String, String)>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total: Option<u64>,
    pub has_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    TableLoaded {
        table: PanelTable,
        snapshot: DigestedTable,
    },
    TableFailed { table: PanelTable },
    /// Authentication expired somewhere; the UI must leave for login.
    SessionExpired { location: String },
    CreateFinished {
        placeholder: String,
        result: Result<CreatedRow, String>,
    },
    RetryFinished {
        id: RowId,
        result: Result<Option<ParsedRow>, String>,
    },
    DeleteFinished { result: Result<u64, String> },
    TallerFinished {
        id: RowId,
        result: Result<(String, String), String>,
    },
    SessionStatus { result: Result<SessionStatusPayload, String> },
    PreviewFinished { result: Result<Vec<DigestedPreview>, String> },
    GenerateFinished { result: Result<Option<ParsedRow>, String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRow {
    pub row: Option<ParsedRow>,
    pub taller: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestedPreview {
    pub id: String,
    pub source_key: Option<String>,
    pub data_url: String,
    pub full_data_url: String,
}

/// Commands in, events out. A dedicated thread owns the tokio runtime and
/// spawns one task per command, so a slow call never blocks the next one.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ClientEvent>();
        let api = Arc::new(ReqwestApiClient::new(settings)?);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    panel_warn!("client runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    api: &dyn ApiClient,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let emit = |event: ClientEvent| {
        let _ = event_tx.send(event);
    };

    match command {
        ClientCommand::FetchTable { table, target } => match api.refresh_table(&target).await {
            Ok(payload) => {
                let parsed = fragment::parse_table(&payload.html);
                let fragment_pages = payload
                    .pagination
                    .as_deref()
                    .and_then(fragment::parse_pagination);
                emit(ClientEvent::TableLoaded {
                    table,
                    snapshot: DigestedTable {
                        rows: parsed.rows,
                        taller_options: parsed.taller_options,
                        page: payload.page.or(fragment_pages.map(|(page, _)| page)),
                        total_pages: payload
                            .total_pages
                            .or(fragment_pages.map(|(_, total)| total)),
                        total: payload.total,
                        has_pending: payload.has_pending,
                    },
                });
            }
            Err(ApiError::SessionExpired { location }) => {
                emit(ClientEvent::SessionExpired { location });
            }
            Err(err) => {
                panel_warn!("table refresh failed: {err}");
                emit(ClientEvent::TableFailed { table });
            }
        },

        ClientCommand::Create {
            placeholder,
            patente,
            taller,
        } => {
            let result = match api.create_job(&patente, &taller).await {
                Ok(payload) => {
                    let taller = match (payload.taller_id, payload.taller_nombre) {
                        (Some(id), Some(nombre)) => Some((id.to_string(), nombre)),
                        _ => None,
                    };
                    Ok(CreatedRow {
                        row: payload.row_html.as_deref().and_then(fragment::parse_row),
                        taller,
                    })
                }
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::CreateFinished {
                placeholder,
                result,
            });
        }

        ClientCommand::Retry { id } => {
            let result = match api.retry_job(id).await {
                Ok(payload) => Ok(payload.row_html.as_deref().and_then(fragment::parse_row)),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::RetryFinished { id, result });
        }

        ClientCommand::Delete { ids } => {
            let result = match api.delete_jobs(&ids).await {
                Ok(payload) => Ok(payload.deleted),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::DeleteFinished { result });
        }

        ClientCommand::AssignTaller { id, taller_id } => {
            let result = match api.assign_taller(id, &taller_id).await {
                Ok(payload) => Ok((
                    payload
                        .taller_id
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                    payload
                        .taller_nombre
                        .unwrap_or_else(|| "Sin taller".to_string()),
                )),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::TallerFinished { id, result });
        }

        ClientCommand::FetchSessionStatus => {
            let result = match api.session_status().await {
                Ok(payload) => Ok(payload),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::SessionStatus { result });
        }

        ClientCommand::Preview {
            files,
            enhance_mode,
        } => {
            let result = match api.preview_images(files, &enhance_mode).await {
                Ok(payload) => Ok(payload.previews.iter().map(digest_preview).collect()),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::PreviewFinished { result });
        }

        ClientCommand::Generate { images, filename } => {
            let result = match api.generate_document(&images, &filename).await {
                Ok(payload) => Ok(payload.row_html.as_deref().and_then(fragment::parse_row)),
                Err(ApiError::SessionExpired { location }) => {
                    emit(ClientEvent::SessionExpired { location });
                    return;
                }
                Err(err) => Err(err.to_string()),
            };
            emit(ClientEvent::GenerateFinished { result });
        }

        ClientCommand::SubmitForm { path } => {
            if let Err(err) = api.submit_form(&path).await {
                panel_warn!("form submit failed for {path}: {err}");
            }
        }
    }
}

fn digest_preview(entry: &PreviewEntry) -> DigestedPreview {
    DigestedPreview {
        id: entry.id_string(),
        source_key: entry.source_key.clone(),
        data_url: entry.data_url.clone(),
        full_data_url: entry
            .full_data_url
            .clone()
            .unwrap_or_else(|| entry.data_url.clone()),
    }
}
