use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use panel_logging::{panel_info, panel_warn};
use tablero_client::{
    ClientCommand, ClientEvent, ClientHandle, DigestedPreview, DigestedTable, PanelTable,
    ParsedRow, SessionStatusPayload, TallerSpec, UploadFile,
};
use tablero_core::{
    Effect, FileEntry, Msg, PreviewItem, RowStub, SessionPayload, SessionPhase, TableKind,
    TableSnapshot, TallerChoice, TallerRef,
};

use super::persistence;

/// Executes core effects against the HTTP client and the timer threads,
/// and translates client events back into core messages.
pub(crate) struct EffectRunner {
    client: ClientHandle,
    msg_tx: mpsc::Sender<Msg>,
    state_file: tablero_client::StateFile,
}

impl EffectRunner {
    pub(crate) fn new(
        client: ClientHandle,
        msg_tx: mpsc::Sender<Msg>,
        state_file: tablero_client::StateFile,
    ) -> Self {
        Self {
            client,
            msg_tx,
            state_file,
        }
    }

    /// `picked_paths` maps upload-file keys to the paths they were read
    /// from; preview uploads read the bytes at dispatch time.
    pub(crate) fn run(&self, effects: Vec<Effect>, picked_paths: &HashMap<String, PathBuf>) {
        for effect in effects {
            match effect {
                Effect::FetchTable { table, target } => {
                    self.client.send(ClientCommand::FetchTable {
                        table: panel_table(table),
                        target,
                    });
                }
                Effect::ArmRefresh { table, after_ms } => {
                    self.arm(after_ms, Msg::RefreshTick { table });
                }
                Effect::ArmDebounce {
                    generation,
                    after_ms,
                } => {
                    self.arm(after_ms, Msg::DebounceFired { generation });
                }
                Effect::ArmNotice { id, after_ms } => {
                    self.arm(after_ms, Msg::NoticeExpired { id });
                }
                Effect::SubmitCreate {
                    placeholder,
                    patente,
                    taller,
                } => {
                    self.client.send(ClientCommand::Create {
                        placeholder,
                        patente,
                        taller: taller_spec(taller),
                    });
                }
                Effect::PostRetry { id } => {
                    self.client.send(ClientCommand::Retry { id });
                }
                Effect::PostDelete { ids } => {
                    self.client.send(ClientCommand::Delete { ids });
                }
                Effect::PostTaller { id, taller_id } => {
                    self.client
                        .send(ClientCommand::AssignTaller { id, taller_id });
                }
                Effect::SubmitUserForm { form } => {
                    self.client.send(ClientCommand::SubmitForm { path: form });
                }
                Effect::FetchSessionStatus => {
                    self.client.send(ClientCommand::FetchSessionStatus);
                }
                Effect::PostPreview {
                    files,
                    enhance_mode,
                } => {
                    let uploads = read_uploads(&files, picked_paths);
                    if uploads.is_empty() {
                        let _ = self.msg_tx.send(Msg::PreviewFailed {
                            message: "No se pudo leer las imagenes.".to_string(),
                        });
                        continue;
                    }
                    self.client.send(ClientCommand::Preview {
                        files: uploads,
                        enhance_mode,
                    });
                }
                Effect::PostGenerate { images, filename } => {
                    self.client.send(ClientCommand::Generate { images, filename });
                }
                Effect::PersistFilters { filters } => {
                    persistence::save_filters(&self.state_file, &filters);
                }
                Effect::NavigateToLogin => {
                    panel_info!("session expired; leaving for the login boundary");
                }
            }
        }
    }

    /// Drain client events into core messages. Called from the dispatch
    /// loop, so ordering within a handler is preserved.
    pub(crate) fn poll_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.client.try_recv() {
            msgs.push(translate(event));
        }
        msgs
    }

    fn arm(&self, after_ms: u64, msg: Msg) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(after_ms));
            let _ = msg_tx.send(msg);
        });
    }
}

fn translate(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::TableLoaded { table, snapshot } => Msg::RefreshLoaded {
            table: core_table(table),
            snapshot: core_snapshot(table, snapshot),
        },
        ClientEvent::TableFailed { table } => Msg::RefreshFailed {
            table: core_table(table),
        },
        ClientEvent::SessionExpired { location } => {
            panel_warn!("authentication expired; login at {location}");
            Msg::SessionExpired
        }
        ClientEvent::CreateFinished {
            placeholder,
            result,
        } => match result {
            Ok(created) => Msg::CreateCompleted {
                placeholder,
                row: created.row.map(|row| core_row(PanelTable::Procesos, row)),
                taller: created
                    .taller
                    .map(|(id, nombre)| TallerRef::new(id, nombre)),
            },
            Err(message) => Msg::CreateFailed {
                placeholder,
                message,
            },
        },
        ClientEvent::RetryFinished { id, result } => match result {
            Ok(row) => Msg::RetryCompleted {
                id,
                row: row.map(|row| core_row(PanelTable::Procesos, row)),
            },
            Err(message) => Msg::RetryFailed { id, message },
        },
        ClientEvent::DeleteFinished { result } => match result {
            Ok(deleted) => Msg::DeleteCompleted { deleted },
            Err(message) => Msg::DeleteFailed { message },
        },
        ClientEvent::TallerFinished { id, result } => match result {
            Ok((taller_id, nombre)) => Msg::TallerSaved {
                id,
                taller: TallerRef::new(taller_id, nombre),
            },
            Err(message) => Msg::TallerFailed { id, message },
        },
        ClientEvent::SessionStatus { result } => match result {
            Ok(payload) => Msg::SessionStatusLoaded {
                payload: core_session(payload),
                now: now_unix(),
            },
            Err(_) => Msg::SessionStatusFailed,
        },
        ClientEvent::PreviewFinished { result } => match result {
            Ok(previews) => Msg::PreviewLoaded {
                previews: previews.into_iter().map(core_preview).collect(),
            },
            Err(message) => Msg::PreviewFailed { message },
        },
        ClientEvent::GenerateFinished { result } => match result {
            Ok(row) => Msg::GenerateCompleted {
                row: row.map(|row| core_row(PanelTable::Documentos, row)),
            },
            Err(message) => Msg::GenerateFailed { message },
        },
    }
}

fn panel_table(table: TableKind) -> PanelTable {
    match table {
        TableKind::Procesos => PanelTable::Procesos,
        TableKind::Documentos => PanelTable::Documentos,
    }
}

fn core_table(table: PanelTable) -> TableKind {
    match table {
        PanelTable::Procesos => TableKind::Procesos,
        PanelTable::Documentos => TableKind::Documentos,
    }
}

fn taller_spec(choice: TallerChoice) -> TallerSpec {
    match choice {
        TallerChoice::Existing { id } => TallerSpec::Existing { id },
        TallerChoice::New { nombre } => TallerSpec::New { nombre },
    }
}

fn core_snapshot(table: PanelTable, snapshot: DigestedTable) -> TableSnapshot {
    TableSnapshot {
        rows: snapshot
            .rows
            .into_iter()
            .map(|row| core_row(table, row))
            .collect(),
        page: snapshot.page,
        total_pages: snapshot.total_pages,
        total: snapshot.total,
        has_pending: snapshot.has_pending,
        taller_options: snapshot
            .taller_options
            .into_iter()
            .map(|(id, nombre)| TallerRef::new(id, nombre))
            .collect(),
    }
}

fn core_row(table: PanelTable, row: ParsedRow) -> RowStub {
    match table {
        PanelTable::Procesos => RowStub {
            id: row.id,
            fecha: row.fecha,
            patente: row.patente,
            taller: row.taller.map(|(id, nombre)| TallerRef::new(id, nombre)),
            estado: row.estado,
            resultado: row.resultado,
            detalle: row.detalle,
            selectable: row.selectable,
            pending: row.pending,
            error_detail: row.error_detail,
        },
        // Documentos rows have no checkbox column: fecha, archivo,
        // paginas, estado.
        PanelTable::Documentos => RowStub {
            id: row.id,
            fecha: row.cells.first().cloned().unwrap_or_default(),
            patente: row.cells.get(1).cloned().unwrap_or_default(),
            resultado: row.cells.get(2).cloned().unwrap_or_default(),
            estado: row.cells.get(3).cloned().unwrap_or_default(),
            detalle: String::new(),
            taller: None,
            selectable: false,
            pending: row.pending,
            error_detail: row.error_detail,
        },
    }
}

fn core_session(payload: SessionStatusPayload) -> SessionPayload {
    let phase = match payload.state.as_str() {
        "running" => SessionPhase::Running,
        "active" => SessionPhase::Active,
        "cooldown" => SessionPhase::Cooldown,
        "none" => SessionPhase::None,
        _ => SessionPhase::Unknown,
    };
    SessionPayload {
        phase,
        active_until: payload.active_until,
        cooldown_until: payload.cooldown_until,
    }
}

fn core_preview(preview: DigestedPreview) -> PreviewItem {
    PreviewItem {
        id: preview.id,
        source_key: preview.source_key,
        base_url: preview.data_url.clone(),
        full_url: preview.full_data_url,
        edited_url: preview.data_url,
    }
}

fn read_uploads(
    files: &[FileEntry],
    picked_paths: &HashMap<String, PathBuf>,
) -> Vec<UploadFile> {
    files
        .iter()
        .filter_map(|file| {
            let key = file.key();
            let path = picked_paths.get(&key)?;
            match std::fs::read(path) {
                Ok(bytes) => Some(UploadFile {
                    name: file.name.clone(),
                    bytes,
                    key,
                }),
                Err(err) => {
                    panel_warn!("could not read {path:?}: {err}");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Short es-AR date label for optimistic rows (dd/mm/yy).
pub(crate) fn today_label() -> String {
    chrono::Local::now().format("%d/%m/%y").to_string()
}
