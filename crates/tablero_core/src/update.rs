use crate::modal::PendingAction;
use crate::msg::Msg;
use crate::notice::{self, NoticeKind, DEFAULT_NOTICE_MS, INFO_NOTICE_MS, SUCCESS_NOTICE_MS};
use crate::table::{PlaceholderRow, TableKind, TallerRef};
use crate::{AppState, Effect};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Started => {
            // One timer for the procesos table, an immediate fetch for the
            // documentos table, and the first status poll.
            state.procesos.set_timer_armed(true);
            effects.push(Effect::ArmRefresh {
                table: TableKind::Procesos,
                after_ms: state.config.first_poll_ms,
            });
            effects.push(Effect::FetchTable {
                table: TableKind::Documentos,
                target: state.documentos.target().to_string(),
            });
            effects.push(Effect::FetchSessionStatus);
        }
        Msg::FiltersRestored { filters } => {
            state.filters = filters;
            let target = filtered_target(&state, None);
            state.procesos.set_target(target);
            state.mark_dirty();
        }

        Msg::RefreshLoaded { table, snapshot } => {
            let interval = state.config.refresh_interval_ms;
            table_mut(&mut state, table).apply_snapshot(&snapshot);
            if table == TableKind::Procesos {
                let present = state.procesos.server_ids();
                state.selection.prune(&present);
                if !snapshot.taller_options.is_empty() {
                    state.form.taller_options = snapshot.taller_options.clone();
                }
            }
            // Re-arm only while the server reports unfinished work, and only
            // if no timer is already outstanding for this table.
            let table_state = table_mut(&mut state, table);
            if snapshot.has_pending {
                if !table_state.timer_armed() {
                    table_state.set_timer_armed(true);
                    effects.push(Effect::ArmRefresh {
                        table,
                        after_ms: interval,
                    });
                }
            }
            state.mark_dirty();
        }
        Msg::RefreshFailed { table } => {
            // Polling is idempotent and cheap: retry on the same interval,
            // without surfacing anything to the user.
            let interval = state.config.refresh_interval_ms;
            let table_state = table_mut(&mut state, table);
            if !table_state.timer_armed() {
                table_state.set_timer_armed(true);
                effects.push(Effect::ArmRefresh {
                    table,
                    after_ms: interval,
                });
            }
        }
        Msg::RefreshTick { table } => {
            let table_state = table_mut(&mut state, table);
            table_state.set_timer_armed(false);
            let target = table_state.target().to_string();
            effects.push(Effect::FetchTable { table, target });
        }
        Msg::SessionExpired => {
            state.logged_out = true;
            effects.push(Effect::NavigateToLogin);
            state.mark_dirty();
        }

        Msg::PlateEdited { value, cursor } => {
            let (normalized, next_cursor) = crate::normalize::normalize_plate(&value, cursor);
            state.form.patente = normalized;
            state.form.cursor = next_cursor;
            state.mark_dirty();
        }
        Msg::TallerSelected { value } => {
            state.form.select_taller(value);
            state.mark_dirty();
        }
        Msg::NewTallerModalOpened => {
            state.form.naming_taller = true;
            state.form.naming_error = false;
            state.form.naming_draft.clear();
            state.mark_dirty();
        }
        Msg::NewTallerModalClosed => {
            state.form.naming_taller = false;
            state.mark_dirty();
        }
        Msg::NewTallerNameEdited { value } => {
            state.form.naming_draft = value;
            state.mark_dirty();
        }
        Msg::NewTallerConfirmed => {
            state.form.confirm_new_taller();
            state.mark_dirty();
        }
        Msg::CreateSubmitted {
            issued_ms,
            date_label,
        } => {
            if !state.form.submit_enabled() {
                return (state, effects);
            }
            let Some(taller) = state.form.choice() else {
                return (state, effects);
            };
            let token = format!("pending-{issued_ms}");
            state.procesos.prepend_placeholder(PlaceholderRow {
                token: token.clone(),
                fecha: date_label,
                patente: state.form.patente.clone(),
                taller_label: state.form.taller_label(),
            });
            effects.push(Effect::SubmitCreate {
                placeholder: token,
                patente: state.form.patente.clone(),
                taller,
            });
            state.mark_dirty();
        }
        Msg::CreateCompleted {
            placeholder,
            row,
            taller,
        } => {
            // Without a rendered row the placeholder stays; the next refresh
            // reconciles it.
            if let Some(row) = row {
                state.procesos.resolve_placeholder(&placeholder, row);
            }
            if let Some(taller) = taller {
                state.form.adopt_assigned(taller);
            }
            state.form.patente.clear();
            state.form.cursor = 0;
            ensure_refresh(&mut state, &mut effects);
            state.mark_dirty();
        }
        Msg::CreateFailed {
            placeholder,
            message,
        } => {
            state.procesos.remove_placeholder(&placeholder);
            let duration = notice::error_duration(&message);
            notify(&mut state, &mut effects, NoticeKind::Error, message, duration);
            state.mark_dirty();
        }

        Msg::RetrySubmitted { id } => {
            if let Some(row) = state.procesos.row_mut(id) {
                row.pending = true;
                row.estado = "en proceso".to_string();
                row.resultado = "-".to_string();
                row.detalle = "-".to_string();
                effects.push(Effect::PostRetry { id });
                state.mark_dirty();
            }
        }
        Msg::RetryCompleted { id, row } => {
            if let Some(row) = row {
                state.procesos.replace_row(id, row);
            }
            ensure_refresh(&mut state, &mut effects);
            state.mark_dirty();
        }
        Msg::RetryFailed { id, message } => {
            if let Some(row) = state.procesos.row_mut(id) {
                row.pending = false;
            }
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Error,
                message,
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }

        Msg::RowToggled { id, checked } => {
            state.selection.set(id, checked);
            state.mark_dirty();
        }
        Msg::SelectAllToggled { checked } => {
            state.selection.clear();
            if checked {
                let ids = state.procesos.selectable_ids();
                state.selection.extend(ids);
            }
            state.mark_dirty();
        }

        Msg::TextFilterEdited { field, value } => {
            state.filters.set_text(field, value);
            let generation = state.filters.bump_debounce();
            effects.push(Effect::ArmDebounce {
                generation,
                after_ms: state.config.debounce_ms,
            });
            state.mark_dirty();
        }
        Msg::DebounceFired { generation } => {
            if state.filters.debounce_is_current(generation) {
                apply_filters(&mut state, &mut effects);
            }
        }
        Msg::ChipToggled { group, value } => {
            state.filters.toggle_chip(group, &value);
            apply_filters(&mut state, &mut effects);
        }
        Msg::SortHeaderClicked { key } => {
            state.filters.toggle_sort(&key);
            apply_filters(&mut state, &mut effects);
        }
        Msg::FiltersCleared => {
            state.filters.reset();
            apply_filters(&mut state, &mut effects);
        }
        Msg::PageRequested { direction } => {
            let next = state.procesos.neighbor_page(direction);
            let target = filtered_target(&state, Some(next));
            state.procesos.set_target(target.clone());
            effects.push(Effect::FetchTable {
                table: TableKind::Procesos,
                target,
            });
            state.mark_dirty();
        }

        Msg::DeleteRequested => {
            if state.selection.is_empty() {
                return (state, effects);
            }
            let opened = state.modal.open(PendingAction::DeleteRows {
                ids: state.selection.ids(),
            });
            if opened {
                state.mark_dirty();
            }
        }
        Msg::DeleteCompleted { deleted } => {
            state.modal.clear();
            state.selection.clear();
            effects.push(Effect::FetchTable {
                table: TableKind::Procesos,
                target: state.procesos.target().to_string(),
            });
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Success,
                format!("Eliminados: {deleted}"),
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }
        Msg::DeleteFailed { message } => {
            state.modal.clear();
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Error,
                message,
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }

        Msg::RowTallerPicked { id, next, prior } => {
            if next.id == prior.id {
                return (state, effects);
            }
            let opened = state
                .modal
                .open(PendingAction::ReassignTaller { id, next, prior });
            if opened {
                state.mark_dirty();
            }
        }
        Msg::TallerSaved { id, taller } => {
            state.modal.clear();
            if let Some(row) = state.procesos.row_mut(id) {
                row.taller = Some(if taller.id.is_empty() {
                    TallerRef::sin_taller()
                } else {
                    taller
                });
            }
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Success,
                "Taller actualizado.".to_string(),
                SUCCESS_NOTICE_MS,
            );
            state.mark_dirty();
        }
        Msg::TallerFailed { id: _, message } => {
            state.modal.clear();
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Error,
                message,
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }

        Msg::ModalConfirmed => {
            match state.modal.pending().cloned() {
                Some(PendingAction::DeleteRows { ids }) => {
                    // The modal stays open (and the slot held) until the
                    // response lands.
                    effects.push(Effect::PostDelete { ids });
                }
                Some(PendingAction::ReassignTaller { id, next, .. }) => {
                    effects.push(Effect::PostTaller {
                        id,
                        taller_id: next.id,
                    });
                }
                Some(PendingAction::SaveUser { form }) => {
                    state.modal.clear();
                    effects.push(Effect::SubmitUserForm { form });
                    state.mark_dirty();
                }
                Some(PendingAction::ToggleActive { form, .. }) => {
                    state.modal.clear();
                    effects.push(Effect::SubmitUserForm { form });
                    state.mark_dirty();
                }
                None => {}
            }
        }
        Msg::ModalDismissed => {
            // Cancelling reverts nothing in state: row selectors and toggles
            // are projections of server-rendered values that were never
            // mutated while the action was pending.
            if state.modal.take().is_some() {
                state.mark_dirty();
            }
        }

        Msg::ErrorDetailOpened { id } => {
            let detail = state
                .procesos
                .row_mut(id)
                .and_then(|row| row.error_detail.clone())
                .unwrap_or_else(|| "Sin detalle disponible.".to_string());
            state.modal.error_detail = Some(detail);
            state.mark_dirty();
        }
        Msg::ErrorDetailClosed => {
            state.modal.error_detail = None;
            state.mark_dirty();
        }

        Msg::SessionPollTick => {
            effects.push(Effect::FetchSessionStatus);
        }
        Msg::SessionStatusLoaded { payload, now } => {
            state.session.last = Some(payload);
            state.session.now = now;
            state.mark_dirty();
        }
        Msg::SessionStatusFailed => {
            // Hide the banner rather than leaving stale state visible.
            state.session.last = Some(crate::session::SessionPayload::default());
            state.mark_dirty();
        }
        Msg::CountdownTick { now } => {
            if state.session.last.is_some() {
                state.session.now = now;
                state.mark_dirty();
            }
        }

        Msg::NoticeExpired { id } => {
            state.notices.dismiss(id);
            state.mark_dirty();
        }

        Msg::UserCreateOpened => {
            state.users.create_open = true;
            state.mark_dirty();
        }
        Msg::UserCreateClosed => {
            state.users.create_open = false;
            state.users.generated_password.clear();
            state.mark_dirty();
        }
        Msg::UserPasswordFilled { value } => {
            state.users.generated_password = value;
            state.mark_dirty();
        }
        Msg::UserSaveRequested { form } => {
            if state.modal.open(PendingAction::SaveUser { form }) {
                state.mark_dirty();
            }
        }
        Msg::UserActiveToggleRequested { form, active } => {
            if matches!(
                state.modal.pending(),
                Some(PendingAction::ToggleActive { form: held, .. }) if held == &form
            ) {
                return (state, effects);
            }
            if state
                .modal
                .open(PendingAction::ToggleActive { form, active })
            {
                state.mark_dirty();
            }
        }

        Msg::FilesPicked { files } => {
            let over_limit = state.docs.add_files(files);
            if over_limit {
                notify(
                    &mut state,
                    &mut effects,
                    NoticeKind::Error,
                    format!(
                        "Solo podes cargar hasta {} imagenes.",
                        crate::docs::MAX_UPLOAD_FILES
                    ),
                    DEFAULT_NOTICE_MS,
                );
            }
            state.mark_dirty();
        }
        Msg::FileRemoved { index } => {
            state.docs.remove_file(index);
            state.mark_dirty();
        }
        Msg::EnhanceModeChanged { value } => {
            state.docs.enhance_mode = value;
            state.mark_dirty();
        }
        Msg::DocFilenameEdited { value } => {
            state.docs.filename = value;
            state.mark_dirty();
        }
        Msg::PreviewRequested => {
            if state.docs.files.is_empty() {
                notify(
                    &mut state,
                    &mut effects,
                    NoticeKind::Error,
                    "Selecciona al menos una imagen.".to_string(),
                    DEFAULT_NOTICE_MS,
                );
                return (state, effects);
            }
            let pending = state.docs.pending_files();
            if pending.is_empty() && !state.docs.previews.is_empty() {
                notify(
                    &mut state,
                    &mut effects,
                    NoticeKind::Info,
                    "No hay nuevas imagenes para previsualizar.".to_string(),
                    INFO_NOTICE_MS,
                );
                return (state, effects);
            }
            let files = if pending.is_empty() {
                state.docs.files.clone()
            } else {
                pending
            };
            state.docs.preview_busy = true;
            effects.push(Effect::PostPreview {
                files,
                enhance_mode: state.docs.enhance_mode.clone(),
            });
            state.mark_dirty();
        }
        Msg::PreviewLoaded { previews } => {
            state.docs.preview_busy = false;
            state.docs.merge_previews(previews);
            state.mark_dirty();
        }
        Msg::PreviewFailed { message } => {
            state.docs.preview_busy = false;
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Error,
                message,
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }
        Msg::GenerateRequested => {
            if state.docs.previews.is_empty() || state.docs.generate_busy {
                return (state, effects);
            }
            state.docs.generate_busy = true;
            effects.push(Effect::PostGenerate {
                images: state
                    .docs
                    .previews
                    .iter()
                    .map(|item| item.edited_url.clone())
                    .collect(),
                filename: state.docs.filename.clone(),
            });
            state.mark_dirty();
        }
        Msg::GenerateCompleted { row } => {
            if let Some(row) = row {
                state.documentos.prepend_row(row);
            }
            state.docs.reset_after_generate();
            effects.push(Effect::FetchTable {
                table: TableKind::Documentos,
                target: state.documentos.target().to_string(),
            });
            state.mark_dirty();
        }
        Msg::GenerateFailed { message } => {
            state.docs.generate_busy = false;
            notify(
                &mut state,
                &mut effects,
                NoticeKind::Error,
                message,
                DEFAULT_NOTICE_MS,
            );
            state.mark_dirty();
        }

        Msg::NoOp => {}
    }

    (state, effects)
}

fn table_mut(state: &mut AppState, table: TableKind) -> &mut crate::table::TableState {
    match table {
        TableKind::Procesos => &mut state.procesos,
        TableKind::Documentos => &mut state.documentos,
    }
}

/// Rebuild the refresh target from the current filters (page resets to 1),
/// fetch immediately and persist. An armed timer is left alone; it will
/// read the new target when it fires.
fn apply_filters(state: &mut AppState, effects: &mut Vec<Effect>) {
    let target = filtered_target(state, None);
    state.procesos.set_target(target.clone());
    effects.push(Effect::FetchTable {
        table: TableKind::Procesos,
        target,
    });
    effects.push(Effect::PersistFilters {
        filters: state.filters.clone(),
    });
    state.mark_dirty();
}

fn filtered_target(state: &AppState, page: Option<u32>) -> String {
    format!(
        "{}?{}",
        state.procesos.base_target(),
        state.filters.query_string(page)
    )
}

/// Re-arm the procesos poll shortly after a user-initiated mutation, unless
/// a timer is already outstanding.
fn ensure_refresh(state: &mut AppState, effects: &mut Vec<Effect>) {
    if !state.procesos.timer_armed() {
        state.procesos.set_timer_armed(true);
        effects.push(Effect::ArmRefresh {
            table: TableKind::Procesos,
            after_ms: state.config.rearm_ms,
        });
    }
}

/// Push a notice and arm its expiry timer.
fn notify(
    state: &mut AppState,
    effects: &mut Vec<Effect>,
    kind: NoticeKind,
    text: String,
    duration_ms: u64,
) {
    let id = state.notices.push(kind, text, duration_ms);
    effects.push(Effect::ArmNotice {
        id,
        after_ms: duration_ms,
    });
}
