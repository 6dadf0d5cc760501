use crate::docs::FileEntry;
use crate::filter::SortDir;
use crate::modal::PendingAction;
use crate::notice::Notice;
use crate::selection::SelectAllState;
use crate::state::AppState;
use crate::table::{RowId, TableRow, TallerRef};

/// One rendered table row; placeholder rows carry the synthetic
/// "en proceso" cells until the server confirms them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: Option<RowId>,
    pub fecha: String,
    pub patente: String,
    pub taller: Option<TallerRef>,
    pub taller_label: String,
    pub estado: String,
    pub resultado: String,
    pub detalle: String,
    pub selectable: bool,
    pub pending: bool,
    pub checked: bool,
    pub placeholder: bool,
    pub has_error_detail: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Header count: selected count while a selection exists, total otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountView {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    ConfirmDelete { count: usize },
    ConfirmTaller { message: String },
    ConfirmUserSave,
    ConfirmUserActive { active: bool },
    ErrorDetail { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub query: String,
    pub date_from: String,
    pub date_to: String,
    pub estado: String,
    pub resultado: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub patente: String,
    pub cursor: usize,
    pub taller_value: String,
    pub taller_options: Vec<TallerRef>,
    pub new_taller_nombre: String,
    pub submit_enabled: bool,
    pub naming_taller: bool,
    pub naming_error: bool,
    pub naming_draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub create_open: bool,
    pub generated_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsView {
    pub rows: Vec<RowView>,
    pub files: Vec<FileEntry>,
    pub preview_count: usize,
    pub enhance_mode: String,
    pub filename: String,
    pub preview_busy: bool,
    pub generate_busy: bool,
    pub generate_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub rows: Vec<RowView>,
    pub selected_ids: Vec<RowId>,
    pub count: CountView,
    pub select_all: SelectAllState,
    pub select_all_enabled: bool,
    pub delete_visible: bool,
    pub pagination: PaginationView,
    pub sort_key: String,
    pub sort_dir: SortDir,
    pub filters: FilterView,
    pub banner: Option<String>,
    pub notices: Vec<Notice>,
    pub modal: Option<ModalView>,
    pub form: FormView,
    pub users: UserView,
    pub docs: DocsView,
    pub logged_out: bool,
    pub dirty: bool,
}

pub(crate) fn project(state: &AppState) -> AppViewModel {
    let rows: Vec<RowView> = state
        .procesos
        .rows
        .iter()
        .map(|row| row_view(row, &state.selection))
        .collect();
    let selectable = state.procesos.selectable_ids();
    let (select_all, select_all_enabled) = state.selection.select_all_state(&selectable);

    let count = if state.selection.is_empty() {
        CountView {
            label: "Total",
            value: state.procesos.total,
        }
    } else {
        CountView {
            label: "Seleccionados",
            value: state.selection.len() as u64,
        }
    };

    AppViewModel {
        selected_ids: state.selection.ids(),
        count,
        select_all,
        select_all_enabled,
        delete_visible: !state.selection.is_empty(),
        pagination: PaginationView {
            page: state.procesos.page,
            total_pages: state.procesos.total_pages,
            prev_enabled: state.procesos.page > 1,
            next_enabled: state.procesos.page < state.procesos.total_pages,
        },
        sort_key: state.filters.sort_key.clone(),
        sort_dir: state.filters.sort_dir,
        filters: FilterView {
            query: state.filters.query.clone(),
            date_from: state.filters.date_from.clone(),
            date_to: state.filters.date_to.clone(),
            estado: state.filters.estado.clone(),
            resultado: state.filters.resultado.clone(),
        },
        banner: state.session.banner(),
        notices: state.notices.items.clone(),
        modal: modal_view(state),
        form: FormView {
            patente: state.form.patente.clone(),
            cursor: state.form.cursor,
            taller_value: state.form.taller_value.clone(),
            taller_options: state.form.taller_options.clone(),
            new_taller_nombre: state.form.new_taller_nombre.clone(),
            submit_enabled: state.form.submit_enabled(),
            naming_taller: state.form.naming_taller,
            naming_error: state.form.naming_error,
            naming_draft: state.form.naming_draft.clone(),
        },
        users: UserView {
            create_open: state.users.create_open,
            generated_password: state.users.generated_password.clone(),
        },
        docs: DocsView {
            rows: state
                .documentos
                .rows
                .iter()
                .map(|row| row_view(row, &state.selection))
                .collect(),
            files: state.docs.files.clone(),
            preview_count: state.docs.previews.len(),
            enhance_mode: state.docs.enhance_mode.clone(),
            filename: state.docs.filename.clone(),
            preview_busy: state.docs.preview_busy,
            generate_busy: state.docs.generate_busy,
            generate_enabled: state.docs.generate_enabled(),
        },
        logged_out: state.logged_out,
        dirty: state.is_dirty(),
        rows,
    }
}

fn row_view(row: &TableRow, selection: &crate::selection::SelectionState) -> RowView {
    match row {
        TableRow::Server(stub) => RowView {
            id: stub.id,
            fecha: stub.fecha.clone(),
            patente: stub.patente.clone(),
            taller: stub.taller.clone(),
            taller_label: stub
                .taller
                .as_ref()
                .map(|taller| taller.nombre.clone())
                .unwrap_or_else(|| "-".to_string()),
            estado: stub.estado.clone(),
            resultado: stub.resultado.clone(),
            detalle: stub.detalle.clone(),
            selectable: stub.selectable,
            pending: stub.pending,
            checked: stub.id.is_some_and(|id| selection.contains(id)),
            placeholder: false,
            has_error_detail: stub.error_detail.is_some(),
        },
        TableRow::Placeholder(placeholder) => RowView {
            id: None,
            fecha: placeholder.fecha.clone(),
            patente: placeholder.patente.clone(),
            taller: None,
            taller_label: placeholder.taller_label.clone(),
            estado: "en proceso".to_string(),
            resultado: "-".to_string(),
            detalle: "-".to_string(),
            selectable: false,
            pending: true,
            checked: false,
            placeholder: true,
            has_error_detail: false,
        },
    }
}

fn modal_view(state: &AppState) -> Option<ModalView> {
    if let Some(pending) = state.modal.pending() {
        return Some(match pending {
            PendingAction::DeleteRows { ids } => ModalView::ConfirmDelete { count: ids.len() },
            PendingAction::ReassignTaller { next, prior, .. } => ModalView::ConfirmTaller {
                message: format!("Cambiar \"{}\" por \"{}\"?", prior.nombre, next.nombre),
            },
            PendingAction::SaveUser { .. } => ModalView::ConfirmUserSave,
            PendingAction::ToggleActive { active, .. } => {
                ModalView::ConfirmUserActive { active: *active }
            }
        });
    }
    state
        .modal
        .error_detail
        .as_ref()
        .map(|detail| ModalView::ErrorDetail {
            detail: detail.clone(),
        })
}
