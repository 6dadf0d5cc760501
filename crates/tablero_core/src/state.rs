use crate::docs::DocsPanel;
use crate::filter::FilterState;
use crate::form::CreateForm;
use crate::modal::ModalState;
use crate::notice::NoticeBoard;
use crate::selection::SelectionState;
use crate::session::SessionStatus;
use crate::table::TableState;
use crate::view_model::AppViewModel;

/// Static configuration injected at construction: refresh targets and the
/// timer intervals. All intervals are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub procesos_target: String,
    pub documentos_target: String,
    pub refresh_interval_ms: u64,
    pub first_poll_ms: u64,
    pub rearm_ms: u64,
    pub debounce_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            procesos_target: "/tools/rpa-enargas/table".to_string(),
            documentos_target: "/tools/img-to-pdf/table".to_string(),
            refresh_interval_ms: 5000,
            first_poll_ms: 2000,
            rearm_ms: 1500,
            debounce_ms: 400,
        }
    }
}

/// User-management modal state; the user rows themselves are server forms
/// referenced by opaque ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPanel {
    pub create_open: bool,
    pub generated_password: String,
}

/// The whole client state. Owned by the single dispatch loop; mutation
/// happens only inside [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) config: CoreConfig,
    pub(crate) procesos: TableState,
    pub(crate) documentos: TableState,
    pub(crate) selection: SelectionState,
    pub(crate) filters: FilterState,
    pub(crate) session: SessionStatus,
    pub(crate) modal: ModalState,
    pub(crate) notices: NoticeBoard,
    pub(crate) form: CreateForm,
    pub(crate) users: UserPanel,
    pub(crate) docs: DocsPanel,
    pub(crate) logged_out: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl AppState {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            procesos: TableState::new(&config.procesos_target),
            documentos: TableState::new(&config.documentos_target),
            config,
            selection: SelectionState::default(),
            filters: FilterState::default(),
            session: SessionStatus::default(),
            modal: ModalState::default(),
            notices: NoticeBoard::default(),
            form: CreateForm::default(),
            users: UserPanel::default(),
            docs: DocsPanel::default(),
            logged_out: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        crate::view_model::project(self)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn procesos(&self) -> &TableState {
        &self.procesos
    }

    pub fn documentos(&self) -> &TableState {
        &self.documentos
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read-and-clear the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
