use crate::docs::{FileEntry, PreviewItem};
use crate::filter::{ChipGroup, FilterState, TextField};
use crate::session::SessionPayload;
use crate::table::{PageDirection, RowId, RowStub, TableKind, TableSnapshot, TallerRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// First message dispatched by the runtime; arms the initial polls.
    Started,
    /// Filters recovered from disk, applied before [`Msg::Started`].
    FiltersRestored { filters: FilterState },

    // Table synchronization.
    RefreshLoaded {
        table: TableKind,
        snapshot: TableSnapshot,
    },
    RefreshFailed { table: TableKind },
    /// The armed poll timer expired.
    RefreshTick { table: TableKind },
    /// Any expected-JSON call detected an authentication expiry.
    SessionExpired,

    // Job creation form.
    PlateEdited { value: String, cursor: usize },
    TallerSelected { value: String },
    NewTallerModalOpened,
    NewTallerModalClosed,
    NewTallerNameEdited { value: String },
    NewTallerConfirmed,
    /// Submit; the runtime injects the epoch millis (placeholder token) and
    /// the localized date label for the optimistic row.
    CreateSubmitted { issued_ms: u64, date_label: String },
    CreateCompleted {
        placeholder: String,
        row: Option<RowStub>,
        taller: Option<TallerRef>,
    },
    CreateFailed { placeholder: String, message: String },

    // Per-row retry.
    RetrySubmitted { id: RowId },
    RetryCompleted { id: RowId, row: Option<RowStub> },
    RetryFailed { id: RowId, message: String },

    // Selection.
    RowToggled { id: RowId, checked: bool },
    SelectAllToggled { checked: bool },

    // Filters, sorting, pagination.
    TextFilterEdited { field: TextField, value: String },
    ChipToggled { group: ChipGroup, value: String },
    DebounceFired { generation: u64 },
    SortHeaderClicked { key: String },
    FiltersCleared,
    PageRequested { direction: PageDirection },

    // Bulk delete.
    DeleteRequested,
    DeleteCompleted { deleted: u64 },
    DeleteFailed { message: String },

    // Workshop reassignment on an existing row.
    RowTallerPicked {
        id: RowId,
        next: TallerRef,
        prior: TallerRef,
    },
    TallerSaved { id: RowId, taller: TallerRef },
    TallerFailed { id: RowId, message: String },

    // Confirmation modals (single pending-action slot).
    ModalConfirmed,
    ModalDismissed,

    // Error-detail modal.
    ErrorDetailOpened { id: RowId },
    ErrorDetailClosed,

    // Session status banner.
    SessionPollTick,
    SessionStatusLoaded { payload: SessionPayload, now: i64 },
    SessionStatusFailed,
    /// Fast tick: re-render the countdown from the last payload only.
    CountdownTick { now: i64 },

    // Notices.
    NoticeExpired { id: u64 },

    // User management modals.
    UserCreateOpened,
    UserCreateClosed,
    UserPasswordFilled { value: String },
    UserSaveRequested { form: String },
    UserActiveToggleRequested { form: String, active: bool },

    // Image-to-document panel.
    FilesPicked { files: Vec<FileEntry> },
    FileRemoved { index: usize },
    EnhanceModeChanged { value: String },
    DocFilenameEdited { value: String },
    PreviewRequested,
    PreviewLoaded { previews: Vec<PreviewItem> },
    PreviewFailed { message: String },
    GenerateRequested,
    GenerateCompleted { row: Option<RowStub> },
    GenerateFailed { message: String },

    NoOp,
}
