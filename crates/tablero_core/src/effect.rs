use crate::docs::FileEntry;
use crate::filter::FilterState;
use crate::form::TallerChoice;
use crate::table::{RowId, TableKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the table at its current target, now.
    FetchTable { table: TableKind, target: String },
    /// Arm the single poll timer for a table. Emitted only from refresh
    /// completion handlers and the explicit re-arm path.
    ArmRefresh { table: TableKind, after_ms: u64 },
    /// Arm the filter quiet-period timer; stale generations are ignored.
    ArmDebounce { generation: u64, after_ms: u64 },
    /// Arm the expiry timer for a notice.
    ArmNotice { id: u64, after_ms: u64 },
    SubmitCreate {
        placeholder: String,
        patente: String,
        taller: TallerChoice,
    },
    PostRetry { id: RowId },
    PostDelete { ids: Vec<RowId> },
    PostTaller { id: RowId, taller_id: String },
    SubmitUserForm { form: String },
    FetchSessionStatus,
    PostPreview {
        files: Vec<FileEntry>,
        enhance_mode: String,
    },
    PostGenerate {
        images: Vec<String>,
        filename: String,
    },
    /// Save the current filters for the next run.
    PersistFilters { filters: FilterState },
    /// Authentication expired; leave for the login boundary.
    NavigateToLogin,
}
