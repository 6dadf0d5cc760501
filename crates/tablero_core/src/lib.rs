//! Tablero core: pure state machine and view-model helpers.
pub mod bitmap;
mod docs;
mod effect;
mod filter;
mod form;
mod modal;
mod msg;
mod normalize;
mod notice;
mod selection;
mod session;
mod state;
mod table;
mod update;
mod view_model;

pub use docs::{FileEntry, PreviewItem, DEFAULT_ENHANCE_MODE, MAX_UPLOAD_FILES};
pub use effect::Effect;
pub use filter::{ChipGroup, FilterState, SortDir, TextField, DEFAULT_SORT_KEY};
pub use form::{TallerChoice, NEW_TALLER_VALUE};
pub use modal::PendingAction;
pub use msg::Msg;
pub use normalize::{normalize_plate, password_from_bytes, PASSWORD_LEN};
pub use notice::{
    Notice, NoticeKind, DEFAULT_NOTICE_MS, INFO_NOTICE_MS, LONG_ERROR_NOTICE_MS, SUCCESS_NOTICE_MS,
};
pub use selection::SelectAllState;
pub use session::{banner_text, format_countdown, SessionPayload, SessionPhase};
pub use state::{AppState, CoreConfig};
pub use table::{
    PageDirection, PlaceholderRow, RowId, RowStub, TableKind, TableRow, TableSnapshot, TallerRef,
};
pub use update::update;
pub use view_model::{
    AppViewModel, CountView, DocsView, FilterView, FormView, ModalView, PaginationView, RowView,
    UserView,
};
