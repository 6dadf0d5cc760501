//! Tablero client: HTTP surface, fragment digestion and command dispatch.
mod api;
mod fragment;
mod handle;
mod persist;
mod sniff;
mod types;

pub use api::{ApiClient, ReqwestApiClient, TallerSpec};
pub use fragment::{parse_pagination, parse_row, parse_table, ParsedRow, ParsedTable};
pub use handle::{
    ClientCommand, ClientEvent, ClientHandle, CreatedRow, DigestedPreview, DigestedTable,
    PanelTable,
};
pub use persist::{ensure_state_dir, PersistError, StateFile};
pub use types::{
    ApiError, ApiSettings, CreatedPayload, DeletePayload, GeneratePayload, PreviewEntry,
    PreviewPayload, RefreshPayload, RetryPayload, RowId, SessionStatusPayload, TallerPayload,
    UploadFile,
};
