use std::collections::BTreeSet;

/// Server-assigned identifier of a background job row.
pub type RowId = i64;

/// Which synchronized table a message or effect refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Procesos,
    Documentos,
}

/// A workshop reference as rendered into a row (empty id means "Sin taller").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TallerRef {
    pub id: String,
    pub nombre: String,
}

impl TallerRef {
    pub fn new(id: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
        }
    }

    /// The "no workshop assigned" sentinel the server renders.
    pub fn sin_taller() -> Self {
        Self::new("", "Sin taller")
    }
}

/// One server-rendered row, digested from the refresh fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowStub {
    pub id: Option<RowId>,
    pub fecha: String,
    pub patente: String,
    pub taller: Option<TallerRef>,
    pub estado: String,
    pub resultado: String,
    pub detalle: String,
    /// Whether the row's checkbox is enabled (pending rows render disabled).
    pub selectable: bool,
    pub pending: bool,
    pub error_detail: Option<String>,
}

/// A speculative row shown between form submission and server confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRow {
    pub token: String,
    pub fecha: String,
    pub patente: String,
    pub taller_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Server(RowStub),
    Placeholder(PlaceholderRow),
}

impl TableRow {
    pub fn id(&self) -> Option<RowId> {
        match self {
            TableRow::Server(stub) => stub.id,
            TableRow::Placeholder(_) => None,
        }
    }

    pub fn has_token(&self, token: &str) -> bool {
        matches!(self, TableRow::Placeholder(row) if row.token == token)
    }
}

/// The digested body of one refresh response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSnapshot {
    pub rows: Vec<RowStub>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total: Option<u64>,
    pub has_pending: bool,
    /// Workshop options harvested from the rendered row selectors; the
    /// server list is authoritative when present.
    pub taller_options: Vec<TallerRef>,
}

/// State of one synchronized table.
///
/// The refresh target is a single-slot value with monotonic replace
/// semantics: whoever writes it last wins, and the next scheduled fetch
/// reads the latest value. An in-flight timer is never cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    base_target: String,
    target: String,
    pub rows: Vec<TableRow>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    timer_armed: bool,
}

impl TableState {
    pub fn new(base_target: impl Into<String>) -> Self {
        let base_target = base_target.into();
        Self {
            target: base_target.clone(),
            base_target,
            rows: Vec::new(),
            page: 1,
            total_pages: 1,
            total: 0,
            timer_armed: false,
        }
    }

    pub fn base_target(&self) -> &str {
        &self.base_target
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub(crate) fn set_target(&mut self, target: String) {
        self.target = target;
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub(crate) fn set_timer_armed(&mut self, armed: bool) {
        self.timer_armed = armed;
    }

    /// Replace the whole row list from a refresh snapshot. Placeholder rows
    /// not yet confirmed by the server are dropped; that is the documented
    /// cost of full-replacement rendering.
    pub(crate) fn apply_snapshot(&mut self, snapshot: &TableSnapshot) {
        self.rows = snapshot
            .rows
            .iter()
            .cloned()
            .map(TableRow::Server)
            .collect();
        if let Some(page) = snapshot.page {
            self.page = page.max(1);
        }
        if let Some(total_pages) = snapshot.total_pages {
            self.total_pages = total_pages.max(1);
        }
        if let Some(total) = snapshot.total {
            self.total = total;
        }
    }

    /// Ids of all rows currently rendered with a server identity.
    pub fn server_ids(&self) -> BTreeSet<RowId> {
        self.rows.iter().filter_map(TableRow::id).collect()
    }

    /// Ids of rows whose checkbox is enabled.
    pub fn selectable_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Server(stub) if stub.selectable => stub.id,
                _ => None,
            })
            .collect()
    }

    pub(crate) fn prepend_placeholder(&mut self, row: PlaceholderRow) {
        self.rows.insert(0, TableRow::Placeholder(row));
    }

    /// Swap the placeholder bearing `token` for the confirmed server row.
    /// When a refresh already purged the placeholder the row is prepended.
    pub(crate) fn resolve_placeholder(&mut self, token: &str, stub: RowStub) {
        match self.rows.iter().position(|row| row.has_token(token)) {
            Some(index) => self.rows[index] = TableRow::Server(stub),
            None => self.rows.insert(0, TableRow::Server(stub)),
        }
    }

    pub(crate) fn remove_placeholder(&mut self, token: &str) {
        self.rows.retain(|row| !row.has_token(token));
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> Option<&mut RowStub> {
        self.rows.iter_mut().find_map(|row| match row {
            TableRow::Server(stub) if stub.id == Some(id) => Some(stub),
            _ => None,
        })
    }

    pub(crate) fn replace_row(&mut self, id: RowId, stub: RowStub) {
        if let Some(index) = self.rows.iter().position(|row| row.id() == Some(id)) {
            self.rows[index] = TableRow::Server(stub);
        }
    }

    pub(crate) fn prepend_row(&mut self, stub: RowStub) {
        self.rows.insert(0, TableRow::Server(stub));
    }

    /// `clamp(current ± 1, 1, total_pages)`.
    pub fn neighbor_page(&self, direction: PageDirection) -> u32 {
        match direction {
            PageDirection::Prev => self.page.saturating_sub(1).max(1),
            PageDirection::Next => (self.page + 1).min(self.total_pages),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}
