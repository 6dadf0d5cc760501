use url::form_urlencoded;

/// Sort key applied when none has been chosen explicitly.
pub const DEFAULT_SORT_KEY: &str = "fecha";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Debounced free-text/date filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Query,
    DateFrom,
    DateTo,
}

/// Chip-toggle filter groups; applying one is immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipGroup {
    Estado,
    Resultado,
}

/// Filter, sort and pagination inputs serialized into the refresh target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub date_from: String,
    pub date_to: String,
    pub estado: String,
    pub resultado: String,
    pub sort_key: String,
    pub sort_dir: SortDir,
    debounce_generation: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            estado: String::new(),
            resultado: String::new(),
            sort_key: DEFAULT_SORT_KEY.to_string(),
            sort_dir: SortDir::Desc,
            debounce_generation: 0,
        }
    }
}

impl FilterState {
    /// Serialize non-empty fields plus sort/dir (and optionally a page)
    /// into a query string.
    pub fn query_string(&self, page: Option<u32>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("f_query", &self.query),
            ("f_date_from", &self.date_from),
            ("f_date_to", &self.date_to),
            ("f_estado", &self.estado),
            ("f_resultado", &self.resultado),
        ] {
            if !value.is_empty() {
                serializer.append_pair(key, value);
            }
        }
        serializer.append_pair("sort", &self.sort_key);
        serializer.append_pair("dir", self.sort_dir.as_str());
        if let Some(page) = page {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }

    /// Header click: flip direction on the active key, otherwise switch to
    /// the new key with the default (descending) direction.
    pub(crate) fn toggle_sort(&mut self, key: &str) {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_key = key.to_string();
            self.sort_dir = SortDir::Desc;
        }
    }

    /// Chip click: selecting the already-active value clears the group.
    pub(crate) fn toggle_chip(&mut self, group: ChipGroup, value: &str) {
        let slot = match group {
            ChipGroup::Estado => &mut self.estado,
            ChipGroup::Resultado => &mut self.resultado,
        };
        if slot == value {
            slot.clear();
        } else {
            *slot = value.to_string();
        }
    }

    pub(crate) fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::Query => self.query = value,
            TextField::DateFrom => self.date_from = value,
            TextField::DateTo => self.date_to = value,
        }
    }

    pub(crate) fn reset(&mut self) {
        let generation = self.debounce_generation;
        *self = FilterState {
            debounce_generation: generation,
            ..FilterState::default()
        };
    }

    /// Start a new quiet period; earlier generations become stale.
    pub(crate) fn bump_debounce(&mut self) -> u64 {
        self.debounce_generation += 1;
        self.debounce_generation
    }

    pub(crate) fn debounce_is_current(&self, generation: u64) -> bool {
        self.debounce_generation == generation
    }
}
