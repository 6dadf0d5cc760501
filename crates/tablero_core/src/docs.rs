/// Upper bound on images queued for one document.
pub const MAX_UPLOAD_FILES: usize = 6;

/// Default server-side enhancement mode sent with previews.
pub const DEFAULT_ENHANCE_MODE: &str = "soft";

/// One queued image, identified by name/size/mtime so re-picking the same
/// file is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified_ms: u64,
}

impl FileEntry {
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.name, self.size, self.modified_ms)
    }
}

/// One server-produced preview; `edited_url` tracks client-side edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub id: String,
    pub source_key: Option<String>,
    pub base_url: String,
    pub full_url: String,
    pub edited_url: String,
}

/// State of the image-to-document panel: upload queue plus previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsPanel {
    pub files: Vec<FileEntry>,
    pub previews: Vec<PreviewItem>,
    pub enhance_mode: String,
    pub filename: String,
    pub preview_busy: bool,
    pub generate_busy: bool,
}

impl Default for DocsPanel {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            previews: Vec::new(),
            enhance_mode: DEFAULT_ENHANCE_MODE.to_string(),
            filename: String::new(),
            preview_busy: false,
            generate_busy: false,
        }
    }
}

impl DocsPanel {
    /// Merge picked files into the queue, deduplicating by key and capping
    /// at [`MAX_UPLOAD_FILES`]. Returns whether the cap was hit.
    pub(crate) fn add_files(&mut self, incoming: Vec<FileEntry>) -> bool {
        for file in incoming {
            if self.files.iter().any(|existing| existing.key() == file.key()) {
                continue;
            }
            self.files.push(file);
        }
        let over_limit = self.files.len() > MAX_UPLOAD_FILES;
        if over_limit {
            self.files.truncate(MAX_UPLOAD_FILES);
        }
        self.retain_previews();
        over_limit
    }

    pub(crate) fn remove_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
            self.retain_previews();
        }
    }

    /// Previews survive only while their source file is still queued.
    /// Previews without a source key are kept.
    pub(crate) fn retain_previews(&mut self) {
        if self.previews.is_empty() {
            return;
        }
        let keys: Vec<String> = self.files.iter().map(FileEntry::key).collect();
        self.previews.retain(|item| match &item.source_key {
            Some(key) => keys.contains(key),
            None => true,
        });
    }

    /// Files not yet represented by a preview.
    pub(crate) fn pending_files(&self) -> Vec<FileEntry> {
        let previewed: Vec<&str> = self
            .previews
            .iter()
            .filter_map(|item| item.source_key.as_deref())
            .collect();
        self.files
            .iter()
            .filter(|file| !previewed.contains(&file.key().as_str()))
            .cloned()
            .collect()
    }

    /// Append fresh previews, then order everything by the upload queue;
    /// previews without a source key sink to the end.
    pub(crate) fn merge_previews(&mut self, fresh: Vec<PreviewItem>) {
        let mut combined = std::mem::take(&mut self.previews);
        combined.extend(fresh);
        let mut ordered = Vec::with_capacity(combined.len());
        for key in self.files.iter().map(FileEntry::key) {
            for item in &combined {
                if item.source_key.as_deref() == Some(key.as_str()) {
                    ordered.push(item.clone());
                }
            }
        }
        for item in combined {
            if item.source_key.is_none() {
                ordered.push(item);
            }
        }
        self.previews = ordered;
    }

    pub fn generate_enabled(&self) -> bool {
        !self.previews.is_empty() && !self.generate_busy
    }

    pub(crate) fn reset_after_generate(&mut self) {
        self.previews.clear();
        self.files.clear();
        self.filename.clear();
        self.generate_busy = false;
    }
}
