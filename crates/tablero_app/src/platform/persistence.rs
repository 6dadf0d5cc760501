use std::path::Path;

use panel_logging::{panel_info, panel_warn};
use serde::{Deserialize, Serialize};
use tablero_client::StateFile;
use tablero_core::{FilterState, SortDir};

const STATE_FILENAME: &str = ".tablero_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedFilters {
    query: String,
    date_from: String,
    date_to: String,
    estado: String,
    resultado: String,
    sort_key: String,
    sort_desc: bool,
}

pub(crate) fn state_file(dir: &Path) -> StateFile {
    StateFile::new(dir, STATE_FILENAME)
}

/// Restore the previous run's filters; anything missing or malformed just
/// means defaults.
pub(crate) fn load_filters(file: &StateFile) -> Option<FilterState> {
    let content = match file.read() {
        Ok(Some(content)) => content,
        Ok(None) => return None,
        Err(err) => {
            panel_warn!("Failed to read persisted filters from {:?}: {}", file.path(), err);
            return None;
        }
    };

    let persisted: PersistedFilters = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            panel_warn!("Failed to parse persisted filters from {:?}: {}", file.path(), err);
            return None;
        }
    };

    let mut filters = FilterState::default();
    filters.query = persisted.query;
    filters.date_from = persisted.date_from;
    filters.date_to = persisted.date_to;
    filters.estado = persisted.estado;
    filters.resultado = persisted.resultado;
    if !persisted.sort_key.is_empty() {
        filters.sort_key = persisted.sort_key;
    }
    filters.sort_dir = if persisted.sort_desc {
        SortDir::Desc
    } else {
        SortDir::Asc
    };

    panel_info!("Loaded persisted filters from {:?}", file.path());
    Some(filters)
}

pub(crate) fn save_filters(file: &StateFile, filters: &FilterState) {
    let persisted = PersistedFilters {
        query: filters.query.clone(),
        date_from: filters.date_from.clone(),
        date_to: filters.date_to.clone(),
        estado: filters.estado.clone(),
        resultado: filters.resultado.clone(),
        sort_key: filters.sort_key.clone(),
        sort_desc: filters.sort_dir == SortDir::Desc,
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(content) => content,
        Err(err) => {
            panel_warn!("Failed to serialize filters: {err}");
            return;
        }
    };

    if let Err(err) = file.write(&content) {
        panel_warn!("Failed to write persisted filters to {:?}: {}", file.path(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn filters_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let file = state_file(temp.path());

        let mut filters = FilterState::default();
        filters.query = "AB123".to_string();
        filters.estado = "error".to_string();
        filters.sort_key = "patente".to_string();
        filters.sort_dir = SortDir::Asc;

        save_filters(&file, &filters);
        let restored = load_filters(&file).expect("filters restored");
        assert_eq!(restored.query, "AB123");
        assert_eq!(restored.estado, "error");
        assert_eq!(restored.sort_key, "patente");
        assert_eq!(restored.sort_dir, SortDir::Asc);
    }

    #[test]
    fn missing_state_loads_as_none() {
        let temp = TempDir::new().unwrap();
        assert!(load_filters(&state_file(temp.path())).is_none());
    }

    #[test]
    fn garbage_state_loads_as_none() {
        let temp = TempDir::new().unwrap();
        let file = state_file(temp.path());
        file.write("not ron at all {{{").unwrap();
        assert!(load_filters(&file).is_none());
    }
}
