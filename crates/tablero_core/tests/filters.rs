use std::sync::Once;

use tablero_core::{
    update, AppState, Effect, Msg, PageDirection, SortDir, TableKind, TableSnapshot, TextField,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn fetch_target(effects: &[Effect]) -> &str {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchTable { target, .. } => Some(target.as_str()),
            _ => None,
        })
        .expect("a fetch effect")
}

#[test]
fn sort_click_flips_direction_on_the_active_key() {
    init_logging();
    let state = AppState::default();
    assert_eq!(state.view().sort_key, "fecha");
    assert_eq!(state.view().sort_dir, SortDir::Desc);

    let (state, effects) = update(
        state,
        Msg::SortHeaderClicked {
            key: "fecha".to_string(),
        },
    );
    assert_eq!(state.view().sort_dir, SortDir::Asc);
    assert!(fetch_target(&effects).contains("sort=fecha&dir=asc"));
}

#[test]
fn sort_click_on_a_new_key_resets_to_descending() {
    init_logging();
    let state = AppState::default();
    let (state, effects) = update(
        state,
        Msg::SortHeaderClicked {
            key: "patente".to_string(),
        },
    );
    assert_eq!(state.view().sort_key, "patente");
    assert_eq!(state.view().sort_dir, SortDir::Desc);
    assert!(fetch_target(&effects).contains("sort=patente&dir=desc"));
}

#[test]
fn text_edits_coalesce_into_one_fetch_after_the_quiet_period() {
    init_logging();
    let state = AppState::default();

    let (state, effects) = update(
        state,
        Msg::TextFilterEdited {
            field: TextField::Query,
            value: "AB".to_string(),
        },
    );
    let first_generation = match effects.as_slice() {
        [Effect::ArmDebounce { generation, .. }] => *generation,
        other => panic!("expected a debounce effect, got {other:?}"),
    };

    let (state, effects) = update(
        state,
        Msg::TextFilterEdited {
            field: TextField::Query,
            value: "AB123".to_string(),
        },
    );
    let second_generation = match effects.as_slice() {
        [Effect::ArmDebounce { generation, .. }] => *generation,
        other => panic!("expected a debounce effect, got {other:?}"),
    };
    assert!(second_generation > first_generation);

    // The stale timer fires first and is ignored.
    let (state, effects) = update(
        state,
        Msg::DebounceFired {
            generation: first_generation,
        },
    );
    assert!(effects.is_empty());

    let (_state, effects) = update(
        state,
        Msg::DebounceFired {
            generation: second_generation,
        },
    );
    assert!(fetch_target(&effects).contains("f_query=AB123"));
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::PersistFilters { .. })));
}

#[test]
fn applying_a_filter_drops_the_page_parameter() {
    init_logging();
    // Land on page 3 first.
    let (state, _) = update(
        AppState::default(),
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                page: Some(3),
                total_pages: Some(5),
                ..TableSnapshot::default()
            },
        },
    );

    let (_state, effects) = update(
        state,
        Msg::SortHeaderClicked {
            key: "patente".to_string(),
        },
    );
    assert!(!fetch_target(&effects).contains("page="));
}

#[test]
fn page_navigation_clamps_and_preserves_filters() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::TextFilterEdited {
            field: TextField::Query,
            value: "AB".to_string(),
        },
    );
    let (state, _) = update(state, Msg::DebounceFired { generation: 1 });
    let (state, _) = update(
        state,
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                page: Some(1),
                total_pages: Some(2),
                ..TableSnapshot::default()
            },
        },
    );

    // Prev from page 1 stays clamped at 1.
    let (state, effects) = update(
        state,
        Msg::PageRequested {
            direction: PageDirection::Prev,
        },
    );
    assert!(fetch_target(&effects).contains("page=1"));

    let (state, effects) = update(
        state,
        Msg::PageRequested {
            direction: PageDirection::Next,
        },
    );
    let target = fetch_target(&effects).to_string();
    assert!(target.contains("page=2"));
    assert!(target.contains("f_query=AB"));

    // The cursor only moves once the server confirms.
    assert_eq!(state.view().pagination.page, 1);
    let (state, _) = update(
        state,
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                page: Some(2),
                total_pages: Some(2),
                ..TableSnapshot::default()
            },
        },
    );
    assert_eq!(state.view().pagination.page, 2);
    assert!(!state.view().pagination.next_enabled);
}

#[test]
fn clear_restores_defaults_and_refetches() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::SortHeaderClicked {
            key: "patente".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::TextFilterEdited {
            field: TextField::DateFrom,
            value: "2026-08-01".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::FiltersCleared);
    let view = state.view();
    assert_eq!(view.sort_key, "fecha");
    assert_eq!(view.sort_dir, SortDir::Desc);
    assert_eq!(view.filters.date_from, "");
    assert!(fetch_target(&effects).contains("sort=fecha&dir=desc"));
    assert!(!fetch_target(&effects).contains("f_date_from"));
}

#[test]
fn dates_are_serialized_only_when_present() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::TextFilterEdited {
            field: TextField::DateTo,
            value: "2026-08-31".to_string(),
        },
    );
    let (_state, effects) = update(state, Msg::DebounceFired { generation: 1 });
    let target = fetch_target(&effects);
    assert!(target.contains("f_date_to=2026-08-31"));
    assert!(!target.contains("f_date_from"));
    assert!(!target.contains("f_query"));
}
