use std::sync::Once;

use tablero_core::{
    update, AppState, Effect, Msg, RowStub, SelectAllState, TableKind, TableSnapshot, TallerChoice,
    LONG_ERROR_NOTICE_MS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn filled_form(state: AppState) -> AppState {
    let (state, _) = update(
        state,
        Msg::TallerSelected {
            value: "7".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::PlateEdited {
            value: "ab 123 cd".to_string(),
            cursor: 9,
        },
    );
    state
}

fn submit(state: AppState) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::CreateSubmitted {
            issued_ms: 1_700_000_000_000,
            date_label: "05/08/26".to_string(),
        },
    )
}

fn server_row(id: i64) -> RowStub {
    RowStub {
        id: Some(id),
        patente: "AB123CD".to_string(),
        estado: "en proceso".to_string(),
        pending: true,
        ..RowStub::default()
    }
}

#[test]
fn submit_prepends_disabled_placeholder_before_any_response() {
    init_logging();
    let state = filled_form(AppState::default());
    let (state, effects) = submit(state);

    let view = state.view();
    assert_eq!(view.rows.len(), 1);
    let row = &view.rows[0];
    assert!(row.placeholder);
    assert!(!row.selectable);
    assert_eq!(row.estado, "en proceso");
    assert_eq!(row.patente, "AB123CD");
    assert_eq!(row.fecha, "05/08/26");

    assert_eq!(
        effects,
        vec![Effect::SubmitCreate {
            placeholder: "pending-1700000000000".to_string(),
            patente: "AB123CD".to_string(),
            taller: TallerChoice::Existing {
                id: "7".to_string()
            },
        }]
    );
}

#[test]
fn submit_is_refused_until_plate_and_taller_are_set() {
    init_logging();
    let (state, effects) = submit(AppState::default());
    assert!(effects.is_empty());
    assert!(state.view().rows.is_empty());
}

#[test]
fn success_swaps_placeholder_for_the_confirmed_row() {
    init_logging();
    let state = filled_form(AppState::default());
    let (state, _) = submit(state);

    let (state, _) = update(
        state,
        Msg::CreateCompleted {
            placeholder: "pending-1700000000000".to_string(),
            row: Some(server_row(42)),
            taller: None,
        },
    );

    let view = state.view();
    let with_id: Vec<_> = view.rows.iter().filter(|row| row.id == Some(42)).collect();
    assert_eq!(with_id.len(), 1);
    assert!(!view.rows.iter().any(|row| row.placeholder));
    // The plate input resets for the next submission.
    assert_eq!(view.form.patente, "");
}

#[test]
fn success_after_refresh_purged_the_placeholder_prepends() {
    init_logging();
    let state = filled_form(AppState::default());
    let (state, _) = submit(state);

    // A refresh lands first and wipes the placeholder.
    let (state, _) = update(
        state,
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                rows: vec![server_row(1)],
                has_pending: false,
                ..TableSnapshot::default()
            },
        },
    );
    assert!(!state.view().rows.iter().any(|row| row.placeholder));

    let (state, _) = update(
        state,
        Msg::CreateCompleted {
            placeholder: "pending-1700000000000".to_string(),
            row: Some(server_row(42)),
            taller: None,
        },
    );
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].id, Some(42));
}

#[test]
fn failure_rolls_back_and_surfaces_one_notice() {
    init_logging();
    let state = filled_form(AppState::default());
    let (state, _) = submit(state);

    let (state, effects) = update(
        state,
        Msg::CreateFailed {
            placeholder: "pending-1700000000000".to_string(),
            message: "Formato de patente invalido.".to_string(),
        },
    );

    let view = state.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.notices.len(), 1);
    // Plate-format errors linger longer.
    assert_eq!(view.notices[0].duration_ms, LONG_ERROR_NOTICE_MS);
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::ArmNotice { .. })));
}

#[test]
fn select_all_skips_placeholder_rows() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                rows: vec![
                    RowStub {
                        id: Some(1),
                        selectable: true,
                        ..RowStub::default()
                    },
                    RowStub {
                        id: Some(2),
                        selectable: true,
                        ..RowStub::default()
                    },
                    RowStub {
                        id: Some(3),
                        selectable: true,
                        ..RowStub::default()
                    },
                ],
                ..TableSnapshot::default()
            },
        },
    );
    let state = filled_form(state);
    let (state, _) = submit(state);

    let (state, _) = update(state, Msg::SelectAllToggled { checked: true });
    let view = state.view();
    assert_eq!(view.selected_ids, vec![1, 2, 3]);
    assert_eq!(view.select_all, SelectAllState::Checked);

    let (state, _) = update(state, Msg::SelectAllToggled { checked: false });
    let view = state.view();
    assert!(view.selected_ids.is_empty());
    assert_eq!(view.select_all, SelectAllState::Unchecked);
}

#[test]
fn retry_marks_the_row_pending_until_the_server_answers() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                rows: vec![RowStub {
                    id: Some(8),
                    estado: "error".to_string(),
                    resultado: "fallo".to_string(),
                    selectable: true,
                    ..RowStub::default()
                }],
                ..TableSnapshot::default()
            },
        },
    );

    let (state, effects) = update(state, Msg::RetrySubmitted { id: 8 });
    assert_eq!(effects, vec![Effect::PostRetry { id: 8 }]);
    let row = &state.view().rows[0];
    assert!(row.pending);
    assert_eq!(row.estado, "en proceso");
    assert_eq!(row.resultado, "-");

    let (state, effects) = update(
        state,
        Msg::RetryFailed {
            id: 8,
            message: "Error al reintentar.".to_string(),
        },
    );
    assert!(!state.view().rows[0].pending);
    assert_eq!(state.view().notices.len(), 1);
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::ArmNotice { .. })));
}
