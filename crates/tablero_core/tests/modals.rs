use std::sync::Once;

use tablero_core::{
    update, AppState, Effect, ModalView, Msg, RowStub, TableKind, TableSnapshot, TallerRef,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn with_rows(ids: &[i64]) -> AppState {
    let rows = ids
        .iter()
        .map(|id| RowStub {
            id: Some(*id),
            selectable: true,
            taller: Some(TallerRef::new("3", "Taller Norte")),
            ..RowStub::default()
        })
        .collect();
    update(
        AppState::default(),
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                rows,
                ..TableSnapshot::default()
            },
        },
    )
    .0
}

fn select(state: AppState, ids: &[i64]) -> AppState {
    ids.iter().fold(state, |state, id| {
        update(state, Msg::RowToggled { id: *id, checked: true }).0
    })
}

#[test]
fn delete_flow_holds_the_action_until_the_response() {
    init_logging();
    let state = select(with_rows(&[1, 2, 3]), &[1, 3]);

    let (state, effects) = update(state, Msg::DeleteRequested);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().modal,
        Some(ModalView::ConfirmDelete { count: 2 })
    );

    let (state, effects) = update(state, Msg::ModalConfirmed);
    assert_eq!(effects, vec![Effect::PostDelete { ids: vec![1, 3] }]);
    // Still open while the request is in flight.
    assert!(state.view().modal.is_some());

    let (state, effects) = update(state, Msg::DeleteCompleted { deleted: 2 });
    let view = state.view();
    assert_eq!(view.modal, None);
    assert!(view.selected_ids.is_empty());
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, Effect::FetchTable { table: TableKind::Procesos, .. })));
    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].text, "Eliminados: 2");
}

#[test]
fn delete_request_needs_a_selection() {
    init_logging();
    let (state, effects) = update(with_rows(&[1]), Msg::DeleteRequested);
    assert!(effects.is_empty());
    assert_eq!(state.view().modal, None);
}

#[test]
fn a_second_confirmation_cannot_open_over_the_first() {
    init_logging();
    let state = select(with_rows(&[1, 2]), &[1]);
    let (state, _) = update(state, Msg::DeleteRequested);

    let (state, _) = update(
        state,
        Msg::RowTallerPicked {
            id: 2,
            next: TallerRef::new("5", "Taller Sur"),
            prior: TallerRef::new("3", "Taller Norte"),
        },
    );
    // The delete confirmation is still the held action.
    assert_eq!(
        state.view().modal,
        Some(ModalView::ConfirmDelete { count: 1 })
    );
}

#[test]
fn reassign_cancel_reverts_to_the_prior_value() {
    init_logging();
    let state = with_rows(&[1]);
    let (state, _) = update(
        state,
        Msg::RowTallerPicked {
            id: 1,
            next: TallerRef::new("5", "Taller Sur"),
            prior: TallerRef::new("3", "Taller Norte"),
        },
    );
    assert_eq!(
        state.view().modal,
        Some(ModalView::ConfirmTaller {
            message: "Cambiar \"Taller Norte\" por \"Taller Sur\"?".to_string()
        })
    );

    let (state, _) = update(state, Msg::ModalDismissed);
    let view = state.view();
    assert_eq!(view.modal, None);
    // The row still projects the value the server rendered.
    assert_eq!(view.rows[0].taller_label, "Taller Norte");
}

#[test]
fn reassign_confirm_posts_and_success_rewrites_the_row() {
    init_logging();
    let state = with_rows(&[1]);
    let (state, _) = update(
        state,
        Msg::RowTallerPicked {
            id: 1,
            next: TallerRef::new("5", "Taller Sur"),
            prior: TallerRef::new("3", "Taller Norte"),
        },
    );
    let (state, effects) = update(state, Msg::ModalConfirmed);
    assert_eq!(
        effects,
        vec![Effect::PostTaller {
            id: 1,
            taller_id: "5".to_string()
        }]
    );

    let (state, _) = update(
        state,
        Msg::TallerSaved {
            id: 1,
            taller: TallerRef::new("5", "Taller Sur"),
        },
    );
    let view = state.view();
    assert_eq!(view.modal, None);
    assert_eq!(view.rows[0].taller_label, "Taller Sur");
    assert_eq!(view.notices[0].text, "Taller actualizado.");
}

#[test]
fn picking_the_current_taller_is_a_noop() {
    init_logging();
    let state = with_rows(&[1]);
    let (state, effects) = update(
        state,
        Msg::RowTallerPicked {
            id: 1,
            next: TallerRef::new("3", "Taller Norte"),
            prior: TallerRef::new("3", "Taller Norte"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().modal, None);
}

#[test]
fn reassign_failure_reverts_and_notifies() {
    init_logging();
    let state = with_rows(&[1]);
    let (state, _) = update(
        state,
        Msg::RowTallerPicked {
            id: 1,
            next: TallerRef::new("5", "Taller Sur"),
            prior: TallerRef::new("3", "Taller Norte"),
        },
    );
    let (state, _) = update(state, Msg::ModalConfirmed);
    let (state, _) = update(
        state,
        Msg::TallerFailed {
            id: 1,
            message: "No se pudo actualizar el taller.".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.modal, None);
    assert_eq!(view.rows[0].taller_label, "Taller Norte");
    assert_eq!(view.notices.len(), 1);
}

#[test]
fn user_save_confirm_submits_and_closes_immediately() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::UserSaveRequested {
            form: "user-form-9".to_string(),
        },
    );
    assert_eq!(state.view().modal, Some(ModalView::ConfirmUserSave));

    let (state, effects) = update(state, Msg::ModalConfirmed);
    assert_eq!(
        effects,
        vec![Effect::SubmitUserForm {
            form: "user-form-9".to_string()
        }]
    );
    assert_eq!(state.view().modal, None);
}

#[test]
fn repeated_active_toggle_for_the_same_form_is_ignored() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::UserActiveToggleRequested {
            form: "user-form-2".to_string(),
            active: false,
        },
    );
    let before = state.view().modal.clone();
    let (state, effects) = update(
        state,
        Msg::UserActiveToggleRequested {
            form: "user-form-2".to_string(),
            active: false,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().modal, before);
}

#[test]
fn error_detail_modal_shows_the_stored_detail() {
    init_logging();
    let (state, _) = update(
        AppState::default(),
        Msg::RefreshLoaded {
            table: TableKind::Procesos,
            snapshot: TableSnapshot {
                rows: vec![RowStub {
                    id: Some(4),
                    error_detail: Some("Credenciales inválidas".to_string()),
                    ..RowStub::default()
                }],
                ..TableSnapshot::default()
            },
        },
    );
    let (state, _) = update(state, Msg::ErrorDetailOpened { id: 4 });
    assert_eq!(
        state.view().modal,
        Some(ModalView::ErrorDetail {
            detail: "Credenciales inválidas".to_string()
        })
    );
    let (state, _) = update(state, Msg::ErrorDetailClosed);
    assert_eq!(state.view().modal, None);
}
