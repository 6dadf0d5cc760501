use std::sync::Once;

use tablero_core::{
    format_countdown, update, AppState, Effect, Msg, SessionPayload, SessionPhase,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

const NOW: i64 = 1_760_000_000;

fn loaded(state: AppState, payload: SessionPayload, now: i64) -> AppState {
    update(state, Msg::SessionStatusLoaded { payload, now }).0
}

#[test]
fn poll_tick_only_fetches() {
    init_logging();
    let (_state, effects) = update(AppState::default(), Msg::SessionPollTick);
    assert_eq!(effects, vec![Effect::FetchSessionStatus]);
}

#[test]
fn active_payload_counts_down_without_a_new_fetch() {
    init_logging();
    let payload = SessionPayload {
        phase: SessionPhase::Active,
        active_until: Some(NOW + 65),
        cooldown_until: None,
    };
    let state = loaded(AppState::default(), payload, NOW);
    assert_eq!(
        state.view().banner.as_deref(),
        Some("Sesión activa (cierra en 01:05).")
    );

    // One second later the same payload re-renders one second lower.
    let (state, effects) = update(state, Msg::CountdownTick { now: NOW + 1 });
    assert!(effects.is_empty());
    assert_eq!(
        state.view().banner.as_deref(),
        Some("Sesión activa (cierra en 01:04).")
    );
}

#[test]
fn running_renders_the_fixed_message() {
    init_logging();
    let payload = SessionPayload {
        phase: SessionPhase::Running,
        active_until: None,
        cooldown_until: None,
    };
    let state = loaded(AppState::default(), payload, NOW);
    assert_eq!(
        state.view().banner.as_deref(),
        Some("Sesión activa: procesando consulta.")
    );
}

#[test]
fn cooldown_renders_until_the_deadline_passes() {
    init_logging();
    let payload = SessionPayload {
        phase: SessionPhase::Cooldown,
        active_until: None,
        cooldown_until: Some(NOW + 90),
    };
    let state = loaded(AppState::default(), payload, NOW);
    assert_eq!(
        state.view().banner.as_deref(),
        Some("Espera de inactividad (reanuda en 01:30).")
    );

    let (state, _) = update(state, Msg::CountdownTick { now: NOW + 91 });
    assert_eq!(state.view().banner, None);
}

#[test]
fn fetch_failure_hides_the_banner_instead_of_going_stale() {
    init_logging();
    let payload = SessionPayload {
        phase: SessionPhase::Active,
        active_until: Some(NOW + 300),
        cooldown_until: None,
    };
    let state = loaded(AppState::default(), payload, NOW);
    assert!(state.view().banner.is_some());

    let (state, _) = update(state, Msg::SessionStatusFailed);
    assert_eq!(state.view().banner, None);
}

#[test]
fn unknown_phase_stays_hidden() {
    init_logging();
    let payload = SessionPayload {
        phase: SessionPhase::Unknown,
        active_until: None,
        cooldown_until: None,
    };
    let state = loaded(AppState::default(), payload, NOW);
    assert_eq!(state.view().banner, None);
}

#[test]
fn countdown_formatting_clamps_at_zero() {
    init_logging();
    assert_eq!(format_countdown(65), "01:05");
    assert_eq!(format_countdown(3600), "60:00");
    assert_eq!(format_countdown(0), "00:00");
    assert_eq!(format_countdown(-5), "00:00");
}
