/// Reported phase of the server-side automation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    None,
    Running,
    Active,
    Cooldown,
    /// The server reports this when its own status store is unreachable.
    Unknown,
}

/// Last payload fetched from the session-status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionPayload {
    pub phase: SessionPhase,
    pub active_until: Option<i64>,
    pub cooldown_until: Option<i64>,
}

/// Banner state: the last fetched payload plus the last observed clock.
///
/// The countdown ticks every second from the stored payload; the network
/// is only touched on the slower poll interval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub(crate) last: Option<SessionPayload>,
    pub(crate) now: i64,
}

impl SessionStatus {
    pub fn banner(&self) -> Option<String> {
        self.last
            .as_ref()
            .and_then(|payload| banner_text(payload, self.now))
    }
}

/// "MM:SS", clamped to 00:00 for non-positive remainders.
pub fn format_countdown(total_seconds: i64) -> String {
    if total_seconds <= 0 {
        return "00:00".to_string();
    }
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// One of three mutually exclusive messages, or `None` to hide the banner.
pub fn banner_text(payload: &SessionPayload, now: i64) -> Option<String> {
    match payload.phase {
        SessionPhase::Running => Some("Sesión activa: procesando consulta.".to_string()),
        SessionPhase::Active => {
            let remaining = payload.active_until.unwrap_or(0) - now;
            (remaining > 0).then(|| {
                format!("Sesión activa (cierra en {}).", format_countdown(remaining))
            })
        }
        SessionPhase::Cooldown => {
            let remaining = payload.cooldown_until.unwrap_or(0) - now;
            (remaining > 0).then(|| {
                format!(
                    "Espera de inactividad (reanuda en {}).",
                    format_countdown(remaining)
                )
            })
        }
        SessionPhase::None | SessionPhase::Unknown => None,
    }
}
