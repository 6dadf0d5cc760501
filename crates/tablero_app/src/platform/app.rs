use std::collections::HashMap;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use panel_logging::panel_info;
use rand::Rng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tablero_client::{ApiSettings, ClientHandle};
use tablero_core::{
    password_from_bytes, update, AppState, AppViewModel, ChipGroup, CoreConfig, FileEntry,
    ModalView, Msg, PageDirection, RowView, SelectAllState, TextField, PASSWORD_LEN,
};

use super::effects::{now_millis, now_unix, today_label, EffectRunner};
use super::ui::{constants, render};
use super::persistence;

/// Which panel the keyboard drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Panel {
    Procesos,
    Documentos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Plate,
    Query,
    DateFrom,
    DateTo,
    Filename,
    FilePath,
}

impl InputKind {
    pub(crate) fn title(self) -> &'static str {
        match self {
            InputKind::Plate => " Patente ",
            InputKind::Query => " Buscar ",
            InputKind::DateFrom => " Desde (AAAA-MM-DD) ",
            InputKind::DateTo => " Hasta (AAAA-MM-DD) ",
            InputKind::Filename => " Nombre del PDF ",
            InputKind::FilePath => " Ruta de la imagen ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InputPrompt {
    pub(crate) kind: InputKind,
    pub(crate) buffer: String,
}

/// Purely presentational state owned by the terminal loop: focus, cursors
/// and the open text prompt. Everything that the protocol cares about
/// lives in the core state machine.
pub(crate) struct UiState {
    pub(crate) focus: Panel,
    pub(crate) cursor: usize,
    pub(crate) upload_cursor: usize,
    pub(crate) input: Option<InputPrompt>,
    picked_paths: HashMap<String, PathBuf>,
}

impl UiState {
    fn new() -> Self {
        Self {
            focus: Panel::Procesos,
            cursor: 0,
            upload_cursor: 0,
            input: None,
            picked_paths: HashMap::new(),
        }
    }

    fn clamp(&mut self, view: &AppViewModel) {
        let rows = match self.focus {
            Panel::Procesos => view.rows.len(),
            Panel::Documentos => view.docs.rows.len(),
        };
        self.cursor = self.cursor.min(rows.saturating_sub(1));
        self.upload_cursor = self.upload_cursor.min(view.docs.files.len().saturating_sub(1));
    }
}

enum KeyOutcome {
    Quit,
    Dispatch(Vec<Msg>),
    Handled,
}

pub fn run_app() -> anyhow::Result<()> {
    let settings = ApiSettings {
        base_url: std::env::var("TABLERO_URL")
            .unwrap_or_else(|_| ApiSettings::default().base_url),
        login_path: "/login".to_string(),
        csrf_token: std::env::var("TABLERO_CSRF").ok(),
    };
    panel_info!("tablero starting against {}", settings.base_url);

    let client = ClientHandle::new(settings).context("start http client")?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let state_file = persistence::state_file(Path::new("."));
    let runner = EffectRunner::new(client, msg_tx.clone(), state_file);

    spawn_session_tickers(&msg_tx);

    let mut state = AppState::new(CoreConfig::default());
    let mut ui = UiState::new();

    if let Some(filters) = persistence::load_filters(&persistence::state_file(Path::new("."))) {
        dispatch(&mut state, Msg::FiltersRestored { filters }, &runner, &ui);
    }
    dispatch(&mut state, Msg::Started, &runner, &ui);

    let mut terminal = setup_terminal().context("terminal setup")?;
    let result = run_loop(&mut terminal, &mut state, &mut ui, &runner, &msg_rx);
    restore_terminal(&mut terminal);

    if state.view().logged_out {
        eprintln!("Sesion expirada. Inicia sesion nuevamente en el panel web.");
    }
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    ui: &mut UiState,
    runner: &EffectRunner,
    msg_rx: &mpsc::Receiver<Msg>,
) -> anyhow::Result<()> {
    let mut view = state.view();
    terminal.draw(|frame| render::draw(frame, &view, ui))?;

    loop {
        let pending: Vec<Msg> = msg_rx.try_iter().chain(runner.poll_events()).collect();
        for msg in pending {
            dispatch(state, msg, runner, ui);
        }

        if state.consume_dirty() {
            view = state.view();
            ui.clamp(&view);
            terminal.draw(|frame| render::draw(frame, &view, ui))?;
        }
        if view.logged_out {
            return Ok(());
        }

        if event::poll(Duration::from_millis(constants::EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, &view, ui) {
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Dispatch(msgs) => {
                        for msg in msgs {
                            dispatch(state, msg, runner, ui);
                        }
                    }
                    KeyOutcome::Handled => {
                        // Focus or cursor moved; redraw with the same view.
                        ui.clamp(&view);
                        terminal.draw(|frame| render::draw(frame, &view, ui))?;
                    }
                }
            }
        }
    }
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner, ui: &UiState) {
    let current = std::mem::take(state);
    let (next, effects) = update(current, msg);
    *state = next;
    runner.run(effects, &ui.picked_paths);
}

fn spawn_session_tickers(msg_tx: &mpsc::Sender<Msg>) {
    // Slow loop fetches; the fast loop only re-renders the countdown.
    let poll_tx = msg_tx.clone();
    thread::spawn(move || {
        while poll_tx.send(Msg::SessionPollTick).is_ok() {
            thread::sleep(Duration::from_millis(constants::SESSION_POLL_MS));
        }
    });
    let tick_tx = msg_tx.clone();
    thread::spawn(move || {
        while tick_tx.send(Msg::CountdownTick { now: now_unix() }).is_ok() {
            thread::sleep(Duration::from_millis(constants::COUNTDOWN_TICK_MS));
        }
    });
}

fn handle_key(key: KeyEvent, view: &AppViewModel, ui: &mut UiState) -> KeyOutcome {
    if ui.input.is_some() {
        return handle_prompt_key(key, ui);
    }
    if view.form.naming_taller {
        return handle_naming_key(key, view);
    }
    if let Some(modal) = &view.modal {
        return handle_modal_key(key, modal);
    }
    if view.users.create_open {
        return handle_user_create_key(key);
    }

    match key.code {
        KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Tab => {
            ui.focus = match ui.focus {
                Panel::Procesos => Panel::Documentos,
                Panel::Documentos => Panel::Procesos,
            };
            ui.cursor = 0;
            KeyOutcome::Handled
        }
        KeyCode::Up => {
            ui.cursor = ui.cursor.saturating_sub(1);
            KeyOutcome::Handled
        }
        KeyCode::Down => {
            ui.cursor += 1;
            KeyOutcome::Handled
        }
        _ => match ui.focus {
            Panel::Procesos => handle_procesos_key(key, view, ui),
            Panel::Documentos => handle_documentos_key(key, view, ui),
        },
    }
}

fn handle_prompt_key(key: KeyEvent, ui: &mut UiState) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => {
            ui.input = None;
            KeyOutcome::Handled
        }
        KeyCode::Enter => match ui.input.take() {
            Some(prompt) if prompt.kind == InputKind::FilePath => pick_file(&prompt.buffer, ui),
            _ => KeyOutcome::Handled,
        },
        KeyCode::Backspace => {
            if let Some(prompt) = ui.input.as_mut() {
                prompt.buffer.pop();
                return edit_msg(prompt);
            }
            KeyOutcome::Handled
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = ui.input.as_mut() {
                prompt.buffer.push(c);
                return edit_msg(prompt);
            }
            KeyOutcome::Handled
        }
        _ => KeyOutcome::Handled,
    }
}

/// Live-editing prompts dispatch on every keystroke; the core decides what
/// to do with the partial value (normalization, debounce).
fn edit_msg(prompt: &InputPrompt) -> KeyOutcome {
    let value = prompt.buffer.clone();
    let msg = match prompt.kind {
        InputKind::Plate => Msg::PlateEdited {
            cursor: value.chars().count(),
            value,
        },
        InputKind::Query => Msg::TextFilterEdited {
            field: TextField::Query,
            value,
        },
        InputKind::DateFrom => Msg::TextFilterEdited {
            field: TextField::DateFrom,
            value,
        },
        InputKind::DateTo => Msg::TextFilterEdited {
            field: TextField::DateTo,
            value,
        },
        InputKind::Filename => Msg::DocFilenameEdited { value },
        InputKind::FilePath => return KeyOutcome::Handled,
    };
    KeyOutcome::Dispatch(vec![msg])
}

fn pick_file(raw: &str, ui: &mut UiState) -> KeyOutcome {
    let path = PathBuf::from(raw.trim());
    let Ok(meta) = std::fs::metadata(&path) else {
        return KeyOutcome::Dispatch(vec![Msg::PreviewFailed {
            message: format!("No se pudo leer {}.", path.display()),
        }]);
    };
    let modified_ms = meta
        .modified()
        .ok()
        .and_then(|time| time.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    let entry = FileEntry {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.trim().to_string()),
        size: meta.len(),
        modified_ms,
    };
    ui.picked_paths.insert(entry.key(), path);
    KeyOutcome::Dispatch(vec![Msg::FilesPicked { files: vec![entry] }])
}

fn handle_naming_key(key: KeyEvent, view: &AppViewModel) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => KeyOutcome::Dispatch(vec![Msg::NewTallerModalClosed]),
        KeyCode::Enter => KeyOutcome::Dispatch(vec![Msg::NewTallerConfirmed]),
        KeyCode::Backspace => {
            let mut draft = view.form.naming_draft.clone();
            draft.pop();
            KeyOutcome::Dispatch(vec![Msg::NewTallerNameEdited { value: draft }])
        }
        KeyCode::Char(c) => {
            let mut draft = view.form.naming_draft.clone();
            draft.push(c);
            KeyOutcome::Dispatch(vec![Msg::NewTallerNameEdited { value: draft }])
        }
        _ => KeyOutcome::Handled,
    }
}

fn handle_modal_key(key: KeyEvent, modal: &ModalView) -> KeyOutcome {
    let is_detail = matches!(modal, ModalView::ErrorDetail { .. });
    match key.code {
        KeyCode::Enter if is_detail => KeyOutcome::Dispatch(vec![Msg::ErrorDetailClosed]),
        KeyCode::Esc if is_detail => KeyOutcome::Dispatch(vec![Msg::ErrorDetailClosed]),
        KeyCode::Enter => KeyOutcome::Dispatch(vec![Msg::ModalConfirmed]),
        KeyCode::Esc => KeyOutcome::Dispatch(vec![Msg::ModalDismissed]),
        _ => KeyOutcome::Handled,
    }
}

fn handle_user_create_key(key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => KeyOutcome::Dispatch(vec![Msg::UserCreateClosed]),
        KeyCode::Char('g') => {
            let mut bytes = [0u8; PASSWORD_LEN];
            rand::rng().fill(&mut bytes[..]);
            KeyOutcome::Dispatch(vec![Msg::UserPasswordFilled {
                value: password_from_bytes(&bytes),
            }])
        }
        KeyCode::Enter => KeyOutcome::Dispatch(vec![Msg::UserSaveRequested {
            form: "/admin/users/new".to_string(),
        }]),
        _ => KeyOutcome::Handled,
    }
}

fn handle_procesos_key(key: KeyEvent, view: &AppViewModel, ui: &mut UiState) -> KeyOutcome {
    let cursor_row = view.rows.get(ui.cursor);
    match key.code {
        KeyCode::Char(' ') => match cursor_row {
            Some(RowView {
                id: Some(id),
                selectable: true,
                checked,
                ..
            }) => KeyOutcome::Dispatch(vec![Msg::RowToggled {
                id: *id,
                checked: !checked,
            }]),
            _ => KeyOutcome::Handled,
        },
        KeyCode::Char('a') => KeyOutcome::Dispatch(vec![Msg::SelectAllToggled {
            checked: view.select_all != SelectAllState::Checked,
        }]),
        KeyCode::Char('d') => KeyOutcome::Dispatch(vec![Msg::DeleteRequested]),
        KeyCode::Char('r') => match cursor_row.and_then(|row| row.id) {
            Some(id) => KeyOutcome::Dispatch(vec![Msg::RetrySubmitted { id }]),
            None => KeyOutcome::Handled,
        },
        KeyCode::Char('e') => match cursor_row.and_then(|row| row.id) {
            Some(id) => KeyOutcome::Dispatch(vec![Msg::ErrorDetailOpened { id }]),
            None => KeyOutcome::Handled,
        },
        KeyCode::Char('w') => reassign_taller(view, cursor_row),
        KeyCode::Char('/') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::Query,
                buffer: view.filters.query.clone(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('g') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::DateFrom,
                buffer: view.filters.date_from.clone(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('G') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::DateTo,
                buffer: view.filters.date_to.clone(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('E') => chip(ChipGroup::Estado, "error"),
        KeyCode::Char('C') => chip(ChipGroup::Estado, "completado"),
        KeyCode::Char('P') => chip(ChipGroup::Estado, "en proceso"),
        KeyCode::Char('c') => KeyOutcome::Dispatch(vec![Msg::FiltersCleared]),
        KeyCode::Char('f') => KeyOutcome::Dispatch(vec![Msg::SortHeaderClicked {
            key: "fecha".to_string(),
        }]),
        KeyCode::Char('p') => KeyOutcome::Dispatch(vec![Msg::SortHeaderClicked {
            key: "patente".to_string(),
        }]),
        KeyCode::Char('[') => KeyOutcome::Dispatch(vec![Msg::PageRequested {
            direction: PageDirection::Prev,
        }]),
        KeyCode::Char(']') => KeyOutcome::Dispatch(vec![Msg::PageRequested {
            direction: PageDirection::Next,
        }]),
        KeyCode::Char('n') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::Plate,
                buffer: view.form.patente.clone(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('t') => cycle_form_taller(view),
        KeyCode::Char('T') => KeyOutcome::Dispatch(vec![Msg::NewTallerModalOpened]),
        KeyCode::Char('s') => KeyOutcome::Dispatch(vec![Msg::CreateSubmitted {
            issued_ms: now_millis(),
            date_label: today_label(),
        }]),
        KeyCode::Char('U') => KeyOutcome::Dispatch(vec![Msg::UserCreateOpened]),
        _ => KeyOutcome::Handled,
    }
}

fn chip(group: ChipGroup, value: &str) -> KeyOutcome {
    KeyOutcome::Dispatch(vec![Msg::ChipToggled {
        group,
        value: value.to_string(),
    }])
}

/// Cycle the creation form's workshop through the known options.
fn cycle_form_taller(view: &AppViewModel) -> KeyOutcome {
    if view.form.taller_options.is_empty() {
        return KeyOutcome::Handled;
    }
    let current = view
        .form
        .taller_options
        .iter()
        .position(|option| option.id == view.form.taller_value);
    let next = match current {
        Some(index) => (index + 1) % view.form.taller_options.len(),
        None => 0,
    };
    KeyOutcome::Dispatch(vec![Msg::TallerSelected {
        value: view.form.taller_options[next].id.clone(),
    }])
}

/// Pick the next workshop for the row under the cursor; the confirmation
/// modal holds the change until the user decides.
fn reassign_taller(view: &AppViewModel, cursor_row: Option<&RowView>) -> KeyOutcome {
    let Some(row) = cursor_row else {
        return KeyOutcome::Handled;
    };
    let (Some(id), Some(prior)) = (row.id, row.taller.clone()) else {
        return KeyOutcome::Handled;
    };
    if view.form.taller_options.is_empty() {
        return KeyOutcome::Handled;
    }
    let current = view
        .form
        .taller_options
        .iter()
        .position(|option| option.id == prior.id);
    let next_index = match current {
        Some(index) => (index + 1) % view.form.taller_options.len(),
        None => 0,
    };
    let next = view.form.taller_options[next_index].clone();
    KeyOutcome::Dispatch(vec![Msg::RowTallerPicked { id, next, prior }])
}

fn handle_documentos_key(key: KeyEvent, view: &AppViewModel, ui: &mut UiState) -> KeyOutcome {
    match key.code {
        KeyCode::Left => {
            ui.upload_cursor = ui.upload_cursor.saturating_sub(1);
            KeyOutcome::Handled
        }
        KeyCode::Right => {
            ui.upload_cursor += 1;
            KeyOutcome::Handled
        }
        KeyCode::Char('u') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::FilePath,
                buffer: String::new(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('x') => {
            if view.docs.files.is_empty() {
                KeyOutcome::Handled
            } else {
                KeyOutcome::Dispatch(vec![Msg::FileRemoved {
                    index: ui.upload_cursor,
                }])
            }
        }
        KeyCode::Char('v') => KeyOutcome::Dispatch(vec![Msg::PreviewRequested]),
        KeyCode::Char('m') => {
            ui.input = Some(InputPrompt {
                kind: InputKind::Filename,
                buffer: view.docs.filename.clone(),
            });
            KeyOutcome::Handled
        }
        KeyCode::Char('h') => {
            let next = match view.docs.enhance_mode.as_str() {
                "soft" => "strong",
                "strong" => "none",
                _ => "soft",
            };
            KeyOutcome::Dispatch(vec![Msg::EnhanceModeChanged {
                value: next.to_string(),
            }])
        }
        KeyCode::Char('b') => KeyOutcome::Dispatch(vec![Msg::GenerateRequested]),
        _ => KeyOutcome::Handled,
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}
