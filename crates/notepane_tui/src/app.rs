//! Interactive application state.
//!
//! # Responsibility
//! - Translate key presses into note service, credential and dispatcher
//!   calls, and keep the widgets in step with the session.
//! - Drive the draw/poll loop.
//!
//! # Invariants
//! - Core errors become footer status text; none ends the loop.
//! - The editor widget and the session buffer hold the same text.
//! - Gateway clients are built and dropped on the interactive thread.

use crate::modal::{Modal, ModalAction};
use crate::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use notepane_core::{
    CredentialStore, FsNoteStore, GatewayConfig, GatewayError, GeminiGateway, NoteService,
    PromptKind, QueryDispatcher, SessionState, StoredKey,
};
use ratatui::backend::Backend;
use ratatui::style::Style;
use ratatui::widgets::ListState;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Duration;
use tui_textarea::TextArea;

const TICK_RATE: Duration = Duration::from_millis(100);
pub const NEW_NOTE_ROW: &str = "New Note (unsaved)";
pub const THINKING: &str = "Thinking...";
const PROMPT_ENABLED_HINT: &str = "Ask Gemini... (Enter to send)";
const PROMPT_DISABLED_HINT: &str = "Press Ctrl+E to enter a Gemini API key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Notes,
    Editor,
    Prompt,
    Response,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Notes => Self::Editor,
            Self::Editor => Self::Prompt,
            Self::Prompt => Self::Response,
            Self::Response => Self::Notes,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Notes => Self::Response,
            Self::Editor => Self::Notes,
            Self::Prompt => Self::Editor,
            Self::Response => Self::Prompt,
        }
    }
}

pub struct App {
    notes: NoteService<FsNoteStore>,
    credentials: CredentialStore,
    gateway_config: GatewayConfig,
    dispatcher: QueryDispatcher,
    pub(crate) note_names: Vec<String>,
    pub(crate) list_state: ListState,
    pub(crate) editor: TextArea<'static>,
    pub(crate) prompt: TextArea<'static>,
    pub(crate) modal: Option<Modal>,
    response: String,
    pub(crate) response_scroll: u16,
    focus: Focus,
    status: String,
    key_prompt_on_start: bool,
    quit_armed: bool,
    should_quit: bool,
}

impl App {
    pub fn new(
        notes: NoteService<FsNoteStore>,
        credentials: CredentialStore,
        gateway_config: GatewayConfig,
        dispatcher: QueryDispatcher,
    ) -> Self {
        let mut app = Self {
            notes,
            credentials,
            gateway_config,
            dispatcher,
            note_names: Vec::new(),
            list_state: ListState::default(),
            editor: editor_for(""),
            prompt: single_line(""),
            modal: None,
            response: String::new(),
            response_scroll: 0,
            focus: Focus::Notes,
            status: String::new(),
            key_prompt_on_start: false,
            quit_armed: false,
            should_quit: false,
        };
        app.refresh_prompt_hint();
        app
    }

    /// Loads the note list and settles the API key state.
    pub fn start(&mut self) {
        self.refresh_notes();
        match self.credentials.inspect() {
            Ok(StoredKey::Present(key)) => match self.install_gateway(&key) {
                Ok(()) => self.status = "Gemini API key loaded.".to_string(),
                Err(err) => self.status = err.to_string(),
            },
            Ok(StoredKey::Blank) => {
                if let Err(err) = self.credentials.forget() {
                    warn!(
                        "event=credential_forget module=app status=error error={}",
                        err
                    );
                }
                self.disable_gateway();
                self.status = "API key file was empty. Press Ctrl+E to enter a new key.".to_string();
            }
            Ok(StoredKey::Absent) => {
                self.key_prompt_on_start = true;
                self.modal = Some(Modal::new(PromptKind::ApiKey));
            }
            Err(err) => {
                self.disable_gateway();
                self.status = err.to_string();
            }
        }
        info!(
            "event=app_ready module=app status=ok notes={} ai_enabled={}",
            self.note_names.len(),
            self.dispatcher.is_enabled()
        );
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            self.on_tick();
        }
        info!("event=app_exit module=app status=ok");
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(modal) = self.modal.as_mut() {
            let action = modal.handle_key(key);
            self.resolve_modal(action);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !(ctrl && key.code == KeyCode::Char('q')) {
            self.quit_armed = false;
        }
        if ctrl {
            match key.code {
                KeyCode::Char('q') => return self.request_quit(),
                KeyCode::Char('s') => return self.save(),
                KeyCode::Char('d') => return self.delete_highlighted(),
                KeyCode::Char('r') => return self.open_rename(),
                KeyCode::Char('e') => {
                    self.modal = Some(Modal::new(PromptKind::ApiKey));
                    return;
                }
                KeyCode::Char('f') => return self.forget_key(),
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ => match self.focus {
                Focus::Notes => self.handle_notes_key(key),
                Focus::Editor => self.handle_editor_key(key),
                Focus::Prompt => self.handle_prompt_key(key),
                Focus::Response => self.handle_response_key(key),
            },
        }
    }

    /// Picks up a finished query, if any.
    pub fn on_tick(&mut self) {
        let Some(outcome) = self.dispatcher.poll() else {
            return;
        };
        self.response_scroll = 0;
        match outcome.result {
            Ok(answer) => {
                self.response = answer;
                self.focus = Focus::Response;
            }
            Err(err) => self.response = format!("Error: {err}"),
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        let rows = self.note_names.len() + 1;
        let selected = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state.select(Some((selected + 1).min(rows - 1)));
            }
            KeyCode::Home => self.list_state.select(Some(0)),
            KeyCode::End => self.list_state.select(Some(rows - 1)),
            KeyCode::Enter => self.open_highlighted(),
            KeyCode::Char('n') => self.new_note(),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.focus = Focus::Notes;
            return;
        }
        if self.editor.input(key) {
            self.notes.edit(self.editor.lines().join("\n"));
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Notes,
            _ if !self.dispatcher.is_enabled() => {
                self.status = GatewayError::CredentialMissing.to_string();
            }
            KeyCode::Enter => self.submit_query(),
            _ => {
                self.prompt.input(key);
            }
        }
    }

    fn handle_response_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.response_scroll = self.response_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.response_scroll = self.response_scroll.saturating_add(1);
            }
            KeyCode::PageUp => self.response_scroll = self.response_scroll.saturating_sub(10),
            KeyCode::PageDown => self.response_scroll = self.response_scroll.saturating_add(10),
            KeyCode::Home => self.response_scroll = 0,
            KeyCode::Esc => self.focus = Focus::Notes,
            _ => {}
        }
    }

    fn new_note(&mut self) {
        self.notes.new_note();
        self.editor = editor_for("");
        self.list_state.select(Some(0));
        self.focus = Focus::Editor;
    }

    fn open_highlighted(&mut self) {
        let Some(name) = self.highlighted_note().map(str::to_string) else {
            return self.new_note();
        };
        match self.notes.open_note(&name) {
            Ok(note) => {
                self.editor = editor_for(&note.content);
                self.focus = Focus::Editor;
            }
            Err(err) => {
                self.status = err.to_string();
                self.refresh_notes();
            }
        }
    }

    fn save(&mut self) {
        let report = self.notes.request_save();
        self.status = report.message;
        if report.ok {
            self.refresh_notes();
        }
    }

    fn delete_highlighted(&mut self) {
        let Some(name) = self.highlighted_note().map(str::to_string) else {
            self.status = "Highlight a saved note to delete it.".to_string();
            return;
        };
        let was_open = self.notes.session().current_note() == Some(name.as_str());
        let report = self.notes.request_delete(&name);
        self.status = report.message;
        if report.ok && was_open {
            self.editor = editor_for("");
        }
        self.refresh_notes();
    }

    fn open_rename(&mut self) {
        match self.notes.session().current_note() {
            Some(current) => {
                self.modal = Some(Modal::new(PromptKind::RenameNote {
                    current: current.to_string(),
                }));
            }
            None => self.status = "Open a saved note to rename it.".to_string(),
        }
    }

    fn resolve_modal(&mut self, action: ModalAction) {
        let value = match action {
            ModalAction::Pending => return,
            ModalAction::Submit(value) => Some(value),
            ModalAction::Cancel => None,
        };
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal.kind() {
            PromptKind::ApiKey => self.resolve_key_prompt(value),
            PromptKind::RenameNote { .. } => {
                if let Some(report) = self.notes.request_rename(value.as_deref()) {
                    self.status = report.message;
                    if report.ok {
                        self.refresh_notes();
                    }
                }
            }
        }
        self.key_prompt_on_start = false;
    }

    fn resolve_key_prompt(&mut self, value: Option<String>) {
        let Some(value) = value.filter(|key| !key.trim().is_empty()) else {
            let message = if self.key_prompt_on_start {
                "API key not provided. Gemini features disabled. Press Ctrl+E to enter one."
            } else {
                "API key entry cancelled."
            };
            self.status = message.to_string();
            return;
        };
        let key = match self.credentials.save(&value) {
            Ok(key) => key,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        match self.install_gateway(&key) {
            Ok(()) => self.status = "Gemini API key saved and loaded.".to_string(),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn forget_key(&mut self) {
        match self.credentials.forget() {
            Ok(()) => {
                self.disable_gateway();
                self.status = "API key forgotten. Press Ctrl+E to re-enable.".to_string();
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn install_gateway(&mut self, key: &str) -> Result<(), GatewayError> {
        let gateway = GeminiGateway::new(&self.gateway_config, key)?;
        self.dispatcher.set_gateway(Some(Arc::new(gateway)));
        self.response = "Gemini features enabled. Ask a question!".to_string();
        self.refresh_prompt_hint();
        Ok(())
    }

    fn disable_gateway(&mut self) {
        self.dispatcher.set_gateway(None);
        self.response = "Gemini features disabled.".to_string();
        self.refresh_prompt_hint();
    }

    fn submit_query(&mut self) {
        let prompt = self.prompt.lines().join("\n");
        match self.dispatcher.submit(&prompt) {
            Ok(Some(_)) => {
                self.response = THINKING.to_string();
                self.response_scroll = 0;
            }
            Ok(None) => {}
            Err(err) => self.status = err.to_string(),
        }
    }

    fn request_quit(&mut self) {
        if self.notes.session().is_dirty() && !self.quit_armed {
            self.quit_armed = true;
            self.status = "Unsaved changes. Press Ctrl+Q again to quit.".to_string();
            return;
        }
        self.should_quit = true;
    }

    /// Re-reads the store and highlights the open note.
    fn refresh_notes(&mut self) {
        match self.notes.list_notes() {
            Ok(names) => self.note_names = names,
            Err(err) => {
                self.note_names.clear();
                self.status = err.to_string();
            }
        }
        let open_row = self.notes.session().current_note().and_then(|current| {
            self.note_names
                .iter()
                .position(|name| name == current)
                .map(|index| index + 1)
        });
        let row = open_row.unwrap_or_else(|| {
            self.list_state
                .selected()
                .unwrap_or(0)
                .min(self.note_names.len())
        });
        self.list_state.select(Some(row));
    }

    fn refresh_prompt_hint(&mut self) {
        let hint = if self.dispatcher.is_enabled() {
            PROMPT_ENABLED_HINT
        } else {
            PROMPT_DISABLED_HINT
        };
        self.prompt.set_placeholder_text(hint);
    }

    /// Name on the highlighted row; `None` for the new-note row.
    pub fn highlighted_note(&self) -> Option<&str> {
        let row = self.list_state.selected()?;
        row.checked_sub(1)
            .and_then(|index| self.note_names.get(index))
            .map(String::as_str)
    }

    pub fn editor_title(&self) -> String {
        let session = self.notes.session();
        let mut title = match session.state() {
            SessionState::Empty => "Editor".to_string(),
            SessionState::EditingNew => "Editor: new note".to_string(),
            SessionState::EditingExisting { name } => format!("Editor: {name}"),
        };
        if session.is_dirty() {
            title.push_str(" *");
        }
        title
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn ai_enabled(&self) -> bool {
        self.dispatcher.is_enabled()
    }

    pub fn query_pending(&self) -> bool {
        self.dispatcher.is_pending()
    }
}

fn editor_for(content: &str) -> TextArea<'static> {
    let mut editor = TextArea::new(content.split('\n').map(str::to_string).collect());
    editor.set_cursor_line_style(Style::default());
    editor
}

fn single_line(content: &str) -> TextArea<'static> {
    let mut input = TextArea::from([content.to_string()]);
    input.set_cursor_line_style(Style::default());
    input
}

#[cfg(test)]
mod tests {
    use super::{App, Focus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use notepane_core::{
        CredentialStore, FsNoteStore, GatewayConfig, NoteService, QueryDispatcher, SessionState,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::runtime::{Builder, Runtime};

    fn runtime() -> Runtime {
        Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .expect("runtime")
    }

    fn app_in(dir: &Path, runtime: &Runtime) -> App {
        let store = FsNoteStore::open(dir.join("notes")).expect("open store");
        App::new(
            NoteService::new(store),
            CredentialStore::new(dir.join(".gemini_api_key")),
            GatewayConfig::default(),
            QueryDispatcher::new(runtime.handle().clone()),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => press(app, KeyCode::Enter),
                c => press(app, KeyCode::Char(c)),
            }
        }
    }

    #[test]
    fn missing_key_opens_modal_and_cancel_disables_ai() {
        let dir = TempDir::new().unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        assert!(app.modal.is_some());
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(!app.ai_enabled());
        assert!(app.status().contains("Gemini features disabled"));
    }

    #[test]
    fn blank_key_file_is_removed_on_start() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join(".gemini_api_key");
        fs::write(&key_path, "  \n").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        assert!(!key_path.exists());
        assert!(app.modal.is_none());
        assert!(!app.ai_enabled());
    }

    #[test]
    fn entering_and_forgetting_key_toggles_ai() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join(".gemini_api_key");
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        type_text(&mut app, "secret-key");
        press(&mut app, KeyCode::Enter);
        assert!(app.ai_enabled());
        assert_eq!(fs::read_to_string(&key_path).unwrap(), "secret-key");

        ctrl(&mut app, 'f');
        assert!(!app.ai_enabled());
        assert!(!key_path.exists());
    }

    #[test]
    fn typing_and_saving_creates_a_note() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gemini_api_key"), "k").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.focus(), Focus::Editor);
        type_text(&mut app, "Groceries\nmilk");
        assert_eq!(app.editor_title(), "Editor: new note *");

        ctrl(&mut app, 's');
        assert_eq!(app.status(), "Note saved: Groceries.txt");
        assert_eq!(app.note_names, vec!["Groceries.txt".to_string()]);
        assert_eq!(app.highlighted_note(), Some("Groceries.txt"));
        assert_eq!(app.editor_title(), "Editor: Groceries.txt");
        assert_eq!(
            fs::read_to_string(dir.path().join("notes/Groceries.txt")).unwrap(),
            "Groceries\nmilk"
        );
    }

    #[test]
    fn empty_buffer_is_not_saved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gemini_api_key"), "k").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        ctrl(&mut app, 's');
        assert_eq!(app.status(), "Cannot save an empty note.");
        assert!(app.note_names.is_empty());
    }

    #[test]
    fn deleting_open_note_clears_editor() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/a.txt"), "a\nbody").unwrap();
        fs::write(dir.path().join(".gemini_api_key"), "k").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.editor.lines().join("\n"), "a\nbody");

        ctrl(&mut app, 'd');
        assert_eq!(app.status(), "Note 'a.txt' deleted.");
        assert!(app.note_names.is_empty());
        assert_eq!(app.editor.lines().join("\n"), "");
        assert_eq!(app.editor_title(), "Editor");
    }

    #[test]
    fn rename_goes_through_prefilled_modal() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes/old.txt"), "old").unwrap();
        fs::write(dir.path().join(".gemini_api_key"), "k").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'r');
        assert!(app.modal.is_some());
        for _ in 0.."old.txt".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "new");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.status(), "Note renamed to: new.txt");
        assert_eq!(app.note_names, vec!["new.txt".to_string()]);
        assert_eq!(app.highlighted_note(), Some("new.txt"));
        assert!(matches!(
            app.notes.session().state(),
            SessionState::EditingExisting { name } if name == "new.txt"
        ));
    }

    #[test]
    fn quit_with_unsaved_changes_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gemini_api_key"), "k").unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "draft");
        ctrl(&mut app, 'q');
        assert!(!app.should_quit);
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }

    #[test]
    fn prompt_is_inert_without_key() {
        let dir = TempDir::new().unwrap();
        let rt = runtime();
        let mut app = app_in(dir.path(), &rt);
        app.start();
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Prompt);
        type_text(&mut app, "hello");
        assert_eq!(app.prompt.lines().join(""), "");
        assert!(app.status().contains("Ctrl+E"));
    }
}
