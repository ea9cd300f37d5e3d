//! Single-line modal prompt.

use crossterm::event::{KeyCode, KeyEvent};
use notepane_core::PromptKind;
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

const MASK_CHAR: char = '•';

/// What the modal wants after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    Pending,
    Submit(String),
    Cancel,
}

pub struct Modal {
    kind: PromptKind,
    input: TextArea<'static>,
}

impl Modal {
    pub fn new(kind: PromptKind) -> Self {
        let mut input = TextArea::from([kind.initial_value().to_string()]);
        input.set_placeholder_text(kind.placeholder());
        input.set_cursor_line_style(Style::default());
        if kind.is_secret() {
            input.set_mask_char(MASK_CHAR);
        }
        input.move_cursor(CursorMove::End);
        Self { kind, input }
    }

    pub fn kind(&self) -> &PromptKind {
        &self.kind
    }

    pub fn input_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.input
    }

    /// Enter submits, Esc cancels, everything else edits the line.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalAction {
        match key.code {
            KeyCode::Enter => ModalAction::Submit(self.value()),
            KeyCode::Esc => ModalAction::Cancel,
            _ => {
                self.input.input(key);
                ModalAction::Pending
            }
        }
    }

    fn value(&self) -> String {
        self.input.lines().first().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Modal, ModalAction};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use notepane_core::PromptKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn rename_modal_starts_with_current_name() {
        let mut modal = Modal::new(PromptKind::RenameNote {
            current: "a.txt".to_string(),
        });
        modal.handle_key(key(KeyCode::Backspace));
        modal.handle_key(key(KeyCode::Char('m')));
        assert_eq!(
            modal.handle_key(key(KeyCode::Enter)),
            ModalAction::Submit("a.txm".to_string())
        );
    }

    #[test]
    fn escape_cancels() {
        let mut modal = Modal::new(PromptKind::ApiKey);
        modal.handle_key(key(KeyCode::Char('k')));
        assert_eq!(modal.handle_key(key(KeyCode::Esc)), ModalAction::Cancel);
        assert!(modal.kind().is_secret());
    }
}
