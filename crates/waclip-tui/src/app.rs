use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use waclip_config::Settings;

use crate::actions::{Action, SettingToggle, INTERVAL_STEP_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    EditingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub failure: bool,
}

#[derive(Debug, Clone)]
pub struct App {
    pub mode: Mode,
    pub show_help: bool,
    pub should_quit: bool,
    /// Message as currently typed; may differ from the saved default.
    pub message: String,
    pub saved_message: String,
    pub running: bool,
    pub seen_count: usize,
    pub settings: Settings,
    pub log: Vec<LogEntry>,
    /// Lines scrolled back from the newest entry; 0 follows the tail.
    pub log_offset: usize,
    pub status: Option<String>,
    pub error: Option<String>,
    actions: VecDeque<Action>,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: Mode::Normal,
            show_help: false,
            should_quit: false,
            message: settings.default_message.clone(),
            saved_message: settings.default_message.clone(),
            running: false,
            seen_count: 0,
            settings: settings.clone(),
            log: Vec::new(),
            log_offset: 0,
            status: None,
            error: None,
            actions: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn message_is_unsaved(&self) -> bool {
        self.message.trim() != self.saved_message.trim()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        ) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::EditingMessage => self.handle_message_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('s') => {
                let action = if self.running {
                    Action::StopMonitoring
                } else {
                    Action::StartMonitoring
                };
                self.enqueue(action);
            }
            KeyCode::Char('x') => self.enqueue(Action::ClearDuplicates),
            KeyCode::Char('e') => self.mode = Mode::EditingMessage,
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                self.enqueue(Action::Toggle(SettingToggle::ALL[index]));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.enqueue(Action::AdjustInterval(INTERVAL_STEP_SECS))
            }
            KeyCode::Char('-') => self.enqueue(Action::AdjustInterval(-INTERVAL_STEP_SECS)),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_log(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_log(-1),
            KeyCode::PageUp => self.scroll_log(10),
            KeyCode::PageDown => self.scroll_log(-10),
            KeyCode::Home | KeyCode::Char('g') => self.log_offset = self.log.len().saturating_sub(1),
            KeyCode::End | KeyCode::Char('G') => self.log_offset = 0,
            _ => {}
        }
    }

    fn handle_message_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.enqueue(Action::SaveMessage(self.message.clone()));
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            _ => {
                let previous = self.message.clone();
                apply_text_input(&mut self.message, key);
                if self.message != previous {
                    self.enqueue(Action::UseMessage(self.message.clone()));
                }
            }
        }
    }

    fn scroll_log(&mut self, delta: i32) {
        let max = self.log.len().saturating_sub(1);
        let next = if delta >= 0 {
            self.log_offset.saturating_add(delta as usize)
        } else {
            self.log_offset.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.log_offset = next.min(max);
    }
}

fn apply_text_input(target: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                target.push(ch);
            }
        }
        KeyCode::Backspace => {
            target.pop();
        }
        _ => {}
    }
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(|ch: char| ch.is_whitespace()) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::{App, LogEntry, Mode};
    use crate::actions::{Action, SettingToggle};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use waclip_config::Settings;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn drain(app: &mut App) -> Vec<Action> {
        std::iter::from_fn(|| app.next_action()).collect()
    }

    #[test]
    fn s_starts_or_stops_depending_on_state() {
        let mut app = App::new(&Settings::default());
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(drain(&mut app), vec![Action::StartMonitoring]);

        app.running = true;
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(drain(&mut app), vec![Action::StopMonitoring]);
    }

    #[test]
    fn digits_toggle_settings_in_order() {
        let mut app = App::new(&Settings::default());
        for code in ['1', '4', '5', '9'] {
            press(&mut app, KeyCode::Char(code));
        }
        assert_eq!(
            drain(&mut app),
            vec![
                Action::Toggle(SettingToggle::NumbersOnly),
                Action::Toggle(SettingToggle::DesktopApp),
                Action::Toggle(SettingToggle::AutoStart),
            ]
        );
    }

    #[test]
    fn editing_message_overrides_live_and_saves_on_enter() {
        let mut app = App::new(&Settings::default());
        app.message.clear();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::EditingMessage);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('!'));
        assert!(!app.should_quit);
        assert_eq!(app.message, "q!");
        assert!(app.message_is_unsaved());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(
            drain(&mut app),
            vec![
                Action::UseMessage("q".to_string()),
                Action::UseMessage("q!".to_string()),
                Action::SaveMessage("q!".to_string()),
            ]
        );
    }

    #[test]
    fn escape_leaves_edit_mode_without_saving() {
        let mut app = App::new(&Settings::default());
        press(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.message.is_empty());
        assert_eq!(drain(&mut app), vec![Action::UseMessage(String::new())]);
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut app = App::new(&Settings::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::new(&Settings::default());
        press(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn log_scroll_is_bounded() {
        let mut app = App::new(&Settings::default());
        app.log = (0..3)
            .map(|index| LogEntry {
                text: format!("line {index}"),
                failure: false,
            })
            .collect();

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.log_offset, 2);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.log_offset, 1);

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.log_offset, 0);
    }
}
