//! Keyboard handling for the main screen.
//!
//! Open prompts take every key first. Otherwise keys map straight onto
//! session commands for the selected group, roller and field.

use crate::core::constants::HISTORY_JUMP;
use crate::core::{Field, HistoryTarget, Session};
use crate::ui::prompt::TextInput;
use crate::utils::persistence;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::path::{Path, PathBuf};

/// What a file path prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Load,
    SaveAs,
    /// Save-as reached by turning autosave on without a file.
    SaveAsThenAutosave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameTarget {
    Group,
    Roller,
}

/// A command held back until unsaved changes are confirmed away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    New,
    Load,
    Quit,
}

pub enum Prompt {
    Path {
        purpose: PathPurpose,
        input: TextInput,
        error: Option<String>,
    },
    Rename {
        target: RenameTarget,
        input: TextInput,
    },
    Confirm(Pending),
}

/// Selection and overlay state of the terminal UI.
pub struct UiState {
    pub group: usize,
    pub roller: usize,
    pub field: Field,
    pub prompt: Option<Prompt>,
    pub status: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            group: 0,
            roller: 0,
            field: Field::DiceQty,
            prompt: None,
            status: None,
        }
    }

    /// Keeps the selection on an existing group and roller.
    pub fn clamp(&mut self, session: &Session) {
        self.group = self.group.min(session.groups.len().saturating_sub(1));
        let rollers = session
            .groups
            .get(self.group)
            .map_or(0, |g| if g.collapsed { 1 } else { g.rollers.len() });
        self.roller = self.roller.min(rollers.saturating_sub(1));
    }

    fn select_next(&mut self, session: &Session) {
        let Some(group) = session.groups.get(self.group) else {
            return;
        };
        if !group.collapsed && self.roller + 1 < group.rollers.len() {
            self.roller += 1;
        } else if self.group + 1 < session.groups.len() {
            self.group += 1;
            self.roller = 0;
        }
    }

    fn select_prev(&mut self, session: &Session) {
        if self.roller > 0 {
            self.roller -= 1;
        } else if self.group > 0 {
            self.group -= 1;
            self.roller = session
                .groups
                .get(self.group)
                .map_or(0, |g| if g.collapsed { 0 } else { g.rollers.len().saturating_sub(1) });
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}

pub enum InputResult {
    Continue,
    Quit,
}

/// Where the save-as prompt starts: the current file, or the default file
/// in the application directory.
fn suggested_path(session: &Session) -> String {
    session
        .path()
        .map(Path::to_path_buf)
        .or_else(|| persistence::default_save_path().ok())
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn open_path_prompt(ui: &mut UiState, session: &Session, purpose: PathPurpose) {
    ui.prompt = Some(Prompt::Path {
        purpose,
        input: TextInput::with_value(&suggested_path(session)),
        error: None,
    });
}

fn open_rename_prompt(ui: &mut UiState, session: &Session, target: RenameTarget) {
    let Some(group) = session.groups.get(ui.group) else {
        return;
    };
    let current = match target {
        RenameTarget::Group => group.name.as_str(),
        RenameTarget::Roller => match group.rollers.get(ui.roller) {
            Some(roller) => roller.name.as_str(),
            None => return,
        },
    };
    ui.prompt = Some(Prompt::Rename {
        target,
        input: TextInput::with_value(current),
    });
}

/// Runs `pending` now, or asks first when there are unsaved changes.
fn guard(ui: &mut UiState, session: &mut Session, pending: Pending) -> InputResult {
    if session.is_dirty() {
        ui.prompt = Some(Prompt::Confirm(pending));
        InputResult::Continue
    } else {
        proceed(ui, session, pending)
    }
}

fn proceed(ui: &mut UiState, session: &mut Session, pending: Pending) -> InputResult {
    match pending {
        Pending::New => {
            session.reset();
            *ui = UiState::new();
            ui.set_status("New session");
        }
        Pending::Load => open_path_prompt(ui, session, PathPurpose::Load),
        Pending::Quit => return InputResult::Quit,
    }
    InputResult::Continue
}

fn save(ui: &mut UiState, session: &mut Session) {
    if session.path().is_none() {
        open_path_prompt(ui, session, PathPurpose::SaveAs);
        return;
    }
    match session.save() {
        Ok(()) => ui.set_status("Saved"),
        Err(e) => ui.set_status(format!("Save failed: {}", e)),
    }
}

fn toggle_autosave(ui: &mut UiState, session: &mut Session) {
    match session.toggle_autosave() {
        Ok(true) => ui.set_status("Autosave on"),
        Ok(false) => ui.set_status("Autosave off"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            open_path_prompt(ui, session, PathPurpose::SaveAsThenAutosave);
        }
        Err(e) => ui.set_status(format!("Autosave failed: {}", e)),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Main dispatcher for a key press.
pub fn handle_key(key: KeyEvent, session: &mut Session, ui: &mut UiState) -> InputResult {
    if let Some(prompt) = ui.prompt.take() {
        return handle_prompt(key, prompt, session, ui);
    }
    ui.status = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control(key, session, ui);
    }

    let (g, r) = (ui.group, ui.roller);
    match key.code {
        // Selection
        KeyCode::Up => ui.select_prev(session),
        KeyCode::Down => ui.select_next(session),
        KeyCode::Left => ui.field = ui.field.prev(),
        KeyCode::Right => ui.field = ui.field.next(),
        KeyCode::Tab => {
            ui.group = (g + 1).min(session.groups.len().saturating_sub(1));
            ui.roller = 0;
        }
        KeyCode::BackTab => {
            ui.group = g.saturating_sub(1);
            ui.roller = 0;
        }

        // Rolling
        KeyCode::Enter => {
            session.roll_roller(g, r);
        }
        KeyCode::Char('g') => {
            session.roll_group(g);
        }

        // History
        KeyCode::Char('[') => {
            session.navigate(g, HistoryTarget::Offset(-1));
        }
        KeyCode::Char(']') => {
            session.navigate(g, HistoryTarget::Offset(1));
        }
        KeyCode::Char('{') => {
            session.navigate(g, HistoryTarget::Offset(-HISTORY_JUMP));
        }
        KeyCode::Char('}') => {
            session.navigate(g, HistoryTarget::Offset(HISTORY_JUMP));
        }
        KeyCode::Home => {
            session.navigate(g, HistoryTarget::First);
        }
        KeyCode::End => {
            session.navigate(g, HistoryTarget::Last);
        }
        KeyCode::Char('h') => {
            session.clear_history(g);
            ui.set_status("History cleared");
        }

        // Field editing
        KeyCode::Char('+') | KeyCode::Char('=') => {
            session.edit_field(g, r, ui.field, 1);
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            session.edit_field(g, r, ui.field, -1);
        }

        // Rollers
        KeyCode::Char('a') => {
            if let Some(index) = session.add_roller(g, r, false) {
                ui.roller = index;
            }
        }
        KeyCode::Char('c') => {
            if let Some(index) = session.add_roller(g, r, true) {
                ui.roller = index;
            }
        }
        KeyCode::Char('x') => {
            if !session.remove_roller(g, r) {
                ui.set_status("A group needs at least one roller");
            }
        }
        KeyCode::Char('K') => {
            if let Some(index) = session.move_roller(g, r, -1) {
                ui.roller = index;
            }
        }
        KeyCode::Char('J') => {
            if let Some(index) = session.move_roller(g, r, 1) {
                ui.roller = index;
            }
        }
        KeyCode::Char('r') => open_rename_prompt(ui, session, RenameTarget::Roller),

        // Groups
        KeyCode::Char('A') => {
            if let Some(index) = session.add_group(g, false) {
                ui.group = index;
                ui.roller = 0;
            }
        }
        KeyCode::Char('C') => {
            if let Some(index) = session.add_group(g, true) {
                ui.group = index;
                ui.roller = 0;
            }
        }
        KeyCode::Char('X') => {
            if !session.remove_group(g) {
                ui.set_status("The last group cannot be removed");
            }
        }
        KeyCode::PageUp => {
            if let Some(index) = session.move_group(g, -1) {
                ui.group = index;
            }
        }
        KeyCode::PageDown => {
            if let Some(index) = session.move_group(g, 1) {
                ui.group = index;
            }
        }
        KeyCode::Char('R') => open_rename_prompt(ui, session, RenameTarget::Group),
        KeyCode::Char('z') => {
            session.toggle_collapse(g);
            ui.roller = 0;
        }

        // Toggles
        KeyCode::F(2) => {
            let on = session.toggle_random_org();
            ui.set_status(format!("random.org {}", on_off(on)));
        }
        KeyCode::F(3) => {
            let on = session.toggle_allow_odd();
            ui.set_status(format!("Odd dice {}", if on { "allowed" } else { "rounded down" }));
        }
        KeyCode::F(4) => {
            let on = session.toggle_always_on_top();
            ui.set_status(format!("Always on top {}", on_off(on)));
        }
        KeyCode::F(5) => toggle_autosave(ui, session),

        KeyCode::Char('q') | KeyCode::Esc => return guard(ui, session, Pending::Quit),
        _ => {}
    }

    ui.clamp(session);
    InputResult::Continue
}

fn handle_control(key: KeyEvent, session: &mut Session, ui: &mut UiState) -> InputResult {
    match key.code {
        KeyCode::Char('n') => return guard(ui, session, Pending::New),
        KeyCode::Char('d') => return guard(ui, session, Pending::Load),
        KeyCode::Char('s') => save(ui, session),
        KeyCode::Char('e') => open_path_prompt(ui, session, PathPurpose::SaveAs),
        KeyCode::Char('r') => {
            let label = session.last_action().map(|a| a.describe());
            match label {
                Some(label) if session.repeat_last_action() => {
                    ui.set_status(format!("Repeated: {}", label));
                }
                _ => ui.set_status("Nothing to repeat"),
            }
        }
        KeyCode::Char('c') => return guard(ui, session, Pending::Quit),
        _ => {}
    }
    ui.clamp(session);
    InputResult::Continue
}

fn handle_prompt(key: KeyEvent, prompt: Prompt, session: &mut Session, ui: &mut UiState) -> InputResult {
    match prompt {
        Prompt::Confirm(pending) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => proceed(ui, session, pending),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => InputResult::Continue,
            _ => {
                ui.prompt = Some(Prompt::Confirm(pending));
                InputResult::Continue
            }
        },
        Prompt::Rename { target, mut input } => {
            if key.code == KeyCode::Enter {
                let name = input.trimmed();
                if !name.is_empty() {
                    match target {
                        RenameTarget::Group => session.rename_group(ui.group, name),
                        RenameTarget::Roller => session.rename_roller(ui.group, ui.roller, name),
                    };
                }
                return InputResult::Continue;
            }
            if key.code != KeyCode::Esc {
                edit_text(&mut input, key);
                ui.prompt = Some(Prompt::Rename { target, input });
            }
            InputResult::Continue
        }
        Prompt::Path {
            purpose,
            mut input,
            error,
        } => {
            if key.code == KeyCode::Enter {
                if let Err(e) = submit_path(purpose, input.trimmed(), session, ui) {
                    ui.prompt = Some(Prompt::Path {
                        purpose,
                        input,
                        error: Some(e.to_string()),
                    });
                }
                return InputResult::Continue;
            }
            if key.code != KeyCode::Esc {
                edit_text(&mut input, key);
                ui.prompt = Some(Prompt::Path {
                    purpose,
                    input,
                    error,
                });
            }
            InputResult::Continue
        }
    }
}

fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => input.handle_char_input(c),
        KeyCode::Backspace => input.handle_backspace(),
        KeyCode::Delete => input.handle_delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

fn submit_path(purpose: PathPurpose, typed: &str, session: &mut Session, ui: &mut UiState) -> io::Result<()> {
    let base = session
        .path()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .map_or_else(persistence::app_dir, Ok)?;
    let path: PathBuf = persistence::resolve_save_path(typed, &base)?;

    match purpose {
        PathPurpose::Load => {
            session.load(&path)?;
            *ui = UiState::new();
            ui.set_status(format!("Loaded {}", path.display()));
        }
        PathPurpose::SaveAs => {
            session.save_as(&path)?;
            ui.set_status(format!("Saved {}", path.display()));
        }
        PathPurpose::SaveAsThenAutosave => {
            session.save_as(&path)?;
            let on = session.toggle_autosave()?;
            ui.set_status(format!("Saved {}, autosave {}", path.display(), on_off(on)));
        }
    }
    Ok(())
}
