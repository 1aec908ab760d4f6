//! Modal prompts: a one-line text field and yes/no confirmations.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Single-line editor with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor_position: usize,
}

impl TextInput {
    /// Starts with `value` filled in and the cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor_position: value.chars().count(),
        }
    }

    fn split(&self) -> (String, String) {
        let chars: Vec<char> = self.value.chars().collect();
        let before = chars[..self.cursor_position].iter().collect();
        let after = chars[self.cursor_position..].iter().collect();
        (before, after)
    }

    pub fn handle_char_input(&mut self, c: char) {
        let (before, after) = self.split();
        self.value = format!("{}{}{}", before, c, after);
        self.cursor_position += 1;
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let (before, after) = self.split();
            // Drop the first char of `after`, which is the one we stepped over
            self.value = format!("{}{}", before, after.chars().skip(1).collect::<String>());
        }
    }

    pub fn handle_delete(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let (before, after) = self.split();
            self.value = format!("{}{}", before, after.chars().skip(1).collect::<String>());
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// The text with an underscore where the cursor sits.
    pub fn display(&self) -> String {
        let (before, after) = self.split();
        format!("{}_{}", before, after)
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Text entry box drawn over the main screen.
pub fn draw_text_prompt(frame: &mut Frame, title: &str, input: &TextInput, error: Option<&str>) {
    let area = centered(frame.size(), 64, 8);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input field
            Constraint::Length(1), // Validation
            Constraint::Min(0),
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    let input_widget = Paragraph::new(input.display())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White));
    frame.render_widget(input_widget, chunks[0]);

    if let Some(error) = error {
        let line = Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
    }

    let controls = Paragraph::new("[Enter] Confirm    [Esc] Cancel")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(controls, chunks[3]);
}

/// Yes/no question drawn over the main screen.
pub fn draw_confirm(frame: &mut Frame, title: &str, question: &str) {
    let area = centered(frame.size(), 56, 7);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(question.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[Y] Yes    [N] No",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::default();
        for c in "d20s".chars() {
            input.handle_char_input(c);
        }
        input.handle_backspace();
        assert_eq!(input.value, "d20");
        assert_eq!(input.display(), "d20_");
    }

    #[test]
    fn test_edit_in_the_middle() {
        let mut input = TextInput::with_value("Grup");
        input.move_left();
        input.move_left();
        input.handle_char_input('o');
        assert_eq!(input.value, "Group");
        input.handle_delete();
        assert_eq!(input.value, "Grop");
        input.home();
        input.handle_backspace();
        assert_eq!(input.value, "Grop");
        input.end();
        assert_eq!(input.cursor_position, 4);
    }

    #[test]
    fn test_multibyte_names() {
        let mut input = TextInput::with_value("Dé");
        input.handle_backspace();
        input.handle_char_input('é');
        input.handle_char_input('s');
        assert_eq!(input.value, "Dés");
        input.move_right();
        assert_eq!(input.cursor_position, 3);
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(TextInput::with_value("  Axe ").trimmed(), "Axe");
    }
}
