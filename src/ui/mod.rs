pub mod footer;
pub mod group_panel;
pub mod prompt;

use crate::core::Session;
use crate::input::{Pending, PathPurpose, Prompt, RenameTarget, UiState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

/// Main UI drawing function.
pub fn draw_ui(frame: &mut Frame, session: &Session, ui: &UiState) {
    let size = frame.size();

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Groups
            Constraint::Length(4), // Footer
        ])
        .split(size);

    let title = Paragraph::new(Span::styled(
        format!(" {}", session.title()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .style(Style::default().bg(Color::Rgb(20, 20, 40)));
    frame.render_widget(title, v_chunks[0]);

    draw_groups(frame, v_chunks[1], session, ui);
    footer::draw_footer(frame, v_chunks[2], &session.settings, ui.status.as_deref());

    if let Some(prompt) = &ui.prompt {
        draw_prompt(frame, prompt);
    }
}

/// First group to draw so that the selected one is on screen.
fn first_visible(session: &Session, selected: usize, height: u16) -> usize {
    let mut first = selected.min(session.groups.len().saturating_sub(1));
    let mut used = session
        .groups
        .get(first)
        .map_or(0, group_panel::group_height);
    while first > 0 {
        let above = group_panel::group_height(&session.groups[first - 1]);
        if used + above > height {
            break;
        }
        used += above;
        first -= 1;
    }
    first
}

fn draw_groups(frame: &mut Frame, area: Rect, session: &Session, ui: &UiState) {
    let mut y = area.y;
    let bottom = area.y + area.height;
    let start = first_visible(session, ui.group, area.height);

    for (index, group) in session.groups.iter().enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let height = group_panel::group_height(group).min(bottom - y);
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        let selection = (index == ui.group).then_some((ui.roller, ui.field));
        group_panel::draw_group(frame, rect, group, selection);
        y += height;
    }
}

fn draw_prompt(frame: &mut Frame, prompt: &Prompt) {
    match prompt {
        Prompt::Path {
            purpose,
            input,
            error,
        } => {
            let title = match purpose {
                PathPurpose::Load => "Load",
                PathPurpose::SaveAs => "Save As",
                PathPurpose::SaveAsThenAutosave => "Save As (autosave)",
            };
            prompt::draw_text_prompt(frame, title, input, error.as_deref());
        }
        Prompt::Rename { target, input } => {
            let title = match target {
                RenameTarget::Group => "Rename Group",
                RenameTarget::Roller => "Rename Roller",
            };
            prompt::draw_text_prompt(frame, title, input, None);
        }
        Prompt::Confirm(pending) => {
            let question = match pending {
                Pending::New | Pending::Load => {
                    "There are unsaved changes! Proceed anyway?"
                }
                Pending::Quit => "There are unsaved changes! Quit anyway?",
            };
            prompt::draw_confirm(frame, "Unsaved changes!", question);
        }
    }
}
