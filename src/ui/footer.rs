use crate::core::Settings;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key(label: &'static str) -> Span<'static> {
    Span::styled(
        label,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

fn toggle(label: &'static str, on: bool) -> Span<'static> {
    if on {
        Span::styled(label, Style::default().fg(Color::Green))
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

/// Draws the footer with key hints, toggle states and the last status
/// message.
pub fn draw_footer(frame: &mut Frame, area: Rect, settings: &Settings, status: Option<&str>) {
    let hints = Line::from(vec![
        key("Enter"),
        Span::raw(" roll  "),
        key("g"),
        Span::raw(" group  "),
        key("[ ]"),
        Span::raw(" history  "),
        key("+/-"),
        Span::raw(" edit  "),
        key("a/c/x"),
        Span::raw(" roller  "),
        key("A/C/X"),
        Span::raw(" group  "),
        key("^S"),
        Span::raw(" save  "),
        key("^D"),
        Span::raw(" load  "),
        key("^R"),
        Span::raw(" repeat  "),
        key("q"),
        Span::raw(" quit"),
    ]);

    let mut second = vec![
        toggle("F2 random.org", settings.use_random_org),
        Span::raw("  "),
        toggle("F3 odd dice", settings.allow_odd),
        Span::raw("  "),
        toggle("F4 on top", settings.always_on_top),
        Span::raw("  "),
        toggle("F5 autosave", settings.autosave),
    ];
    if let Some(status) = status {
        second.push(Span::raw("  |  "));
        second.push(Span::styled(status.to_string(), Style::default().fg(Color::Cyan)));
    }

    let footer = Paragraph::new(vec![hints, Line::from(second)])
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}
