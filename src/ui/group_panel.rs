use crate::core::constants::MAX_RESULT_WIDTH;
use crate::core::{Field, Roller, RollerGroup};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const NAME_WIDTH: usize = 16;

/// Rows a group needs on screen, borders included.
pub fn group_height(group: &RollerGroup) -> u16 {
    if group.collapsed {
        3
    } else {
        group.rollers.len() as u16 + 3
    }
}

/// `History`, or `12:00:03  (4/7)` once there is something to look back on.
fn history_line(group: &RollerGroup) -> String {
    let len = group.history_len();
    if len == 0 {
        group.label.clone()
    } else {
        format!("{}  ({}/{})", group.label, group.cursor + 1, len)
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

fn field_span(text: String, field: Field, selected: Option<Field>) -> Span<'static> {
    if selected == Some(field) {
        Span::styled(
            text,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(text, Style::default().fg(Color::White))
    }
}

fn roller_line(roller: &Roller, selected: Option<Field>) -> Line<'static> {
    let config = &roller.config;
    let marker = if selected.is_some() { "> " } else { "  " };
    let minimum = match config.minimum {
        Some(m) => format!("min {}", m),
        None => "min -".to_string(),
    };

    let name_style = if selected.is_some() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(
            format!("{:<width$}", clip(&roller.name, NAME_WIDTH), width = NAME_WIDTH),
            name_style,
        ),
        Span::raw(" "),
        field_span(format!("{}", config.dice_qty), Field::DiceQty, selected),
        Span::raw("d"),
        field_span(format!("{}", config.die_faces), Field::DieFaces, selected),
        Span::raw(" "),
        field_span(format!("{:+}", config.modifier), Field::Modifier, selected),
        Span::raw(" "),
        field_span(minimum, Field::Minimum, selected),
        Span::raw(" "),
        field_span(format!("{:+}", config.final_modifier), Field::FinalModifier, selected),
        Span::styled("  ->  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            clip(&roller.results_text, MAX_RESULT_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Draws one group. `selection` is the selected roller row and field when
/// this group holds the selection.
pub fn draw_group(frame: &mut Frame, area: Rect, group: &RollerGroup, selection: Option<(usize, Field)>) {
    let border_style = if selection.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let fold = if group.collapsed { "+" } else { "-" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" [{}] {} ", fold, group.name));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        history_line(group),
        Style::default().fg(Color::Gray),
    ))];

    if !group.collapsed {
        for (i, roller) in group.rollers.iter().enumerate() {
            let selected = selection.filter(|(row, _)| *row == i).map(|(_, field)| field);
            lines.push(roller_line(roller, selected));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RollerConfig;

    #[test]
    fn test_group_height() {
        let mut group = RollerGroup::new(1, "g");
        group.rollers.push(Roller::new(2, "a"));
        group.rollers.push(Roller::new(3, "b"));
        assert_eq!(group_height(&group), 5);
        group.collapsed = true;
        assert_eq!(group_height(&group), 3);
    }

    #[test]
    fn test_history_line() {
        let group = RollerGroup::new(1, "g");
        assert_eq!(history_line(&group), "History");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a much longer name", 6), "a muc…");
    }

    #[test]
    fn test_roller_line_text() {
        let mut roller = Roller::with_config(1, "Axe", RollerConfig::new(2, 6, 1, -2));
        roller.config.set_minimum(Some(3));
        let line = roller_line(&roller, None);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("2d6 +1 min 3 -2"));
        assert!(text.ends_with(&roller.results_text));
    }
}
