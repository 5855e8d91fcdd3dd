// Login screen: user selection and passcode entry, centered in the frame.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::SessionRole;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let box_area = centered(area, 44, (state.login_users.len() + 7) as u16);

    let mut lines = vec![Line::from(""), Line::from(" select a user:")];
    for (i, user) in state.login_users.iter().enumerate() {
        let marker = if i == state.login_cursor { ">" } else { " " };
        let role = match user.role {
            SessionRole::Operator => "operator",
            SessionRole::Leader(_) => "leader",
            SessionRole::Observer => "observer",
        };
        let style = if i == state.login_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {:<16} {role}", user.name),
            style,
        )));
    }

    lines.push(Line::from(""));
    if state.passcode_required {
        let selected_is_observer = state
            .login_users
            .get(state.login_cursor)
            .map(|u| u.role == SessionRole::Observer)
            .unwrap_or(false);
        if selected_is_observer {
            lines.push(Line::from(" no passcode needed"));
        } else {
            let masked = "*".repeat(state.passcode_input.len());
            lines.push(Line::from(format!(" passcode: {masked}_")));
        }
    }
    lines.push(Line::from(Span::styled(
        " Up/Down:Select  Enter:Login  q:Quit",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let title = if state.league_name.is_empty() {
        "Login".to_string()
    } else {
        format!("{} - Login", state.league_name)
    };
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, box_area);
}

/// A centered sub-rectangle clamped to the frame.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
