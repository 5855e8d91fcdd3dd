// Top status bar: league, session, clock state, progress.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::SessionRole;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let role = match state.session.as_ref().map(|s| s.role) {
        Some(SessionRole::Operator) => "operator",
        Some(SessionRole::Leader(_)) => "leader",
        Some(SessionRole::Observer) => "observer",
        None => "-",
    };
    let user = state
        .session
        .as_ref()
        .map(|s| s.user.as_str())
        .unwrap_or("-");

    let clock = match &state.auction {
        Some(auction) if auction.paused => "PAUSED".to_string(),
        Some(auction) => format!("LIVE {}s", auction.seconds_remaining),
        None => "IDLE".to_string(),
    };

    let text = format!(
        " {} | {user} ({role}) | {clock} | sold {}, pool {}",
        state.league_name,
        state.history_depth,
        state.unassigned.len(),
    );
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
