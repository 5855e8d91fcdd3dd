// Sale history panel: most recent settlements first.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::text::Line;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = area.height.saturating_sub(2) as usize;
    let total = state.history.len();

    let lines: Vec<Line> = state
        .history
        .iter()
        .enumerate()
        .rev()
        .take(visible)
        .map(|(i, entry)| {
            let leader = state
                .teams
                .iter()
                .find(|t| t.team == entry.bidder)
                .map(|t| t.leader.as_str())
                .unwrap_or("?");
            Line::from(format!(
                " #{:<3} {:<14} -> {:<10} {}",
                i + 1,
                entry.player_name,
                leader,
                entry.amount
            ))
        })
        .collect();

    let title = format!("Sales ({total})");
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}
