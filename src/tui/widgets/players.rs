// Unassigned players panel with a scroll offset.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .unassigned
        .iter()
        .skip(state.players_scroll)
        .take(visible)
        .map(|player| {
            let tier = if player.tier.is_empty() {
                "-"
            } else {
                player.tier.as_str()
            };
            Line::from(format!(
                " {:<14} {:<8} {tier}",
                player.name, player.position
            ))
        })
        .collect();

    let title = format!("Players ({})", state.unassigned.len());
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}
