// Team budgets panel: one block of lines per team.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();
    for team in &state.teams {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}", team.leader),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {} left / {} spent", team.remaining, team.spent)),
        ]));
        if team.players.is_empty() {
            lines.push(Line::from("   (no players)"));
        }
        for player in &team.players {
            lines.push(Line::from(format!("   {} ({})", player.name, player.price)));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Teams"));
    frame.render_widget(paragraph, area);
}
