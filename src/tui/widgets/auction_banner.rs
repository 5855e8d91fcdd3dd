// Auction banner: the player on the block, the standing bid, the countdown.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::SessionRole;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    if let Some(auction) = &state.auction {
        let tier = if auction.player.tier.is_empty() {
            String::new()
        } else {
            format!(" [{}]", auction.player.tier)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", auction.player.name),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({}){tier}", auction.player.position)),
        ]));

        let bidder = auction.bidder_name.as_deref().unwrap_or("--");
        let pause_tag = if auction.paused { "  ||" } else { "" };
        lines.push(Line::from(format!(
            "bid: {} by {bidder}  |  {}s{pause_tag}",
            auction.current_bid, auction.seconds_remaining
        )));

        // Leaders see their amount entry inline.
        if matches!(
            state.session.as_ref().map(|s| s.role),
            Some(SessionRole::Leader(_))
        ) {
            lines.push(Line::from(Span::styled(
                format!("your bid: {}_", state.bid_input),
                Style::default().fg(Color::Cyan),
            )));
        }
    } else {
        lines.push(Line::from("no auction running"));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Auction"),
    );
    frame.render_widget(paragraph, area);
}
