// Frame layout: fixed dashboard zones.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The dashboard zones, top to bottom: status bar, auction banner, the
/// players/teams split, sale history, notice line, help bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub banner: Rect,
    pub players: Rect,
    pub teams: Rect,
    pub history: Rect,
    pub notice_bar: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // auction banner
            Constraint::Min(8),    // players | teams
            Constraint::Length(8), // sale history
            Constraint::Length(1), // notice line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    AppLayout {
        status_bar: rows[0],
        banner: rows[1],
        players: middle[0],
        teams: middle[1],
        history: rows[3],
        notice_bar: rows[4],
        help_bar: rows[5],
    }
}
