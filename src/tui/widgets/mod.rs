// Dashboard widgets, one module per panel.

pub mod auction_banner;
pub mod history;
pub mod login;
pub mod players;
pub mod status_bar;
pub mod teams;
