// Configuration loading and parsing (league.toml, players.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub players: Vec<PlayerEntry>,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Display name of the session operator.
    pub operator: String,
    /// The bidding team leaders, in team order.
    pub leaders: Vec<String>,
    /// Read-only spectator logins. No passcode required.
    #[serde(default)]
    pub observers: Vec<String>,
    /// Starting funds per team.
    pub initial_budget: u32,
    /// Countdown length in seconds.
    pub auction_seconds: u32,
    /// Whether the operator may hammer a sale down early.
    #[serde(default = "default_operator_finalize")]
    pub operator_finalize: bool,
    /// Shared passcode for operator and leader logins.
    #[serde(default)]
    pub passcode: Option<String>,
    /// Pins random player selection for a reproducible session.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_operator_finalize() -> bool {
    true
}

// ---------------------------------------------------------------------------
// players.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the `[[players]]` array in players.toml.
#[derive(Debug, Clone, Deserialize)]
struct PlayersFile {
    players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub image: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/players.toml` under the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&base_dir)
}

/// Load and validate configuration from `config/` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league = parse_league(&league_text, &league_path)?;

    let players_path = config_dir.join("players.toml");
    let players_text = read_file(&players_path)?;
    let players = parse_players(&players_text, &players_path)?;

    let config = Config { league, players };
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn parse_league(text: &str, path: &Path) -> Result<LeagueConfig, ConfigError> {
    let file: LeagueFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.league)
}

pub(crate) fn parse_players(text: &str, path: &Path) -> Result<Vec<PlayerEntry>, ConfigError> {
    let file: PlayersFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.players)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validation_error(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.name.trim().is_empty() {
        return Err(validation_error("league.name", "must not be empty"));
    }
    if league.operator.trim().is_empty() {
        return Err(validation_error("league.operator", "must not be empty"));
    }
    if league.leaders.is_empty() {
        return Err(validation_error(
            "league.leaders",
            "at least one team leader is required",
        ));
    }
    for (i, leader) in league.leaders.iter().enumerate() {
        if leader.trim().is_empty() {
            return Err(validation_error(
                "league.leaders",
                format!("leader {} has an empty name", i + 1),
            ));
        }
        if league.leaders[..i].contains(leader) {
            return Err(validation_error(
                "league.leaders",
                format!("duplicate leader name `{leader}`"),
            ));
        }
    }
    // Login entries are keyed by name, so the operator and observers must
    // not collide with the leader set.
    if league.leaders.contains(&league.operator) {
        return Err(validation_error(
            "league.operator",
            "operator name collides with a team leader",
        ));
    }
    for observer in &league.observers {
        if league.leaders.contains(observer) || *observer == league.operator {
            return Err(validation_error(
                "league.observers",
                format!("observer name `{observer}` collides with another login"),
            ));
        }
    }
    if league.initial_budget == 0 {
        return Err(validation_error(
            "league.initial_budget",
            "must be greater than zero",
        ));
    }
    if league.auction_seconds == 0 {
        return Err(validation_error(
            "league.auction_seconds",
            "must be greater than zero",
        ));
    }

    if config.players.is_empty() {
        return Err(validation_error("players", "the catalog must not be empty"));
    }
    for (i, player) in config.players.iter().enumerate() {
        if player.name.trim().is_empty() {
            return Err(validation_error(
                "players",
                format!("player {} has an empty name", i + 1),
            ));
        }
    }

    Ok(())
}
