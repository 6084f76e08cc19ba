// Configuration loading: optional draft.toml, merged with CLI overrides.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::pick::Slot;
use crate::draft::roster::RosterSlotConfig;

/// Config file read when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG_PATH: &str = "config/draft.toml";
pub const DEFAULT_TEAMS: usize = 10;
pub const DEFAULT_ROUNDS: usize = 14;
pub const DEFAULT_RANKINGS_PATH: &str = "rankings_ppr_master.csv";
pub const DEFAULT_SNAPSHOT_PATH: &str = "draft_state.json";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

/// League scoring format. Informational only; it does not change scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoringFormat {
    #[default]
    Ppr,
    Half,
    Std,
}

impl fmt::Display for ScoringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringFormat::Ppr => "ppr",
            ScoringFormat::Half => "half",
            ScoringFormat::Std => "std",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub league: LeagueConfig,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueConfig {
    pub teams: usize,
    pub rounds: usize,
    /// The user's 1-based draft slot.
    pub my_slot: usize,
    pub scoring: ScoringFormat,
    pub roster: RosterSlotConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub rankings: PathBuf,
    pub snapshot: PathBuf,
}

/// Values supplied on the command line. `None` defers to the file or defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub teams: Option<usize>,
    pub my_slot: Option<usize>,
    pub rounds: Option<usize>,
    pub scoring: Option<ScoringFormat>,
    /// Roster string such as `QB:1,RB:2`.
    pub roster: Option<String>,
    pub rankings: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    league: LeagueSection,
    #[serde(default)]
    data: DataSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LeagueSection {
    teams: Option<usize>,
    rounds: Option<usize>,
    my_slot: Option<usize>,
    scoring: Option<ScoringFormat>,
    /// Slot name to starter count, e.g. `WR = 3`.
    #[serde(default)]
    roster: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataSection {
    rankings: Option<PathBuf>,
    snapshot: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration with CLI overrides applied on top.
///
/// With `path` set, the file must exist. Without it, `config/draft.toml` is
/// read if present and built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) => read_config_file(p)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                read_config_file(default)?
            } else {
                ConfigFile::default()
            }
        }
    };
    merge(file, overrides)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = read_file(path)?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// CLI > file > defaults, then validate.
fn merge(file: ConfigFile, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut roster_overrides = Vec::new();
    for (key, &count) in &file.league.roster {
        let slot = Slot::from_str_slot(key)
            .ok_or_else(|| invalid("league.roster", format!("unknown roster slot '{key}'")))?;
        roster_overrides.push((slot, count));
    }
    if let Some(s) = &overrides.roster {
        roster_overrides.extend(parse_roster_override(s)?);
    }

    let my_slot = overrides
        .my_slot
        .or(file.league.my_slot)
        .ok_or_else(|| invalid("league.my_slot", "required: set it in the config file or pass --pick"))?;

    let config = Config {
        league: LeagueConfig {
            teams: overrides.teams.or(file.league.teams).unwrap_or(DEFAULT_TEAMS),
            rounds: overrides.rounds.or(file.league.rounds).unwrap_or(DEFAULT_ROUNDS),
            my_slot,
            scoring: overrides.scoring.or(file.league.scoring).unwrap_or_default(),
            roster: RosterSlotConfig::with_overrides(roster_overrides),
        },
        data_paths: DataPaths {
            rankings: overrides
                .rankings
                .clone()
                .or(file.data.rankings)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RANKINGS_PATH)),
            snapshot: overrides
                .snapshot
                .clone()
                .or(file.data.snapshot)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Parse a roster override such as `QB:1,RB:2,WR:3`. Slots not named keep
/// their standard counts. An empty string means no overrides.
pub fn parse_roster_override(s: &str) -> Result<Vec<(Slot, usize)>, ConfigError> {
    let mut out = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| invalid("roster", format!("expected SLOT:COUNT, got '{part}'")))?;
        let slot = Slot::from_str_slot(key)
            .ok_or_else(|| invalid("roster", format!("unknown roster slot '{}'", key.trim())))?;
        let count = value
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid("roster", format!("invalid count '{}' for {slot}", value.trim())))?;
        out.push((slot, count));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if league.teams == 0 {
        return Err(invalid("league.teams", "must be greater than 0"));
    }
    if league.rounds == 0 {
        return Err(invalid("league.rounds", "must be greater than 0"));
    }
    if !(1..=league.teams).contains(&league.my_slot) {
        return Err(invalid(
            "league.my_slot",
            format!("must be between 1 and {}, got {}", league.teams, league.my_slot),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir_name: &str, body: &str) -> (PathBuf, PathBuf) {
        let tmp = std::env::temp_dir().join(dir_name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("draft.toml");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    fn with_pick(slot: usize) -> ConfigOverrides {
        ConfigOverrides {
            my_slot: Some(slot),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_without_file() {
        let config = merge(ConfigFile::default(), &with_pick(3)).unwrap();
        assert_eq!(config.league.teams, 10);
        assert_eq!(config.league.rounds, 14);
        assert_eq!(config.league.my_slot, 3);
        assert_eq!(config.league.scoring, ScoringFormat::Ppr);
        assert_eq!(config.league.roster, RosterSlotConfig::standard());
        assert_eq!(config.data_paths.rankings, PathBuf::from("rankings_ppr_master.csv"));
        assert_eq!(config.data_paths.snapshot, PathBuf::from("draft_state.json"));
    }

    #[test]
    fn loads_full_file() {
        let (tmp, path) = write_config(
            "config_test_full_file",
            r#"
[league]
teams = 12
rounds = 16
my_slot = 7
scoring = "half"

[league.roster]
WR = 3
FLEX = 2

[data]
rankings = "data/rankings.csv"
snapshot = "out/state.json"
"#,
        );

        let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.league.teams, 12);
        assert_eq!(config.league.rounds, 16);
        assert_eq!(config.league.my_slot, 7);
        assert_eq!(config.league.scoring, ScoringFormat::Half);
        assert_eq!(config.league.roster.get(Slot::WR), 3);
        assert_eq!(config.league.roster.get(Slot::FLEX), 2);
        assert_eq!(config.league.roster.get(Slot::RB), 2);
        assert_eq!(config.data_paths.rankings, PathBuf::from("data/rankings.csv"));
        assert_eq!(config.data_paths.snapshot, PathBuf::from("out/state.json"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn cli_overrides_file() {
        let (tmp, path) = write_config(
            "config_test_cli_overrides",
            r#"
[league]
teams = 12
my_slot = 7

[league.roster]
WR = 3
"#,
        );

        let overrides = ConfigOverrides {
            teams: Some(8),
            my_slot: Some(2),
            roster: Some("WR:4,K:0".into()),
            rankings: Some(PathBuf::from("cli.csv")),
            ..Default::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.league.teams, 8);
        assert_eq!(config.league.my_slot, 2);
        assert_eq!(config.league.rounds, 14);
        assert_eq!(config.league.roster.get(Slot::WR), 4);
        assert_eq!(config.league.roster.get(Slot::K), 0);
        assert_eq!(config.data_paths.rankings, PathBuf::from("cli.csv"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_my_slot_is_validation_error() {
        let err = merge(ConfigFile::default(), &ConfigOverrides::default()).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.my_slot"),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_slot_out_of_range() {
        let overrides = ConfigOverrides {
            teams: Some(8),
            my_slot: Some(9),
            ..Default::default()
        };
        let err = merge(ConfigFile::default(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "league.my_slot"));

        let err = merge(ConfigFile::default(), &with_pick(0)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn rejects_teams_zero() {
        let (tmp, path) = write_config(
            "config_test_teams_zero",
            "[league]\nteams = 0\nmy_slot = 1\n",
        );
        let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.teams"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_rounds_zero() {
        let overrides = ConfigOverrides {
            rounds: Some(0),
            my_slot: Some(1),
            ..Default::default()
        };
        let err = merge(ConfigFile::default(), &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "league.rounds"));
    }

    #[test]
    fn rejects_unknown_roster_key_in_file() {
        let (tmp, path) = write_config(
            "config_test_bad_roster_key",
            "[league]\nmy_slot = 1\n\n[league.roster]\nLB = 2\n",
        );
        let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "league.roster"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("config_test_missing/draft.toml");
        let err = load_config(Some(&path), &with_pick(1)).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let (tmp, path) = write_config("config_test_invalid_toml", "[league\nteams = ");
        let err = load_config(Some(&path), &with_pick(1)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_unknown_scoring() {
        let (tmp, path) = write_config(
            "config_test_bad_scoring",
            "[league]\nmy_slot = 1\nscoring = \"superflex\"\n",
        );
        let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn roster_override_parsing() {
        let parsed = parse_roster_override("qb:2, flex:0 ,DST:1").unwrap();
        assert_eq!(parsed, vec![(Slot::QB, 2), (Slot::FLEX, 0), (Slot::DST, 1)]);
        assert!(parse_roster_override("").unwrap().is_empty());
    }

    #[test]
    fn roster_override_errors() {
        assert!(parse_roster_override("QB").is_err());
        assert!(parse_roster_override("LB:1").is_err());
        assert!(parse_roster_override("QB:two").is_err());
        assert!(parse_roster_override("QB:-1").is_err());
    }
}
