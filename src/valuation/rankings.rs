// Rankings CSV loading.
//
// Reads the master rankings sheet: one row per player with up to four source
// rank columns, a tier label, and comma-separated risk tags. Every column is
// text in the sheet; numbers that fail to parse count as missing.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::draft::pick::Position;
use crate::draft::player::{normalize_name, Player};
use crate::valuation::rank::SourceRanks;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RankingsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// One rankings row as it appears in the sheet. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRankingRow {
    #[serde(default)]
    Player: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    Pos: String,
    #[serde(default)]
    Bye: String,
    #[serde(default)]
    ESPN_Clay_Rank: String,
    #[serde(default)]
    FP_ECR_Rank: String,
    #[serde(default)]
    DS_Rank: String,
    #[serde(default)]
    ConsensusRank: String,
    #[serde(default)]
    Tier: String,
    #[serde(default)]
    RiskTag: String,
    #[serde(default)]
    Notes: String,
}

/// Parse a numeric cell; blanks, junk, and non-finite values are missing.
fn parse_rank(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bye(cell: &str) -> Option<u8> {
    parse_rank(cell)
        .filter(|v| (0.0..=u8::MAX as f64).contains(v))
        .map(|v| v.round() as u8)
}

fn player_from_row(raw: RawRankingRow) -> Option<Player> {
    let name = raw.Player.trim();
    if name.is_empty() {
        warn!("skipping rankings row with empty player name");
        return None;
    }
    let Some(position) = Position::from_str_pos(&raw.Pos) else {
        warn!("skipping player '{}': unknown position '{}'", name, raw.Pos);
        return None;
    };

    let ranks = SourceRanks {
        espn: parse_rank(&raw.ESPN_Clay_Rank),
        fp: parse_rank(&raw.FP_ECR_Rank),
        ds: parse_rank(&raw.DS_Rank),
        consensus: parse_rank(&raw.ConsensusRank),
    };

    let mut player = Player::new(name, &raw.Team, position, ranks);
    player.bye = parse_bye(&raw.Bye);
    player.tier = raw.Tier.trim().to_string();
    player.tags = raw.RiskTag.trim().to_string();
    player.notes = raw.Notes.trim().to_string();
    Some(player)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    // A header that can't be read fails the whole file; bad rows are skipped.
    reader.headers()?;
    let mut players = Vec::new();
    for result in reader.deserialize::<RawRankingRow>() {
        match result {
            Ok(raw) => {
                if let Some(player) = player_from_row(raw) {
                    players.push(player);
                }
            }
            Err(e) => {
                warn!("skipping malformed rankings row: {}", e);
            }
        }
    }
    Ok(dedup_players(players))
}

/// Keep one entry per normalized name: the one with the lowest composite rank.
///
/// The surviving entry takes the slot of the first occurrence, so the pool
/// keeps sheet order. Ties keep the earlier row.
pub fn dedup_players(players: Vec<Player>) -> Vec<Player> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Player> = Vec::with_capacity(players.len());
    for player in players {
        match index.get(&player.key()) {
            Some(&i) => {
                if player.composite_rank < unique[i].composite_rank {
                    unique[i] = player;
                }
            }
            None => {
                index.insert(normalize_name(&player.name), unique.len());
                unique.push(player);
            }
        }
    }
    unique
}

/// Load the player pool from a rankings CSV file.
///
/// An empty pool is an error: the draft cannot start without players.
pub fn load_rankings(path: &Path) -> Result<Vec<Player>, RankingsError> {
    let file = std::fs::File::open(path).map_err(|e| RankingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file).map_err(|e| RankingsError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if players.is_empty() {
        return Err(RankingsError::Validation(
            "rankings CSV produced zero valid rows".into(),
        ));
    }

    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
