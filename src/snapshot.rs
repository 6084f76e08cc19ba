// JSON snapshot of a draft: settings, pick log, and every team's roster.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::draft::pick::{PickRecord, Position};
use crate::draft::state::DraftState;

/// One rostered player as written to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Pos")]
    pub pos: Position,
}

/// Point-in-time dump of a draft. Not a replay log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub teams: usize,
    pub my_slot: usize,
    pub rounds: usize,
    pub picks: Vec<PickRecord>,
    /// Keyed by team slot as a string ("1", "2", ...).
    pub team_rosters: BTreeMap<String, Vec<RosterEntry>>,
}

impl Snapshot {
    pub fn from_state(state: &DraftState) -> Self {
        let team_rosters = (1..=state.teams)
            .map(|t| {
                let entries = state
                    .team_roster(t)
                    .into_iter()
                    .map(|p| RosterEntry {
                        player: p.name.clone(),
                        team: p.team.clone(),
                        pos: p.position,
                    })
                    .collect();
                (t.to_string(), entries)
            })
            .collect();

        Snapshot {
            teams: state.teams,
            my_slot: state.my_slot,
            rounds: state.rounds,
            picks: state.picks().to_vec(),
            team_rosters,
        }
    }
}

/// Write the snapshot as pretty-printed JSON, replacing any existing file.
pub fn save(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    info!("Saved snapshot ({} picks) to {}", snapshot.picks.len(), path.display());
    Ok(())
}

/// Read a snapshot written by [`save`].
pub fn load(path: &Path) -> anyhow::Result<Snapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse snapshot {}", path.display()))
}
