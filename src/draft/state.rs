// Draft state: player pool, snake order, pick log, team rosters, and the
// recommendation queries built on top of them.

use std::fmt;

use tracing::{debug, info, warn};

use super::order::{snake_order, PickSlot};
use super::pick::{PickRecord, Position};
use super::player::{normalize_name, Player};
use super::roster::{assign_starters, needs_for_roster, RosterNeeds, RosterSlotConfig};
use crate::valuation::rank::{RankSource, SourceRanks};
use crate::valuation::scoring::{risk_score, value_score};

/// Composite rank given to players created on the fly during a pick.
pub const PLACEHOLDER_RANK: f64 = 1500.0;
/// Tag given to players created on the fly.
pub const PLACEHOLDER_TAG: &str = "volatile";
/// Number of candidates shown in the suggestion report and default board.
pub const BOARD_SIZE: usize = 25;

/// Recoverable failures of draft operations. The messages are shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{player} is already taken by Team {team}.")]
    AlreadyTaken { player: String, team: usize },

    #[error("No picks to undo.")]
    NothingToUndo,

    #[error("Player not found.")]
    PlayerNotFound(String),

    #[error("Team {0} is not in this draft.")]
    UnknownTeam(usize),

    #[error("Draft complete.")]
    DraftComplete,

    #[error("invalid draft setup: {0}")]
    InvalidSetup(String),
}

/// Result of resolving a typed name against the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerMatch {
    NotFound,
    /// Case-insensitive exact match (pool index).
    Exact(usize),
    /// Pool indices whose names contain the query, in pool order.
    Substring(Vec<usize>),
}

/// A successfully recorded pick.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPick {
    pub record: PickRecord,
    pub position: Position,
    /// Whether the player was unknown and created for this pick.
    pub auto_added: bool,
}

impl fmt::Display for RecordedPick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recorded pick #{}: Team {} -> {} ({})",
            self.record.global_pick, self.record.team_slot, self.record.player, self.position
        )
    }
}

/// An available player with its scores for the requesting team.
#[derive(Debug, Clone, Copy)]
pub struct ScoredPlayer<'a> {
    pub player: &'a Player,
    pub value: f64,
    pub risk: u32,
}

impl ScoredPlayer<'_> {
    /// Sort key for the risky pick: lower is preferred.
    fn risky_key(&self) -> f64 {
        -self.value + 0.5 * self.risk as f64
    }
}

/// The recommendation for the current turn.
#[derive(Debug, Clone)]
pub struct Suggestion<'a> {
    pub pick: PickSlot,
    pub my_turn: bool,
    pub needs: RosterNeeds,
    pub safe: Option<&'a Player>,
    pub risky: Option<&'a Player>,
    /// Top candidates by value, best first.
    pub board: Vec<ScoredPlayer<'a>>,
}

impl fmt::Display for Suggestion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "On clock: Team {}  (Round {}, Overall #{})",
            self.pick.team_slot, self.pick.round, self.pick.overall
        )?;
        if self.my_turn {
            writeln!(f, "It's YOUR pick.")?;
        }
        writeln!(f, "Your Roster Needs: {}", self.needs)?;
        writeln!(f, "Recommendation:")?;
        let line = |p: Option<&Player>| p.map_or_else(|| "n/a".to_string(), Player::display_line);
        writeln!(f, "  SAFE  -> {}", line(self.safe))?;
        writeln!(f, "  RISKY -> {}", line(self.risky))?;
        write!(f, "Top-{BOARD_SIZE} board:")?;
        for (i, c) in self.board.iter().enumerate() {
            write!(f, "\n{:>2}. {}", i + 1, c.player.display_line())?;
        }
        Ok(())
    }
}

/// The complete state of one draft session.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    /// Number of teams in the league.
    pub teams: usize,
    /// The user's 1-based draft slot.
    pub my_slot: usize,
    /// Number of rounds.
    pub rounds: usize,
    players: Vec<Player>,
    order: Vec<PickSlot>,
    picks: Vec<PickRecord>,
    /// Pool indices per team, in draft order. Index 0 is team slot 1.
    team_rosters: Vec<Vec<usize>>,
    roster_slots: RosterSlotConfig,
}

impl DraftState {
    /// Create a new draft.
    ///
    /// Requires at least one team and one round, and `my_slot` in `1..=teams`.
    pub fn new(
        teams: usize,
        my_slot: usize,
        rounds: usize,
        players: Vec<Player>,
        roster_slots: RosterSlotConfig,
    ) -> Result<Self, DraftError> {
        if teams == 0 {
            return Err(DraftError::InvalidSetup("teams must be greater than 0".into()));
        }
        if rounds == 0 {
            return Err(DraftError::InvalidSetup("rounds must be greater than 0".into()));
        }
        if !(1..=teams).contains(&my_slot) {
            return Err(DraftError::InvalidSetup(format!(
                "draft slot {my_slot} is outside 1..={teams}"
            )));
        }

        Ok(DraftState {
            teams,
            my_slot,
            rounds,
            players,
            order: snake_order(teams, rounds),
            picks: Vec::new(),
            team_rosters: vec![Vec::new(); teams],
            roster_slots,
        })
    }

    // --- Accessors ---

    /// The full pool, taken or not.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Chronological pick log.
    pub fn picks(&self) -> &[PickRecord] {
        &self.picks
    }

    pub fn order(&self) -> &[PickSlot] {
        &self.order
    }

    pub fn roster_slots(&self) -> &RosterSlotConfig {
        &self.roster_slots
    }

    /// Players not yet drafted, in pool order.
    pub fn available(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_taken())
    }

    /// A team's players in the order drafted. Empty for unknown slots.
    pub fn team_roster(&self, team_slot: usize) -> Vec<&Player> {
        team_slot
            .checked_sub(1)
            .and_then(|i| self.team_rosters.get(i))
            .map(|ids| ids.iter().map(|&i| &self.players[i]).collect())
            .unwrap_or_default()
    }

    pub fn my_roster(&self) -> Vec<&Player> {
        self.team_roster(self.my_slot)
    }

    // --- Turn tracking ---

    pub fn next_pick_index(&self) -> usize {
        self.picks.len()
    }

    /// The turn currently on the clock, or `None` once the draft is complete.
    pub fn current_pick(&self) -> Option<PickSlot> {
        self.order.get(self.next_pick_index()).copied()
    }

    pub fn on_clock_team(&self) -> Option<usize> {
        self.current_pick().map(|p| p.team_slot)
    }

    /// `(round, pick_in_round, overall)` for the current turn.
    pub fn round_and_pick(&self) -> Option<(usize, usize, usize)> {
        self.current_pick()
            .map(|p| (p.round, p.pick_in_round, p.overall))
    }

    pub fn is_my_turn(&self) -> bool {
        self.on_clock_team() == Some(self.my_slot)
    }

    pub fn is_complete(&self) -> bool {
        self.current_pick().is_none()
    }

    /// The team an "other team picked" entry belongs to: the team on the
    /// clock, or if that is the user, the next team in the order that isn't.
    pub fn next_other_team(&self) -> Option<usize> {
        self.order
            .get(self.next_pick_index()..)?
            .iter()
            .map(|p| p.team_slot)
            .find(|&t| t != self.my_slot)
    }

    // --- Player lookup ---

    /// Resolve a typed name: exact case-insensitive match first, then every
    /// player whose name contains the query.
    pub fn resolve(&self, name: &str) -> PlayerMatch {
        let query = normalize_name(name);
        if query.is_empty() {
            return PlayerMatch::NotFound;
        }
        if let Some(i) = self.players.iter().position(|p| p.key() == query) {
            return PlayerMatch::Exact(i);
        }
        let hits: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.key().contains(&query))
            .map(|(i, _)| i)
            .collect();
        if hits.is_empty() {
            PlayerMatch::NotFound
        } else {
            PlayerMatch::Substring(hits)
        }
    }

    /// Pool index for a name; substring matches resolve to the first hit.
    fn find_index(&self, name: &str) -> Option<usize> {
        match self.resolve(name) {
            PlayerMatch::Exact(i) => Some(i),
            PlayerMatch::Substring(hits) => hits.first().copied(),
            PlayerMatch::NotFound => None,
        }
    }

    pub fn find_player(&self, name: &str) -> Option<&Player> {
        self.find_index(name).map(|i| &self.players[i])
    }

    /// Available players whose name contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&Player> {
        let query = normalize_name(query);
        self.available().filter(|p| p.key().contains(&query)).collect()
    }

    // --- Mutation ---

    /// Add a player not present in the rankings.
    ///
    /// No-op (returns `false`) if a player with the same name already exists.
    /// The player is tagged `volatile`; `rank` becomes both the consensus and
    /// composite rank.
    pub fn add_player(&mut self, name: &str, position: Position, team: &str, rank: f64) -> bool {
        let key = normalize_name(name);
        if key.is_empty() || self.players.iter().any(|p| p.key() == key) {
            return false;
        }
        let ranks = SourceRanks {
            consensus: (rank < crate::valuation::rank::UNRANKED).then_some(rank),
            ..Default::default()
        };
        let mut player = Player::new(name, team, position, ranks);
        player.composite_rank = rank;
        player.tags = PLACEHOLDER_TAG.to_string();
        player.notes = "added-live".to_string();
        info!("Added player '{}' ({}, {}) at rank {}", player.name, position, team, rank);
        self.players.push(player);
        true
    }

    /// Record that `team_slot` drafted `player_name`.
    ///
    /// Unknown names are added as placeholder WRs at rank 1500. Fails without
    /// touching any state if the team doesn't exist or the player is taken.
    pub fn record_pick(&mut self, team_slot: usize, player_name: &str) -> Result<RecordedPick, DraftError> {
        if !(1..=self.teams).contains(&team_slot) {
            return Err(DraftError::UnknownTeam(team_slot));
        }

        let (idx, auto_added) = match self.find_index(player_name) {
            Some(i) => (i, false),
            None => {
                if !self.add_player(player_name, Position::WR, "", PLACEHOLDER_RANK) {
                    return Err(DraftError::PlayerNotFound(player_name.trim().to_string()));
                }
                warn!("Auto-added unknown player '{}' for pick", player_name.trim());
                (self.players.len() - 1, true)
            }
        };

        let player = &mut self.players[idx];
        if let Some(owner) = player.taken_by {
            return Err(DraftError::AlreadyTaken {
                player: player.name.clone(),
                team: owner,
            });
        }
        player.taken_by = Some(team_slot);

        let record = PickRecord {
            global_pick: self.picks.len() + 1,
            team_slot,
            player: player.name.clone(),
        };
        let position = player.position;
        self.picks.push(record.clone());
        self.team_rosters[team_slot - 1].push(idx);

        info!(
            "Recorded pick #{}: team {} -> {} ({})",
            record.global_pick, team_slot, record.player, position
        );
        Ok(RecordedPick {
            record,
            position,
            auto_added,
        })
    }

    /// Reverse the most recent pick.
    pub fn undo(&mut self) -> Result<PickRecord, DraftError> {
        let last = self.picks.pop().ok_or(DraftError::NothingToUndo)?;
        let key = normalize_name(&last.player);

        let idx = self
            .players
            .iter()
            .position(|p| p.key() == key && p.taken_by == Some(last.team_slot));
        if let Some(i) = idx {
            self.players[i].taken_by = None;
            let roster = &mut self.team_rosters[last.team_slot - 1];
            if let Some(pos) = roster.iter().rposition(|&r| r == i) {
                roster.remove(pos);
            }
        } else {
            warn!("Undo could not find drafted player '{}'", last.player);
        }

        info!("Undid pick #{} ({})", last.global_pick, last.player);
        Ok(last)
    }

    /// Update one source rank for a player and refresh its composite rank.
    ///
    /// `Consensus` writes the value straight into the composite rank; the
    /// other sources go through the weighted average.
    pub fn set_rank(&mut self, source: RankSource, name: &str, value: f64) -> Result<&Player, DraftError> {
        let idx = self
            .find_index(name)
            .ok_or_else(|| DraftError::PlayerNotFound(name.trim().to_string()))?;
        let player = &mut self.players[idx];
        player.ranks.set(source, value);
        match source {
            RankSource::Consensus => player.composite_rank = value,
            _ => player.recompute_rank(),
        }
        debug!(
            "Set {} rank for '{}' to {} (composite {:.2})",
            source, player.name, value, player.composite_rank
        );
        Ok(player)
    }

    /// Replace a player's tag string.
    pub fn set_tags(&mut self, name: &str, tags: &str) -> Result<&Player, DraftError> {
        let idx = self
            .find_index(name)
            .ok_or_else(|| DraftError::PlayerNotFound(name.trim().to_string()))?;
        let player = &mut self.players[idx];
        player.tags = tags.trim().to_string();
        Ok(player)
    }

    // --- Queries ---

    /// Remaining starter needs for a team.
    pub fn team_needs(&self, team_slot: usize) -> RosterNeeds {
        needs_for_roster(&self.team_roster(team_slot), &self.roster_slots)
    }

    pub fn my_needs(&self) -> RosterNeeds {
        self.team_needs(self.my_slot)
    }

    /// Round used for scoring: the current one, or the last once complete.
    fn scoring_round(&self) -> usize {
        self.current_pick().map_or(self.rounds, |p| p.round)
    }

    /// Score every available player for the user's team, unsorted.
    fn score_available(&self, round: usize) -> Vec<ScoredPlayer<'_>> {
        let mine = self.my_roster();
        let annotated = assign_starters(&mine, &self.roster_slots);
        let scored: Vec<ScoredPlayer<'_>> = self
            .available()
            .map(|player| ScoredPlayer {
                player,
                value: value_score(player, &self.roster_slots, &annotated, round),
                risk: risk_score(player),
            })
            .collect();
        debug!("Scored {} available players for round {}", scored.len(), round);
        scored
    }

    /// Build the recommendation for the current turn. `None` once the draft
    /// is complete.
    pub fn recommend(&self) -> Option<Suggestion<'_>> {
        let pick = self.current_pick()?;

        let mut scored = self.score_available(pick.round);
        scored.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.risk.cmp(&b.risk)));

        let safe = scored
            .iter()
            .find(|c| c.risk == 0 || !c.player.has_tag("rookie"))
            .or(scored.first())
            .map(|c| c.player);

        let mut by_risk = scored.clone();
        by_risk.sort_by(|a, b| a.risky_key().total_cmp(&b.risky_key()));
        let risky = by_risk.first().map(|c| c.player);

        scored.truncate(BOARD_SIZE);
        Some(Suggestion {
            pick,
            my_turn: pick.team_slot == self.my_slot,
            needs: self.my_needs(),
            safe,
            risky,
            board: scored,
        })
    }

    /// The recommendation report as text.
    pub fn suggest(&self) -> String {
        match self.recommend() {
            Some(s) => s.to_string(),
            None => DraftError::DraftComplete.to_string(),
        }
    }

    /// Top `n` available players by value score.
    pub fn board(&self, n: usize) -> Vec<ScoredPlayer<'_>> {
        let mut scored = self.score_available(self.scoring_round());
        scored.sort_by(|a, b| b.value.total_cmp(&a.value));
        scored.truncate(n);
        scored
    }

    pub fn show_board(&self, n: usize) -> String {
        self.board(n)
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:>2}. {}", i + 1, c.player.display_line()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every team's roster with full player lines.
    pub fn show_teams(&self) -> String {
        let mut out = Vec::new();
        for t in 1..=self.teams {
            out.push(format!("Team {t}:"));
            let roster = self.team_roster(t);
            if roster.is_empty() {
                out.push("  (empty)".to_string());
            }
            out.extend(roster.iter().map(|p| format!("  - {}", p.display_line())));
        }
        out.join("\n")
    }

    /// Every team's roster as `Name TEAM POS`, in draft order.
    pub fn board_full(&self) -> String {
        let mut out = vec!["=== Draft Board Snapshot ===".to_string()];
        for t in 1..=self.teams {
            out.push(format!("Team {t}:"));
            let roster = self.team_roster(t);
            if roster.is_empty() {
                out.push("  (empty)".to_string());
            }
            out.extend(roster.iter().map(|p| format!("  - {}", p.board_line())));
        }
        out.join("\n")
    }

    /// Starter needs for every team.
    pub fn all_needs_report(&self) -> String {
        let mut out = vec!["=== Roster Needs (starters remaining) ===".to_string()];
        for t in 1..=self.teams {
            out.push(format!("Team {t}: {}", self.team_needs(t)));
        }
        out.join("\n")
    }
}
