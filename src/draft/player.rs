// A single entry in the draftable player pool.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::pick::Position;
use crate::valuation::rank::{composite_rank, SourceRanks};

/// A player in the pool, with rank data and draft status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Team abbreviation (may be empty for live-added players).
    pub team: String,
    pub position: Position,
    pub bye: Option<u8>,
    pub ranks: SourceRanks,
    /// Derived from `ranks`; lower is better. Always defined.
    pub composite_rank: f64,
    /// Free-text tier label, e.g. "Tier 1".
    pub tier: String,
    /// Comma-separated risk/safety tags, e.g. "rookie,injury".
    pub tags: String,
    pub notes: String,
    /// Team slot that drafted this player, if any.
    pub taken_by: Option<usize>,
}

impl Player {
    /// Build a player whose composite rank is computed from `ranks`.
    pub fn new(name: &str, team: &str, position: Position, ranks: SourceRanks) -> Self {
        Player {
            name: name.trim().to_string(),
            team: team.trim().to_string(),
            position,
            bye: None,
            ranks,
            composite_rank: composite_rank(&ranks),
            tier: String::new(),
            tags: String::new(),
            notes: String::new(),
            taken_by: None,
        }
    }

    /// Case-insensitive lookup key.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Re-derive the composite rank from the current source ranks.
    pub fn recompute_rank(&mut self) {
        self.composite_rank = composite_rank(&self.ranks);
    }

    pub fn is_taken(&self) -> bool {
        self.taken_by.is_some()
    }

    /// The parsed tag set (trimmed, empties dropped).
    pub fn tag_set(&self) -> BTreeSet<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_set().contains(tag)
    }

    /// One-line display: `Name TEAM POS Bye N [tags]`, skipping empty parts.
    pub fn display_line(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        for part in [self.name.as_str(), self.team.as_str(), self.position.display_str()] {
            if !part.is_empty() {
                parts.push(part.to_string());
            }
        }
        if let Some(bye) = self.bye {
            parts.push(format!("Bye {bye}"));
        }
        if !self.tags.is_empty() {
            parts.push(format!("[{}]", self.tags));
        }
        parts.join(" ")
    }

    /// Short form used on the draft board: `Name TEAM POS`.
    pub fn board_line(&self) -> String {
        format!("{} {} {}", self.name, self.team, self.position)
    }
}

/// Normalize a player name for identity comparisons.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
