// Positions, roster slots, and individual pick records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a drafted player can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

/// Fixed positions in the order starters are assigned.
pub const STARTER_ORDER: [Position; 6] = [
    Position::QB,
    Position::RB,
    Position::WR,
    Position::TE,
    Position::K,
    Position::DST,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Case-insensitive. Accepts the common defense/kicker aliases
    /// ("D/ST", "DEF", "D" -> DST, "PK" -> K).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" | "PK" => Some(Position::K),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::DST),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DST => "DST",
        }
    }

    /// Whether this position may start in a FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }

    /// Kickers and defenses, which are de-emphasized until late rounds.
    pub fn is_late_round(&self) -> bool {
        matches!(self, Position::K | Position::DST)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A starting-lineup slot: one of the fixed positions, or FLEX (RB/WR/TE).
///
/// Variant order is the canonical display order: QB, RB, WR, TE, FLEX, K, DST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    QB,
    RB,
    WR,
    TE,
    FLEX,
    K,
    DST,
}

/// Every slot, in canonical display order.
pub const ALL_SLOTS: [Slot; 7] = [
    Slot::QB,
    Slot::RB,
    Slot::WR,
    Slot::TE,
    Slot::FLEX,
    Slot::K,
    Slot::DST,
];

impl Slot {
    /// Parse a slot name ("QB", "FLEX", ...). Case-insensitive.
    pub fn from_str_slot(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("FLEX") {
            return Some(Slot::FLEX);
        }
        Position::from_str_pos(s).map(Slot::from)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Slot::QB => "QB",
            Slot::RB => "RB",
            Slot::WR => "WR",
            Slot::TE => "TE",
            Slot::FLEX => "FLEX",
            Slot::K => "K",
            Slot::DST => "DST",
        }
    }
}

impl From<Position> for Slot {
    fn from(pos: Position) -> Self {
        match pos {
            Position::QB => Slot::QB,
            Position::RB => Slot::RB,
            Position::WR => Slot::WR,
            Position::TE => Slot::TE,
            Position::K => Slot::K,
            Position::DST => Slot::DST,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A completed pick in the chronological draft log.
///
/// Field names are part of the snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    /// 1-based overall pick number.
    pub global_pick: usize,
    /// 1-based team slot that made the pick.
    pub team_slot: usize,
    /// Display name of the drafted player.
    pub player: String,
}
