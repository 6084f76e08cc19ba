// Starting-lineup slot configuration, starter assignment, and roster needs.

use std::collections::BTreeMap;
use std::fmt;

use super::pick::{Position, Slot, STARTER_ORDER};
use super::player::Player;

/// Number of starters required per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlotConfig {
    counts: BTreeMap<Slot, usize>,
}

impl RosterSlotConfig {
    /// The standard lineup: QB 1, RB 2, WR 2, TE 1, FLEX 1, K 1, DST 1.
    pub fn standard() -> Self {
        let counts = [
            (Slot::QB, 1),
            (Slot::RB, 2),
            (Slot::WR, 2),
            (Slot::TE, 1),
            (Slot::FLEX, 1),
            (Slot::K, 1),
            (Slot::DST, 1),
        ]
        .into_iter()
        .collect();
        RosterSlotConfig { counts }
    }

    /// Standard lineup with the given slots overridden.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (Slot, usize)>,
    {
        let mut config = Self::standard();
        for (slot, count) in overrides {
            config.counts.insert(slot, count);
        }
        config
    }

    /// Required starters for a slot (0 if the slot is not configured).
    pub fn get(&self, slot: Slot) -> usize {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    /// Configured slots and counts in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    /// Total starters across all slots.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Default for RosterSlotConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for RosterSlotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(s, c)| format!("{s}:{c}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A drafted player annotated with the starting slot they fill, if any.
#[derive(Debug, Clone, Copy)]
pub struct StarterAssignment<'a> {
    pub player: &'a Player,
    /// `None` means bench.
    pub slot: Option<Slot>,
}

/// Assign starting slots to a team's players, in draft order.
///
/// Fixed positions are filled first (QB, RB, WR, TE, K, DST), each taking the
/// earliest-drafted players at exactly that position. FLEX then takes the
/// earliest remaining RB/WR/TE. Everyone else is bench. The input is not
/// modified; a fresh view is returned.
pub fn assign_starters<'a>(
    players: &[&'a Player],
    config: &RosterSlotConfig,
) -> Vec<StarterAssignment<'a>> {
    let mut view: Vec<StarterAssignment<'a>> = players
        .iter()
        .map(|&player| StarterAssignment { player, slot: None })
        .collect();

    for pos in STARTER_ORDER {
        fill_slot(&mut view, Slot::from(pos), config.get(Slot::from(pos)), |p| p == pos);
    }
    fill_slot(&mut view, Slot::FLEX, config.get(Slot::FLEX), |p| p.is_flex_eligible());

    view
}

fn fill_slot(
    view: &mut [StarterAssignment<'_>],
    slot: Slot,
    required: usize,
    eligible: impl Fn(Position) -> bool,
) {
    let mut filled = 0;
    for entry in view.iter_mut() {
        if filled >= required {
            break;
        }
        if entry.slot.is_none() && eligible(entry.player.position) {
            entry.slot = Some(slot);
            filled += 1;
        }
    }
}

/// Number of assignments occupying `slot`.
pub fn filled_count(assignments: &[StarterAssignment<'_>], slot: Slot) -> usize {
    assignments.iter().filter(|a| a.slot == Some(slot)).count()
}

/// Starters still needed per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterNeeds {
    remaining: BTreeMap<Slot, usize>,
}

impl RosterNeeds {
    /// Remaining starters for a slot.
    pub fn get(&self, slot: Slot) -> usize {
        self.remaining.get(&slot).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.remaining.values().sum()
    }

    /// True once every configured slot is filled.
    pub fn is_complete(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.remaining.iter().map(|(&s, &n)| (s, n))
    }
}

impl fmt::Display for RosterNeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .filter(|&(_, n)| n > 0)
            .map(|(s, n)| format!("{s}:{n}"))
            .collect();
        if parts.is_empty() {
            write!(f, "All starters filled")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Needs derived from an existing starter assignment.
pub fn needs_from_assignments(
    assignments: &[StarterAssignment<'_>],
    config: &RosterSlotConfig,
) -> RosterNeeds {
    let remaining = config
        .iter()
        .map(|(slot, required)| {
            let have = filled_count(assignments, slot);
            (slot, required.saturating_sub(have))
        })
        .collect();
    RosterNeeds { remaining }
}

/// How many starters remain to be filled for each slot.
pub fn needs_for_roster(players: &[&Player], config: &RosterSlotConfig) -> RosterNeeds {
    needs_from_assignments(&assign_starters(players, config), config)
}
