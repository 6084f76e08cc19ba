// Pick value and risk scoring.
//
// Value blends the composite rank with how badly the requesting team still
// needs the player's position. Risk counts qualitative tags.

use crate::draft::pick::{Position, Slot};
use crate::draft::player::Player;
use crate::draft::roster::{filled_count, RosterSlotConfig, StarterAssignment};

/// Tags that offset risk.
pub const SAFE_TAGS: &[&str] = &["established", "young", "usage", "role", "dual_threat"];

/// Tags that add risk.
pub const RISKY_TAGS: &[&str] = &[
    "rookie",
    "injury",
    "age",
    "boom_bust",
    "volatility",
    "off_field",
    "contract",
    "committee",
    "volatile",
];

/// First round in which kickers and defenses get their late-round multiplier.
pub const LATE_ROUND: usize = 10;

const EARLY_KICKER_MULTIPLIER: f64 = 0.4;
const LATE_KICKER_MULTIPLIER: f64 = 0.9;
const STARTER_NEED_BONUS: f64 = 0.6;
const FLEX_NEED_BONUS: f64 = 0.3;
const TE_TOP_TIER_BONUS: f64 = 2.0;
const WR_BONUS: f64 = 1.0;

/// Multiplier reflecting how much the team still needs this position.
///
/// K/DST: 0.4 before round 10, 0.9 after. Others start at 1.0, +0.6 when the
/// position's own starters are unfilled, else +0.3 when FLEX is unfilled and
/// the position is FLEX-eligible.
pub fn need_multiplier(
    config: &RosterSlotConfig,
    roster: &[StarterAssignment<'_>],
    position: Position,
    round: usize,
) -> f64 {
    if position.is_late_round() {
        return if round < LATE_ROUND {
            EARLY_KICKER_MULTIPLIER
        } else {
            LATE_KICKER_MULTIPLIER
        };
    }

    let slot = Slot::from(position);
    let mut multiplier = 1.0;
    if filled_count(roster, slot) < config.get(slot) {
        multiplier += STARTER_NEED_BONUS;
    } else if position.is_flex_eligible() && filled_count(roster, Slot::FLEX) < config.get(Slot::FLEX) {
        multiplier += FLEX_NEED_BONUS;
    }
    multiplier
}

fn is_top_tier(tier: &str) -> bool {
    let tier = tier.to_lowercase();
    tier.contains("tier 1") || tier.contains("tier 1-2")
}

/// Value of drafting `player` now for the team whose annotated roster is
/// `roster`. Higher is better.
///
/// The WR bump applies regardless of the configured scoring format.
pub fn value_score(
    player: &Player,
    config: &RosterSlotConfig,
    roster: &[StarterAssignment<'_>],
    round: usize,
) -> f64 {
    let mut base = -player.composite_rank;
    if player.position == Position::TE && is_top_tier(&player.tier) {
        base += TE_TOP_TIER_BONUS;
    }
    if player.position == Position::WR {
        base += WR_BONUS;
    }
    base * need_multiplier(config, roster, player.position, round)
}

/// Risky tags minus safe tags, floored at zero. Higher is riskier.
pub fn risk_score(player: &Player) -> u32 {
    let tags = player.tag_set();
    let safe = tags.iter().filter(|t| SAFE_TAGS.contains(*t)).count();
    let risky = tags.iter().filter(|t| RISKY_TAGS.contains(*t)).count();
    risky.saturating_sub(safe) as u32
}
