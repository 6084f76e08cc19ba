// Snake draft pick order.

use serde::{Deserialize, Serialize};

/// One turn in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSlot {
    /// 1-based round number.
    pub round: usize,
    /// 1-based position within the round, in the order picks are made.
    pub pick_in_round: usize,
    /// 1-based overall pick number.
    pub overall: usize,
    /// 1-based team slot on the clock.
    pub team_slot: usize,
}

/// Build the full snake order: odd rounds run team 1..=N, even rounds N..=1.
///
/// Returns `teams * rounds` entries, indexed by `overall - 1`.
pub fn snake_order(teams: usize, rounds: usize) -> Vec<PickSlot> {
    let mut order = Vec::with_capacity(teams * rounds);
    let mut overall = 1;
    for round in 1..=rounds {
        for pick_in_round in 1..=teams {
            let team_slot = if round % 2 == 1 {
                pick_in_round
            } else {
                teams - pick_in_round + 1
            };
            order.push(PickSlot {
                round,
                pick_in_round,
                overall,
                team_slot,
            });
            overall += 1;
        }
    }
    order
}
