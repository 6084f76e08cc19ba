// Composite rank aggregation across expert ranking sources.
//
// Three weighted sources are blended with a renormalized weighted average;
// the generic consensus rank is only a fallback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank assigned to players with no usable source rank. Sorts last.
pub const UNRANKED: f64 = 9999.0;

const ESPN_WEIGHT: f64 = 0.5;
const FP_WEIGHT: f64 = 0.3;
const DS_WEIGHT: f64 = 0.2;

/// Raw per-source ranks for a player. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRanks {
    /// Primary expert rank (ESPN).
    pub espn: Option<f64>,
    /// Expert consensus rank (FantasyPros ECR).
    pub fp: Option<f64>,
    /// Aggregator rank.
    pub ds: Option<f64>,
    /// Generic consensus rank, used only when none of the above exist.
    pub consensus: Option<f64>,
}

/// Identifies one of the rank sources for live edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSource {
    Espn,
    Fp,
    Ds,
    Consensus,
}

impl RankSource {
    /// Parse a source name as typed at the prompt (`espn|fp|ds|consensus`).
    pub fn from_str_source(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "espn" => Some(RankSource::Espn),
            "fp" => Some(RankSource::Fp),
            "ds" => Some(RankSource::Ds),
            "consensus" => Some(RankSource::Consensus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankSource::Espn => "espn",
            RankSource::Fp => "fp",
            RankSource::Ds => "ds",
            RankSource::Consensus => "consensus",
        }
    }
}

impl fmt::Display for RankSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl SourceRanks {
    /// Overwrite a single source rank.
    pub fn set(&mut self, source: RankSource, value: f64) {
        match source {
            RankSource::Espn => self.espn = Some(value),
            RankSource::Fp => self.fp = Some(value),
            RankSource::Ds => self.ds = Some(value),
            RankSource::Consensus => self.consensus = Some(value),
        }
    }
}

/// Compute the composite rank (lower is better).
///
/// Weighted average of the present ESPN/FP/DS ranks with weights
/// 0.5/0.3/0.2 renormalized over whichever are present. Falls back to the
/// consensus rank, then to [`UNRANKED`].
pub fn composite_rank(ranks: &SourceRanks) -> f64 {
    let weighted = [
        (ranks.espn, ESPN_WEIGHT),
        (ranks.fp, FP_WEIGHT),
        (ranks.ds, DS_WEIGHT),
    ];

    let (sum, weight_sum) = weighted
        .iter()
        .filter_map(|&(rank, w)| rank.map(|r| (r * w, w)))
        .fold((0.0, 0.0), |(s, ws), (rw, w)| (s + rw, ws + w));

    if weight_sum > 0.0 {
        return sum / weight_sum;
    }

    ranks.consensus.unwrap_or(UNRANKED)
}
