// Valuation: composite ranks, rankings loading, and pick scoring.

pub mod rank;
pub mod rankings;
pub mod scoring;
