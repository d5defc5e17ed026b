use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeTier {
    Reject,
    Low,
    Mid,
    High,
}

impl StakeTier {
    pub fn label(self) -> &'static str {
        match self {
            StakeTier::Reject => "reject",
            StakeTier::Low => "low",
            StakeTier::Mid => "mid",
            StakeTier::High => "high",
        }
    }

    /// Stake units configured for this tier; zero for `Reject`.
    pub fn stake(self, cfg: &EngineConfig) -> f64 {
        match self {
            StakeTier::Reject => 0.0,
            StakeTier::Low => cfg.stake_low,
            StakeTier::Mid => cfg.stake_mid,
            StakeTier::High => cfg.stake_high,
        }
    }
}

impl fmt::Display for StakeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn edge(prob: f64, fair_odd: f64) -> f64 {
    prob * fair_odd - 1.0
}

/// Buckets an edge into a tier.
///
/// Edges outside `[edge_min, edge_max)` and quoted odds outside
/// `[odd_min, odd_max]` reject. Inside the window the tier never decreases
/// as the edge grows.
pub fn stake_tier(edge: f64, quoted_odd: f64, cfg: &EngineConfig) -> StakeTier {
    let edge_ok = edge >= cfg.edge_min && edge < cfg.edge_max;
    let odd_ok = quoted_odd >= cfg.odd_min && quoted_odd <= cfg.odd_max;
    if !edge_ok || !odd_ok {
        return StakeTier::Reject;
    }

    if edge >= cfg.tier_high_from {
        StakeTier::High
    } else if edge >= cfg.tier_mid_from {
        StakeTier::Mid
    } else {
        StakeTier::Low
    }
}

/// Plain-language reading of an edge's sign.
pub fn verdict(edge: f64) -> &'static str {
    if edge > 0.0 {
        "value"
    } else if edge < 0.0 {
        "no value"
    } else {
        "neutral"
    }
}
