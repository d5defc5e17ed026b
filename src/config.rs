use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::matcher::MatcherKind;

const ENV_PREFIX: &str = "TENNIS_EDGE_";

/// Tunables for resolution, probability and staking.
///
/// The edge and odd windows are sanity guardrails that suppress implausible
/// signals; they are not a staking theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub match_threshold: f64,
    pub matcher: MatcherKind,
    pub elo_scale: f64,
    pub edge_min: f64,
    pub edge_max: f64,
    pub odd_min: f64,
    pub odd_max: f64,
    /// Lowest edge assigned the `Mid` tier.
    pub tier_mid_from: f64,
    /// Lowest edge assigned the `High` tier.
    pub tier_high_from: f64,
    pub stake_low: f64,
    pub stake_mid: f64,
    pub stake_high: f64,
    pub default_odd_a: f64,
    pub default_odd_b: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.75,
            matcher: MatcherKind::Levenshtein,
            elo_scale: 400.0,
            edge_min: 0.03,
            edge_max: 0.275,
            odd_min: 1.30,
            odd_max: 5.00,
            tier_mid_from: 0.08,
            tier_high_from: 0.15,
            stake_low: 0.5,
            stake_mid: 1.0,
            stake_high: 2.0,
            default_odd_a: 1.80,
            default_odd_b: 1.80,
        }
    }
}

impl EngineConfig {
    /// Reads `TENNIS_EDGE_*` variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset keys keep their default. A set key that does not parse is an
    /// error; the result is validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        let num = |field: &'static str, slot: &mut f64| -> Result<(), ConfigError> {
            let key = format!("{ENV_PREFIX}{}", field.to_ascii_uppercase());
            if let Some(raw) = lookup(&key) {
                *slot = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::Unparsable { field, raw })?;
            }
            Ok(())
        };

        num("match_threshold", &mut cfg.match_threshold)?;
        num("elo_scale", &mut cfg.elo_scale)?;
        num("edge_min", &mut cfg.edge_min)?;
        num("edge_max", &mut cfg.edge_max)?;
        num("odd_min", &mut cfg.odd_min)?;
        num("odd_max", &mut cfg.odd_max)?;
        num("tier_mid_from", &mut cfg.tier_mid_from)?;
        num("tier_high_from", &mut cfg.tier_high_from)?;
        num("stake_low", &mut cfg.stake_low)?;
        num("stake_mid", &mut cfg.stake_mid)?;
        num("stake_high", &mut cfg.stake_high)?;
        num("default_odd_a", &mut cfg.default_odd_a)?;
        num("default_odd_b", &mut cfg.default_odd_b)?;

        if let Some(raw) = lookup(&format!("{ENV_PREFIX}MATCHER")) {
            cfg.matcher = MatcherKind::parse(&raw)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "match_threshold",
                value: self.match_threshold,
            });
        }
        for (field, value) in [
            ("elo_scale", self.elo_scale),
            ("odd_min", self.odd_min),
            ("default_odd_a", self.default_odd_a),
            ("default_odd_b", self.default_odd_b),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("stake_low", self.stake_low),
            ("stake_mid", self.stake_mid),
            ("stake_high", self.stake_high),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let chain = [
            ("edge_min", self.edge_min),
            ("tier_mid_from", self.tier_mid_from),
            ("tier_high_from", self.tier_high_from),
            ("edge_max", self.edge_max),
        ];
        ensure_ordered(&chain)?;
        ensure_ordered(&[("odd_min", self.odd_min), ("odd_max", self.odd_max)])?;
        Ok(())
    }
}

fn ensure_ordered(chain: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    for pair in chain.windows(2) {
        let (lower, lower_value) = pair[0];
        let (upper, upper_value) = pair[1];
        if !lower_value.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: lower,
                value: lower_value,
            });
        }
        if !upper_value.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: upper,
                value: upper_value,
            });
        }
        if lower_value > upper_value {
            return Err(ConfigError::Ordering {
                lower,
                lower_value,
                upper,
                upper_value,
            });
        }
    }
    Ok(())
}
