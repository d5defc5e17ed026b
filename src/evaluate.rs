use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::blend::{EffectiveRating, SurfaceSource, effective_rating};
use crate::config::EngineConfig;
use crate::elo::probability_pair;
use crate::error::{EvaluateError, ResolutionError};
use crate::identity::IdentityResolver;
use crate::odds::remove_margin;
use crate::snapshot::{PlayerIdentity, RatingsSnapshot, Surface};
use crate::value::{StakeTier, edge, stake_tier, verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// One matchup as delivered by the quote feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuote {
    pub player_a: String,
    pub player_b: String,
    #[serde(default)]
    pub odd_a: Option<f64>,
    #[serde(default)]
    pub odd_b: Option<f64>,
    pub surface: Surface,
}

impl MatchQuote {
    pub fn event_label(&self) -> String {
        format!("{} vs {}", self.player_a.trim(), self.player_b.trim())
    }
}

/// Both sides resolved against the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMatch<'a> {
    pub player_a: &'a PlayerIdentity,
    pub player_b: &'a PlayerIdentity,
    pub surface: Surface,
    pub odd_a: f64,
    pub odd_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub side: Side,
    pub player: String,
    pub effective_rating: f64,
    pub surface_fallback: bool,
    pub probability: f64,
    pub quoted_odd: f64,
    pub fair_odd: f64,
    pub edge: f64,
    pub tier: StakeTier,
}

impl EvaluationResult {
    pub fn verdict(&self) -> &'static str {
        verdict(self.edge)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvaluation {
    pub surface: Surface,
    pub overround: f64,
    pub a: EvaluationResult,
    pub b: EvaluationResult,
}

impl MatchEvaluation {
    pub fn into_pair(self) -> (EvaluationResult, EvaluationResult) {
        (self.a, self.b)
    }

    pub fn sides(&self) -> [&EvaluationResult; 2] {
        [&self.a, &self.b]
    }

    pub fn event_label(&self) -> String {
        format!("{} vs {}", self.a.player, self.b.player)
    }
}

/// Resolves both tokens, failing on the first side that does not resolve.
/// `cfg` is assumed to have passed [`EngineConfig::validate`].
pub fn resolve_match<'a>(
    token_a: &str,
    token_b: &str,
    odd_a: f64,
    odd_b: f64,
    surface: Surface,
    snapshot: &'a RatingsSnapshot,
    cfg: &EngineConfig,
) -> Result<ResolvedMatch<'a>, ResolutionError> {
    let resolver = IdentityResolver::from_config(snapshot, cfg);
    let player_a = resolver
        .resolve_feed_name(token_a)
        .map_err(|source| ResolutionError {
            side: Side::A,
            source,
        })?;
    let player_b = resolver
        .resolve_feed_name(token_b)
        .map_err(|source| ResolutionError {
            side: Side::B,
            source,
        })?;
    Ok(ResolvedMatch {
        player_a,
        player_b,
        surface,
        odd_a,
        odd_b,
    })
}

pub fn evaluate_resolved(
    resolved: &ResolvedMatch<'_>,
    cfg: &EngineConfig,
) -> Result<MatchEvaluation, EvaluateError> {
    let rating_a = effective_rating(resolved.player_a, resolved.surface)?;
    let rating_b = effective_rating(resolved.player_b, resolved.surface)?;
    let (p_a, p_b) = probability_pair(rating_a.value, rating_b.value, cfg.elo_scale);
    let fair = remove_margin(resolved.odd_a, resolved.odd_b)?;

    Ok(MatchEvaluation {
        surface: resolved.surface,
        overround: fair.overround,
        a: side_result(
            Side::A,
            resolved.player_a,
            rating_a,
            p_a,
            resolved.odd_a,
            fair.fair_odd_a,
            cfg,
        ),
        b: side_result(
            Side::B,
            resolved.player_b,
            rating_b,
            p_b,
            resolved.odd_b,
            fair.fair_odd_b,
            cfg,
        ),
    })
}

fn side_result(
    side: Side,
    player: &PlayerIdentity,
    rating: EffectiveRating,
    probability: f64,
    quoted_odd: f64,
    fair_odd: f64,
    cfg: &EngineConfig,
) -> EvaluationResult {
    let edge = edge(probability, fair_odd);
    EvaluationResult {
        side,
        player: player.name.clone(),
        effective_rating: rating.value,
        surface_fallback: rating.source == SurfaceSource::GeneralFallback,
        probability,
        quoted_odd,
        fair_odd,
        edge,
        tier: stake_tier(edge, quoted_odd, cfg),
    }
}

/// Full pipeline for one matchup against an immutable snapshot. The
/// configuration is validated first, so a bad threshold or window is reported
/// as such instead of as unresolved names or rejected tiers.
pub fn evaluate_match(
    token_a: &str,
    token_b: &str,
    odd_a: f64,
    odd_b: f64,
    surface: Surface,
    snapshot: &RatingsSnapshot,
    cfg: &EngineConfig,
) -> Result<MatchEvaluation, EvaluateError> {
    cfg.validate()?;
    let resolved = resolve_match(token_a, token_b, odd_a, odd_b, surface, snapshot, cfg)?;
    evaluate_resolved(&resolved, cfg)
}

/// Evaluates a feed quote, filling absent odds from the configured defaults.
pub fn evaluate_quote(
    quote: &MatchQuote,
    snapshot: &RatingsSnapshot,
    cfg: &EngineConfig,
) -> Result<MatchEvaluation, EvaluateError> {
    evaluate_match(
        &quote.player_a,
        &quote.player_b,
        quote.odd_a.unwrap_or(cfg.default_odd_a),
        quote.odd_b.unwrap_or(cfg.default_odd_b),
        quote.surface,
        snapshot,
        cfg,
    )
}

/// Evaluates independent matchups in parallel. Output order follows `quotes`.
pub fn evaluate_quotes(
    quotes: &[MatchQuote],
    snapshot: &RatingsSnapshot,
    cfg: &EngineConfig,
) -> Vec<Result<MatchEvaluation, EvaluateError>> {
    quotes
        .par_iter()
        .map(|quote| {
            let out = evaluate_quote(quote, snapshot, cfg);
            if let Err(err) = &out {
                tracing::warn!(event = %quote.event_label(), %err, "matchup skipped");
            }
            out
        })
        .collect()
}
