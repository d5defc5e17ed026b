//! Failure kinds surfaced by the evaluation engine.

use thiserror::Error;

use crate::evaluate::Side;

/// A name token with no sufficiently similar reference identity.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("no player matches `{token}`")]
pub struct NotFoundError {
    pub token: String,
}

/// A resolved identity lacks a rating dimension the blend needs.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{player} has no usable {dimension} rating")]
pub struct MissingRatingError {
    pub player: String,
    pub dimension: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid odds {odd_a}/{odd_b}: {reason}")]
pub struct InvalidOddsError {
    pub odd_a: f64,
    pub odd_b: f64,
    pub reason: &'static str,
}

/// One side of a matchup failed to resolve.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("side {side} unresolved: {source}")]
pub struct ResolutionError {
    pub side: Side,
    #[source]
    pub source: NotFoundError,
}

/// Everything that can abort a single matchup evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluateError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    MissingRating(#[from] MissingRatingError),

    #[error(transparent)]
    InvalidOdds(#[from] InvalidOddsError),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    Ordering {
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    #[error("{field} is not a number: `{raw}`")]
    Unparsable { field: &'static str, raw: String },

    #[error("unknown matcher `{0}`, expected levenshtein or jaro_winkler")]
    UnknownMatcher(String),
}
