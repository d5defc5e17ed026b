//! Tennis betting value engine: resolves quote-feed player names against an
//! Elo ratings snapshot, turns blended surface ratings into win probabilities,
//! strips bookmaker margin and buckets the resulting edge into stake tiers.

pub mod blend;
pub mod config;
pub mod elo;
pub mod error;
pub mod evaluate;
pub mod identity;
pub mod ledger;
pub mod matcher;
pub mod names;
pub mod odds;
pub mod quotes;
pub mod report;
pub mod snapshot;
pub mod snapshot_cache;
pub mod value;

pub use config::EngineConfig;
pub use error::{
    ConfigError, EvaluateError, InvalidOddsError, MissingRatingError, NotFoundError,
    ResolutionError,
};
pub use evaluate::{
    EvaluationResult, MatchEvaluation, MatchQuote, ResolvedMatch, Side, evaluate_match,
    evaluate_quote, evaluate_quotes,
};
pub use snapshot::{PlayerIdentity, RatingsSnapshot, Surface};
pub use value::StakeTier;
