use serde::Serialize;

use crate::error::InvalidOddsError;

/// A two-way market with the bookmaker margin removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairOdds {
    pub overround: f64,
    pub fair_p_a: f64,
    pub fair_p_b: f64,
    pub fair_odd_a: f64,
    pub fair_odd_b: f64,
}

/// Proportional de-vig of a decimal odds pair.
pub fn remove_margin(odd_a: f64, odd_b: f64) -> Result<FairOdds, InvalidOddsError> {
    let invalid = |reason| InvalidOddsError {
        odd_a,
        odd_b,
        reason,
    };
    if !odd_a.is_finite() || !odd_b.is_finite() {
        return Err(invalid("odds must be finite"));
    }
    if odd_a <= 0.0 || odd_b <= 0.0 {
        return Err(invalid("odds must be positive"));
    }

    let raw_a = 1.0 / odd_a;
    let raw_b = 1.0 / odd_b;
    let overround = raw_a + raw_b;
    if overround <= 0.0 || !overround.is_finite() {
        return Err(invalid("implied probabilities do not sum to a usable overround"));
    }

    let fair_p_a = raw_a / overround;
    let fair_p_b = 1.0 - fair_p_a;
    Ok(FairOdds {
        overround,
        fair_p_a,
        fair_p_b,
        fair_odd_a: 1.0 / fair_p_a,
        fair_odd_b: 1.0 / fair_p_b,
    })
}
