use crate::error::MissingRatingError;
use crate::snapshot::{PlayerIdentity, Surface};

/// Where the surface component of an effective rating came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSource {
    Surface,
    /// No rating for the requested surface; the general rating stood in.
    GeneralFallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRating {
    pub value: f64,
    pub source: SurfaceSource,
}

/// `(surface / general) * recency`: the surface-to-general ratio scales the
/// recency-weighted rating.
pub fn effective_rating(
    player: &PlayerIdentity,
    surface: Surface,
) -> Result<EffectiveRating, MissingRatingError> {
    let missing = |dimension| MissingRatingError {
        player: player.name.clone(),
        dimension,
    };

    let general = usable(player.general)
        .filter(|g| *g != 0.0)
        .ok_or_else(|| missing("general"))?;
    let recency = usable(player.recency).ok_or_else(|| missing("recency"))?;
    let (surface_rating, source) = match usable(player.surface_rating(surface)) {
        Some(r) => (r, SurfaceSource::Surface),
        None => (general, SurfaceSource::GeneralFallback),
    };

    Ok(EffectiveRating {
        value: surface_rating / general * recency,
        source,
    })
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
