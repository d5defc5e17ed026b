use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::names::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Indoor,
}

impl Surface {
    pub fn label(self) -> &'static str {
        match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Indoor => "indoor",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Surface {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hard" | "h" | "helo" => Ok(Surface::Hard),
            "clay" | "c" | "celo" => Ok(Surface::Clay),
            "grass" | "g" | "gelo" => Ok(Surface::Grass),
            "indoor" | "i" | "ielo" | "carpet" => Ok(Surface::Indoor),
            other => Err(anyhow::anyhow!("unknown surface `{other}`")),
        }
    }
}

impl TryFrom<String> for Surface {
    type Error = anyhow::Error;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

/// One row of the ratings reference table.
///
/// Field aliases accept the column names of the Tennis Abstract Elo report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    #[serde(default, alias = "Player", alias = "player")]
    pub name: String,
    #[serde(default, alias = "Elo", alias = "elo")]
    pub general: Option<f64>,
    #[serde(default, alias = "hElo", alias = "surface_hard")]
    pub hard: Option<f64>,
    #[serde(default, alias = "cElo", alias = "surface_clay")]
    pub clay: Option<f64>,
    #[serde(default, alias = "gElo", alias = "surface_grass")]
    pub grass: Option<f64>,
    #[serde(default, alias = "iElo", alias = "surface_indoor")]
    pub indoor: Option<f64>,
    #[serde(default, alias = "yElo", alias = "yelo")]
    pub recency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RatingRow", into = "RatingRow")]
pub struct PlayerIdentity {
    pub name: String,
    pub general: Option<f64>,
    pub surfaces: BTreeMap<Surface, f64>,
    pub recency: Option<f64>,
}

impl PlayerIdentity {
    pub fn surface_rating(&self, surface: Surface) -> Option<f64> {
        self.surfaces.get(&surface).copied()
    }
}

impl From<RatingRow> for PlayerIdentity {
    fn from(row: RatingRow) -> Self {
        let surfaces = [
            (Surface::Hard, row.hard),
            (Surface::Clay, row.clay),
            (Surface::Grass, row.grass),
            (Surface::Indoor, row.indoor),
        ]
        .into_iter()
        .filter_map(|(surface, value)| value.map(|v| (surface, v)))
        .collect();
        Self {
            name: row.name.trim().to_string(),
            general: row.general,
            surfaces,
            recency: row.recency,
        }
    }
}

impl From<PlayerIdentity> for RatingRow {
    fn from(player: PlayerIdentity) -> Self {
        RatingRow {
            hard: player.surface_rating(Surface::Hard),
            clay: player.surface_rating(Surface::Clay),
            grass: player.surface_rating(Surface::Grass),
            indoor: player.surface_rating(Surface::Indoor),
            name: player.name,
            general: player.general,
            recency: player.recency,
        }
    }
}

/// Immutable ratings reference. Refreshing means building a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct RatingsSnapshot {
    players: Vec<PlayerIdentity>,
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl RatingsSnapshot {
    /// Reference order is preserved; on duplicate keys the first player wins lookups.
    pub fn new(players: Vec<PlayerIdentity>) -> Self {
        let keys: Vec<String> = players.iter().map(|p| normalize(&p.name)).collect();
        let mut index = HashMap::with_capacity(keys.len());
        for (idx, key) in keys.iter().enumerate() {
            index.entry(key.clone()).or_insert(idx);
        }
        Self {
            players,
            keys,
            index,
        }
    }

    pub fn from_rows(rows: impl IntoIterator<Item = RatingRow>) -> Self {
        Self::new(
            rows.into_iter()
                .map(PlayerIdentity::from)
                .filter(|p| !p.name.is_empty())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerIdentity] {
        &self.players
    }

    /// Exact lookup by normalized key.
    pub fn by_key(&self, key: &str) -> Option<&PlayerIdentity> {
        self.index.get(key).map(|&idx| &self.players[idx])
    }

    /// Normalized keys paired with their players, in reference order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PlayerIdentity)> {
        self.keys.iter().map(String::as_str).zip(self.players.iter())
    }
}

/// Parses a ratings table: an array of rows, `{"players": [...]}`, or an
/// object keyed by canonical player name.
pub fn parse_ratings_json(raw: &str) -> Result<RatingsSnapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(RatingsSnapshot::default());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid ratings json")?;

    let rows: Vec<RatingRow> = match v {
        Value::Array(rows) => {
            serde_json::from_value(Value::Array(rows)).context("invalid ratings rows")?
        }
        Value::Object(mut map) => match map.remove("players") {
            Some(players @ Value::Array(_)) => {
                serde_json::from_value(players).context("invalid ratings rows")?
            }
            _ => map
                .into_iter()
                .map(|(name, row)| {
                    let mut row: RatingRow = serde_json::from_value(row)
                        .with_context(|| format!("invalid ratings row for {name}"))?;
                    row.name = name;
                    Ok(row)
                })
                .collect::<Result<_>>()?,
        },
        _ => return Err(anyhow::anyhow!("ratings json must be an array or object")),
    };

    let snapshot = RatingsSnapshot::from_rows(rows);
    tracing::debug!(players = snapshot.len(), "parsed ratings snapshot");
    Ok(snapshot)
}
