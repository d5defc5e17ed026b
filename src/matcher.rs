use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::error::ConfigError;

/// String similarity in `[0, 1]`, 1 meaning identical.
///
/// Both arguments are already normalized keys.
pub trait Matcher: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Matcher for Levenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        normalized_levenshtein(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl Matcher for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler(a, b)
    }
}

/// Configurable choice of similarity routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Levenshtein,
    JaroWinkler,
}

impl MatcherKind {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "levenshtein" | "lev" => Ok(Self::Levenshtein),
            "jaro_winkler" | "jw" => Ok(Self::JaroWinkler),
            _ => Err(ConfigError::UnknownMatcher(raw.trim().to_string())),
        }
    }
}

impl Matcher for MatcherKind {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            Self::Levenshtein => Levenshtein.similarity(a, b),
            Self::JaroWinkler => JaroWinkler.similarity(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JaroWinkler, Levenshtein, Matcher, MatcherKind};

    #[test]
    fn identical_keys_score_one() {
        assert!((Levenshtein.similarity("roger federer", "roger federer") - 1.0).abs() < 1e-12);
        assert!((JaroWinkler.similarity("roger federer", "roger federer") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_typo_stays_high() {
        let score = Levenshtein.similarity("rogger federer", "roger federer");
        assert!(score > 0.9, "score was {score}");
    }

    #[test]
    fn unrelated_names_score_low() {
        let score = Levenshtein.similarity("totally unrelated name", "roger federer");
        assert!(score < 0.5, "score was {score}");
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!(MatcherKind::parse("Jaro-Winkler").unwrap(), MatcherKind::JaroWinkler);
        assert_eq!(MatcherKind::parse(" lev ").unwrap(), MatcherKind::Levenshtein);
        assert!(MatcherKind::parse("soundex").is_err());
    }
}
