use crate::config::EngineConfig;
use crate::error::NotFoundError;
use crate::matcher::{Matcher, MatcherKind};
use crate::names::{clean_feed_name, normalize, reorder};
use crate::snapshot::{PlayerIdentity, RatingsSnapshot};

/// Maps free-form name tokens onto players of one ratings snapshot.
pub struct IdentityResolver<'a, M: Matcher = MatcherKind> {
    snapshot: &'a RatingsSnapshot,
    matcher: M,
    threshold: f64,
}

impl<'a> IdentityResolver<'a> {
    pub fn from_config(snapshot: &'a RatingsSnapshot, cfg: &EngineConfig) -> Self {
        Self::new(snapshot, cfg.matcher, cfg.match_threshold)
    }
}

impl<'a, M: Matcher> IdentityResolver<'a, M> {
    pub fn new(snapshot: &'a RatingsSnapshot, matcher: M, threshold: f64) -> Self {
        Self {
            snapshot,
            matcher,
            threshold,
        }
    }

    /// Exact match on the normalized token, then the most similar reference
    /// name if it scores at least the threshold. Equal scores keep the player
    /// listed first in the snapshot.
    pub fn resolve(&self, token: &str) -> Result<&'a PlayerIdentity, NotFoundError> {
        let key = normalize(token);
        let keys = usable_keys(std::slice::from_ref(&key));
        self.exact(&keys)
            .or_else(|| self.fuzzy(token, &keys))
            .ok_or_else(|| not_found(token))
    }

    /// Like [`resolve`](Self::resolve) for tokens straight off the quote feed:
    /// scraping noise is stripped first, and both the given and the reordered
    /// name orientation are tried. Between the exact and fuzzy steps, the
    /// abbreviated feed forms "Sinner J." and a bare "Sinner" are accepted
    /// when exactly one reference player fits.
    pub fn resolve_feed_name(&self, raw: &str) -> Result<&'a PlayerIdentity, NotFoundError> {
        let cleaned = clean_feed_name(raw);
        let candidates = [normalize(&cleaned), normalize(&reorder(&cleaned))];
        let keys = usable_keys(&candidates);
        self.exact(&keys)
            .or_else(|| keys.first().and_then(|key| self.abbreviated(key)))
            .or_else(|| self.fuzzy(raw, &keys))
            .ok_or_else(|| not_found(raw))
    }

    fn exact(&self, keys: &[&str]) -> Option<&'a PlayerIdentity> {
        keys.iter().find_map(|k| self.snapshot.by_key(k))
    }

    fn abbreviated(&self, key: &str) -> Option<&'a PlayerIdentity> {
        let tokens: Vec<&str> = key
            .split(' ')
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty())
            .collect();
        let (surname, initial) = match tokens.as_slice() {
            [only] if !is_initial(only) => (&tokens[..], None),
            [rest @ .., last] if is_initial(last) && !rest.is_empty() => (rest, last.chars().next()),
            [first, rest @ ..] if is_initial(first) && !rest.is_empty() => (rest, first.chars().next()),
            _ => return None,
        };

        let fits = |reference: &str| {
            let ref_tokens: Vec<&str> = reference.split(' ').collect();
            match initial {
                None => ref_tokens.contains(&surname[0]),
                Some(initial) => {
                    ref_tokens.len() > surname.len()
                        && ref_tokens.ends_with(surname)
                        && ref_tokens[0].starts_with(initial)
                }
            }
        };
        let mut hits = self
            .snapshot
            .entries()
            .filter(|(reference, _)| fits(*reference))
            .map(|(_, player)| player);
        let player = hits.next()?;
        if hits.next().is_some() {
            return None;
        }
        tracing::debug!(key, matched = %player.name, "abbreviated name match");
        Some(player)
    }

    fn fuzzy(&self, token: &str, keys: &[&str]) -> Option<&'a PlayerIdentity> {
        if keys.is_empty() {
            return None;
        }
        let mut best: Option<(&'a PlayerIdentity, f64)> = None;
        for (reference_key, player) in self.snapshot.entries() {
            let score = keys
                .iter()
                .map(|k| self.matcher.similarity(k, reference_key))
                .fold(f64::NEG_INFINITY, f64::max);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((player, score));
            }
        }

        match best {
            Some((player, score)) if score >= self.threshold => {
                tracing::debug!(token, matched = %player.name, score, "fuzzy name match");
                Some(player)
            }
            _ => None,
        }
    }
}

fn not_found(token: &str) -> NotFoundError {
    NotFoundError {
        token: token.to_string(),
    }
}

/// Non-empty keys, deduplicated, in the order given.
fn usable_keys(keys: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(keys.len());
    for key in keys.iter().map(String::as_str) {
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(char::is_alphabetic) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::IdentityResolver;
    use crate::matcher::{JaroWinkler, Levenshtein};
    use crate::snapshot::{PlayerIdentity, RatingsSnapshot};

    fn player(name: &str) -> PlayerIdentity {
        PlayerIdentity {
            name: name.to_string(),
            general: Some(2000.0),
            surfaces: BTreeMap::new(),
            recency: Some(2000.0),
        }
    }

    fn snapshot() -> RatingsSnapshot {
        RatingsSnapshot::new(vec![
            player("Roger Federer"),
            player("Rafael Nadal"),
            player("Félix Auger-Aliassime"),
        ])
    }

    #[test]
    fn normalized_token_hits_exactly() {
        let snap = snapshot();
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.75);
        let a = resolver.resolve("roger   FEDERER").expect("resolves");
        let b = resolver.resolve("Roger Federer").expect("resolves");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn typo_falls_back_to_fuzzy() {
        let snap = snapshot();
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.75);
        assert_eq!(resolver.resolve("Rogger Federer").unwrap().name, "Roger Federer");
        assert!(resolver.resolve("Totally Unrelated Name").is_err());
    }

    #[test]
    fn surname_and_initial_feed_forms_resolve() {
        let snap = RatingsSnapshot::new(vec![
            player("Carlos Alcaraz"),
            player("Jannik Sinner"),
            player("Rafael Nadal"),
        ]);
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.75);
        let name = |raw: &str| resolver.resolve_feed_name(raw).map(|p| p.name.as_str());
        assert_eq!(name("Sinner J. (1)"), Ok("Jannik Sinner"));
        assert_eq!(name("Nadal R."), Ok("Rafael Nadal"));
        assert_eq!(name("R. Nadal"), Ok("Rafael Nadal"));
        assert_eq!(name("Alcaraz"), Ok("Carlos Alcaraz"));
        assert_eq!(name("sinner"), Ok("Jannik Sinner"));
        assert!(name("Nadal X.").is_err());

        // Plain resolution keeps to exact and fuzzy matching.
        assert!(resolver.resolve("Alcaraz").is_err());
    }

    #[test]
    fn ambiguous_surname_needs_an_initial() {
        let snap = RatingsSnapshot::new(vec![player("Alexander Zverev"), player("Mischa Zverev")]);
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.75);
        assert!(resolver.resolve_feed_name("Zverev").is_err());
        assert_eq!(
            resolver.resolve_feed_name("Zverev M.").unwrap().name,
            "Mischa Zverev"
        );
    }

    #[test]
    fn threshold_is_inclusive_and_configurable() {
        let snap = snapshot();
        let strict = IdentityResolver::new(&snap, Levenshtein, 0.99);
        assert!(strict.resolve("Rogger Federer").is_err());
        let any = IdentityResolver::new(&snap, JaroWinkler, 0.0);
        assert!(any.resolve("zzz").is_ok());
    }

    #[test]
    fn feed_names_are_cleaned_and_reordered() {
        let snap = snapshot();
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.75);
        assert_eq!(
            resolver.resolve_feed_name("Federer Roger (3)").unwrap().name,
            "Roger Federer"
        );
        assert_eq!(
            resolver.resolve_feed_name("Auger-Aliassime - Felix Profile").unwrap().name,
            "Félix Auger-Aliassime"
        );
        assert_eq!(
            resolver.resolve_feed_name("Rafael Nadal").unwrap().name,
            "Rafael Nadal"
        );
    }

    #[test]
    fn empty_token_is_not_found() {
        let snap = snapshot();
        let resolver = IdentityResolver::new(&snap, Levenshtein, 0.0);
        let err = resolver.resolve("   ").unwrap_err();
        assert_eq!(err.token, "   ");
    }
}
