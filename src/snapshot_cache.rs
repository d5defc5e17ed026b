use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::snapshot::{PlayerIdentity, RatingsSnapshot};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "tennis_edge";
const CACHE_FILE: &str = "ratings.json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    fetched_at: u64,
    players: Vec<PlayerIdentity>,
}

/// Writes the snapshot atomically (tmp file + rename).
pub fn save_snapshot(path: &Path, snapshot: &RatingsSnapshot) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create ratings cache dir")?;
    }
    let cache = CacheFile {
        version: CACHE_VERSION,
        fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        players: snapshot.players().to_vec(),
    };
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(&cache).context("serialize ratings cache")?;
    fs::write(&tmp, json).context("write ratings cache")?;
    fs::rename(&tmp, path).context("swap ratings cache")?;
    Ok(())
}

/// A previously saved snapshot, if present, readable, current-version and
/// younger than `max_age`.
pub fn load_cached_snapshot(path: &Path, max_age: Duration) -> Option<RatingsSnapshot> {
    let raw = fs::read_to_string(path).ok()?;
    let cache = serde_json::from_str::<CacheFile>(&raw).ok()?;
    if cache.version != CACHE_VERSION {
        return None;
    }
    let now = system_time_to_secs(SystemTime::now())?;
    if now.saturating_sub(cache.fetched_at) > max_age.as_secs() {
        tracing::debug!(path = %path.display(), "ratings cache expired");
        return None;
    }
    Some(RatingsSnapshot::new(cache.players))
}

pub fn default_cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use super::{CACHE_VERSION, CacheFile, load_cached_snapshot, save_snapshot, system_time_to_secs};
    use crate::snapshot::{PlayerIdentity, RatingsSnapshot, Surface};

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = system_time_to_secs(SystemTime::now()).unwrap_or_default();
        std::env::temp_dir()
            .join(format!("tennis_edge_cache_{}_{nanos}_{name}", std::process::id()))
            .join("ratings.json")
    }

    fn sample() -> RatingsSnapshot {
        RatingsSnapshot::new(vec![PlayerIdentity {
            name: "Casper Ruud".to_string(),
            general: Some(1950.0),
            surfaces: BTreeMap::from([(Surface::Clay, 2000.0)]),
            recency: Some(1940.0),
        }])
    }

    fn write_cache(path: &PathBuf, version: u32, fetched_at: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let cache = CacheFile {
            version,
            fetched_at,
            players: sample().players().to_vec(),
        };
        fs::write(path, serde_json::to_string(&cache).unwrap()).unwrap();
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let path = scratch_path("roundtrip");
        save_snapshot(&path, &sample()).expect("cache should save");
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_cached_snapshot(&path, Duration::from_secs(60)).expect("fresh cache");
        assert_eq!(loaded.players(), sample().players());
        assert!(loaded.by_key("casper ruud").is_some());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn other_version_is_ignored() {
        let path = scratch_path("version");
        let now = system_time_to_secs(SystemTime::now()).unwrap();
        write_cache(&path, CACHE_VERSION + 1, now);
        assert!(load_cached_snapshot(&path, Duration::from_secs(60)).is_none());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn stale_cache_is_ignored() {
        let path = scratch_path("stale");
        let now = system_time_to_secs(SystemTime::now()).unwrap();
        write_cache(&path, CACHE_VERSION, now - 7_200);
        assert!(load_cached_snapshot(&path, Duration::from_secs(3_600)).is_none());
        assert!(load_cached_snapshot(&path, Duration::from_secs(86_400)).is_some());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_none() {
        assert!(load_cached_snapshot(&scratch_path("missing"), Duration::from_secs(60)).is_none());
    }
}
