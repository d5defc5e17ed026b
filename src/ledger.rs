use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::evaluate::{MatchEvaluation, Side};
use crate::value::StakeTier;

/// The fields a bet ledger needs for one placed selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub selection: String,
    pub side: Side,
    pub odd: f64,
    pub stake: f64,
}

/// Entries for every side of `eval` that cleared the guardrails.
pub fn ledger_entries(
    eval: &MatchEvaluation,
    event: &str,
    cfg: &EngineConfig,
    now: DateTime<Utc>,
) -> Vec<LedgerEntry> {
    eval.sides()
        .into_iter()
        .filter(|side| side.tier != StakeTier::Reject)
        .map(|side| LedgerEntry {
            timestamp: now,
            event: event.to_string(),
            selection: side.player.clone(),
            side: side.side,
            odd: side.quoted_odd,
            stake: side.tier.stake(cfg),
        })
        .collect()
}

/// Appends entries as JSON lines, creating the file and its directory if needed.
pub fn append_ledger(path: &Path, entries: &[LedgerEntry]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("create ledger dir")?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open ledger {}", path.display()))?;
    for entry in entries {
        let line = serde_json::to_string(entry).context("serialize ledger entry")?;
        writeln!(file, "{line}").context("write ledger entry")?;
    }
    Ok(())
}

pub fn read_ledger(path: &Path) -> Result<Vec<LedgerEntry>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read ledger {}", path.display()))?;
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("ledger line {}", idx + 1))
        })
        .collect()
}
