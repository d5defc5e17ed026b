use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use tennis_edge::evaluate::{MatchEvaluation, evaluate_quotes};
use tennis_edge::ledger::{append_ledger, ledger_entries};
use tennis_edge::quotes::parse_quotes_json;
use tennis_edge::report::{SkippedMatch, export_evaluations_xlsx};
use tennis_edge::snapshot::{RatingsSnapshot, parse_ratings_json};
use tennis_edge::snapshot_cache::{default_cache_path, load_cached_snapshot, save_snapshot};
use tennis_edge::EngineConfig;

const USAGE: &str = "usage: tennis_edge <ratings.json|-> <quotes.json> [--xlsx out.xlsx] [--ledger ledger.jsonl]";
const CACHE_MAX_AGE: Duration = Duration::from_secs(6 * 60 * 60);

struct Args {
    ratings: Option<PathBuf>,
    quotes: PathBuf,
    xlsx: Option<PathBuf>,
    ledger: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let cfg = EngineConfig::from_env().context("invalid TENNIS_EDGE_* configuration")?;

    let snapshot = load_snapshot(args.ratings.as_deref())?;
    tracing::info!(players = snapshot.len(), "ratings snapshot ready");

    let raw = fs::read_to_string(&args.quotes)
        .with_context(|| format!("read quotes {}", args.quotes.display()))?;
    let quotes = parse_quotes_json(&raw)?;

    let mut evaluations: Vec<MatchEvaluation> = Vec::new();
    let mut skipped = Vec::new();
    for (quote, outcome) in quotes.iter().zip(evaluate_quotes(&quotes, &snapshot, &cfg)) {
        match outcome {
            Ok(eval) => evaluations.push(eval),
            Err(err) => skipped.push(SkippedMatch {
                event: quote.event_label(),
                reason: err.to_string(),
            }),
        }
    }

    for eval in &evaluations {
        print_evaluation(eval);
    }
    for s in &skipped {
        println!("SKIP {}: {}", s.event, s.reason);
    }

    if let Some(path) = args.xlsx.as_deref() {
        let report = export_evaluations_xlsx(path, &evaluations, &skipped)?;
        tracing::info!(
            path = %path.display(),
            matchups = report.matchups,
            skipped = report.skipped,
            "workbook written"
        );
    }

    if let Some(path) = args.ledger.as_deref() {
        let now = Utc::now();
        let entries: Vec<_> = evaluations
            .iter()
            .flat_map(|eval| ledger_entries(eval, &eval.event_label(), &cfg, now))
            .collect();
        append_ledger(path, &entries)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "ledger updated");
    }

    Ok(())
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let ratings = it.next().context(USAGE)?;
    let quotes = it.next().context(USAGE)?;
    let mut xlsx = None;
    let mut ledger = None;
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--xlsx" => xlsx = Some(PathBuf::from(it.next().context(USAGE)?)),
            "--ledger" => ledger = Some(PathBuf::from(it.next().context(USAGE)?)),
            other => return Err(anyhow::anyhow!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(Args {
        ratings: (ratings != "-").then(|| PathBuf::from(ratings)),
        quotes: PathBuf::from(quotes),
        xlsx,
        ledger,
    })
}

/// `-` reuses the cached snapshot; a path loads it and refreshes the cache.
fn load_snapshot(path: Option<&Path>) -> Result<RatingsSnapshot> {
    let cache_path = default_cache_path();
    let Some(path) = path else {
        let cache_path = cache_path.context("no cache directory available")?;
        return load_cached_snapshot(&cache_path, CACHE_MAX_AGE)
            .context("no fresh cached ratings; pass a ratings file");
    };

    let raw = fs::read_to_string(path).with_context(|| format!("read ratings {}", path.display()))?;
    let snapshot = parse_ratings_json(&raw)?;
    if let Some(cache_path) = cache_path
        && let Err(err) = save_snapshot(&cache_path, &snapshot)
    {
        tracing::warn!(%err, "could not cache ratings snapshot");
    }
    Ok(snapshot)
}

fn print_evaluation(eval: &MatchEvaluation) {
    println!(
        "{} [{}] overround {:.4}",
        eval.event_label(),
        eval.surface,
        eval.overround
    );
    for side in eval.sides() {
        println!(
            "  {} {:<28} p={:>6.2}%  odd={:>5.2}  fair={:>6.3}  edge={:>+7.2}%  {:<8} {}",
            side.side,
            side.player,
            side.probability * 100.0,
            side.quoted_odd,
            side.fair_odd,
            side.edge * 100.0,
            side.verdict(),
            side.tier
        );
    }
}
