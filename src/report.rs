use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::evaluate::{EvaluationResult, MatchEvaluation};

pub struct ExportReport {
    pub matchups: usize,
    pub rows: usize,
    pub skipped: usize,
}

/// A matchup that could not be evaluated, with the reason shown to the user.
pub struct SkippedMatch {
    pub event: String,
    pub reason: String,
}

pub fn export_evaluations_xlsx(
    path: &Path,
    evaluations: &[MatchEvaluation],
    skipped: &[SkippedMatch],
) -> Result<ExportReport> {
    let mut eval_rows = vec![vec![
        "Event".to_string(),
        "Surface".to_string(),
        "Side".to_string(),
        "Player".to_string(),
        "Effective Rating".to_string(),
        "Surface Fallback".to_string(),
        "Probability".to_string(),
        "Quoted Odd".to_string(),
        "Fair Odd".to_string(),
        "Overround".to_string(),
        "Edge".to_string(),
        "Verdict".to_string(),
        "Tier".to_string(),
    ]];
    for eval in evaluations {
        let event = eval.event_label();
        for side in eval.sides() {
            eval_rows.push(evaluation_row(&event, eval, side));
        }
    }

    let mut skipped_rows = vec![vec!["Event".to_string(), "Reason".to_string()]];
    skipped_rows.extend(
        skipped
            .iter()
            .map(|s| vec![s.event.clone(), s.reason.clone()]),
    );

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Evaluations")?;
        write_rows(sheet, &eval_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Skipped")?;
        write_rows(sheet, &skipped_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        matchups: evaluations.len(),
        rows: eval_rows.len().saturating_sub(1),
        skipped: skipped.len(),
    })
}

fn evaluation_row(event: &str, eval: &MatchEvaluation, side: &EvaluationResult) -> Vec<String> {
    vec![
        event.to_string(),
        eval.surface.to_string(),
        side.side.to_string(),
        side.player.clone(),
        format!("{:.2}", side.effective_rating),
        if side.surface_fallback { "yes" } else { "" }.to_string(),
        format!("{:.4}", side.probability),
        format!("{:.2}", side.quoted_odd),
        format!("{:.3}", side.fair_odd),
        format!("{:.4}", eval.overround),
        format!("{:.4}", side.edge),
        side.verdict().to_string(),
        side.tier.to_string(),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{SkippedMatch, export_evaluations_xlsx};
    use crate::config::EngineConfig;
    use crate::evaluate::evaluate_match;
    use crate::snapshot::{PlayerIdentity, RatingsSnapshot, Surface};

    fn player(name: &str, general: f64, clay: f64, recency: f64) -> PlayerIdentity {
        PlayerIdentity {
            name: name.to_string(),
            general: Some(general),
            surfaces: BTreeMap::from([(Surface::Clay, clay)]),
            recency: Some(recency),
        }
    }

    #[test]
    fn workbook_holds_both_sides_and_skipped_rows() {
        let snap = RatingsSnapshot::new(vec![
            player("Casper Ruud", 1950.0, 2000.0, 1940.0),
            player("Holger Rune", 1900.0, 1950.0, 1930.0),
        ]);
        let cfg = EngineConfig::default();
        let eval = evaluate_match("Casper Ruud", "Holger Rune", 2.10, 1.75, Surface::Clay, &snap, &cfg)
            .expect("both players resolve");
        let skipped = vec![SkippedMatch {
            event: "Casper Ruud vs Unknown Qualifier".to_string(),
            reason: "side B unresolved".to_string(),
        }];

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "tennis_edge_report_{}_{nanos}.xlsx",
            std::process::id()
        ));

        let report = export_evaluations_xlsx(&path, &[eval], &skipped).expect("workbook saves");
        assert_eq!(report.matchups, 1);
        assert_eq!(report.rows, 2);
        assert_eq!(report.skipped, 1);
        let written = fs::metadata(&path).expect("workbook exists");
        assert!(written.len() > 0);
        let _ = fs::remove_file(&path);
    }
}
