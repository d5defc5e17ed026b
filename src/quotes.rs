use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::evaluate::MatchQuote;
use crate::snapshot::Surface;

#[derive(Debug, Deserialize)]
struct QuoteRow {
    #[serde(alias = "raw_name_a", alias = "playerA")]
    player_a: String,
    #[serde(alias = "raw_name_b", alias = "playerB")]
    player_b: String,
    #[serde(default, alias = "oddA")]
    odd_a: Value,
    #[serde(default, alias = "oddB")]
    odd_b: Value,
    surface: String,
}

/// Parses the match-quote feed: an array of rows or `{"matches": [...]}`.
///
/// Odds may be numbers or strings ("1.85", "1,85"); blank or missing odds stay
/// `None` so the caller's defaults apply at evaluation time.
pub fn parse_quotes_json(raw: &str) -> Result<Vec<MatchQuote>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let mut v: Value = serde_json::from_str(trimmed).context("invalid quotes json")?;
    if let Some(matches) = v.get_mut("matches") {
        v = matches.take();
    }
    let rows: Vec<QuoteRow> = serde_json::from_value(v).context("invalid quote rows")?;

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let surface: Surface = row
                .surface
                .parse()
                .with_context(|| format!("quote {idx}: bad surface"))?;
            Ok(MatchQuote {
                odd_a: parse_odd(&row.odd_a).with_context(|| format!("quote {idx}: bad odd_a"))?,
                odd_b: parse_odd(&row.odd_b).with_context(|| format!("quote {idx}: bad odd_b"))?,
                player_a: row.player_a,
                player_b: row.player_b,
                surface,
            })
        })
        .collect()
}

fn parse_odd(raw: &Value) -> Result<Option<f64>> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', ".");
            if cleaned.is_empty() || cleaned == "-" {
                return Ok(None);
            }
            cleaned
                .parse::<f64>()
                .map(Some)
                .with_context(|| format!("unparsable odd `{s}`"))
        }
        other => Err(anyhow::anyhow!("unexpected odd value {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_quotes_json;
    use crate::snapshot::Surface;

    #[test]
    fn parses_mixed_odd_formats() {
        let raw = r#"{"matches":[
            {"player_a":"Sinner J. (1)","player_b":"Alcaraz C. (2)","odd_a":1.75,"odd_b":"2,10","surface":"Hard"},
            {"raw_name_a":"Nadal R.","raw_name_b":"Ruud C.","odd_b":"","surface":"clay"}
        ]}"#;
        let quotes = parse_quotes_json(raw).expect("quotes should parse");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].odd_a, Some(1.75));
        assert_eq!(quotes[0].odd_b, Some(2.10));
        assert_eq!(quotes[0].surface, Surface::Hard);
        assert_eq!(quotes[1].odd_a, None);
        assert_eq!(quotes[1].odd_b, None);
        assert_eq!(quotes[1].surface, Surface::Clay);
    }

    #[test]
    fn bad_surface_names_the_row() {
        let raw = r#"[{"player_a":"A","player_b":"B","surface":"ice"}]"#;
        let err = parse_quotes_json(raw).unwrap_err();
        assert!(format!("{err:#}").contains("quote 0"));
    }

    #[test]
    fn null_is_empty() {
        assert!(parse_quotes_json("null").expect("null should parse").is_empty());
    }
}
