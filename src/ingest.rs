use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{MadeAttempted, PeriodLabel, PeriodTable, TeamPeriodStats};

/// Parse one period's team table.
///
/// Accepts either an object keyed by team id (key order is kept) or an array of
/// records carrying their own `team_id`.
pub fn parse_period_json(raw: &str, label: PeriodLabel) -> AnalysisResult<PeriodTable> {
    let root: Value = serde_json::from_str(raw)?;
    let mut teams = Vec::new();
    match root {
        Value::Object(map) => {
            for (team_id, record) in map {
                match record {
                    Value::Object(record) => teams.push(parse_team_record(&team_id, &record)?),
                    other => return Err(malformed(&team_id, "record", &other)),
                }
            }
        }
        Value::Array(rows) => {
            for (idx, row) in rows.into_iter().enumerate() {
                let record = match row {
                    Value::Object(record) => record,
                    other => return Err(malformed(&format!("#{idx}"), "record", &other)),
                };
                let team_id = match record.get("team_id") {
                    Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(other) => return Err(malformed(&format!("#{idx}"), "team_id", other)),
                    None => return Err(missing(&format!("#{idx}"), "team_id")),
                };
                teams.push(parse_team_record(&team_id, &record)?);
            }
        }
        other => return Err(malformed("", "root", &other)),
    }
    PeriodTable::new(label, teams)
}

pub fn load_period_file(path: &Path, label: PeriodLabel) -> Result<PeriodTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read period file {}", path.display()))?;
    let table = parse_period_json(&raw, label)
        .with_context(|| format!("parse period file {}", path.display()))?;
    Ok(table)
}

fn parse_team_record(team_id: &str, record: &Map<String, Value>) -> AnalysisResult<TeamPeriodStats> {
    let name = match record.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(malformed(team_id, "name", other)),
        None => return Err(missing(team_id, "name")),
    };

    let gp_raw = record
        .get("gp")
        .or_else(|| record.get("games_played"))
        .ok_or_else(|| missing(team_id, "gp"))?;
    let games_played = parse_games(gp_raw).ok_or_else(|| malformed(team_id, "gp", gp_raw))?;

    let fg = shooting(team_id, record, "fgma")?;
    let ft = shooting(team_id, record, "ftma")?;
    let fgp = optional_number(team_id, record, "fgp")?.unwrap_or_else(|| fg.pct());
    let ftp = optional_number(team_id, record, "ftp")?.unwrap_or_else(|| ft.pct());

    Ok(TeamPeriodStats {
        team_id: team_id.to_string(),
        name,
        games_played,
        fg,
        ft,
        fgp,
        ftp,
        tpm: number(team_id, record, "tpm")?,
        pts: number(team_id, record, "pts")?,
        reb: number(team_id, record, "reb")?,
        ast: number(team_id, record, "ast")?,
        st: number(team_id, record, "st")?,
        blk: number(team_id, record, "blk")?,
        to: number(team_id, record, "to")?,
    })
}

fn shooting(team_id: &str, record: &Map<String, Value>, field: &str) -> AnalysisResult<MadeAttempted> {
    let raw = record.get(field).ok_or_else(|| missing(team_id, field))?;
    let Value::String(text) = raw else {
        return Err(malformed(team_id, field, raw));
    };
    text.parse::<MadeAttempted>()
        .map_err(|_| malformed(team_id, field, raw))
}

fn number(team_id: &str, record: &Map<String, Value>, field: &str) -> AnalysisResult<f64> {
    optional_number(team_id, record, field)?.ok_or_else(|| missing(team_id, field))
}

fn optional_number(
    team_id: &str,
    record: &Map<String, Value>,
    field: &str,
) -> AnalysisResult<Option<f64>> {
    let Some(raw) = record.get(field) else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(None);
    }
    parse_number(raw)
        .map(Some)
        .ok_or_else(|| malformed(team_id, field, raw))
}

fn parse_number(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        // The upstream feed copies XML text, so numbers often arrive quoted.
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn parse_games(raw: &Value) -> Option<u32> {
    match raw {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn missing(team_id: &str, field: &str) -> AnalysisError {
    AnalysisError::MissingCategory {
        team_id: team_id.to_string(),
        field: field.to_string(),
    }
}

fn malformed(team_id: &str, field: &str, raw: &Value) -> AnalysisError {
    AnalysisError::MalformedValue {
        team_id: team_id.to_string(),
        field: field.to_string(),
        raw: truncate(&raw.to_string(), 80),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}
