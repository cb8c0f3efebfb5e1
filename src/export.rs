use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use tracing::info;

use crate::matchup::RoundRobinTable;
use crate::pipeline::PeriodAnalysis;

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub xlsx: bool,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Manifest {
    version: u32,
    period: String,
    generated_at: String,
    teams: usize,
    unresolved_mvp_pairs: usize,
    files: Vec<String>,
}

/// Write one period's file set under `root/<week_n|season>/`.
pub fn write_period_outputs(
    root: &Path,
    analysis: &PeriodAnalysis,
    options: ExportOptions,
) -> Result<ExportReport> {
    let dir = root.join(analysis.table.label().dir_name());
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let sheets = build_sheets(analysis);
    let mut files = Vec::new();
    for sheet in &sheets {
        let path = dir.join(sheet.file_name);
        write_csv(&path, &sheet.rows)?;
        files.push(path);
    }

    if options.xlsx {
        let path = dir.join("analysis.xlsx");
        write_workbook(&path, &sheets)?;
        files.push(path);
    }

    let manifest = Manifest {
        version: MANIFEST_VERSION,
        period: analysis.table.label().to_string(),
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        teams: analysis.table.len(),
        unresolved_mvp_pairs: analysis.mvp.unresolved.len(),
        files: files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect(),
    };
    let manifest_path = dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest")?;
    write_atomic(&manifest_path, json.as_bytes())?;
    files.push(manifest_path);

    info!(dir = %dir.display(), files = files.len(), "period outputs written");
    Ok(ExportReport { dir, files })
}

pub(crate) struct Sheet {
    pub file_name: &'static str,
    pub sheet_name: &'static str,
    pub rows: Vec<Vec<Cell>>,
}

/// Numbers stay numbers all the way to the workbook; everything else is text,
/// even when it happens to look numeric.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn csv_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => fmt_num(*v),
        }
    }
}

pub(crate) fn build_sheets(analysis: &PeriodAnalysis) -> Vec<Sheet> {
    vec![
        Sheet {
            file_name: "1_Results.csv",
            sheet_name: "Results",
            rows: results_rows(analysis),
        },
        Sheet {
            file_name: "2_Cat_Winners.csv",
            sheet_name: "CatWinners",
            rows: leader_rows(analysis),
        },
        Sheet {
            file_name: "3_WhatIf_Cats.csv",
            sheet_name: "WhatIfCats",
            rows: what_if_cats_rows(&analysis.totals),
        },
        Sheet {
            file_name: "4_WhatIf_WL.csv",
            sheet_name: "WhatIfWL",
            rows: what_if_wl_rows(&analysis.totals),
        },
        Sheet {
            file_name: "5_WhatIf_Cats_pg.csv",
            sheet_name: "WhatIfCatsPerGame",
            rows: what_if_cats_rows(&analysis.per_game),
        },
        Sheet {
            file_name: "6_WhatIf_WL_pg.csv",
            sheet_name: "WhatIfWLPerGame",
            rows: what_if_wl_rows(&analysis.per_game),
        },
        Sheet {
            file_name: "MVP.csv",
            sheet_name: "MVP",
            rows: mvp_rows(analysis),
        },
    ]
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|h| Cell::text(*h)).collect()
}

fn results_rows(analysis: &PeriodAnalysis) -> Vec<Vec<Cell>> {
    let mut rows = vec![header(&[
        "name", "fgma", "fgp", "ftma", "ftp", "tpm", "pts", "reb", "ast", "st", "blk", "to", "gp",
    ])];
    let teams = analysis.table.teams();
    for ranked in &analysis.totals.ranking {
        let t = &teams[ranked.index];
        rows.push(vec![
            Cell::text(ascii_name(&t.name)),
            Cell::text(t.fg.to_string()),
            Cell::Number(t.fgp),
            Cell::text(t.ft.to_string()),
            Cell::Number(t.ftp),
            Cell::Number(t.tpm),
            Cell::Number(t.pts),
            Cell::Number(t.reb),
            Cell::Number(t.ast),
            Cell::Number(t.st),
            Cell::Number(t.blk),
            Cell::Number(t.to),
            Cell::Number(f64::from(t.games_played)),
        ]);
    }
    rows
}

fn leader_rows(analysis: &PeriodAnalysis) -> Vec<Vec<Cell>> {
    let mut rows = vec![header(&["stat", "winner", "val"])];
    for leader in &analysis.leaders {
        rows.push(vec![
            Cell::text(leader.category.key()),
            Cell::text(leader.winners_label_by(ascii_name)),
            Cell::Number(leader.value),
        ]);
    }
    rows
}

fn ranked_header(rr: &RoundRobinTable) -> Vec<Cell> {
    let mut header = vec![Cell::text("team")];
    header.extend(rr.ranking.iter().map(|r| Cell::text(ascii_name(&r.name))));
    header
}

fn what_if_cats_rows(rr: &RoundRobinTable) -> Vec<Vec<Cell>> {
    let mut rows = vec![ranked_header(rr)];
    for (ranked, cells) in rr.ranking.iter().zip(rr.ranked_matrix()) {
        let mut row = vec![Cell::text(ascii_name(&ranked.name))];
        row.extend(cells.iter().map(|c| Cell::Text(c.tally_label())));
        rows.push(row);
    }
    rows
}

fn what_if_wl_rows(rr: &RoundRobinTable) -> Vec<Vec<Cell>> {
    let mut header = ranked_header(rr);
    header.push(Cell::text("score"));
    let mut rows = vec![header];
    for (ranked, cells) in rr.ranking.iter().zip(rr.ranked_matrix()) {
        let mut row = vec![Cell::text(ascii_name(&ranked.name))];
        row.extend(cells.iter().map(|c| Cell::Number(f64::from(c.verdict.score()))));
        row.push(Cell::Number(f64::from(ranked.score)));
        rows.push(row);
    }
    rows
}

/// Raw-stat changes per category, so lower-is-better columns come out negative.
fn mvp_rows(analysis: &PeriodAnalysis) -> Vec<Vec<Cell>> {
    let mut header = vec![Cell::text("team")];
    header.extend(analysis.mvp.categories.iter().map(|c| Cell::text(c.key())));
    let mut rows = vec![header];
    for row in &analysis.mvp.rows {
        let mut out = vec![Cell::text(ascii_name(&row.name))];
        for idx in 0..row.scaled_deltas.len() {
            let change = row.signed_change(idx, &analysis.config).unwrap_or(0.0);
            out.push(Cell::Number(change));
        }
        rows.push(out);
    }
    rows
}

fn write_csv(path: &Path, rows: &[Vec<Cell>]) -> Result<()> {
    let tmp = tmp_sibling(path);
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&tmp)
            .with_context(|| format!("open {}", tmp.display()))?;
        for row in rows {
            writer
                .write_record(row.iter().map(Cell::csv_field))
                .with_context(|| format!("write row to {}", tmp.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flush {}", tmp.display()))?;
    }
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(sheet.sheet_name)?;
        write_rows(ws, &sheet.rows)?;
    }
    let tmp = tmp_sibling(path);
    workbook
        .save(&tmp)
        .with_context(|| format!("failed writing workbook to {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Cell::Number(num) => {
                    worksheet
                        .write_number(r, c, *num)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
                Cell::Text(text) => {
                    worksheet
                        .write_string(r, c, text)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
            }
        }
    }
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_sibling(path);
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// Drop anything outside ASCII; the downstream dashboard chokes on emoji team names.
pub fn ascii_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii()).collect()
}

/// Shortest decimal form, at most three places.
pub fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
