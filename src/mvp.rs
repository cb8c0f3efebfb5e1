//! Minimum victory paths.
//!
//! For every team, and every opponent it does not already beat on category majority,
//! find the cheapest set of category flips (by weighted margin) and record how much
//! each flipped category must improve. A team's delta in a category is the largest
//! increment any single opponent demands.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::categories::{Category, CategoryConfig};
use crate::error::{AnalysisError, AnalysisResult};
use crate::matchup::RankedTeam;
use crate::stats::PeriodTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvpDelta {
    pub team_id: String,
    pub name: String,
    pub categories: Vec<Category>,
    /// Non-negative improvement per category, in natural units.
    pub deltas: Vec<f64>,
    /// Improvement per category in scaled units (what the search works in).
    pub scaled_deltas: Vec<f64>,
    /// Opponent that demanded the largest increment in each category.
    pub binding_opponent: Vec<Option<String>>,
}

impl MvpDelta {
    pub fn is_zero(&self) -> bool {
        self.scaled_deltas.iter().all(|d| *d == 0.0)
    }

    pub fn delta(&self, category: Category) -> Option<f64> {
        let idx = self.categories.iter().position(|c| *c == category)?;
        self.deltas.get(idx).copied()
    }

    /// The improvement expressed as a change to the raw stat, negative where
    /// lower is better.
    pub fn signed_change(&self, idx: usize, config: &CategoryConfig) -> Option<f64> {
        let spec = config.specs().get(idx)?;
        let scaled = *self.scaled_deltas.get(idx)?;
        Some(scaled / spec.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPair {
    pub team_id: String,
    pub opponent_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvpReport {
    pub categories: Vec<Category>,
    /// One row per team, in ranking order.
    pub rows: Vec<MvpDelta>,
    /// Pairs where no flippable category remained before the majority was reached.
    pub unresolved: Vec<UnresolvedPair>,
}

impl MvpReport {
    pub fn row(&self, team_id: &str) -> Option<&MvpDelta> {
        self.rows.iter().find(|r| r.team_id == team_id)
    }
}

pub fn minimum_victory_paths(
    table: &PeriodTable,
    ranking: &[RankedTeam],
    config: &CategoryConfig,
) -> AnalysisResult<MvpReport> {
    for entry in ranking {
        let matches = table
            .get(entry.index)
            .is_some_and(|t| t.team_id == entry.team_id);
        if !matches {
            return Err(AnalysisError::UnknownTeam {
                team_id: entry.team_id.clone(),
            });
        }
    }

    let scaled: Vec<Vec<f64>> = table
        .teams()
        .iter()
        .map(|team| {
            config
                .specs()
                .iter()
                .map(|spec| team.value(spec.category) * spec.scale)
                .collect()
        })
        .collect();
    let weights: Vec<f64> = config.specs().iter().map(|s| s.weight).collect();

    let per_team: Vec<(MvpDelta, Vec<UnresolvedPair>)> = ranking
        .par_iter()
        .map(|entry| team_paths(table, entry.index, &scaled, &weights, config))
        .collect();

    let mut rows = Vec::with_capacity(per_team.len());
    let mut unresolved = Vec::new();
    for (row, stuck) in per_team {
        rows.push(row);
        unresolved.extend(stuck);
    }

    Ok(MvpReport {
        categories: config.categories().collect(),
        rows,
        unresolved,
    })
}

fn team_paths(
    table: &PeriodTable,
    team: usize,
    scaled: &[Vec<f64>],
    weights: &[f64],
    config: &CategoryConfig,
) -> (MvpDelta, Vec<UnresolvedPair>) {
    let teams = table.teams();
    let n_cats = weights.len();
    let mut delta = vec![0.0_f64; n_cats];
    let mut binding: Vec<Option<String>> = vec![None; n_cats];
    let mut stuck = Vec::new();

    for (opp, opp_scaled) in scaled.iter().enumerate() {
        if opp == team {
            continue;
        }
        let diff: Vec<f64> = scaled[team]
            .iter()
            .zip(opp_scaled)
            .map(|(a, b)| a - b)
            .collect();
        let mut wdiff: Vec<f64> = diff.iter().zip(weights).map(|(d, w)| d * w).collect();
        let mut signs: Vec<i32> = diff.iter().map(|d| sign(*d)).collect();

        while signs.iter().sum::<i32>() < 1 {
            let Some(cat) = cheapest_flip(&wdiff) else {
                warn!(
                    team = %teams[team].team_id,
                    opponent = %teams[opp].team_id,
                    "no flippable category left before reaching a majority"
                );
                stuck.push(UnresolvedPair {
                    team_id: teams[team].team_id.clone(),
                    opponent_id: teams[opp].team_id.clone(),
                });
                break;
            };
            let needed = -diff[cat] + 1.0;
            if needed > delta[cat] {
                delta[cat] = needed;
                binding[cat] = Some(teams[opp].team_id.clone());
            }
            signs[cat] = 1;
            wdiff[cat] = 1.0;
        }
    }

    debug!(team = %teams[team].team_id, ?delta, "mvp deltas (scaled)");

    let deltas = delta
        .iter()
        .zip(config.specs())
        .map(|(d, spec)| d / spec.scale.abs())
        .collect();

    (
        MvpDelta {
            team_id: teams[team].team_id.clone(),
            name: teams[team].name.clone(),
            categories: config.categories().collect(),
            deltas,
            scaled_deltas: delta,
            binding_opponent: binding,
        },
        stuck,
    )
}

/// Category with the largest non-positive weighted margin; first one wins ties.
fn cheapest_flip(wdiff: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, w) in wdiff.iter().enumerate() {
        if *w > 0.0 {
            continue;
        }
        match best {
            Some(b) if wdiff[b] >= *w => {}
            _ => best = Some(idx),
        }
    }
    best
}

fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
