use serde::Serialize;

use crate::categories::CategoryConfig;
use crate::error::AnalysisResult;
use crate::stats::{PeriodTable, StatMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Win,
    Loss,
    Tie,
}

impl Verdict {
    pub fn score(self) -> i32 {
        match self {
            Verdict::Win => 1,
            Verdict::Loss => -1,
            Verdict::Tie => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchupResult {
    pub category_wins: u32,
    pub category_losses: u32,
    pub category_ties: u32,
    pub verdict: Verdict,
}

impl MatchupResult {
    fn from_tally(wins: u32, losses: u32, categories: u32) -> Self {
        let verdict = if wins > losses {
            Verdict::Win
        } else if wins < losses {
            Verdict::Loss
        } else {
            Verdict::Tie
        };
        Self {
            category_wins: wins,
            category_losses: losses,
            category_ties: categories - wins - losses,
            verdict,
        }
    }

    /// `wins=losses=ties`, the cell format of the what-if category sheet.
    pub fn tally_label(&self) -> String {
        format!(
            "{}={}={}",
            self.category_wins, self.category_losses, self.category_ties
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTeam {
    /// Position of the team in the period table.
    pub index: usize,
    pub team_id: String,
    pub name: String,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundRobinTable {
    pub mode: StatMode,
    pub team_ids: Vec<String>,
    pub names: Vec<String>,
    /// `results[team][opponent]`, both in period-table order.
    pub results: Vec<Vec<MatchupResult>>,
    pub scores: Vec<i32>,
    pub ranking: Vec<RankedTeam>,
}

impl RoundRobinTable {
    pub fn len(&self) -> usize {
        self.team_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.team_ids.is_empty()
    }

    pub fn result(&self, team: usize, opponent: usize) -> Option<&MatchupResult> {
        self.results.get(team).and_then(|row| row.get(opponent))
    }

    pub fn ranked_ids(&self) -> Vec<&str> {
        self.ranking.iter().map(|r| r.team_id.as_str()).collect()
    }

    /// The matrix with rows and columns both reordered best-to-worst.
    pub fn ranked_matrix(&self) -> Vec<Vec<MatchupResult>> {
        self.ranking
            .iter()
            .map(|row| {
                self.ranking
                    .iter()
                    .map(|col| self.results[row.index][col.index])
                    .collect()
            })
            .collect()
    }
}

/// Full round robin over every ordered pair of teams, self-pairs included.
pub fn simulate(
    table: &PeriodTable,
    config: &CategoryConfig,
    mode: StatMode,
) -> AnalysisResult<RoundRobinTable> {
    let values = comparable_matrix(table, config, mode)?;
    let n = table.len();
    let cat_count = config.len() as u32;

    let mut results = Vec::with_capacity(n);
    let mut scores = Vec::with_capacity(n);
    for team in 0..n {
        let mut row = Vec::with_capacity(n);
        let mut score = 0i32;
        for opp in 0..n {
            let result = compare_rows(&values[team], &values[opp], config, cat_count);
            score += result.verdict.score();
            row.push(result);
        }
        results.push(row);
        scores.push(score);
    }

    let mut order: Vec<usize> = (0..n).collect();
    // `sort_by` is stable, so equal scores keep input order.
    order.sort_by(|a, b| scores[*b].cmp(&scores[*a]));

    let teams = table.teams();
    let ranking = order
        .into_iter()
        .map(|index| RankedTeam {
            index,
            team_id: teams[index].team_id.clone(),
            name: teams[index].name.clone(),
            score: scores[index],
        })
        .collect();

    Ok(RoundRobinTable {
        mode,
        team_ids: teams.iter().map(|t| t.team_id.clone()).collect(),
        names: teams.iter().map(|t| t.name.clone()).collect(),
        results,
        scores,
        ranking,
    })
}

/// Head-to-head result of two teams from the same period.
pub fn compare_teams(
    table: &PeriodTable,
    team: usize,
    opponent: usize,
    config: &CategoryConfig,
    mode: StatMode,
) -> AnalysisResult<Option<MatchupResult>> {
    let (Some(a), Some(b)) = (table.get(team), table.get(opponent)) else {
        return Ok(None);
    };
    let mut row_a = Vec::with_capacity(config.len());
    let mut row_b = Vec::with_capacity(config.len());
    for spec in config.specs() {
        row_a.push(a.comparable_value(spec, mode)?);
        row_b.push(b.comparable_value(spec, mode)?);
    }
    Ok(Some(compare_rows(&row_a, &row_b, config, config.len() as u32)))
}

fn comparable_matrix(
    table: &PeriodTable,
    config: &CategoryConfig,
    mode: StatMode,
) -> AnalysisResult<Vec<Vec<f64>>> {
    table
        .teams()
        .iter()
        .map(|team| {
            config
                .specs()
                .iter()
                .map(|spec| team.comparable_value(spec, mode))
                .collect::<AnalysisResult<Vec<f64>>>()
        })
        .collect()
}

fn compare_rows(team: &[f64], opp: &[f64], config: &CategoryConfig, cat_count: u32) -> MatchupResult {
    let mut wins = 0u32;
    let mut losses = 0u32;
    for ((spec, a), b) in config.specs().iter().zip(team).zip(opp) {
        match spec.direction.compare(*a, *b) {
            1 => wins += 1,
            -1 => losses += 1,
            _ => {}
        }
    }
    MatchupResult::from_tally(wins, losses, cat_count)
}
