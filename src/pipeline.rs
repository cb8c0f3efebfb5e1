use serde::Serialize;
use tracing::info;

use crate::categories::CategoryConfig;
use crate::error::AnalysisResult;
use crate::leaders::{CategoryLeader, category_leaders};
use crate::matchup::{RoundRobinTable, simulate};
use crate::mvp::{MvpReport, minimum_victory_paths};
use crate::stats::{PeriodTable, StatMode};

#[derive(Debug, Clone, Serialize)]
pub struct PeriodAnalysis {
    pub table: PeriodTable,
    pub config: CategoryConfig,
    pub totals: RoundRobinTable,
    pub per_game: RoundRobinTable,
    pub mvp: MvpReport,
    pub leaders: Vec<CategoryLeader>,
}

/// Everything the output layer needs for one scoring period.
pub fn analyze_period(table: PeriodTable, config: &CategoryConfig) -> AnalysisResult<PeriodAnalysis> {
    let label = table.label();
    info!(period = %label, teams = table.len(), "simulating round robin");

    let totals = simulate(&table, config, StatMode::Totals)?;
    let per_game = simulate(&table, config, StatMode::PerGame)?;

    let mvp = minimum_victory_paths(&table, &totals.ranking, config)?;
    if !mvp.unresolved.is_empty() {
        info!(
            period = %label,
            pairs = mvp.unresolved.len(),
            "mvp search left pairs unresolved"
        );
    }

    let leaders = category_leaders(&table, config);

    if let Some(top) = totals.ranking.first() {
        info!(period = %label, leader = %top.name, score = top.score, "round robin complete");
    }

    Ok(PeriodAnalysis {
        table,
        config: config.clone(),
        totals,
        per_game,
        mvp,
        leaders,
    })
}
