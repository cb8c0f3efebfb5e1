use std::collections::HashMap;

use crate::error::AnalysisResult;
use crate::stats::{PeriodLabel, PeriodTable, TeamPeriodStats};

/// Fold weekly tables into one season table.
///
/// Counting stats, shooting lines and games played are summed; percentages are
/// recomputed from the summed lines. Teams keep the order in which they first
/// appear, and take the most recent name they were seen with.
pub fn aggregate_season(periods: &[PeriodTable]) -> AnalysisResult<PeriodTable> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, TeamPeriodStats> = HashMap::new();

    for period in periods {
        for team in period.teams() {
            match totals.get_mut(&team.team_id) {
                Some(acc) => {
                    acc.games_played = acc.games_played.saturating_add(team.games_played);
                    acc.fg = acc.fg.add(&team.fg);
                    acc.ft = acc.ft.add(&team.ft);
                    acc.tpm += team.tpm;
                    acc.pts += team.pts;
                    acc.reb += team.reb;
                    acc.ast += team.ast;
                    acc.st += team.st;
                    acc.blk += team.blk;
                    acc.to += team.to;
                    if !team.name.trim().is_empty() {
                        acc.name = team.name.clone();
                    }
                }
                None => {
                    order.push(team.team_id.clone());
                    totals.insert(team.team_id.clone(), team.clone());
                }
            }
        }
    }

    let mut teams = Vec::with_capacity(order.len());
    for team_id in order {
        let Some(mut team) = totals.remove(&team_id) else {
            continue;
        };
        team.fgp = team.fg.pct();
        team.ftp = team.ft.pct();
        teams.push(team);
    }

    PeriodTable::new(PeriodLabel::Season, teams)
}
