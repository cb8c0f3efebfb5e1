use serde::Serialize;

use crate::categories::{Category, CategoryConfig, Direction};
use crate::stats::PeriodTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeader {
    pub category: Category,
    pub value: f64,
    /// Display names of every team sharing the best value, in table order.
    pub winners: Vec<String>,
}

const WINNER_SEPARATOR: &str = " | ";

impl CategoryLeader {
    pub fn winners_label(&self) -> String {
        self.winners.join(WINNER_SEPARATOR)
    }

    /// Same label with every name passed through `clean` first.
    pub fn winners_label_by(&self, clean: impl Fn(&str) -> String) -> String {
        self.winners
            .iter()
            .map(|w| clean(w))
            .collect::<Vec<_>>()
            .join(WINNER_SEPARATOR)
    }
}

/// Best period total per category (percentages as-is, no per-game scaling).
pub fn category_leaders(table: &PeriodTable, config: &CategoryConfig) -> Vec<CategoryLeader> {
    if table.is_empty() {
        return Vec::new();
    }
    config
        .specs()
        .iter()
        .map(|spec| {
            let mut best: Option<f64> = None;
            let mut winners: Vec<String> = Vec::new();
            for team in table.teams() {
                let v = team.value(spec.category);
                let better = match best {
                    None => true,
                    Some(b) => match spec.direction {
                        Direction::HigherBetter => v > b,
                        Direction::LowerBetter => v < b,
                    },
                };
                if better {
                    best = Some(v);
                    winners.clear();
                    winners.push(team.name.clone());
                } else if best == Some(v) {
                    winners.push(team.name.clone());
                }
            }
            CategoryLeader {
                category: spec.category,
                value: best.unwrap_or_default(),
                winners,
            }
        })
        .collect()
}
