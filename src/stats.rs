use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::categories::{Category, CategorySpec};
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatMode {
    Totals,
    PerGame,
}

/// A shooting line such as `45/100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MadeAttempted {
    pub made: f64,
    pub attempted: f64,
}

impl MadeAttempted {
    pub fn new(made: f64, attempted: f64) -> Self {
        Self { made, attempted }
    }

    pub fn pct(&self) -> f64 {
        if self.attempted <= 0.0 {
            return 0.0;
        }
        round3(self.made / self.attempted)
    }

    pub fn add(&self, other: &MadeAttempted) -> MadeAttempted {
        MadeAttempted {
            made: self.made + other.made,
            attempted: self.attempted + other.attempted,
        }
    }
}

impl fmt::Display for MadeAttempted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.made, self.attempted)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected `made/attempted`, got {0:?}")]
pub struct ParseMadeAttemptedError(pub String);

impl FromStr for MadeAttempted {
    type Err = ParseMadeAttemptedError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ParseMadeAttemptedError(raw.to_string());
        let (made, attempted) = raw.trim().split_once('/').ok_or_else(err)?;
        // The upstream feed writes `-/-` before a team has taken a shot.
        if made.trim() == "-" && attempted.trim() == "-" {
            return Ok(MadeAttempted::default());
        }
        let made = made.trim().parse::<f64>().map_err(|_| err())?;
        let attempted = attempted.trim().parse::<f64>().map_err(|_| err())?;
        if !made.is_finite() || !attempted.is_finite() || made < 0.0 || attempted < 0.0 {
            return Err(err());
        }
        if made > attempted {
            return Err(err());
        }
        Ok(MadeAttempted { made, attempted })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPeriodStats {
    pub team_id: String,
    pub name: String,
    pub games_played: u32,
    pub fg: MadeAttempted,
    pub ft: MadeAttempted,
    pub fgp: f64,
    pub ftp: f64,
    pub tpm: f64,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub st: f64,
    pub blk: f64,
    pub to: f64,
}

impl TeamPeriodStats {
    pub fn value(&self, category: Category) -> f64 {
        match category {
            Category::Fgp => self.fgp,
            Category::Ftp => self.ftp,
            Category::Tpm => self.tpm,
            Category::Pts => self.pts,
            Category::Reb => self.reb,
            Category::Ast => self.ast,
            Category::St => self.st,
            Category::Blk => self.blk,
            Category::To => self.to,
        }
    }

    pub fn comparable_value(&self, spec: &CategorySpec, mode: StatMode) -> AnalysisResult<f64> {
        let raw = self.value(spec.category);
        if mode == StatMode::Totals || !spec.per_game {
            return Ok(raw);
        }
        if self.games_played == 0 {
            return Err(AnalysisError::ZeroGamesPlayed {
                team_id: self.team_id.clone(),
            });
        }
        Ok(raw / self.games_played as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodLabel {
    Week(u32),
    Season,
}

impl PeriodLabel {
    pub fn dir_name(&self) -> String {
        match self {
            PeriodLabel::Week(n) => format!("week_{n}"),
            PeriodLabel::Season => "season".to_string(),
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Week(n) => write!(f, "week {n}"),
            PeriodLabel::Season => f.write_str("season"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTable {
    label: PeriodLabel,
    teams: Vec<TeamPeriodStats>,
}

impl PeriodTable {
    pub fn new(label: PeriodLabel, teams: Vec<TeamPeriodStats>) -> AnalysisResult<Self> {
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.team_id.as_str()) {
                return Err(AnalysisError::DuplicateTeam {
                    team_id: team.team_id.clone(),
                });
            }
            for cat in ALL_CATEGORIES {
                let v = team.value(cat);
                if !v.is_finite() {
                    return Err(AnalysisError::MalformedValue {
                        team_id: team.team_id.clone(),
                        field: cat.key().to_string(),
                        raw: v.to_string(),
                    });
                }
            }
        }
        Ok(Self { label, teams })
    }

    pub fn label(&self) -> PeriodLabel {
        self.label
    }

    pub fn teams(&self) -> &[TeamPeriodStats] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TeamPeriodStats> {
        self.teams.get(index)
    }

    pub fn index_of(&self, team_id: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.team_id == team_id)
    }
}

const ALL_CATEGORIES: [Category; 9] = [
    Category::Fgp,
    Category::Ftp,
    Category::Tpm,
    Category::Pts,
    Category::Reb,
    Category::Ast,
    Category::St,
    Category::Blk,
    Category::To,
];

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
