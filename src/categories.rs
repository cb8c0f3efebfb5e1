use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fgp,
    Ftp,
    Tpm,
    Pts,
    Reb,
    Ast,
    St,
    Blk,
    To,
}

impl Category {
    pub fn key(self) -> &'static str {
        match self {
            Category::Fgp => "fgp",
            Category::Ftp => "ftp",
            Category::Tpm => "tpm",
            Category::Pts => "pts",
            Category::Reb => "reb",
            Category::Ast => "ast",
            Category::St => "st",
            Category::Blk => "blk",
            Category::To => "to",
        }
    }

    /// Ratio-derived categories are already rates and never get divided by games played.
    pub fn is_percentage(self) -> bool {
        matches!(self, Category::Fgp | Category::Ftp)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

impl Direction {
    /// +1 when `a` beats `b`, -1 when `b` beats `a`, 0 on an exact tie.
    pub fn compare(self, a: f64, b: f64) -> i8 {
        let (a, b) = match self {
            Direction::HigherBetter => (a, b),
            Direction::LowerBetter => (b, a),
        };
        if a > b {
            1
        } else if a < b {
            -1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category: Category,
    pub direction: Direction,
    /// Relative cost of flipping this category in the MVP search.
    pub weight: f64,
    /// Unit multiplier that puts every category on a comparable "bigger is better" scale.
    pub scale: f64,
    #[serde(default)]
    pub per_game: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CategorySpec>", into = "Vec<CategorySpec>")]
pub struct CategoryConfig {
    specs: Vec<CategorySpec>,
}

impl CategoryConfig {
    pub fn new(specs: Vec<CategorySpec>) -> AnalysisResult<Self> {
        if specs.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one category is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for spec in &specs {
            let cat = spec.category;
            if !seen.insert(cat) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category {cat} listed twice"
                )));
            }
            if !spec.weight.is_finite() || spec.weight <= 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category {cat}: weight must be positive, got {}",
                    spec.weight
                )));
            }
            if !spec.scale.is_finite() || spec.scale == 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category {cat}: scale must be non-zero, got {}",
                    spec.scale
                )));
            }
            let scale_ok = match spec.direction {
                Direction::HigherBetter => spec.scale > 0.0,
                Direction::LowerBetter => spec.scale < 0.0,
            };
            if !scale_ok {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category {cat}: scale sign {} disagrees with {:?}",
                    spec.scale, spec.direction
                )));
            }
            if spec.per_game && cat.is_percentage() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "category {cat} is a percentage and cannot be per-game normalized"
                )));
            }
        }
        Ok(Self { specs })
    }

    /// Standard 9-category head-to-head league.
    pub fn standard() -> Self {
        let row = |category, direction, weight, scale, per_game| CategorySpec {
            category,
            direction,
            weight,
            scale,
            per_game,
        };
        use Direction::{HigherBetter, LowerBetter};
        Self {
            specs: vec![
                row(Category::Fgp, HigherBetter, 1.0, 1000.0, false),
                row(Category::Ftp, HigherBetter, 1.0, 1000.0, false),
                row(Category::Tpm, HigherBetter, 3.0, 1.0, true),
                row(Category::Pts, HigherBetter, 1.0, 1.0, true),
                row(Category::Reb, HigherBetter, 2.0, 1.0, true),
                row(Category::Ast, HigherBetter, 2.0, 1.0, true),
                row(Category::St, HigherBetter, 3.0, 1.0, true),
                row(Category::Blk, HigherBetter, 3.0, 1.0, true),
                row(Category::To, LowerBetter, 2.0, -1.0, true),
            ],
        }
    }

    pub fn from_json(raw: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn specs(&self) -> &[CategorySpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.specs.iter().map(|s| s.category)
    }

    pub fn position(&self, category: Category) -> Option<usize> {
        self.specs.iter().position(|s| s.category == category)
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<CategorySpec>> for CategoryConfig {
    type Error = AnalysisError;

    fn try_from(specs: Vec<CategorySpec>) -> AnalysisResult<Self> {
        Self::new(specs)
    }
}

impl From<CategoryConfig> for Vec<CategorySpec> {
    fn from(cfg: CategoryConfig) -> Self {
        cfg.specs
    }
}
