use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("team {team_id}: missing value for `{field}`")]
    MissingCategory { team_id: String, field: String },

    #[error("team {team_id}: malformed value for `{field}`: {raw:?}")]
    MalformedValue {
        team_id: String,
        field: String,
        raw: String,
    },

    #[error("team {team_id}: games played is zero, per-game values are undefined")]
    ZeroGamesPlayed { team_id: String },

    #[error("team {team_id} appears more than once in the period table")]
    DuplicateTeam { team_id: String },

    #[error("ranking refers to unknown team {team_id}")]
    UnknownTeam { team_id: String },

    #[error("invalid category config: {0}")]
    InvalidConfig(String),

    #[error("invalid period json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
