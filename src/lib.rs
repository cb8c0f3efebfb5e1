pub mod categories;
pub mod config;
pub mod error;
pub mod export;
pub mod fake_league;
pub mod ingest;
pub mod leaders;
pub mod matchup;
pub mod mvp;
pub mod pipeline;
pub mod season;
pub mod stats;
