use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::categories::CategoryConfig;

const DEFAULT_OUTPUT_DIR: &str = "./data/fantasy";
const DEFAULT_PARALLELISM: usize = 4;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub categories: CategoryConfig,
    pub parallelism: usize,
    pub write_xlsx: bool,
}

impl AppConfig {
    /// Read settings from the environment. Call `load_dotenv` first to pick up `.env` files.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let setting = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let output_dir = setting("WHATIF_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let categories = match setting("WHATIF_CATEGORY_CONFIG") {
            Some(path) => load_category_config(Path::new(&path))?,
            None => CategoryConfig::standard(),
        };

        let parallelism = setting("WHATIF_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(1, 32);

        let write_xlsx = setting("WHATIF_XLSX")
            .map(|val| parse_flag(&val))
            .unwrap_or(false);

        Ok(Self {
            output_dir,
            categories,
            parallelism,
            write_xlsx,
        })
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn load_category_config(path: &Path) -> Result<CategoryConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read category config {}", path.display()))?;
    let cfg = CategoryConfig::from_json(&raw)
        .with_context(|| format!("parse category config {}", path.display()))?;
    Ok(cfg)
}

/// Sized pool for the MVP search; `None` falls back to rayon's global pool.
pub fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(threads, %err, "could not build worker pool, using the global one");
            None
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{AppConfig, build_pool, parse_flag};
    use crate::categories::CategoryConfig;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.output_dir, PathBuf::from("./data/fantasy"));
        assert_eq!(cfg.parallelism, 4);
        assert!(!cfg.write_xlsx);
        assert_eq!(cfg.categories, CategoryConfig::standard());
    }

    #[test]
    fn parallelism_is_clamped() {
        assert_eq!(config_from(&[("WHATIF_PARALLELISM", "0")]).parallelism, 1);
        assert_eq!(config_from(&[("WHATIF_PARALLELISM", "500")]).parallelism, 32);
        assert_eq!(config_from(&[("WHATIF_PARALLELISM", " 8 ")]).parallelism, 8);
        assert_eq!(config_from(&[("WHATIF_PARALLELISM", "lots")]).parallelism, 4);
    }

    #[test]
    fn output_dir_and_xlsx_come_from_env() {
        let cfg = config_from(&[
            ("WHATIF_OUTPUT_DIR", "/tmp/league"),
            ("WHATIF_XLSX", "on"),
            ("WHATIF_CATEGORY_CONFIG", "  "),
        ]);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/league"));
        assert!(cfg.write_xlsx);
        assert_eq!(cfg.categories.len(), 9);
    }

    #[test]
    fn missing_category_file_is_an_error() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("WHATIF_CATEGORY_CONFIG", "/nonexistent/categories.json")]);
        let err = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap_err();
        assert!(format!("{err:#}").contains("categories.json"));
    }

    #[test]
    fn pool_has_requested_size() {
        let pool = build_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
