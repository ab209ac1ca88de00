use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::matching::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use crate::nlp::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::pipeline::{DEFAULT_JOB_BOARDS, DEFAULT_MAX_RESULTS_PER_BOARD};
use crate::sources::page_scraper::DEFAULT_FETCH_TIMEOUT;
use crate::sources::search::DEFAULT_SEARCH_ENDPOINT;

pub const DEFAULT_DAYS_THRESHOLD: u32 = 1;
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.97;
pub const DEFAULT_RESUME_PATH: &str = "resume/resume.pdf";

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub job_boards: Vec<String>,
    pub max_results_per_board: usize,
    pub days_threshold: u32,
    pub similarity_threshold: f64,
    pub dedup_threshold: f64,
    pub fetch_timeout: Duration,
    pub search_endpoint: String,
    /// fastembed model name; ignored when `word_vectors_path` is set.
    pub embedding_model: String,
    /// Where fastembed keeps downloaded model files.
    pub model_cache_dir: Option<PathBuf>,
    /// GloVe / word2vec text file to use instead of the embedding model.
    pub word_vectors_path: Option<PathBuf>,
    pub resume_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            job_boards: DEFAULT_JOB_BOARDS.iter().map(|b| b.to_string()).collect(),
            max_results_per_board: DEFAULT_MAX_RESULTS_PER_BOARD,
            days_threshold: DEFAULT_DAYS_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            model_cache_dir: None,
            word_vectors_path: None,
            resume_path: PathBuf::from(DEFAULT_RESUME_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let job_boards = match lookup("JOB_BOARDS") {
            Some(raw) => parse_boards(&raw)?,
            None => defaults.job_boards,
        };

        let similarity_threshold =
            parse_or("SIMILARITY_THRESHOLD", &lookup, defaults.similarity_threshold)?;
        let dedup_threshold = parse_or("DEDUP_THRESHOLD", &lookup, defaults.dedup_threshold)?;
        for (key, value) in [
            ("SIMILARITY_THRESHOLD", similarity_threshold),
            ("DEDUP_THRESHOLD", dedup_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{key} must be between 0 and 1, got {value}");
            }
        }

        Ok(Config {
            port: parse_or("PORT", &lookup, defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            job_boards,
            max_results_per_board: parse_or(
                "MAX_RESULTS_PER_BOARD",
                &lookup,
                defaults.max_results_per_board,
            )?,
            days_threshold: parse_or("DAYS_THRESHOLD", &lookup, defaults.days_threshold)?,
            similarity_threshold,
            dedup_threshold,
            fetch_timeout: Duration::from_secs(parse_or(
                "FETCH_TIMEOUT_SECS",
                &lookup,
                defaults.fetch_timeout.as_secs(),
            )?),
            search_endpoint: lookup("SEARCH_ENDPOINT").unwrap_or(defaults.search_endpoint),
            embedding_model: lookup("EMBEDDING_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.embedding_model),
            model_cache_dir: non_blank_path(lookup("MODEL_CACHE_DIR")),
            word_vectors_path: non_blank_path(lookup("WORD_VECTORS_PATH")),
            resume_path: lookup("RESUME_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.resume_path),
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn non_blank_path(raw: Option<String>) -> Option<PathBuf> {
    raw.filter(|p| !p.trim().is_empty()).map(PathBuf::from)
}

/// Comma-separated board domains, trimmed, blanks dropped. At least one is required.
fn parse_boards(raw: &str) -> Result<Vec<String>> {
    let boards: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();
    if boards.is_empty() {
        bail!("JOB_BOARDS must list at least one board domain");
    }
    Ok(boards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.job_boards.len(), 5);
        assert_eq!(config.job_boards[0], "greenhouse.io");
        assert_eq!(config.max_results_per_board, 5);
        assert_eq!(config.days_threshold, 1);
        assert_eq!(config.similarity_threshold, 0.8);
        assert_eq!(config.dedup_threshold, 0.97);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.embedding_model, "all-minilm-l6-v2");
        assert!(config.model_cache_dir.is_none());
        assert!(config.word_vectors_path.is_none());
        assert_eq!(config.resume_path, PathBuf::from("resume/resume.pdf"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("JOB_BOARDS", " jobs.lever.co , ,greenhouse.io"),
            ("DAYS_THRESHOLD", "7"),
            ("SIMILARITY_THRESHOLD", "0.5"),
            ("WORD_VECTORS_PATH", "/data/glove.txt"),
            ("EMBEDDING_MODEL", "bge-base-en-v1.5"),
            ("MODEL_CACHE_DIR", " "),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.job_boards, vec!["jobs.lever.co", "greenhouse.io"]);
        assert_eq!(config.days_threshold, 7);
        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.word_vectors_path, Some(PathBuf::from("/data/glove.txt")));
        assert_eq!(config.embedding_model, "bge-base-en-v1.5");
        assert!(config.model_cache_dir.is_none());
    }

    #[test]
    fn test_empty_board_list_rejected() {
        assert!(config_from(&[("JOB_BOARDS", " , ")]).is_err());
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("DAYS_THRESHOLD", "-1")]).is_err());
        assert!(config_from(&[("SIMILARITY_THRESHOLD", "1.5")]).is_err());
    }
}
