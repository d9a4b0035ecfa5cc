use serde::Deserialize;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SHEET_NAME: &str = "Sheet 1";
pub const DEFAULT_OUTPUT_NAME: &str = "CPNW_CleanExport.xlsx";

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_search_cache_size() -> usize {
    128
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    pub default_sheet_name: String,
    pub default_output_name: String,
    pub faq_catalog_path: Option<PathBuf>,
    pub search_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_file_size: default_max_file_size(),
            default_sheet_name: DEFAULT_SHEET_NAME.to_string(),
            default_output_name: DEFAULT_OUTPUT_NAME.to_string(),
            faq_catalog_path: None,
            search_cache_size: default_search_cache_size(),
        }
    }
}

impl Config {
    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for every unset or blank key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let max_file_size = match get("MAX_FILE_SIZE") {
            Some(v) => v.parse::<usize>().context("MAX_FILE_SIZE must be a byte count")?,
            None => default_max_file_size(),
        };
        if max_file_size == 0 {
            anyhow::bail!("MAX_FILE_SIZE must be greater than zero");
        }

        let search_cache_size = match get("SEARCH_CACHE_SIZE") {
            Some(v) => v.parse::<usize>().context("SEARCH_CACHE_SIZE must be a number")?,
            None => default_search_cache_size(),
        };

        Ok(Config {
            bind_addr,
            max_file_size,
            default_sheet_name: get("DEFAULT_SHEET_NAME")
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            default_output_name: get("DEFAULT_OUTPUT_NAME")
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            faq_catalog_path: get("FAQ_CATALOG_PATH").map(PathBuf::from),
            search_cache_size,
        })
    }
}

pub fn load_config() -> Result<Config> {
    // Load .env file first
    dotenv().ok();

    let config = Config::from_lookup(|key| std::env::var(key).ok())?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
