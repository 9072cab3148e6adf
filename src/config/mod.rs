use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::Deserialize;
use crate::category::Categories;

const DEFAULT_CHART_WIDTH: usize = 40;
const DEFAULT_DATA_FILE: &str = "finance_tracker.csv";

#[derive(Deserialize, Debug, Default)]
struct RawCategories {
    #[serde(default)]
    expense: Vec<String>,
    #[serde(default)]
    income: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    data_file: Option<String>,
    chart_width: Option<usize>,
    #[serde(default)]
    categories: RawCategories,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) data_file: Option<PathBuf>,
    /// Number of terminal cells used by the longest chart bar
    pub(crate) chart_width: usize,
    pub(crate) categories: Categories,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            chart_width: DEFAULT_CHART_WIDTH,
            categories: Categories::default(),
        }
    }
}

impl Config {
    /// Load config from a toml file. A missing file gives the default config.
    pub(crate) fn load_from_file(path: &Path) -> anyhow::Result<Config> {
        if !path.is_file() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        Config::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> anyhow::Result<Config> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Config {
            data_file: raw.data_file.map(|f| expand_home(&f)),
            chart_width: raw.chart_width.filter(|w| *w > 0).unwrap_or(DEFAULT_CHART_WIDTH),
            categories: Categories::new(raw.categories.expense, raw.categories.income),
        })
    }

    /// Data file to use when none is given on the command line
    pub(crate) fn default_data_file(&self) -> PathBuf {
        match &self.data_file {
            Some(f) => f.clone(),
            None => {
                let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
                dir.push("fintrack");
                dir.push(DEFAULT_DATA_FILE);
                dir
            }
        }
    }
}

/// `<config dir>/fintrack/config.toml`
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut dir| {
        dir.push("fintrack");
        dir.push("config.toml");
        dir
    })
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
