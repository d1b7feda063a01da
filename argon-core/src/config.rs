use crate::resolution::IconType;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ToolsConfig {
    pub rasterizer: PathBuf,
    pub optimizer: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            rasterizer: PathBuf::from("inkscape"),
            optimizer: PathBuf::from("optipng"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// root of the source tree, containing the `svg` directory
    pub source_dir: PathBuf,
    /// root of the generated tree, defaults to the source root
    pub build_dir: Option<PathBuf>,
    pub workers_per_core: usize,
    pub tools: ToolsConfig,
    /// icon type per class name, classes not listed are regular
    pub icon_types: HashMap<String, IconType>,

    /// path of the configuration file, if the configuration was loaded from a file
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_dir: PathBuf::from("assets"),
            build_dir: None,
            workers_per_core: 2,
            tools: ToolsConfig::default(),
            icon_types: HashMap::new(),
            source: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("invalid configuration string")]
    InvalidConfigString(String, #[source] eyre::Report),
    #[error("invalid configuration file {}", .0.display())]
    InvalidConfigFile(PathBuf, #[source] eyre::Report),
    #[error("i/o error reading configuration file {}", .0.display())]
    IoError(PathBuf, #[source] std::io::Error),
}

impl Config {
    pub fn parse(s: &str) -> Result<Config, ConfigLoadError> {
        toml::from_str(s).map_err(|e| ConfigLoadError::InvalidConfigString(s.to_owned(), e.into()))
    }

    pub async fn parse_file(p: &Path) -> Result<Config, ConfigLoadError> {
        let config_string = tokio::fs::read_to_string(p)
            .await
            .map_err(|e| ConfigLoadError::IoError(p.to_owned(), e))?;
        let mut config: Config = toml::from_str(&config_string)
            .map_err(|e| ConfigLoadError::InvalidConfigFile(p.to_owned(), e.into()))?;
        config.source = Some(p.to_owned());
        Ok(config)
    }

    pub fn build_dir(&self) -> &Path {
        self.build_dir.as_deref().unwrap_or(&self.source_dir)
    }

    pub fn icon_type(&self, class: &str) -> IconType {
        self.icon_types.get(class).cloned().unwrap_or_default()
    }
}
