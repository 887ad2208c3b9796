//! Configuration for image flashcards.

use flashcard_deck::{LoaderOptions, DEFAULT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "image-flashcards";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `path`, or the default location. Falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Path::to_path_buf)
            .or_else(Self::config_path)
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn default_log_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|d| d.data_local_dir().join(format!("{APP_NAME}.log")))
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions::with_extensions(&self.data.extensions)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Folder holding `front/` and `back/`.
    #[serde(default)]
    pub folder: Option<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            folder: None,
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Initial range end, capped at the number of cards.
    #[serde(default = "default_range_len")]
    pub default_range_len: usize,
    #[serde(default)]
    pub shuffle: bool,
}

fn default_range_len() -> usize { 10 }

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            default_range_len: 10,
            shuffle: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// External command used to open the visible image.
    #[serde(default)]
    pub viewer: Option<String>,
    #[serde(default = "default_true")]
    pub show_paths: bool,
}

fn default_true() -> bool { true }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewer: None,
            show_paths: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}
