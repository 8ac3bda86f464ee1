//! Run configuration for chunk extraction.
//!
//! Load order: explicit file or `.jchunk/config.toml` → environment variables → defaults.

use crate::ids::TokenMode;
use crate::report::ChunkLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directories never descended into during discovery.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
    "target",
    "bin",
    ".git",
    "build",
    "node_modules",
    ".idea",
    ".vscode",
];

/// Top-level jchunk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub chunk: ChunkConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
}

/// Chunk construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Granularity used when the caller does not pick one: CLASS or METHOD.
    pub default_level: String,
    /// Member code snippets longer than this many characters are cut and suffixed with `...`.
    pub max_snippet_length: usize,
    /// When false, member chunks carry no code snippet.
    pub include_code_snippets: bool,
}

/// File selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Regular expressions appended to every run's exclude list.
    pub exclude_patterns: Vec<String>,
    pub exclude_directories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty_print: bool,
}

/// Execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Parse files on a rayon pool. Output order and identifiers match a sequential run.
    pub parallel: bool,
    pub id_tokens: TokenMode,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            default_level: ChunkLevel::Class.as_str().to_string(),
            max_snippet_length: 200,
            include_code_snippets: true,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            exclude_directories: DEFAULT_EXCLUDED_DIRECTORIES
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl ChunkConfig {
    pub fn level(&self) -> Result<ChunkLevel> {
        Ok(self.default_level.parse()?)
    }
}

impl ChunkerConfig {
    /// Load config from `.jchunk/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".jchunk").join("config.toml");
        let config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            Self::default()
        };
        config.finish()
    }

    /// Load config from an explicit file, with env var overrides.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        Self::read(config_path)?.finish()
    }

    fn read(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", config_path.display()))
    }

    fn finish(mut self) -> Result<Self> {
        env_override("JCHUNK_DEFAULT_LEVEL", &mut self.chunk.default_level);
        env_override(
            "JCHUNK_MAX_SNIPPET_LENGTH",
            &mut self.chunk.max_snippet_length,
        );
        env_override(
            "JCHUNK_INCLUDE_SNIPPETS",
            &mut self.chunk.include_code_snippets,
        );
        env_override("JCHUNK_PRETTY_PRINT", &mut self.output.pretty_print);
        env_override("JCHUNK_PARALLEL", &mut self.run.parallel);

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk.max_snippet_length == 0 {
            anyhow::bail!("max_snippet_length must be greater than 0");
        }
        self.chunk.level()?;
        Ok(())
    }
}
