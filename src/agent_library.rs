//! Gomoku opponent presets, one TOML file per language-model agent.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{AgentConfig, ConfigError};

/// Environment variable overriding the preset directory.
pub const AGENTS_DIR_VAR: &str = "GOMOKU_ARENA_AGENTS";

/// Language-model opponents available to `tui` and `arena`.
#[derive(Debug, Clone, Default)]
pub struct AgentLibrary {
    agents: Vec<AgentConfig>,
}

impl AgentLibrary {
    /// Loads every `*.toml` preset in `dir_path`.
    ///
    /// Unreadable presets are logged and skipped. Presets are looked up by
    /// name, so when two files share a name (ignoring case) only the one
    /// whose file name sorts first is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `dir_path` is not a readable directory or
    /// holds no usable preset.
    #[instrument(skip(dir_path), fields(path = %dir_path.as_ref().display()))]
    pub fn scan(dir_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir_path.as_ref();
        if !dir.is_dir() {
            return Err(ConfigError::new(format!(
                "Preset directory not found: {}",
                dir.display()
            )));
        }

        let mut files = preset_files(dir)?;
        files.sort();
        debug!(candidates = files.len(), "Found preset files");

        let mut library = Self::default();
        for file in files {
            let config = match AgentConfig::from_file(&file) {
                Ok(config) => config,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "Ignoring unreadable preset");
                    continue;
                }
            };
            if library.find(config.name()).is_some() {
                warn!(agent = %config.name(), file = %file.display(), "Ignoring duplicate preset name");
                continue;
            }
            debug!(agent = %config.name(), file = %file.display(), "Loaded preset");
            library.agents.push(config);
        }

        if library.is_empty() {
            return Err(ConfigError::new(format!(
                "No usable gomoku agent presets in {}",
                dir.display()
            )));
        }

        library.agents.sort_by(|a, b| a.name().cmp(b.name()));
        info!(count = library.len(), "Preset library ready");
        Ok(library)
    }

    /// Builds a library from already loaded configs.
    pub fn from_agents(mut agents: Vec<AgentConfig>) -> Self {
        agents.sort_by(|a, b| a.name().cmp(b.name()));
        Self { agents }
    }

    /// Default preset directory: `$GOMOKU_ARENA_AGENTS`, then
    /// `$XDG_CONFIG_HOME/gomoku_arena/agents`, then `./agents`.
    #[instrument]
    pub fn default_config_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(AGENTS_DIR_VAR) {
            return PathBuf::from(dir);
        }
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            let dir = PathBuf::from(xdg).join("gomoku_arena").join("agents");
            if dir.is_dir() {
                return dir;
            }
        }
        PathBuf::from("agents")
    }

    /// Presets sorted by agent name.
    pub fn agents(&self) -> &[AgentConfig] {
        &self.agents
    }

    /// Looks up an agent by name, ignoring ASCII case.
    #[instrument(skip(self))]
    pub fn find(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no preset was loaded.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Regular `*.toml` files directly inside `dir`.
fn preset_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ConfigError::new(format!("Cannot list presets in {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ConfigError::new(format!("Cannot list presets in {}: {}", dir.display(), e)))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    Ok(files)
}
