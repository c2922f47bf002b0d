//! Runner settings and leaderboard storage.
//!
//! The engine never touches the filesystem; this module is the persistence
//! side of that boundary. Settings are a JSON object whose session fields sit
//! at the top level next to the rendering and input options:
//!
//! ```json
//! { "start_level": 3, "randomizer": "uniform", "slide_fast": true,
//!   "controls": { "up_turns_right": true } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Leaderboard, SessionConfig};
use crate::input::Controls;

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "TRIS_CONFIG";
/// Environment variable overriding the session seed
pub const SEED_ENV: &str = "TRIS_SEED";
/// Environment variable naming the leaderboard file
pub const SCORES_ENV: &str = "TRIS_SCORES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub session: SessionConfig,
    /// Pixel size of a cell for graphical frontends; the terminal ignores it
    pub cellsize: u32,
    pub slide_fast: bool,
    pub controls: Controls,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            cellsize: 25,
            slide_fast: false,
            controls: Controls::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).context("parsing settings")?;
        settings.session.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Settings from `TRIS_CONFIG` (defaults when unset), then `TRIS_SEED`
    pub fn from_env() -> Result<Self> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(seed) = std::env::var(SEED_ENV) {
            settings.session.seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_ENV, seed))?;
        }
        debug!(?settings, "settings loaded");
        Ok(settings)
    }
}

/// JSON file holding the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreStore {
    path: Option<PathBuf>,
}

impl ScoreStore {
    /// `None` keeps scores in memory only
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var_os(SCORES_ENV).map(PathBuf::from))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored leaderboard, or an empty one when there is no file yet
    pub fn load(&self) -> Result<Leaderboard> {
        let Some(path) = &self.path else {
            return Ok(Leaderboard::default());
        };
        if !path.exists() {
            return Ok(Leaderboard::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scores from {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scores in {}", path.display()))
    }

    pub fn save(&self, leaderboard: &Leaderboard) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(leaderboard)?;
        fs::write(path, text).with_context(|| format!("writing scores to {}", path.display()))
    }
}
