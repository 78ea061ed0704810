use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::language::Difficulty;
use crate::score::WpmPolicy;
use crate::word_generator::GenerationPolicy;

/// Durations offered by the duration control, in seconds
pub const ALLOWED_DURATIONS: [u32; 4] = [15, 30, 60, 120];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    pub generation: GenerationPolicy,
    pub wpm_policy: WpmPolicy,
    pub word_bank: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            difficulty: Difficulty::Easy,
            generation: GenerationPolicy::Connected,
            wpm_policy: WpmPolicy::ElapsedNormalized,
            word_bank: None,
        }
    }
}

/// Next allowed duration after `current`, wrapping around. Durations not in
/// the list snap to the first entry.
pub fn next_duration(current: u32) -> u32 {
    match ALLOWED_DURATIONS.iter().position(|d| *d == current) {
        Some(i) => ALLOWED_DURATIONS[(i + 1) % ALLOWED_DURATIONS.len()],
        None => ALLOWED_DURATIONS[0],
    }
}

pub fn prev_duration(current: u32) -> u32 {
    let len = ALLOWED_DURATIONS.len();
    match ALLOWED_DURATIONS.iter().position(|d| *d == current) {
        Some(i) => ALLOWED_DURATIONS[(i + len - 1) % len],
        None => ALLOWED_DURATIONS[0],
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typeblast_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
