use crate::{ConfigError, Configuration, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "assistant_config.json";

/// Where the configuration lives between runs.
pub trait ConfigStore {
    /// Load the stored configuration, falling back to defaults on any problem.
    fn load(&self) -> Configuration;

    /// Persist `config`, replacing what was stored before.
    fn save(&self, config: &Configuration) -> Result<()>;
}

/// JSON file on disk, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Option<Configuration>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn parent_dir(&self) -> Result<PathBuf> {
        match self.path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Ok(PathBuf::from(".")),
            Some(dir) => Ok(dir.to_path_buf()),
            None => Err(ConfigError::BadPath(self.path.clone())),
        }
    }

    fn io_err(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Configuration {
        let mut config = match self.try_load() {
            Ok(Some(config)) => {
                info!("Loaded config from {}", self.path.display());
                config
            }
            Ok(None) => {
                info!("No config at {}, using defaults", self.path.display());
                Configuration::default()
            }
            Err(e) => {
                warn!("Ignoring config {}: {}. Using defaults.", self.path.display(), e);
                Configuration::default()
            }
        };
        config.normalize();
        config
    }

    fn save(&self, config: &Configuration) -> Result<()> {
        let dir = self.parent_dir()?;
        fs::create_dir_all(&dir).map_err(|e| self.io_err(e))?;

        let json = serde_json::to_string_pretty(config)?;

        // Write next to the target so the final rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_err(e))?;
        writeln!(tmp, "{json}").map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store, mostly for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<Option<Configuration>>>,
    saves: Arc<Mutex<usize>>,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Configuration) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Some(config))),
            ..Self::default()
        }
    }

    /// A store whose every save fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<Configuration> {
        self.saved.lock().ok().and_then(|s| s.clone())
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Configuration {
        let mut config = self.saved().unwrap_or_default();
        config.normalize();
        config
    }

    fn save(&self, config: &Configuration) -> Result<()> {
        if self.fail {
            return Err(ConfigError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "read-only store"),
            });
        }
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(config.clone());
        }
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }
}
