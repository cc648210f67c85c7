use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::Direction;
use crate::snake::Position;

const APP_DIR_NAME: &str = "bonus-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default edge length of one grid cell on the drawing surface.
pub const DEFAULT_CELL_SIZE: u16 = 20;

/// Default drawing surface width in surface units.
pub const DEFAULT_SURFACE_WIDTH: u16 = 400;

/// Default drawing surface height in surface units.
pub const DEFAULT_SURFACE_HEIGHT: u16 = 400;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Seconds of hidden counting before bonus food appears.
pub const DEFAULT_BONUS_APPEAR_AFTER_SECS: u32 = 10;

/// Seconds bonus food stays visible unless eaten.
pub const DEFAULT_BONUS_VISIBLE_SECS: u32 = 5;

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

/// Drawing surface and cell size; the grid is derived from them.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridGeometry {
    pub cell_size: u16,
    pub surface_width: u16,
    pub surface_height: u16,
}

impl GridGeometry {
    /// Returns the grid in cells. Partial cells at the surface edge are dropped.
    #[must_use]
    pub fn grid(self) -> GridSize {
        if self.cell_size == 0 {
            return GridSize {
                width: 0,
                height: 0,
            };
        }

        GridSize {
            width: self.surface_width / self.cell_size,
            height: self.surface_height / self.cell_size,
        }
    }
}

/// Errors raised while resolving the game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Every tunable gameplay constant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: u16,
    pub surface_width: u16,
    pub surface_height: u16,
    pub tick_interval_ms: u64,
    pub bonus_appear_after_secs: u32,
    pub bonus_visible_secs: u32,
    pub bonus_growth: usize,
    pub bonus_score: u32,
    pub food_growth: usize,
    pub food_score: u32,
    pub start: Position,
    pub start_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            bonus_appear_after_secs: DEFAULT_BONUS_APPEAR_AFTER_SECS,
            bonus_visible_secs: DEFAULT_BONUS_VISIBLE_SECS,
            bonus_growth: 2,
            bonus_score: 20,
            food_growth: 1,
            food_score: 1,
            start: Position { x: 2, y: 2 },
            start_direction: Direction::Right,
        }
    }
}

/// Command-line values layered over the file configuration.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ConfigOverrides {
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    pub tick_interval_ms: Option<u64>,
}

impl GameConfig {
    /// Returns a default configuration sized to `width` x `height` cells.
    pub fn with_grid(width: u16, height: u16) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_grid(width, height)?;
        Ok(config)
    }

    /// Resizes the surface so the derived grid is `width` x `height` cells.
    ///
    /// Fails when the surface would not fit in `u16` units.
    pub fn set_grid(&mut self, width: u16, height: u16) -> Result<(), ConfigError> {
        let scale = |cells: u16| {
            cells.checked_mul(self.cell_size).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{width}x{height} grid of {}-unit cells exceeds the surface size limit",
                    self.cell_size
                ))
            })
        };

        let surface_width = scale(width)?;
        let surface_height = scale(height)?;
        self.surface_width = surface_width;
        self.surface_height = surface_height;
        Ok(())
    }

    /// Reads the config file and layers `overrides` on top.
    ///
    /// An explicit `path` must exist; without one the platform default is
    /// used, and a missing default file means defaults. The merged result is
    /// validated.
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
            Some(path) => Self::load(path)?,
            None => Self::load(&default_config_path())?,
        };

        config.apply(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides; a lone `cols` or `rows` keeps the other dimension.
    pub fn apply(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if overrides.cols.is_some() || overrides.rows.is_some() {
            let grid = self.grid();
            self.set_grid(
                overrides.cols.unwrap_or(grid.width),
                overrides.rows.unwrap_or(grid.height),
            )?;
        }

        if let Some(tick_interval_ms) = overrides.tick_interval_ms {
            self.tick_interval_ms = tick_interval_ms;
        }

        Ok(())
    }

    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry {
            cell_size: self.cell_size,
            surface_width: self.surface_width,
            surface_height: self.surface_height,
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.geometry().grid()
    }

    /// Loads configuration from a JSON file.
    ///
    /// Returns defaults when the file does not exist yet. A file that exists
    /// but cannot be read or parsed is an error, as is a parsed config that
    /// fails [`GameConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = serde_json::from_str::<Self>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }

        let grid = self.grid();
        if grid.width == 0 || grid.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface {}x{} holds no whole {}-unit cell",
                self.surface_width, self.surface_height, self.cell_size
            )));
        }

        if !self.start.is_within_bounds(grid) {
            return Err(ConfigError::Invalid(format!(
                "start ({}, {}) lies outside the {}x{} grid",
                self.start.x, self.start.y, grid.width, grid.height
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".into(),
            ));
        }

        if self.bonus_appear_after_secs == 0 || self.bonus_visible_secs == 0 {
            return Err(ConfigError::Invalid(
                "bonus food durations must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}
