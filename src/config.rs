use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{EdgePolicy, Grid};
use crate::rules::SpeedCurve;
use crate::{Cell, Coord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per side of the square board.
    pub dimension: Coord,
    pub edge_policy: EdgePolicy,
    pub supports_pause: bool,
    pub speed: SpeedCurve,
    /// Where the one-cell snake starts.
    pub start: Cell,
    /// Where the first food sits before any relocation.
    pub first_food: Cell,
    /// Pixel size of one cell in pixel-space conversions.
    pub cell_px: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::walled()
    }
}

impl GameConfig {
    /// Largest board side accepted; keeps cell counts, raster sizes and
    /// terminal sizes well inside their integer types.
    pub const MAX_DIMENSION: Coord = 1024;
    pub const MAX_CELL_PX: u32 = 4096;

    /// Walled board, fixed pace, no pause.
    pub fn walled() -> Self {
        Self {
            dimension: 20,
            edge_policy: EdgePolicy::Wall,
            supports_pause: false,
            speed: SpeedCurve::Fixed { interval_ms: 120 },
            start: Cell::new(10, 10),
            first_food: Cell::new(15, 15),
            cell_px: Grid::DEFAULT_CELL_PX,
        }
    }

    /// Wrapping board that speeds up with the score and can be paused.
    pub fn wrapping() -> Self {
        Self {
            edge_policy: EdgePolicy::Wrap,
            supports_pause: true,
            speed: SpeedCurve::Linear {
                base_ms: 120,
                step_ms: 3,
                min_ms: 50,
            },
            ..Self::walled()
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::with_cell_px(self.dimension, self.cell_px, self.edge_policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension < 2 {
            return Err(ConfigError::Invalid("dimension must be at least 2"));
        }
        if self.dimension > Self::MAX_DIMENSION {
            return Err(ConfigError::Invalid("dimension must be at most 1024"));
        }
        if self.cell_px == 0 || self.cell_px > Self::MAX_CELL_PX {
            return Err(ConfigError::Invalid("cell_px must be between 1 and 4096"));
        }
        let grid = self.grid();
        if !grid.contains(self.start) {
            return Err(ConfigError::Invalid("start cell lies outside the board"));
        }
        if !grid.contains(self.first_food) {
            return Err(ConfigError::Invalid("first food cell lies outside the board"));
        }
        if self.start == self.first_food {
            return Err(ConfigError::Invalid("first food cannot sit on the snake"));
        }
        if self.speed.floor_ms() == 0 {
            return Err(ConfigError::Invalid("tick interval must stay above zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn presets_are_valid() {
        GameConfig::walled().validate().unwrap();
        GameConfig::wrapping().validate().unwrap();
        assert_eq!(GameConfig::default(), GameConfig::walled());
    }

    #[test]
    fn presets_differ_only_in_variant_options() {
        let walled = GameConfig::walled();
        let wrapping = GameConfig::wrapping();
        assert_eq!(walled.edge_policy, EdgePolicy::Wall);
        assert_eq!(wrapping.edge_policy, EdgePolicy::Wrap);
        assert!(!walled.supports_pause);
        assert!(wrapping.supports_pause);
        assert_eq!(walled.start, wrapping.start);
        assert_eq!(walled.first_food, wrapping.first_food);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = GameConfig {
            dimension: 1,
            ..GameConfig::walled()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let cfg = GameConfig {
            dimension: 50_000,
            ..GameConfig::walled()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let cfg = GameConfig {
            dimension: GameConfig::MAX_DIMENSION,
            ..GameConfig::walled()
        };
        cfg.validate().unwrap();

        let cfg = GameConfig {
            cell_px: GameConfig::MAX_CELL_PX + 1,
            ..GameConfig::walled()
        };
        assert!(cfg.validate().is_err());

        let cfg = GameConfig {
            start: Cell::new(20, 0),
            ..GameConfig::walled()
        };
        assert!(cfg.validate().is_err());

        let cfg = GameConfig {
            first_food: GameConfig::walled().start,
            ..GameConfig::walled()
        };
        assert!(cfg.validate().is_err());

        let cfg = GameConfig {
            speed: SpeedCurve::Linear {
                base_ms: 100,
                step_ms: 10,
                min_ms: 0,
            },
            ..GameConfig::walled()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        fs::write(
            &path,
            r#"{
                "edge_policy": "wrap",
                "supports_pause": true,
                "speed": { "kind": "linear", "base_ms": 150, "step_ms": 5, "min_ms": 60 }
            }"#,
        )
        .unwrap();
        let cfg = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.edge_policy, EdgePolicy::Wrap);
        assert_eq!(cfg.dimension, 20);
        assert_eq!(cfg.speed.interval_ms(2), 140);
    }

    #[test]
    fn reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        fs::write(&path, r#"{ "edge_policy": "spiral" }"#).unwrap();
        assert!(matches!(
            GameConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            GameConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
