use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::Difficulty;
use crate::engine::Rules;
use crate::grid::Grid;
use crate::scheduler::{MAX_FRAME_DELTA_MS, MAX_TICKS_PER_FRAME, TimestepLimits};
use crate::store::ScoreLayout;

pub const SURFACE_WIDTH: u32 = 600;
pub const SURFACE_HEIGHT: u32 = 400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game flavour. Classic is the plain fixed-speed game; Extreme adds rocks
/// and per-difficulty high scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Classic,
    #[default]
    Extreme,
}

impl Variant {
    pub fn cell_size(self) -> u32 {
        match self {
            Variant::Classic => 20,
            Variant::Extreme => 10,
        }
    }

    pub fn rocks(self) -> bool {
        matches!(self, Variant::Extreme)
    }

    pub fn score_layout(self) -> ScoreLayout {
        match self {
            Variant::Classic => ScoreLayout::Single,
            Variant::Extreme => ScoreLayout::PerDifficulty,
        }
    }

    pub fn difficulty_selectable(self) -> bool {
        matches!(self, Variant::Extreme)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    pub difficulty: Difficulty,
    /// Overrides the variant's cell size.
    pub cell_size: Option<u32>,
    pub surface_width: u32,
    pub surface_height: u32,
    pub max_frame_delta_ms: f64,
    pub max_ticks_per_frame: u32,
    pub show_debug: bool,
    pub log_level: String,
    /// Overrides the default high score file location.
    pub scores_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            difficulty: Difficulty::default(),
            cell_size: None,
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
            show_debug: false,
            log_level: "info".to_string(),
            scores_file: None,
        }
    }
}

impl Settings {
    pub fn cell_size(&self) -> u32 {
        self.cell_size.unwrap_or_else(|| self.variant.cell_size())
    }

    pub fn grid(&self) -> Grid {
        Grid::from_surface(self.surface_width, self.surface_height, self.cell_size())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            grid: self.grid(),
            rocks: self.variant.rocks(),
            score_per_food: 1,
        }
    }

    pub fn limits(&self) -> TimestepLimits {
        TimestepLimits {
            max_frame_delta_ms: self.max_frame_delta_ms,
            max_ticks_per_frame: self.max_ticks_per_frame,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface_width == 0 || self.surface_height == 0 {
            return Err(ConfigError::Invalid("surface size must be non-zero".to_string()));
        }
        let cell_size = self.cell_size();
        // Cells are drawn two units smaller than their pitch.
        if cell_size < 3 {
            return Err(ConfigError::Invalid(format!("cell size {cell_size} is below 3")));
        }
        if self.grid().area() < 2 {
            return Err(ConfigError::Invalid(format!(
                "cell size {cell_size} leaves no room on a {}x{} surface",
                self.surface_width, self.surface_height
            )));
        }
        if !(self.max_frame_delta_ms > 0.0) {
            return Err(ConfigError::Invalid("max_frame_delta_ms must be positive".to_string()));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::Invalid("max_ticks_per_frame must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
}

impl Paths {
    pub fn scores_path(&self, settings: &Settings) -> PathBuf {
        settings
            .scores_file
            .clone()
            .unwrap_or_else(|| self.scores_path.clone())
    }
}

/// Platform config/data locations, or the working directory when the
/// platform has none.
pub fn project_paths() -> Paths {
    match ProjectDirs::from("dev", "snek", "snek_extreme") {
        Some(dirs) => Paths {
            settings_path: dirs.config_dir().join("settings.json"),
            scores_path: dirs.data_local_dir().join("high_scores.json"),
            log_path: dirs.data_local_dir().join("snek_extreme.log"),
        },
        None => Paths {
            settings_path: PathBuf::from("settings.json"),
            scores_path: PathBuf::from("high_scores.json"),
            log_path: PathBuf::from("snek_extreme.log"),
        },
    }
}

/// Missing file means defaults; anything unreadable or invalid is an error.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let settings: Settings = serde_json::from_str(&text)?;
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(settings)?).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snek-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{name}.json"));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.grid(), Grid { columns: 60, rows: 40 });
        assert!(settings.rules().rocks);
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }

    #[test]
    fn classic_variant_uses_large_cells_and_no_rocks() {
        let settings = Settings {
            variant: Variant::Classic,
            ..Settings::default()
        };
        assert_eq!(settings.grid(), Grid { columns: 30, rows: 20 });
        assert!(!settings.rules().rocks);
        assert_eq!(settings.variant.score_layout(), ScoreLayout::Single);
        assert!(!settings.variant.difficulty_selectable());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"difficulty": "hard", "show_debug": true}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(settings.show_debug);
        assert_eq!(settings.variant, Variant::Extreme);
        assert_eq!(settings.max_ticks_per_frame, MAX_TICKS_PER_FRAME);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = load_settings(&temp_path("absent")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        let path = temp_path("bad-cell");
        fs::write(&path, r#"{"cell_size": 2}"#).unwrap();
        assert!(matches!(load_settings(&path), Err(ConfigError::Invalid(_))));

        fs::write(&path, r#"{"max_ticks_per_frame": 0}"#).unwrap();
        assert!(matches!(load_settings(&path), Err(ConfigError::Invalid(_))));

        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(load_settings(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn saved_settings_load_back() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            difficulty: Difficulty::Insane,
            log_level: "debug".to_string(),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.difficulty, Difficulty::Insane);
        assert_eq!(loaded.log_level(), LevelFilter::Debug);
    }
}
