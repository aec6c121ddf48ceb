//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paytable::LineShapeTable;
use crate::retry::RetryPolicy;
use crate::symbols::SymbolRoles;
use crate::timing::TimingConfig;

/// Largest supported reel or row count
pub const MAX_GRID_DIMENSION: u8 = 16;

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// Standard 5×5
    pub fn standard_5x5() -> Self {
        Self { reels: 5, rows: 5 }
    }

    /// Is the position inside the grid?
    pub fn contains(&self, col: u8, row: u8) -> bool {
        col < self.reels && row < self.rows
    }

    /// Rows that are neither the top nor the bottom row
    pub fn is_middle_band(&self, row: u8) -> bool {
        row >= 1 && row + 1 < self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x5()
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSpec,

    pub symbols: SymbolRoles,

    pub timing: TimingConfig,

    /// Payline shapes, indexed by the backend's line key
    pub line_shapes: LineShapeTable,

    /// Free spins awarded for `scatters - 3`, clamped to the table bounds.
    /// Used only when the backend does not supply a count.
    pub award_table: Vec<u32>,

    /// Bounded retry for animation assets that are not loaded yet
    pub retry: RetryPolicy,

    /// Win-amount dialog shows when `total_win >= bet * win_dialog_threshold`
    pub win_dialog_threshold: f64,

    pub default_bet: f64,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.grid;
        if grid.reels == 0 || grid.rows == 0 {
            return Err(ConfigError::InvalidGrid(format!(
                "{}x{} has no cells",
                grid.reels, grid.rows
            )));
        }
        if grid.reels > MAX_GRID_DIMENSION || grid.rows > MAX_GRID_DIMENSION {
            return Err(ConfigError::InvalidGrid(format!(
                "{}x{} exceeds {MAX_GRID_DIMENSION}x{MAX_GRID_DIMENSION}",
                grid.reels, grid.rows
            )));
        }

        for (index, shape) in self.line_shapes.iter().enumerate() {
            if !shape.fits(grid) {
                return Err(ConfigError::InvalidLineShape {
                    index,
                    reason: format!("mask does not match the {}x{} grid", grid.reels, grid.rows),
                });
            }
            if shape.positions().is_empty() {
                return Err(ConfigError::InvalidLineShape {
                    index,
                    reason: "mask covers no cells".into(),
                });
            }
        }

        if self.award_table.is_empty() {
            return Err(ConfigError::EmptyAwardTable);
        }

        self.timing.validate().map_err(ConfigError::InvalidTiming)?;

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if !(self.win_dialog_threshold >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "win_dialog_threshold must be >= 0, got {}",
                self.win_dialog_threshold
            )));
        }
        if !(self.default_bet > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "default_bet must be > 0, got {}",
                self.default_bet
            )));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let grid = GridSpec::standard_5x5();
        Self {
            grid,
            symbols: SymbolRoles::default(),
            timing: TimingConfig::normal(),
            line_shapes: LineShapeTable::standard(grid),
            award_table: vec![8, 12, 15],
            retry: RetryPolicy::default(),
            win_dialog_threshold: 15.0,
            default_bet: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::LineShape;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_middle_band() {
        let grid = GridSpec::standard_5x5();
        let band: Vec<u8> = (0..grid.rows).filter(|&r| grid.is_middle_band(r)).collect();
        assert_eq!(band, vec![1, 2, 3]);
    }

    #[test]
    fn test_json_round_trip_keeps_shapes() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "award_table: [5, 10]\nwin_dialog_threshold: 20.0\n";
        let config = EngineConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.award_table, vec![5, 10]);
        assert_eq!(config.grid, GridSpec::standard_5x5());
        assert_eq!(config.timing.autoplay_gap_ms, 500);
    }

    #[test]
    fn test_rejects_mismatched_line_shape() {
        let mut config = EngineConfig::default();
        config.grid = GridSpec { reels: 3, rows: 3 };
        // Shapes are still 5x5
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLineShape { index: 0, .. })
        ));

        config.line_shapes = LineShapeTable::new(vec![LineShape::straight(1, config.grid)]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_award_table() {
        let config = EngineConfig {
            award_table: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyAwardTable)));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
