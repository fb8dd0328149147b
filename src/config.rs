use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for pairstack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Stitching settings
    pub compose: ComposeConfig,

    /// Grid sampling and contact sheet settings
    pub grid: GridConfig,

    /// Output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compose: ComposeConfig::default(),
            grid: GridConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Stitching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Resampling filter used when resizing to the shared width
    pub filter: ResizeFilter,

    /// Opaque background the composite's alpha is flattened against
    pub background: [u8; 3],
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            filter: ResizeFilter::Lanczos3,
            background: [0, 0, 0],
        }
    }
}

/// Resampling filter choice, mapped onto the image crate's filter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Grid sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Maximum rows sampled from the bottom slot
    pub max_rows: usize,

    /// Maximum columns sampled from the top slot
    pub max_cols: usize,

    /// Cell width in pixels when assembling a contact sheet
    pub cell_width: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_rows: 3,
            max_cols: 3,
            cell_width: 200,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        if self.max_rows == 0 || self.max_cols == 0 {
            return Err(ConfigError::InvalidValue {
                key: "grid.dimensions".to_string(),
                value: format!("{}x{}", self.max_rows, self.max_cols),
            }
            .into());
        }

        if self.cell_width < 16 {
            return Err(ConfigError::InvalidValue {
                key: "grid.cell_width".to_string(),
                value: self.cell_width.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension used when generating a default output filename
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "png".to_string(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        match self.default_format.as_str() {
            "png" | "jpg" | "jpeg" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                key: "output.default_format".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }
}
