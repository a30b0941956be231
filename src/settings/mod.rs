use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_AREA_ALPHA, DEFAULT_CAPTION_SIZE, DEFAULT_CHARTS_DIR, DEFAULT_CHART_HEIGHT,
    DEFAULT_CHART_WIDTH, DEFAULT_FONT_FAMILY, DEFAULT_INPUT_DELIMITER, DEFAULT_INPUT_FILE,
    DEFAULT_OUTPUT_DELIMITER, DEFAULT_OUTPUT_FILE,
};

/// Settings for one run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_delimiter: char,
    pub output_delimiter: char,

    #[validate(nested)]
    pub charts: ChartConfig,
}

/// Chart styling passed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub output_dir: PathBuf,

    #[validate(range(min = 200, max = 10000))]
    pub width: u32,

    #[validate(range(min = 200, max = 10000))]
    pub height: u32,

    #[validate(range(min = 0.0, max = 1.0))]
    pub area_alpha: f64,

    #[validate(length(min = 1))]
    pub font_family: String,

    #[validate(range(min = 6, max = 96))]
    pub caption_size: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            input_delimiter: DEFAULT_INPUT_DELIMITER,
            output_delimiter: DEFAULT_OUTPUT_DELIMITER,
            charts: ChartConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            area_alpha: DEFAULT_AREA_ALPHA,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            caption_size: DEFAULT_CAPTION_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Load settings from a TOML file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()?;
        let config: PipelineConfig = settings.try_deserialize()?;
        debug!(path = %path.display(), "loaded configuration file");

        config.check()?;
        Ok(config)
    }

    /// Defaults, or the given file when there is one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Range checks plus delimiter checks.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        delimiter_byte(self.input_delimiter)?;
        delimiter_byte(self.output_delimiter)?;
        if self.input_delimiter == '.' || self.output_delimiter == '.' {
            return Err(ProcessingError::Config(
                "'.' cannot be used as a field delimiter".to_string(),
            ));
        }
        Ok(())
    }

    pub fn input_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.input_delimiter)
    }

    pub fn output_delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.output_delimiter)
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && !delimiter.is_ascii_alphanumeric() {
        Ok(delimiter as u8)
    } else {
        Err(ProcessingError::Config(format!(
            "Delimiter must be a single ASCII punctuation or whitespace character, got '{}'",
            delimiter
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.output_delimiter_byte().unwrap(), b';');
        assert_eq!(config.input_delimiter_byte().unwrap(), b',');
        assert_eq!(config.charts.width, 1400);
        assert_eq!(config.charts.height, 700);
    }

    #[test]
    fn test_load_partial_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "output_path = \"report.csv\"")?;
        writeln!(file, "[charts]")?;
        writeln!(file, "width = 800")?;

        let config = PipelineConfig::from_file(file.path())?;

        assert_eq!(config.output_path, PathBuf::from("report.csv"));
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_FILE));
        assert_eq!(config.charts.width, 800);
        assert_eq!(config.charts.height, DEFAULT_CHART_HEIGHT);
        Ok(())
    }

    #[test]
    fn test_invalid_chart_size_rejected() {
        let mut config = PipelineConfig::default();
        config.charts.width = 10;

        assert!(matches!(
            config.check(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let mut config = PipelineConfig::default();
        config.output_delimiter = 'é';
        assert!(matches!(config.check(), Err(ProcessingError::Config(_))));

        config.output_delimiter = '.';
        assert!(matches!(config.check(), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = PipelineConfig::load(Some(Path::new("no/such/config.toml")));
        assert!(matches!(result, Err(ProcessingError::ConfigFile(_))));
    }
}
