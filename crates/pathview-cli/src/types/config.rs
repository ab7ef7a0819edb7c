use pathview_core::{BoundingBox, PathStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{Result, ThumbnailError};

/// Configuration for thumbnail generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Output image extension, including the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Appended to each session name before the extension
    #[serde(default)]
    pub suffix: String,
    /// Square figure size in pixels
    #[serde(default = "default_figure_size")]
    pub figure_size: u32,
    #[serde(default = "default_point_size")]
    pub point_size: f64,
    /// Data y is vertical (Y-up recordings)
    #[serde(default = "default_true")]
    pub up_axis: bool,
    #[serde(default)]
    pub colorbar: bool,
    /// Write background pixels as transparent where the format allows it
    #[serde(default = "default_true")]
    pub transparent: bool,
    /// Fixed display bounds shared by every thumbnail
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Keep going after a session fails
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    /// Where to write the JSON batch report
    #[serde(default)]
    pub summary_path: Option<PathBuf>,
}

fn default_extension() -> String {
    ".jpg".to_string()
}

fn default_figure_size() -> u32 {
    600
}

fn default_point_size() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            suffix: String::new(),
            figure_size: default_figure_size(),
            point_size: default_point_size(),
            up_axis: true,
            colorbar: false,
            transparent: true,
            bbox: None,
            continue_on_error: true,
            summary_path: None,
        }
    }
}

impl ThumbnailConfig {
    /// Load from a YAML file; absent keys take their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ThumbnailError::InvalidConfig(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ThumbnailConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(ThumbnailError::InvalidConfig(format!(
                "Extension must look like '.png', got '{}'",
                self.extension
            )));
        }
        if self.figure_size == 0 {
            return Err(ThumbnailError::InvalidConfig(
                "Figure size must be positive".to_string(),
            ));
        }
        if !(self.point_size > 0.0) {
            return Err(ThumbnailError::InvalidConfig(format!(
                "Point size must be positive, got {}",
                self.point_size
            )));
        }
        Ok(())
    }

    /// Output filename for a session: `<name><suffix><extension>`
    pub fn file_name(&self, session: &str) -> String {
        format!("{}{}{}", session, self.suffix, self.extension)
    }

    pub fn path_style(&self) -> PathStyle {
        PathStyle {
            up_axis: self.up_axis,
            colorbar: self.colorbar,
            point_size: self.point_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pathview_core::Bounds;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_command_line_defaults() {
        let config = ThumbnailConfig::default();
        assert_eq!(config.extension, ".jpg");
        assert_eq!(config.suffix, "");
        assert_eq!(config.file_name("U0"), "U0.jpg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_fills_missing_keys_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "extension: .png").unwrap();
        writeln!(file, "suffix: -prev").unwrap();
        writeln!(file, "bbox: {{x0: -1.0, x1: 1.0, z0: 0.0}}").unwrap();
        file.flush().unwrap();

        let config = ThumbnailConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.file_name("U3"), "U3-prev.png");
        assert_eq!(config.figure_size, 600);
        assert!(config.up_axis);

        let bbox = config.bbox.unwrap();
        assert_eq!(bbox.x, Some(Bounds::new(-1.0, 1.0)));
        assert!(bbox.z.is_none());
    }

    #[test]
    fn path_style_carries_drawing_options() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "point_size: 2.5").unwrap();
        writeln!(file, "up_axis: false").unwrap();
        writeln!(file, "colorbar: true").unwrap();
        file.flush().unwrap();

        let style = ThumbnailConfig::from_yaml_file(file.path())
            .unwrap()
            .path_style();
        assert_relative_eq!(style.point_size, 2.5);
        assert!(!style.up_axis);
        assert!(style.colorbar);
    }

    #[test]
    fn rejects_extension_without_dot() {
        let config = ThumbnailConfig {
            extension: "png".to_string(),
            ..ThumbnailConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ThumbnailError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_non_positive_point_size() {
        let config = ThumbnailConfig {
            point_size: 0.0,
            ..ThumbnailConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
