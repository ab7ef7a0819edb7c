use std::path::PathBuf;

use clap::Parser;

use crate::errors::Result;
use crate::types::ThumbnailConfig;

/// Generate 3D trajectory thumbnails for every session in a folder
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to folder with sessions
    #[arg(long, value_parser = dir_path)]
    pub path: PathBuf,

    /// Path to output folder if different from the sessions folder (--path)
    #[arg(long, value_parser = dir_path)]
    pub opath: Option<PathBuf>,

    /// Thumbnail image format (default .jpg)
    #[arg(long)]
    pub ext: Option<String>,

    /// Suffix added to each file name (default none)
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop at the first session that fails
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Draw a time colorbar next to each thumbnail
    #[arg(long, default_value_t = false)]
    pub colorbar: bool,

    /// Recordings use z as the vertical axis
    #[arg(long, default_value_t = false)]
    pub z_up: bool,

    /// Marker size of path samples
    #[arg(long)]
    pub point_size: Option<f64>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Accepts only existing directories.
pub fn dir_path(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("not a directory: {}", value))
    }
}

impl Args {
    /// Config file (or defaults) with command-line flags applied on top.
    pub fn to_config(&self) -> Result<ThumbnailConfig> {
        let mut config = match &self.config {
            Some(path) => ThumbnailConfig::from_yaml_file(path)?,
            None => ThumbnailConfig::default(),
        };

        if let Some(ext) = &self.ext {
            config.extension = ext.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.suffix = suffix.clone();
        }
        if let Some(point_size) = self.point_size {
            config.point_size = point_size;
        }
        if let Some(summary) = &self.summary {
            config.summary_path = Some(summary.clone());
        }
        if self.fail_fast {
            config.continue_on_error = false;
        }
        if self.colorbar {
            config.colorbar = true;
        }
        if self.z_up {
            config.up_axis = false;
        }

        config.validate()?;
        Ok(config)
    }
}
