//! Run configuration

use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};
use crate::image_cache::DEFAULT_CACHE_DIR;
use crate::render::{PageGeometry, DEFAULT_BLEED_MM};
use crate::scryfall::{ImageQuality, DEFAULT_API_URL};

/// Everything a run needs to know, resolved from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Bleed margin around each card, in mm
    pub bleed_mm: f32,
    pub quality: ImageQuality,
    pub cache_dir: PathBuf,
    /// Scryfall-compatible API root
    pub api_url: String,
    /// Suppress progress output
    pub quiet: bool,
}

impl Config {
    /// Defaults for `input_path`: output named after the input, 3 mm bleed
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_path = default_output_path(&input_path);
        Self {
            input_path,
            output_path,
            bleed_mm: DEFAULT_BLEED_MM,
            quality: ImageQuality::default(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            api_url: DEFAULT_API_URL.to_string(),
            quiet: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bleed_mm.is_finite() || self.bleed_mm < 0.0 {
            return Err(DeckError::InvalidBleed(self.bleed_mm));
        }
        Ok(())
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.bleed_mm)
    }
}

/// Input file name with its extension swapped for `.pdf`, in the working directory
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    PathBuf::from(format!("{stem}.pdf"))
}
