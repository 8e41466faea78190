//! Rendering style, loaded once before the pipeline starts.
//!
//! The style is a plain value handed to the renderer; nothing reads it from
//! process-wide state. Loading is best effort: a bad style file falls back to
//! the built-in defaults and the fallback is reported as a [`StyleStatus`].

use std::fs;
use std::path::{Path, PathBuf};

use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor, TextStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifact::ImageFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub format: ImageFormat,
    pub font_family: String,
    pub title_size: u32,
    pub label_size: u32,
    /// Full-size figures (histogram, precision-recall), in pixels.
    pub figure_size: (u32, u32),
    pub mini_size: (u32, u32),
    pub matrix_size: (u32, u32),
    pub histogram_color: [u8; 3],
    /// Present cells of correctly classified rows.
    pub present_color: [u8; 3],
    /// Present cells of misclassified rows.
    pub error_color: [u8; 3],
    pub curve_color: [u8; 3],
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            format: ImageFormat::Svg,
            font_family: "sans-serif".to_string(),
            title_size: 18,
            label_size: 12,
            figure_size: (600, 400),
            mini_size: (400, 200),
            matrix_size: (900, 600),
            histogram_color: [0x33, 0x7a, 0xb7],
            present_color: [64, 64, 64],
            error_color: [209, 60, 75],
            curve_color: [66, 136, 181],
        }
    }
}

impl RenderStyle {
    pub fn text(&self, size: u32) -> TextStyle<'_> {
        FontDesc::new(FontFamily::Name(&self.font_family), f64::from(size), FontStyle::Normal).into()
    }
}

pub(crate) fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// How the style in use came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleStatus {
    /// No style file was given; built-in defaults.
    Default,
    Applied { source: PathBuf },
    /// The style file could not be used; built-in defaults.
    Fallback { reason: String },
}

impl StyleStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, StyleStatus::Fallback { .. })
    }
}

#[derive(Debug, Clone)]
pub struct StyleOutcome {
    pub style: RenderStyle,
    pub status: StyleStatus,
}

/// Reset to the defaults, then layer the style file on top if one is given.
///
/// Never fails; calling it again with the same path gives the same outcome.
pub fn configure_style(path: Option<&Path>) -> StyleOutcome {
    let Some(path) = path else {
        return StyleOutcome {
            style: RenderStyle::default(),
            status: StyleStatus::Default,
        };
    };

    match load_style(path) {
        Ok(style) => {
            info!("Using render style from {}", path.display());
            StyleOutcome {
                style,
                status: StyleStatus::Applied {
                    source: path.to_path_buf(),
                },
            }
        }
        Err(reason) => {
            warn!("Style {} unusable ({}), falling back to defaults", path.display(), reason);
            StyleOutcome {
                style: RenderStyle::default(),
                status: StyleStatus::Fallback { reason },
            }
        }
    }
}

fn load_style(path: &Path) -> Result<RenderStyle, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let style: RenderStyle = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    let sizes = [style.figure_size, style.mini_size, style.matrix_size];
    if sizes.iter().any(|&(w, h)| w == 0 || h == 0) {
        return Err("figure sizes must be non-zero".to_string());
    }
    Ok(style)
}
