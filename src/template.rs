//! Canvas and typography configuration shared by every page of a run.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorError, parse_hex};
use crate::font::{Typeface, load_typeface};
use crate::observe::Observer;

/// Configuration-level failures. These abort a run before any page is drawn.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed template {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("invalid template: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 100,
            bottom: 100,
            left: 100,
            right: 100,
        }
    }
}

/// On-disk template record. Every field is optional in the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    pub font_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold_font_path: Option<PathBuf>,
    pub font_size: f32,
    pub font_color: String,
    pub line_spacing: f32,
    pub margins: Margins,
    pub header_title: String,
    pub icon_dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            background_color: "#FFFFFF".to_string(),
            background_image: None,
            font_path: PathBuf::from("arial.ttf"),
            bold_font_path: None,
            font_size: 48.0,
            font_color: "#000000".to_string(),
            line_spacing: 1.5,
            margins: Margins::default(),
            header_title: "Notes".to_string(),
            icon_dir: PathBuf::from("assets"),
        }
    }
}

impl TemplateConfig {
    pub fn from_path(path: &Path) -> Result<Self, TemplateError> {
        let raw = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.width == 0 || self.height == 0 {
            return Err(TemplateError::Invalid(format!(
                "canvas must be non-empty (got {}x{})",
                self.width, self.height
            )));
        }
        let horizontal = self.margins.left as u64 + self.margins.right as u64;
        if horizontal >= self.width as u64 {
            return Err(TemplateError::Invalid(format!(
                "left + right margins ({}) leave no room on a {}px canvas",
                horizontal, self.width
            )));
        }
        if self.margins.bottom >= self.height {
            return Err(TemplateError::Invalid(format!(
                "bottom margin {} exceeds canvas height {}",
                self.margins.bottom, self.height
            )));
        }
        if !(self.line_spacing.is_finite() && self.line_spacing > 0.0) {
            return Err(TemplateError::Invalid(format!(
                "line_spacing must be positive (got {})",
                self.line_spacing
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(TemplateError::Invalid(format!(
                "font_size must be positive (got {})",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// Resolved template: validated geometry, parsed colors and a loaded typeface.
pub struct Template {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    pub background_image: Option<PathBuf>,
    pub margins: Margins,
    pub font_size: f32,
    pub font_color: Rgba<u8>,
    pub line_spacing: f32,
    pub header_title: String,
    pub icon_dir: PathBuf,
    typeface: Box<dyn Typeface>,
}

impl Template {
    /// Load from an optional JSON path, falling back to built-in defaults.
    pub fn load(path: Option<&Path>, observer: &dyn Observer) -> Result<Self, TemplateError> {
        let config = match path {
            Some(path) => TemplateConfig::from_path(path)?,
            None => TemplateConfig::default(),
        };
        Self::from_config(config, observer)
    }

    pub fn from_config(config: TemplateConfig, observer: &dyn Observer) -> Result<Self, TemplateError> {
        config.validate()?;
        let typeface = load_typeface(&config.font_path, config.bold_font_path.as_deref(), observer);
        Self::with_typeface(config, typeface)
    }

    /// Build with an explicit typeface, skipping font discovery.
    pub fn with_typeface(config: TemplateConfig, typeface: Box<dyn Typeface>) -> Result<Self, TemplateError> {
        config.validate()?;
        Ok(Self {
            width: config.width,
            height: config.height,
            background: parse_hex(&config.background_color)?,
            background_image: config.background_image,
            margins: config.margins,
            font_size: config.font_size,
            font_color: parse_hex(&config.font_color)?,
            line_spacing: config.line_spacing,
            header_title: config.header_title,
            icon_dir: config.icon_dir,
            typeface,
        })
    }

    pub fn typeface(&self) -> &dyn Typeface {
        self.typeface.as_ref()
    }

    /// Horizontal room between the left and right margins.
    pub fn content_width(&self) -> f32 {
        (self.width - self.margins.left - self.margins.right) as f32
    }

    /// Lowest y coordinate content may reach.
    pub fn content_bottom(&self) -> f32 {
        (self.height - self.margins.bottom) as f32
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("margins", &self.margins)
            .field("font_size", &self.font_size)
            .field("line_spacing", &self.line_spacing)
            .field("typeface", &self.typeface.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapTypeface;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TemplateConfig =
            serde_json::from_str(r##"{"width": 720, "margins": {"left": 40}, "font_color": "#222"}"##).unwrap();
        assert_eq!(config.width, 720);
        assert_eq!(config.height, 1920);
        assert_eq!(config.margins, Margins { left: 40, ..Margins::default() });
        assert_eq!(config.line_spacing, 1.5);

        let template = Template::with_typeface(config, Box::new(BitmapTypeface)).unwrap();
        assert_eq!(template.content_width(), 720.0 - 140.0);
        assert_eq!(template.font_color, Rgba([0x22, 0x22, 0x22, 0xff]));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"width\": ").unwrap();
        let err = TemplateConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Template::load(Some(Path::new("/nonexistent/template.json")), &()).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }

    #[test]
    fn rejects_bad_colors_and_geometry() {
        let bad_color = TemplateConfig {
            background_color: "white".into(),
            ..TemplateConfig::default()
        };
        assert!(matches!(
            Template::with_typeface(bad_color, Box::new(BitmapTypeface)),
            Err(TemplateError::Color(_))
        ));

        let squeezed = TemplateConfig {
            width: 150,
            ..TemplateConfig::default()
        };
        assert!(matches!(
            Template::with_typeface(squeezed, Box::new(BitmapTypeface)),
            Err(TemplateError::Invalid(_))
        ));

        let flat = TemplateConfig {
            line_spacing: 0.0,
            ..TemplateConfig::default()
        };
        assert!(Template::with_typeface(flat, Box::new(BitmapTypeface)).is_err());
    }

    #[test]
    fn missing_font_degrades_instead_of_failing() {
        let config = TemplateConfig {
            font_path: PathBuf::from("/nonexistent/font.ttf"),
            ..TemplateConfig::default()
        };
        let template = Template::from_config(config, &()).unwrap();
        assert!(!template.typeface().name().is_empty());
    }
}
