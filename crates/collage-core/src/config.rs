use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Encoding used when writing the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pick from the output file extension (`.png` => PNG, anything else => JPEG).
    #[default]
    Auto,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Resolves `Auto` against a concrete output path.
    pub fn resolve(self, path: &Path) -> OutputFormat {
        match self {
            OutputFormat::Auto => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|s| s.to_ascii_lowercase());
                match ext.as_deref() {
                    Some("png") => OutputFormat::Png,
                    _ => OutputFormat::Jpeg,
                }
            }
            other => other,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

/// Label text derived from a tile's zero-based index: `{n}` in `template` is
/// replaced with `index + start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Numbering {
    #[serde(default = "default_number_start")]
    pub start: usize,
    #[serde(default = "default_label_template")]
    pub template: String,
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            start: default_number_start(),
            template: default_label_template(),
        }
    }
}

impl Numbering {
    pub fn label(&self, index: usize) -> String {
        let n = index.saturating_add(self.start);
        self.template.replace("{n}", &n.to_string())
    }
}

/// Complete collage configuration. All fields have defaults; see [`LayoutOverrides`]
/// for partial overrides merged on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Expected tile width in pixels (cell width).
    pub tile_width: u32,
    /// Expected tile height in pixels (cell height).
    pub tile_height: u32,
    /// Resize tiles whose size differs from the cell, keeping aspect ratio.
    pub resize: bool,

    /// Grid column count. Rows are derived from the tile count.
    pub cols: u32,
    /// Number of leading empty cells before the first tile.
    pub offset: u32,
    /// Pixels around the whole canvas.
    pub padding: u32,
    /// Pixels between adjacent tiles.
    pub gap: u32,
    pub bgcolor: Color,

    /// Draw a label in the bottom-right corner of every tile.
    pub write: bool,
    /// TrueType/OpenType font file; required when `write` is set.
    pub font: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
    pub font_color: Color,
    /// Inset of the label from the tile's bottom-right corner.
    pub font_padding: u32,
    pub numbering: Numbering,

    /// Encoder quality, 1..=100. Only JPEG uses it.
    pub quality: u8,
    pub format: OutputFormat,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tile_width: 160,
            tile_height: 240,
            resize: false,
            cols: 5,
            offset: 0,
            padding: 5,
            gap: 2,
            bgcolor: Color::WHITE,
            write: false,
            font: None,
            font_size: 20.0,
            font_color: Color::WHITE,
            font_padding: 10,
            numbering: Numbering::default(),
            quality: 90,
            format: OutputFormat::Auto,
        }
    }
}

impl LayoutConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - `cols` is zero
    /// - the tile size has a zero side
    /// - `quality` is outside 1..=100
    /// - labels are enabled without a font or with a non-positive font size
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::CollageError;

        if self.cols == 0 {
            return Err(CollageError::InvalidConfig(
                "cols must be greater than 0".into(),
            ));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(CollageError::InvalidConfig(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(CollageError::InvalidConfig(format!(
                "quality must be within 1..=100, got {}",
                self.quality
            )));
        }
        if self.write {
            if self.font.is_none() {
                return Err(CollageError::InvalidConfig(
                    "write is enabled but no font was given".into(),
                ));
            }
            if !(self.font_size.is_finite() && self.font_size > 0.0) {
                return Err(CollageError::InvalidConfig(format!(
                    "font_size must be positive, got {}",
                    self.font_size
                )));
            }
        }
        Ok(())
    }

    /// Create a fluent builder for `LayoutConfig`.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }
}

fn default_number_start() -> usize {
    1
}
fn default_label_template() -> String {
    "{n}".into()
}

/// Builder for `LayoutConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct LayoutConfigBuilder {
    cfg: LayoutConfig,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: LayoutConfig::default(),
        }
    }
    pub fn tile_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.tile_width = w;
        self.cfg.tile_height = h;
        self
    }
    pub fn resize(mut self, v: bool) -> Self {
        self.cfg.resize = v;
        self
    }
    pub fn cols(mut self, v: u32) -> Self {
        self.cfg.cols = v;
        self
    }
    pub fn offset(mut self, v: u32) -> Self {
        self.cfg.offset = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn gap(mut self, v: u32) -> Self {
        self.cfg.gap = v;
        self
    }
    pub fn bgcolor(mut self, v: Color) -> Self {
        self.cfg.bgcolor = v;
        self
    }
    /// Enables labels using the given font file.
    pub fn font(mut self, path: impl Into<PathBuf>) -> Self {
        self.cfg.font = Some(path.into());
        self.cfg.write = true;
        self
    }
    pub fn write(mut self, v: bool) -> Self {
        self.cfg.write = v;
        self
    }
    pub fn font_size(mut self, v: f32) -> Self {
        self.cfg.font_size = v;
        self
    }
    pub fn font_color(mut self, v: Color) -> Self {
        self.cfg.font_color = v;
        self
    }
    pub fn font_padding(mut self, v: u32) -> Self {
        self.cfg.font_padding = v;
        self
    }
    pub fn numbering(mut self, v: Numbering) -> Self {
        self.cfg.numbering = v;
        self
    }
    pub fn quality(mut self, v: u8) -> Self {
        self.cfg.quality = v;
        self
    }
    pub fn format(mut self, v: OutputFormat) -> Self {
        self.cfg.format = v;
        self
    }
    pub fn build(self) -> LayoutConfig {
        self.cfg
    }
}

/// Partial configuration: every field optional. Used for settings files and
/// command-line flags layered over the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOverrides {
    pub tile_width: Option<u32>,
    pub tile_height: Option<u32>,
    pub resize: Option<bool>,
    pub cols: Option<u32>,
    pub offset: Option<u32>,
    pub padding: Option<u32>,
    pub gap: Option<u32>,
    pub bgcolor: Option<Color>,
    pub write: Option<bool>,
    pub font: Option<PathBuf>,
    pub font_size: Option<f32>,
    pub font_color: Option<Color>,
    pub font_padding: Option<u32>,
    pub number_start: Option<usize>,
    pub label_format: Option<String>,
    pub quality: Option<u8>,
    pub format: Option<OutputFormat>,
}

impl LayoutOverrides {
    /// Overlays every field that is set onto `cfg`.
    pub fn apply(self, mut cfg: LayoutConfig) -> LayoutConfig {
        if let Some(v) = self.tile_width {
            cfg.tile_width = v;
        }
        if let Some(v) = self.tile_height {
            cfg.tile_height = v;
        }
        if let Some(v) = self.resize {
            cfg.resize = v;
        }
        if let Some(v) = self.cols {
            cfg.cols = v;
        }
        if let Some(v) = self.offset {
            cfg.offset = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.gap {
            cfg.gap = v;
        }
        if let Some(v) = self.bgcolor {
            cfg.bgcolor = v;
        }
        if let Some(v) = self.write {
            cfg.write = v;
        }
        if let Some(v) = self.font {
            cfg.font = Some(v);
        }
        if let Some(v) = self.font_size {
            cfg.font_size = v;
        }
        if let Some(v) = self.font_color {
            cfg.font_color = v;
        }
        if let Some(v) = self.font_padding {
            cfg.font_padding = v;
        }
        if let Some(v) = self.number_start {
            cfg.numbering.start = v;
        }
        if let Some(v) = self.label_format {
            cfg.numbering.template = v;
        }
        if let Some(v) = self.quality {
            cfg.quality = v;
        }
        if let Some(v) = self.format {
            cfg.format = v;
        }
        cfg
    }

    /// Combines two override sets; fields set in `other` win.
    pub fn merge(self, other: LayoutOverrides) -> LayoutOverrides {
        LayoutOverrides {
            tile_width: other.tile_width.or(self.tile_width),
            tile_height: other.tile_height.or(self.tile_height),
            resize: other.resize.or(self.resize),
            cols: other.cols.or(self.cols),
            offset: other.offset.or(self.offset),
            padding: other.padding.or(self.padding),
            gap: other.gap.or(self.gap),
            bgcolor: other.bgcolor.or(self.bgcolor),
            write: other.write.or(self.write),
            font: other.font.or(self.font),
            font_size: other.font_size.or(self.font_size),
            font_color: other.font_color.or(self.font_color),
            font_padding: other.font_padding.or(self.font_padding),
            number_start: other.number_start.or(self.number_start),
            label_format: other.label_format.or(self.label_format),
            quality: other.quality.or(self.quality),
            format: other.format.or(self.format),
        }
    }
}
