use crate::compositing::paste_rgb;
use crate::config::LayoutConfig;
use crate::error::{CollageError, Result};
use crate::export::save_canvas;
use crate::label::LabelStyle;
use crate::layout::{label_anchor, placed_size, GridLayout};
use crate::model::{CollageLayout, Placement, Rect};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageReader, RgbImage};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where a tile's pixels come from.
pub enum TileSource {
    /// Decoded lazily when the tile is placed.
    Path(PathBuf),
    /// Already decoded image.
    Image(DynamicImage),
}

impl TileSource {
    pub fn load(&self) -> std::result::Result<Cow<'_, DynamicImage>, ImageError> {
        match self {
            TileSource::Path(p) => {
                let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
                Ok(Cow::Owned(img))
            }
            TileSource::Image(img) => Ok(Cow::Borrowed(img)),
        }
    }
}

/// One tile to place (key + pixel source).
pub struct InputTile {
    pub key: String,
    pub source: TileSource,
}

impl InputTile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path.to_string_lossy().replace('\\', "/");
        Self {
            key,
            source: TileSource::Path(path),
        }
    }

    pub fn from_image(key: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            key: key.into(),
            source: TileSource::Image(image),
        }
    }
}

/// Composed canvas and the placements that produced it.
pub struct CollageOutput {
    pub canvas: RgbImage,
    pub layout: CollageLayout,
}

/// Reported before each tile is loaded.
#[derive(Debug, Clone, Copy)]
pub struct TileEvent<'k> {
    pub index: usize,
    pub total: usize,
    pub key: &'k str,
}

pub type NumberFn<'a> = Box<dyn Fn(usize) -> String + 'a>;
pub type PostProcessFn<'a> = Box<dyn FnMut(&mut RgbImage) -> Result<()> + 'a>;
pub type ProgressFn<'a> = Box<dyn FnMut(TileEvent<'_>) + 'a>;

/// Lays tiles out on a grid canvas according to a [`LayoutConfig`].
///
/// The label text and a final whole-canvas pass can be swapped out:
/// ```ignore
/// let out = Composer::new(cfg)
///     .with_numbering(|i| format!("#{}", i + 1))
///     .with_post_process(|canvas| { image::imageops::invert(canvas); Ok(()) })
///     .compose(&tiles)?;
/// ```
pub struct Composer<'a> {
    config: LayoutConfig,
    numbering: NumberFn<'a>,
    post_process: Option<PostProcessFn<'a>>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Composer<'a> {
    pub fn new(config: LayoutConfig) -> Self {
        let numbering = config.numbering.clone();
        Self {
            config,
            numbering: Box::new(move |i| numbering.label(i)),
            post_process: None,
            progress: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the label text function. Receives the zero-based tile index.
    pub fn with_numbering(mut self, f: impl Fn(usize) -> String + 'a) -> Self {
        self.numbering = Box::new(f);
        self
    }

    /// Runs `f` once on the finished canvas before it is returned or encoded.
    pub fn with_post_process(
        mut self,
        f: impl FnMut(&mut RgbImage) -> Result<()> + 'a,
    ) -> Self {
        self.post_process = Some(Box::new(f));
        self
    }

    pub fn with_progress(mut self, f: impl FnMut(TileEvent<'_>) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Places every tile in input order and returns the canvas with its layout.
    ///
    /// Fails fast: the first tile that cannot be decoded aborts the run. A grid
    /// with no rows and no padding has no pixels and is rejected up front.
    #[instrument(skip_all, fields(tiles = tiles.len()))]
    pub fn compose(self, tiles: &[InputTile]) -> Result<CollageOutput> {
        let Composer {
            config,
            numbering,
            mut post_process,
            mut progress,
        } = self;

        config.validate()?;
        let grid = GridLayout::compute(tiles.len(), &config)?;
        if grid.canvas_width == 0 || grid.canvas_height == 0 {
            return Err(CollageError::InvalidConfig(format!(
                "canvas would be empty ({}x{}): no tiles, offset or padding",
                grid.canvas_width, grid.canvas_height
            )));
        }
        info!(cols = grid.cols, rows = grid.rows, "creating grid");

        let style = if config.write {
            let path = config.font.as_deref().ok_or_else(|| {
                CollageError::InvalidConfig("write is enabled but no font was given".into())
            })?;
            Some(LabelStyle::load(path, config.font_size, config.font_color)?)
        } else {
            None
        };

        let mut canvas = RgbImage::from_pixel(
            grid.canvas_width,
            grid.canvas_height,
            config.bgcolor.to_rgb(),
        );
        let cell_size = (grid.tile_width, grid.tile_height);
        let mut placements = Vec::with_capacity(tiles.len());

        for (i, tile) in tiles.iter().enumerate() {
            if let Some(cb) = progress.as_mut() {
                cb(TileEvent {
                    index: i,
                    total: tiles.len(),
                    key: &tile.key,
                });
            }
            debug!(key = %tile.key, "processing tile");

            let cell = grid.cell(i);
            let (x, y) = grid.cell_origin(cell);

            let image = tile.source.load().map_err(|source| CollageError::TileLoad {
                key: tile.key.clone(),
                source,
            })?;
            let native = image.dimensions();
            let ((w, h), resized) = placed_size(native, &config);
            let rgb = if resized {
                debug!(from = ?native, to = ?(w, h), "resizing tile");
                image.resize_exact(w, h, FilterType::Lanczos3).to_rgb8()
            } else {
                image.to_rgb8()
            };
            drop(image);

            paste_rgb(&rgb, &mut canvas, x, y);

            let label = style.as_ref().map(|style| {
                let text = numbering(i);
                let text_box = style.measure(&text);
                let (lx, ly) = label_anchor((x, y), cell_size, text_box, config.font_padding);
                style.draw(&mut canvas, lx, ly, &text);
                text
            });

            placements.push(Placement {
                index: i,
                key: tile.key.clone(),
                cell,
                rect: Rect::new(x, y, rgb.width(), rgb.height()),
                source_size: native,
                resized,
                label,
            });
        }

        if let Some(hook) = post_process.as_mut() {
            hook(&mut canvas)?;
        }

        Ok(CollageOutput {
            canvas,
            layout: CollageLayout {
                width: grid.canvas_width,
                height: grid.canvas_height,
                grid: grid.info(),
                placements,
            },
        })
    }

    /// Composes and encodes the canvas to `path` using the configured format
    /// and quality. Nothing is written if composing fails.
    pub fn compose_to_file(self, tiles: &[InputTile], path: &Path) -> Result<CollageLayout> {
        let format = self.config.format;
        let quality = self.config.quality;
        let out = self.compose(tiles)?;
        info!(path = %path.display(), "writing output file");
        save_canvas(&out.canvas, path, format, quality)?;
        Ok(out.layout)
    }
}

/// Composes `tiles` with `cfg` using the default numbering and no post-processing.
pub fn compose(tiles: &[InputTile], cfg: LayoutConfig) -> Result<CollageOutput> {
    Composer::new(cfg).compose(tiles)
}
