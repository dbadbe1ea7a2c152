//! Grid arithmetic: canvas size, cell positions, proportional tile sizes and
//! label anchors. Everything here is pure and independent of pixel data.

use crate::config::LayoutConfig;
use crate::error::{CollageError, Result};
use crate::model::{Cell, CollageLayout, GridInfo, Placement, Rect};

/// Computed grid for a given tile count and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    pub offset: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    pub gap: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl GridLayout {
    /// Sizes the grid for `count` tiles.
    ///
    /// `rows = ceil((count + offset) / cols)`; the canvas is
    /// `2·padding + n·tile + (n−1)·gap` along each axis, with the gap term
    /// dropped when there are no rows.
    pub fn compute(count: usize, cfg: &LayoutConfig) -> Result<Self> {
        if cfg.cols == 0 {
            return Err(CollageError::InvalidConfig(
                "cols must be greater than 0".into(),
            ));
        }
        let cols = cfg.cols as u64;
        let total = count as u64 + cfg.offset as u64;
        let rows = total.div_ceil(cols);

        let canvas_width = axis_extent(cols, cfg.tile_width, cfg.gap, cfg.padding);
        let canvas_height = axis_extent(rows, cfg.tile_height, cfg.gap, cfg.padding);
        let (Ok(rows), Some(canvas_width), Some(canvas_height)) = (
            u32::try_from(rows),
            canvas_width.and_then(|v| u32::try_from(v).ok()),
            canvas_height.and_then(|v| u32::try_from(v).ok()),
        ) else {
            return Err(CollageError::InvalidConfig(format!(
                "canvas for {} tiles in {} columns does not fit in u32 pixels",
                count, cfg.cols
            )));
        };

        Ok(Self {
            cols: cfg.cols,
            rows,
            offset: cfg.offset,
            tile_width: cfg.tile_width,
            tile_height: cfg.tile_height,
            padding: cfg.padding,
            gap: cfg.gap,
            canvas_width,
            canvas_height,
        })
    }

    /// Grid cell of the tile at zero-based `index`.
    pub fn cell(&self, index: usize) -> Cell {
        let pos = index as u64 + self.offset as u64;
        let cols = self.cols as u64;
        Cell {
            col: (pos % cols) as u32,
            row: (pos / cols) as u32,
        }
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, cell: Cell) -> (u32, u32) {
        (
            self.padding + cell.col * (self.tile_width + self.gap),
            self.padding + cell.row * (self.tile_height + self.gap),
        )
    }

    /// Top-left pixel of the tile at zero-based `index`.
    pub fn tile_origin(&self, index: usize) -> (u32, u32) {
        self.cell_origin(self.cell(index))
    }

    /// Full cell box of the tile at zero-based `index`.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let (x, y) = self.tile_origin(index);
        Rect::new(x, y, self.tile_width, self.tile_height)
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0, 0, self.canvas_width, self.canvas_height)
    }

    pub fn info(&self) -> GridInfo {
        GridInfo {
            cols: self.cols,
            rows: self.rows,
            offset: self.offset,
            tile_size: (self.tile_width, self.tile_height),
            padding: self.padding,
            gap: self.gap,
        }
    }
}

fn axis_extent(n: u64, tile: u32, gap: u32, padding: u32) -> Option<u64> {
    let tiles = n.checked_mul(tile as u64)?;
    let gaps = n.saturating_sub(1).checked_mul(gap as u64)?;
    tiles
        .checked_add(gaps)?
        .checked_add(2 * padding as u64)
}

/// Size a `(w, h)` tile should be scaled to so it fits inside `(tw, th)` with
/// its aspect ratio kept. The constrained side matches the target exactly; the
/// other side is truncated and never below 1.
pub fn fit_within(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (w, h) = (src.0.max(1) as f64, src.1.max(1) as f64);
    let (tw, th) = target;
    if w / h > tw as f64 / th as f64 {
        let h_to = (tw as f64 / w * h) as u32;
        (tw, h_to.max(1))
    } else {
        let w_to = (th as f64 / h * w) as u32;
        (w_to.max(1), th)
    }
}

/// Top-left position for a label of `text_size` so it sits in the bottom-right
/// corner of the cell at `origin`, inset by `padding` on both axes.
///
/// Signed because an oversized label extends past the cell's top-left.
pub fn label_anchor(
    origin: (u32, u32),
    tile_size: (u32, u32),
    text_size: (u32, u32),
    padding: u32,
) -> (i32, i32) {
    let x = origin.0 as i64 + tile_size.0 as i64 - text_size.0 as i64 - padding as i64;
    let y = origin.1 as i64 + tile_size.1 as i64 - text_size.1 as i64 - padding as i64;
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Size a tile will occupy on the canvas given its native size.
pub fn placed_size(native: (u32, u32), cfg: &LayoutConfig) -> ((u32, u32), bool) {
    let target = (cfg.tile_width, cfg.tile_height);
    if cfg.resize && native != target {
        (fit_within(native, target), true)
    } else {
        (native, false)
    }
}

/// Computes placements from native tile sizes without touching pixel data.
///
/// Produces the same rectangles as [`crate::compose`]. Labels hold the text
/// the default numbering would draw when `write` is set.
pub fn plan_layout<K: Clone>(
    sizes: &[(K, u32, u32)],
    cfg: &LayoutConfig,
) -> Result<CollageLayout<K>> {
    cfg.validate()?;
    let grid = GridLayout::compute(sizes.len(), cfg)?;
    let placements = sizes
        .iter()
        .enumerate()
        .map(|(i, (key, w, h))| {
            let ((pw, ph), resized) = placed_size((*w, *h), cfg);
            let (x, y) = grid.tile_origin(i);
            Placement {
                index: i,
                key: key.clone(),
                cell: grid.cell(i),
                rect: Rect::new(x, y, pw, ph),
                source_size: (*w, *h),
                resized,
                label: cfg.write.then(|| cfg.numbering.label(i)),
            }
        })
        .collect();
    Ok(CollageLayout {
        width: grid.canvas_width,
        height: grid.canvas_height,
        grid: grid.info(),
        placements,
    })
}
