use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// Returns true if `r` lies fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// Logical grid position of a tile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

/// Where a single tile landed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// Zero-based position in the input sequence.
    pub index: usize,
    /// User-specified key (e.g., file path).
    pub key: K,
    pub cell: Cell,
    /// Pasted rectangle. Equals the cell box unless the tile was resized or had
    /// a different native size.
    pub rect: Rect,
    /// Size of the tile before any resize.
    pub source_size: (u32, u32),
    pub resized: bool,
    /// Text drawn on the tile, if labels are enabled.
    pub label: Option<String>,
}

/// Grid dimensions recorded alongside the placements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridInfo {
    pub cols: u32,
    pub rows: u32,
    pub offset: u32,
    pub tile_size: (u32, u32),
    pub padding: u32,
    pub gap: u32,
}

/// Full description of a composed collage, independent of pixel data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollageLayout<K = String> {
    pub width: u32,
    pub height: u32,
    pub grid: GridInfo,
    pub placements: Vec<Placement<K>>,
}

impl<K> CollageLayout<K> {
    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Number of grid cells left empty (leading offset plus trailing cells).
    pub fn empty_cells(&self) -> u64 {
        let total = self.grid.cols as u64 * self.grid.rows as u64;
        total.saturating_sub(self.placements.len() as u64)
    }
}
