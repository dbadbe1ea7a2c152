//! Core library for arranging images into a fixed grid collage.
//!
//! - Layout: `GridLayout` sizes the canvas from the tile count, column count and offset
//! - Pipeline: `Composer` pastes tiles in input order, optionally resizing them and drawing labels
//! - Layout records are serde-serializable; `plan_layout` computes them without decoding pixels.
//!
//! Quick example:
//! ```ignore
//! use collage_core::{InputTile, LayoutConfig, Composer};
//! # fn main() -> anyhow::Result<()> {
//! let tiles = vec![InputTile::from_path("a.jpg"), InputTile::from_path("b.jpg")];
//! let cfg = LayoutConfig { cols: 2, resize: true, ..Default::default() };
//! let layout = Composer::new(cfg).compose_to_file(&tiles, "collage.jpg".as_ref())?;
//! println!("canvas: {}x{}", layout.width, layout.height);
//! # Ok(()) }
//! ```

pub mod color;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod label;
pub mod layout;
pub mod model;
pub mod pipeline;

pub use color::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use layout::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `collage_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{LayoutConfig, LayoutConfigBuilder, LayoutOverrides, Numbering, OutputFormat};
    pub use crate::layout::{GridLayout, plan_layout};
    pub use crate::model::{Cell, CollageLayout, GridInfo, Placement, Rect};
    pub use crate::pipeline::{Composer, InputTile, TileEvent, TileSource};
    pub use crate::{CollageOutput, compose, save_canvas};
}
