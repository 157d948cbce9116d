//! Tile-set definitions for the simple-tiled variant.
//!
//! A tile set is a JSON document mapping tile names to a weight, a display
//! color, and four edge labels. Two tiles may sit next to each other when
//! the labels on their facing edges match. Jobs select tiles through a named
//! subset, so one tile set can serve several jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Edge index for the top edge of a tile.
pub const EDGE_UP: usize = 0;
/// Edge index for the right edge of a tile.
pub const EDGE_RIGHT: usize = 1;
/// Edge index for the bottom edge of a tile.
pub const EDGE_DOWN: usize = 2;
/// Edge index for the left edge of a tile.
pub const EDGE_LEFT: usize = 3;

fn default_tile_size() -> u32 {
    8
}

fn default_weight() -> f64 {
    1.0
}

/// One tile definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile name, unique within the set.
    pub name: String,
    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Display color as RGB.
    pub color: [u8; 3],
    /// Edge labels in up, right, down, left order.
    pub edges: [String; 4],
}

/// A named collection of tiles and subsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSet {
    /// Rendered edge length of one tile in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// All tiles in the set.
    pub tiles: Vec<Tile>,
    /// Named tile subsets jobs can select.
    #[serde(default)]
    pub subsets: BTreeMap<String, Vec<String>>,
}
