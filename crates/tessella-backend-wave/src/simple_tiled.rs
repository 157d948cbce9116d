//! Simple tiled model.
//!
//! Tiles come from a tile-set document with explicit edge labels; two tiles
//! may sit next to each other when the labels on their facing edges match.
//! Jobs select tiles through a named subset. Unlike the overlapping model
//! this variant knows its tiles by name, so it can also emit a textual
//! rendition of the solved grid.

use std::path::Path;

use tessella_spec::tileset::{EDGE_DOWN, EDGE_LEFT, EDGE_RIGHT, EDGE_UP};
use tessella_spec::{Heuristic, Tile, TileSet};

use crate::error::BackendError;
use crate::png;
use crate::wave::{Propagator, Wave};

#[derive(Debug)]
pub struct SimpleTiledModel {
    wave: Wave,
    tiles: Vec<Tile>,
    tile_size: u32,
    mx: usize,
    my: usize,
    black_background: bool,
}

impl SimpleTiledModel {
    /// Reads a tile-set file from disk and builds the model.
    pub fn load(
        tileset_path: &Path,
        subset: &str,
        width: u32,
        height: u32,
        periodic: bool,
        black_background: bool,
        heuristic: Heuristic,
    ) -> Result<Self, BackendError> {
        let raw = std::fs::read(tileset_path).map_err(|source| BackendError::TileSetRead {
            path: tileset_path.to_path_buf(),
            source,
        })?;
        let set: TileSet =
            serde_json::from_slice(&raw).map_err(|source| BackendError::TileSetParse {
                path: tileset_path.to_path_buf(),
                source,
            })?;
        Self::new(&set, subset, width, height, periodic, black_background, heuristic)
    }

    /// Builds the model from a parsed tile set.
    pub fn new(
        set: &TileSet,
        subset: &str,
        width: u32,
        height: u32,
        periodic: bool,
        black_background: bool,
        heuristic: Heuristic,
    ) -> Result<Self, BackendError> {
        let names = set
            .subsets
            .get(subset)
            .ok_or_else(|| BackendError::UnknownSubset {
                subset: subset.to_string(),
            })?;

        let mut tiles: Vec<Tile> = Vec::with_capacity(names.len());
        for name in names {
            let tile = set
                .tiles
                .iter()
                .find(|t| &t.name == name)
                .ok_or_else(|| BackendError::UnknownTile {
                    subset: subset.to_string(),
                    tile: name.clone(),
                })?;
            if tile.weight <= 0.0 {
                return Err(BackendError::NonPositiveWeight {
                    tile: tile.name.clone(),
                    weight: tile.weight,
                });
            }
            tiles.push(tile.clone());
        }
        if tiles.is_empty() {
            return Err(BackendError::EmptySubset {
                subset: subset.to_string(),
            });
        }

        // Edge-label adjacency in the solver's direction order
        // (left, down, right, up).
        let t = tiles.len();
        let mut propagator: Propagator = std::array::from_fn(|_| vec![Vec::new(); t]);
        for t1 in 0..t {
            for t2 in 0..t {
                if tiles[t2].edges[EDGE_RIGHT] == tiles[t1].edges[EDGE_LEFT] {
                    propagator[0][t1].push(t2 as u32);
                }
                if tiles[t2].edges[EDGE_UP] == tiles[t1].edges[EDGE_DOWN] {
                    propagator[1][t1].push(t2 as u32);
                }
                if tiles[t2].edges[EDGE_LEFT] == tiles[t1].edges[EDGE_RIGHT] {
                    propagator[2][t1].push(t2 as u32);
                }
                if tiles[t2].edges[EDGE_DOWN] == tiles[t1].edges[EDGE_UP] {
                    propagator[3][t1].push(t2 as u32);
                }
            }
        }

        let weights = tiles.iter().map(|tile| tile.weight).collect();
        let (mx, my) = (width as usize, height as usize);
        let wave = Wave::new(mx, my, 1, periodic, heuristic, weights, propagator);

        Ok(Self {
            wave,
            tiles,
            tile_size: set.tile_size.max(1),
            mx,
            my,
            black_background,
        })
    }

    /// Runs one generation attempt. Deterministic for a fixed seed.
    pub fn run(&mut self, seed: u32, limit: Option<u32>) -> bool {
        self.wave.run(seed, limit)
    }

    /// Writes the rendered output as a PNG of
    /// `width * tile_size` × `height * tile_size` pixels.
    pub fn save(&self, path: &Path) -> Result<(), BackendError> {
        let ts = self.tile_size as usize;
        let (w, h) = (self.mx * ts, self.my * ts);
        let mut bitmap = vec![0u8; w * h * 4];
        for cy in 0..self.my {
            for cx in 0..self.mx {
                let color = self.cell_color(cx + cy * self.mx);
                for py in 0..ts {
                    let row = (cy * ts + py) * w;
                    for px in 0..ts {
                        let i = (row + cx * ts + px) * 4;
                        bitmap[i..i + 4].copy_from_slice(&color);
                    }
                }
            }
        }
        png::write_rgba(&bitmap, w as u32, h as u32, path)
    }

    /// Renders the grid as one line per row of comma-separated tile names.
    /// Cells the last run left undecided render as `?`.
    pub fn text_output(&self) -> String {
        let mut out = String::new();
        for y in 0..self.my {
            let row: Vec<&str> = (0..self.mx)
                .map(|x| {
                    let node = x + y * self.mx;
                    if self.wave.is_fully_observed() {
                        self.tiles[self.wave.observed_at(node)].name.as_str()
                    } else {
                        "?"
                    }
                })
                .collect();
            out.push_str(&row.join(", "));
            out.push('\n');
        }
        out
    }

    fn cell_color(&self, node: usize) -> [u8; 4] {
        if self.wave.is_fully_observed() {
            let [r, g, b] = self.tiles[self.wave.observed_at(node)].color;
            return [r, g, b, 255];
        }
        if self.black_background {
            return [0, 0, 0, 255];
        }
        // Weighted blend of the tiles still possible at this cell.
        let mut acc = [0.0f64; 3];
        let mut total = 0.0f64;
        for (t, tile) in self.tiles.iter().enumerate() {
            if self.wave.allows(node, t) {
                total += tile.weight;
                for (a, c) in acc.iter_mut().zip(tile.color) {
                    *a += tile.weight * c as f64;
                }
            }
        }
        if total <= 0.0 {
            return [0, 0, 0, 255];
        }
        [
            (acc[0] / total) as u8,
            (acc[1] / total) as u8,
            (acc[2] / total) as u8,
            255,
        ]
    }
}
