//! Overlapping pattern model.
//!
//! N×N patterns are cut from a sample image (every position, expanded by up
//! to eight dihedral transforms), weighted by how often they occur, and two
//! patterns may overlap-neighbor each other when their shared cells agree.
//! The output grid is solved over pattern indices; rendering reads each
//! cell's color from the pattern anchored at it.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use tessella_spec::Heuristic;

use crate::error::BackendError;
use crate::png;
use crate::wave::{Propagator, Wave, DX, DY};

#[derive(Debug)]
pub struct OverlappingModel {
    wave: Wave,
    mx: usize,
    my: usize,
    n: usize,
    colors: Vec<[u8; 4]>,
    patterns: Vec<Vec<u8>>,
}

impl OverlappingModel {
    /// Loads the sample image from disk and builds the model.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        sample_path: &Path,
        n: u32,
        width: u32,
        height: u32,
        periodic_input: bool,
        periodic: bool,
        symmetry: u32,
        ground: bool,
        heuristic: Heuristic,
    ) -> Result<Self, BackendError> {
        let sample = image::open(sample_path)
            .map_err(|source| BackendError::SampleRead {
                path: sample_path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Self::from_image(
            &sample,
            sample_path,
            n,
            width,
            height,
            periodic_input,
            periodic,
            symmetry,
            ground,
            heuristic,
        )
    }

    /// Builds the model from an already-decoded sample image. `source` is
    /// only used in error messages.
    #[allow(clippy::too_many_arguments)]
    pub fn from_image(
        sample: &RgbaImage,
        source: &Path,
        n: u32,
        width: u32,
        height: u32,
        periodic_input: bool,
        periodic: bool,
        symmetry: u32,
        ground: bool,
        heuristic: Heuristic,
    ) -> Result<Self, BackendError> {
        let n = n as usize;
        let (mx, my) = (width as usize, height as usize);
        let (sx, sy) = (sample.width() as usize, sample.height() as usize);
        if !periodic_input && (sx < n || sy < n) {
            return Err(BackendError::SampleTooSmall {
                path: source.to_path_buf(),
                n: n as u32,
            });
        }

        // Index the sample into a small palette.
        let mut colors: Vec<[u8; 4]> = Vec::new();
        let mut indices: Vec<u8> = Vec::with_capacity(sx * sy);
        for pixel in sample.pixels() {
            let rgba = pixel.0;
            let index = match colors.iter().position(|c| *c == rgba) {
                Some(i) => i,
                None => {
                    if colors.len() >= 256 {
                        return Err(BackendError::PaletteOverflow {
                            path: source.to_path_buf(),
                        });
                    }
                    colors.push(rgba);
                    colors.len() - 1
                }
            };
            indices.push(index as u8);
        }

        // Extract patterns, expanding each position by the dihedral
        // transforms and folding duplicates into weights. Patterns keep
        // their first-seen order so the state numbering is deterministic.
        let mut patterns: Vec<Vec<u8>> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();
        let mut index_of: HashMap<Vec<u8>, usize> = HashMap::new();

        let xmax = if periodic_input { sx } else { sx - n + 1 };
        let ymax = if periodic_input { sy } else { sy - n + 1 };
        for y in 0..ymax {
            for x in 0..xmax {
                let mut variants: Vec<Vec<u8>> = Vec::with_capacity(8);
                variants.push(pattern_at(&indices, sx, sy, x, y, n));
                for k in 1..8 {
                    let next = if k % 2 == 1 {
                        reflect(&variants[k - 1], n)
                    } else {
                        rotate(&variants[k - 2], n)
                    };
                    variants.push(next);
                }

                for variant in variants.into_iter().take(symmetry as usize) {
                    match index_of.get(&variant) {
                        Some(&i) => weights[i] += 1.0,
                        None => {
                            index_of.insert(variant.clone(), patterns.len());
                            patterns.push(variant);
                            weights.push(1.0);
                        }
                    }
                }
            }
        }

        let t = patterns.len();
        let mut propagator: Propagator = std::array::from_fn(|_| vec![Vec::new(); t]);
        for (d, row) in propagator.iter_mut().enumerate() {
            for t1 in 0..t {
                for t2 in 0..t {
                    if agrees(&patterns[t1], &patterns[t2], DX[d], DY[d], n as i32) {
                        row[t1].push(t2 as u32);
                    }
                }
            }
        }

        let mut wave = Wave::new(mx, my, n, periodic, heuristic, weights, propagator);

        if ground {
            // The bottom output row is pinned to patterns whose bottom-left
            // cell matches the sample's bottom row, and those patterns are
            // excluded everywhere else.
            let mut bans = Vec::new();
            for x in 0..mx {
                let ground_color = indices[x % sx + (sy - 1) * sx];
                for (p, pattern) in patterns.iter().enumerate() {
                    if pattern[n * (n - 1)] != ground_color {
                        bans.push((x + (my - 1) * mx, p));
                    } else {
                        for y in 0..my - 1 {
                            bans.push((x + y * mx, p));
                        }
                    }
                }
            }
            wave.set_init_bans(bans);
        }

        Ok(Self {
            wave,
            mx,
            my,
            n,
            colors,
            patterns,
        })
    }

    /// Number of distinct patterns after symmetry expansion.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Runs one generation attempt. Deterministic for a fixed seed.
    pub fn run(&mut self, seed: u32, limit: Option<u32>) -> bool {
        self.wave.run(seed, limit)
    }

    /// Writes the rendered output as a PNG.
    pub fn save(&self, path: &Path) -> Result<(), BackendError> {
        let bitmap = self.render();
        png::write_rgba(&bitmap, self.mx as u32, self.my as u32, path)
    }

    fn render(&self) -> Vec<u8> {
        let (mx, my, n) = (self.mx, self.my, self.n);
        let mut bitmap = vec![0u8; mx * my * 4];

        if self.wave.is_fully_observed() {
            // Cells in the last n-1 rows/columns have no anchored node of
            // their own; they read the interior of a nearby pattern.
            for y in 0..my {
                let dy = if y < (my + 1).saturating_sub(n) { 0 } else { n - 1 };
                for x in 0..mx {
                    let dx = if x < (mx + 1).saturating_sub(n) { 0 } else { n - 1 };
                    let node = (x - dx) + (y - dy) * mx;
                    let pattern = &self.patterns[self.wave.observed_at(node)];
                    let color = self.colors[pattern[dx + dy * n] as usize];
                    put_pixel(&mut bitmap, mx, x, y, color);
                }
            }
        } else {
            // Partially decided grid: blend every pattern still possible at
            // every node overlapping the cell.
            for y in 0..my {
                for x in 0..mx {
                    let mut acc = [0u64; 4];
                    let mut contributors = 0u64;
                    for dy in 0..n {
                        for dx in 0..n {
                            let mut sx = x as i32 - dx as i32;
                            if sx < 0 {
                                sx += mx as i32;
                            }
                            let mut sy = y as i32 - dy as i32;
                            if sy < 0 {
                                sy += my as i32;
                            }
                            if self.wave.on_boundary(sx, sy) {
                                continue;
                            }
                            let node = sx as usize + sy as usize * mx;
                            for (p, pattern) in self.patterns.iter().enumerate() {
                                if self.wave.allows(node, p) {
                                    contributors += 1;
                                    let color = self.colors[pattern[dx + dy * n] as usize];
                                    for (a, c) in acc.iter_mut().zip(color) {
                                        *a += c as u64;
                                    }
                                }
                            }
                        }
                    }
                    let color = if contributors == 0 {
                        [0, 0, 0, 255]
                    } else {
                        [
                            (acc[0] / contributors) as u8,
                            (acc[1] / contributors) as u8,
                            (acc[2] / contributors) as u8,
                            (acc[3] / contributors) as u8,
                        ]
                    };
                    put_pixel(&mut bitmap, mx, x, y, color);
                }
            }
        }

        bitmap
    }
}

fn pattern_at(indices: &[u8], sx: usize, sy: usize, x: usize, y: usize, n: usize) -> Vec<u8> {
    let mut pattern = Vec::with_capacity(n * n);
    for dy in 0..n {
        for dx in 0..n {
            pattern.push(indices[(x + dx) % sx + ((y + dy) % sy) * sx]);
        }
    }
    pattern
}

fn rotate(pattern: &[u8], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(pattern[n - 1 - y + x * n]);
        }
    }
    out
}

fn reflect(pattern: &[u8], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(pattern[n - 1 - x + y * n]);
        }
    }
    out
}

/// Whether two patterns agree on their overlap when the second is shifted by
/// (dx, dy).
fn agrees(p1: &[u8], p2: &[u8], dx: i32, dy: i32, n: i32) -> bool {
    let xmin = dx.max(0);
    let xmax = if dx < 0 { dx + n } else { n };
    let ymin = dy.max(0);
    let ymax = if dy < 0 { dy + n } else { n };
    for y in ymin..ymax {
        for x in xmin..xmax {
            if p1[(x + n * y) as usize] != p2[((x - dx) + n * (y - dy)) as usize] {
                return false;
            }
        }
    }
    true
}

fn put_pixel(bitmap: &mut [u8], mx: usize, x: usize, y: usize, color: [u8; 4]) {
    let i = (x + y * mx) * 4;
    bitmap[i..i + 4].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    fn checker_model(width: u32, height: u32) -> OverlappingModel {
        OverlappingModel::from_image(
            &checkerboard(4),
            Path::new("checker"),
            2,
            width,
            height,
            true,
            true,
            1,
            false,
            Heuristic::Entropy,
        )
        .unwrap()
    }

    #[test]
    fn checkerboard_has_two_patterns() {
        let model = checker_model(8, 8);
        assert_eq!(model.pattern_count(), 2);
    }

    #[test]
    fn symmetry_expansion_folds_duplicates() {
        // The checkerboard's two phases map onto each other under the
        // dihedral transforms, so expansion adds weight, not patterns.
        let model = OverlappingModel::from_image(
            &checkerboard(4),
            Path::new("checker"),
            2,
            8,
            8,
            true,
            true,
            8,
            false,
            Heuristic::Entropy,
        )
        .unwrap();
        assert_eq!(model.pattern_count(), 2);
    }

    #[test]
    fn checkerboard_always_solves() {
        let mut model = checker_model(8, 8);
        for seed in [0u32, 1, 42, 12345] {
            assert!(model.run(seed, None), "seed {} should solve", seed);
        }
    }

    #[test]
    fn same_seed_saves_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a.png"), dir.path().join("b.png"));

        let mut model = checker_model(8, 8);
        assert!(model.run(7, None));
        model.save(&a).unwrap();
        let mut model = checker_model(8, 8);
        assert!(model.run(7, None));
        model.save(&b).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn saved_image_has_output_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut model = checker_model(12, 6);
        assert!(model.run(3, None));
        model.save(&path).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgba8().dimensions(), (12, 6));
    }

    #[test]
    fn small_sample_is_rejected_without_periodic_input() {
        let sample = checkerboard(1);
        let err = OverlappingModel::from_image(
            &sample,
            Path::new("tiny"),
            2,
            8,
            8,
            false,
            true,
            1,
            false,
            Heuristic::Entropy,
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::SampleTooSmall { .. }));
    }

    #[test]
    fn missing_sample_file_is_reported() {
        let err = OverlappingModel::load(
            Path::new("/nonexistent/sample.png"),
            3,
            8,
            8,
            true,
            true,
            1,
            false,
            Heuristic::Entropy,
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::SampleRead { .. }));
    }
}
