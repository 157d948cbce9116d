//! Shared fixtures for the end-to-end tests.

use std::path::{Path, PathBuf};

use tessella_cli::commands::run::RunOptions;
use tessella_cli::runner::DEFAULT_ATTEMPTS;

/// A scratch project layout: job list, sample images, tile sets, and the
/// directories a run writes into.
pub struct Project {
    /// Root of the scratch layout.
    pub root: PathBuf,
}

impl Project {
    /// Lays out the standard directories under `root`.
    pub fn new(root: &Path) -> Self {
        for dir in ["samples", "tilesets", "manifests"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Writes the job list and returns its path.
    pub fn write_jobs(&self, body: &str) -> PathBuf {
        let path = self.root.join("jobs.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    /// Writes a two-terrain tile set (self-similar `grass` and `water` that
    /// never touch each other, so every attempt succeeds) under the given
    /// job name.
    pub fn write_terrain_tileset(&self, name: &str) {
        let body = serde_json::json!({
            "tile_size": 2,
            "tiles": [
                { "name": "grass", "color": [60, 160, 60], "edges": ["g", "g", "g", "g"] },
                { "name": "water", "weight": 0.5, "color": [40, 80, 200], "edges": ["w", "w", "w", "w"] }
            ],
            "subsets": { "all": ["grass", "water"] }
        });
        std::fs::write(
            self.root.join("tilesets").join(format!("{}.json", name)),
            serde_json::to_string_pretty(&body).unwrap(),
        )
        .unwrap();
    }

    /// Writes a 4x4 checkerboard sample (always solvable with N=2 on even
    /// periodic grids) under the given job name.
    pub fn write_checker_sample(&self, name: &str) {
        let sample = image::RgbaImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        sample
            .save(self.root.join("samples").join(format!("{}.png", name)))
            .unwrap();
    }

    /// The output directory of this project.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// The manifest directory of this project.
    pub fn manifest_dir(&self) -> PathBuf {
        self.root.join("manifests")
    }

    /// Run options against this layout.
    pub fn run_options(&self, jobs_path: &Path, override_seed: Option<u32>) -> RunOptions {
        RunOptions {
            jobs_path: jobs_path.to_path_buf(),
            out_dir: self.out_dir(),
            override_seed,
            attempts: DEFAULT_ATTEMPTS,
            samples_dir: self.root.join("samples"),
            tilesets_dir: self.root.join("tilesets"),
            manifest_dir: self.manifest_dir(),
        }
    }

    /// Filenames directly inside the output directory, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.out_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// The single manifest file of this project, if any run produced one.
    pub fn manifest_file(&self) -> Option<PathBuf> {
        std::fs::read_dir(self.manifest_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .next()
    }
}

/// Whether a string is exactly 64 lowercase hexadecimal characters.
pub fn is_64_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Manifest text with the elapsed-time line removed, for comparing two runs.
pub fn strip_elapsed(manifest: &str) -> String {
    manifest
        .lines()
        .filter(|line| !line.starts_with("Elapsed Milliseconds:"))
        .collect::<Vec<_>>()
        .join("\n")
}
