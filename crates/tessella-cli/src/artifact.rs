//! Artifact persistence.
//!
//! Artifact filenames are fully determined by (job name, seed), with no
//! extra disambiguation: a re-run with the same seed overwrites the prior
//! file in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tessella_backend_wave::Generator;
use tessella_spec::JobSpec;

/// Paths written for one successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// The primary PNG artifact.
    pub primary: PathBuf,
    /// The textual companion, when the job asked for one and the variant
    /// supports it.
    pub secondary: Option<PathBuf>,
}

/// Writes artifacts for successful attempts into one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// The output directory artifacts land in.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Creates the output directory and deletes every file directly inside
    /// it. Subdirectories are left alone.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        for entry in std::fs::read_dir(&self.out_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Path of the primary artifact for a (job name, seed) pair.
    pub fn primary_path(&self, name: &str, seed: u32) -> PathBuf {
        self.out_dir.join(format!("{} {}.png", name, seed))
    }

    /// Path of the textual companion for a (job name, seed) pair.
    pub fn secondary_path(&self, name: &str, seed: u32) -> PathBuf {
        self.out_dir.join(format!("{} {}.txt", name, seed))
    }

    /// Persists the artifacts of a successful attempt. I/O failures are
    /// fatal to the run; a silently dropped artifact would desynchronize the
    /// manifest from what was requested.
    pub fn write<G: Generator>(
        &self,
        job: &JobSpec,
        seed: u32,
        model: &G,
    ) -> Result<WrittenArtifacts> {
        let primary = self.primary_path(&job.name, seed);
        model
            .save(&primary)
            .with_context(|| format!("failed to write artifact {}", primary.display()))?;

        let secondary = if job.text_output {
            match model.text_output() {
                Some(text) => {
                    let path = self.secondary_path(&job.name, seed);
                    std::fs::write(&path, text)
                        .with_context(|| format!("failed to write artifact {}", path.display()))?;
                    Some(path)
                }
                None => None,
            }
        } else {
            None
        };

        Ok(WrittenArtifacts { primary, secondary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::tests::StubModel;

    fn job(text_output: bool) -> JobSpec {
        serde_json::from_str(&format!(
            r#"{{ "model": "simple_tiled", "name": "Knots", "subset": "all", "text_output": {} }}"#,
            text_output
        ))
        .unwrap()
    }

    #[test]
    fn prepare_wipes_files_but_not_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("stale.png"), b"old").unwrap();
        std::fs::create_dir(out.join("keep")).unwrap();

        let writer = ArtifactWriter::new(&out);
        writer.prepare().unwrap();

        assert!(!out.join("stale.png").exists());
        assert!(out.join("keep").is_dir());
    }

    #[test]
    fn prepare_creates_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fresh");
        ArtifactWriter::new(&out).prepare().unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn filenames_embed_name_and_seed() {
        let writer = ArtifactWriter::new("output");
        assert_eq!(
            writer.primary_path("Flowers", 12345),
            PathBuf::from("output/Flowers 12345.png")
        );
        assert_eq!(
            writer.secondary_path("Flowers", 12345),
            PathBuf::from("output/Flowers 12345.txt")
        );
    }

    #[test]
    fn write_with_text_output() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let model = StubModel::always_succeeding().with_text("knot, knot\n");

        let written = writer.write(&job(true), 7, &model).unwrap();
        assert!(written.primary.exists());
        let secondary = written.secondary.expect("text artifact");
        assert_eq!(std::fs::read_to_string(secondary).unwrap(), "knot, knot\n");
    }

    #[test]
    fn write_without_text_support_skips_the_companion() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let model = StubModel::always_succeeding();

        let written = writer.write(&job(true), 7, &model).unwrap();
        assert_eq!(written.secondary, None);
        assert!(!writer.secondary_path("Knots", 7).exists());
    }

    #[test]
    fn text_flag_off_skips_the_companion() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let model = StubModel::always_succeeding().with_text("ignored");

        let written = writer.write(&job(false), 7, &model).unwrap();
        assert_eq!(written.secondary, None);
    }
}
