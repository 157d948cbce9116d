//! Bounded-retry orchestration.
//!
//! For every screenshot a job requests, the runner drives the generation
//! capability through up to `attempts` seeds, stopping at the first success
//! and handing the result to the [`ArtifactWriter`]. Contradictions are
//! expected and only logged; a screenshot whose attempt budget runs out is
//! skipped without error. Only artifact I/O failures propagate.

use anyhow::Result;
use colored::Colorize;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tessella_backend_wave::Generator;
use tessella_spec::JobSpec;

use crate::artifact::{ArtifactWriter, WrittenArtifacts};

/// Default attempt budget per screenshot.
pub const DEFAULT_ATTEMPTS: u32 = 10;

/// Where attempt seeds come from.
///
/// The driver owns one source for the whole run and passes it to every job,
/// so the non-override seed sequence is a single stream advanced once per
/// attempt rather than ambient global state.
pub enum SeedSource {
    /// A fixed seed; every attempt reuses it. Activates deterministic mode.
    Override(u32),
    /// A PCG32 stream advanced once per attempt.
    Random(Pcg32),
}

impl SeedSource {
    /// Builds the source for a run: the override when one was supplied,
    /// otherwise an entropy-seeded stream.
    pub fn from_override(override_seed: Option<u32>) -> Self {
        match override_seed {
            Some(seed) => SeedSource::Override(seed),
            None => SeedSource::Random(Pcg32::from_entropy()),
        }
    }

    /// The seed for the next attempt.
    pub fn next_seed(&mut self) -> u32 {
        match self {
            SeedSource::Override(seed) => *seed,
            SeedSource::Random(rng) => rng.gen(),
        }
    }

    /// Whether this source is a fixed override.
    pub fn is_override(&self) -> bool {
        matches!(self, SeedSource::Override(_))
    }
}

/// The record of one attempt. Created and consumed within the retry loop;
/// returned to the driver for reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// The exact seed passed to the generation capability.
    pub seed: u32,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Artifacts written for a successful attempt.
    pub artifacts: Option<WrittenArtifacts>,
}

/// Runs one job: up to `attempts` seeds for each requested screenshot.
///
/// With an override seed this collapses to exactly one screenshot and one
/// attempt: re-invoking the capability with the same seed and parameters is
/// guaranteed to repeat the same outcome, and every repeat would target the
/// same filename.
pub fn run_job<G: Generator>(
    job: &JobSpec,
    model: &mut G,
    seeds: &mut SeedSource,
    writer: &ArtifactWriter,
    attempts: u32,
) -> Result<Vec<AttemptOutcome>> {
    let (screenshots, attempts) = if seeds.is_override() {
        (1, 1)
    } else {
        (job.screenshots, attempts)
    };

    let mut outcomes = Vec::new();
    for screenshot in 0..screenshots {
        let mut succeeded = false;
        for attempt in 0..attempts {
            let seed = seeds.next_seed();
            let success = model.run(seed, job.limit);
            let tag = format!(
                "> [{}/{}] attempt {}/{}:",
                screenshot + 1,
                screenshots,
                attempt + 1,
                attempts
            );
            if success {
                let artifacts = writer.write(job, seed, model)?;
                let companion = match &artifacts.secondary {
                    Some(path) => format!(" & {}", path.display()),
                    None => String::new(),
                };
                println!(
                    "{} {} wrote {}{}",
                    tag.dimmed(),
                    "DONE;".green().bold(),
                    artifacts.primary.display(),
                    companion
                );
                outcomes.push(AttemptOutcome {
                    seed,
                    success: true,
                    artifacts: Some(artifacts),
                });
                succeeded = true;
                break;
            }

            println!(
                "{} {} (seed {})",
                tag.dimmed(),
                "CONTRADICTION".red(),
                seed
            );
            outcomes.push(AttemptOutcome {
                seed,
                success: false,
                artifacts: None,
            });
        }
        if !succeeded {
            println!(
                "  {} screenshot {} exhausted its {} attempts",
                "!".yellow(),
                screenshot + 1,
                attempts
            );
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use tessella_backend_wave::BackendError;

    /// Scripted stand-in for the generation capability. The script lists the
    /// outcome of each invocation; the last entry repeats.
    pub(crate) struct StubModel {
        script: Vec<bool>,
        text: Option<String>,
        pub invocations: usize,
        pub seeds: Vec<u32>,
    }

    impl StubModel {
        pub fn scripted(script: Vec<bool>) -> Self {
            Self {
                script,
                text: None,
                invocations: 0,
                seeds: Vec::new(),
            }
        }

        pub fn always_succeeding() -> Self {
            Self::scripted(vec![true])
        }

        pub fn always_contradicting() -> Self {
            Self::scripted(vec![false])
        }

        pub fn with_text(mut self, text: &str) -> Self {
            self.text = Some(text.to_string());
            self
        }
    }

    impl Generator for StubModel {
        fn run(&mut self, seed: u32, _limit: Option<u32>) -> bool {
            let outcome = *self
                .script
                .get(self.invocations)
                .or(self.script.last())
                .unwrap();
            self.invocations += 1;
            self.seeds.push(seed);
            outcome
        }

        fn save(&self, path: &Path) -> Result<(), BackendError> {
            std::fs::write(path, b"stub artifact")?;
            Ok(())
        }

        fn text_output(&self) -> Option<String> {
            self.text.clone()
        }
    }

    fn job(json: &str) -> JobSpec {
        serde_json::from_str(json).unwrap()
    }

    fn writer() -> (tempfile::TempDir, ArtifactWriter) {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        (dir, writer)
    }

    fn random_seeds() -> SeedSource {
        SeedSource::Random(Pcg32::seed_from_u64(999))
    }

    #[test]
    fn exhaustion_consumes_the_full_budget() {
        // screenshots=3 with a capability that always contradicts:
        // 3 * 10 invocations, no artifacts.
        let (dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 3 }"#);
        let mut model = StubModel::always_contradicting();
        let mut seeds = random_seeds();

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        assert_eq!(model.invocations, 30);
        assert!(outcomes.iter().all(|o| !o.success));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn first_success_stops_the_attempt_loop() {
        let (dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 1 }"#);
        let mut model = StubModel::scripted(vec![false, false, true]);
        let mut seeds = random_seeds();

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        assert_eq!(model.invocations, 3);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[2].success);
        let written = outcomes[2].artifacts.as_ref().unwrap();
        assert!(written.primary.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn recorded_seed_matches_the_artifact_filename() {
        let (_dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 1 }"#);
        let mut model = StubModel::always_succeeding();
        let mut seeds = random_seeds();

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        let outcome = &outcomes[0];
        assert_eq!(model.seeds, vec![outcome.seed]);
        assert_eq!(
            outcome.artifacts.as_ref().unwrap().primary,
            writer.primary_path("Maze", outcome.seed)
        );
    }

    #[test]
    fn override_seed_collapses_to_one_attempt() {
        let (dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 5 }"#);
        let mut model = StubModel::always_succeeding();
        let mut seeds = SeedSource::Override(12345);

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        assert_eq!(model.invocations, 1);
        assert_eq!(model.seeds, vec![12345]);
        assert_eq!(outcomes.len(), 1);
        assert!(dir.path().join("Maze 12345.png").exists());
    }

    #[test]
    fn override_seed_contradiction_is_not_retried() {
        let (dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze" }"#);
        let mut model = StubModel::always_contradicting();
        let mut seeds = SeedSource::Override(12345);

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        assert_eq!(model.invocations, 1);
        assert_eq!(outcomes, vec![AttemptOutcome {
            seed: 12345,
            success: false,
            artifacts: None,
        }]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn random_source_advances_between_attempts() {
        let (_dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 1 }"#);
        let mut model = StubModel::scripted(vec![false, false, false, true]);
        let mut seeds = random_seeds();

        run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        let mut unique = model.seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), model.seeds.len());
    }

    #[test]
    fn screenshots_are_independent() {
        // First screenshot succeeds on attempt 2, second on attempt 1.
        let (dir, writer) = writer();
        let job = job(r#"{ "model": "overlapping", "name": "Maze", "screenshots": 2 }"#);
        let mut model = StubModel::scripted(vec![false, true, true]);
        let mut seeds = random_seeds();

        let outcomes = run_job(&job, &mut model, &mut seeds, &writer, DEFAULT_ATTEMPTS).unwrap();

        assert_eq!(model.invocations, 3);
        assert_eq!(outcomes.iter().filter(|o| o.success).count(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
