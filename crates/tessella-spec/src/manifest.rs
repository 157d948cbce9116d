//! The reproducibility manifest.
//!
//! A deterministic run fingerprints its output directory as one
//! `"<filename>: <hash>"` line per file, sorted by filename ascending
//! byte-wise so the rendered text is independent of filesystem iteration
//! order, followed by a blank line and free-form run metadata. The metadata
//! lines are for human diagnosis and are the only part expected to differ
//! between otherwise identical runs.

/// One hashed output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Bare filename inside the output directory.
    pub filename: String,
    /// BLAKE3 content hash, 64 lowercase hex characters.
    pub digest: String,
}

/// Environment and timing descriptors recorded alongside the hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    /// Wall-clock time of the whole run in milliseconds.
    pub elapsed_ms: u64,
    /// Generator name and version.
    pub runtime: String,
    /// Operating system descriptor.
    pub operating_system: String,
    /// Logical processor count.
    pub processor_count: usize,
    /// Processor architecture descriptor.
    pub architecture: String,
}

/// The manifest of one deterministic run. Written exactly once; never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    /// Run metadata rendered after the hash lines.
    pub metadata: RunMetadata,
}

impl Manifest {
    /// Builds a manifest, sorting entries by filename ascending byte-wise.
    pub fn new(mut entries: Vec<ManifestEntry>, metadata: RunMetadata) -> Self {
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Self { entries, metadata }
    }

    /// The hashed files in sorted order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Renders the manifest text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!("{}: {}\n", entry.filename, entry.digest));
        }
        out.push('\n');
        out.push_str(&format!("Elapsed Milliseconds: {}\n", self.metadata.elapsed_ms));
        out.push_str(&format!("Runtime Version: {}\n", self.metadata.runtime));
        out.push_str(&format!("Operating System: {}\n", self.metadata.operating_system));
        out.push_str(&format!("Processor Count: {}\n", self.metadata.processor_count));
        out.push_str(&format!("Processor Architecture: {}\n", self.metadata.architecture));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metadata() -> RunMetadata {
        RunMetadata {
            elapsed_ms: 1234,
            runtime: "tessella 0.1.0".to_string(),
            operating_system: "linux".to_string(),
            processor_count: 8,
            architecture: "x86_64".to_string(),
        }
    }

    fn entry(filename: &str, digest: &str) -> ManifestEntry {
        ManifestEntry {
            filename: filename.to_string(),
            digest: digest.to_string(),
        }
    }

    #[test]
    fn entries_are_sorted_by_filename() {
        let manifest = Manifest::new(
            vec![entry("b.png", "22"), entry("a.png", "11"), entry("B.png", "33")],
            metadata(),
        );
        let names: Vec<&str> = manifest.entries().iter().map(|e| e.filename.as_str()).collect();
        // Byte-wise ordering puts uppercase before lowercase.
        assert_eq!(names, vec!["B.png", "a.png", "b.png"]);
    }

    #[test]
    fn render_format() {
        let manifest = Manifest::new(
            vec![entry("Flowers 12345.png", "ab12"), entry("Flowers 12345.txt", "cd34")],
            metadata(),
        );
        assert_eq!(
            manifest.render(),
            "Flowers 12345.png: ab12\n\
             Flowers 12345.txt: cd34\n\
             \n\
             Elapsed Milliseconds: 1234\n\
             Runtime Version: tessella 0.1.0\n\
             Operating System: linux\n\
             Processor Count: 8\n\
             Processor Architecture: x86_64\n"
        );
    }

    #[test]
    fn empty_manifest_still_renders_metadata() {
        let manifest = Manifest::new(Vec::new(), metadata());
        let rendered = manifest.render();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("Elapsed Milliseconds: 1234"));
    }
}
