//! Content hashing.
//!
//! All artifact and source hashing uses BLAKE3 rendered as 64 lowercase
//! hexadecimal characters, so manifest lines are comparable across machines
//! and platforms.

use std::io::Read;
use std::path::Path;

/// Computes the BLAKE3 hash of a byte slice.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Streams a file through BLAKE3 and returns its content hash.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}
