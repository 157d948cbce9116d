//! Deterministic PNG export.
//!
//! Compression and filter settings are pinned so that identical pixel data
//! always encodes to identical bytes, which the reproducibility manifest
//! depends on.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

use crate::error::BackendError;

/// Writes RGBA pixel data to a PNG file.
///
/// `data` must hold exactly `width * height * 4` bytes in row-major order.
pub fn write_rgba(data: &[u8], width: u32, height: u32, path: &Path) -> Result<(), BackendError> {
    debug_assert_eq!(data.len(), (width * height * 4) as usize);
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_rgba_to_writer(data, width, height, writer)
}

/// Writes RGBA pixel data as PNG to any writer.
pub fn write_rgba_to_writer<W: Write>(
    data: &[u8],
    width: u32,
    height: u32,
    writer: W,
) -> Result<(), BackendError> {
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    Ok(())
}
