//! File reading helpers for roll histories.
//!
//! Histories ending in `.zst` are Zstandard-compressed and decompressed
//! transparently.

use crate::error::CliError;

const MAX_DECOMPRESSED: usize = 64 * 1024 * 1024;

/// Reads a text file, decompressing `.zst` files and dropping a UTF-8 BOM.
pub fn read_text_auto(path: &str) -> Result<String, CliError> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path)?;
        let dec = zstd::bulk::decompress(&comp, MAX_DECOMPRESSED)?;
        String::from_utf8(dec).map_err(|e| CliError::InvalidInput(format!("{}: {}", path, e)))?
    } else {
        std::fs::read_to_string(path)?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
