//! Gzip-transparent reading and writing of UXF text.
//!
//! Input compression is detected from the gzip magic bytes rather than the
//! file name, so a misnamed compressed file still loads. Output is
//! compressed when and only when the target name ends `.gz`
//! (case-insensitive).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;

/// The two magic bytes that open every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads the file at `path`, decompressing when it is gzipped, and decodes
/// it as UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    decode(bytes)
}

/// Reads all of `reader`, decompressing when the stream is gzipped, and
/// decodes it as UTF-8.
pub fn read_text_from<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(bytes)
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Returns true if `path` names a gzip target.
pub fn is_gzip_name(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Writes `text` to `path`, gzip-compressing when the name ends `.gz`.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let file = File::create(path)?;
    if is_gzip_name(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?;
    } else {
        let mut file = file;
        file.write_all(text.as_bytes())?;
    }
    Ok(())
}
