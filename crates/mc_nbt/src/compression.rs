//! Block compression and decompression handling.
//!
//! Standalone `.dat` files are gzip streams. Chunk payloads inside region
//! files are zlib streams (region compression scheme `2`).

use std::io::{Read, Write};

use flate2::{
    read::GzDecoder, write::GzEncoder, write::ZlibEncoder, Compression, Decompress,
    FlushDecompress, Status,
};
use tracing::instrument;

use crate::error::{Error, Result};

/// Growth step for decompression output when the final size is unknown
const OUTPUT_STEP: usize = 16 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Identifies how a standalone NBT file is stored on disk
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FileCompression {
    /// Stores the data as it is
    None,

    /// Compress the data using gzip
    #[default]
    Gzip,
}

/// Returns true if the buffer starts with the gzip magic bytes
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Compress a buffer into a gzip stream
#[instrument(skip_all, err, fields(size = bytes.len()))]
pub fn gzip_compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Decompress a complete gzip stream.
///
/// The trailer checksum is verified, so a damaged or cut off stream is reported
/// as [`Error::CorruptData`] instead of returning partial output.
#[instrument(skip_all, err, fields(size = bytes.len()))]
pub fn gzip_decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(bytes.len().saturating_mul(4));
    GzDecoder::new(bytes)
        .read_to_end(&mut output)
        .map_err(|_| Error::CorruptData)?;
    Ok(output)
}

/// Compress a buffer into a zlib stream with the default level
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    deflate_with(bytes, Compression::default())
}

/// Compress a buffer into a zlib stream with the requested level
#[instrument(skip(bytes), err, fields(size = bytes.len()))]
pub fn deflate_with(bytes: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bytes.len() / 2), level);
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Decompress a complete zlib stream.
///
/// The stream must reach its end marker; running out of input first is
/// [`Error::CorruptData`].
#[instrument(skip_all, err, fields(size = bytes.len()))]
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = Decompress::new(true);
    let mut output = Vec::with_capacity(bytes.len().saturating_mul(4).max(OUTPUT_STEP));

    loop {
        if output.len() == output.capacity() {
            output.reserve(OUTPUT_STEP);
        }

        let before_in = decoder.total_in();
        let before_out = decoder.total_out();
        let status = decoder
            .decompress_vec(
                &bytes[before_in as usize..],
                &mut output,
                FlushDecompress::Finish,
            )
            .map_err(|_| Error::CorruptData)?;

        if status == Status::StreamEnd {
            return Ok(output);
        }

        // room was reserved, so no progress means the input ran dry
        if decoder.total_in() == before_in && decoder.total_out() == before_out {
            return Err(Error::CorruptData);
        }
    }
}
