//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::location::{AnvilLocation, ChunkLocation};

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`mc_nbt::error::Error`]
    #[error(transparent)]
    Nbt(#[from] mc_nbt::error::Error),

    /// chunk payload uses a compression scheme other than zlib
    #[error("unsupported chunk compression scheme {0}")]
    UnsupportedCompressionScheme(u8),

    /// header is too short or points at impossible data
    #[error("corrupt region header: {0}")]
    CorruptRegionHeader(&'static str),

    /// a chunk payload runs past the end of the file
    #[error("chunk payload runs past the end of the region")]
    TruncatedBuffer,

    /// a chunk does not fit in the 255 sectors a header entry can describe
    #[error("chunk {location} needs {sectors} sectors, at most 255 fit")]
    ChunkTooLarge {
        /// the chunk being written
        location: ChunkLocation,
        /// sectors the payload would need
        sectors: usize,
    },

    /// a chunk was given to the writer of another region
    #[error("chunk {chunk} is not part of region {anvil}")]
    ChunkOutsideRegion {
        /// the rejected chunk
        chunk: ChunkLocation,
        /// the region being written
        anvil: AnvilLocation,
    },

    /// zlib only knows levels 0 to 9
    #[error("compression level {0} is out of range, expected 0-9")]
    InvalidCompressionLevel(u32),

    /// a bulk scan was stopped by its caller
    #[error("operation was cancelled")]
    Cancelled,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
