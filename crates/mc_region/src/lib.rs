//! This library handles reading from and creating **Anvil region** files (`.mca`) used by *Minecraft*.
//!
//! # Region File Format Documentation
//!
//! A region file stores the chunks of a 32x32 chunk area of a world. The file is named after the
//! region's coordinates, `r.<x>.<z>.mca`, and is divided into sectors of 4096 bytes.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field              | Description                                              |
//! |----------------|--------------------|----------------------------------------------------------|
//! | 0x0000         | Locations          | 1024 entries of 4 bytes: where each chunk is stored      |
//! | 0x1000         | Timestamps         | 1024 entries of 4 bytes: last modification of each chunk |
//! | 0x2000         | Chunk data         | Sector aligned chunk payloads                            |
//!
//! ### Header
//!
//! Entry `i` of both tables describes the chunk at local coordinates `(i % 32, i / 32)`.
//!
//! - **Location**: a 3 byte sector offset from the start of the file followed by a 1 byte sector
//!   count. An entry with a zero offset or a zero count means the chunk is absent.
//! - **Timestamp**: seconds since the unix epoch.
//!
//! ### Chunk Payload
//!
//! | Offset (bytes) | Field        | Description                                                |
//! |----------------|--------------|------------------------------------------------------------|
//! | 0x0000         | Length       | 4 bytes: size of the compressed data plus one              |
//! | 0x0004         | Compression  | 1 byte: compression scheme                                 |
//! | 0x0005         | Data         | `Length - 1` bytes: the compressed chunk                   |
//!
//! The decompressed data is a standalone NBT root: `0A 00 00` followed by the chunk compound.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.mca`
//! - **Endianness**: Big-endian for all multi-byte integers
//! - **Compression Schemes**:
//!   - `2`: Zlib (compressed with Zlib), the only scheme that can be loaded
//!

pub mod error;
pub mod location;
pub mod read;
pub mod types;
pub mod write;

pub use location::{AnvilLocation, BlockLocation, ChunkLocation};
pub use read::{
    list_chunk_locations, load_chunk, load_chunks_with, load_chunks_with_cancel, ChunkOutcome,
    RegionFile,
};
pub use types::CompressionScheme;
pub use write::{save_chunk, RegionWriter};
