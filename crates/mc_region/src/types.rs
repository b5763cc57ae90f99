//! Base types for structure of region files.

use binrw::{BinRead, BinWrite};

use crate::error::{Error, Result};

/// Size of one sector; offsets and lengths in the header are counted in sectors
pub const SECTOR_SIZE: usize = 4096;

/// Number of chunk slots in a region
pub const SLOTS: usize = 1024;

/// The location table and the timestamp table, one sector each
pub const HEADER_SIZE: usize = 2 * SECTOR_SIZE;

/// Size of the `[length][scheme]` prefix in front of every chunk payload
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Largest chunk the one byte sector count can describe
pub const MAX_CHUNK_SECTORS: usize = 255;

/// Where a chunk's payload lives in the file
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct SectorLocation {
    /// Offset from the start of the file in sectors, stored in 3 bytes
    #[br(map = |b: [u8; 3]| u32::from_be_bytes([0, b[0], b[1], b[2]]))]
    #[bw(map = |o: &u32| { let b = o.to_be_bytes(); [b[1], b[2], b[3]] })]
    pub offset: u32,

    /// Number of sectors reserved for the payload
    pub count: u8,
}

impl SectorLocation {
    /// Slots with a zero offset or a zero count hold no chunk
    pub fn is_present(&self) -> bool {
        self.offset != 0 && self.count != 0
    }

    /// Byte offset of the payload
    pub fn byte_offset(&self) -> usize {
        self.offset as usize * SECTOR_SIZE
    }
}

/// Region file header
///
/// The first sector holds a [`SectorLocation`] per slot, the second a last modified
/// time in seconds since the unix epoch per slot. Slot `i` describes the chunk at local
/// `(i % 32, i / 32)`. All data is stored in big endian format.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct RegionHeader {
    #[br(count = SLOTS)]
    pub locations: Vec<SectorLocation>,

    #[br(count = SLOTS)]
    pub timestamps: Vec<u32>,
}

impl Default for RegionHeader {
    fn default() -> Self {
        Self {
            locations: vec![SectorLocation::default(); SLOTS],
            timestamps: vec![0; SLOTS],
        }
    }
}

/// Prefix of every chunk payload
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct ChunkHeader {
    /// Length of the compressed data plus the scheme byte
    pub length: u32,

    /// Compression scheme of the data, see [`CompressionScheme`]
    pub scheme: u8,
}

/// Identifies how a chunk payload is compressed
///
/// Region files in the wild are written with zlib; it is the only scheme that can be
/// loaded.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionScheme {
    /// Deflate data inside a zlib header and Adler-32 trailer
    #[default]
    Zlib = 2,
}

impl CompressionScheme {
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CompressionScheme {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(CompressionScheme::Zlib),
            _ => Err(Error::UnsupportedCompressionScheme(value)),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::types::{ChunkHeader, CompressionScheme, RegionHeader, SectorLocation, HEADER_SIZE};

    #[test]
    fn read_sector_location() -> Result<()> {
        let mut input = Cursor::new(vec![0x01, 0x02, 0x03, 0x04]);

        let expected = SectorLocation {
            offset: 0x010203,
            count: 4,
        };

        assert_eq!(SectorLocation::read(&mut input)?, expected);
        assert_eq!(expected.byte_offset(), 0x010203 * 4096);

        Ok(())
    }

    #[test]
    fn write_sector_location() -> Result<()> {
        let location = SectorLocation {
            offset: 2,
            count: 1,
        };

        let mut actual = Vec::new();
        location.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, vec![0x00, 0x00, 0x02, 0x01]);

        Ok(())
    }

    #[test]
    fn read_header() -> Result<()> {
        let mut input = vec![0u8; HEADER_SIZE];
        // slot 1 at sector 2, one sector, touched at 0x5F5E1000
        input[4..8].copy_from_slice(&[0x00, 0x00, 0x02, 0x01]);
        input[4096 + 4..4096 + 8].copy_from_slice(&[0x5F, 0x5E, 0x10, 0x00]);

        let header = RegionHeader::read(&mut Cursor::new(input))?;
        assert_eq!(header.locations.len(), 1024);
        assert!(!header.locations[0].is_present());
        assert_eq!(
            header.locations[1],
            SectorLocation {
                offset: 2,
                count: 1
            }
        );
        assert_eq!(header.timestamps[1], 0x5F5E1000);

        Ok(())
    }

    #[test]
    fn write_default_header() -> Result<()> {
        let mut actual = Vec::new();
        RegionHeader::default().write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, vec![0u8; HEADER_SIZE]);

        Ok(())
    }

    #[test]
    fn read_chunk_header() -> Result<()> {
        let mut input = Cursor::new(vec![0x00, 0x00, 0x01, 0x2C, 0x02]);

        let expected = ChunkHeader {
            length: 300,
            scheme: 2,
        };

        assert_eq!(ChunkHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn compression_schemes() {
        assert_eq!(CompressionScheme::try_from(2).ok(), Some(CompressionScheme::Zlib));
        assert_eq!(CompressionScheme::Zlib.id(), 2);

        for id in [0, 1, 3, 4, 127, 0x82] {
            assert!(matches!(
                CompressionScheme::try_from(id),
                Err(Error::UnsupportedCompressionScheme(n)) if n == id
            ));
        }
    }
}
