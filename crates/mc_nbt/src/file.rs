//! Standalone NBT files such as `level.dat`: a single named compound,
//! usually gzip compressed.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::compression::{gzip_compress, gzip_decompress, is_gzip, FileCompression};
use crate::error::{Error, Result};
use crate::read::TagReader;
use crate::tag::{Compound, Tag};
use crate::write::{write_as_root, TagWriter};

/// Decode a standalone file body.
///
/// Gzip input is detected by its magic bytes and decompressed first. The root
/// must be a compound; its name is discarded.
#[instrument(skip_all, err, fields(size = bytes.len()))]
pub fn decode_standalone(bytes: &[u8]) -> Result<Compound> {
    NbtFile::from_bytes(bytes).map(|file| file.root)
}

/// Encode a compound as an unnamed root and gzip it
pub fn encode_standalone(root: &Compound) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    write_as_root(root, &mut raw)?;
    gzip_compress(&raw)
}

/// A root compound together with the name it was stored under
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbtFile {
    pub name: String,
    pub root: Compound,
}

impl NbtFile {
    pub fn new(root: Compound) -> Self {
        Self {
            name: String::new(),
            root,
        }
    }

    /// Parse the contents of a file, compressed or not
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inflated;
        let body = if is_gzip(bytes) {
            inflated = gzip_decompress(bytes)?;
            &inflated[..]
        } else {
            bytes
        };

        let mut reader = TagReader::new(body);
        let (name, tag) = reader.read_named()?;
        let root = match tag {
            Tag::Compound(root) => root,
            other => return Err(Error::UnexpectedRootType(other.tag_type())),
        };
        if !reader.remaining().is_empty() {
            debug!(trailing = reader.remaining().len(), "ignoring bytes after root tag");
        }

        Ok(Self { name, root })
    }

    #[instrument(err)]
    pub fn read(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn to_bytes(&self, compression: FileCompression) -> Result<Vec<u8>> {
        let mut writer = TagWriter::new(Vec::new());
        writer.write_root(&self.name, &self.root)?;
        let raw = writer.into_inner();

        match compression {
            FileCompression::None => Ok(raw),
            FileCompression::Gzip => gzip_compress(&raw),
        }
    }

    #[instrument(skip(self), err)]
    pub fn write(
        &self,
        path: impl AsRef<Path> + std::fmt::Debug,
        compression: FileCompression,
    ) -> Result<()> {
        fs::write(path, self.to_bytes(compression)?)?;
        Ok(())
    }
}
