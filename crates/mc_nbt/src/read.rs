//! Decoding of the binary tag format.
//!
//! All numbers are big endian. A failure is reported at the byte where the
//! input stopped making sense, and no partially built tree is returned.

use byteorder::{BigEndian, ReadBytesExt};
use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::mutf8;
use crate::tag::{Compound, List, Tag, TagType};

/// Deepest allowed nesting of lists and compounds
pub const MAX_DEPTH: usize = 512;

/// Cursor over an encoded buffer
#[derive(Debug)]
pub struct TagReader<'a> {
    input: &'a [u8],
    depth: usize,
}

impl<'a> TagReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, depth: 0 }
    }

    /// Bytes that have not been consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }

    /// Read a type id followed by that type's payload
    pub fn read_tag(&mut self) -> Result<Tag> {
        let tag_type = self.read_type()?;
        self.read_payload(tag_type)
    }

    /// Read a type id, a name and a payload, as found inside a compound
    pub fn read_named(&mut self) -> Result<(String, Tag)> {
        let tag_type = self.read_type()?;
        if tag_type == TagType::End {
            return Ok((String::new(), Tag::End));
        }
        let name = self.read_string()?;
        let tag = self.read_payload(tag_type)?;
        Ok((name, tag))
    }

    /// Read the payload of a tag whose type is already known
    pub fn read_payload(&mut self, tag_type: TagType) -> Result<Tag> {
        Ok(match tag_type {
            TagType::End => Tag::End,
            TagType::Byte => Tag::Byte(self.input.read_i8()?),
            TagType::Short => Tag::Short(self.input.read_i16::<BigEndian>()?),
            TagType::Int => Tag::Int(self.input.read_i32::<BigEndian>()?),
            TagType::Long => Tag::Long(self.input.read_i64::<BigEndian>()?),
            TagType::Float => Tag::Float(self.input.read_f32::<BigEndian>()?),
            TagType::Double => Tag::Double(self.input.read_f64::<BigEndian>()?),
            TagType::ByteArray => {
                let len = self.read_len(1)?;
                let bytes = self.take(len)?;
                Tag::ByteArray(bytes.iter().map(|&b| b as i8).collect())
            }
            TagType::String => Tag::String(self.read_string()?),
            TagType::List => Tag::List(self.nested(Self::read_list)?),
            TagType::Compound => Tag::Compound(self.nested(Self::read_compound)?),
            TagType::IntArray => {
                let len = self.read_len(4)?;
                let mut values = vec![0i32; len];
                self.input.read_i32_into::<BigEndian>(&mut values)?;
                Tag::IntArray(values)
            }
            TagType::LongArray => {
                let len = self.read_len(8)?;
                let mut values = vec![0i64; len];
                self.input.read_i64_into::<BigEndian>(&mut values)?;
                Tag::LongArray(values)
            }
        })
    }

    fn read_type(&mut self) -> Result<TagType> {
        TagType::try_from(self.input.read_u8()?)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.input.read_u16::<BigEndian>()? as usize;
        let bytes = self.take(len)?;
        Ok(mutf8::decode(bytes)?.into_owned())
    }

    /// Read an i32 element count and check that enough input is left for it
    fn read_len(&mut self, element_size: usize) -> Result<usize> {
        let len = self.input.read_i32::<BigEndian>()?;
        if len < 0 {
            return Err(Error::NegativeLength(len));
        }
        let len = len as usize;
        if len.saturating_mul(element_size) > self.input.len() {
            return Err(Error::TruncatedBuffer);
        }
        Ok(len)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.input.len() {
            return Err(Error::TruncatedBuffer);
        }
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        Ok(head)
    }

    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::NestingTooDeep);
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_list(&mut self) -> Result<List> {
        let elements_type = self.read_type()?;
        let count = self.input.read_i32::<BigEndian>()?;
        if count < 0 {
            return Err(Error::NegativeLength(count));
        }
        if elements_type == TagType::End && count > 0 {
            return Err(Error::NonEmptyEndList(count));
        }

        // every non-End payload takes at least one byte
        let mut elements = Vec::with_capacity((count as usize).min(self.input.len()));
        for _ in 0..count {
            elements.push(self.read_payload(elements_type)?);
        }
        Ok(List::from_parts(elements_type, elements))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();
        loop {
            let tag_type = self.read_type()?;
            if tag_type == TagType::End {
                return Ok(compound);
            }
            let name = self.read_string()?;
            let tag = self.read_payload(tag_type)?;
            compound.push(name, tag);
        }
    }
}

/// Decode a type id and payload from the start of `input`
#[instrument(skip_all, err, fields(size = input.len()))]
pub fn decode(input: &[u8]) -> Result<Tag> {
    let mut reader = TagReader::new(input);
    let tag = reader.read_tag()?;
    trace!(tag_type = %tag.tag_type(), consumed = input.len() - reader.remaining().len());
    Ok(tag)
}

/// Decode a named tag (type id, name, payload) from the start of `input`
#[instrument(skip_all, err, fields(size = input.len()))]
pub fn decode_named(input: &[u8]) -> Result<(String, Tag)> {
    TagReader::new(input).read_named()
}

/// Decode a bare payload of the given type
#[instrument(skip(input), err, fields(size = input.len()))]
pub fn decode_payload(input: &[u8], tag_type: TagType) -> Result<Tag> {
    TagReader::new(input).read_payload(tag_type)
}
