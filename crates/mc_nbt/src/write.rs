//! Encoding of the binary tag format.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::mutf8;
use crate::tag::{Compound, List, Tag, TagType};

/// Writes tags to any [`Write`] sink
#[derive(Debug)]
pub struct TagWriter<W: Write> {
    writer: W,
}

impl<W: Write> TagWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a type id followed by the payload
    pub fn write_tag(&mut self, tag: &Tag) -> Result<()> {
        self.writer.write_u8(tag.tag_type().id())?;
        self.write_payload(tag)
    }

    /// Write a type id, a name and the payload
    pub fn write_named(&mut self, name: &str, tag: &Tag) -> Result<()> {
        self.writer.write_u8(tag.tag_type().id())?;
        if tag.tag_type() == TagType::End {
            return Ok(());
        }
        self.write_string(name)?;
        self.write_payload(tag)
    }

    /// Write a compound as the root of a file, under `name`
    pub fn write_root(&mut self, name: &str, root: &Compound) -> Result<()> {
        self.writer.write_u8(TagType::Compound.id())?;
        self.write_string(name)?;
        self.write_compound(root)
    }

    pub fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::End => {}
            Tag::Byte(n) => self.writer.write_i8(*n)?,
            Tag::Short(n) => self.writer.write_i16::<BigEndian>(*n)?,
            Tag::Int(n) => self.writer.write_i32::<BigEndian>(*n)?,
            Tag::Long(n) => self.writer.write_i64::<BigEndian>(*n)?,
            Tag::Float(n) => self.writer.write_f32::<BigEndian>(*n)?,
            Tag::Double(n) => self.writer.write_f64::<BigEndian>(*n)?,
            Tag::ByteArray(values) => {
                self.write_len(values.len())?;
                let bytes: Vec<u8> = values.iter().map(|&b| b as u8).collect();
                self.writer.write_all(&bytes)?;
            }
            Tag::String(s) => self.write_string(s)?,
            Tag::List(list) => self.write_list(list)?,
            Tag::Compound(compound) => self.write_compound(compound)?,
            Tag::IntArray(values) => {
                self.write_len(values.len())?;
                for value in values {
                    self.writer.write_i32::<BigEndian>(*value)?;
                }
            }
            Tag::LongArray(values) => {
                self.write_len(values.len())?;
                for value in values {
                    self.writer.write_i64::<BigEndian>(*value)?;
                }
            }
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let bytes = mutf8::encode(s);
        let len = u16::try_from(bytes.len()).map_err(|_| Error::StringTooLong(bytes.len()))?;
        self.writer.write_u16::<BigEndian>(len)?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| Error::TooManyElements(len))?;
        self.writer.write_i32::<BigEndian>(len)?;
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        self.writer.write_u8(list.elements_type().id())?;
        self.write_len(list.len())?;
        for element in list {
            self.write_payload(element)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for (name, tag) in compound.iter() {
            self.write_named(name, tag)?;
        }
        self.writer.write_u8(TagType::End.id())?;
        Ok(())
    }
}

/// Encode a type id and payload, appending to `buf`
#[instrument(skip_all, err)]
pub fn encode(tag: &Tag, buf: &mut Vec<u8>) -> Result<()> {
    TagWriter::new(buf).write_tag(tag)
}

/// Encode a named tag, appending to `buf`
#[instrument(skip(tag, buf), err)]
pub fn encode_named(name: &str, tag: &Tag, buf: &mut Vec<u8>) -> Result<()> {
    TagWriter::new(buf).write_named(name, tag)
}

/// Encode only the payload of a tag, appending to `buf`
pub fn encode_payload(tag: &Tag, buf: &mut Vec<u8>) -> Result<()> {
    TagWriter::new(buf).write_payload(tag)
}

/// Encode a compound as an unnamed root: `0A 00 00` then the payload
#[instrument(skip_all, err, fields(entries = compound.len()))]
pub fn write_as_root(compound: &Compound, buf: &mut Vec<u8>) -> Result<()> {
    TagWriter::new(buf).write_root("", compound)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::read::decode;
    use crate::tag::{Compound, List, Tag, TagType};
    use crate::write::{encode, encode_named, write_as_root};

    #[test]
    fn encode_compound() -> Result<()> {
        let mut compound = Compound::new();
        compound.push("x", 5i32);
        compound.push("y", "hi");

        let mut buf = Vec::new();
        encode(&Tag::Compound(compound), &mut buf)?;

        #[rustfmt::skip]
        assert_eq!(buf, vec![
            0x0A,
            0x03, 0x00, 0x01, b'x', 0x00, 0x00, 0x00, 0x05,
            0x08, 0x00, 0x01, b'y', 0x00, 0x02, b'h', b'i',
            0x00,
        ]);

        Ok(())
    }

    #[test]
    fn encode_root_framing() -> Result<()> {
        let mut buf = Vec::new();
        write_as_root(&Compound::new(), &mut buf)?;
        assert_eq!(buf, vec![0x0A, 0x00, 0x00, 0x00]);

        Ok(())
    }

    #[test]
    fn encode_named_scalar() -> Result<()> {
        let mut buf = Vec::new();
        encode_named("id", &Tag::Short(-2), &mut buf)?;
        assert_eq!(buf, vec![0x02, 0x00, 0x02, b'i', b'd', 0xFF, 0xFE]);

        Ok(())
    }

    #[test]
    fn empty_list_writes_its_type() -> Result<()> {
        let mut buf = Vec::new();
        encode(&Tag::List(List::with_type(TagType::Long)), &mut buf)?;
        assert_eq!(buf, vec![0x09, 0x04, 0x00, 0x00, 0x00, 0x00]);

        let mut buf = Vec::new();
        encode(&Tag::List(List::new()), &mut buf)?;
        assert_eq!(buf, vec![0x09, 0x00, 0x00, 0x00, 0x00, 0x00]);

        Ok(())
    }

    #[test]
    fn every_variant_survives_a_round_trip() -> Result<()> {
        let mut nested = Compound::new();
        nested.push("end_of_nested", Tag::Byte(1));

        let mut compound = Compound::new();
        compound.push("byte", i8::MIN);
        compound.push("short", i16::MAX);
        compound.push("int", -123_456i32);
        compound.push("long", i64::MAX);
        compound.push("float", f32::MIN_POSITIVE);
        compound.push("double", -0.25f64);
        compound.push("bytes", vec![-1i8, 0, 1]);
        compound.push("string", "Grüße \u{1F600} \0");
        compound.push("list", List::from_tags([Tag::Int(1), Tag::Int(2)])?);
        compound.push("compound", nested);
        compound.push("ints", vec![i32::MIN, 0, i32::MAX]);
        compound.push("longs", vec![i64::MIN, 0, i64::MAX]);
        let tag = Tag::Compound(compound);

        let mut buf = Vec::new();
        encode(&tag, &mut buf)?;
        assert_eq!(decode(&buf)?, tag);

        Ok(())
    }

    #[test]
    fn string_too_long() {
        let mut compound = Compound::new();
        compound.push("s", "a".repeat(u16::MAX as usize + 1));

        let mut buf = Vec::new();
        assert!(matches!(
            encode(&Tag::Compound(compound), &mut buf),
            Err(Error::StringTooLong(65536))
        ));
    }
}
