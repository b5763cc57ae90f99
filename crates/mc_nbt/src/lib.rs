//! This library reads and writes **NBT**, the named binary tag format Minecraft uses for its save files.
//!
//! # NBT Format Documentation
//!
//! An NBT stream is a tree of tags. Every tag starts with a one byte type id; inside a compound the
//! type id is followed by the tag's name, and then by the payload. List elements carry neither a type id
//! nor a name, since the list declares one element type for all of them.
//!
//! ## Tag Types
//!
//! | Id   | Type        | Payload                                                          |
//! |------|-------------|------------------------------------------------------------------|
//! | 0x00 | End         | nothing; terminates a compound                                   |
//! | 0x01 | Byte        | 1 byte signed integer                                            |
//! | 0x02 | Short       | 2 bytes signed integer                                           |
//! | 0x03 | Int         | 4 bytes signed integer                                           |
//! | 0x04 | Long        | 8 bytes signed integer                                           |
//! | 0x05 | Float       | 4 bytes IEEE-754 single precision                                |
//! | 0x06 | Double      | 8 bytes IEEE-754 double precision                                |
//! | 0x07 | ByteArray   | i32 count, then `count` bytes                                    |
//! | 0x08 | String      | u16 byte length, then modified UTF-8 bytes                       |
//! | 0x09 | List        | u8 element type, i32 count, then `count` unnamed payloads        |
//! | 0x0A | Compound    | named tags until a lone End byte                                 |
//! | 0x0B | IntArray    | i32 count, then `count` i32 values                               |
//! | 0x0C | LongArray   | i32 count, then `count` i64 values                               |
//!
//! ### Named Tags
//!
//! | Offset (bytes) | Field   | Description                                         |
//! |----------------|---------|-----------------------------------------------------|
//! | 0x0000         | Type    | 1 byte: tag type id                                 |
//! | 0x0001         | Length  | 2 bytes: byte length of the name                    |
//! | 0x0003         | Name    | `Length` bytes: modified UTF-8                      |
//! | 0x0003 + len   | Payload | depends on the type, see above                      |
//!
//! ### Strings
//!
//! Strings use Java's modified UTF-8: U+0000 is stored as `C0 80` and characters outside the basic
//! multilingual plane are stored as two 3 byte surrogate halves. See [`mutf8`].
//!
//! ## Standalone Files
//!
//! Files such as `level.dat` hold a single named compound (the root), usually with an empty name, and
//! are gzip compressed. Some files are stored uncompressed; [`file::decode_standalone`] detects
//! both.
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte numbers
//! - **Nesting**: at most [`read::MAX_DEPTH`] lists and compounds deep
//! - **Compound keys**: ordered, and not required to be unique
//!

pub mod compression;
pub mod error;
pub mod file;
pub mod mutf8;
pub mod path;
pub mod read;
pub mod tag;
pub mod write;

pub use compression::FileCompression;
pub use file::{decode_standalone, encode_standalone, NbtFile};
pub use read::{decode, decode_named, decode_payload};
pub use tag::{Compound, List, Tag, TagRef, TagType};
pub use write::{encode, encode_named, encode_payload, write_as_root};
