//! Error types that can be emitted from this library

use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::tag::TagType;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(io::Error),

    /// a type id byte that is not one of the 13 tag types
    #[error("unknown tag type {0}")]
    UnknownTagType(u8),

    /// the input ended in the middle of a value
    #[error("buffer ended before the tag was complete")]
    TruncatedBuffer,

    /// a compressed stream could not be decompressed
    #[error("compressed data is corrupt")]
    CorruptData,

    /// an array or list announced a negative element count
    #[error("negative element count {0}")]
    NegativeLength(i32),

    /// a list of End tags that claims to have elements
    #[error("list of end tags cannot hold {0} elements")]
    NonEmptyEndList(i32),

    /// string bytes are not valid modified UTF-8
    #[error("string is not valid modified utf-8")]
    InvalidString,

    /// containers are nested deeper than [`crate::read::MAX_DEPTH`]
    #[error("tags are nested too deeply")]
    NestingTooDeep,

    /// a string does not fit in a 16 bit length prefix
    #[error("string of {0} bytes is too long to encode")]
    StringTooLong(usize),

    /// an array or list has more elements than a 32 bit count allows
    #[error("{0} elements do not fit in a 32 bit count")]
    TooManyElements(usize),

    /// a list element does not match the list's element type
    #[error("list holds {expected} tags, got {found}")]
    ListTypeMismatch {
        /// the list's element type
        expected: TagType,
        /// the rejected element's type
        found: TagType,
    },

    /// the root of a file is not a compound
    #[error("root tag is a {0}, expected a compound")]
    UnexpectedRootType(TagType),

    /// a tag path could not be parsed
    #[error("invalid tag path {0:?}")]
    InvalidPath(String),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedBuffer,
            _ => Error::IOError(value),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
