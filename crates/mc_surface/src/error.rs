//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`mc_nbt::error::Error`]
    #[error(transparent)]
    Nbt(#[from] mc_nbt::error::Error),

    /// Transparent wrapper for [`mc_region::error::Error`]
    #[error(transparent)]
    Region(#[from] mc_region::error::Error),

    /// a section whose blocks would sit outside the `i32` height range
    #[error("section Y {0} is out of range")]
    InvalidSectionY(i32),

    /// block data refers past the end of its palette
    #[error("palette index {index} is out of range for a palette of {palette_size}")]
    IncompletePalette {
        /// the offending index
        index: u16,
        /// number of palette entries
        palette_size: usize,
    },

    /// a section or palette entry is missing a required field
    #[error("missing field {0}")]
    MissingField(&'static str),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
