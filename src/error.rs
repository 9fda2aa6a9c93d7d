use thiserror::Error;

use crate::exif::Section;

/// Errors surfaced by [`write_metadata`](crate::exif::write_metadata).
///
/// Reading never fails: a missing or corrupt block is reported as an empty
/// record instead.
#[derive(Debug, Error)]
pub enum GeotagError {
    /// The update record was rejected before any metadata was touched.
    #[error("Invalid metadata update: {0}")]
    InvalidUpdate(String),

    /// A request could not be turned into an update (bad payload, unknown format).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The buffer declared as JPEG could not be parsed as one.
    #[error("Failed to parse JPEG container: {0}")]
    Container(String),

    /// The merged block could not be encoded; no output was produced.
    #[error("Failed to encode EXIF block: {0}")]
    Encode(#[from] EncodeError),
}

/// Decoding failures for the TIFF-structured EXIF block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("TIFF header is truncated")]
    TooShort,

    #[error("Invalid TIFF byte order marker")]
    InvalidByteOrder,

    #[error("Invalid TIFF magic number {0:#06x}")]
    InvalidMagic(u16),

    #[error("Read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Tag {tag:#06x} does not hold a valid IFD offset")]
    InvalidPointer { tag: u16 },
}

/// Encoding failures for the EXIF block and its APP1 segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{section} IFD has {count} entries (max 65535)")]
    TooManyEntries { section: Section, count: usize },

    #[error("Value of tag {tag:#06x} is too long to encode")]
    ValueTooLong { tag: u16 },

    #[error("EXIF block of {len} bytes exceeds the 4 GiB TIFF limit")]
    BlockTooLarge { len: usize },

    #[error("APP1 segment of {len} bytes exceeds the 65533 byte JPEG limit")]
    SegmentTooLarge { len: usize },
}
