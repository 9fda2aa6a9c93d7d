//! EXIF geotag reading and writing.
//!
//! This module provides two main functions:
//!
//! - [`read_metadata`]: Extract coordinate, description, and keywords from an image
//! - [`write_metadata`]: Merge an update into the image's EXIF block (format-aware)
//!
//! Writing routes on [`ImageFormat::metadata_support`]: JPEG gets its APP1
//! EXIF segment rewritten, every other format passes through unchanged with a
//! warning.

mod block;
mod container;
mod coords;
mod format;
mod reader;
mod record;
pub mod tags;
mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use block::{ByteOrder, EmbeddedBlock, Ifd, Rational, SRational, Section, TagValue};
pub use coords::{SECONDS_DENOMINATOR, from_dms, hemisphere_ref, to_dms};
pub use format::{ImageFormat, MetadataSupport};
pub use reader::read_metadata;
pub use record::{GeoCoordinate, MetadataRecord};
pub use writer::{OUTPUT_PREFIX, PASSTHROUGH_WARNING, WriteResult, output_file_name, write_metadata};
