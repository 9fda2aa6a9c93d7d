use super::block::{EmbeddedBlock, Section, TagValue};
use super::container;
use super::coords::{hemisphere_ref, to_dms};
use super::format::{ImageFormat, MetadataSupport};
use super::record::{GeoCoordinate, MetadataRecord};
use super::tags::{self, gps};
use crate::error::GeotagError;

/// Prefix prepended to the input file name for the tagged copy.
pub const OUTPUT_PREFIX: &str = "geotagged_";

/// Attached to every passthrough write.
pub const PASSTHROUGH_WARNING: &str = "Geotagging for non-JPG formats may not be fully supported. \
     JPG format is recommended for reliable geotagging.";

const GPS_VERSION: [u8; 4] = [2, 3, 0, 0];

/// Outcome of a successful [`write_metadata`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    /// The full output image.
    pub bytes: Vec<u8>,
    /// Suggested name for the output file.
    pub output_name: String,
    /// Whether the EXIF block was actually rewritten.
    pub metadata_written: bool,
    /// Set when the format only got passthrough treatment.
    pub warning: Option<String>,
}

/// `geotagged_<file_name>`.
pub fn output_file_name(file_name: &str) -> String {
    format!("{OUTPUT_PREFIX}{file_name}")
}

/// Merge `update` into the image's EXIF block and return the new image.
///
/// Fields left as `None` in `update` keep whatever the image already had.
/// Everything in the block that the update does not name (camera tags, Exif
/// and Interop IFDs, thumbnail) is carried over, and every JPEG segment other
/// than the EXIF one is reproduced unchanged.
///
/// Formats without full support get their bytes back untouched along with
/// [`PASSTHROUGH_WARNING`]. That is still a success.
///
/// # Errors
///
/// - [`GeotagError::InvalidUpdate`] if the update cannot be represented
/// - [`GeotagError::Container`] if a buffer declared as JPEG is not one
/// - [`GeotagError::Encode`] if the merged block does not fit in a JPEG segment
pub fn write_metadata(
    bytes: &[u8],
    format: ImageFormat,
    file_name: &str,
    update: &MetadataRecord,
) -> Result<WriteResult, GeotagError> {
    update.validate()?;

    if format.metadata_support() == MetadataSupport::Passthrough {
        return Ok(WriteResult {
            bytes: bytes.to_vec(),
            output_name: output_file_name(file_name),
            metadata_written: false,
            warning: Some(PASSTHROUGH_WARNING.to_string()),
        });
    }

    let mut jpeg = container::parse_jpeg(bytes)?;
    let existing = container::exif_payload(&jpeg);
    let mut block = EmbeddedBlock::parse_or_empty(existing.as_deref());

    apply_update(&mut block, update);

    let tiff = block.to_tiff()?;
    container::replace_exif(&mut jpeg, &tiff)?;

    Ok(WriteResult {
        bytes: container::encode(jpeg),
        output_name: output_file_name(file_name),
        metadata_written: true,
        warning: None,
    })
}

/// Set the tags named by `update`, leaving everything else in place.
pub(crate) fn apply_update(block: &mut EmbeddedBlock, update: &MetadataRecord) {
    if let Some(coord) = update.coordinate {
        apply_coordinate(block, coord);
    }
    if let Some(description) = &update.description {
        block.set(Section::Primary, tags::IMAGE_DESCRIPTION, TagValue::ascii(description));
    }
    if let Some(keywords) = &update.keywords {
        block.set(Section::Primary, tags::XP_KEYWORDS, TagValue::Byte(encode_utf16le(keywords)));
    }
}

fn apply_coordinate(block: &mut EmbeddedBlock, coord: GeoCoordinate) {
    if block.get(Section::Gps, gps::VERSION_ID).is_none() {
        block.set(Section::Gps, gps::VERSION_ID, TagValue::Byte(GPS_VERSION.to_vec()));
    }

    let lat_ref = hemisphere_ref(coord.latitude, 'N', 'S');
    let lon_ref = hemisphere_ref(coord.longitude, 'E', 'W');

    block.set(Section::Gps, gps::LATITUDE_REF, TagValue::ascii(&lat_ref.to_string()));
    block.set(
        Section::Gps,
        gps::LATITUDE,
        TagValue::Rational(to_dms(coord.latitude.abs()).to_vec()),
    );
    block.set(Section::Gps, gps::LONGITUDE_REF, TagValue::ascii(&lon_ref.to_string()));
    block.set(
        Section::Gps,
        gps::LONGITUDE,
        TagValue::Rational(to_dms(coord.longitude.abs()).to_vec()),
    );
}

/// Encode a string as UTF-16LE bytes (used for XP* tags).
fn encode_utf16le(s: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = s
        .encode_utf16()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    // Null terminator
    bytes.push(0);
    bytes.push(0);
    bytes
}
