use super::block::{EmbeddedBlock, Section};
use super::container;
use super::coords::from_dms;
use super::format::{ImageFormat, MetadataSupport};
use super::record::{GeoCoordinate, MetadataRecord};
use super::tags::{self, gps};

/// Read the geotagging fields from an image buffer.
///
/// Never fails: a missing or corrupt EXIF block, a buffer that is not really
/// the declared format, or a passthrough format all yield an empty record.
pub fn read_metadata(bytes: &[u8], format: ImageFormat) -> MetadataRecord {
    match format.metadata_support() {
        MetadataSupport::Full => {
            let tiff = container::locate_block(bytes);
            record_from_block(&EmbeddedBlock::parse_or_empty(tiff.as_deref()))
        }
        MetadataSupport::Passthrough => MetadataRecord::default(),
    }
}

/// Project a parsed block onto the record fields.
pub(crate) fn record_from_block(block: &EmbeddedBlock) -> MetadataRecord {
    MetadataRecord {
        coordinate: read_coordinate(block),
        description: block
            .get(Section::Primary, tags::IMAGE_DESCRIPTION)
            .and_then(|v| v.as_text()),
        keywords: block
            .get(Section::Primary, tags::XP_KEYWORDS)
            .and_then(|v| v.as_bytes())
            .map(decode_utf16le),
    }
}

/// Both axes must be present; a lone latitude or longitude is ignored.
fn read_coordinate(block: &EmbeddedBlock) -> Option<GeoCoordinate> {
    let latitude = read_axis(block, gps::LATITUDE, gps::LATITUDE_REF, 'S')?;
    let longitude = read_axis(block, gps::LONGITUDE, gps::LONGITUDE_REF, 'W')?;
    Some(GeoCoordinate::new(latitude, longitude))
}

fn read_axis(block: &EmbeddedBlock, value_tag: u16, ref_tag: u16, negative: char) -> Option<f64> {
    let &[degrees, minutes, seconds] = block.get(Section::Gps, value_tag)?.as_rationals()? else {
        return None;
    };
    let value = from_dms(degrees, minutes, seconds);

    // A missing reference reads as N/E
    let reference = block
        .get(Section::Gps, ref_tag)
        .and_then(|v| v.as_text())
        .and_then(|s| s.chars().next());

    if reference == Some(negative) {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Decode an XP* payload (UTF-16LE, usually NUL-terminated).
fn decode_utf16le(bytes: &[u8]) -> String {
    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    while units.last() == Some(&0) {
        units.pop();
    }
    String::from_utf16_lossy(&units)
}
