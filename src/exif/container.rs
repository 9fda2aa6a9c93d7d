use img_parts::Bytes;
use img_parts::jpeg::{Jpeg, JpegSegment};

use crate::error::{EncodeError, GeotagError};

const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const EXIF_PREFIX: &[u8] = b"Exif\0\0";
// Segment length is a u16 that counts its own two bytes
const MAX_SEGMENT_CONTENTS: usize = u16::MAX as usize - 2;

/// Parse a JPEG, keeping every segment and the entropy-coded data as-is.
pub(crate) fn parse_jpeg(bytes: &[u8]) -> Result<Jpeg, GeotagError> {
    Jpeg::from_bytes(Bytes::copy_from_slice(bytes)).map_err(|e| GeotagError::Container(e.to_string()))
}

/// Find the first APP1 segment holding EXIF data.
fn find_exif_segment_pos(segments: &[JpegSegment]) -> Option<usize> {
    segments
        .iter()
        .position(|s| s.marker() == MARKER_APP1 && s.contents().starts_with(EXIF_PREFIX))
}

/// TIFF payload of the EXIF segment (after `Exif\0\0`), if any.
pub(crate) fn exif_payload(jpeg: &Jpeg) -> Option<Vec<u8>> {
    let pos = find_exif_segment_pos(jpeg.segments())?;
    Some(jpeg.segments()[pos].contents()[EXIF_PREFIX.len()..].to_vec())
}

/// Locate the EXIF payload in raw bytes; anything unparseable counts as absent.
pub(crate) fn locate_block(bytes: &[u8]) -> Option<Vec<u8>> {
    parse_jpeg(bytes).ok().as_ref().and_then(exif_payload)
}

/// Replace the EXIF segment in place, or insert one after any leading APP0
/// (JFIF) segments when the image had none.
pub(crate) fn replace_exif(jpeg: &mut Jpeg, tiff: &[u8]) -> Result<(), EncodeError> {
    let len = EXIF_PREFIX.len() + tiff.len();
    if len > MAX_SEGMENT_CONTENTS {
        return Err(EncodeError::SegmentTooLarge { len });
    }

    let mut contents = Vec::with_capacity(len);
    contents.extend_from_slice(EXIF_PREFIX);
    contents.extend_from_slice(tiff);
    let segment = JpegSegment::new_with_contents(MARKER_APP1, Bytes::from(contents));

    let segments = jpeg.segments_mut();
    match find_exif_segment_pos(segments) {
        Some(pos) => segments[pos] = segment,
        None => {
            let pos = segments
                .iter()
                .take_while(|s| s.marker() == MARKER_APP0)
                .count();
            segments.insert(pos, segment);
        }
    }
    Ok(())
}

pub(crate) fn encode(jpeg: Jpeg) -> Vec<u8> {
    jpeg.encoder().bytes().to_vec()
}
