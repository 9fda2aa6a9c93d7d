//! Fixture images shared by the codec unit tests.

use std::io::Cursor;

use image::{ImageFormat as RasterFormat, Rgb, RgbImage};
use img_parts::Bytes;
use img_parts::jpeg::JpegSegment;

use super::block::EmbeddedBlock;
use super::container;

fn gradient() -> RgbImage {
    RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]))
}

/// A small baseline JPEG straight from the encoder, with no EXIF segment.
pub(crate) fn sample_jpeg() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    gradient().write_to(&mut out, RasterFormat::Jpeg).unwrap();
    out.into_inner()
}

pub(crate) fn sample_png() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    gradient().write_to(&mut out, RasterFormat::Png).unwrap();
    out.into_inner()
}

/// [`sample_jpeg`] with an APP1 segment holding `contents`, placed after APP0.
pub(crate) fn jpeg_with_app1(contents: &[u8]) -> Vec<u8> {
    let mut jpeg = container::parse_jpeg(&sample_jpeg()).unwrap();
    let segments = jpeg.segments_mut();
    let pos = segments.iter().take_while(|s| s.marker() == 0xE0).count();
    segments.insert(
        pos,
        JpegSegment::new_with_contents(0xE1, Bytes::copy_from_slice(contents)),
    );
    container::encode(jpeg)
}

/// [`sample_jpeg`] carrying `block` as its EXIF segment.
pub(crate) fn jpeg_with_block(block: &EmbeddedBlock) -> Vec<u8> {
    let mut contents = b"Exif\0\0".to_vec();
    contents.extend(block.to_tiff().unwrap());
    jpeg_with_app1(&contents)
}
