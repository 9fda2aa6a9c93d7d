use std::io::Cursor;

use exif_geotag::config::Config;
use exif_geotag::exif::{
    GeoCoordinate, ImageFormat, MetadataRecord, PASSTHROUGH_WARNING, read_metadata, write_metadata,
};
use exif_geotag::pipeline;
use image::{Rgb, RgbImage};
use nom_exif::{Exif, ExifIter, ExifTag, MediaParser, MediaSource};

const EXIF_PREFIX: &[u8] = b"Exif\0\0";

fn encode(format: image::ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 64]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn nyc() -> MetadataRecord {
    MetadataRecord {
        coordinate: Some(GeoCoordinate::new(40.7128, -74.0060)),
        description: Some("Brooklyn Bridge at dawn".to_string()),
        keywords: Some("bridge; river; nyc".to_string()),
    }
}

/// End offset of the leading APP0 segment (SOI + marker + length).
fn app0_end(jpeg: &[u8]) -> usize {
    assert_eq!(&jpeg[2..4], &[0xFF, 0xE0], "fixture should start with JFIF APP0");
    4 + u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize
}

fn count_exif_segments(jpeg: &[u8]) -> usize {
    jpeg.windows(4 + EXIF_PREFIX.len())
        .filter(|w| w[..2] == [0xFF, 0xE1] && w[4..] == *EXIF_PREFIX)
        .count()
}

// ── round trip ───────────────────────────────────────────────────────

#[test]
fn write_then_read_round_trip() {
    let jpeg = encode(image::ImageFormat::Jpeg);
    let result = write_metadata(&jpeg, ImageFormat::Jpeg, "bridge.jpg", &nyc()).unwrap();

    assert_eq!(result.output_name, "geotagged_bridge.jpg");
    assert!(result.metadata_written);

    let record = read_metadata(&result.bytes, ImageFormat::Jpeg);
    assert_eq!(record.description.as_deref(), Some("Brooklyn Bridge at dawn"));
    assert_eq!(record.keywords.as_deref(), Some("bridge; river; nyc"));
    let coord = record.coordinate.unwrap();
    assert!((coord.latitude - 40.7128).abs() < 1e-4);
    assert!((coord.longitude - -74.0060).abs() < 1e-4);
}

#[test]
fn repeated_writes_keep_a_single_exif_segment() {
    let jpeg = encode(image::ImageFormat::Jpeg);
    let first = write_metadata(&jpeg, ImageFormat::Jpeg, "a.jpg", &nyc()).unwrap();
    let update = MetadataRecord {
        coordinate: Some(GeoCoordinate::new(-22.9068, -43.1729)),
        ..Default::default()
    };
    let second = write_metadata(&first.bytes, ImageFormat::Jpeg, "a.jpg", &update).unwrap();

    assert_eq!(count_exif_segments(&second.bytes), 1);

    let record = read_metadata(&second.bytes, ImageFormat::Jpeg);
    assert_eq!(record.description.as_deref(), Some("Brooklyn Bridge at dawn"));
    let coord = record.coordinate.unwrap();
    assert!((coord.latitude - -22.9068).abs() < 1e-4);
    assert!((coord.longitude - -43.1729).abs() < 1e-4);
}

// ── byte preservation ────────────────────────────────────────────────

#[test]
fn splice_preserves_surrounding_bytes() {
    let jpeg = encode(image::ImageFormat::Jpeg);
    let split = app0_end(&jpeg);
    let result = write_metadata(&jpeg, ImageFormat::Jpeg, "a.jpg", &nyc()).unwrap();

    assert!(result.bytes.starts_with(&jpeg[..split]));
    assert!(result.bytes.ends_with(&jpeg[split..]));
    // The inserted segment sits right after APP0
    assert_eq!(&result.bytes[split..split + 2], &[0xFF, 0xE1]);
    assert_eq!(&result.bytes[split + 4..split + 10], EXIF_PREFIX);
}

#[test]
fn output_still_decodes() {
    let jpeg = encode(image::ImageFormat::Jpeg);
    let result = write_metadata(&jpeg, ImageFormat::Jpeg, "a.jpg", &nyc()).unwrap();

    let decoded = image::load_from_memory(&result.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 24));
}

// ── third-party read-back ────────────────────────────────────────────

#[test]
fn nom_exif_reads_written_tags() {
    let jpeg = encode(image::ImageFormat::Jpeg);
    let result = write_metadata(&jpeg, ImageFormat::Jpeg, "a.jpg", &nyc()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&result.output_name);
    std::fs::write(&path, &result.bytes).unwrap();

    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(&path).unwrap();
    let iter: ExifIter = parser.parse(ms).unwrap();

    let gps = iter.parse_gps_info().unwrap().unwrap();
    assert_eq!(gps.latitude_ref, 'N');
    assert_eq!(gps.longitude_ref, 'W');
    assert_eq!(gps.latitude, [(40, 1), (42, 1), (460_800, 10_000)].into());
    let lon_seconds = gps.longitude.2.0 as f64 / gps.longitude.2.1 as f64;
    assert_eq!(gps.longitude.0.0, 74);
    assert!((lon_seconds - 21.6).abs() < 1e-3);

    let exif: Exif = iter.into();
    assert_eq!(
        exif.get(ExifTag::ImageDescription)
            .and_then(|v| v.as_str())
            .map(|s| s.trim_end_matches('\0')),
        Some("Brooklyn Bridge at dawn")
    );
}

// ── passthrough ──────────────────────────────────────────────────────

#[test]
fn png_passes_through_unchanged() {
    let png = encode(image::ImageFormat::Png);
    let result = write_metadata(&png, ImageFormat::Png, "map.png", &nyc()).unwrap();

    assert_eq!(result.bytes, png);
    assert!(!result.metadata_written);
    assert_eq!(result.warning.as_deref(), Some(PASSTHROUGH_WARNING));
    assert!(read_metadata(&png, ImageFormat::Png).is_empty());
}

// ── file pipeline ────────────────────────────────────────────────────

#[test]
fn pipeline_tags_a_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::create_dir(input.path().join("day1")).unwrap();
    std::fs::write(input.path().join("day1/a.jpg"), encode(image::ImageFormat::Jpeg)).unwrap();
    std::fs::write(input.path().join("b.png"), encode(image::ImageFormat::Png)).unwrap();
    std::fs::write(input.path().join("notes.txt"), b"skip me").unwrap();

    let mut config = Config::default();
    config.output.output_dir = Some(output.path().to_path_buf());

    let images = pipeline::collect_images(&[input.path().to_path_buf()]);
    assert_eq!(images.len(), 2);

    for path in &images {
        let result = pipeline::process_image(path, &nyc(), &config);
        assert!(result.error.is_none(), "{:?}", result.error);
        assert!(result.saved);
    }

    let tagged = output.path().join("geotagged_a.jpg");
    let record = pipeline::inspect_image(&tagged, &config).unwrap();
    assert_eq!(record.keywords.as_deref(), Some("bridge; river; nyc"));
    assert!(output.path().join("geotagged_b.png").is_file());
}
