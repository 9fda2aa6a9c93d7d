//! JSON request/response contract for upload and geotag exchanges.
//!
//! These are transport-agnostic: callers decode a request body into
//! [`GeotagRequest`], hand it to [`handle_geotag`], and serialize whatever
//! comes back. Failures map onto [`ErrorResponse`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Limits;
use crate::error::GeotagError;
use crate::exif::{self, GeoCoordinate, ImageFormat, MetadataRecord};
use crate::pipeline::validate_update;

/// Decimal-degree pair as exchanged in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoCoordinate> for GeoPoint {
    fn from(coord: GeoCoordinate) -> Self {
        Self {
            lat: coord.latitude,
            lon: coord.longitude,
        }
    }
}

/// What an uploaded image already carries.
///
/// Missing text fields are reported as empty strings, and a missing
/// coordinate as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub original_name: String,
    pub existing_geo: Option<GeoPoint>,
    pub existing_description: String,
    pub existing_keywords: String,
    /// The upload echoed back as base64, for the follow-up geotag request.
    pub image_data: String,
}

/// A geotag request. `lat` and `lon` must be given together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeotagRequest {
    pub filename: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    /// Base64-encoded image bytes.
    pub image_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeotagResponse {
    pub success: bool,
    pub download_filename: String,
    /// Base64-encoded output image.
    pub image_data: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&GeotagError> for ErrorResponse {
    fn from(err: &GeotagError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

fn format_of(file_name: &str) -> Result<ImageFormat, GeotagError> {
    ImageFormat::from_path(Path::new(file_name)).ok_or_else(|| {
        GeotagError::InvalidRequest("Only JPG, PNG, HEIC, and WebP images are allowed!".to_string())
    })
}

fn check_size(len: usize, limits: &Limits) -> Result<(), GeotagError> {
    if len as u64 > limits.max_file_bytes {
        return Err(GeotagError::InvalidRequest(format!(
            "image is {len} bytes, above the {} byte limit",
            limits.max_file_bytes
        )));
    }
    Ok(())
}

/// The declared MIME type must name a supported format, and the same one the
/// extension names.
fn check_mime(format: ImageFormat, mime: &str) -> Result<(), GeotagError> {
    match ImageFormat::from_mime(mime) {
        Some(declared) if declared == format => Ok(()),
        Some(declared) => Err(GeotagError::InvalidRequest(format!(
            "declared type {} does not match the {} extension",
            declared.mime_type(),
            format.mime_type()
        ))),
        None => Err(GeotagError::InvalidRequest(
            "Only JPG, PNG, HEIC, and WebP images are allowed!".to_string(),
        )),
    }
}

/// Describe an uploaded image: its existing geotag fields plus the bytes
/// re-encoded for the geotag step.
///
/// Both the file name and the declared `mime` must identify the same
/// supported format.
pub fn inspect_upload(
    file_name: &str,
    mime: &str,
    bytes: &[u8],
    limits: &Limits,
) -> Result<UploadResponse, GeotagError> {
    let format = format_of(file_name)?;
    check_mime(format, mime)?;
    check_size(bytes.len(), limits)?;

    let record = exif::read_metadata(bytes, format);
    log::debug!(
        "Upload {file_name}: {} bytes, geo={}",
        bytes.len(),
        record.coordinate.is_some()
    );

    Ok(UploadResponse {
        success: true,
        original_name: file_name.to_string(),
        existing_geo: record.coordinate.map(GeoPoint::from),
        existing_description: record.description.unwrap_or_default(),
        existing_keywords: record.keywords.unwrap_or_default(),
        image_data: STANDARD.encode(bytes),
    })
}

/// Turn a request into the update record it describes.
fn update_from_request(request: &GeotagRequest) -> Result<MetadataRecord, GeotagError> {
    let coordinate = match (request.lat, request.lon) {
        (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(GeotagError::InvalidRequest(
                "Latitude and longitude must be provided together".to_string(),
            ));
        }
    };
    Ok(MetadataRecord {
        coordinate,
        description: request.description.clone(),
        keywords: request.keywords.clone(),
    })
}

/// Apply a geotag request and build the response.
///
/// # Errors
///
/// [`GeotagError::InvalidRequest`] for a missing file name or image, bad
/// base64, an unsupported extension, or a lone coordinate axis. Anything
/// [`validate_update`] or [`exif::write_metadata`] rejects is passed through.
pub fn handle_geotag(
    request: &GeotagRequest,
    limits: &Limits,
) -> Result<GeotagResponse, GeotagError> {
    if request.filename.is_empty() || request.image_data.is_empty() {
        return Err(GeotagError::InvalidRequest(
            "Filename and image data are required".to_string(),
        ));
    }

    let format = format_of(&request.filename)?;
    let bytes = STANDARD
        .decode(&request.image_data)
        .map_err(|e| GeotagError::InvalidRequest(format!("imageData is not valid base64: {e}")))?;
    check_size(bytes.len(), limits)?;

    let update = update_from_request(request)?;
    validate_update(&update, limits)?;

    let written = exif::write_metadata(&bytes, format, &request.filename, &update)?;
    if let Some(ref warning) = written.warning {
        log::warn!("{}: {warning}", request.filename);
    }

    // Passthrough returns the caller's own encoding untouched
    let image_data = if written.metadata_written {
        STANDARD.encode(&written.bytes)
    } else {
        request.image_data.clone()
    };

    Ok(GeotagResponse {
        success: true,
        download_filename: written.output_name,
        image_data,
        warning: written.warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::test_support::{sample_jpeg, sample_png};
    use serde_json::json;

    fn request_for(bytes: &[u8], filename: &str) -> GeotagRequest {
        GeotagRequest {
            filename: filename.to_string(),
            image_data: STANDARD.encode(bytes),
            ..Default::default()
        }
    }

    // ── inspect_upload ───────────────────────────────────────────────

    #[test]
    fn inspect_upload_plain_jpeg() {
        let jpeg = sample_jpeg();
        let response = inspect_upload("IMG_1.jpg", "image/jpeg", &jpeg, &Limits::default()).unwrap();

        assert!(response.success);
        assert_eq!(response.existing_geo, None);
        assert_eq!(response.existing_description, "");
        assert_eq!(response.existing_keywords, "");
        assert_eq!(STANDARD.decode(&response.image_data).unwrap(), jpeg);
    }

    #[test]
    fn inspect_upload_reports_existing_fields() {
        let mut request = request_for(&sample_jpeg(), "a.jpg");
        request.lat = Some(-33.8688);
        request.lon = Some(151.2093);
        request.description = Some("Sydney".to_string());
        let tagged = handle_geotag(&request, &Limits::default()).unwrap();
        let bytes = STANDARD.decode(&tagged.image_data).unwrap();

        let response = inspect_upload("a.jpg", "image/jpeg", &bytes, &Limits::default()).unwrap();
        let geo = response.existing_geo.unwrap();
        assert!((geo.lat - -33.8688).abs() < 1e-4);
        assert!((geo.lon - 151.2093).abs() < 1e-4);
        assert_eq!(response.existing_description, "Sydney");
    }

    #[test]
    fn inspect_upload_rejects_unknown_extension() {
        let err = inspect_upload("notes.txt", "text/plain", b"hello", &Limits::default()).unwrap_err();
        assert!(matches!(err, GeotagError::InvalidRequest(_)));
    }

    #[test]
    fn inspect_upload_checks_declared_type() {
        let jpeg = sample_jpeg();
        let limits = Limits::default();

        let err = inspect_upload("a.jpg", "text/plain", &jpeg, &limits).unwrap_err();
        assert!(matches!(err, GeotagError::InvalidRequest(_)));

        let err = inspect_upload("a.jpg", "image/png", &jpeg, &limits).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid request: declared type image/png does not match the image/jpeg extension"
        );

        assert!(inspect_upload("a.JPEG", "image/jpg", &jpeg, &limits).is_ok());
        assert!(inspect_upload("b.heif", "image/heic", b"heic", &limits).is_ok());
    }

    #[test]
    fn inspect_upload_enforces_size_limit() {
        let limits = Limits {
            max_file_bytes: 4,
            ..Limits::default()
        };
        assert!(inspect_upload("a.png", "image/png", b"12345", &limits).is_err());
    }

    #[test]
    fn upload_response_uses_camel_case() {
        let response = inspect_upload("a.png", "image/png", b"png", &Limits::default()).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "originalName": "a.png",
                "existingGeo": null,
                "existingDescription": "",
                "existingKeywords": "",
                "imageData": "cG5n",
            })
        );
    }

    // ── handle_geotag ────────────────────────────────────────────────

    #[test]
    fn handle_geotag_jpeg() {
        let body = json!({
            "filename": "nyc.jpg",
            "lat": 40.7128,
            "lon": -74.0060,
            "keywords": "nyc",
            "imageData": STANDARD.encode(sample_jpeg()),
        });
        let request: GeotagRequest = serde_json::from_value(body).unwrap();
        let response = handle_geotag(&request, &Limits::default()).unwrap();

        assert_eq!(response.download_filename, "geotagged_nyc.jpg");
        assert_eq!(response.warning, None);

        let bytes = STANDARD.decode(&response.image_data).unwrap();
        let record = exif::read_metadata(&bytes, ImageFormat::Jpeg);
        assert_eq!(record.keywords.as_deref(), Some("nyc"));
        assert_eq!(record.description, None);
        let coord = record.coordinate.unwrap();
        assert!((coord.latitude - 40.7128).abs() < 1e-4);

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("warning").is_none());
    }

    #[test]
    fn handle_geotag_passthrough_echoes_input() {
        let mut request = request_for(&sample_png(), "map.png");
        request.lat = Some(1.0);
        request.lon = Some(2.0);
        let response = handle_geotag(&request, &Limits::default()).unwrap();

        assert_eq!(response.image_data, request.image_data);
        assert_eq!(response.warning.as_deref(), Some(exif::PASSTHROUGH_WARNING));
        assert_eq!(response.download_filename, "geotagged_map.png");
    }

    #[test]
    fn handle_geotag_requires_filename_and_data() {
        let err = handle_geotag(&GeotagRequest::default(), &Limits::default()).unwrap_err();
        assert_eq!(
            ErrorResponse::from(&err).error,
            "Invalid request: Filename and image data are required"
        );
    }

    #[test]
    fn handle_geotag_rejects_lone_axis() {
        let mut request = request_for(&sample_jpeg(), "a.jpg");
        request.lat = Some(10.0);
        assert!(matches!(
            handle_geotag(&request, &Limits::default()),
            Err(GeotagError::InvalidRequest(_))
        ));

        request.lat = None;
        request.lon = Some(10.0);
        assert!(handle_geotag(&request, &Limits::default()).is_err());
    }

    #[test]
    fn handle_geotag_rejects_bad_base64() {
        let request = GeotagRequest {
            filename: "a.jpg".to_string(),
            image_data: "***".to_string(),
            ..Default::default()
        };
        let err = handle_geotag(&request, &Limits::default()).unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn handle_geotag_applies_limits() {
        let mut request = request_for(&sample_jpeg(), "a.jpg");
        request.description = Some("x".repeat(1301));
        assert!(matches!(
            handle_geotag(&request, &Limits::default()),
            Err(GeotagError::InvalidUpdate(_))
        ));
    }

    #[test]
    fn handle_geotag_corrupt_jpeg_is_container_error() {
        let request = request_for(b"not a jpeg at all", "a.jpg");
        assert!(matches!(
            handle_geotag(&request, &Limits::default()),
            Err(GeotagError::Container(_))
        ));
    }
}
