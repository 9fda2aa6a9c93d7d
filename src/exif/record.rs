use serde::{Deserialize, Serialize};

use crate::error::GeotagError;

/// A signed decimal-degree coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The geotagging view of an image's EXIF block.
///
/// `None` means "not present" when reading and "leave untouched" when writing.
/// `Some(String::new())` is a real, empty value and survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub coordinate: Option<GeoCoordinate>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl MetadataRecord {
    pub fn is_empty(&self) -> bool {
        self.coordinate.is_none() && self.description.is_none() && self.keywords.is_none()
    }

    /// Reject updates the block encoder cannot represent.
    ///
    /// Range and length limits are a caller concern, see
    /// [`validate_update`](crate::pipeline::validate_update).
    pub fn validate(&self) -> Result<(), GeotagError> {
        if let Some(coord) = self.coordinate {
            if !coord.latitude.is_finite() || !coord.longitude.is_finite() {
                return Err(GeotagError::InvalidUpdate(format!(
                    "coordinate must be finite, got ({}, {})",
                    coord.latitude, coord.longitude
                )));
            }
        }
        // ImageDescription is NUL-terminated ASCII
        if self.description.as_deref().is_some_and(|d| d.contains('\0')) {
            return Err(GeotagError::InvalidUpdate(
                "description must not contain NUL characters".to_string(),
            ));
        }
        Ok(())
    }
}
