use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container formats accepted for geotagging.
///
/// Use [`ImageFormat::from_path`] or [`ImageFormat::from_mime`] to detect the
/// format, then [`ImageFormat::metadata_support`] to learn how the writer will
/// treat it.
///
/// # Example
///
/// ```rust
/// use exif_geotag::exif::{ImageFormat, MetadataSupport};
/// use std::path::Path;
///
/// let format = ImageFormat::from_path(Path::new("photo.JPG"));
/// assert_eq!(format, Some(ImageFormat::Jpeg));
/// assert_eq!(ImageFormat::Png.metadata_support(), MetadataSupport::Passthrough);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG: EXIF read/modify/write in the APP1 segment
    Jpeg,
    /// PNG: passthrough
    Png,
    /// WebP: passthrough
    WebP,
    /// HEIC/HEIF: passthrough
    Heic,
}

/// What the codec does with a given format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSupport {
    /// The EXIF block is parsed, merged, and written back.
    Full,
    /// Bytes are returned unchanged with a warning.
    Passthrough,
}

impl ImageFormat {
    /// Determine the format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            "heic" | "heif" => Some(Self::Heic),
            _ => None,
        }
    }

    /// Determine the format from a file path or file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Determine the format from a MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/heic" | "image/heif" => Some(Self::Heic),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Heic => "image/heic",
        }
    }

    pub fn metadata_support(self) -> MetadataSupport {
        match self {
            Self::Jpeg => MetadataSupport::Full,
            Self::Png | Self::WebP | Self::Heic => MetadataSupport::Passthrough,
        }
    }
}
