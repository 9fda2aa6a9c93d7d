use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, Limits};
use crate::error::GeotagError;
use crate::exif::{self, ImageFormat, MetadataRecord};

/// The result of geotagging a single image file.
///
/// # Example
///
/// ```rust,no_run
/// # use exif_geotag::pipeline::process_image;
/// # use exif_geotag::config::Config;
/// # use exif_geotag::exif::{GeoCoordinate, MetadataRecord};
/// let update = MetadataRecord {
///     coordinate: Some(GeoCoordinate::new(40.7128, -74.0060)),
///     ..Default::default()
/// };
/// let result = process_image("photo.jpg".as_ref(), &update, &Config::default());
///
/// if result.error.is_none() {
///     println!("Saved: {:?}", result.output_path);
///     if let Some(ref warning) = result.warning {
///         println!("Warning: {warning}");
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// Detected container format.
    pub format: Option<ImageFormat>,
    /// Where the tagged copy was (or, in dry-run mode, would be) saved.
    pub output_path: Option<PathBuf>,
    /// Whether the EXIF block was rewritten (false for passthrough formats).
    pub metadata_written: bool,
    /// Whether a file was actually created.
    pub saved: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Only files [`ImageFormat::from_path`]
/// recognizes are included.
///
/// # Example
///
/// ```rust,no_run
/// use exif_geotag::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("photo.jpg"),       // single file
///     PathBuf::from("./photos/"),        // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path).is_some()
}

/// Check an update against the configured limits.
///
/// On top of [`MetadataRecord::validate`], this enforces coordinate ranges
/// and the description/keywords length caps (counted in characters).
pub fn validate_update(update: &MetadataRecord, limits: &Limits) -> Result<(), GeotagError> {
    update.validate()?;

    if let Some(coord) = update.coordinate {
        if !(-90.0..=90.0).contains(&coord.latitude) {
            return Err(GeotagError::InvalidUpdate(format!(
                "latitude {} is outside [-90, 90]",
                coord.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&coord.longitude) {
            return Err(GeotagError::InvalidUpdate(format!(
                "longitude {} is outside [-180, 180]",
                coord.longitude
            )));
        }
    }

    check_length("description", update.description.as_deref(), limits.max_description_chars)?;
    check_length("keywords", update.keywords.as_deref(), limits.max_keywords_chars)?;
    Ok(())
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> Result<(), GeotagError> {
    let len = value.map_or(0, |v| v.chars().count());
    if len > max {
        return Err(GeotagError::InvalidUpdate(format!(
            "{field} is {len} characters (max {max})"
        )));
    }
    Ok(())
}

/// Read an image file, enforcing the size limit.
fn read_image(path: &Path, limits: &Limits) -> Result<(ImageFormat, Vec<u8>)> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Unsupported image format: {}", path.display()))?;

    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if size > limits.max_file_bytes {
        bail!(
            "{} is {size} bytes, above the {} byte limit",
            path.display(),
            limits.max_file_bytes
        );
    }

    let bytes = std::fs::read(path).context("Failed to read file")?;
    Ok((format, bytes))
}

/// Read the geotagging fields currently stored in an image file.
pub fn inspect_image(path: &Path, config: &Config) -> Result<MetadataRecord> {
    let (format, bytes) = read_image(path, &config.limits)?;
    let record = exif::read_metadata(&bytes, format);
    if record.is_empty() {
        log::debug!("No geotag metadata found in {}", path.display());
    }
    Ok(record)
}

/// Destination for the tagged copy of `path`.
///
/// Uses the configured output directory, or the input's own directory.
pub fn output_path(path: &Path, config: &Config) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;
    let dir = match &config.output.output_dir {
        Some(dir) => dir.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(exif::output_file_name(file_name)))
}

/// Geotag a single image file.
///
/// 1. **Validate**: Checks the update against [`Config::limits`]
/// 2. **Write**: Merges the update into the image's EXIF block
/// 3. **Save**: Writes `geotagged_<name>` to the output directory, unless
///    dry-run is enabled
///
/// The input file is never modified. Failures are reported in
/// [`ProcessResult::error`] rather than returned, so a batch can carry on.
pub fn process_image(path: &Path, update: &MetadataRecord, config: &Config) -> ProcessResult {
    let mut result = ProcessResult {
        path: path.to_path_buf(),
        format: ImageFormat::from_path(path),
        ..Default::default()
    };

    if let Err(e) = validate_update(update, &config.limits) {
        result.error = Some(e.to_string());
        return result;
    }

    if let Err(e) = tag_file(path, update, config, &mut result) {
        log::warn!("Failed to geotag {}: {e:#}", path.display());
        result.error = Some(format!("{e:#}"));
    }

    result
}

fn tag_file(
    path: &Path,
    update: &MetadataRecord,
    config: &Config,
    result: &mut ProcessResult,
) -> Result<()> {
    let (format, bytes) = read_image(path, &config.limits)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;

    let written = exif::write_metadata(&bytes, format, file_name, update)
        .context("Failed to write metadata")?;
    if let Some(ref warning) = written.warning {
        log::warn!("{}: {warning}", path.display());
    }

    let destination = output_path(path, config)?;
    result.metadata_written = written.metadata_written;
    result.warning = written.warning;
    result.output_path = Some(destination.clone());

    if config.output.dry_run {
        log::info!("  [dry run] Would write {}", destination.display());
        return Ok(());
    }

    if let Some(dir) = destination.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&destination, &written.bytes)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    result.saved = true;
    log::info!("  Saved {}", destination.display());
    Ok(())
}
