//! # exif-geotag
//!
//! Write GPS coordinates, a description, and keywords into the EXIF metadata of
//! JPEG images, and read them back. Everything else in the file (camera tags,
//! thumbnail, other segments, compressed image data) is carried over as-is.
//!
//! ## Quick Start
//!
//! The simplest way to use the library is through the pipeline module, which handles
//! the full read → validate → write → save flow:
//!
//! ```rust,no_run
//! use exif_geotag::config::Config;
//! use exif_geotag::exif::{GeoCoordinate, MetadataRecord};
//! use exif_geotag::pipeline::{collect_images, process_image};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load config from file (limits, output directory, dry run)
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     let update = MetadataRecord {
//!         coordinate: Some(GeoCoordinate::new(40.7128, -74.0060)),
//!         description: Some("Lower Manhattan".into()),
//!         keywords: None, // leave existing keywords alone
//!     };
//!
//!     // Collect supported image files from paths (files or directories)
//!     let images = collect_images(&[PathBuf::from("./photos")]);
//!
//!     for path in &images {
//!         let result = process_image(path, &update, &config);
//!
//!         if let Some(ref err) = result.error {
//!             eprintln!("Error processing {}: {err}", path.display());
//!         } else if let Some(ref out) = result.output_path {
//!             println!("Wrote: {}", out.display());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The codec works on byte buffers and never touches the filesystem:
//!
//! ```rust,no_run
//! use exif_geotag::exif::{read_metadata, write_metadata, GeoCoordinate, ImageFormat, MetadataRecord};
//!
//! # fn main() -> anyhow::Result<()> {
//! let bytes = std::fs::read("photo.jpg")?;
//!
//! // 1. Read what is already there
//! let existing = read_metadata(&bytes, ImageFormat::Jpeg);
//! println!("Existing coordinate: {:?}", existing.coordinate);
//!
//! // 2. Merge an update
//! let update = MetadataRecord {
//!     coordinate: Some(GeoCoordinate::new(51.5074, -0.1278)),
//!     ..Default::default()
//! };
//! let result = write_metadata(&bytes, ImageFormat::Jpeg, "photo.jpg", &update)?;
//!
//! // 3. Save it
//! std::fs::write(&result.output_name, &result.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Formats
//!
//! | Format | Write Strategy |
//! |--------|---------------|
//! | JPEG (`.jpg`, `.jpeg`) | Native, EXIF in the APP1 segment |
//! | PNG (`.png`) | Passthrough with warning |
//! | WebP (`.webp`) | Passthrough with warning |
//! | HEIC/HEIF (`.heic`, `.heif`) | Passthrough with warning |
//!
//! ## Modules
//!
//! - [`api`]: JSON request/response types for upload and geotag exchanges
//! - [`config`]: Configuration types and loading/saving
//! - [`error`]: Error types
//! - [`exif`]: EXIF block model, geotag reading and writing
//! - [`pipeline`]: File-level processing, image collection, and validation

pub mod api;
pub mod config;
pub mod error;
pub mod exif;
pub mod pipeline;

pub use error::GeotagError;
