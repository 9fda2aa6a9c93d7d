use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_geotag::exif::{GeoCoordinate, MetadataRecord};
use exif_geotag::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "geotag-cli",
    version,
    about = "Geotag images: write GPS coordinates, descriptions, and keywords into EXIF metadata"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Latitude in decimal degrees (negative for south)
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude in decimal degrees (negative for west)
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Image description (an empty string clears it)
    #[arg(short, long)]
    description: Option<String>,

    /// Keywords, e.g. "beach; sunset"
    #[arg(short, long)]
    keywords: Option<String>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for geotagged copies (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Preview changes without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Display existing geotag metadata and exit
    #[arg(long)]
    show: bool,
}

impl Cli {
    fn update(&self) -> MetadataRecord {
        MetadataRecord {
            coordinate: self.lat.zip(self.lon).map(|(lat, lon)| GeoCoordinate::new(lat, lon)),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config and apply CLI overrides
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.output.dry_run = true;
    }
    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = Some(dir.clone());
    }

    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    // Handle --show
    if cli.show {
        return show_images(&images, &config, cli.json);
    }

    let update = cli.update();
    if update.is_empty() {
        anyhow::bail!("Nothing to write. Pass --lat/--lon, --description, or --keywords.");
    }
    pipeline::validate_update(&update, &config.limits)?;

    log::info!("Found {} image(s) to process", images.len());
    if config.output.dry_run {
        log::info!("DRY RUN, no files will be written");
    }

    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let result = pipeline::process_image(image_path, &update, &config);
        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        } else if !result.metadata_written {
            log::info!("  Copied without metadata changes");
        }
        results.push(result);
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "format": r.format,
                    "output_path": r.output_path.as_ref().map(|p| p.display().to_string()),
                    "metadata_written": r.metadata_written,
                    "saved": r.saved,
                    "warning": r.warning,
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = total - success;
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    Ok(())
}

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Label column width; values wrap at `VALUE_WIDTH` characters beside it.
const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 50;

fn show_images(images: &[PathBuf], config: &config::Config, json: bool) -> Result<()> {
    if json {
        let mut entries = Vec::new();
        for path in images {
            let record = pipeline::inspect_image(path, config)?;
            entries.push(serde_json::json!({
                "path": path.display().to_string(),
                "metadata": record,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for path in images {
        print_record(path, &pipeline::inspect_image(path, config)?);
    }
    Ok(())
}

/// Print the geotag fields of one file.
fn print_record(path: &Path, record: &MetadataRecord) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    if record.is_empty() {
        println!("  {DIM}(no geotag metadata found){RESET}");
        println!();
        return;
    }

    if let Some(coord) = record.coordinate {
        print_row("GPSLatitude", &format!("{:.6}", coord.latitude));
        print_row("GPSLongitude", &format!("{:.6}", coord.longitude));
    }
    if let Some(ref description) = record.description {
        print_row("ImageDescription", description);
    }
    if let Some(ref keywords) = record.keywords {
        print_row("XPKeywords", keywords);
    }
    println!();
}

fn print_row(label: &str, value: &str) {
    for (i, line) in wrap_chars(value, VALUE_WIDTH).iter().enumerate() {
        let label = if i == 0 { label } else { "" };
        println!("  {label:<LABEL_WIDTH$}  {line}");
    }
}

/// Break `text` into lines of at most `width` characters, splitting on
/// whitespace. A single word longer than `width` gets a line of its own.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;
    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line_chars > 0 && line_chars + 1 + word_chars > width {
            lines.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line.push_str(word);
        line_chars += word_chars;
    }
    lines.push(line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── wrap_chars ───────────────────────────────────────────────────

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let text = "café crème brûlée";
        assert_eq!(wrap_chars(text, 10), vec!["café crème", "brûlée"]);
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(wrap_chars("a supercalifragilistic b", 5), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wrap_empty_value() {
        assert_eq!(wrap_chars("", 10), vec![String::new()]);
        assert_eq!(wrap_chars("   ", 10), vec![String::new()]);
    }

    // ── update ───────────────────────────────────────────────────────

    #[test]
    fn update_pairs_coordinates() {
        let cli = Cli::parse_from(["geotag-cli", "--lat", "-33.5", "--lon", "151", "-k", "", "x.jpg"]);
        let update = cli.update();
        assert_eq!(update.coordinate, Some(GeoCoordinate::new(-33.5, 151.0)));
        assert_eq!(update.keywords.as_deref(), Some(""));
        assert_eq!(update.description, None);
    }

    #[test]
    fn lone_latitude_is_rejected() {
        assert!(Cli::try_parse_from(["geotag-cli", "--lat", "1", "x.jpg"]).is_err());
    }
}
