pub mod config;
pub mod error;
pub mod extractors;
pub mod file_scanner;
pub mod gps;
pub mod record;
pub mod report;
pub mod summary;

use log::{debug, info, warn};
use std::io::Write;
use std::path::PathBuf;

use config::Config;
use error::ScanError;
use extractors::ExtractionMethod;
use file_scanner::FileScanner;
use summary::Summary;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub images: usize,
    pub records: usize,
    pub failures: usize,
    /// Where the JSON summary went; `None` when no image was found.
    pub output_path: Option<PathBuf>,
}

/// Scans the configured directory, runs every extraction method on every image,
/// prints the results to `out` and writes the grouped JSON summary.
pub fn run(config: &Config, out: &mut impl Write) -> Result<ScanOutcome, ScanError> {
    let images = FileScanner::new(config.image_dir.clone()).scan()?;

    if images.is_empty() {
        report::write_no_images(out)?;
        return Ok(ScanOutcome::default());
    }

    report::write_found_images(out, &images)?;

    let mut summary = Summary::new();
    let mut failures = 0;

    for image in &images {
        for method in ExtractionMethod::ALL {
            report::write_method_header(out, &image.file_name, method)?;
            debug!("Extracting {} with {}", image.path.display(), method);

            match method.extract(&image.path) {
                Ok(record) => {
                    report::write_record(out, Some(&record))?;
                    summary.push(method, record);
                }
                Err(e) if config.keep_going => {
                    warn!("Skipping {} for {}: {}", method, image.path.display(), e);
                    report::write_failure(out, &image.file_name, method, &e)?;
                    failures += 1;
                }
                Err(source) => {
                    return Err(ScanError::Extraction {
                        path: image.path.clone(),
                        method,
                        source,
                    });
                }
            }
        }
    }

    let output_path = summary.write_json(&config.output_dir, &config.output_file)?;
    report::write_saved(out, &output_path)?;

    info!(
        "Processed {} images, {} records, {} failures",
        images.len(),
        summary.record_count(),
        failures
    );

    Ok(ScanOutcome {
        images: images.len(),
        records: summary.record_count(),
        failures,
        output_path: Some(output_path),
    })
}
