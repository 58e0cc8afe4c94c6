use log::info;
use std::io;

use exif_scan::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_env()?;

    info!("Image directory: {}", config.image_dir.display());
    info!("Output file: {}", config.output_path().display());
    if config.keep_going {
        info!("Keep-going mode: failing files are reported and skipped");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    exif_scan::run(&config, &mut out)?;

    Ok(())
}
