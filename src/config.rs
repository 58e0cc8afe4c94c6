use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_IMAGE_DIR: &str = "gambar";
pub const DEFAULT_OUTPUT_SUBDIR: &str = "output";
pub const DEFAULT_OUTPUT_FILE: &str = "example_result.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    /// Report failing (file, method) pairs and carry on instead of aborting the run.
    pub keep_going: bool,
}

impl Config {
    /// Defaults for an explicit image directory.
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        let image_dir = image_dir.into();
        Config {
            output_dir: image_dir.join(DEFAULT_OUTPUT_SUBDIR),
            image_dir,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            keep_going: false,
        }
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let cwd = env::current_dir()?;
        Self::from_lookup(&cwd, |key| env::var(key).ok())
    }

    fn from_lookup(
        cwd: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let image_dir = lookup("EXIF_SCAN_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.join(DEFAULT_IMAGE_DIR));

        let mut config = Config::new(image_dir);

        if let Some(output_dir) = lookup("EXIF_SCAN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(output_dir);
        }
        if let Some(output_file) = lookup("EXIF_SCAN_OUTPUT_FILE") {
            config.output_file = output_file;
        }
        config.keep_going = lookup("EXIF_SCAN_KEEP_GOING")
            .unwrap_or_else(|| "false".to_string())
            .trim()
            .parse()?;

        Ok(config)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}
