use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
}

pub struct FileScanner {
    image_dir: PathBuf,
}

impl FileScanner {
    pub fn new(image_dir: PathBuf) -> Self {
        Self { image_dir }
    }

    /// Lists supported image files directly inside the image directory, sorted by name.
    ///
    /// Subdirectories are not descended into, so the output directory never feeds back
    /// into a scan.
    pub fn scan(&self) -> io::Result<Vec<ImageFile>> {
        info!("Scanning directory: {}", self.image_dir.display());

        let mut images = Vec::new();
        for entry in fs::read_dir(&self.image_dir)? {
            let path = entry?.path();
            if path.is_file() && Self::is_supported_file(&path) {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                images.push(ImageFile { path, file_name });
            }
        }

        images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        info!("Found {} images", images.len());
        Ok(images)
    }

    pub fn is_supported_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}
