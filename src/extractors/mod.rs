pub mod exif_block;
pub mod exif_reader;
pub mod image_decoder;
pub mod pixel_decode;

use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::gps::GpsError;
use crate::record::ImageRecord;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("EXIF parse error: {0}")]
    Exif(#[from] exif::Error),
    #[error("Container parse error: {0}")]
    Container(#[from] img_parts::Error),
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
    #[error("GPS conversion error: {0}")]
    Gps(#[from] GpsError),
    #[error("Unsupported image container")]
    UnsupportedContainer,
}

/// The four ways an image's metadata can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Strict tag-dictionary parse of the file container.
    ExifReader,
    /// Raw EXIF block pulled from the container and split into IFD groups.
    ExifBlock,
    /// EXIF and pixel format as reported by the image decoder.
    ImageDecoder,
    /// Full pixel decode, dimensions only.
    PixelDecode,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 4] = [
        ExtractionMethod::ExifReader,
        ExtractionMethod::ExifBlock,
        ExtractionMethod::ImageDecoder,
        ExtractionMethod::PixelDecode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::ExifReader => "exif_reader",
            ExtractionMethod::ExifBlock => "exif_block",
            ExtractionMethod::ImageDecoder => "image_decoder",
            ExtractionMethod::PixelDecode => "pixel_decode",
        }
    }

    pub fn extract(&self, path: &Path) -> Result<ImageRecord, ExtractError> {
        match self {
            ExtractionMethod::ExifReader => exif_reader::extract(path),
            ExtractionMethod::ExifBlock => exif_block::extract(path),
            ExtractionMethod::ImageDecoder => image_decoder::extract(path),
            ExtractionMethod::PixelDecode => pixel_decode::extract(path),
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable value of a tag; ASCII values come out unquoted.
pub(crate) fn display_text(field: &exif::Field, data: &exif::Exif) -> String {
    match field.value {
        exif::Value::Ascii(ref parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part))
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(data).to_string(),
    }
}

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Strips the `Exif\0\0` APP1 marker some containers keep in front of the TIFF data.
pub(crate) fn tiff_payload(block: &[u8]) -> &[u8] {
    block.strip_prefix(EXIF_HEADER).unwrap_or(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(ExtractionMethod::ExifReader.as_str(), "exif_reader");
        assert_eq!(ExtractionMethod::ExifBlock.as_str(), "exif_block");
        assert_eq!(ExtractionMethod::ImageDecoder.as_str(), "image_decoder");
        assert_eq!(ExtractionMethod::PixelDecode.as_str(), "pixel_decode");

        for method in ExtractionMethod::ALL {
            assert_eq!(
                serde_json::to_string(&method).unwrap(),
                format!("\"{}\"", method)
            );
        }
    }

    #[test]
    fn test_methods_run_in_declaration_order() {
        let mut sorted = ExtractionMethod::ALL;
        sorted.sort();
        assert_eq!(sorted, ExtractionMethod::ALL);
    }

    #[test]
    fn test_tiff_payload() {
        assert_eq!(tiff_payload(b"Exif\0\0II*\0"), b"II*\0");
        assert_eq!(tiff_payload(b"MM\0*"), b"MM\0*");
    }
}
