use image::{GenericImageView, ImageReader};
use std::path::Path;

use super::{ExtractError, ExtractionMethod};
use crate::record::{FieldValue, ImageRecord, FIELD_IMAGE_SIZE};

/// Decodes the full pixel buffer and records its dimensions. EXIF is never read.
///
/// The decoder is picked from the file contents, not its extension.
pub fn extract(path: &Path) -> Result<ImageRecord, ExtractError> {
    let mut record = ImageRecord::with_base_fields(path, ExtractionMethod::PixelDecode)?;

    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let (width, height) = img.dimensions();
    record.insert(FIELD_IMAGE_SIZE, FieldValue::Dimensions(width, height));

    Ok(record)
}
