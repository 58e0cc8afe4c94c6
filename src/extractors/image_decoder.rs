use exif::{In, Reader};
use image::{ColorType, ImageDecoder, ImageReader};
use log::debug;
use std::path::Path;

use super::{display_text, tiff_payload, ExtractError, ExtractionMethod};
use crate::record::{
    clean_exif_value, FieldValue, ImageRecord, FIELD_IMAGE_MODE, FIELD_IMAGE_SIZE,
};

/// Reads the EXIF block and pixel format the image decoder reports, without decoding
/// the pixels themselves.
///
/// Only metadata ahead of the pixel data is seen: a PNG `eXIf` chunk placed after
/// `IDAT` yields no EXIF fields here.
pub fn extract(path: &Path) -> Result<ImageRecord, ExtractError> {
    let mut record = ImageRecord::with_base_fields(path, ExtractionMethod::ImageDecoder)?;

    let mut decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;

    let (width, height) = decoder.dimensions();
    record.insert(FIELD_IMAGE_SIZE, FieldValue::Dimensions(width, height));
    record.insert(FIELD_IMAGE_MODE, color_mode(decoder.color_type()));

    let Some(block) = decoder.exif_metadata()? else {
        debug!("Decoder reported no EXIF for: {}", path.display());
        return Ok(record);
    };

    let exif = Reader::new().read_raw(tiff_payload(&block).to_vec())?;

    for field in exif.fields().filter(|field| field.ifd_num == In::PRIMARY) {
        let value = clean_exif_value(&display_text(field, &exif));
        record.insert(field.tag.to_string(), value);
    }

    Ok(record)
}

/// Short colour mode name, e.g. `RGB` or `LA`.
pub fn color_mode(color_type: ColorType) -> String {
    match color_type {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => "RGB".to_string(),
        ColorType::Rgba8 => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        ColorType::La16 => "LA;16".to_string(),
        ColorType::Rgb16 => "RGB;16".to_string(),
        ColorType::Rgba16 => "RGBA;16".to_string(),
        ColorType::Rgb32F => "RGB;F".to_string(),
        ColorType::Rgba32F => "RGBA;F".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FIELD_COORDINATES;
    use tempfile::TempDir;

    #[test]
    fn test_color_mode() {
        assert_eq!(color_mode(ColorType::Rgb8), "RGB");
        assert_eq!(color_mode(ColorType::Rgba8), "RGBA");
        assert_eq!(color_mode(ColorType::L8), "L");
        assert_eq!(color_mode(ColorType::La16), "LA;16");
    }

    #[test]
    fn test_extract_dimensions_and_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gray.png");
        image::GrayImage::new(7, 5).save(&path).unwrap();

        let record = extract(&path).unwrap();

        assert_eq!(record.get(FIELD_IMAGE_SIZE), Some(&FieldValue::Dimensions(7, 5)));
        assert_eq!(record.text(FIELD_IMAGE_MODE), Some("L"));
        assert!(!record.contains_key(FIELD_COORDINATES));
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_extract_rejects_non_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.webp");
        std::fs::write(&path, b"not an image at all").unwrap();

        assert!(extract(&path).is_err());
    }
}
