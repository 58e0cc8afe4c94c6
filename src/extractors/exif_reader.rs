use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{display_text, ExtractError, ExtractionMethod};
use crate::gps::{self, GpsError};
use crate::record::{FieldValue, ImageRecord, FIELD_COORDINATES};

/// Reads every tag of the file's EXIF payload with a strict container parse.
///
/// Keys follow the `"<group> <TagName>"` layout, e.g. `"Image Make"` or
/// `"GPS GPSLatitude"`. A file without any EXIF payload yields the base fields only;
/// every other parse failure is returned to the caller.
pub fn extract(path: &Path) -> Result<ImageRecord, ExtractError> {
    let mut record = ImageRecord::with_base_fields(path, ExtractionMethod::ExifReader)?;

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            debug!("No EXIF data found for: {}", path.display());
            return Ok(record);
        }
        Err(e) => return Err(e.into()),
    };

    let tags = tag_dictionary(&exif);

    if tags.iter().any(|(key, _)| key.starts_with("GPS")) {
        if let Some((lat, lon)) = coordinates(&exif)? {
            record.insert(FIELD_COORDINATES, FieldValue::Coordinates(lat, lon));
        }
    }

    for (key, field) in tags {
        let value = match field.value {
            Value::Undefined(ref bytes, _) => FieldValue::Bytes(bytes.clone()),
            _ => FieldValue::Text(display_text(field, &exif)),
        };
        record.insert(key, value);
    }

    Ok(record)
}

/// Tag key and field pairs in file order.
fn tag_dictionary(exif: &Exif) -> Vec<(String, &Field)> {
    exif.fields()
        .map(|field| (format!("{} {}", group_name(field), field.tag), field))
        .collect()
}

fn group_name(field: &Field) -> &'static str {
    if field.ifd_num == In::THUMBNAIL {
        return "Thumbnail";
    }

    match field.tag.context() {
        Context::Exif => "EXIF",
        Context::Gps => "GPS",
        Context::Interop => "Interoperability",
        _ => "Image",
    }
}

/// Latitude and longitude, when all four position tags are present.
fn coordinates(exif: &Exif) -> Result<Option<(f64, f64)>, GpsError> {
    let lat = position(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
    let lon = position(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);

    match (lat, lon) {
        (Some((lat, lat_ref)), Some((lon, lon_ref))) => Ok(Some((
            gps::decimal_from_dms(lat, lat_ref)?,
            gps::decimal_from_dms(lon, lon_ref)?,
        ))),
        _ => Ok(None),
    }
}

fn position(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<(&[exif::Rational], char)> {
    let coord_field = exif.get_field(coord_tag, In::PRIMARY)?;
    let ref_field = exif.get_field(ref_tag, In::PRIMARY)?;

    match coord_field.value {
        Value::Rational(ref values) => {
            let reference = gps::reference_char(&ref_field.value)?;
            Some((values.as_slice(), reference))
        }
        _ => None,
    }
}
