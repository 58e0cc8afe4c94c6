use exif::{Context, Exif, In, Reader, Value};
use img_parts::{Bytes, DynImage, ImageEXIF};
use log::debug;
use std::fs;
use std::path::Path;

use super::{tiff_payload, ExtractError, ExtractionMethod};
use crate::gps::{self, GpsError};
use crate::record::{
    clean_exif_value, escape_bytes, FieldValue, ImageRecord, FIELD_COORDINATES,
};

pub const GPS_GROUP: &str = "GPS";

/// Contents of one IFD group of a raw EXIF block.
#[derive(Debug, Clone)]
pub enum ExifGroup {
    /// Tag name to raw value.
    Tags(Vec<(String, Value)>),
    /// Bare entries without tag names, flattened into one list field.
    Entries(Vec<String>),
}

/// Pulls the raw EXIF block out of the image container and walks it IFD by IFD.
pub fn extract(path: &Path) -> Result<ImageRecord, ExtractError> {
    let mut record = ImageRecord::with_base_fields(path, ExtractionMethod::ExifBlock)?;

    let Some(block) = read_exif_block(path)? else {
        debug!("No EXIF block in container: {}", path.display());
        return Ok(record);
    };

    let exif = Reader::new().read_raw(tiff_payload(&block).to_vec())?;
    let groups = split_groups(&exif);

    let gps_group = groups.iter().find(|(name, _)| *name == GPS_GROUP);
    if let Some((_, ExifGroup::Tags(gps_tags))) = gps_group {
        if let Some((lat, lon)) = gps_coordinates(gps_tags)? {
            record.insert(FIELD_COORDINATES, FieldValue::Coordinates(lat, lon));
        }
    }

    flatten_groups(&groups, &mut record);

    Ok(record)
}

fn read_exif_block(path: &Path) -> Result<Option<Bytes>, ExtractError> {
    let data = fs::read(path)?;
    let image =
        DynImage::from_bytes(Bytes::from(data))?.ok_or(ExtractError::UnsupportedContainer)?;
    Ok(image.exif())
}

/// Groups the parsed fields by IFD, in the order the groups first appear.
pub fn split_groups(exif: &Exif) -> Vec<(&'static str, ExifGroup)> {
    let mut groups: Vec<(&'static str, ExifGroup)> = Vec::new();

    for field in exif.fields() {
        let name = group_name(field.ifd_num, field.tag.context());
        let entry = (field.tag.to_string(), field.value.clone());

        if let Some((_, ExifGroup::Tags(tags))) =
            groups.iter_mut().find(|(existing, _)| *existing == name)
        {
            tags.push(entry);
        } else {
            groups.push((name, ExifGroup::Tags(vec![entry])));
        }
    }

    groups
}

fn group_name(ifd: In, context: Context) -> &'static str {
    if ifd == In::THUMBNAIL {
        return "1st";
    }

    match context {
        Context::Exif => "Exif",
        Context::Gps => GPS_GROUP,
        Context::Interop => "Interop",
        _ => "0th",
    }
}

/// Copies every non-GPS group into the record.
///
/// Tag groups become one cleaned field per tag, entry groups one list field named
/// after the group. Later groups overwrite same-named tags of earlier ones.
pub fn flatten_groups(groups: &[(&'static str, ExifGroup)], record: &mut ImageRecord) {
    for (name, group) in groups {
        if *name == GPS_GROUP {
            continue;
        }

        match group {
            ExifGroup::Tags(tags) => {
                for (tag, value) in tags {
                    record.insert(tag.as_str(), clean_exif_value(&raw_value_text(value)));
                }
            }
            ExifGroup::Entries(entries) => {
                record.insert(*name, FieldValue::List(entries.clone()));
            }
        }
    }
}

fn gps_coordinates(tags: &[(String, Value)]) -> Result<Option<(f64, f64)>, GpsError> {
    let lookup = |name: &str| {
        tags.iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value)
    };

    let (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) = (
        lookup("GPSLatitude").and_then(rational_tuples),
        lookup("GPSLatitudeRef").and_then(gps::reference_char),
        lookup("GPSLongitude").and_then(rational_tuples),
        lookup("GPSLongitudeRef").and_then(gps::reference_char),
    ) else {
        return Ok(None);
    };

    Ok(Some((
        gps::decimal_from_dms(&lat, lat_ref)?,
        gps::decimal_from_dms(&lon, lon_ref)?,
    )))
}

fn rational_tuples(value: &Value) -> Option<Vec<(u32, u32)>> {
    match value {
        Value::Rational(values) => Some(values.iter().map(|r| (r.num, r.denom)).collect()),
        _ => None,
    }
}

/// Renders a value without any tag-specific interpretation.
pub fn raw_value_text(value: &Value) -> String {
    match value {
        Value::Byte(bytes) | Value::Undefined(bytes, _) => escape_bytes(bytes),
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| escape_bytes(part))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Short(v) => render_list(v),
        Value::Long(v) => render_list(v),
        Value::SByte(v) => render_list(v),
        Value::SShort(v) => render_list(v),
        Value::SLong(v) => render_list(v),
        Value::Float(v) => render_list(v),
        Value::Double(v) => render_list(v),
        Value::Rational(v) => render_list(v.iter().map(|r| format!("{}/{}", r.num, r.denom))),
        Value::SRational(v) => render_list(v.iter().map(|r| format!("{}/{}", r.num, r.denom))),
        other => format!("{:?}", other),
    }
}

fn render_list<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if items.len() == 1 {
        items.into_iter().next().unwrap_or_default()
    } else {
        format!("[{}]", items.join(", "))
    }
}
