use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::extractors::ExtractionMethod;

pub const FIELD_METHOD: &str = "Name Method";
pub const FIELD_FILE_NAME: &str = "File Name";
pub const FIELD_FILE_SIZE: &str = "File Size";
pub const FIELD_EXTENSION: &str = "Extension";
pub const FIELD_COORDINATES: &str = "Coordinates";
pub const FIELD_IMAGE_SIZE: &str = "Image Size";
pub const FIELD_IMAGE_MODE: &str = "Image Mode";

/// Substrings stripped from stringified EXIF values, applied in this order.
const NOISE_PATTERNS: [&str; 7] = ["\\x00", "\\x01", "\\x02", "\\x03", "b'", "'", "\u{0}"];

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(u64),
    /// Raw payload, rendered as UTF-8 with invalid sequences replaced.
    Bytes(Vec<u8>),
    Dimensions(u32, u32),
    Coordinates(f64, f64),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(n) => serializer.serialize_u64(*n),
            FieldValue::Bytes(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
            FieldValue::Dimensions(w, h) => (w, h).serialize(serializer),
            FieldValue::Coordinates(lat, lon) => (lat, lon).serialize(serializer),
            FieldValue::List(items) => items.serialize(serializer),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            FieldValue::Dimensions(w, h) => write!(f, "({}, {})", w, h),
            FieldValue::Coordinates(lat, lon) => write!(f, "({}, {})", lat, lon),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Flat field map for one (file, extraction method) pair, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRecord {
    fields: Vec<(String, FieldValue)>,
}

impl ImageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record holding the fields every method sets: method, file name, size and extension.
    pub fn with_base_fields(path: &Path, method: ExtractionMethod) -> io::Result<Self> {
        let size = fs::metadata(path)?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = Self::new();
        record.insert(FIELD_METHOD, method.as_str());
        record.insert(FIELD_FILE_NAME, file_name);
        record.insert(FIELD_FILE_SIZE, FieldValue::Integer(size));
        record.insert(FIELD_EXTENSION, extension_of(path));
        Ok(record)
    }

    /// Inserts a field, replacing the value in place when the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for ImageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(key, value)| (key, value)))
    }
}

/// Lower-cased extension with a leading dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Trims a stringified EXIF value and strips escape and quoting noise from it.
pub fn clean_exif_value(value: &str) -> String {
    NOISE_PATTERNS
        .iter()
        .fold(value.trim().to_string(), |acc, pattern| acc.replace(pattern, ""))
}

/// Renders raw bytes as text, escaping anything outside printable ASCII as `\xNN`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b == b' ' || b.is_ascii_graphic() {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{:02x}", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_clean_exif_value_removes_escaped_nulls() {
        assert_eq!(clean_exif_value("Canon\\x00\\x00\\x00"), "Canon");
    }

    #[test]
    fn test_clean_exif_value_removes_byte_markers_and_quotes() {
        assert_eq!(clean_exif_value("b'Canon EOS'"), "Canon EOS");
        assert_eq!(clean_exif_value("'x' 'y' 'z'"), "x y z");
    }

    #[test]
    fn test_clean_exif_value_strips_byte_marker_before_quote() {
        // `b'` goes first, so a quoted lone `b` disappears with its quotes
        assert_eq!(clean_exif_value("'a' 'b' 'c'"), "a  c");
        assert_eq!(clean_exif_value("b'b''"), "");
    }

    #[test]
    fn test_clean_exif_value_any_position() {
        assert_eq!(
            clean_exif_value("\\x01lead\\x02mid\\x03\\x03trail\u{0}\u{0}"),
            "leadmidtrail"
        );
    }

    #[test]
    fn test_clean_exif_value_trims_whitespace() {
        assert_eq!(clean_exif_value("  72/1  "), "72/1");
    }

    #[test]
    fn test_clean_exif_value_empty_input() {
        assert_eq!(clean_exif_value(""), "");
        assert_eq!(clean_exif_value("''"), "");
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"Canon\0"), "Canon\\x00");
        assert_eq!(escape_bytes(&[0x30, 0x32, 0x33, 0x30]), "0230");
        assert_eq!(clean_exif_value(&escape_bytes(b"Pixel 7\0\x01")), "Pixel 7");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = ImageRecord::new();
        record.insert("Make", "Canon");
        record.insert("Model", "EOS");
        record.insert("Make", "Nikon");

        let keys: Vec<&str> = record.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Make", "Model"]);
        assert_eq!(record.text("Make"), Some("Nikon"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_base_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Holiday.JPG");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"0123456789").unwrap();

        let record = ImageRecord::with_base_fields(&path, ExtractionMethod::PixelDecode).unwrap();

        assert_eq!(record.text(FIELD_METHOD), Some("pixel_decode"));
        assert_eq!(record.text(FIELD_FILE_NAME), Some("Holiday.JPG"));
        assert_eq!(record.get(FIELD_FILE_SIZE), Some(&FieldValue::Integer(10)));
        assert_eq!(record.text(FIELD_EXTENSION), Some(".jpg"));
        assert!(!record.contains_key(FIELD_COORDINATES));
    }

    #[test]
    fn test_base_fields_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.png");
        assert!(ImageRecord::with_base_fields(&path, ExtractionMethod::ExifReader).is_err());
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Dimensions(640, 480).to_string(), "(640, 480)");
        assert_eq!(FieldValue::Coordinates(40.5, -3.25).to_string(), "(40.5, -3.25)");
        assert_eq!(
            FieldValue::List(vec!["1".to_string(), "2".to_string()]).to_string(),
            "[1, 2]"
        );
        assert_eq!(FieldValue::Bytes(vec![b'o', b'k', 0xff]).to_string(), "ok\u{fffd}");
    }

    #[test]
    fn test_record_serializes_in_order() {
        let mut record = ImageRecord::new();
        record.insert("Zeta", "last");
        record.insert(FIELD_COORDINATES, FieldValue::Coordinates(1.5, -2.0));
        record.insert("Blob", FieldValue::Bytes(vec![b'a', 0xc3, 0x28]));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            "{\"Zeta\":\"last\",\"Coordinates\":[1.5,-2.0],\"Blob\":\"a\u{fffd}(\"}"
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b/photo.WebP")), ".webp");
        assert_eq!(extension_of(Path::new("noext")), "");
    }
}
