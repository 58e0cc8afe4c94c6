//! Console output. The wording is Indonesian and meant for people, not parsers.

use std::io::{self, Write};
use std::path::Path;

use crate::extractors::{ExtractError, ExtractionMethod};
use crate::file_scanner::ImageFile;
use crate::record::ImageRecord;

pub const NO_EXIF_MESSAGE: &str = "Tidak ada data EXIF dalam gambar.";
pub const NO_IMAGES_MESSAGE: &str =
    "Tidak ada file gambar (.jpg, .jpeg, .png, .webp) dalam direktori saat ini.";
const SECTION_RULE: &str = "------------------------------";
const RECORD_RULE: &str = "==============================";

pub fn write_found_images(out: &mut impl Write, images: &[ImageFile]) -> io::Result<()> {
    writeln!(out, "Gambar yang ditemukan dalam direktori saat ini:")?;
    for image in images {
        writeln!(out, "{}", image.file_name)?;
    }
    writeln!(out)
}

pub fn write_method_header(
    out: &mut impl Write,
    file_name: &str,
    method: ExtractionMethod,
) -> io::Result<()> {
    writeln!(out, "Informasi untuk file {} menggunakan {}:", file_name, method)?;
    writeln!(out, "{}", SECTION_RULE)
}

/// Prints each field as `key: value`, or the no-EXIF line when there is nothing to show.
pub fn write_record(out: &mut impl Write, record: Option<&ImageRecord>) -> io::Result<()> {
    match record {
        Some(record) if !record.is_empty() => {
            for (key, value) in record.iter() {
                writeln!(out, "{}: {}", key, value)?;
            }
        }
        _ => writeln!(out, "{}", NO_EXIF_MESSAGE)?,
    }
    writeln!(out, "{}", RECORD_RULE)
}

pub fn write_failure(
    out: &mut impl Write,
    file_name: &str,
    method: ExtractionMethod,
    error: &ExtractError,
) -> io::Result<()> {
    writeln!(
        out,
        "Gagal membaca {} menggunakan {}: {}",
        file_name, method, error
    )?;
    writeln!(out, "{}", RECORD_RULE)
}

pub fn write_saved(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(out, "Informasi gambar disimpan dalam file: {}", path.display())
}

pub fn write_no_images(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", NO_IMAGES_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_record_fields() {
        let mut record = ImageRecord::new();
        record.insert("Name Method", "exif_reader");
        record.insert("File Size", FieldValue::Integer(2048));
        record.insert("Coordinates", FieldValue::Coordinates(40.5, -3.25));

        let text = rendered(|out| write_record(out, Some(&record)));

        assert_eq!(
            text,
            "Name Method: exif_reader\nFile Size: 2048\nCoordinates: (40.5, -3.25)\n\
             ==============================\n"
        );
    }

    #[test]
    fn test_write_record_does_not_escape() {
        let mut record = ImageRecord::new();
        record.insert("Comment", "line \"quoted\"\ttab");

        let text = rendered(|out| write_record(out, Some(&record)));

        assert!(text.starts_with("Comment: line \"quoted\"\ttab\n"));
    }

    #[test]
    fn test_write_record_empty_or_absent() {
        let empty = ImageRecord::new();
        let expected = format!("{}\n{}\n", NO_EXIF_MESSAGE, RECORD_RULE);

        assert_eq!(rendered(|out| write_record(out, Some(&empty))), expected);
        assert_eq!(rendered(|out| write_record(out, None)), expected);
    }

    #[test]
    fn test_write_method_header() {
        let text = rendered(|out| write_method_header(out, "a.jpg", ExtractionMethod::ExifBlock));

        assert_eq!(
            text,
            "Informasi untuk file a.jpg menggunakan exif_block:\n------------------------------\n"
        );
    }
}
