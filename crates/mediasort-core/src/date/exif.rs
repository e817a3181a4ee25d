use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};

/// Read `DateTimeOriginal` from the file's EXIF block.
/// EXIF datetimes have no timezone info - they are local time as-is.
pub fn read_capture_date(path: &Path) -> Result<NaiveDateTime, exif::Error> {
    let exif = {
        let file = File::open(path)?;
        Reader::new().read_from_container(&mut BufReader::new(file))?
    };

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or(exif::Error::NotFound("DateTimeOriginal"))?;

    let Value::Ascii(ref parts) = field.value else {
        return Err(exif::Error::InvalidFormat("DateTimeOriginal is not ASCII"));
    };
    let raw = parts
        .first()
        .ok_or(exif::Error::InvalidFormat("DateTimeOriginal is empty"))?;

    parse_exif_datetime(raw).ok_or(exif::Error::InvalidFormat("unparsable DateTimeOriginal"))
}

fn parse_exif_datetime(raw: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(raw).ok()?;
    let s = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").ok()
}
