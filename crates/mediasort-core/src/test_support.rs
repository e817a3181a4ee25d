use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Smallest JPEG kamadak-exif accepts: SOI, one APP1/Exif segment whose
/// big-endian TIFF block holds IFD0 -> Exif IFD -> DateTimeOriginal, EOI.
pub fn jpeg_with_capture_date(datetime: &str) -> Vec<u8> {
    assert_eq!(datetime.len(), 19, "EXIF datetimes are YYYY:MM:DD HH:MM:SS");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // IFD0 at 8: one entry, ExifIFDPointer (LONG) -> 26.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x8769u16.to_be_bytes());
    tiff.extend_from_slice(&4u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    // Exif IFD at 26: one entry, DateTimeOriginal (ASCII, 20 bytes) -> 44.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x9003u16.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&20u32.to_be_bytes());
    tiff.extend_from_slice(&44u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(tiff.len(), 44);
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);

    let mut app1 = b"Exif\x00\x00".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

/// Pin a file's mtime to a local wall-clock time.
pub fn set_mtime(path: &Path, local: NaiveDateTime) {
    let ts = local
        .and_local_timezone(chrono::Local)
        .earliest()
        .expect("local time exists")
        .timestamp();
    filetime::set_file_mtime(path, filetime::FileTime::from_unix_time(ts, 0)).unwrap();
}
