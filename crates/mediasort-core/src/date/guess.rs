use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

struct NamePattern {
    regex: LazyLock<Regex>,
    format: &'static str,
}

const MONTH: &str = "(0[1-9]|1[0-2])";

macro_rules! pattern {
    ($re:literal, $fmt:literal) => {
        NamePattern {
            regex: LazyLock::new(|| {
                Regex::new(&format!($re, month = MONTH)).expect("static filename date pattern")
            }),
            format: $fmt,
        }
    };
}

// Ordered from most to least specific separator layout.
static PATTERNS: [NamePattern; 6] = [
    pattern!(r"(?P<date>(20|19)\d{{2}}{month}[0-3]\d_\d{{6}})", "%Y%m%d_%H%M%S"),
    pattern!(r"(?P<date>(20|19)\d{{2}}{month}[0-3]\d-\d{{6}})", "%Y%m%d-%H%M%S"),
    pattern!(r"(?P<date>(20|19)\d{{2}}-{month}-[0-3]\d-\d{{2}}-\d{{2}}-\d{{2}})", "%Y-%m-%d-%H-%M-%S"),
    pattern!(r"(?P<date>(20|19)\d{{2}}-{month}-[0-3]\d-\d{{6}})", "%Y-%m-%d-%H%M%S"),
    pattern!(r"(?P<date>(20|19)\d{{2}}_{month}_[0-3]\d_\d{{2}}_\d{{2}}_\d{{2}})", "%Y_%m_%d_%H_%M_%S"),
    pattern!(r"(?P<date>(20|19)\d{{2}}{month}[0-3]\d\d{{6}})", "%Y%m%d%H%M%S"),
];

/// Guess a capture date from camera-style file names such as
/// `IMG_20190509_154733.jpg` or `signal-2020-10-26-163832.jpg`.
pub fn guess_date_from_filename(file_name: &str) -> Option<NaiveDateTime> {
    PATTERNS.iter().find_map(|pat| {
        let caps = pat.regex.captures(file_name)?;
        NaiveDateTime::parse_from_str(caps.name("date")?.as_str(), pat.format).ok()
    })
}
