//! Document information dictionary.

use chrono::{DateTime, TimeZone, Utc};
use lopdf::{Dictionary, Object, StringFormat};
use serde::{Deserialize, Serialize};

/// Info-dictionary keys cleared when metadata is stripped.
pub(crate) const TEXT_KEYS: [&[u8]; 6] = [
    b"Title",
    b"Author",
    b"Subject",
    b"Keywords",
    b"Producer",
    b"Creator",
];

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Read the text and date fields from an info dictionary.
    pub(crate) fn read_info(&mut self, info: &Dictionary) {
        self.title = text_entry(info, b"Title");
        self.author = text_entry(info, b"Author");
        self.subject = text_entry(info, b"Subject");
        self.keywords = text_entry(info, b"Keywords");
        self.creator = text_entry(info, b"Creator");
        self.producer = text_entry(info, b"Producer");
        self.created = text_entry(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        self.modified = text_entry(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
    }

    /// True when every text field is absent or empty.
    pub fn is_blank(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.subject,
            &self.keywords,
            &self.creator,
            &self.producer,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

/// Blank the text fields of `info` and stamp both dates with `now`.
pub(crate) fn blank_info(info: &mut Dictionary, now: DateTime<Utc>) {
    for key in TEXT_KEYS {
        info.set(key, Object::String(Vec::new(), StringFormat::Literal));
    }
    let stamp = format_pdf_date(now);
    info.set(
        "CreationDate",
        Object::String(stamp.clone().into_bytes(), StringFormat::Literal),
    );
    info.set(
        "ModDate",
        Object::String(stamp.into_bytes(), StringFormat::Literal),
    );
}

fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_text(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, else UTF-8, else Latin-1).
pub(crate) fn decode_pdf_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
pub fn format_pdf_date(at: DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
///
/// Missing trailing components default to their minimum; an explicit
/// UTC offset is applied.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match s.get(range) {
            Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse().ok(),
            Some(_) => None,
            None => Some(default),
        }
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month = field(4..6, 1)?;
    let day = field(6..8, 1)?;
    let hour = field(8..10, 0)?;
    let minute = field(10..12, 0)?;
    let second = field(12..14, 0)?;

    let naive = chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let local = Utc.from_utc_datetime(&naive);

    // Offset suffix: Z, or +HH'mm' / -HH'mm'
    let offset_minutes = match s.get(14..15) {
        Some(sign @ ("+" | "-")) => {
            let hours: i64 = s.get(15..17)?.parse().ok()?;
            let minutes: i64 = s
                .get(18..20)
                .and_then(|m| m.parse().ok())
                .unwrap_or(0);
            let total = hours * 60 + minutes;
            if sign == "-" {
                -total
            } else {
                total
            }
        }
        _ => 0,
    };

    Some(local - chrono::Duration::minutes(offset_minutes))
}
