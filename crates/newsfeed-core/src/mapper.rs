use crate::error::{AppError, Result};
use crate::models::{Article, RawEntry, UNKNOWN_AUTHOR};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::borrow::Cow;

/// Naive ISO-8601 layouts accepted for `published`, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts, applied after [`normalize_offset`].
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Validate one raw datastore entry and build an [`Article`] from it.
///
/// Key mapping: `author` (defaults to "Unknown"), `title`, `text` -> body,
/// `url`, `main_image` -> image_url (optional), `published` -> publish_date.
/// Missing required fields, non-string values and unparseable dates are
/// rejected with [`AppError::FormatError`].
pub fn map_entry(raw: &RawEntry) -> Result<Article> {
    let author = optional_str(raw, "author")?
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let title = required_str(raw, "title")?.to_string();
    let body = required_str(raw, "text")?.to_string();
    let url = required_str(raw, "url")?.to_string();
    let image_url = optional_str(raw, "main_image")?.map(str::to_string);

    let published = required_str(raw, "published")?;
    let publish_date = parse_published(published).ok_or_else(|| {
        AppError::FormatError(format!("invalid published date {published:?}"))
    })?;

    Ok(Article {
        author,
        title,
        body,
        publish_date,
        image_url,
        url,
    })
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC,
/// a bare date as midnight UTC.
pub fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let with_offset = normalize_offset(value);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Rewrite a trailing `Z` as `+00:00` and a colon-less `+HHMM` as `+HH:MM`.
fn normalize_offset(value: &str) -> Cow<'_, str> {
    if let Some(rest) = value.strip_suffix(['Z', 'z']) {
        return Cow::Owned(format!("{rest}+00:00"));
    }
    let split = value.len().saturating_sub(5);
    if split > 0 && value.is_char_boundary(split) {
        let (head, tail) = value.split_at(split);
        let tail_bytes = tail.as_bytes();
        let signed = matches!(tail_bytes[0], b'+' | b'-');
        let digits = tail_bytes[1..].iter().all(u8::is_ascii_digit);
        let after_time = head.contains(['T', ' ']);
        if signed && digits && after_time {
            return Cow::Owned(format!("{head}{}:{}", &tail[..3], &tail[3..]));
        }
    }
    Cow::Borrowed(value)
}

fn optional_str<'a>(raw: &'a RawEntry, key: &str) -> Result<Option<&'a str>> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(AppError::FormatError(format!(
            "field {key:?} must be a string, got {other}"
        ))),
    }
}

fn required_str<'a>(raw: &'a RawEntry, key: &str) -> Result<&'a str> {
    optional_str(raw, key)?
        .ok_or_else(|| AppError::FormatError(format!("missing required field {key:?}")))
}
