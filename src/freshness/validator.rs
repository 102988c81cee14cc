//! Weak entity tags.
//!
//! Tags are CRC-32 checksums of a short descriptor string. They only
//! distinguish "same identity/size, same whole second"; two writes inside one
//! second produce the same tag.

use std::fmt;

use axum::http::HeaderValue;

/// A weak validator rendered as `W/"<hex>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Validator(String);

impl Validator {
    /// Checksum `input` into a weak tag.
    pub fn weak(input: &str) -> Self {
        let checksum = crc32fast::hash(input.as_bytes());
        Self(format!("W/\"{checksum:x}\""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn record_input(key: &str, epoch_seconds: i64) -> String {
    format!("{key}-{epoch_seconds}")
}

/// `count` is `None` when the count query failed.
pub(crate) fn collection_input(type_name: &str, epoch_seconds: i64, count: Option<u64>) -> String {
    match count {
        Some(count) => format!("{type_name}-set-{epoch_seconds}-{count}"),
        None => format!("{type_name}-set-{epoch_seconds}"),
    }
}

pub(crate) fn group_input(mut parts: Vec<String>) -> String {
    parts.sort();
    parts.join(":")
}
