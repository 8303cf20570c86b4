//! Parser for the tool's line-oriented output.
//!
//! A record line looks like `STATUS | /path/to/file | from=Shift_JIS conf=73`.
//! Everything is best effort: lines without the shape are log noise, and a
//! record whose metadata cannot be read keeps the record with default fields.
//! Nothing here returns an error.

use std::sync::LazyLock;

use moji_types::{DetectionRecord, DetectionStatus, UNKNOWN_ENCODING};
use regex::Regex;

/// Metadata keys that carry the source encoding. The tool writes `from=`.
const ENCODING_KEYS: &[&str] = &["encoding", "from"];

static CONFIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)conf=(\d+)").expect("confidence pattern is valid"));

fn is_status_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn encoding_from(metadata: &str) -> Option<&str> {
    metadata.split_whitespace().find_map(|token| {
        let (key, value) = token.split_once('=')?;
        let is_encoding_key = ENCODING_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k));
        (is_encoding_key && !value.is_empty()).then_some(value)
    })
}

fn confidence_from(metadata: &str) -> Option<u8> {
    let digits = CONFIDENCE.captures(metadata)?.get(1)?.as_str();
    // Out-of-range values are clamped rather than dropped.
    Some(digits.parse::<u32>().map_or(100, |v| v.min(100)) as u8)
}

/// Parse one line. `None` means the line is not a record.
///
/// A record needs at least two `|` separators and a non-empty path. The
/// status field must also be a single word: the tool ends its output with
/// summary lines that contain `|` too, and this is what keeps them out.
/// Fields past the third are treated as more metadata.
#[must_use]
pub fn parse_line(line: &str) -> Option<DetectionRecord> {
    let mut fields = line.split('|');
    let status = fields.next()?.trim();
    let path = fields.next()?.trim();
    let metadata: Vec<&str> = fields.collect();
    if metadata.is_empty() || !is_status_token(status) || path.is_empty() {
        return None;
    }
    let metadata = metadata.join(" ");

    let encoding = encoding_from(&metadata);
    let confidence = confidence_from(&metadata);
    if encoding.is_none() {
        tracing::debug!(line, "ParseDegraded: no encoding field, using '{UNKNOWN_ENCODING}'");
    }

    Some(
        DetectionRecord::new(
            DetectionStatus::from_token(status),
            path,
            encoding.unwrap_or(UNKNOWN_ENCODING),
            confidence.unwrap_or(0),
        )
        .with_status_token(status),
    )
}

/// Every record in `output`, in order.
#[must_use]
pub fn parse_records(output: &str) -> Vec<DetectionRecord> {
    output.lines().filter_map(parse_line).collect()
}

/// The last record in `output`: the authoritative result of a single-file detect.
#[must_use]
pub fn last_record(output: &str) -> Option<DetectionRecord> {
    output.lines().rev().find_map(parse_line)
}

/// Records with `WARN` status: the flagged files of a workspace scan.
#[must_use]
pub fn warning_records(output: &str) -> Vec<DetectionRecord> {
    output
        .lines()
        .filter_map(parse_line)
        .filter(|record| record.status().is_warning())
        .collect()
}
