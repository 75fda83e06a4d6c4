//! Feed line classification and entry field splitting.
//!
//! RFC 8805 records are comma-separated with an optional trailing comma:
//! `ip_range, country_code [, region_code [, city_name [, postal_code]]]`.
//! Lines whose first character is `#` are comments; blank lines carry no
//! data. There is no header row.

/// What a raw feed line is, after trimming surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Comment,
    Blank,
    Data,
}

/// Classify a trimmed feed line.
#[inline]
pub fn classify(trimmed: &str) -> LineKind {
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('#') {
        LineKind::Comment
    } else {
        LineKind::Data
    }
}

/// Positional fields of one data line. Missing optional fields are empty.
///
/// The postal code (field 5) is carried for completeness but is never
/// validated, matching the feed consumers in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEntry<'a> {
    pub ip_range: &'a str,
    pub country_code: &'a str,
    pub region_code: &'a str,
    pub city_name: &'a str,
    pub postal_code: &'a str,
}

/// Split a data line into positional fields.
///
/// Exactly one trailing comma is stripped before splitting. Returns the
/// number of fields found when there are fewer than the required two.
pub fn split_entry(line: &str) -> Result<ParsedEntry<'_>, usize> {
    let line = line.strip_suffix(',').unwrap_or(line);
    let mut fields = line.split(',');

    let ip_range = fields.next().unwrap_or("").trim();
    let country_code = match fields.next() {
        Some(f) => f.trim(),
        // a lone field is malformed, even when empty
        None => return Err(1),
    };
    let region_code = fields.next().unwrap_or("").trim();
    let city_name = fields.next().unwrap_or("").trim();
    let postal_code = fields.next().unwrap_or("").trim();

    Ok(ParsedEntry {
        ip_range,
        country_code,
        region_code,
        city_name,
        postal_code,
    })
}
