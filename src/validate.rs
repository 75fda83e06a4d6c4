//! Per-line validation findings and the field-level checks.
//!
//! Findings are collected, never thrown: every check appends an [`Issue`]
//! to the run's list and reports its outcome to the caller. Only
//! `Severity::Error` findings can fail a run; warnings are advisory.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::countries::is_known_country;

/// ISO 3166-2 style region codes: two uppercase letters, a hyphen, then
/// one or more uppercase letters or digits.
static REGION_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}-[A-Z0-9]+$").expect("region code pattern"));

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fails validation.
    Error,
    /// Reported but never fails validation.
    Warning,
}

/// What kind of defect (or advisory) a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Data line with fewer than two comma-separated fields.
    MalformedLine,
    /// Unparsable or non-canonical CIDR string.
    InvalidNetwork,
    /// Country code that is empty or not exactly two characters.
    InvalidCountryFormat,
    /// Well-formed but unrecognized country code.
    UnknownCountry,
    /// Region code not in ISO 3166-2 form.
    InvalidRegionFormat,
    /// City name containing control characters.
    InvalidCityCharacters,
    /// Two accumulated ranges intersect.
    OverlapDetected,
    /// Entry skipped by the active address-family filter.
    FamilyFiltered,
}

impl IssueKind {
    /// Severity is fixed per kind.
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::MalformedLine
            | IssueKind::InvalidNetwork
            | IssueKind::InvalidCountryFormat
            | IssueKind::InvalidRegionFormat
            | IssueKind::InvalidCityCharacters => Severity::Error,
            IssueKind::UnknownCountry | IssueKind::OverlapDetected | IssueKind::FamilyFiltered => {
                Severity::Warning
            }
        }
    }
}

/// One validation finding, tied to the line it was found on.
#[derive(Debug, Clone)]
pub struct Issue {
    pub kind: IssueKind,
    pub line_number: usize,
    pub message: String,
    pub raw_text: String,
}

impl Issue {
    pub fn new(kind: IssueKind, line_number: usize, message: String, raw_text: &str) -> Issue {
        Issue {
            kind,
            line_number,
            message,
            raw_text: raw_text.to_string(),
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line_number, self.message)
    }
}

/// Outcome of the country-code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryCheck {
    /// Two uppercase letters, present in the embedded ISO table.
    Recognized,
    /// Two characters, but not a known code. Warning only.
    Unknown,
    /// Empty or wrong length.
    Invalid,
}

/// Validate a country code field (ISO 3166-1 alpha-2).
///
/// Recognized codes are the only ones that feed country statistics.
pub fn check_country_code(
    code: &str,
    line_number: usize,
    raw: &str,
    issues: &mut Vec<Issue>,
) -> CountryCheck {
    if code.chars().count() != 2 {
        issues.push(Issue::new(
            IssueKind::InvalidCountryFormat,
            line_number,
            format!("Invalid country code format: {code}"),
            raw,
        ));
        return CountryCheck::Invalid;
    }

    if !is_known_country(code) {
        issues.push(Issue::new(
            IssueKind::UnknownCountry,
            line_number,
            format!("Unknown country code: {code}"),
            raw,
        ));
        return CountryCheck::Unknown;
    }

    CountryCheck::Recognized
}

/// Validate an optional region code field (ISO 3166-2 format).
///
/// Empty is valid; the RFC allows the field to be omitted.
pub fn check_region_code(
    region: &str,
    line_number: usize,
    raw: &str,
    issues: &mut Vec<Issue>,
) -> bool {
    if region.is_empty() {
        return true;
    }

    if !REGION_CODE_RE.is_match(region) {
        issues.push(Issue::new(
            IssueKind::InvalidRegionFormat,
            line_number,
            format!("Invalid region code format: {region}"),
            raw,
        ));
        return false;
    }

    true
}

/// Validate an optional city name field.
///
/// Empty is valid. Non-empty names must not contain control characters
/// (code points below 32).
pub fn check_city_name(city: &str, line_number: usize, raw: &str, issues: &mut Vec<Issue>) -> bool {
    if city.is_empty() {
        return true;
    }

    if city.chars().any(|c| (c as u32) < 32) {
        issues.push(Issue::new(
            IssueKind::InvalidCityCharacters,
            line_number,
            format!("City name contains control characters: {city}"),
            raw,
        ));
        return false;
    }

    true
}
