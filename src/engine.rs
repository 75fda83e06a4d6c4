//! The validation run orchestrator.
//!
//! One [`Engine::validate_source`] call is one run: lines are consumed
//! strictly in order, each data line is parsed and checked, and the
//! overlap scan runs as a post-pass over the accumulated networks. All
//! run state lives in a [`RunReport`] constructed fresh per call, so
//! repeated runs (filtered or not) can never bleed into each other.

use std::io;

use tracing::debug;

use crate::error::Result;
use crate::network::{Family, GeoNetwork};
use crate::overlap::{self, AccumulatedNetwork};
use crate::parser::{self, LineKind};
use crate::rir::{RirData, RirLookup};
use crate::source::FeedSource;
use crate::stats::Statistics;
use crate::validate::{
    check_city_name, check_country_code, check_region_code, CountryCheck, Issue, IssueKind,
    Severity,
};

/// Restrict a run to one address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FamilyFilter {
    #[default]
    All,
    V4Only,
    V6Only,
}

impl FamilyFilter {
    /// Whether a network of `family` is excluded by this filter.
    #[inline]
    pub fn excludes(self, family: Family) -> bool {
        match self {
            FamilyFilter::All => false,
            FamilyFilter::V4Only => family != Family::V4,
            FamilyFilter::V6Only => family != Family::V6,
        }
    }

    fn skip_note(self) -> &'static str {
        match self {
            FamilyFilter::V4Only => "Skipping IPv6 address (IPv4 only mode)",
            FamilyFilter::V6Only => "Skipping IPv4 address (IPv6 only mode)",
            FamilyFilter::All => unreachable!("no filter active"),
        }
    }
}

/// Run-scoped configuration. These gate behavior; none of them survive
/// the run they were passed to.
#[derive(Debug, Clone)]
pub struct Config {
    pub family_filter: FamilyFilter,
    pub overlap_check_enabled: bool,
    pub show_rir: bool,
    pub verbose: bool,
    pub insecure_tls: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            family_filter: FamilyFilter::All,
            overlap_check_enabled: true,
            show_rir: false,
            verbose: false,
            insecure_tls: false,
        }
    }
}

/// Line counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub total_lines: u64,
    pub comment_lines: u64,
    pub data_lines: u64,
    pub valid_lines: u64,
    pub invalid_lines: u64,
}

/// RDAP registration data looked up for one entry, or the failure text.
#[derive(Debug, Clone)]
pub struct RirRecord {
    pub line_number: usize,
    /// The entry as `ip,country,region,city`, echoed before the data.
    pub entry: String,
    pub outcome: std::result::Result<RirData, String>,
}

/// Everything one validation run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub counts: LineCounts,
    /// All findings, in encounter order. Never pruned.
    pub issues: Vec<Issue>,
    pub rir_records: Vec<RirRecord>,
    pub statistics: Statistics,
}

impl RunReport {
    fn new() -> RunReport {
        RunReport::default()
    }

    /// Overall success: no error-severity findings. Warnings never fail
    /// a run.
    pub fn passed(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }
}

/// Drives line consumption, entry validation and the overlap post-pass.
pub struct Engine<'r> {
    config: Config,
    rir: Option<&'r dyn RirLookup>,
}

impl<'r> Engine<'r> {
    pub fn new(config: Config) -> Engine<'r> {
        Engine { config, rir: None }
    }

    /// Attach an RIR resolver, consulted once per entry with a valid
    /// network when `show_rir` is set.
    pub fn with_rir(config: Config, rir: &'r dyn RirLookup) -> Engine<'r> {
        Engine {
            config,
            rir: Some(rir),
        }
    }

    /// Open the source and validate every line it yields.
    ///
    /// A source failure (open, fetch, read, decode) is fatal and aborts
    /// the run; per-line findings never do.
    pub fn validate_source(&self, source: &FeedSource) -> Result<RunReport> {
        let reader = source.open(self.config.insecure_tls)?;
        self.validate_lines(reader.lines())
    }

    /// Validate an ordered sequence of feed lines.
    pub fn validate_lines<I>(&self, lines: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut report = RunReport::new();
        // retained only for the overlap post-pass, then dropped
        let mut networks: Vec<AccumulatedNetwork> = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line?;
            let line_number = index + 1;
            report.counts.total_lines += 1;

            let trimmed = line.trim();
            match parser::classify(trimmed) {
                LineKind::Blank => {}
                LineKind::Comment => report.counts.comment_lines += 1,
                LineKind::Data => {
                    report.counts.data_lines += 1;
                    if self.validate_entry(trimmed, line_number, &mut report, &mut networks) {
                        report.counts.valid_lines += 1;
                    } else {
                        report.counts.invalid_lines += 1;
                    }
                }
            }
        }

        if self.config.overlap_check_enabled && !networks.is_empty() {
            report.issues.extend(overlap::find_overlaps(&networks));
        }

        debug!(
            total = report.counts.total_lines,
            valid = report.counts.valid_lines,
            invalid = report.counts.invalid_lines,
            issues = report.issues.len(),
            "run finished"
        );

        Ok(report)
    }

    /// Validate one data line. Returns whether the entry counts as valid.
    ///
    /// Every field check runs even when an earlier one failed, so a
    /// single bad line can contribute several findings.
    fn validate_entry(
        &self,
        raw: &str,
        line_number: usize,
        report: &mut RunReport,
        networks: &mut Vec<AccumulatedNetwork>,
    ) -> bool {
        let entry = match parser::split_entry(raw) {
            Ok(entry) => entry,
            Err(got) => {
                report.issues.push(Issue::new(
                    IssueKind::MalformedLine,
                    line_number,
                    format!("Expected at least 2 fields (IP range, country code), got {got}"),
                    raw,
                ));
                return false;
            }
        };

        let network = match GeoNetwork::parse(entry.ip_range) {
            Ok(net) => Some(net),
            Err(err) => {
                report.issues.push(Issue::new(
                    IssueKind::InvalidNetwork,
                    line_number,
                    err.to_string(),
                    raw,
                ));
                None
            }
        };

        let country = check_country_code(entry.country_code, line_number, raw, &mut report.issues);
        let region_ok = check_region_code(entry.region_code, line_number, raw, &mut report.issues);
        let city_ok = check_city_name(entry.city_name, line_number, raw, &mut report.issues);

        if country == CountryCheck::Recognized {
            report.statistics.record_country(entry.country_code);
        }

        let mut filtered = false;
        if let Some(net) = network {
            if self.config.family_filter.excludes(net.family()) {
                report.issues.push(Issue::new(
                    IssueKind::FamilyFiltered,
                    line_number,
                    format!("{}: {}", self.config.family_filter.skip_note(), entry.ip_range),
                    raw,
                ));
                filtered = true;
            } else {
                report.statistics.record_network(&net);
                networks.push(AccumulatedNetwork {
                    net,
                    line_number,
                    raw_text: raw.to_string(),
                });
            }

            if self.config.show_rir {
                if let Some(rir) = self.rir {
                    let outcome = rir.lookup(net.base_address()).map_err(|err| {
                        let mut message = err.to_string();
                        if let Some(cause) = std::error::Error::source(&err) {
                            message.push_str(&format!(": {cause}"));
                        }
                        message
                    });
                    report.rir_records.push(RirRecord {
                        line_number,
                        entry: format!(
                            "{},{},{},{}",
                            entry.ip_range, entry.country_code, entry.region_code, entry.city_name
                        ),
                        outcome,
                    });
                }
            }
        }

        if filtered {
            return false;
        }

        network.is_some() && country == CountryCheck::Recognized && region_ok && city_ok
    }
}
