//! Console rendering of run results, statistics and RIR records.
//!
//! Everything here is presentation: the engine's numbers are exact big
//! integers, and only this module decides between thousands-grouped
//! decimal and scientific notation (totals above 1e12, which IPv6 feeds
//! reach immediately).

use std::io::{self, Write};

use num_bigint::BigUint;
use once_cell::sync::Lazy;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use crate::engine::{RirRecord, RunReport};
use crate::network::Family;
use crate::stats::{FamilyStats, Statistics};

static SCI_THRESHOLD: Lazy<BigUint> = Lazy::new(|| BigUint::from(10u32).pow(12));

/// Print the validation results block: counters, warnings, errors and the
/// final verdict.
pub fn print_results(out: &mut StandardStream, report: &RunReport) -> io::Result<()> {
    writeln!(out, "\n=== RFC 8805 Validation Results ===")?;
    writeln!(out, "Total lines: {}", report.counts.total_lines)?;
    writeln!(out, "Comment lines: {}", report.counts.comment_lines)?;
    writeln!(out, "Data lines: {}", report.counts.data_lines)?;
    writeln!(out, "Valid lines: {}", report.counts.valid_lines)?;
    writeln!(out, "Invalid lines: {}", report.counts.invalid_lines)?;

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        writeln!(out, "\n=== Warnings ({}) ===", warnings.len())?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        for warning in &warnings {
            writeln!(out, "  WARNING: {warning}")?;
        }
        out.reset()?;
    }

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        writeln!(out, "\n=== Errors ({}) ===", errors.len())?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        for error in &errors {
            writeln!(out, "  ERROR: {error}")?;
            writeln!(out, "    Full line: {}", error.raw_text)?;
        }
        out.reset()?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        writeln!(out, "\nValidation FAILED with {} errors", errors.len())?;
        out.reset()?;
    } else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        writeln!(
            out,
            "\nValidation PASSED - All {} data lines are valid",
            report.counts.valid_lines
        )?;
        out.reset()?;
    }

    Ok(())
}

/// Print the statistics block: prefix totals, address totals, country and
/// prefix-length breakdowns.
pub fn print_stats(out: &mut StandardStream, stats: &Statistics) -> io::Result<()> {
    writeln!(out, "\n=== Statistics ===")?;
    writeln!(
        out,
        "Total IP prefixes processed: {}",
        stats.combined.total_prefixes
    )?;

    if stats.v4.total_prefixes > 0 {
        writeln!(out, "  IPv4 prefixes: {}", stats.v4.total_prefixes)?;
    }
    if stats.v6.total_prefixes > 0 {
        writeln!(out, "  IPv6 prefixes: {}", stats.v6.total_prefixes)?;
    }

    writeln!(
        out,
        "Total IP addresses: {}",
        format_addresses(&stats.combined.total_addresses)
    )?;
    if stats.v4.total_prefixes > 0 {
        writeln!(
            out,
            "  IPv4 addresses: {}",
            grouped(&stats.v4.total_addresses)
        )?;
    }
    if stats.v6.total_prefixes > 0 {
        writeln!(
            out,
            "  IPv6 addresses: {}",
            format_addresses(&stats.v6.total_addresses)
        )?;
    }

    if !stats.country_counts.is_empty() {
        writeln!(out, "Distinct countries: {}", stats.distinct_countries.len())?;
        writeln!(out, "Country breakdown:")?;
        for (country, count) in &stats.country_counts {
            writeln!(out, "  {country}: {count} prefixes")?;
        }
    }

    print_prefix_breakdown(out, Family::V4, stats.family(Family::V4))?;
    print_prefix_breakdown(out, Family::V6, stats.family(Family::V6))?;

    if stats.combined.prefix_lengths.is_empty() && stats.country_counts.is_empty() {
        writeln!(out, "No valid prefixes found.")?;
    }

    Ok(())
}

fn print_prefix_breakdown(
    out: &mut StandardStream,
    family: Family,
    stats: &FamilyStats,
) -> io::Result<()> {
    if stats.prefix_lengths.is_empty() {
        return Ok(());
    }

    writeln!(out, "{family} Prefix length breakdown:")?;
    for (&plen, &count) in &stats.prefix_lengths {
        let per_prefix = BigUint::from(1u8) << usize::from(family.bits() - plen);
        let total = &per_prefix * count;
        writeln!(
            out,
            "  /{plen}: {count} entries ({} addresses each, {} total)",
            format_addresses(&per_prefix),
            format_addresses(&total)
        )?;
    }
    Ok(())
}

/// Print RDAP registration records, one block per looked-up entry.
pub fn print_rir_records(out: &mut StandardStream, records: &[RirRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", record.entry)?;
        match &record.outcome {
            Ok(data) => {
                writeln!(out, "    asn: {}", data.asn)?;
                writeln!(out, "    rir: {}", data.registry)?;
                writeln!(out, "    country: {}", data.country)?;
                writeln!(out, "    network->cidr: {}", data.network_cidr)?;
                writeln!(out, "    network->handle: {}", data.network_handle)?;
                writeln!(out, "    network->name: {}", data.network_name)?;
                writeln!(
                    out,
                    "    network->parent_handle: {}",
                    data.network_parent_handle
                )?;
                writeln!(out, "    network->type: {}", data.network_type)?;
            }
            Err(message) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(out, "    lookup error: {message}")?;
                out.reset()?;
            }
        }
    }
    Ok(())
}

/// Grouped decimal below the threshold, scientific above it.
fn format_addresses(n: &BigUint) -> String {
    if *n > *SCI_THRESHOLD {
        scientific(n)
    } else {
        grouped(n)
    }
}

/// Thousands-grouped decimal: 4294967296 -> "4,294,967,296".
fn grouped(n: &BigUint) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Scientific notation with two fractional digits: 2^96 -> "7.92e+28".
fn scientific(n: &BigUint) -> String {
    let digits = n.to_string();
    let exponent = digits.len() - 1;

    // round the 3-digit mantissa using the fourth digit
    let mut mantissa: u32 = digits
        .chars()
        .take(3)
        .map(|c| c.to_digit(10).unwrap())
        .fold(0, |acc, d| acc * 10 + d);
    let next = digits.chars().nth(3).and_then(|c| c.to_digit(10));
    if matches!(next, Some(d) if d >= 5) {
        mantissa += 1;
    }

    // rounding can carry into a fourth digit (999.5 -> 1.00e+{exp+1})
    let (mantissa, exponent) = if mantissa >= 1000 {
        (100, exponent + 1)
    } else {
        (mantissa, exponent)
    };

    format!(
        "{}.{:02}e+{}",
        mantissa / 100,
        mantissa % 100,
        exponent
    )
}
