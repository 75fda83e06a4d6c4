//! Aggregated statistics over accumulated feed prefixes.
//!
//! Counts are partitioned three ways: combined, IPv4 only, IPv6 only.
//! Address totals are exact big integers; an IPv6 feed can cover far more
//! addresses than a `u64` (or even `u128`) can hold, and floating point
//! would drift.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use rustc_hash::FxHashSet;

use crate::network::{Family, GeoNetwork};

/// Prefix counters for one address family (or the combined view).
#[derive(Debug, Clone, Default)]
pub struct FamilyStats {
    /// prefix length -> number of prefixes seen at that length
    pub prefix_lengths: BTreeMap<u8, u64>,
    pub total_prefixes: u64,
    pub total_addresses: BigUint,
}

impl FamilyStats {
    fn record(&mut self, net: &GeoNetwork) {
        *self.prefix_lengths.entry(net.prefix()).or_insert(0) += 1;
        self.total_prefixes += 1;
        self.total_addresses += net.num_addresses();
    }
}

/// All statistics for one validation run.
///
/// Lifetime is a single run: the engine constructs this fresh per call,
/// so filtered and unfiltered runs never share state.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub combined: FamilyStats,
    pub v4: FamilyStats,
    pub v6: FamilyStats,
    /// country code -> number of prefixes, recognized codes only
    pub country_counts: BTreeMap<String, u64>,
    pub distinct_countries: FxHashSet<String>,
}

impl Statistics {
    pub fn new() -> Statistics {
        Statistics::default()
    }

    /// Record one syntactically valid, unfiltered network.
    pub fn record_network(&mut self, net: &GeoNetwork) {
        self.combined.record(net);
        match net.family() {
            Family::V4 => self.v4.record(net),
            Family::V6 => self.v6.record(net),
        }
    }

    /// Record one recognized country code.
    ///
    /// Unknown codes never reach here; they are excluded from country
    /// statistics by the country-code check.
    pub fn record_country(&mut self, code: &str) {
        *self.country_counts.entry(code.to_string()).or_insert(0) += 1;
        self.distinct_countries.insert(code.to_string());
    }

    /// Per-family view, used by the renderer.
    pub fn family(&self, family: Family) -> &FamilyStats {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }
}
