//! Regional Internet Registry lookups over RDAP.
//!
//! One blocking GET per lookup against the RDAP bootstrap redirector,
//! which forwards to the registry serving the address. Lookups are never
//! cached and never retried; a failure is reported on the entry's record
//! and does not affect validation.

use std::net::IpAddr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Bootstrap redirector that 30x-forwards to the owning registry.
const RDAP_ENDPOINT: &str = "https://rdap.org/ip";

/// Placeholder for registration fields a registry did not publish.
const NOT_AVAILABLE: &str = "N/A";

/// Registration metadata for one address, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RirData {
    pub asn: String,
    pub registry: String,
    pub country: String,
    pub network_cidr: String,
    pub network_handle: String,
    pub network_name: String,
    pub network_parent_handle: String,
    pub network_type: String,
}

/// Anything that can resolve registration data for an address.
///
/// The engine consumes this through a trait so tests can substitute a
/// canned resolver instead of the network.
pub trait RirLookup {
    fn lookup(&self, ip: IpAddr) -> Result<RirData>;
}

/// RDAP client backed by a blocking `reqwest` client.
pub struct RirClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl RirClient {
    pub fn new() -> Result<RirClient> {
        Self::with_endpoint(RDAP_ENDPOINT)
    }

    /// Use an alternate RDAP base URL (`{endpoint}/{ip}` is queried).
    pub fn with_endpoint(endpoint: &str) -> Result<RirClient> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|source| Error::RirLookup {
                ip: "<client setup>".to_string(),
                source,
            })?;
        Ok(RirClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl RirLookup for RirClient {
    fn lookup(&self, ip: IpAddr) -> Result<RirData> {
        let url = format!("{}/{}", self.endpoint, ip);
        debug!(%url, "RDAP lookup");

        let response: RdapIpNetwork = self
            .client
            .get(&url)
            .header("Accept", "application/rdap+json")
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|source| Error::RirLookup {
                ip: ip.to_string(),
                source,
            })?;

        Ok(response.flatten())
    }
}

/// The subset of an RDAP IP-network object this tool reports.
#[derive(Debug, Deserialize)]
struct RdapIpNetwork {
    handle: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    net_type: Option<String>,
    #[serde(rename = "parentHandle")]
    parent_handle: Option<String>,
    country: Option<String>,
    #[serde(rename = "cidr0_cidrs", default)]
    cidrs: Vec<Cidr0>,
    /// ARIN publishes originating ASNs through this extension; other
    /// registries usually do not carry origin data on IP objects.
    #[serde(rename = "arin_originas0_originautnums", default)]
    origin_asns: Vec<u32>,
    port43: Option<String>,
}

/// One entry of the RDAP `cidr0` extension.
#[derive(Debug, Deserialize)]
struct Cidr0 {
    v4prefix: Option<String>,
    v6prefix: Option<String>,
    length: Option<u8>,
}

impl RdapIpNetwork {
    fn flatten(self) -> RirData {
        let asn = if self.origin_asns.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.origin_asns
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };

        let network_cidr = self
            .cidrs
            .iter()
            .filter_map(Cidr0::render)
            .collect::<Vec<_>>()
            .join(", ");
        let network_cidr = if network_cidr.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            network_cidr
        };

        let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        RirData {
            asn,
            registry: registry_from_port43(self.port43.as_deref()),
            country: or_na(self.country),
            network_cidr,
            network_handle: or_na(self.handle),
            network_name: or_na(self.name),
            network_parent_handle: or_na(self.parent_handle),
            network_type: or_na(self.net_type),
        }
    }
}

impl Cidr0 {
    fn render(&self) -> Option<String> {
        let prefix = self.v4prefix.as_deref().or(self.v6prefix.as_deref())?;
        let length = self.length?;
        Some(format!("{prefix}/{length}"))
    }
}

/// Map a whois server name to the registry identifier it belongs to.
fn registry_from_port43(port43: Option<&str>) -> String {
    let Some(host) = port43 else {
        return NOT_AVAILABLE.to_string();
    };
    for (needle, registry) in [
        ("arin", "arin"),
        ("ripe", "ripencc"),
        ("apnic", "apnic"),
        ("lacnic", "lacnic"),
        ("afrinic", "afrinic"),
    ] {
        if host.contains(needle) {
            return registry.to_string();
        }
    }
    host.to_string()
}
