//! Canonical CIDR networks for geofeed entries.
//!
//! A [`GeoNetwork`] can only be constructed through [`GeoNetwork::parse`],
//! which parses the address and prefix literally (host bits are kept, not
//! silently masked) and then rejects any address that is not its network's
//! base address. `192.0.2.0/24` is accepted; `192.0.2.1/24` is not.

use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// IP address family of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Number of address bits for this family.
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// A canonical IP network parsed from a geofeed `ip_range` field.
///
/// Invariant: the stored address equals the network's base address, so the
/// host bits below the prefix boundary are all zero. The value is never
/// mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoNetwork {
    net: IpNetwork,
}

impl GeoNetwork {
    /// Parse a CIDR string into a canonical network.
    ///
    /// A bare address (no `/len`) parses as a full-length prefix. Fails
    /// with [`Error::UnparsableNetwork`] when the string is not an
    /// address/prefix pair, and with [`Error::NonCanonicalNetwork`] when
    /// the supplied address has host bits set (e.g. `192.0.2.1/24`).
    pub fn parse(range: &str) -> Result<GeoNetwork> {
        let net: IpNetwork = range.parse().map_err(|source| Error::UnparsableNetwork {
            range: range.to_string(),
            source,
        })?;

        if net.ip() != net.network() {
            return Err(Error::NonCanonicalNetwork {
                range: range.to_string(),
            });
        }

        Ok(GeoNetwork { net })
    }

    /// Address family of this network.
    #[inline]
    pub fn family(&self) -> Family {
        match self.net {
            IpNetwork::V4(_) => Family::V4,
            IpNetwork::V6(_) => Family::V6,
        }
    }

    /// Prefix length in bits.
    #[inline]
    pub fn prefix(&self) -> u8 {
        self.net.prefix()
    }

    /// The network's base (first) address.
    #[inline]
    pub fn base_address(&self) -> IpAddr {
        self.net.network()
    }

    /// Exact number of addresses covered: `2^(bits - prefix)`.
    ///
    /// Exceeds `u128` for `::/0`, hence the arbitrary-precision result.
    pub fn num_addresses(&self) -> BigUint {
        let host_bits = self.family().bits() - self.prefix();
        BigUint::from(1u8) << usize::from(host_bits)
    }

    /// First address of the range, widened to `u128`.
    ///
    /// Only comparable between networks of the same family.
    #[inline]
    pub fn first(&self) -> u128 {
        match self.net {
            IpNetwork::V4(n) => u128::from(u32::from(n.network())),
            IpNetwork::V6(n) => u128::from(n.network()),
        }
    }

    /// Last address of the range, widened to `u128`.
    pub fn last(&self) -> u128 {
        match self.net {
            IpNetwork::V4(n) => {
                // u64 keeps the shift defined for a /0
                let host = (u64::from(u32::MAX) >> n.prefix()) as u32;
                u128::from(u32::from(n.network()) | host)
            }
            IpNetwork::V6(n) => {
                let host = if n.prefix() == 128 {
                    0
                } else {
                    u128::MAX >> n.prefix()
                };
                u128::from(n.network()) | host
            }
        }
    }

    /// Whether two same-family networks' address ranges intersect, either
    /// by containment or partial overlap. Always false across families.
    pub fn overlaps(&self, other: &GeoNetwork) -> bool {
        self.family() == other.family()
            && self.first() <= other.last()
            && other.first() <= self.last()
    }
}

/// Natural network order: base address ascending, then prefix length
/// ascending, so a broader network sorts before a more specific one that
/// shares its base address. IPv4 sorts before IPv6.
impl Ord for GeoNetwork {
    fn cmp(&self, other: &GeoNetwork) -> Ordering {
        let key = |n: &GeoNetwork| (n.family().bits(), n.first(), n.prefix());
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for GeoNetwork {
    fn partial_cmp(&self, other: &GeoNetwork) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GeoNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.net.network(), self.net.prefix())
    }
}
