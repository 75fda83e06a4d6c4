/// Error types for the geofeedcheck library.
///
/// These are the fatal failures: a feed source that cannot be opened,
/// fetched or decoded, a CIDR string that is not a network, or a failed
/// RDAP round trip. Per-line validation findings are not errors; they are
/// collected as [`crate::validate::Issue`] values on the run report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CIDR string could not be parsed as an address/prefix pair.
    #[error("invalid IP range {range}: {source}")]
    UnparsableNetwork {
        range: String,
        #[source]
        source: ipnetwork::IpNetworkError,
    },

    /// The address has host bits set below the prefix boundary.
    #[error("invalid network address: {range}")]
    NonCanonicalNetwork { range: String },

    /// The feed source could not be opened or read.
    #[error("cannot read feed from {source_name}")]
    Source {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// An HTTP(S) feed fetch failed.
    #[error("cannot fetch feed from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An RDAP lookup round trip failed.
    #[error("RDAP lookup failed for {ip}")]
    RirLookup {
        ip: String,
        #[source]
        source: reqwest::Error,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
