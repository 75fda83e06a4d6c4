//! The geofeedcheck library for validating RFC 8805 geo IP feeds.
//!
//! This library parses self-published geofeed files (one CIDR prefix plus
//! country/region/city fields per line), checks every field, detects
//! overlapping ranges, and aggregates per-family prefix statistics.
//!
//! # Examples
//!
//! Validating an in-memory feed:
//!
//! ```rust
//! use geofeedcheck::{Config, Engine};
//!
//! let feed = "# example.net geofeed\n192.0.2.0/24,US,US-NY,New York\n";
//! let lines = feed.lines().map(|line| Ok(line.to_string()));
//!
//! let report = Engine::new(Config::default())
//!     .validate_lines(lines)
//!     .unwrap();
//! assert!(report.passed());
//! assert_eq!(report.counts.valid_lines, 1);
//! ```

pub mod countries;
pub mod engine;
pub mod error;
pub mod network;
pub mod overlap;
pub mod parser;
pub mod report;
pub mod rir;
pub mod source;
pub mod stats;
pub mod validate;

/// Re-export the types most callers need.
pub use crate::engine::{Config, Engine, FamilyFilter, RunReport};
pub use crate::error::Error;
pub use crate::network::{Family, GeoNetwork};
pub use crate::source::FeedSource;
