//! Feed line sources: local file, stdin, or an HTTP(S) fetch.
//!
//! A source produces a lazy, ordered, finite sequence of UTF-8 text lines
//! or fails with a fatal error. Any failure here aborts the whole run; it
//! is never a per-line finding.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use camino::Utf8PathBuf;
use tracing::debug;

use crate::error::{Error, Result};

/// Where the feed comes from.
#[derive(Default, Clone, Debug)]
pub enum FeedSource {
    /// A local file path.
    File(Utf8PathBuf),
    /// An `http://` or `https://` URL, fetched with a blocking client.
    Url(String),
    /// Standard input.
    #[default]
    Stdin,
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path),
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl FeedSource {
    /// Resolve a CLI argument: `-` means stdin, an `http(s)://` prefix
    /// means a URL fetch, anything else is a file path.
    pub fn from_arg(arg: &str) -> FeedSource {
        if arg == "-" {
            FeedSource::Stdin
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            FeedSource::Url(arg.to_string())
        } else {
            FeedSource::File(Utf8PathBuf::from(arg))
        }
    }

    /// Open the source as a buffered line reader.
    ///
    /// `insecure_tls` disables certificate verification for `https`
    /// fetches, mirroring the `--insecure` flag. It has no effect on the
    /// other source kinds.
    pub fn open(&self, insecure_tls: bool) -> Result<FeedReader> {
        match self {
            FeedSource::File(path) => {
                debug!(path = %path, "opening feed file");
                let file = File::open(path).map_err(|source| Error::Source {
                    source_name: path.to_string(),
                    source,
                })?;
                Ok(FeedReader::new(Box::new(BufReader::new(file))))
            }
            FeedSource::Url(url) => {
                debug!(url = %url, insecure_tls, "fetching feed over http");
                let client = reqwest::blocking::Client::builder()
                    .danger_accept_invalid_certs(insecure_tls)
                    .build()
                    .map_err(|source| Error::Fetch {
                        url: url.clone(),
                        source,
                    })?;
                let response = client
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|source| Error::Fetch {
                        url: url.clone(),
                        source,
                    })?;
                Ok(FeedReader::new(Box::new(BufReader::new(response))))
            }
            FeedSource::Stdin => Ok(FeedReader::new(Box::new(BufReader::new(io::stdin())))),
        }
    }
}

/// Buffered reader over any feed source.
pub struct FeedReader {
    inner: Box<dyn BufRead>,
}

impl std::fmt::Debug for FeedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedReader").finish_non_exhaustive()
    }
}

impl FeedReader {
    fn new(inner: Box<dyn BufRead>) -> FeedReader {
        FeedReader { inner }
    }

    /// Iterate the source's lines in order.
    ///
    /// Each item is the decoded line without its terminator; a read or
    /// UTF-8 decode failure surfaces as the iterator's `Err` item.
    pub fn lines(self) -> impl Iterator<Item = io::Result<String>> {
        self.inner.lines()
    }
}
