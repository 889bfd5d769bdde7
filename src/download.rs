//! Source opening.
//!
//! A [Source] is either a remote dump, fetched with a single streaming GET,
//! or a local file. Both are handed to the rest of the pipeline as a plain [Read].
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info};
use url::Url;

use crate::error::{Error, TransferError};

/// Full raw wiktextract dump, one entry per line.
pub const DEFAULT_URL: &str = "https://kaikki.org/dictionary/raw-wiktextract-data.jsonl";

const USER_AGENT: &str = concat!("wikidict/", env!("CARGO_PKG_VERSION"));

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;

    /// `http(s)://` urls are fetched, `file://` urls and anything that is not an url
    /// are treated as local paths. Other schemes are rejected, unless the whole string
    /// names an existing file (`en:dump.jsonl`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Url::parse(s) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(Source::Http(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Source::File)
                .map_err(|_| format!("invalid file url: {}", s)),
            // windows drive letters parse as a scheme
            Ok(url) if url.scheme().len() > 1 && !Path::new(s).exists() => {
                Err(format!("unsupported scheme: {}", url.scheme()))
            }
            _ => Ok(Source::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// holds the http client that will make the request.
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    /// Build a client. `timeout` bounds the whole transfer, `None` disables it
    /// (the blocking client otherwise defaults to 30 seconds, far too short for a full dump).
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Open `src` for reading.
    ///
    /// For remote sources the response status is checked here,
    /// so that nothing downstream is created when the server refuses the request.
    pub fn open(&self, src: &Source) -> Result<Box<dyn Read + Send>, Error> {
        match src {
            Source::Http(url) => {
                info!("fetching {}", url);
                let response = self.client.get(url.clone()).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(TransferError::Status {
                        url: url.to_string(),
                        status,
                    }
                    .into());
                }
                debug!(
                    "{} answered {}, content length {:?}",
                    url,
                    status,
                    response.content_length()
                );
                Ok(Box::new(response))
            }
            Source::File(path) => {
                info!("reading {:?}", path);
                let file = File::open(path).map_err(TransferError::Read)?;
                Ok(Box::new(file))
            }
        }
    }
}
