/*! Line-delimited JSON writer for projected entries.

Entries are written compactly, one per line, through a buffered handle.

In atomic mode entries go to a `.part` file next to the destination,
which is renamed onto the destination by [EntryWriter::finish] and removed by [EntryWriter::abort].
Otherwise the destination is truncated on creation and whatever was written before a failure stays there.
!*/
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("empty output path".to_string()),
            "-" => Ok(Destination::Stdout),
            path => Ok(Destination::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// `<dst>.part`, in the same directory so that the final rename stays on one filesystem.
fn part_path(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dst.with_file_name(name)
}

pub struct EntryWriter {
    handle: BufWriter<Box<dyn Write>>,
    dst: Destination,
    part: Option<PathBuf>,
    nb_entries: u64,
}

impl EntryWriter {
    /// Create (or truncate) the output.
    pub fn create(dst: &Destination, atomic: bool) -> Result<Self, Error> {
        let part = match (dst, atomic) {
            (Destination::Stdout, true) => {
                return Err(Error::Custom(
                    "atomic writing is not possible on stdout".to_string(),
                ))
            }
            (Destination::File(path), true) => Some(part_path(path)),
            _ => None,
        };

        let handle: Box<dyn Write> = match (dst, &part) {
            (Destination::Stdout, _) => Box::new(std::io::stdout()),
            (Destination::File(path), None) => Box::new(File::create(path).map_err(Error::Write)?),
            (Destination::File(_), Some(part)) => {
                debug!("writing to {:?} until completion", part);
                Box::new(File::create(part).map_err(Error::Write)?)
            }
        };

        Ok(Self {
            handle: BufWriter::new(handle),
            dst: dst.clone(),
            part,
            nb_entries: 0,
        })
    }

    /// Write a single entry, followed by a newline.
    pub fn write_single(&mut self, entry: &Map<String, Value>) -> Result<(), Error> {
        serde_json::to_writer(&mut self.handle, entry).map_err(|e| Error::Write(e.into()))?;
        self.handle.write_all(b"\n").map_err(Error::Write)?;
        self.nb_entries += 1;
        Ok(())
    }

    pub fn nb_entries(&self) -> u64 {
        self.nb_entries
    }

    /// Flush everything and, in atomic mode, move the output in place.
    pub fn finish(mut self) -> Result<u64, Error> {
        self.handle.flush().map_err(Error::Write)?;
        if let (Some(part), Destination::File(dst)) = (&self.part, &self.dst) {
            debug!("renaming {:?} to {:?}", part, dst);
            std::fs::rename(part, dst).map_err(Error::Write)?;
        }
        Ok(self.nb_entries)
    }

    /// Give up on the output after a failure.
    ///
    /// Already written entries are flushed to the destination,
    /// except in atomic mode where the temporary file is removed.
    pub fn abort(self) {
        let EntryWriter {
            mut handle,
            dst,
            part,
            ..
        } = self;
        match part {
            Some(part) => {
                drop(handle);
                if let Err(e) = std::fs::remove_file(&part) {
                    warn!("could not remove {:?}: {}", part, e);
                }
            }
            None => {
                if let Err(e) = handle.flush() {
                    warn!("could not flush {}: {}", dst, e);
                }
            }
        }
    }
}
