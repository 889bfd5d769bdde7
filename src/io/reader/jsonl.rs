/*! Line-delimited JSON reader.
 * !*/
use std::io::BufRead;

use serde_json::Value;

use crate::error::{DecodeError, Error, TransferError};

/// Iterates over the records of a JSON Lines stream, keeping a single line in memory.
///
/// Blank lines are ignored. A malformed line yields an [Error::Decode] and iteration can go on;
/// a read failure yields an [Error::Transfer] and ends the iteration.
#[derive(Debug)]
pub struct JsonLines<R>
where
    R: BufRead,
{
    inner: R,
    buf: Vec<u8>,
    line: usize,
    done: bool,
}

impl<R> JsonLines<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Start numbering lines after `offset` already consumed lines.
    pub fn with_offset(inner: R, offset: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line: offset,
            done: false,
        }
    }
}

impl<R> Iterator for JsonLines<R>
where
    R: BufRead,
{
    /// line number and record
    type Item = Result<(usize, Value), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    if self.buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    let record: Self::Item = serde_json::from_slice::<Value>(&self.buf)
                        .map(|value| (self.line, value))
                        .map_err(|source| {
                            DecodeError::Syntax {
                                line: self.line,
                                source,
                            }
                            .into()
                        });
                    return Some(record);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(TransferError::Read(e).into()));
                }
            }
        }
        None
    }
}
