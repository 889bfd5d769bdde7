/*! Record reading.

Dumps come either as JSON Lines (one entry per line, the usual kaikki format) or as a single JSON array.
[Framing::Auto] looks at the first non-whitespace byte of the stream to decide.

Both framings are exposed through [for_each_record], which hands records one by one to a callback.
!*/
mod array;
mod jsonl;

use std::io::BufRead;
use std::str::FromStr;

use log::debug;
use serde_json::Value;

use crate::error::{DecodeError, Error, TransferError};

pub use array::for_each_element;
pub use jsonl::JsonLines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Auto,
    Lines,
    Array,
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Framing::Auto),
            "lines" | "jsonl" => Ok(Framing::Lines),
            "array" | "json" => Ok(Framing::Array),
            other => Err(format!("unknown framing: {}", other)),
        }
    }
}

/// Skip leading whitespace and guess the framing from the first meaningful byte.
///
/// Returns the framing along with the number of newlines that were skipped,
/// so that line numbers stay accurate.
pub fn detect<R>(reader: &mut R) -> Result<(Framing, usize), Error>
where
    R: BufRead,
{
    let mut newlines = 0;
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::Read(e).into()),
        };

        // empty stream, nothing to frame
        if buf.is_empty() {
            return Ok((Framing::Lines, newlines));
        }

        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let framing = if buf[pos] == b'[' {
                    Framing::Array
                } else {
                    Framing::Lines
                };
                newlines += buf[..pos].iter().filter(|b| **b == b'\n').count();
                reader.consume(pos);
                debug!("detected {:?} framing", framing);
                return Ok((framing, newlines));
            }
            None => {
                let len = buf.len();
                newlines += buf.iter().filter(|b| **b == b'\n').count();
                reader.consume(len);
            }
        }
    }
}

/// Read every record of `reader`, calling `f` with the record position and either the record
/// or the [DecodeError] that prevented reading it.
///
/// `f` decides whether a per-record [DecodeError] is fatal by returning it or not.
/// Errors that cannot be recovered from (read failures, syntax errors inside an array)
/// end the read without reaching `f`.
///
/// Returns the framing that was used.
pub fn for_each_record<R, F>(mut reader: R, framing: Framing, mut f: F) -> Result<Framing, Error>
where
    R: BufRead,
    F: FnMut(usize, Result<Value, DecodeError>) -> Result<(), Error>,
{
    let (framing, offset) = match framing {
        Framing::Auto => detect(&mut reader)?,
        forced => (forced, 0),
    };

    match framing {
        Framing::Array => {
            for_each_element(reader, |index, value| f(index, Ok(value)))?;
        }
        _ => {
            for record in JsonLines::with_offset(reader, offset) {
                match record {
                    Ok((line, value)) => f(line, Ok(value))?,
                    Err(Error::Decode(e)) => f(e.line(), Err(e))?,
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(framing)
}
