//! JSON array reader.
//!
//! Elements are handed one at a time to a callback from inside a [serde] sequence visitor,
//! so the array is never materialized.
use std::fmt;
use std::io::Read;

use serde::de::{self, DeserializeSeed, SeqAccess, Visitor};
use serde_json::Value;

use crate::error::{DecodeError, Error, TransferError};

struct Elements<'a, F> {
    f: &'a mut F,
    index: &'a mut usize,
    failure: &'a mut Option<Error>,
}

impl<'de, 'a, F> DeserializeSeed<'de> for Elements<'a, F>
where
    F: FnMut(usize, Value) -> Result<(), Error>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'a, F> Visitor<'de> for Elements<'a, F>
where
    F: FnMut(usize, Value) -> Result<(), Error>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of dictionary entries")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let Elements { f, index, failure } = self;
        while let Some(value) = seq.next_element::<Value>()? {
            *index += 1;
            if let Err(e) = f(*index, value) {
                // the real error is kept aside, serde only needs to stop
                *failure = Some(e);
                return Err(de::Error::custom("stopped by record handler"));
            }
        }
        Ok(())
    }
}

/// Feed each element of the top-level array read from `reader` to `f`,
/// along with its 1-based index.
///
/// Syntax errors cannot be recovered from and stop the whole read.
/// Errors returned by `f` are passed through untouched.
pub fn for_each_element<R, F>(reader: R, mut f: F) -> Result<usize, Error>
where
    R: Read,
    F: FnMut(usize, Value) -> Result<(), Error>,
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    let mut index = 0;
    let mut failure = None;

    let res = Elements {
        f: &mut f,
        index: &mut index,
        failure: &mut failure,
    }
    .deserialize(&mut de)
    .and_then(|_| de.end());

    if let Some(e) = failure {
        return Err(e);
    }

    match res {
        Ok(()) => Ok(index),
        Err(e) if e.is_io() => Err(TransferError::Read(e.into()).into()),
        Err(source) => Err(DecodeError::Syntax {
            line: index + 1,
            source,
        }
        .into()),
    }
}
