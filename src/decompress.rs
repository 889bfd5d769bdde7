//! Transparent gzip decoding.
//!
//! Dumps are published both plain and gzipped. In [Compression::Auto] mode
//! the first two bytes of the stream are checked against the gzip magic number.
use std::io::{BufRead, BufReader, Cursor, Read};
use std::str::FromStr;

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::{Error, TransferError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Auto,
    None,
    Gzip,
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Compression::Auto),
            "none" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            other => Err(format!("unknown compression: {}", other)),
        }
    }
}

/// Wrap `src` into a buffered reader yielding decompressed bytes.
pub fn decompress<R>(mut src: R, compression: Compression) -> Result<Box<dyn BufRead + Send>, Error>
where
    R: Read + Send + 'static,
{
    // the peeked bytes are chained back in front of the stream
    let mut head = [0u8; 2];
    let mut filled = 0;
    while filled < head.len() {
        match src.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::Read(e).into()),
        }
    }

    let is_gzip = match compression {
        Compression::Auto => filled == head.len() && head == GZIP_MAGIC,
        Compression::Gzip => true,
        Compression::None => false,
    };

    let stream = Cursor::new(head[..filled].to_vec()).chain(src);
    if is_gzip {
        debug!("decoding gzip stream");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(stream))))
    } else {
        Ok(Box::new(BufReader::new(stream)))
    }
}
