//! Command line arguments and parameters management/parsing.
//!
//! ```sh
//! wikidict 0.1.0
//!
//! USAGE:
//!     wikidict [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!         --atomic     write to <output>.part and rename on success
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! OPTIONS:
//!         --compression <compression>        auto, none or gzip [default: auto]
//!     -f, --fields <fields>...               fields to keep (comma separated) [default: word,related,...]
//!         --framing <framing>                auto, lines or array [default: auto]
//!     -l, --lang <lang>                      language code to keep [default: en]
//!         --missing <missing>                null or omit [default: null]
//!         --on-malformed <on-malformed>      abort or skip [default: abort]
//!     -o, --output <output>                  destination, - for stdout [default: wikidict.json]
//!         --progress-every <progress-every>  records between progress messages, 0 to disable [default: 500000]
//!         --timeout <timeout>                request timeout in seconds
//!     -u, --url <url>                        source url or path [default: https://kaikki.org/...]
//! ```
use structopt::StructOpt;

use crate::decompress::Compression;
use crate::download::Source;
use crate::filtering::Missing;
use crate::io::reader::Framing;
use crate::io::writer::Destination;
use crate::pipelines::OnMalformed;

#[derive(Debug, StructOpt)]
/// Extracts the entries of one language from a wiktextract dump.
#[structopt(name = "wikidict")]
pub struct Wikidict {
    #[structopt(
        short = "u",
        long = "url",
        help = "source url or path",
        default_value = "https://kaikki.org/dictionary/raw-wiktextract-data.jsonl"
    )]
    pub url: Source,
    #[structopt(
        short = "o",
        long = "output",
        help = "destination, - for stdout",
        default_value = "wikidict.json"
    )]
    pub output: Destination,
    #[structopt(
        short = "l",
        long = "lang",
        help = "language code to keep",
        default_value = "en"
    )]
    pub lang: String,
    #[structopt(
        short = "f",
        long = "fields",
        use_delimiter = true,
        help = "fields to keep (comma separated). Defaults to word, related, derived, forms, categories, pos, head_templates, senses, etymology_text and etymology_templates"
    )]
    pub fields: Vec<String>,
    #[structopt(long = "missing", help = "null or omit", default_value = "null")]
    pub missing: Missing,
    #[structopt(long = "framing", help = "auto, lines or array", default_value = "auto")]
    pub framing: Framing,
    #[structopt(
        long = "compression",
        help = "auto, none or gzip",
        default_value = "auto"
    )]
    pub compression: Compression,
    #[structopt(
        long = "on-malformed",
        help = "abort or skip",
        default_value = "abort"
    )]
    pub on_malformed: OnMalformed,
    #[structopt(long = "atomic", help = "write to <output>.part and rename on success")]
    pub atomic: bool,
    #[structopt(long = "timeout", help = "request timeout in seconds")]
    pub timeout: Option<u64>,
    #[structopt(
        long = "progress-every",
        help = "records between progress messages, 0 to disable",
        default_value = "500000"
    )]
    pub progress_every: u64,
}
