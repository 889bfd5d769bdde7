//! Language slice extraction pipeline.
//!
//! Takes a wiktextract dump and keeps the entries of a single language,
//! reduced to a fixed set of fields.
//!
//! # Processing
//! 1. The source is opened (single GET for remote dumps), and its status checked.
//! 1. The byte stream is transparently gunzipped when needed.
//! 1. Records are decoded one at a time, either from JSON Lines or from a JSON array.
//! 1. Entries whose `lang_code` differs from the target language are dropped.
//! 1. Remaining entries are projected and written, one per line, in source order.
//!
//! Nothing is retried. The output is only created once the source answered successfully.
use std::io::BufRead;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;

use crate::cli;
use crate::decompress::{decompress, Compression};
use crate::download::{Downloader, Source};
use crate::error::{DecodeError, Error};
use crate::filtering::{Filter, Lang, Projection, DEFAULT_FIELDS};
use crate::io::reader::{for_each_record, Framing};
use crate::io::writer::{Destination, EntryWriter};
use crate::pipelines::pipeline::Pipeline;

/// Default interval between two progress messages.
pub const PROGRESS_EVERY: u64 = 500_000;

/// What to do with a record that can't be decoded or isn't an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMalformed {
    Abort,
    Skip,
}

impl FromStr for OnMalformed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(OnMalformed::Abort),
            "skip" => Ok(OnMalformed::Skip),
            other => Err(format!("unknown malformed record policy: {}", other)),
        }
    }
}

/// Record counts of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// records seen, malformed ones included
    pub read: u64,
    /// records written
    pub kept: u64,
    /// records of another language
    pub dropped: u64,
    /// malformed records that were skipped
    pub skipped: u64,
    /// framing actually used, once known
    pub framing: Option<Framing>,
}

pub struct Extract {
    src: Source,
    dst: Destination,
    lang: Lang,
    projection: Projection,
    framing: Framing,
    compression: Compression,
    on_malformed: OnMalformed,
    atomic: bool,
    timeout: Option<Duration>,
    progress_every: u64,
}

impl Extract {
    /// English entries, default fields, auto framing and compression, aborting on malformed records.
    pub fn new(src: Source, dst: Destination) -> Self {
        Self {
            src,
            dst,
            lang: Lang::default(),
            projection: Projection::default(),
            framing: Framing::Auto,
            compression: Compression::Auto,
            on_malformed: OnMalformed::Abort,
            atomic: false,
            timeout: None,
            progress_every: PROGRESS_EVERY,
        }
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_on_malformed(mut self, on_malformed: OnMalformed) -> Self {
        self.on_malformed = on_malformed;
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `0` disables progress messages.
    pub fn with_progress_every(mut self, progress_every: u64) -> Self {
        self.progress_every = progress_every;
        self
    }

    /// Filter and project every record of `reader` into `writer`.
    ///
    /// `writer` is left open: finishing or aborting it is up to the caller.
    pub fn process<R>(&self, reader: R, writer: &mut EntryWriter) -> Result<Summary, Error>
    where
        R: BufRead,
    {
        let mut summary = Summary::default();
        let framing = for_each_record(reader, self.framing, |line, record| {
            self.process_record(writer, &mut summary, line, record)
        })?;
        summary.framing = Some(framing);
        Ok(summary)
    }

    fn process_record(
        &self,
        writer: &mut EntryWriter,
        summary: &mut Summary,
        line: usize,
        record: Result<Value, DecodeError>,
    ) -> Result<(), Error> {
        summary.read += 1;
        if self.progress_every > 0 && summary.read % self.progress_every == 0 {
            info!(
                "processed records: {} kept: {} skipped: {}",
                summary.read, summary.kept, summary.skipped
            );
        }

        let entry = match record {
            Ok(Value::Object(entry)) => entry,
            Ok(_) => return self.malformed(summary, DecodeError::NotAnObject { line }),
            Err(e) => return self.malformed(summary, e),
        };

        if self.lang.detect(&entry) {
            writer.write_single(&self.projection.project(entry))?;
            summary.kept += 1;
        } else {
            summary.dropped += 1;
        }
        Ok(())
    }

    fn malformed(&self, summary: &mut Summary, e: DecodeError) -> Result<(), Error> {
        match self.on_malformed {
            OnMalformed::Abort => Err(e.into()),
            OnMalformed::Skip => {
                warn!("skipping {}", e);
                summary.skipped += 1;
                Ok(())
            }
        }
    }
}

impl Pipeline<Summary> for Extract {
    fn run(&self) -> Result<Summary, Error> {
        info!(
            "keeping {} entries from {} into {}",
            self.lang.code(),
            self.src,
            self.dst
        );
        debug!("projected fields: {:?}", self.projection.fields());

        let downloader = Downloader::new(self.timeout)?;
        let src = downloader.open(&self.src)?;
        let reader = decompress(src, self.compression)?;

        let mut writer = EntryWriter::create(&self.dst, self.atomic)?;
        match self.process(reader, &mut writer) {
            Ok(summary) => {
                writer.finish()?;
                info!(
                    "done: read {} kept {} dropped {} skipped {} ({:?})",
                    summary.read, summary.kept, summary.dropped, summary.skipped, summary.framing
                );
                Ok(summary)
            }
            Err(e) => {
                warn!("stopping after {} entries written", writer.nb_entries());
                writer.abort();
                Err(e)
            }
        }
    }
}

impl From<cli::Wikidict> for Extract {
    fn from(opt: cli::Wikidict) -> Self {
        let fields = if opt.fields.is_empty() {
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            opt.fields
        };
        let projection = Projection::new(fields, opt.missing);
        Extract::new(opt.url, opt.output)
            .with_lang(Lang::new(opt.lang))
            .with_projection(projection)
            .with_framing(opt.framing)
            .with_compression(opt.compression)
            .with_on_malformed(opt.on_malformed)
            .with_atomic(opt.atomic)
            .with_timeout(opt.timeout.map(Duration::from_secs))
            .with_progress_every(opt.progress_every)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use crate::error::TransferError;
    use crate::filtering::Missing;

    use super::*;

    const CAT: &str = r#"{"word":"cat","lang_code":"en","pos":"noun","senses":[{"glosses":["a feline"]}]}"#;
    const CHAT: &str = r#"{"word":"chat","lang_code":"fr","pos":"noun"}"#;
    const DOG: &str = r#"{"word":"dog","lang_code":"en","pos":"noun","lang":"English"}"#;
    const CAT_PROJECTED: &str = r#"{"word":"cat","related":null,"derived":null,"forms":null,"categories":null,"pos":"noun","head_templates":null,"senses":[{"glosses":["a feline"]}],"etymology_text":null,"etymology_templates":null}"#;

    fn run_on(extract: &Extract, data: &str) -> (Result<Summary, Error>, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = EntryWriter::create(&Destination::File(path.clone()), false).unwrap();
        let res = extract.process(Cursor::new(data.as_bytes().to_vec()), &mut writer);
        writer.finish().unwrap();
        (res, std::fs::read_to_string(path).unwrap())
    }

    fn extract() -> Extract {
        Extract::new(
            Source::File(PathBuf::from("unused")),
            Destination::File(PathBuf::from("unused")),
        )
    }

    #[test]
    fn english_null_filled() {
        let (res, out) = run_on(&extract(), &format!("{}\n", CAT));
        assert_eq!(out, format!("{}\n", CAT_PROJECTED));
        let summary = res.unwrap();
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.framing, Some(Framing::Lines));
    }

    #[test]
    fn other_language_dropped() {
        let (res, out) = run_on(&extract(), &format!("{}\n", CHAT));
        assert_eq!(out, "");
        let summary = res.unwrap();
        assert_eq!((summary.read, summary.kept, summary.dropped), (1, 0, 1));
    }

    #[test]
    fn order_and_count() {
        let data = [CAT, CHAT, DOG, CHAT].join("\n");
        let (res, out) = run_on(&extract(), &data);
        let words: Vec<String> = out
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["word"].to_string())
            .collect();
        assert_eq!(words, vec!["\"cat\"", "\"dog\""]);
        assert_eq!(res.unwrap().kept, 2);
    }

    #[test]
    fn array_framing() {
        let data = format!("[\n{},\n{},\n{}\n]\n", CAT, CHAT, DOG);
        let (res, out) = run_on(&extract(), &data);
        assert_eq!(out.lines().count(), 2);
        assert_eq!(res.unwrap().framing, Some(Framing::Array));
    }

    #[test]
    fn malformed_aborts_keeping_previous_lines() {
        let data = format!("{}\n{{\"word\": \n{}\n", CAT, DOG);
        let (res, out) = run_on(&extract(), &data);
        match res {
            Err(Error::Decode(e)) => assert_eq!(e.line(), 2),
            other => panic!("expected decode error, got {:?}", other),
        }
        assert_eq!(out, format!("{}\n", CAT_PROJECTED));
    }

    #[test_log::test]
    fn malformed_skipped() {
        let data = format!("{}\n{{\"word\": \n[1,2]\n{}\n", CAT, DOG);
        let ex = extract().with_on_malformed(OnMalformed::Skip);
        let (res, out) = run_on(&ex, &data);
        let summary = res.unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.kept, 2);
        assert_eq!(summary.read, 4);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn lone_surrogate_skipped() {
        let data = format!("{}\n{{\"word\":\"\\ud800x\",\"lang_code\":\"en\"}}\n{}\n", CAT, DOG);
        let (res, _) = run_on(&extract(), &data);
        assert!(matches!(res, Err(Error::Decode(DecodeError::Syntax { line: 2, .. }))));

        let (res, out) = run_on(&extract().with_on_malformed(OnMalformed::Skip), &data);
        assert_eq!(res.unwrap().skipped, 1);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn not_an_object_aborts() {
        let (res, _) = run_on(&extract(), "\"cat\"\n");
        assert!(matches!(
            res,
            Err(Error::Decode(DecodeError::NotAnObject { line: 1 }))
        ));
    }

    #[test]
    fn omit_missing_and_other_lang() {
        let ex = extract()
            .with_lang(Lang::new("fr".to_string()))
            .with_projection(Projection::new(
                vec!["word".to_string(), "pos".to_string(), "forms".to_string()],
                Missing::Omit,
            ));
        let (_, out) = run_on(&ex, &[CAT, CHAT].join("\n"));
        assert_eq!(out, "{\"word\":\"chat\",\"pos\":\"noun\"}\n");
    }

    #[test]
    fn run_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("dump.jsonl");
        let dst = dir.path().join("en.json");
        std::fs::write(&src, [CAT, CHAT, DOG].join("\n")).unwrap();

        let summary = Extract::new(Source::File(src), Destination::File(dst.clone()))
            .with_progress_every(1)
            .run()
            .unwrap();
        assert_eq!(summary.kept, 2);
        assert_eq!(std::fs::read_to_string(dst).unwrap().lines().count(), 2);
    }

    #[test]
    fn missing_source_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("en.json");
        let res = Extract::new(
            Source::File(dir.path().join("missing.jsonl")),
            Destination::File(dst.clone()),
        )
        .run();
        assert!(matches!(res, Err(Error::Transfer(TransferError::Read(_)))));
        assert!(!dst.exists());
    }

    #[test]
    fn atomic_failure_leaves_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("dump.jsonl");
        let dst = dir.path().join("en.json");
        std::fs::write(&src, format!("{}\n{{oops\n", CAT)).unwrap();
        std::fs::write(&dst, "previous\n").unwrap();

        let res = Extract::new(Source::File(src), Destination::File(dst.clone()))
            .with_atomic(true)
            .run();
        assert!(matches!(res, Err(Error::Decode(_))));
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "previous\n");
        assert!(!dir.path().join("en.json.part").exists());
    }

    #[test]
    fn numbers_copied_as_written() {
        let data = concat!(
            r#"{"word":"x","lang_code":"en","senses":[{"n":12345678901234567890123}]}"#,
            "\n",
            r#"{"word":"y","lang_code":"en","senses":[{"n":1e400,"m":-0.10}]}"#,
            "\n"
        );
        let ex = extract().with_projection(Projection::new(
            vec!["word".to_string(), "senses".to_string()],
            Missing::Omit,
        ));
        let (res, out) = run_on(&ex, data);
        assert_eq!(res.unwrap().kept, 2);
        assert_eq!(
            out,
            concat!(
                r#"{"word":"x","senses":[{"n":12345678901234567890123}]}"#,
                "\n",
                r#"{"word":"y","senses":[{"n":1e400,"m":-0.10}]}"#,
                "\n"
            )
        );
    }

    #[test]
    fn connection_reset_keeps_previous_lines() {
        struct Reset;
        impl std::io::Read for Reset {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = EntryWriter::create(&Destination::File(path.clone()), false).unwrap();
        let body = std::io::Read::chain(Cursor::new(format!("{}\n", CAT).into_bytes()), Reset);

        let res = extract().process(std::io::BufReader::new(body), &mut writer);
        assert!(matches!(res, Err(Error::Transfer(TransferError::Read(_)))));
        assert_eq!(res.unwrap_err().exit_code(), 2);

        writer.abort();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            format!("{}\n", CAT_PROJECTED)
        );
    }

    #[test]
    fn truncated_gzip_keeps_previous_lines() {
        use std::io::Write;

        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("dump.jsonl.gz");
        let dst = dir.path().join("en.json");

        let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(format!("{}\n{}\n{}\n", CAT, CHAT, DOG).as_bytes())
            .unwrap();
        let mut gz = enc.finish().unwrap();
        // drop half of the trailer
        gz.truncate(gz.len() - 4);
        std::fs::write(&src, gz).unwrap();

        let res = Extract::new(Source::File(src), Destination::File(dst.clone())).run();
        assert!(matches!(res, Err(Error::Transfer(TransferError::Read(_)))));

        let out = std::fs::read_to_string(dst).unwrap();
        let words: Vec<Value> = out
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["word"].clone())
            .collect();
        assert_eq!(out.lines().next(), Some(CAT_PROJECTED));
        assert_eq!(words, vec![Value::from("cat"), Value::from("dog")]);
    }

    #[test]
    fn parse_on_malformed() {
        assert_eq!("skip".parse::<OnMalformed>().unwrap(), OnMalformed::Skip);
        assert!("retry".parse::<OnMalformed>().is_err());
    }
}
