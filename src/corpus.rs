//! Corpus loading from CSV, JSON and JSON-Lines dumps, optionally gzip-compressed.

use crate::record::Record;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read corpus")]
    Read(#[from] std::io::Error),
    #[error("malformed corpus: {0}")]
    Format(String),
    #[error("unsupported corpus format: {0} (expected .csv, .json, .jsonl or .ndjson, optionally .gz)")]
    UnsupportedFormat(PathBuf),
}

enum Format {
    Csv,
    Json,
    JsonLines,
}

fn detect_format(path: &Path) -> Result<(Format, bool), CorpusError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (inner, gzipped) = match name.strip_suffix(".gz") {
        Some(inner) => (inner, true),
        None => (name.as_str(), false),
    };

    let format = if inner.ends_with(".csv") {
        Format::Csv
    } else if inner.ends_with(".json") {
        Format::Json
    } else if inner.ends_with(".jsonl") || inner.ends_with(".ndjson") {
        Format::JsonLines
    } else {
        return Err(CorpusError::UnsupportedFormat(path.to_path_buf()));
    };

    Ok((format, gzipped))
}

/// Load every well-formed record from a corpus file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, CorpusError> {
    let path = path.as_ref();
    let (format, gzipped) = detect_format(path)?;

    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let reader = BufReader::new(reader);

    let records = match format {
        Format::Csv => parse_records_csv(reader),
        Format::Json => parse_records_json(reader),
        Format::JsonLines => parse_records_jsonl(reader),
    }
    .map_err(|err| match err {
        CorpusError::Read(source) => CorpusError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    tracing::info!(path = %path.display(), records = records.len(), "corpus loaded");
    Ok(records)
}

/// Parse a CSV dump with a header row (`id,username,text,likecount,replycount,retweetcount`)
///
/// Rows that do not deserialize into a record are skipped.
pub fn parse_records_csv<R: Read>(reader: R) -> Result<Vec<Record>, CorpusError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<Record>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(err) => match err.into_kind() {
                csv::ErrorKind::Io(source) => return Err(CorpusError::Read(source)),
                kind => tracing::warn!(row = row + 1, error = ?kind, "skipping malformed record"),
            },
        }
    }
    Ok(records)
}

/// Parse a top-level JSON array of records
///
/// Elements that are not valid records are skipped.
pub fn parse_records_json<R: Read>(reader: R) -> Result<Vec<Record>, CorpusError> {
    let value: serde_json::Value = serde_json::from_reader(reader).map_err(|err| {
        if err.is_io() {
            CorpusError::Read(err.into())
        } else {
            CorpusError::Format(err.to_string())
        }
    })?;

    let serde_json::Value::Array(items) = value else {
        return Err(CorpusError::Format("expected a JSON array of records".to_string()));
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(position, error = %err, "skipping malformed record"),
        }
    }
    Ok(records)
}

/// Parse one record per line; blank lines and malformed lines are skipped
///
/// Lines are read as raw bytes, so a line with invalid UTF-8 only loses
/// that record.
pub fn parse_records_jsonl<R: BufRead>(mut reader: R) -> Result<Vec<Record>, CorpusError> {
    let mut records = Vec::new();
    let mut line = Vec::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_no += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(line = line_no, error = %err, "skipping malformed record"),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const LINES: &str = r#"{"id":"1","username":"icc","text":"Toss won by India","likecount":10,"replycount":1,"retweetcount":2}

{"id":"2","text":
{"id":"3","username":"pcb","text":null}
{"username":"no id","text":"dropped"}
"#;

    const CSV: &str = "id,username,text,likecount,replycount,retweetcount
1,icc,\"India win, by six wickets\",10,1,2
2,pcb,Rain stops play,not-a-number,0,0
3,bcci,,4,0,1
4,fan,Super over,7,2,3
";

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn test_jsonl_skips_malformed_lines() -> Result<()> {
        let records = parse_records_jsonl(LINES.as_bytes())?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(records[0].like_count, 10);
        assert_eq!(records[1].text(), "");

        Ok(())
    }

    #[test]
    fn test_jsonl_invalid_utf8_line_is_skipped() -> Result<()> {
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"id\":\"1\",\"text\":\"six\"}\n");
        input.extend_from_slice(b"{\"id\":\"2\",\"text\":\"bad \xff byte\"}\n");
        input.extend_from_slice(b"{\"id\":\"3\",\"text\":\"four\"}");

        let records = parse_records_jsonl(input.as_slice())?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        Ok(())
    }

    #[test]
    fn test_jsonl_read_failure_is_fatal() {
        let err = parse_records_jsonl(BufReader::new(FailingReader)).unwrap_err();
        assert!(matches!(err, CorpusError::Read(_)));
        assert_eq!(err.to_string(), "failed to read corpus");
    }

    #[test]
    fn test_csv_skips_malformed_rows() -> Result<()> {
        let records = parse_records_csv(CSV.as_bytes())?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
        assert_eq!(records[0].username, "icc");
        assert_eq!(records[0].text(), "India win, by six wickets");
        assert_eq!((records[0].like_count, records[0].reply_count, records[0].retweet_count), (10, 1, 2));
        assert_eq!(records[1].text(), "");

        Ok(())
    }

    #[test]
    fn test_csv_invalid_utf8_row_is_skipped() -> Result<()> {
        let mut input = Vec::new();
        input.extend_from_slice(b"id,username,text,likecount,replycount,retweetcount\n");
        input.extend_from_slice(b"1,a,six,0,0,0\n");
        input.extend_from_slice(b"2,b,bad \xff byte,0,0,0\n");
        input.extend_from_slice(b"3,c,four,0,0,0\n");

        let records = parse_records_csv(input.as_slice())?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        Ok(())
    }

    #[test]
    fn test_json_array() -> Result<()> {
        let json = r#"[{"id":"a","text":"six"},{"id":5},{"id":"b","text":"four"}]"#;
        let records = parse_records_json(json.as_bytes())?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        Ok(())
    }

    #[test]
    fn test_json_not_an_array() {
        let err = parse_records_json(r#"{"id":"a"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::Format(_)));

        let err = parse_records_json("[oops".as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::Format(_)));
    }

    #[test]
    fn test_load_files() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let plain = dir.path().join("tweets.jsonl");
        std::fs::write(&plain, LINES)?;
        assert_eq!(load_records(&plain)?.len(), 2);

        let gz = dir.path().join("tweets.json.gz");
        let mut encoder = GzEncoder::new(File::create(&gz)?, Compression::default());
        encoder.write_all(br#"[{"id":"x","text":"Rain stops play"}]"#)?;
        encoder.finish()?;
        let records = load_records(&gz)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "Rain stops play");

        Ok(())
    }

    #[test]
    fn test_load_csv_files() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let plain = dir.path().join("Preprocessed-Data.csv");
        std::fs::write(&plain, CSV)?;
        assert_eq!(load_records(&plain)?.len(), 3);

        let gz = dir.path().join("tweets.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz)?, Compression::default());
        encoder.write_all(CSV.as_bytes())?;
        encoder.finish()?;
        let records = load_records(&gz)?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].text(), "Super over");

        Ok(())
    }

    #[test]
    fn test_load_errors() {
        let err = load_records("tweets.xml").unwrap_err();
        assert!(matches!(err, CorpusError::UnsupportedFormat(_)));

        let err = load_records("/nonexistent/tweets.json").unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tweets.json"));
    }
}
