use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use crate::common::constants::MANIFEST_LINE_REGEX;
use crate::common::report::Partial;
use crate::manifest::ManifestError;
use crate::utils::text::trim_line_ending;

/// A line that does not have the `<checksum> <path>` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unable to parse data from line: {0}")]
pub struct MalformedLine(pub String);

/// One `<checksum> <path>` record of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestLine<'a> {
    pub checksum: &'a str,
    pub path: &'a str,
}

impl<'a> ManifestLine<'a> {
    /// Splits a single line (without its terminator) into checksum and path.
    ///
    /// The separating whitespace is consumed entirely; anything after it,
    /// including inner and trailing spaces, belongs to the path.
    pub fn parse(line: &'a str) -> Result<Self, MalformedLine> {
        let caps = MANIFEST_LINE_REGEX
            .captures(line)
            .ok_or_else(|| MalformedLine(line.to_string()))?;
        match (caps.get(1), caps.get(2)) {
            (Some(checksum), Some(path)) => Ok(Self { checksum: checksum.as_str(), path: path.as_str() }),
            _ => Err(MalformedLine(line.to_string())),
        }
    }

    pub fn new(checksum: &'a str, path: &'a str) -> Self {
        Self { checksum, path }
    }

    /// `<checksum> <path>\n`
    pub fn render(&self) -> String {
        format!("{} {}\n", self.checksum, self.path)
    }

    /// Checks that the rendered record reads back as the same checksum and
    /// path. Rejects empty parts, whitespace inside the checksum, a path that
    /// starts with whitespace, and line breaks anywhere.
    pub fn validate(&self) -> Result<(), MalformedLine> {
        let text = format!("{} {}", self.checksum, self.path);
        match ManifestLine::parse(&text) {
            Ok(parsed) if parsed == *self && !self.path.contains(['\r', '\n']) => Ok(()),
            _ => Err(MalformedLine(text)),
        }
    }
}

/// Reads every line of a manifest into a `path -> checksum` map.
///
/// Malformed lines are reported and skipped; later lines are still read.
/// Blank lines are ignored. A repeated path keeps the last checksum seen.
pub fn parse_manifest_data<R: BufRead>(mut reader: R) -> Partial<BTreeMap<String, String>, ManifestError> {
    let mut report = Partial::new(BTreeMap::new());
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                report.push_error(ManifestError::Read(e));
                break;
            }
        }
        line_number += 1;

        let raw = trim_line_ending(&buf);
        let line = match std::str::from_utf8(raw) {
            Ok(l) => l,
            Err(_) => {
                let lossy = String::from_utf8_lossy(raw).into_owned();
                tracing::warn!(line_number, "manifest line is not valid UTF-8");
                report.push_error(ManifestError::Parse { line_number, source: MalformedLine(lossy) });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match ManifestLine::parse(line) {
            Ok(record) => {
                if let Some(previous) = report.value.insert(record.path.to_string(), record.checksum.to_string()) {
                    tracing::warn!(line_number, path = record.path, previous = %previous, "duplicate manifest entry");
                }
            }
            Err(source) => {
                tracing::warn!(line_number, line, "malformed manifest line");
                report.push_error(ManifestError::Parse { line_number, source });
            }
        }
    }

    report
}

/// Writes the entries one record per line. `BTreeMap` iteration keeps the
/// output sorted by path.
///
/// An entry that would not parse back unchanged fails the write with
/// `InvalidInput` before any of it is written.
pub fn write_entries<W: Write>(writer: &mut W, entries: &BTreeMap<String, String>) -> io::Result<()> {
    for (path, checksum) in entries {
        ManifestLine::new(checksum, path)
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    }
    for (path, checksum) in entries {
        writer.write_all(ManifestLine::new(checksum, path).render().as_bytes())?;
    }
    Ok(())
}
