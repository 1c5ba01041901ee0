use std::collections::BTreeMap;
use std::io::BufRead;
use crate::common::report::Partial;
use crate::tagfile::TagFileError;
use crate::utils::text::trim_line_ending;

/// Reads `Key: value` fields, folding indented continuation lines back
/// into the preceding value with a single space.
pub(crate) fn parse_fields<R: BufRead>(mut reader: R) -> Partial<BTreeMap<String, String>, TagFileError> {
    let mut report = Partial::new(BTreeMap::new());
    let mut current: Option<(String, String)> = None;
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                report.push_error(TagFileError::Read(e));
                break;
            }
        }
        line_number += 1;

        let raw = trim_line_ending(&buf);
        let line = match std::str::from_utf8(raw) {
            Ok(l) => l.to_string(),
            Err(_) => {
                let lossy = String::from_utf8_lossy(raw).into_owned();
                tracing::warn!(line_number, "tag line is not valid UTF-8");
                report.push_error(TagFileError::Parse { line_number, line: lossy });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            match current.as_mut() {
                Some((_, value)) => {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line.trim());
                }
                None => report.push_error(TagFileError::Parse { line_number, line }),
            }
            continue;
        }

        let field = line
            .split_once(':')
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()));
        match field {
            Some((key, value)) if !key.is_empty() => {
                if let Some((k, v)) = current.take() {
                    insert_field(&mut report.value, k, v);
                }
                current = Some((key, value));
            }
            _ => {
                tracing::warn!(line_number, line = line.as_str(), "malformed tag line");
                report.push_error(TagFileError::Parse { line_number, line });
            }
        }
    }

    if let Some((k, v)) = current.take() {
        insert_field(&mut report.value, k, v);
    }
    report
}

fn insert_field(fields: &mut BTreeMap<String, String>, key: String, value: String) {
    if fields.contains_key(&key) {
        tracing::warn!(key = key.as_str(), "repeated tag key, keeping the last value");
    }
    fields.insert(key, value);
}
