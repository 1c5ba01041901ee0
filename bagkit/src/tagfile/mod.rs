use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::common::constants::TXT_EXTENSION;
use crate::common::report::Partial;
use crate::utils::path::{clean_path, file_name_str, parent_dir, parent_exists};

mod format;
mod parse;

pub use format::{FieldFormat, format_field, format_field_with};

/// Defines errors that can occur while creating, reading or writing a tag file.
//
// // 定义在创建、读取或写入标签文件时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum TagFileError {
    /// The directory that should contain the tag file does not exist.
    //
    // // 标签文件所在的目录不存在。
    #[error("Tag file directory does not exist: {0}")]
    ParentNotFound(PathBuf),

    /// The file name is not `<something>.txt`.
    //
    // // 文件名不符合 `<名称>.txt` 的格式。
    #[error("Tagfiles must end in .txt and contain at least 1 letter. Provided: {0}")]
    InvalidName(String),

    /// A line is neither `Key: value` nor an indented continuation.
    //
    // // 某一行既不是 `Key: value` 也不是缩进的续行。
    #[error("Unable to parse tag line {line_number}: {line}")]
    Parse { line_number: usize, line: String },

    /// Reading the tag file stream failed midway.
    //
    // // 读取标签文件数据流时失败。
    #[error("Failed to read tag data: {0}")]
    Read(#[source] io::Error),

    /// A filesystem operation on `path` failed.
    //
    // // 对 `path` 的文件系统操作失败。
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TagFileError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// A `Key: value` metadata file such as `bagit.txt` or `bag-info.txt`.
#[derive(Debug, Clone)]
pub struct TagFile {
    path: PathBuf,
    fields: BTreeMap<String, String>,
    format: FieldFormat,
}

impl TagFile {
    /// Creates an empty tag file for `path`.
    ///
    /// The tag file is always returned. A missing parent directory or a
    /// file name that does not end in `.txt` is reported alongside it;
    /// callers that want a hard failure can use [`TagFile::create`].
    pub fn new(path: impl AsRef<Path>) -> Partial<Self, TagFileError> {
        let path = path.as_ref();
        let mut report = Partial::new(Self {
            path: clean_path(path),
            fields: BTreeMap::new(),
            format: FieldFormat::default(),
        });

        if !parent_exists(path) {
            report.push_error(TagFileError::ParentNotFound(parent_dir(path).to_path_buf()));
        }
        if !has_tag_file_name(path) {
            let name = file_name_str(path).unwrap_or_default().to_string();
            report.push_error(TagFileError::InvalidName(name));
        }
        report
    }

    /// Like [`TagFile::new`] but fails on the first reported problem.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TagFileError> {
        Self::new(path).into_result()
    }

    /// Reads an existing tag file.
    ///
    /// Malformed lines are skipped and reported; the value is `None` only
    /// when the file itself could not be opened.
    pub fn load(path: impl AsRef<Path>) -> Partial<Option<Self>, TagFileError> {
        let path = path.as_ref();
        let (mut tag_file, mut errors) = Self::new(path).into_parts();

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                errors.push(TagFileError::io(path, e));
                return Partial::with_errors(None, errors);
            }
        };
        let (fields, parse_errors) = parse::parse_fields(BufReader::new(file)).into_parts();
        errors.extend(parse_errors);
        tag_file.fields = fields;

        tracing::debug!(path = %path.display(), fields = tag_file.fields.len(), issues = errors.len(), "loaded tag file");
        Partial::with_errors(Some(tag_file), errors)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.fields
    }

    /// Sets a field, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    pub fn format(&self) -> &FieldFormat {
        &self.format
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    /// Writes every field as a wrapped `Key: value` block followed by a
    /// newline.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_string().as_bytes())
    }

    /// Writes the tag file to its path, creating parent directories and
    /// truncating any existing file.
    pub fn persist(&self) -> Result<(), TagFileError> {
        let dir = parent_dir(&self.path);
        fs::create_dir_all(dir).map_err(|e| TagFileError::io(dir, e))?;

        let file = File::create(&self.path).map_err(|e| TagFileError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| TagFileError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), fields = self.fields.len(), "wrote tag file");
        Ok(())
    }
}

impl fmt::Display for TagFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.fields {
            writeln!(f, "{}", format_field_with(key, value, &self.format))?;
        }
        Ok(())
    }
}

/// `<at least one character>.txt`
fn has_tag_file_name(path: &Path) -> bool {
    match file_name_str(path) {
        Some(name) => name.len() > TXT_EXTENSION.len() && name.ends_with(TXT_EXTENSION),
        None => false,
    }
}
