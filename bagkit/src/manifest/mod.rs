use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::common::constants::{MANIFEST_PREFIX, TAG_MANIFEST_PREFIX, TXT_EXTENSION};
use crate::common::hash::{HashError, HashFactory, HashRegistry};
use crate::common::report::Partial;
use crate::utils::path::{clean_path, file_name_str, parent_dir, parent_exists};

mod algorithm;
mod line;
mod verify;

pub use algorithm::algorithm_from_file_name;
pub use line::{MalformedLine, ManifestLine, parse_manifest_data, write_entries};

/// Defines errors that can occur while building, reading, verifying or
/// writing a manifest.
//
// // 定义在创建、读取、校验或写入清单时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The directory that should contain the manifest does not exist.
    //
    // // 清单所在的目录不存在。
    #[error("Unable to create manifest. Path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// The manifest path has no file name component.
    //
    // // 清单路径没有文件名部分。
    #[error("Manifest path has no file name: {0}")]
    NoFileName(PathBuf),

    /// The hash registry rejected the algorithm name.
    //
    // // 哈希注册表不认识该算法名称。
    #[error(transparent)]
    Algorithm(#[from] HashError),

    /// The algorithm could not be read from the file name.
    //
    // // 无法从文件名中解析出算法。
    #[error("Unable to determine algorithm from filename: {0}")]
    UndeterminedAlgorithm(String),

    /// One line of the manifest was malformed.
    //
    // // 清单中的某一行格式错误。
    #[error("Line {line_number}: {source}")]
    Parse {
        line_number: usize,
        #[source]
        source: MalformedLine,
    },

    /// A file's computed checksum differs from the recorded one.
    //
    // // 文件的实际校验和与记录的不一致。
    #[error("File checksum {expected} is not valid for {path}: {actual}")]
    Fixity {
        expected: String,
        path: String,
        actual: String,
    },

    /// Reading the manifest stream failed midway.
    //
    // // 读取清单数据流时失败。
    #[error("Failed to read manifest data: {0}")]
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

impl ManifestError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Whether a manifest covers payload files or tag files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `manifest-<algo>.txt`
    Payload,
    /// `tagmanifest-<algo>.txt`
    Tag,
}

impl ManifestKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ManifestKind::Payload => MANIFEST_PREFIX,
            ManifestKind::Tag => TAG_MANIFEST_PREFIX,
        }
    }

    /// `manifest-sha256.txt`, `tagmanifest-md5.txt`, ...
    pub fn file_name(self, algorithm: &str) -> String {
        format!("{}{}{}", self.prefix(), algorithm.to_lowercase(), TXT_EXTENSION)
    }
}

/// A checksum manifest: relative file paths mapped to their digests.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    algorithm: HashFactory,
}

impl Manifest {
    /// A new, empty `manifest-<algo>.txt` inside `dir`.
    ///
    /// `dir` must already exist.
    pub fn for_directory(
        dir: impl AsRef<Path>,
        algorithm: &str,
        registry: &dyn HashRegistry,
    ) -> Result<Self, ManifestError> {
        let path = dir.as_ref().join(ManifestKind::Payload.file_name(algorithm));
        Self::for_path(path, algorithm, registry)
    }

    /// A new, empty `tagmanifest-<algo>.txt` inside `dir`.
    pub fn tag_manifest_for_directory(
        dir: impl AsRef<Path>,
        algorithm: &str,
        registry: &dyn HashRegistry,
    ) -> Result<Self, ManifestError> {
        let path = dir.as_ref().join(ManifestKind::Tag.file_name(algorithm));
        Self::for_path(path, algorithm, registry)
    }

    /// A new, empty manifest stored exactly at `path`.
    pub fn for_path(
        path: impl Into<PathBuf>,
        algorithm: &str,
        registry: &dyn HashRegistry,
    ) -> Result<Self, ManifestError> {
        let path = path.into();
        if !parent_exists(&path) {
            return Err(ManifestError::PathNotFound(path));
        }
        let algorithm = registry.lookup(algorithm)?;

        Ok(Self {
            path,
            entries: BTreeMap::new(),
            algorithm,
        })
    }

    /// Opens a manifest file, infers its algorithm from the file name and
    /// parses every line.
    ///
    /// Malformed lines do not stop the load: the manifest is still built
    /// from the lines that parsed, and each failure is listed in the
    /// returned errors. The value is `None` only when no manifest could be
    /// built at all (unreadable file, unknown algorithm).
    pub fn load(path: impl AsRef<Path>, registry: &dyn HashRegistry) -> Partial<Option<Self>, ManifestError> {
        let path = path.as_ref();
        let mut report = Partial::new(None);

        let algorithm = match algorithm_from_file_name(path) {
            Ok(a) => a,
            Err(e) => {
                report.push_error(e);
                return report;
            }
        };

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                report.push_error(ManifestError::io(path, e));
                return report;
            }
        };
        let (entries, errors) = parse_manifest_data(BufReader::new(file)).into_parts();
        report.errors.extend(errors);

        match Self::for_path(path, &algorithm, registry) {
            Ok(mut manifest) => {
                manifest.entries = entries;
                tracing::debug!(
                    path = %path.display(),
                    entries = manifest.entries.len(),
                    issues = report.errors.len(),
                    "loaded manifest"
                );
                report.value = Some(manifest);
            }
            Err(e) => report.push_error(e),
        }
        report
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The manifest path, lexically cleaned.
    pub fn name(&self) -> PathBuf {
        clean_path(&self.path)
    }

    /// Moves the manifest to a new location. Nothing is written until the
    /// next [`persist`](Self::persist).
    pub fn rename_to(&mut self, path: impl Into<PathBuf>) -> Result<(), ManifestError> {
        let path = path.into();
        if !parent_exists(&path) {
            return Err(ManifestError::PathNotFound(path));
        }
        self.path = path;
        Ok(())
    }

    pub fn kind(&self) -> ManifestKind {
        match file_name_str(&self.path) {
            Some(name) if name.starts_with(TAG_MANIFEST_PREFIX) => ManifestKind::Tag,
            _ => ManifestKind::Payload,
        }
    }

    pub fn algorithm(&self) -> &HashFactory {
        &self.algorithm
    }

    /// The directory that entry paths are relative to.
    pub fn base_dir(&self) -> &Path {
        parent_dir(&self.path)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.entries
    }

    /// Records `checksum` for `path`, returning the checksum it replaced.
    pub fn insert(&mut self, path: impl Into<String>, checksum: impl Into<String>) -> Option<String> {
        self.entries.insert(path.into(), checksum.into())
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the manifest text, one `<checksum> <path>` line per entry,
    /// sorted by path.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_entries(writer, &self.entries)
    }

    /// The manifest text as [`write_to`](Self::write_to) would produce it.
    pub fn to_text(&self) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Writes the manifest to its path, creating parent directories and
    /// truncating any existing file.
    pub fn persist(&self) -> Result<(), ManifestError> {
        if self.path.file_name().is_none() {
            return Err(ManifestError::NoFileName(self.path.clone()));
        }
        let dir = parent_dir(&self.path);
        fs::create_dir_all(dir).map_err(|e| ManifestError::io(dir, e))?;

        let file = File::create(&self.path).map_err(|e| ManifestError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| ManifestError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "wrote manifest");
        Ok(())
    }
}
