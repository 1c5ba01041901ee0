// --- Tag file layout ---
/// The maximum width of a physical line in a tag file.
pub const MAX_LINE_WIDTH: usize = 79;

/// Number of spaces that start every continuation line of a wrapped field.
pub const CONTINUATION_INDENT: usize = 3;

/// Separator between a tag key and its value.
pub const FIELD_SEPARATOR: &str = ": ";

// --- File names ---
/// File extension shared by manifests and tag files.
pub const TXT_EXTENSION: &str = ".txt";

/// Prefix of a payload manifest file name (`manifest-<algo>.txt`).
pub const MANIFEST_PREFIX: &str = "manifest-";

/// Prefix of a tag manifest file name (`tagmanifest-<algo>.txt`).
pub const TAG_MANIFEST_PREFIX: &str = "tagmanifest-";

// --- Hashing ---
/// Read buffer size used when streaming a file through a hash function.
pub const HASH_BUFFER_LEN: usize = 8192;

// --- Patterns ---
macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($regex).unwrap());
    };
}

// A checksum token, a run of whitespace, then the rest of the line as the path.
regex!(MANIFEST_LINE_REGEX, r"^(\S+)\s+(\S.*)$");
// `<prefix>-<algorithm>.txt`; the prefix runs up to the last hyphen.
regex!(MANIFEST_NAME_REGEX, r"^(.*-)(.*)(\.txt)$");
