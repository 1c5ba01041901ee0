use std::path::Path;
use crate::common::constants::MANIFEST_NAME_REGEX;
use crate::manifest::ManifestError;
use crate::utils::path::file_name_str;

/// Extracts the algorithm token from a manifest file name.
///
/// Only the last path component is considered, and it must look like
/// `<prefix>-<algorithm>.txt`:
/// - "tagmanifest-sha256.txt" -> "sha256"
/// - "bag/manifest-md5.txt" -> "md5"
/// - "notamanifest" -> error
pub fn algorithm_from_file_name(path: &Path) -> Result<String, ManifestError> {
    let undetermined = || ManifestError::UndeterminedAlgorithm(path.display().to_string());

    let name = file_name_str(path).ok_or_else(undetermined)?;
    let caps = MANIFEST_NAME_REGEX.captures(name).ok_or_else(undetermined)?;
    match caps.get(2) {
        Some(algo) if !algo.as_str().is_empty() => Ok(algo.as_str().to_string()),
        _ => Err(undetermined()),
    }
}
