use std::path::PathBuf;
use crate::common::hash::file_checksum;
use crate::manifest::{Manifest, ManifestError};

impl Manifest {
    /// Resolves an entry path against the manifest's directory.
    pub fn resolve(&self, entry: &str) -> PathBuf {
        self.base_dir().join(entry)
    }

    /// Re-hashes one file and compares it to `expected`.
    pub fn verify_entry(&self, entry: &str, expected: &str) -> Result<(), ManifestError> {
        let path = self.resolve(entry);
        let actual = file_checksum(&path, &self.algorithm).map_err(|e| ManifestError::io(&path, e))?;

        if actual == expected {
            Ok(())
        } else {
            Err(ManifestError::Fixity {
                expected: expected.to_string(),
                path: entry.to_string(),
                actual,
            })
        }
    }

    /// Runs a fixity check over every entry.
    ///
    /// Every file is checked even after a failure, so the result is a full
    /// report: one error per mismatching or unreadable file, in path order.
    /// An empty list means every file matched.
    pub fn verify_all(&self) -> Vec<ManifestError> {
        let mut failures = Vec::new();

        for (entry, expected) in &self.entries {
            if let Err(e) = self.verify_entry(entry, expected) {
                tracing::warn!(manifest = %self.path.display(), entry = entry.as_str(), error = %e, "fixity check failed");
                failures.push(e);
            }
        }

        tracing::debug!(
            manifest = %self.path.display(),
            checked = self.entries.len(),
            failed = failures.len(),
            "verified manifest"
        );
        failures
    }

    /// Computes and stores the checksum of every entry, replacing whatever
    /// was recorded. Entries whose file cannot be read keep their old value.
    pub fn update_checksums(&mut self) -> Vec<ManifestError> {
        let mut failures = Vec::new();
        let base = self.base_dir().to_path_buf();

        for (entry, checksum) in self.entries.iter_mut() {
            let path = base.join(entry);
            match file_checksum(&path, &self.algorithm) {
                Ok(actual) => *checksum = actual,
                Err(e) => failures.push(ManifestError::io(&path, e)),
            }
        }
        failures
    }
}
