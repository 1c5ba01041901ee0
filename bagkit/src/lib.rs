//! Manifests and tag files for BagIt-style archival packages.
//!
//! A [`Manifest`] pairs every payload file of a bag with a checksum and can
//! re-verify those files on disk. A [`TagFile`] holds `Key: value` metadata
//! written with the format's 79-column line wrapping.

pub mod common;
pub mod manifest;
pub mod tagfile;
pub mod utils;

pub use common::hash::{HashError, HashFactory, HashRegistry, StandardRegistry, StreamHasher, file_checksum};
pub use common::report::Partial;
pub use manifest::{Manifest, ManifestError, ManifestKind};
pub use tagfile::{FieldFormat, TagFile, TagFileError, format_field};
