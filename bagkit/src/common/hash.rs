use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use crate::common::constants::HASH_BUFFER_LEN;

/// Errors raised while resolving a hash algorithm.
//
// // 解析哈希算法时可能发生的错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    /// The registry has no hash function under this name.
    //
    // // 注册表中没有该名称的哈希函数。
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// An incremental hash computation that ends in a lowercase hex digest.
pub trait StreamHasher {
    fn update(&mut self, data: &[u8]);

    fn finalize_hex(self: Box<Self>) -> String;
}

/// Adapts any RustCrypto [`Digest`] to [`StreamHasher`].
struct DigestHasher<D>(D);

impl<D: Digest> StreamHasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize_hex(self: Box<Self>) -> String {
        hex::encode(self.0.finalize())
    }
}

/// A named constructor of fresh [`StreamHasher`]s.
///
/// Manifests bind one of these at construction time; every fixity check
/// asks it for a new hasher. Cloning only bumps a reference count.
#[derive(Clone)]
pub struct HashFactory {
    name: String,
    build: Arc<dyn Fn() -> Box<dyn StreamHasher> + Send + Sync>,
}

impl HashFactory {
    /// Wraps an arbitrary hasher constructor. Mostly useful for tests that
    /// want a deterministic fake algorithm.
    pub fn new<F>(name: &str, build: F) -> Self
    where
        F: Fn() -> Box<dyn StreamHasher> + Send + Sync + 'static,
    {
        Self { name: name.to_lowercase(), build: Arc::new(build) }
    }

    /// Builds a factory for a RustCrypto digest type.
    pub fn of<D: Digest + 'static>(name: &str) -> Self {
        Self::new(name, || -> Box<dyn StreamHasher> { Box::new(DigestHasher(D::new())) })
    }

    /// The lowercase algorithm name, e.g. `sha256`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hasher(&self) -> Box<dyn StreamHasher> {
        (self.build)()
    }

    /// Hashes an in-memory buffer in one go.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize_hex()
    }
}

impl fmt::Debug for HashFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFactory").field("name", &self.name).finish()
    }
}

/// Maps algorithm names to hash functions.
///
/// Passed explicitly into manifest construction so callers (and tests) can
/// decide which algorithms exist.
pub trait HashRegistry: Send + Sync + fmt::Debug {
    fn lookup(&self, name: &str) -> Result<HashFactory, HashError>;
}

/// The algorithms commonly found in bags: md5, sha1 and the sha2 family.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRegistry;

impl StandardRegistry {
    pub const ALGORITHMS: &'static [&'static str] = &["md5", "sha1", "sha224", "sha256", "sha384", "sha512"];
}

impl HashRegistry for StandardRegistry {
    fn lookup(&self, name: &str) -> Result<HashFactory, HashError> {
        let lower = name.to_lowercase();
        let factory = match lower.as_str() {
            "md5" => HashFactory::of::<Md5>(&lower),
            "sha1" => HashFactory::of::<Sha1>(&lower),
            "sha224" => HashFactory::of::<Sha224>(&lower),
            "sha256" => HashFactory::of::<Sha256>(&lower),
            "sha384" => HashFactory::of::<Sha384>(&lower),
            "sha512" => HashFactory::of::<Sha512>(&lower),
            _ => return Err(HashError::UnknownAlgorithm(name.to_string())),
        };
        Ok(factory)
    }
}

/// Streams the file at `path` through a fresh hasher from `factory` and
/// returns the lowercase hex digest.
pub fn file_checksum(path: &Path, factory: &HashFactory) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = factory.hasher();
    let mut buffer = [0u8; HASH_BUFFER_LEN];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize_hex())
}
