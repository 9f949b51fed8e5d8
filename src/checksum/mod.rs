//! Checksum descriptors and the digest-computing download writer.
//!
//! Servers describe each file's integrity as `<algorithm>:<hex-digest>`,
//! e.g. `sha256:9f86d0...`. The algorithm token is case-insensitive and must
//! be one of md5, sha256, sha384 or sha512.

mod writer;

pub use writer::{ChecksumVerdict, ChecksumWriter};

use std::fmt;
use std::str::FromStr;

use sha2::Digest;
use thiserror::Error;

/// Errors from parsing a checksum descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// Descriptor is not of the form `<algorithm>:<hex-digest>`.
    #[error("invalid checksum descriptor {descriptor:?}: expected <algorithm>:<hex-digest>")]
    Format {
        /// The rejected descriptor.
        descriptor: String,
    },

    /// Algorithm token is not one of the supported digests.
    #[error("{algorithm} checksum not supported")]
    UnsupportedAlgorithm {
        /// The rejected algorithm token.
        algorithm: String,
    },

    /// Digest half is not hex of the expected length.
    #[error("invalid {algorithm} digest {digest:?}: expected {expected_len} hex characters")]
    InvalidDigest {
        /// Parsed algorithm.
        algorithm: HashAlgorithm,
        /// The rejected digest text.
        digest: String,
        /// Required number of hex characters.
        expected_len: usize,
    },
}

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Lowercase algorithm token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    pub(crate) fn hasher(self) -> Hasher {
        match self {
            Self::Md5 => Hasher::Md5(md5::Context::new()),
            Self::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            Self::Sha384 => Hasher::Sha384(sha2::Sha384::new()),
            Self::Sha512 => Hasher::Sha512(sha2::Sha512::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ChecksumError::UnsupportedAlgorithm {
                algorithm: s.to_string(),
            }),
        }
    }
}

/// Running digest for one of the supported algorithms.
pub(crate) enum Hasher {
    Md5(md5::Context),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

impl Hasher {
    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(ctx) => ctx.consume(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    /// Consumes the hasher and returns the lowercase hex digest.
    pub(crate) fn finalize_hex(self) -> String {
        match self {
            Self::Md5(ctx) => hex::encode(ctx.compute().0),
            Self::Sha256(h) => hex::encode(h.finalize()),
            Self::Sha384(h) => hex::encode(h.finalize()),
            Self::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// A parsed `<algorithm>:<hex-digest>` checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumDescriptor {
    algorithm: HashAlgorithm,
    digest: String,
}

impl ChecksumDescriptor {
    /// The digest algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The expected digest, lowercase hex.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for ChecksumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

impl FromStr for ChecksumDescriptor {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || ChecksumError::Format {
            descriptor: s.to_string(),
        };
        let (algorithm, digest) = s.split_once(':').ok_or_else(format_error)?;
        if algorithm.is_empty() || digest.contains(':') {
            return Err(format_error());
        }

        let algorithm: HashAlgorithm = algorithm.parse()?;
        let expected_len = algorithm.digest_len() * 2;
        if digest.len() != expected_len || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ChecksumError::InvalidDigest {
                algorithm,
                digest: digest.to_string(),
                expected_len,
            });
        }

        Ok(Self {
            algorithm,
            digest: digest.to_ascii_lowercase(),
        })
    }
}
