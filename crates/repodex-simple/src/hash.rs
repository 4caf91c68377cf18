use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A digest algorithm that may appear in the URL fragment of an archive link.
///
/// These are the algorithms every Python installation guarantees through `hashlib`, which is
/// what PEP 503 requires of the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Blake2b,
    Blake2s,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownHashAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "blake2b" => Ok(Self::Blake2b),
            "blake2s" => Ok(Self::Blake2s),
            "sha3_224" => Ok(Self::Sha3_224),
            "sha3_256" => Ok(Self::Sha3_256),
            "sha3_384" => Ok(Self::Sha3_384),
            "sha3_512" => Ok(Self::Sha3_512),
            _ => Err(UnknownHashAlgorithm(s.to_string())),
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HashAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown hash algorithm: `{0}`")]
pub struct UnknownHashAlgorithm(String);

/// A hash of an archive, as carried in the `#<algorithm>=<digest>` fragment of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HashDigest {
    pub algorithm: HashAlgorithm,
    pub digest: String,
}

impl HashDigest {
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<String>) -> Self {
        Self {
            algorithm,
            digest: digest.into(),
        }
    }

    /// Parse a URL fragment of the form `<algorithm>=<digest>`.
    ///
    /// Returns `None` for fragments that don't name a known algorithm or lack a digest, like
    /// `#main` or `#egg=foo`.
    pub fn parse_fragment(fragment: &str) -> Option<Self> {
        let (algorithm, digest) = fragment.split_once('=')?;
        if digest.is_empty() {
            return None;
        }
        let algorithm = HashAlgorithm::from_str(algorithm).ok()?;
        Some(Self::new(algorithm, digest))
    }
}

impl Display for HashDigest {
    /// Format as a URL fragment, without the leading `#`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.algorithm, self.digest)
    }
}
