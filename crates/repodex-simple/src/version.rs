use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::{Diagnostic, Error, UnsupportedVersion, UnsupportedVersionWarning};

/// The version of the simple repository API, as declared via
/// `<meta name="pypi:repository-version" content="MAJOR.MINOR">`.
///
/// See: <https://peps.python.org/pep-0629/>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryVersion {
    major: u32,
    minor: u32,
}

impl RepositoryVersion {
    /// The newest repository version known to this crate (PEP 700 introduced `1.1`).
    pub const LATEST: Self = Self::new(1, 1);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub const fn major(self) -> u32 {
        self.major
    }

    pub const fn minor(self) -> u32 {
        self.minor
    }
}

impl Default for RepositoryVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl FromStr for RepositoryVersion {
    type Err = RepositoryVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RepositoryVersionParseError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        let major = major.parse::<u32>().map_err(|_| err())?;
        let minor = minor.parse::<u32>().map_err(|_| err())?;
        Ok(Self { major, minor })
    }
}

impl Display for RepositoryVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for RepositoryVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected a repository version of the form `MAJOR.MINOR`, found: `{0}`")]
pub struct RepositoryVersionParseError(String);

/// Enforce the compatibility policy for a declared repository version.
///
/// A newer major version is fatal. A newer minor version under the same major is reported as a
/// warning. Anything else, including no declaration at all, passes silently.
pub(crate) fn check(
    declared: Option<&str>,
    supported: RepositoryVersion,
) -> Result<Option<Diagnostic>, Error> {
    let Some(content) = declared else {
        return Ok(None);
    };

    let declared = match RepositoryVersion::from_str(content) {
        Ok(declared) => declared,
        Err(err) => {
            warn!("{err}");
            return Ok(Some(Diagnostic::InvalidVersion(err)));
        }
    };

    if declared.major > supported.major {
        return Err(UnsupportedVersion {
            declared,
            supported,
        }
        .into());
    }

    if declared.major == supported.major && declared.minor > supported.minor {
        let warning = UnsupportedVersionWarning {
            declared,
            supported,
        };
        warn!("{warning}");
        return Ok(Some(warning.into()));
    }

    debug!("Repository version {declared} is supported");
    Ok(None)
}
