use crate::{RepositoryVersion, RepositoryVersionParseError};

/// A parse result, along with any non-fatal diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    /// Diagnostics in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub(crate) fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Discard the diagnostics and return the parsed value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns `true` if parsing raised any diagnostics.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A non-fatal condition encountered while parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error(transparent)]
    UnsupportedVersion(#[from] UnsupportedVersionWarning),

    #[error("Ignoring invalid `pypi:repository-version` declaration")]
    InvalidVersion(#[source] RepositoryVersionParseError),
}

/// The document declares a newer minor repository version than the one supported. Parsing
/// continues, but attributes introduced by that version are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "Repository version {declared} is newer than the supported version {supported}; unrecognized fields may be ignored"
)]
pub struct UnsupportedVersionWarning {
    pub declared: RepositoryVersion,
    pub supported: RepositoryVersion,
}
