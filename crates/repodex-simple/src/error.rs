use pep440_rs::VersionSpecifiersParseError;

use crate::RepositoryVersion;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    HtmlParse(#[from] tl::ParseError),

    #[error(transparent)]
    UnsupportedVersion(#[from] UnsupportedVersion),

    #[error("Invalid `data-requires-python` on link to `{0}`")]
    RequiresPython(String, #[source] VersionSpecifiersParseError),
}

/// The document declares a major repository version newer than the one supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "Repository version {declared} is not supported (the newest supported version is {supported})"
)]
pub struct UnsupportedVersion {
    pub declared: RepositoryVersion,
    pub supported: RepositoryVersion,
}
