use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use html_escape::{encode_double_quoted_attribute, encode_text};
use pep440_rs::VersionSpecifiers;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::{Anchor, AttributeValue, Error, HashDigest};

/// Characters in a filename that would not survive being parsed back from the anchor text: the
/// text is split on `/`, trimmed, and percent-decoded.
const FILENAME: &AsciiSet = &CONTROLS.add(b'%').add(b'/').add(b' ');

/// A link to a single distribution file on a simple repository project page.
///
/// See: <https://peps.python.org/pep-0503/>
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveLink {
    /// The percent-decoded filename of the distribution.
    pub filename: String,
    /// The URL of the distribution, as written in the page. Not percent-decoded.
    pub url: String,
    /// The Python versions supported by the distribution, per PEP 503. `None` if unconstrained.
    #[serde(serialize_with = "serialize_requires_python")]
    pub requires_python: Option<VersionSpecifiers>,
    /// The hash of the distribution, from the URL fragment.
    pub hash: Option<HashDigest>,
    /// Whether a detached GPG signature is available, per PEP 503.
    pub gpg_sig: Option<bool>,
    /// Whether the distribution has been yanked, per PEP 592.
    pub yanked: Option<Yanked>,
    /// Whether the core metadata is available separately, per PEP 658.
    pub metadata: Option<CoreMetadata>,
}

impl ArchiveLink {
    /// Create a link with none of the optional attributes set.
    ///
    /// The `filename` must be non-empty. The `url` must not end in a `#<algorithm>=<digest>`
    /// fragment; set [`ArchiveLink::hash`] instead, or the link won't parse back unchanged from
    /// its [`Display`] form.
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            requires_python: None,
            hash: None,
            gpg_sig: None,
            yanked: None,
            metadata: None,
        }
    }

    /// Returns `true` if the distribution has been yanked.
    pub fn is_yanked(&self) -> bool {
        self.yanked.is_some()
    }

    /// Build an [`ArchiveLink`] from an `<a>` tag.
    ///
    /// Returns `None` if the anchor has no usable `href` or filename.
    pub(crate) fn from_anchor(anchor: Anchor) -> Result<Option<Self>, Error> {
        let Anchor {
            href,
            text,
            requires_python,
            gpg_sig,
            yanked,
            dist_info_metadata,
            core_metadata,
        } = anchor;

        if href.is_empty() {
            trace!("Skipping anchor with empty `href`");
            return Ok(None);
        }

        // Only the fragment is inspected for a hash. If it's recognized, it's stripped from
        // the URL; otherwise the `href` is kept whole.
        let hash = href
            .split_once('#')
            .and_then(|(_, fragment)| HashDigest::parse_fragment(fragment));
        let url = match (&hash, href.find('#')) {
            (Some(_), Some(index)) => href[..index].to_string(),
            (None, Some(_)) => {
                debug!("Ignoring unrecognized fragment on `{href}`");
                href
            }
            (_, None) => href,
        };

        let Some(filename) = parse_filename(&text, &url) else {
            trace!("Skipping anchor without a filename: `{url}`");
            return Ok(None);
        };

        let requires_python = parse_requires_python(requires_python)
            .map_err(|err| Error::RequiresPython(url.clone(), err))?;

        // `data-core-metadata` supersedes `data-dist-info-metadata`, per PEP 714.
        let metadata = if core_metadata.is_present() {
            core_metadata
        } else {
            dist_info_metadata
        };

        Ok(Some(Self {
            filename,
            url,
            requires_python,
            hash,
            gpg_sig: parse_gpg_sig(gpg_sig),
            yanked: parse_yanked(yanked),
            metadata: parse_metadata(metadata),
        }))
    }
}

/// Extract the filename from the final path segment of the anchor text or, if the anchor has no
/// text, of the URL.
fn parse_filename(text: &str, url: &str) -> Option<String> {
    let text = text.trim();
    let path = if text.is_empty() {
        let url = url.split_once('#').map_or(url, |(path, _)| path);
        url.split_once('?').map_or(url, |(path, _)| path)
    } else {
        text
    };
    let segment = path.rsplit('/').next().unwrap_or(path);
    let filename = percent_encoding::percent_decode_str(segment).decode_utf8_lossy();
    if filename.is_empty() {
        None
    } else {
        Some(filename.into_owned())
    }
}

/// Parse `data-requires-python`. An empty or valueless attribute places no constraint.
fn parse_requires_python(
    value: AttributeValue,
) -> Result<Option<VersionSpecifiers>, pep440_rs::VersionSpecifiersParseError> {
    let AttributeValue::Value(value) = value else {
        return Ok(None);
    };
    let value = percent_encoding::percent_decode_str(&value).decode_utf8_lossy();
    if value.trim().is_empty() {
        return Ok(None);
    }
    VersionSpecifiers::from_str(&value).map(Some)
}

/// Parse `data-gpg-sig`. Any value other than `true` is treated as `false`.
fn parse_gpg_sig(value: AttributeValue) -> Option<bool> {
    match value {
        AttributeValue::Absent => None,
        AttributeValue::Valueless => Some(false),
        AttributeValue::Value(value) => Some(value.eq_ignore_ascii_case("true")),
    }
}

fn parse_yanked(value: AttributeValue) -> Option<Yanked> {
    match value {
        AttributeValue::Absent => None,
        AttributeValue::Valueless => Some(Yanked::NoReason),
        AttributeValue::Value(reason) => Some(Yanked::from(reason)),
    }
}

/// Parse `data-core-metadata` or `data-dist-info-metadata`. Values that aren't of the form
/// `<algorithm>=<digest>` (like `true`) mark the metadata as available without a hash.
fn parse_metadata(value: AttributeValue) -> Option<CoreMetadata> {
    match value {
        AttributeValue::Absent => None,
        AttributeValue::Valueless => Some(CoreMetadata::Available),
        AttributeValue::Value(value) => match value.split_once('=') {
            Some((algorithm, digest)) if !algorithm.is_empty() && !digest.is_empty() => {
                Some(CoreMetadata::hashed(algorithm, digest))
            }
            _ => {
                trace!("Treating core metadata value `{value}` as unhashed");
                Some(CoreMetadata::Available)
            }
        },
    }
}

/// Specifier sets are equivalent if they contain the same specifiers, in any order. An empty set
/// is equivalent to no set.
fn requires_python_equivalent(
    left: Option<&VersionSpecifiers>,
    right: Option<&VersionSpecifiers>,
) -> bool {
    fn canonical(specifiers: Option<&VersionSpecifiers>) -> Vec<String> {
        let mut specifiers = specifiers
            .into_iter()
            .flat_map(|specifiers| specifiers.iter())
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        specifiers.sort_unstable();
        specifiers.dedup();
        specifiers
    }
    canonical(left) == canonical(right)
}

impl PartialEq for ArchiveLink {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
            && self.url == other.url
            && requires_python_equivalent(
                self.requires_python.as_ref(),
                other.requires_python.as_ref(),
            )
            && self.hash == other.hash
            && self.gpg_sig == other.gpg_sig
            && self.yanked == other.yanked
            && self.metadata == other.metadata
    }
}

impl Eq for ArchiveLink {}

impl Display for ArchiveLink {
    /// Render the link as an `<a>` tag that parses back to an equal [`ArchiveLink`].
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let href = match &self.hash {
            Some(hash) => Cow::Owned(format!("{}#{hash}", self.url)),
            None => Cow::Borrowed(self.url.as_str()),
        };
        write!(f, "<a href=\"{}\"", encode_double_quoted_attribute(&href))?;

        if let Some(requires_python) = self
            .requires_python
            .as_ref()
            .filter(|specifiers| !specifiers.is_empty())
        {
            write!(
                f,
                " data-requires-python=\"{}\"",
                encode_double_quoted_attribute(&requires_python.to_string())
            )?;
        }

        if let Some(gpg_sig) = self.gpg_sig {
            write!(f, " data-gpg-sig=\"{gpg_sig}\"")?;
        }

        match &self.yanked {
            None => {}
            Some(Yanked::NoReason) => f.write_str(" data-yanked")?,
            Some(Yanked::Reason(reason)) => write!(
                f,
                " data-yanked=\"{}\"",
                encode_double_quoted_attribute(reason)
            )?,
        }

        match self.metadata.as_ref().map(CoreMetadata::hash) {
            None => {}
            Some(("", "")) => f.write_str(" data-dist-info-metadata")?,
            Some((algorithm, digest)) => write!(
                f,
                " data-dist-info-metadata=\"{}\"",
                encode_double_quoted_attribute(&format!("{algorithm}={digest}"))
            )?,
        }

        let filename = utf8_percent_encode(&self.filename, FILENAME).to_string();
        write!(f, ">{}</a>", encode_text(&filename))
    }
}

fn serialize_requires_python<S: Serializer>(
    requires_python: &Option<VersionSpecifiers>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    requires_python
        .as_ref()
        .map(ToString::to_string)
        .serialize(serializer)
}

/// The yanked status of a distribution, per PEP 592.
///
/// An empty reason and no reason at all are the same thing.
#[derive(Debug, Clone)]
pub enum Yanked {
    NoReason,
    Reason(String),
}

impl Yanked {
    /// Returns the reason given for yanking the distribution, or an empty string.
    pub fn reason(&self) -> &str {
        match self {
            Self::NoReason => "",
            Self::Reason(reason) => reason,
        }
    }
}

impl From<String> for Yanked {
    fn from(reason: String) -> Self {
        if reason.is_empty() {
            Self::NoReason
        } else {
            Self::Reason(reason)
        }
    }
}

impl From<&str> for Yanked {
    fn from(reason: &str) -> Self {
        Self::from(reason.to_string())
    }
}

impl PartialEq for Yanked {
    fn eq(&self, other: &Self) -> bool {
        self.reason() == other.reason()
    }
}

impl Eq for Yanked {}

impl Serialize for Yanked {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.reason())
    }
}

/// The availability of a distribution's core metadata file, per PEP 658 and PEP 714.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoreMetadata {
    /// The metadata is available, but its hash is unknown.
    Available,
    /// The metadata is available with the given hash.
    Hash { algorithm: String, digest: String },
}

impl CoreMetadata {
    /// Create a hashed entry. The algorithm name is lowercased; an empty algorithm and digest
    /// mean the hash is unknown.
    pub fn hashed(algorithm: &str, digest: impl Into<String>) -> Self {
        let digest = digest.into();
        if algorithm.is_empty() && digest.is_empty() {
            Self::Available
        } else {
            Self::Hash {
                algorithm: algorithm.to_ascii_lowercase(),
                digest,
            }
        }
    }

    /// Returns the `(algorithm, digest)` pair, both empty if the hash is unknown.
    pub fn hash(&self) -> (&str, &str) {
        match self {
            Self::Available => ("", ""),
            Self::Hash { algorithm, digest } => (algorithm, digest),
        }
    }
}

impl PartialEq for CoreMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for CoreMetadata {}
