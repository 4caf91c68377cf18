//! Parse the HTML pages served by simple repositories ([PEP 503]) into typed records.
//!
//! Two kinds of page are supported: the repository index, which maps project names to project
//! pages, and a project page, which lists the downloadable files of one project. Both honor the
//! repository version declared per [PEP 629] before extracting anything else.
//!
//! [PEP 503]: https://peps.python.org/pep-0503/
//! [PEP 629]: https://peps.python.org/pep-0629/

use tracing::{debug, instrument, trace};

pub use archive_link::{ArchiveLink, CoreMetadata, Yanked};
pub use diagnostic::{Diagnostic, Parsed, UnsupportedVersionWarning};
pub use error::{Error, UnsupportedVersion};
pub use hash::{HashAlgorithm, HashDigest, UnknownHashAlgorithm};
pub use html::{Anchor, AttributeValue, SimpleHtml};
pub use index::{RepositoryIndex, project_url};
pub use repodex_normalize::{ProjectName, create_project_url, normalize};
pub use version::{RepositoryVersion, RepositoryVersionParseError};

mod archive_link;
mod diagnostic;
mod error;
mod hash;
mod html;
mod index;
mod version;

/// Options that control how simple repository pages are parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// The newest repository version this parser claims to understand.
    pub supported_version: RepositoryVersion,
}

/// A parser for simple repository pages.
///
/// The options are copied into each parse call, so a parser can be shared freely across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleParser {
    options: ParserOptions,
}

impl SimpleParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Returns the options the parser was created with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a repository index page into a mapping of project names to project URLs.
    #[instrument(skip_all)]
    pub fn parse_repo_index(&self, text: &str) -> Result<Parsed<RepositoryIndex>, Error> {
        let (html, diagnostics) = self.open(text)?;
        let index = RepositoryIndex::from_anchors(html.anchors());
        debug!("Found {} projects in repository index", index.len());
        Ok(Parsed::new(index, diagnostics))
    }

    /// Parse a project page into the list of archive links it contains, in document order.
    #[instrument(skip_all)]
    pub fn parse_archive_links(&self, text: &str) -> Result<Parsed<Vec<ArchiveLink>>, Error> {
        let (html, diagnostics) = self.open(text)?;
        let mut links = Vec::new();
        for anchor in html.anchors() {
            if let Some(link) = ArchiveLink::from_anchor(anchor)? {
                links.push(link);
            }
        }
        debug!("Found {} archive links", links.len());
        Ok(Parsed::new(links, diagnostics))
    }

    /// Tokenize the document and run the repository version gate.
    fn open<'a>(&self, text: &'a str) -> Result<(SimpleHtml<'a>, Vec<Diagnostic>), Error> {
        let supported = self.options.supported_version;
        let html = SimpleHtml::parse(text)?;
        let declared = html.repository_version();
        trace!("Declared repository version: {declared:?}");
        let diagnostics = version::check(declared.as_deref(), supported)?
            .into_iter()
            .collect();
        Ok((html, diagnostics))
    }
}

/// Parse a repository index page with the default [`ParserOptions`].
pub fn parse_repo_index(text: &str) -> Result<Parsed<RepositoryIndex>, Error> {
    SimpleParser::default().parse_repo_index(text)
}

/// Parse a project page with the default [`ParserOptions`].
pub fn parse_archive_links(text: &str) -> Result<Parsed<Vec<ArchiveLink>>, Error> {
    SimpleParser::default().parse_archive_links(text)
}
