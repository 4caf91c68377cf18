use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use repodex_normalize::{ProjectName, create_project_url, normalize};

use crate::Anchor;

/// The projects listed on a simple repository index page.
///
/// Maps the text of each anchor, as written, to the project URL it links to, with the final path
/// segment normalized. Iteration follows document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepositoryIndex(IndexMap<String, String>);

impl RepositoryIndex {
    /// Build the index from the anchors of a page.
    ///
    /// Anchors with an empty `href` or without text are skipped. If a name appears more than once,
    /// the last occurrence wins.
    pub(crate) fn from_anchors(anchors: impl Iterator<Item = Anchor>) -> Self {
        let mut projects = IndexMap::new();
        for anchor in anchors {
            let name = anchor.text.trim();
            if name.is_empty() {
                trace!("Skipping anchor without text: `{}`", anchor.href);
                continue;
            }
            if anchor.href.is_empty() {
                trace!("Skipping anchor with empty `href`: `{name}`");
                continue;
            }
            let url = project_url(&anchor.href);
            if let Some(previous) = projects.insert(name.to_string(), url) {
                debug!("Project `{name}` is listed more than once; replacing `{previous}`");
            }
        }
        Self(projects)
    }

    /// Returns the URL for the anchor text `name`, exactly as written in the page.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the anchor text and URL of the first project whose name normalizes to `name`.
    pub fn find(&self, name: &ProjectName) -> Option<(&str, &str)> {
        self.0
            .iter()
            .find(|(text, _)| normalize(text) == name.as_str())
            .map(|(text, url)| (text.as_str(), url.as_str()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl IntoIterator for RepositoryIndex {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Normalize the `href` of an index entry into a project URL.
///
/// The final path segment is normalized as a project name and a single trailing `/` is ensured.
/// Everything before the final segment is kept as written, as are the scheme and host of an
/// absolute URL and any query or fragment.
pub fn project_url(href: &str) -> String {
    let (path, suffix) = href
        .find(['?', '#'])
        .map_or((href, ""), |index| href.split_at(index));

    // The host of an absolute URL is never a project name.
    let authority = path.find("://").map_or(0, |index| {
        let host = index + "://".len();
        path[host..].find('/').map_or(path.len(), |end| host + end)
    });
    let (authority, path) = path.split_at(authority);

    let path = path.trim_end_matches('/');
    let url = match path.rsplit_once('/') {
        // Keep the root of `/name`.
        Some(("", name)) => create_project_url("/", name),
        Some((base, name)) => create_project_url(base, name),
        None => create_project_url("", path),
    };
    format!("{authority}{url}{suffix}")
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use test_case::test_case;

    use crate::parse_repo_index;

    use super::*;

    #[test_case("/simple/numpy/", "/simple/numpy/"; "already normalized")]
    #[test_case("/project/PACKAGE-NAME", "/project/package-name/"; "trailing slash added")]
    #[test_case("django-node", "django-node/"; "relative")]
    #[test_case("Django_Node/", "django-node/"; "relative with trailing slash")]
    #[test_case("/Simple/Zope.Interface//", "/Simple/zope-interface/"; "only final segment normalized")]
    #[test_case("/numpy", "/numpy/"; "root kept")]
    #[test_case("https://pypi.org/simple/Flask", "https://pypi.org/simple/flask/"; "absolute")]
    #[test_case("https://pypi.org/Flask", "https://pypi.org/flask/"; "absolute at root")]
    #[test_case("https://pypi.org", "https://pypi.org/"; "host only")]
    #[test_case("/simple/foo/#frag", "/simple/foo/#frag"; "fragment kept")]
    #[test_case("/simple/Foo_Bar?page=2", "/simple/foo-bar/?page=2"; "query kept")]
    fn href_to_project_url(href: &str, expected: &str) {
        assert_eq!(project_url(href), expected);
    }

    #[test]
    fn no_text() {
        let html = "<html><head></head><body><a href='https://no.url/here'></a></body></html>";
        let index = parse_repo_index(html).unwrap().into_value();
        assert!(index.is_empty());
    }

    #[test]
    fn no_href() {
        let html = "<html><head></head><body><a>my-cdata-package</a></body></html>";
        let index = parse_repo_index(html).unwrap().into_value();
        assert!(index.is_empty());
    }

    #[test]
    fn empty_href() {
        let html = r#"<html><body><a href="">my-cdata-package</a></body></html>"#;
        let index = parse_repo_index(html).unwrap().into_value();
        assert!(index.is_empty());
    }

    #[test]
    fn uppercase_anchor() {
        let html = r#"<HTML><BODY><A HREF="/simple/spam/">spam</A></BODY></HTML>"#;
        let index = parse_repo_index(html).unwrap().into_value();
        assert_eq!(index.get("spam"), Some("/simple/spam/"));
    }

    #[test]
    fn project_url_normalization_complete() {
        let html = indoc! {r#"
            <html>
                <body>
                    <a href="/project/PACKAGE-NAME">package-name</a>
                </body>
            </html>
        "#};
        let index = parse_repo_index(html).unwrap().into_value();
        assert_eq!(index.get("package-name"), Some("/project/package-name/"));
    }

    #[test]
    fn project_name_not_normalized() {
        let html = indoc! {r#"
            <html>
                <body>
                    <a href="/project/package-name">PACKAGE-NAME</a>
                </body>
            </html>
        "#};
        let index = parse_repo_index(html).unwrap().into_value();
        assert_eq!(index.get("PACKAGE-NAME"), Some("/project/package-name/"));
        assert_eq!(index.get("package-name"), None);
        assert_eq!(
            index.find(&ProjectName::new("Package_Name")),
            Some(("PACKAGE-NAME", "/project/package-name/"))
        );
    }

    #[test]
    fn relative_url() {
        let html = indoc! {r#"
            <html>
                <body>
                    <a href="django-node">django-node</a>
                </body>
            </html>
        "#};
        let index = parse_repo_index(html).unwrap().into_value();
        assert_eq!(index.get("django-node"), Some("django-node/"));
    }

    #[test]
    fn full_index() {
        let html = indoc! {r#"
            <!DOCTYPE html>
            <html>
              <head>
                <meta name="pypi:repository-version" content="1.0">
                <title>Simple index</title>
              </head>
              <body>
                <a href="/simple/0/">0</a>
                <a href="/simple/numpy/">numpy</a>
                <a href="/simple/zope-interface/">zope.interface</a>
                <a href="/simple/numpy-old/">numpy</a>
                <a href="/simple/requests/">requests</a>
              </body>
            </html>
        "#};
        let parsed = parse_repo_index(html).unwrap();
        assert!(!parsed.has_diagnostics());
        insta::assert_json_snapshot!(parsed.value, @r#"
        {
          "0": "/simple/0/",
          "numpy": "/simple/numpy-old/",
          "zope.interface": "/simple/zope-interface/",
          "requests": "/simple/requests/"
        }
        "#);
    }
}
