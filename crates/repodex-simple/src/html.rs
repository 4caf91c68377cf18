use std::borrow::Cow;

use tl::HTMLTag;
use tracing::trace;

use crate::Error;

/// The `name` of the `<meta>` tag declaring the repository version.
const REPOSITORY_VERSION: &str = "pypi:repository-version";

/// A tokenized simple repository page.
///
/// Tokenization is lenient: malformed markup never fails, and the page yields whatever elements
/// could be located.
pub struct SimpleHtml<'a> {
    dom: tl::VDom<'a>,
}

impl<'a> SimpleHtml<'a> {
    pub fn parse(text: &'a str) -> Result<Self, Error> {
        let dom = tl::parse(text, tl::ParserOptions::default())?;
        Ok(Self { dom })
    }

    /// Returns the `content` of the first `<meta name="pypi:repository-version">` tag, if any.
    pub fn repository_version(&self) -> Option<String> {
        self.tags()
            .filter(|tag| is_tag(tag, b"meta"))
            .find(|meta| {
                matches!(
                    attribute(meta, "name"),
                    AttributeValue::Value(name) if name.eq_ignore_ascii_case(REPOSITORY_VERSION)
                )
            })
            .map(|meta| match attribute(meta, "content") {
                AttributeValue::Value(content) => content,
                AttributeValue::Absent | AttributeValue::Valueless => String::new(),
            })
    }

    /// Returns every `<a>` tag with an `href` attribute, in document order.
    pub fn anchors(&self) -> impl Iterator<Item = Anchor> + '_ {
        let parser = self.dom.parser();
        self.tags()
            .filter(|tag| is_tag(tag, b"a"))
            .filter_map(move |tag| Anchor::from_tag(tag, parser))
    }

    /// Returns every tag in document order, except those nested in `<script>` or `<style>`,
    /// whose content is raw text.
    fn tags(&self) -> impl Iterator<Item = &HTMLTag<'a>> + '_ {
        let parser = self.dom.parser();
        let raw_text = self
            .dom
            .nodes()
            .iter()
            .filter_map(tl::Node::as_tag)
            .filter(|tag| is_tag(tag, b"script") || is_tag(tag, b"style"))
            .filter_map(|tag| tag.children().boundaries(parser))
            .map(|(start, end)| start as usize..=end as usize)
            .collect::<Vec<_>>();
        self.dom
            .nodes()
            .iter()
            .enumerate()
            .filter(move |(index, _)| !raw_text.iter().any(|range| range.contains(index)))
            .filter_map(|(_, node)| node.as_tag())
    }
}

/// An `<a>` tag, with its `href`, its text, and the `data-*` attributes of simple repositories.
///
/// All values are HTML-entity-decoded. None are percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    /// `data-requires-python`, per PEP 503.
    pub requires_python: AttributeValue,
    /// `data-gpg-sig`, per PEP 503.
    pub gpg_sig: AttributeValue,
    /// `data-yanked`, per PEP 592.
    pub yanked: AttributeValue,
    /// `data-dist-info-metadata`, per PEP 658.
    pub dist_info_metadata: AttributeValue,
    /// `data-core-metadata`, per PEP 714.
    pub core_metadata: AttributeValue,
}

impl Anchor {
    /// Returns `None` if the tag has no `href` attribute.
    fn from_tag<'a>(tag: &HTMLTag<'a>, parser: &tl::Parser<'a>) -> Option<Self> {
        let href = match attribute(tag, "href") {
            AttributeValue::Absent => {
                trace!("Skipping anchor without `href`");
                return None;
            }
            AttributeValue::Valueless => String::new(),
            AttributeValue::Value(href) => href,
        };

        Some(Self {
            href,
            text: decode(&tag.inner_text(parser)),
            requires_python: attribute(tag, "data-requires-python"),
            gpg_sig: attribute(tag, "data-gpg-sig"),
            yanked: attribute(tag, "data-yanked"),
            dist_info_metadata: attribute(tag, "data-dist-info-metadata"),
            core_metadata: attribute(tag, "data-core-metadata"),
        })
    }
}

/// The state of an optional attribute on a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttributeValue {
    /// The attribute is not present.
    #[default]
    Absent,
    /// The attribute is present without a value, as in `<a data-yanked>`.
    Valueless,
    /// The attribute is present with a (possibly empty) value.
    Value(String),
}

impl AttributeValue {
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Look up an attribute by name. Attribute names are case-insensitive.
fn attribute(tag: &HTMLTag, name: &str) -> AttributeValue {
    let Some((_, value)) = tag
        .attributes()
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    else {
        return AttributeValue::Absent;
    };
    match value {
        None => AttributeValue::Valueless,
        Some(value) => AttributeValue::Value(decode(&value)),
    }
}

fn is_tag(tag: &HTMLTag, name: &[u8]) -> bool {
    tag.name().as_bytes().eq_ignore_ascii_case(name)
}

fn decode(value: &str) -> String {
    match html_escape::decode_html_entities(value) {
        Cow::Borrowed(value) => value.to_string(),
        Cow::Owned(value) => value,
    }
}
