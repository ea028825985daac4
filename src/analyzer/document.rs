use scraper::{Html, Selector};

/// Attribute predicate used to pick the first matching element.
#[derive(Debug, Clone, Copy)]
pub enum AttrMatch<'a> {
    /// The element carries the attribute, whatever its value (`meta[charset]`).
    Present(&'a str),
    /// The attribute equals the value, ignoring ASCII case (`meta[name="robots"]`).
    Equals(&'a str, &'a str),
}

impl AttrMatch<'_> {
    pub fn matches(&self, attr: impl Fn(&str) -> Option<String>) -> bool {
        match *self {
            AttrMatch::Present(name) => attr(name).is_some(),
            AttrMatch::Equals(name, expected) => attr(name)
                .map(|v| v.trim().eq_ignore_ascii_case(expected))
                .unwrap_or(false),
        }
    }
}

/// The queries the analyzer needs from a parsed page.
///
/// Lookups never fail: an element that cannot be found is `None`.
pub trait PageDocument {
    /// `false` when the parser could not produce a document root at all.
    fn has_root(&self) -> bool;

    /// Read `attr` from the first `tag` element satisfying `predicate`.
    fn find_attr(&self, tag: &str, predicate: AttrMatch<'_>, attr: &str) -> Option<String>;

    /// Concatenated text of the first `tag` element.
    fn find_text(&self, tag: &str) -> Option<String>;
}

/// `PageDocument` backed by the html5ever parser. Parsing is lenient:
/// broken markup yields a tree with missing elements, never an error.
pub struct ScraperDocument {
    html: Html,
}

impl ScraperDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl PageDocument for ScraperDocument {
    fn has_root(&self) -> bool {
        self.html.root_element().value().name() == "html"
    }

    fn find_attr(&self, tag: &str, predicate: AttrMatch<'_>, attr: &str) -> Option<String> {
        let selector = Selector::parse(tag).ok()?;
        self.html
            .select(&selector)
            .find(|el| predicate.matches(|name| el.value().attr(name).map(str::to_string)))
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string)
    }

    fn find_text(&self, tag: &str) -> Option<String> {
        let selector = Selector::parse(tag).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }
}

/// In-memory document for analyzer tests: a flat list of elements.
#[cfg(test)]
#[derive(Default)]
pub struct FixtureDocument {
    pub rootless: bool,
    pub elements: Vec<FixtureElement>,
}

#[cfg(test)]
pub struct FixtureElement {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub text: String,
}

#[cfg(test)]
impl FixtureDocument {
    pub fn element(mut self, tag: &'static str, attrs: &[(&'static str, &str)]) -> Self {
        self.elements.push(FixtureElement {
            tag,
            attrs: attrs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            text: String::new(),
        });
        self
    }

    pub fn text(mut self, tag: &'static str, text: &str) -> Self {
        self.elements.push(FixtureElement {
            tag,
            attrs: Vec::new(),
            text: text.to_string(),
        });
        self
    }

    pub fn meta_name(self, name: &str, content: &str) -> Self {
        self.element("meta", &[("name", name), ("content", content)])
    }

    pub fn meta_property(self, property: &str, content: &str) -> Self {
        self.element("meta", &[("property", property), ("content", content)])
    }
}

#[cfg(test)]
impl FixtureElement {
    fn attr(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
impl PageDocument for FixtureDocument {
    fn has_root(&self) -> bool {
        !self.rootless
    }

    fn find_attr(&self, tag: &str, predicate: AttrMatch<'_>, attr: &str) -> Option<String> {
        self.elements
            .iter()
            .filter(|el| el.tag == tag)
            .find(|el| predicate.matches(|name| el.attr(name)))
            .and_then(|el| el.attr(attr))
    }

    fn find_text(&self, tag: &str) -> Option<String> {
        self.elements
            .iter()
            .find(|el| el.tag == tag)
            .map(|el| el.text.clone())
    }
}
