//! Exclusion selectors
//!
//! Pointer-downs on interactive page elements (links, buttons, form controls,
//! media, navigation chrome) must never start a stroke. The host describes the
//! element under the pointer, plus its ancestors, as a [`TargetPath`]; an
//! [`ExclusionPredicate`] decides whether that path is off-limits.
//!
//! [`ExclusionSet`] is the stock predicate. It understands a small CSS subset:
//! `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr=value]`, the substring
//! operators `^=` `$=` `*=` `~=`, and compounds of those (`a.lb`,
//! `a[href^="#"]`). A selector matches when the target or any ancestor
//! matches, like `Element.closest`.

use thiserror::Error;

use crate::constants::MAX_TARGET_DEPTH;

/// Selector parse failures. Combinators (`nav a`, `ul > li`), pseudo-classes
/// and the `|=` attribute operator are outside the supported subset and
/// report [`SelectorError::UnexpectedChar`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,
    #[error("Unexpected '{ch}' in selector '{selector}'")]
    UnexpectedChar { selector: String, ch: char },
    #[error("Unterminated attribute in selector '{0}'")]
    Unterminated(String),
    #[error("Missing name after '{marker}' in selector '{selector}'")]
    MissingName { selector: String, marker: char },
}

/// Description of one DOM element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    /// Lowercase tag name
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Attribute name/value pairs (names lowercase)
    pub attributes: Vec<(String, String)>,
}

impl ElementInfo {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add every whitespace-separated class from a `className` string
    pub fn with_class_list(mut self, class_name: &str) -> Self {
        self.classes
            .extend(class_name.split_whitespace().map(String::from));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The element under the pointer followed by its ancestors, innermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPath {
    elements: Vec<ElementInfo>,
}

impl TargetPath {
    /// Path with nothing under the pointer (e.g. the bare document)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from innermost-first elements, capped at a sane depth
    pub fn new(mut elements: Vec<ElementInfo>) -> Self {
        elements.truncate(MAX_TARGET_DEPTH);
        Self { elements }
    }

    /// Single element with no recorded ancestors
    pub fn single(element: ElementInfo) -> Self {
        Self::new(vec![element])
    }

    /// Append an ancestor (outermost last)
    pub fn push_ancestor(&mut self, element: ElementInfo) {
        if self.elements.len() < MAX_TARGET_DEPTH {
            self.elements.push(element);
        }
    }

    pub fn elements(&self) -> &[ElementInfo] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Decides whether a pointer-down target is off-limits for painting
pub trait ExclusionPredicate {
    fn excludes(&self, target: &TargetPath) -> bool;
}

impl<F> ExclusionPredicate for F
where
    F: Fn(&TargetPath) -> bool,
{
    fn excludes(&self, target: &TargetPath) -> bool {
        self(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    /// `=`
    Equals,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Contains,
    /// `~=`, one of the whitespace-separated words
    Word,
}

impl AttrOp {
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '^' => Some(Self::Prefix),
            '$' => Some(Self::Suffix),
            '*' => Some(Self::Contains),
            '~' => Some(Self::Word),
            _ => None,
        }
    }

    /// Empty operands never match the substring operators, as in CSS
    fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::Prefix => !expected.is_empty() && actual.starts_with(expected),
            Self::Suffix => !expected.is_empty() && actual.ends_with(expected),
            Self::Contains => !expected.is_empty() && actual.contains(expected),
            Self::Word => {
                !expected.is_empty()
                    && !expected.contains(char::is_whitespace)
                    && actual.split_whitespace().any(|w| w == expected)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Present(String),
    Value {
        name: String,
        op: AttrOp,
        value: String,
    },
}

/// One compound selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

impl Selector {
    fn matches(&self, el: &ElementInfo) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.classes.iter().any(|ec| ec == c)) {
            return false;
        }
        self.attributes.iter().all(|attr| match attr {
            AttrMatch::Present(name) => el.attribute(name).is_some(),
            AttrMatch::Value { name, op, value } => {
                el.attribute(name).is_some_and(|actual| op.test(actual, value))
            }
        })
    }

    fn parse(source: &str) -> Result<Self, SelectorError> {
        let src = source.trim();
        if src.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selector = Selector::default();
        let mut chars = src.char_indices().peekable();

        // Leading type selector or universal
        match chars.peek() {
            Some(&(_, '*')) => {
                chars.next();
            }
            Some(&(_, c)) if is_ident_char(c) => {
                selector.tag = Some(take_ident(src, &mut chars).to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some((_, c)) = chars.next() {
            match c {
                '.' | '#' => {
                    let name = take_ident(src, &mut chars);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName {
                            selector: src.to_string(),
                            marker: c,
                        });
                    }
                    if c == '.' {
                        selector.classes.push(name.to_string());
                    } else {
                        selector.id = Some(name.to_string());
                    }
                }
                '[' => selector.attributes.push(parse_attribute(src, &mut chars)?),
                other => {
                    return Err(SelectorError::UnexpectedChar {
                        selector: src.to_string(),
                        ch: other,
                    });
                }
            }
        }

        Ok(selector)
    }
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident<'a>(src: &'a str, chars: &mut Chars<'a>) -> &'a str {
    let start = match chars.peek() {
        Some(&(i, _)) => i,
        None => return "",
    };
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &src[start..end]
}

/// Parse the inside of `[...]`; the opening bracket is already consumed
fn parse_attribute<'a>(src: &'a str, chars: &mut Chars<'a>) -> Result<AttrMatch, SelectorError> {
    let name = take_ident(src, chars).to_ascii_lowercase();
    if name.is_empty() {
        return Err(SelectorError::MissingName {
            selector: src.to_string(),
            marker: '[',
        });
    }

    let op = match chars.next() {
        Some((_, ']')) => return Ok(AttrMatch::Present(name)),
        Some((_, '=')) => AttrOp::Equals,
        Some((_, marker)) => {
            let Some(op) = AttrOp::from_marker(marker) else {
                return Err(unexpected(src, marker));
            };
            match chars.next() {
                Some((_, '=')) => op,
                Some((_, ch)) => return Err(unexpected(src, ch)),
                None => return Err(SelectorError::Unterminated(src.to_string())),
            }
        }
        None => return Err(SelectorError::Unterminated(src.to_string())),
    };

    let value = match chars.peek() {
        Some(&(_, quote @ ('"' | '\''))) => {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some((_, c)) if c == quote => break,
                    Some((_, c)) => value.push(c),
                    None => return Err(SelectorError::Unterminated(src.to_string())),
                }
            }
            value
        }
        _ => take_ident(src, chars).to_string(),
    };

    match chars.next() {
        Some((_, ']')) => Ok(AttrMatch::Value { name, op, value }),
        Some((_, ch)) => Err(unexpected(src, ch)),
        None => Err(SelectorError::Unterminated(src.to_string())),
    }
}

fn unexpected(src: &str, ch: char) -> SelectorError {
    SelectorError::UnexpectedChar {
        selector: src.to_string(),
        ch,
    }
}

/// A parsed selector list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    selectors: Vec<Selector>,
}

impl ExclusionSet {
    /// Parse selector strings. Each entry may itself be a comma-separated list.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, SelectorError> {
        let mut set = Self::default();
        for entry in entries {
            for part in entry.as_ref().split(',') {
                set.selectors.push(Selector::parse(part)?);
            }
        }
        Ok(set)
    }

    /// A set that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// True if any element of the path matches any selector
    pub fn matches(&self, target: &TargetPath) -> bool {
        target
            .elements()
            .iter()
            .any(|el| self.selectors.iter().any(|s| s.matches(el)))
    }
}

impl ExclusionPredicate for ExclusionSet {
    fn excludes(&self, target: &TargetPath) -> bool {
        self.matches(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> ExclusionSet {
        ExclusionSet::parse(&[
            "a, button, input",
            "img",
            "video",
            "nav",
            ".lightbox",
            "[role=dialog]",
            "[data-no-paint]",
            "#menu",
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_counts_comma_entries() {
        let set = stock();
        assert_eq!(set.len(), 10);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let path = TargetPath::single(ElementInfo::new("BUTTON"));
        assert!(stock().excludes(&path));
    }

    #[test]
    fn test_ancestor_match() {
        // <nav><ul><li><span>
        let path = TargetPath::new(vec![
            ElementInfo::new("span"),
            ElementInfo::new("li"),
            ElementInfo::new("ul"),
            ElementInfo::new("nav"),
            ElementInfo::new("body"),
        ]);
        assert!(stock().excludes(&path));
    }

    #[test]
    fn test_plain_content_is_paintable() {
        let path = TargetPath::new(vec![
            ElementInfo::new("p").with_class("muted"),
            ElementInfo::new("section").with_id("portraits"),
            ElementInfo::new("main"),
            ElementInfo::new("body"),
        ]);
        assert!(!stock().excludes(&path));
        assert!(!stock().excludes(&TargetPath::empty()));
    }

    #[test]
    fn test_class_id_and_attributes() {
        let set = stock();
        let lightbox = TargetPath::single(ElementInfo::new("div").with_class_list("modal lightbox"));
        let menu = TargetPath::single(ElementInfo::new("div").with_id("menu"));
        let dialog = TargetPath::single(ElementInfo::new("div").with_attribute("role", "dialog"));
        let region = TargetPath::single(ElementInfo::new("div").with_attribute("role", "region"));
        let flagged = TargetPath::single(ElementInfo::new("div").with_attribute("data-no-paint", ""));

        assert!(set.excludes(&lightbox));
        assert!(set.excludes(&menu));
        assert!(set.excludes(&dialog));
        assert!(!set.excludes(&region));
        assert!(set.excludes(&flagged));
    }

    #[test]
    fn test_compound_selector() {
        let set = ExclusionSet::parse(&["a.lb[href]"]).unwrap();
        let full = ElementInfo::new("a").with_class("lb").with_attribute("href", "#x");
        let no_class = ElementInfo::new("a").with_attribute("href", "#x");
        assert!(set.excludes(&TargetPath::single(full)));
        assert!(!set.excludes(&TargetPath::single(no_class)));
    }

    #[test]
    fn test_quoted_attribute_value() {
        let set = ExclusionSet::parse(&[r#"[aria-label="Pigment button"]"#]).unwrap();
        let el = ElementInfo::new("button").with_attribute("aria-label", "Pigment button");
        assert!(set.excludes(&TargetPath::single(el)));
    }

    #[test]
    fn test_substring_operators() {
        let set = ExclusionSet::parse(&[r##"a[href^="#"]"##, r#"[src$=".mp4"]"#, "[aria-label*=menu]"]).unwrap();
        let anchor = |href: &str| TargetPath::single(ElementInfo::new("a").with_attribute("href", href));
        assert!(set.excludes(&anchor("#work")));
        assert!(!set.excludes(&anchor("/about")));

        let video = |src: &str| TargetPath::single(ElementInfo::new("source").with_attribute("src", src));
        assert!(set.excludes(&video("clips/intro.mp4")));
        assert!(!set.excludes(&video("clips/intro.webm")));

        let toggle = ElementInfo::new("button").with_attribute("aria-label", "open-menu");
        assert!(set.excludes(&TargetPath::single(toggle)));
    }

    #[test]
    fn test_word_operator() {
        let set = ExclusionSet::parse(&["[rel~=lightbox]"]).unwrap();
        let link = |rel: &str| TargetPath::single(ElementInfo::new("a").with_attribute("rel", rel));
        assert!(set.excludes(&link("noopener lightbox")));
        assert!(!set.excludes(&link("lightboxes")));
    }

    #[test]
    fn test_empty_substring_never_matches() {
        let set = ExclusionSet::parse(&[r#"[href^=""]"#]).unwrap();
        let el = ElementInfo::new("a").with_attribute("href", "/");
        assert!(!set.excludes(&TargetPath::single(el)));
    }

    #[test]
    fn test_universal_selector() {
        let set = ExclusionSet::parse(&["*"]).unwrap();
        assert!(set.excludes(&TargetPath::single(ElementInfo::new("div"))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ExclusionSet::parse(&[""]), Err(SelectorError::Empty));
        assert_eq!(ExclusionSet::parse(&["a,"]), Err(SelectorError::Empty));
        assert!(matches!(
            ExclusionSet::parse(&["nav a"]),
            Err(SelectorError::UnexpectedChar { ch: ' ', .. })
        ));
        assert!(matches!(
            ExclusionSet::parse(&["[role=dialog"]),
            Err(SelectorError::Unterminated(_))
        ));
        assert!(matches!(
            ExclusionSet::parse(&["div."]),
            Err(SelectorError::MissingName { marker: '.', .. })
        ));
        assert!(matches!(
            ExclusionSet::parse(&["[lang|=en]"]),
            Err(SelectorError::UnexpectedChar { ch: '|', .. })
        ));
        assert!(matches!(
            ExclusionSet::parse(&["[href^]"]),
            Err(SelectorError::UnexpectedChar { ch: ']', .. })
        ));
    }

    #[test]
    fn test_closure_predicate() {
        let only_canvas = |path: &TargetPath| path.elements().iter().any(|e| e.tag == "canvas");
        assert!(only_canvas.excludes(&TargetPath::single(ElementInfo::new("canvas"))));
        assert!(!only_canvas.excludes(&TargetPath::single(ElementInfo::new("div"))));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        assert!(!ExclusionSet::none().excludes(&TargetPath::single(ElementInfo::new("a"))));
    }
}
