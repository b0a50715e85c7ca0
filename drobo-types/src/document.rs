//! Generic XML document tree returned by command requests

use std::fmt;

use crate::error::{Error, Result};

/// One element of a parsed XML document
///
/// Attributes and children keep document order. `text` holds the element's
/// own character data with surrounding whitespace trimmed (empty when the
/// element has none).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder helper used mostly by tests
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn children<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a `/`-separated path of child names, taking the first match at
    /// every step.
    ///
    /// An empty path returns `self`.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |el, name| el.child(name))
    }

    /// All elements reachable through `path`, expanding every match at every
    /// step (XPath child-axis semantics).
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let mut current = vec![self];
        for name in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|el| el.children(name))
                .collect();
        }
        current
    }

    /// Text of the first direct child named `name`
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Text of the element at `path`, or `MissingField` naming the path
    pub fn require_text(&self, path: &str) -> Result<&str> {
        self.find(path)
            .map(|el| el.text.as_str())
            .ok_or_else(|| Error::MissingField(path.to_string()))
    }

    /// Parse the text at `path` into `T`
    pub fn require_parsed<T: std::str::FromStr>(&self, path: &str) -> Result<T> {
        let text = self.require_text(path)?;
        text.parse().map_err(|_| Error::InvalidField {
            field: path.to_string(),
            value: text.to_string(),
        })
    }

    /// `true` when the text at `path` is exactly `"1"`
    pub fn require_flag(&self, path: &str) -> Result<bool> {
        Ok(self.require_text(path)? == "1")
    }
}

/// A parsed reply document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    root: XmlElement,
}

impl ConfigDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Document root element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn into_root(self) -> XmlElement {
        self.root
    }

    /// Resolve an absolute path such as `/TMCmd/ResultDetails/DRINASConfig`.
    ///
    /// The first segment must name the root element.
    pub fn select(&self, path: &str) -> Option<&XmlElement> {
        let rest = self.strip_root(path)?;
        self.root.find(rest)
    }

    /// Like [`select`](Self::select) but returns every matching element
    pub fn select_all(&self, path: &str) -> Vec<&XmlElement> {
        match self.strip_root(path) {
            Some(rest) => self.root.find_all(rest),
            None => Vec::new(),
        }
    }

    fn strip_root<'p>(&self, path: &'p str) -> Option<&'p str> {
        let path = path.trim_start_matches('/');
        let (first, rest) = path.split_once('/').unwrap_or((path, ""));
        (first == self.root.name).then_some(rest)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigDocument[{}](children={})",
            self.root.name,
            self.root.children.len()
        )
    }
}
