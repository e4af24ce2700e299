use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The namespace of the `xml` prefix, which is bound in every document.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The XML Schema instance namespace, used to mark absent values with `xsi:nil`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An ordered set of namespace prefix bindings.
///
/// When writing, the bindings are declared on the root element in the order
/// they were added. The empty prefix declares the default namespace, which
/// puts the root element itself into that namespace. When there are no
/// bindings, no `xmlns` declarations are written and the root element is in no
/// namespace.
///
/// Adding a prefix that is already bound replaces its URI in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces {
    bindings: Vec<(String, String)>,
}

impl Namespaces {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`.
    pub fn add(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let (prefix, uri) = (prefix.into(), uri.into());
        match self.bindings.iter_mut().find(|(bound, _)| *bound == prefix) {
            Some(binding) => binding.1 = uri,
            None => self.bindings.push((prefix, uri)),
        }
        self
    }

    /// Return the URI bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings.iter().find(|(bound, _)| bound == prefix).map(|(_, uri)| uri.as_str())
    }

    /// Return the URI bound to the empty prefix.
    pub fn default_namespace(&self) -> Option<&str> {
        self.resolve("")
    }

    /// Iterate over the `(prefix, uri)` bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    /// Check whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Iterate over the `(attribute name, uri)` pairs that declare the bindings.
    pub(crate) fn declarations(&self) -> impl Iterator<Item = (String, &str)> {
        self.iter().map(|(prefix, uri)| (declaration_name(prefix), uri))
    }
}

impl core::fmt::Display for Namespaces {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let declarations = self.declarations().map(|(name, uri)| format!("{name}=\"{uri}\"")).join(" ");
        f.write_str(&declarations)
    }
}

impl<Prefix: Into<String>, Uri: Into<String>> FromIterator<(Prefix, Uri)> for Namespaces {
    fn from_iter<I: IntoIterator<Item = (Prefix, Uri)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |namespaces, (prefix, uri)| namespaces.add(prefix, uri))
    }
}

/// The attribute name that declares `prefix`.
pub(crate) fn declaration_name(prefix: &str) -> String {
    if prefix.is_empty() { "xmlns".into() } else { format!("xmlns:{prefix}") }
}
