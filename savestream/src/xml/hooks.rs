use std::sync::Arc;

use serde_ignored::Path;

/// The kind of a node that has no counterpart in the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A child element.
    Element,
    /// An attribute.
    Attribute,
    /// A comment, reported only when comments are not ignored by the reader options.
    Comment,
    /// Character data, or any other node that is neither an element nor an attribute.
    Other,
}

/// A node that was skipped because the target type has no place for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownNode<'a> {
    /// Whether the node is an element, an attribute or something else.
    pub kind: NodeKind,
    /// The local name of the element or attribute, `$text` for character data
    /// or `#comment` for comments.
    pub name: &'a str,
    /// Where the node sits relative to the root element, like `inventory.0.extra`.
    pub path: &'a str,
    /// The base URI from the parser context, if any.
    pub base_uri: Option<&'a str>,
}

/// An element with an `id` that no `href="#id"` in the document refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreferencedObject<'a> {
    /// The value of the `id` attribute.
    pub id: &'a str,
    /// The qualified name of the element carrying the `id`.
    pub element: &'a str,
    /// The base URI from the parser context, if any.
    pub base_uri: Option<&'a str>,
}

type UnknownNodeHook = Arc<dyn Fn(&UnknownNode<'_>) + Send + Sync>;
type UnreferencedObjectHook = Arc<dyn Fn(&UnreferencedObject<'_>) + Send + Sync>;

/// Callbacks invoked while a document is being deserialized.
///
/// Every hook is optional. Without hooks, unknown nodes are skipped silently.
/// For an unknown element or attribute, [`Self::on_unknown_node`] is called
/// first, then the specific hook. Hooks are called synchronously, in document
/// order, on the thread that deserializes.
///
/// Example:
/// ```
/// use savestream::xml::{DeserializationHooks, NodeKind};
///
/// let hooks = DeserializationHooks::new()
///     .on_unknown_element(|node| eprintln!("skipped <{}> at {}", node.name, node.path))
///     .on_unknown_node(|node| assert_ne!(node.kind, NodeKind::Attribute, "{node:?}"));
/// assert!(!hooks.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct DeserializationHooks {
    unknown_element: Option<UnknownNodeHook>,
    unknown_attribute: Option<UnknownNodeHook>,
    unknown_node: Option<UnknownNodeHook>,
    unreferenced_object: Option<UnreferencedObjectHook>,
}

impl DeserializationHooks {
    /// Create a set with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `hook` for each element that has no matching field.
    pub fn on_unknown_element(self, hook: impl Fn(&UnknownNode<'_>) + Send + Sync + 'static) -> Self {
        Self { unknown_element: Some(Arc::new(hook)), ..self }
    }

    /// Call `hook` for each attribute that has no matching field.
    ///
    /// Namespace declarations are never reported.
    pub fn on_unknown_attribute(self, hook: impl Fn(&UnknownNode<'_>) + Send + Sync + 'static) -> Self {
        Self { unknown_attribute: Some(Arc::new(hook)), ..self }
    }

    /// Call `hook` for every unknown node, including elements and attributes.
    ///
    /// Comments are reported here too once [`ReaderOptions::ignore_comments`]
    /// is turned off. They're reported after the value is mapped, before
    /// unreferenced objects.
    ///
    /// [`ReaderOptions::ignore_comments`]: super::ReaderOptions::ignore_comments
    pub fn on_unknown_node(self, hook: impl Fn(&UnknownNode<'_>) + Send + Sync + 'static) -> Self {
        Self { unknown_node: Some(Arc::new(hook)), ..self }
    }

    /// Call `hook` for each element whose `id` is never referenced.
    ///
    /// These are reported after the value has been deserialized successfully.
    pub fn on_unreferenced_object(self, hook: impl Fn(&UnreferencedObject<'_>) + Send + Sync + 'static) -> Self {
        Self { unreferenced_object: Some(Arc::new(hook)), ..self }
    }

    /// Check whether no hooks are set.
    pub fn is_empty(&self) -> bool {
        self.unknown_element.is_none()
            && self.unknown_attribute.is_none()
            && self.unknown_node.is_none()
            && self.unreferenced_object.is_none()
    }

    pub(crate) fn wants_unreferenced_objects(&self) -> bool {
        self.unreferenced_object.is_some()
    }

    /// Report a key the deserializer skipped.
    pub(crate) fn ignored(&self, path: &Path<'_>, base_uri: Option<&str>) {
        let Some((kind, name)) = classify(path) else {
            return;
        };
        let path = path.to_string();
        let node = UnknownNode { kind, name, path: &path, base_uri };
        tracing::trace!(?kind, name, path = node.path, "unknown node");
        if let Some(hook) = &self.unknown_node {
            hook(&node);
        }
        let specific = match kind {
            NodeKind::Element => self.unknown_element.as_ref(),
            NodeKind::Attribute => self.unknown_attribute.as_ref(),
            NodeKind::Comment | NodeKind::Other => None,
        };
        if let Some(hook) = specific {
            hook(&node);
        }
    }

    pub(crate) fn wants_comments(&self) -> bool {
        self.unknown_node.is_some()
    }

    /// Report a comment found inside the element at `path`.
    pub(crate) fn comment(&self, path: &str, base_uri: Option<&str>) {
        tracing::trace!(path, "comment");
        if let Some(hook) = &self.unknown_node {
            hook(&UnknownNode { kind: NodeKind::Comment, name: "#comment", path, base_uri });
        }
    }

    pub(crate) fn unreferenced(&self, object: &UnreferencedObject<'_>) {
        tracing::trace!(id = object.id, element = object.element, "unreferenced object");
        if let Some(hook) = &self.unreferenced_object {
            hook(object);
        }
    }
}

impl core::fmt::Debug for DeserializationHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeserializationHooks")
            .field("unknown_element", &self.unknown_element.is_some())
            .field("unknown_attribute", &self.unknown_attribute.is_some())
            .field("unknown_node", &self.unknown_node.is_some())
            .field("unreferenced_object", &self.unreferenced_object.is_some())
            .finish()
    }
}

/// Map a skipped deserializer key to the node it was read from.
///
/// The XML deserializer names attributes `@name`, character data `$text` or
/// `$value`, and child elements by their local name.
fn classify<'p>(path: &'p Path<'_>) -> Option<(NodeKind, &'p str)> {
    match path {
        Path::Map { key, .. } => {
            if key == "@xmlns" || key.starts_with("@xmlns:") {
                None
            } else if let Some(attribute) = key.strip_prefix('@') {
                Some((NodeKind::Attribute, attribute))
            } else if key == "$text" || key == "$value" {
                Some((NodeKind::Other, key.as_str()))
            } else {
                Some((NodeKind::Element, key.as_str()))
            }
        }
        _ => Some((NodeKind::Other, "$value")),
    }
}
