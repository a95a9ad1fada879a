//! The result type of a query: a list of located values.

use std::slice::Iter;

use serde_json::Value;

use crate::path::{NormalizedPath, PathElement};

/// A value produced while evaluating a query.
///
/// Most nodes simply borrow a value out of the document that was queried. The non-standard key
/// selectors are the exception: `~`, `~?expr`, and `~'name'` all yield the key string itself as
/// a value, and a key is not part of the [`Value`] tree, so it cannot be borrowed from it. Those
/// selectors produce [`NodeValue::Owned`] instead.
#[derive(Debug, Clone)]
pub enum NodeValue<'a> {
    Ref(&'a Value),
    Owned(Value),
}

impl<'a> NodeValue<'a> {
    pub fn as_value(&self) -> &Value {
        match self {
            NodeValue::Ref(v) => v,
            NodeValue::Owned(v) => v,
        }
    }

    pub fn into_owned(self) -> Value {
        match self {
            NodeValue::Ref(v) => v.clone(),
            NodeValue::Owned(v) => v,
        }
    }
}

impl PartialEq for NodeValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_value() == other.as_value()
    }
}

impl PartialEq<Value> for NodeValue<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == other
    }
}

/// A single located value produced while evaluating a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub(crate) value: NodeValue<'a>,
    pub(crate) location: NormalizedPath,
}

impl<'a> Node<'a> {
    pub(crate) fn root(value: &'a Value) -> Self {
        Self {
            value: NodeValue::Ref(value),
            location: NormalizedPath::default(),
        }
    }

    /// The value at this location.
    pub fn value(&self) -> &Value {
        self.value.as_value()
    }

    /// The normalized path from the document root to this node.
    pub fn location(&self) -> &NormalizedPath {
        &self.location
    }

    /// The path element identifying this node within its immediate parent, if any.
    ///
    /// This is `None` only for the root node itself.
    pub fn key(&self) -> Option<&PathElement> {
        self.location.last()
    }
}

/// A list of nodes resulting from a JSONPath query.
#[derive(Debug, Default, PartialEq)]
pub struct NodeList<'a>(pub(crate) Vec<Node<'a>>);

impl<'a> NodeList<'a> {
    pub(crate) fn new(nodes: Vec<Node<'a>>) -> Self {
        Self(nodes)
    }

    /// Extract _at most_ one node from a [`NodeList`].
    pub fn at_most_one(&self) -> Result<Option<&Value>, AtMostOneError> {
        match self.0.len() {
            0 => Ok(None),
            1 => Ok(Some(self.0[0].value())),
            n => Err(AtMostOneError(n)),
        }
    }

    /// Extract _exactly_ one node from a [`NodeList`].
    pub fn exactly_one(&self) -> Result<&Value, ExactlyOneError> {
        match self.0.len() {
            0 => Err(ExactlyOneError::Empty),
            1 => Ok(self.0[0].value()),
            n => Err(ExactlyOneError::MoreThanOne(n)),
        }
    }

    /// All values yielded by the query, in document order.
    pub fn all(&self) -> Vec<&Value> {
        self.0.iter().map(Node::value).collect()
    }

    /// Alias for [`all`][NodeList::all].
    pub fn values(&self) -> Vec<&Value> {
        self.all()
    }

    /// The normalized paths of every node yielded by the query, in document order.
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|n| n.location.to_string()).collect()
    }

    /// The key identifying each node within its immediate parent, in document order.
    ///
    /// `None` for a node produced by querying the document root itself.
    pub fn keys(&self) -> Vec<Option<PathElement>> {
        self.0.iter().map(|n| n.key().cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Node<'a>> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first().map(Node::value)
    }

    pub fn last(&self) -> Option<&Value> {
        self.0.last().map(Node::value)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).map(Node::value)
    }

    pub(crate) fn push(&mut self, node: Node<'a>) {
        self.0.push(node);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("nodelist expected to contain at most one entry, but instead contains {0} entries")]
pub struct AtMostOneError(pub usize);

#[derive(Debug, thiserror::Error)]
pub enum ExactlyOneError {
    #[error("nodelist expected to contain one entry, but is empty")]
    Empty,
    #[error("nodelist expected to contain one entry, but instead contains {0} entries")]
    MoreThanOne(usize),
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = Node<'a>;
    type IntoIter = std::vec::IntoIter<Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b NodeList<'a> {
    type Item = &'b Node<'a>;
    type IntoIter = Iter<'b, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
