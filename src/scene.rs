//! A minimal named-child registry.
//!
//! This is just enough of a node tree for a lazily initialized property to
//! look something up in: nodes own named children, children are labels or
//! further nodes, and [`Node::get_node`] fetches a typed child by name or by
//! a `/`-separated path.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::LookupError;

/// A text label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
   text: String,
}

impl Label {
   /// Creates a label showing `text`.
   pub fn new(text: impl Into<String>) -> Self {
      Self { text: text.into() }
   }

   /// The text the label shows.
   pub fn text(&self) -> &str {
      &self.text
   }
}

/// Anything a node can hold under a name.
#[derive(Debug, Clone)]
pub enum Child {
   Label(Rc<Label>),
   Node(Rc<Node>),
}

impl From<Label> for Child {
   fn from(label: Label) -> Self {
      Self::Label(Rc::new(label))
   }
}

impl From<Rc<Label>> for Child {
   fn from(label: Rc<Label>) -> Self {
      Self::Label(label)
   }
}

impl From<Node> for Child {
   fn from(node: Node) -> Self {
      Self::Node(Rc::new(node))
   }
}

/// Types [`Node::get_node`] can hand out.
pub trait FromChild: Sized {
   /// Human readable kind, used in [`LookupError::WrongKind`].
   const KIND: &'static str;

   fn from_child(child: &Child) -> Option<Self>;
}

impl FromChild for Rc<Label> {
   const KIND: &'static str = "label";

   fn from_child(child: &Child) -> Option<Self> {
      match child {
         Child::Label(label) => Some(Rc::clone(label)),
         Child::Node(_) => None,
      }
   }
}

impl FromChild for Rc<Node> {
   const KIND: &'static str = "node";

   fn from_child(child: &Child) -> Option<Self> {
      match child {
         Child::Node(node) => Some(Rc::clone(node)),
         Child::Label(_) => None,
      }
   }
}

/// A named entry in the tree owning its children by name.
#[derive(Debug, Default)]
pub struct Node {
   name: String,
   children: HashMap<String, Child>,
}

impl Node {
   /// Creates a node called `name` with no children.
   pub fn new(name: impl Into<String>) -> Self {
      Self {
         name: name.into(),
         children: HashMap::new(),
      }
   }

   /// Builder form of [`add_child`](Self::add_child).
   #[must_use]
   pub fn with_child(mut self, name: impl Into<String>, child: impl Into<Child>) -> Self {
      self.add_child(name, child);
      self
   }

   /// Adds or replaces the child stored under `name`.
   pub fn add_child(&mut self, name: impl Into<String>, child: impl Into<Child>) -> Option<Child> {
      self.children.insert(name.into(), child.into())
   }

   /// The node's own name, used in lookup errors.
   pub fn name(&self) -> &str {
      &self.name
   }

   /// Fetches the child at `path` as a `T`.
   ///
   /// `path` is one child name or several joined by `/`; every segment but
   /// the last must name a nested node.
   pub fn get_node<T: FromChild>(&self, path: &str) -> Result<T, LookupError> {
      let missing = || LookupError::Missing {
         parent: self.name.clone(),
         path: path.to_owned(),
      };

      let mut segments = path.split('/').filter(|segment| !segment.is_empty());
      let mut current = segments.next().and_then(|name| self.children.get(name)).ok_or_else(missing)?;
      for segment in segments {
         let Child::Node(node) = current else {
            return Err(missing());
         };
         current = node.children.get(segment).ok_or_else(missing)?;
      }

      T::from_child(current).ok_or_else(|| LookupError::WrongKind {
         path: path.to_owned(),
         expected: T::KIND,
      })
   }
}
