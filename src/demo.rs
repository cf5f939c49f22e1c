//! Lazily fetched label properties on a node-like owner.
//!
//! [`LazyInitialization`] owns a [`Node`] and exposes the same label three
//! ways, each backed by a slot that stays empty until the first read looks
//! the label up:
//!
//! 1. [`label_1`](LazyInitialization::label_1): read only.
//! 2. [`label_2`](LazyInitialization::label_2) with
//!    [`set_label_2`](LazyInitialization::set_label_2): read and overwrite.
//! 3. [`label_3`](LazyInitialization::label_3) with
//!    [`set_label_3`](LazyInitialization::set_label_3): the same contract
//!    written out by hand over an `Option` field.
//!
//! [`ready`](LazyInitialization::ready) walks through the transition of the
//! second property and logs what it observes at each step.

use std::rc::Rc;

use tracing::{error, info, info_span};

use crate::error::Result;
use crate::scene::{Label, Node};
use crate::LazyValue;

/// Name of the child label every property looks up by default.
pub const EXAMPLE_LABEL: &str = "ExampleLabel";

type LabelProducer = Box<dyn Fn() -> Result<Rc<Label>>>;
type LazyLabel = LazyValue<Rc<Label>, LabelProducer>;

/// One observation made by [`LazyInitialization::do_something`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
   pub step: u8,
   /// Whether the observation matched what the lazy contract promises.
   pub passed: bool,
   pub message: String,
}

impl Checkpoint {
   fn record(step: u8, passed: bool, message: String) -> Self {
      if passed {
         info!(step, "{message}");
      } else {
         error!(step, "{message}");
      }
      Self {
         step,
         passed,
         message,
      }
   }
}

pub struct LazyInitialization {
   node: Rc<Node>,
   label_path: String,
   label_1: LazyLabel,
   label_2: LazyLabel,
   label_3: Option<Rc<Label>>,
}

impl LazyInitialization {
   /// Creates an owner whose properties look up [`EXAMPLE_LABEL`] in `node`.
   pub fn new(node: Rc<Node>) -> Self {
      Self::with_label_path(node, EXAMPLE_LABEL)
   }

   /// Creates an owner whose properties look up `path` in `node`.
   pub fn with_label_path(node: Rc<Node>, path: impl Into<String>) -> Self {
      let label_path = path.into();
      Self {
         label_1: LazyValue::new(label_lookup(&node, &label_path)),
         label_2: LazyValue::new(label_lookup(&node, &label_path)),
         label_3: None,
         node,
         label_path,
      }
   }

   pub fn node(&self) -> &Rc<Node> {
      &self.node
   }

   pub fn label_1(&self) -> Result<&Rc<Label>> {
      self.label_1.try_get()
   }

   pub fn label_2(&self) -> Result<&Rc<Label>> {
      self.label_2.try_get()
   }

   pub fn set_label_2(&mut self, label: Rc<Label>) {
      self.label_2.set(label);
   }

   pub fn label_2_is_initialized(&self) -> bool {
      self.label_2.is_initialized()
   }

   /// Hand-written form of [`label_2`](Self::label_2).
   ///
   /// The backing field is a plain `Option`, so filling it on first read
   /// needs exclusive access.
   pub fn label_3(&mut self) -> Result<&Rc<Label>> {
      match &mut self.label_3 {
         Some(label) => Ok(&*label),
         slot @ None => {
            let label = self.node.get_node::<Rc<Label>>(&self.label_path)?;
            Ok(&*slot.insert(label))
         }
      }
   }

   pub fn set_label_3(&mut self, label: Rc<Label>) {
      self.label_3 = Some(label);
   }

   pub fn label_3_is_initialized(&self) -> bool {
      self.label_3.is_some()
   }

   /// Reads the second property once and reports its state before and after.
   ///
   /// A failed lookup is returned as soon as it happens; checkpoints logged
   /// up to that point stay logged.
   pub fn do_something(&self) -> Result<Vec<Checkpoint>> {
      let mut checkpoints = Vec::with_capacity(3);

      let before = !self.label_2_is_initialized();
      checkpoints.push(Checkpoint::record(
         1,
         before,
         if before {
            "1) label_2 is empty before its first read.".to_owned()
         } else {
            "1) label_2 is already filled before its first read!".to_owned()
         },
      ));

      let text = self.label_2()?.text();
      checkpoints.push(Checkpoint::record(
         2,
         true,
         format!("2) label_2 holds the text: \"{text}\""),
      ));

      let after = self.label_2_is_initialized();
      checkpoints.push(Checkpoint::record(
         3,
         after,
         if after {
            "3) label_2 is filled after its first read.".to_owned()
         } else {
            "3) label_2 is still empty after its first read!".to_owned()
         },
      ));

      Ok(checkpoints)
   }

   /// Lifecycle hook run once by the owner's harness after construction.
   pub fn ready(&self) -> Result<Vec<Checkpoint>> {
      let _span = info_span!("ready", node = self.node.name()).entered();
      info!("-----");
      info!("lazy initialization example running...");
      let checkpoints = self.do_something();
      info!("-----");
      checkpoints
   }
}

fn label_lookup(node: &Rc<Node>, path: &str) -> LabelProducer {
   let node = Rc::clone(node);
   let path = path.to_owned();
   Box::new(move || -> Result<Rc<Label>> { Ok(node.get_node(&path)?) })
}
