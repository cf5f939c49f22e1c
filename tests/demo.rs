use std::rc::Rc;

use lazy_value::demo::{LazyInitialization, EXAMPLE_LABEL};
use lazy_value::scene::{Label, Node};
use lazy_value::{Error, LookupError};

fn scene_with_label(text: &str) -> Rc<Node> {
   Rc::new(Node::new("LazyInitialization").with_child(EXAMPLE_LABEL, Label::new(text)))
}

#[test]
fn test_ready_reports_three_passing_checkpoints() {
   let owner = LazyInitialization::new(scene_with_label("Hello, lazy world"));

   let checkpoints = owner.ready().unwrap();
   assert_eq!(checkpoints.len(), 3);
   assert!(checkpoints.iter().all(|c| c.passed));
   assert_eq!(
      checkpoints.iter().map(|c| c.step).collect::<Vec<_>>(),
      vec![1, 2, 3]
   );
   assert_eq!(checkpoints[1].message, "2) label_2 holds the text: \"Hello, lazy world\"");
   assert!(owner.label_2_is_initialized());
}

#[test]
fn test_do_something_flags_prefilled_property() {
   let mut owner = LazyInitialization::new(scene_with_label("from the tree"));
   owner.set_label_2(Rc::new(Label::new("assigned")));

   let checkpoints = owner.do_something().unwrap();
   assert!(!checkpoints[0].passed);
   assert_eq!(checkpoints[1].message, "2) label_2 holds the text: \"assigned\"");
   assert!(checkpoints[2].passed);
}

#[test]
fn test_properties_cache_the_same_label() {
   let node = scene_with_label("cached");
   let owner = LazyInitialization::new(Rc::clone(&node));

   let first = Rc::clone(owner.label_1().unwrap());
   let again = owner.label_1().unwrap();
   assert!(Rc::ptr_eq(&first, again));

   let expected: Rc<Label> = node.get_node(EXAMPLE_LABEL).unwrap();
   assert!(Rc::ptr_eq(&first, &expected));
   assert!(Rc::ptr_eq(owner.label_2().unwrap(), &expected));
}

#[test]
fn test_hand_written_property() {
   let mut owner = LazyInitialization::new(scene_with_label("by hand"));
   assert!(!owner.label_3_is_initialized());

   assert_eq!(owner.label_3().unwrap().text(), "by hand");
   assert!(owner.label_3_is_initialized());

   owner.set_label_3(Rc::new(Label::new("replaced")));
   assert_eq!(owner.label_3().unwrap().text(), "replaced");
}

#[test]
fn test_missing_label_fails_and_leaves_property_empty() {
   let mut owner = LazyInitialization::new(Rc::new(Node::new("Empty")));

   let err = owner.label_2().unwrap_err();
   assert_eq!(
      err,
      Error::ProductionFailed(LookupError::Missing {
         parent: "Empty".into(),
         path: EXAMPLE_LABEL.into(),
      })
   );
   assert!(!owner.label_2_is_initialized());
   assert!(owner.ready().is_err());
   assert!(owner.label_3().is_err());
   assert!(!owner.label_3_is_initialized());

   owner.set_label_2(Rc::new(Label::new("supplied later")));
   assert_eq!(owner.label_2().unwrap().text(), "supplied later");
}

#[test]
fn test_error_message_names_the_lookup() {
   let owner = LazyInitialization::new(Rc::new(Node::new("Root")));
   let err = owner.label_1().unwrap_err();
   assert_eq!(
      err.to_string(),
      "value production failed: node `Root` has no child at `ExampleLabel`"
   );
}

#[test]
fn test_label_path_through_nested_nodes() {
   let hud = Node::new("Hud").with_child("Score", Label::new("0 points"));
   let root = Rc::new(Node::new("Root").with_child("Hud", hud));
   let owner = LazyInitialization::with_label_path(root, "Hud/Score");

   assert_eq!(owner.label_1().unwrap().text(), "0 points");
}

#[test]
fn test_get_node_kind_mismatch() {
   let root = Node::new("Root")
      .with_child("Hud", Node::new("Hud"))
      .with_child("Title", Label::new("title"));

   assert_eq!(
      root.get_node::<Rc<Label>>("Hud").unwrap_err(),
      LookupError::WrongKind {
         path: "Hud".into(),
         expected: "label",
      }
   );
   // A label cannot have children.
   assert_eq!(
      root.get_node::<Rc<Label>>("Title/Inner").unwrap_err(),
      LookupError::Missing {
         parent: "Root".into(),
         path: "Title/Inner".into(),
      }
   );
   assert_eq!(root.get_node::<Rc<Node>>("Hud").unwrap().name(), "Hud");
}

#[test]
fn test_add_child_replaces() {
   let mut root = Node::new("Root");
   assert!(root.add_child(EXAMPLE_LABEL, Label::new("old")).is_none());
   assert!(root.add_child(EXAMPLE_LABEL, Label::new("new")).is_some());

   let owner = LazyInitialization::new(Rc::new(root));
   assert_eq!(owner.label_1().unwrap().text(), "new");
   assert_eq!(owner.node().name(), "Root");
}
