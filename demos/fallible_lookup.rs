use std::rc::Rc;

use lazy_value::demo::{LazyInitialization, EXAMPLE_LABEL};
use lazy_value::scene::{Label, Node};
use tracing_subscriber::EnvFilter;

fn main() {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .init();

   // The label is not in the tree yet, so the first read fails.
   let mut owner = LazyInitialization::new(Rc::new(Node::new("Root")));
   match owner.label_2() {
      Ok(_) => panic!("lookup should have failed"),
      Err(err) => println!("Caught error: {err}"),
   }
   assert!(!owner.label_2_is_initialized());

   // A label supplied through the setter is used without any lookup.
   owner.set_label_2(Rc::new(Label::new("Assigned directly")));
   println!("Got label: {}", owner.label_2().map(|l| l.text()).unwrap_or_default());

   // A fresh owner over a tree that has the label succeeds on first read.
   let node = Node::new("Root").with_child(EXAMPLE_LABEL, Label::new("Found in the tree"));
   let owner = LazyInitialization::new(Rc::new(node));
   match owner.label_1() {
      Ok(label) => println!("Got label: {}", label.text()),
      Err(err) => panic!("lookup should have succeeded: {err}"),
   }
}
