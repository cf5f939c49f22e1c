use std::rc::Rc;

use lazy_value::demo::{LazyInitialization, EXAMPLE_LABEL};
use lazy_value::scene::{Label, Node};
use tracing_subscriber::EnvFilter;

fn main() -> lazy_value::Result<()> {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .init();

   let node = Node::new("LazyInitialization")
      .with_child(EXAMPLE_LABEL, Label::new("I was fetched on first access."));
   let owner = LazyInitialization::new(Rc::new(node));

   let checkpoints = owner.ready()?;
   let failed = checkpoints.iter().filter(|c| !c.passed).count();
   println!("{} checkpoints, {failed} unexpected", checkpoints.len());
   Ok(())
}
