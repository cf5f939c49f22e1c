//! Cells that produce their value on the first read and cache it for every
//! later read.
//!
//! - [`LazyValue<T, F>`]: single-threaded. Holds an optional value and a
//!   producer; the first [`get`](LazyValue::get) runs the producer and stores
//!   the result, later reads return the stored value.
//! - [`SyncLazyValue<T, F>`]: the same contract for cells shared between
//!   threads. Concurrent first readers park until one of them has produced
//!   the value, using `parking_lot`'s futex-based parking.
//!
//! Both cells accept fallible producers through `try_get`. A failed
//! production stores nothing, so the next read tries again. Both also accept
//! an explicit overwrite with `set`, which bypasses the producer and leaves
//! the cell initialized. There is no way back to the uninitialized state.
//!
//! # Examples
//!
//! ## Lazily fetched property
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use lazy_value::demo::{LazyInitialization, EXAMPLE_LABEL};
//! use lazy_value::scene::{Label, Node};
//!
//! let node = Node::new("Root").with_child(EXAMPLE_LABEL, Label::new("Hello!"));
//! let owner = LazyInitialization::new(Rc::new(node));
//!
//! assert!(!owner.label_2_is_initialized());
//! assert_eq!(owner.label_2().unwrap().text(), "Hello!");
//! assert!(owner.label_2_is_initialized());
//! ```
//!
//! ## Retrying a failed production
//!
//! ```rust
//! use std::cell::Cell;
//!
//! use lazy_value::LazyValue;
//!
//! let attempts = Cell::new(0);
//! let config = LazyValue::new(|| {
//!    attempts.set(attempts.get() + 1);
//!    if attempts.get() < 2 { Err("not yet") } else { Ok(attempts.get()) }
//! });
//!
//! assert_eq!(config.try_get(), Err("not yet"));
//! assert!(!config.is_initialized());
//! assert_eq!(config.try_get(), Ok(&2));
//! assert_eq!(config.try_get(), Ok(&2));
//! ```

/// Lookups driving the demo properties.
pub mod scene;

/// Demo owner with lazily fetched label properties.
pub mod demo;

/// Error types for producers.
pub mod error;

/// Single-threaded cell.
mod lazy;

/// Internal synchronization state management.
mod state;

/// Thread-safe cell.
mod sync;

pub use error::{Error, LookupError, Result};
pub use lazy::LazyValue;
pub use sync::SyncLazyValue;
