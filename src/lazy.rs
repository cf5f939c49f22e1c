//! Single-threaded lazily produced cell.
//!
//! [`LazyValue`] is the "fill the backing field on first read" pattern as a
//! reusable type. It is deliberately `!Sync`: sharing one across threads
//! would let two readers both see an empty slot and both run the producer.
//! Use [`SyncLazyValue`](crate::SyncLazyValue) when the cell must be shared.

use core::ops::Deref;
use core::{fmt, mem};
use std::cell::OnceCell;

/// A cell that runs its producer on the first read and caches the result.
///
/// The producer is kept for the life of the cell so that a failed
/// [`try_get`](Self::try_get) can be retried on the next read. It is never
/// called again once a value is stored, whether that value came from the
/// producer or from [`set`](Self::set).
///
/// A producer that reads its own cell recurses without bound.
///
/// ```rust
/// use lazy_value::LazyValue;
///
/// let greeting = LazyValue::new(|| "hello".to_string());
/// assert!(!greeting.is_initialized());
/// assert_eq!(greeting.get(), "hello");
/// assert!(greeting.is_initialized());
/// ```
pub struct LazyValue<T, F = fn() -> T> {
   value: OnceCell<T>,
   producer: F,
}

impl<T, F> LazyValue<T, F> {
   /// Creates an uninitialized cell that will call `producer` on first read.
   #[inline]
   #[must_use]
   pub const fn new(producer: F) -> Self {
      Self {
         value: OnceCell::new(),
         producer,
      }
   }

   /// Creates a cell that already holds `value`. The producer only runs if
   /// the value is never there, which for this constructor means never.
   #[inline]
   #[must_use]
   pub fn with_value(value: T, producer: F) -> Self {
      Self {
         value: OnceCell::from(value),
         producer,
      }
   }

   /// Whether a value is stored. Never runs the producer.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.value.get().is_some()
   }

   /// Returns the stored value without producing one.
   #[inline]
   pub fn peek(&self) -> Option<&T> {
      self.value.get()
   }

   /// Returns the stored value mutably without producing one.
   #[inline]
   pub fn peek_mut(&mut self) -> Option<&mut T> {
      self.value.get_mut()
   }

   /// Stores `value`, bypassing the producer.
   ///
   /// Returns the value it replaced, if the cell was already initialized.
   #[inline]
   pub fn set(&mut self, value: T) -> Option<T> {
      mem::replace(&mut self.value, OnceCell::from(value)).into_inner()
   }

   /// Consumes the cell and returns its value, if one was ever stored.
   #[inline]
   pub fn into_inner(self) -> Option<T> {
      self.value.into_inner()
   }
}

impl<T, F: Fn() -> T> LazyValue<T, F> {
   /// Returns the value, running the producer first if the cell is empty.
   #[inline]
   pub fn get(&self) -> &T {
      if let Some(value) = self.value.get() {
         return value;
      }
      let value = (self.producer)();
      self.value.get_or_init(|| value)
   }
}

impl<T, E, F: Fn() -> Result<T, E>> LazyValue<T, F> {
   /// Returns the value, running the fallible producer first if the cell is
   /// empty.
   ///
   /// On `Err` nothing is stored and the error is returned as-is; the next
   /// call runs the producer again.
   pub fn try_get(&self) -> Result<&T, E> {
      if let Some(value) = self.value.get() {
         return Ok(value);
      }
      let value = (self.producer)()?;
      Ok(self.value.get_or_init(|| value))
   }
}

impl<T, F: Fn() -> T> Deref for LazyValue<T, F> {
   type Target = T;

   #[inline]
   fn deref(&self) -> &T {
      self.get()
   }
}

impl<T: Default> Default for LazyValue<T> {
   /// Creates a cell producing `T::default()` on first read.
   #[inline]
   fn default() -> Self {
      Self::new(T::default)
   }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyValue<T, F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("LazyValue");
      match self.peek() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}
