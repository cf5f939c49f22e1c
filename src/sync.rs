//! Thread-safe lazily produced cell.
//!
//! [`SyncLazyValue`] keeps the contract of [`LazyValue`](crate::LazyValue)
//! while allowing concurrent readers: the first caller to find the cell
//! empty claims it and runs the producer, everyone else parks until the
//! value is published. If production fails or panics the claim is released
//! and one of the waiting callers runs the producer in turn.
//!
//! Reads of an initialized cell are a single acquire load.

use core::cell::UnsafeCell;
#[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
use core::future::Future;
use core::ops::Deref;
use core::sync::atomic::Ordering;
use core::{fmt, mem};

use crate::state::InitState;

/// A thread-safe cell that runs its producer on the first read and caches
/// the result.
///
/// ```rust
/// use lazy_value::SyncLazyValue;
///
/// static BANNER: SyncLazyValue<String> = SyncLazyValue::new(|| "-----".repeat(2));
///
/// let readers: Vec<_> = (0..4).map(|_| std::thread::spawn(|| BANNER.len())).collect();
/// for reader in readers {
///    assert_eq!(reader.join().unwrap(), 10);
/// }
/// ```
///
/// A producer that reads its own cell deadlocks. [`try_set`](Self::try_set)
/// called from inside the producer fails instead of blocking.
pub struct SyncLazyValue<T, F = fn() -> T> {
   value: UnsafeCell<mem::MaybeUninit<T>>,
   state: InitState,
   producer: F,
}

impl<T, F> SyncLazyValue<T, F> {
   /// Creates an uninitialized cell that will call `producer` on first read.
   #[inline]
   #[must_use]
   pub const fn new(producer: F) -> Self {
      Self {
         value: UnsafeCell::new(mem::MaybeUninit::uninit()),
         state: InitState::uninit(),
         producer,
      }
   }

   /// Creates a cell that already holds `value`.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T, producer: F) -> Self {
      Self {
         value: UnsafeCell::new(mem::MaybeUninit::new(value)),
         state: InitState::ready(),
         producer,
      }
   }

   /// Whether a value is published. Never blocks and never runs the producer.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.state.is_ready(Ordering::Acquire)
   }

   /// Returns the value if it is published. Never blocks.
   #[inline]
   pub fn peek(&self) -> Option<&T> {
      if self.is_initialized() {
         // SAFETY: the acquire load saw READY, so the slot is written.
         Some(unsafe { self.value_unchecked() })
      } else {
         None
      }
   }

   /// Returns the value mutably if it is published.
   #[inline]
   pub fn peek_mut(&mut self) -> Option<&mut T> {
      if self.is_initialized() {
         // SAFETY: READY is set and `&mut self` excludes every other access.
         Some(unsafe { self.value_unchecked_mut() })
      } else {
         None
      }
   }

   /// Initializes the cell with `value` unless it is initialized already or
   /// another caller is producing right now. Never blocks.
   pub fn try_set(&self, value: T) -> Result<&T, T> {
      let Some(guard) = self.state.try_claim() else {
         return Err(value);
      };
      // SAFETY: the guard gives us exclusive write access to the slot.
      let stored = unsafe { (*self.value.get()).write(value) };
      guard.publish();
      Ok(stored)
   }

   /// Stores `value`, bypassing the producer, and returns the value it
   /// replaced.
   ///
   /// Overwriting needs `&mut self`: readers may still hold `&T` into the
   /// slot while the cell is shared.
   pub fn set(&mut self, value: T) -> Option<T> {
      if self.state.publish() {
         self.value.get_mut().write(value);
         None
      } else {
         // SAFETY: READY was already set and we have exclusive access.
         Some(mem::replace(unsafe { self.value_unchecked_mut() }, value))
      }
   }

   /// Consumes the cell and returns its value, if one was ever stored.
   pub fn into_inner(mut self) -> Option<T> {
      if self.state.clear() {
         // SAFETY: the slot was written; clearing READY first keeps `Drop`
         // from dropping it a second time.
         Some(unsafe { self.value.get_mut().assume_init_read() })
      } else {
         None
      }
   }

   /// # Safety
   ///
   /// The cell must be initialized.
   #[inline]
   unsafe fn value_unchecked(&self) -> &T {
      debug_assert!(self.is_initialized());
      (*self.value.get()).assume_init_ref()
   }

   /// # Safety
   ///
   /// The cell must be initialized.
   #[inline]
   unsafe fn value_unchecked_mut(&mut self) -> &mut T {
      debug_assert!(self.is_initialized());
      self.value.get_mut().assume_init_mut()
   }
}

impl<T, F: Fn() -> T> SyncLazyValue<T, F> {
   /// Returns the value, running the producer first if the cell is empty.
   ///
   /// Blocks while another thread is producing.
   #[inline]
   pub fn get(&self) -> &T {
      if let Some(value) = self.peek() {
         return value;
      }
      self.produce();
      // SAFETY: `produce` returns only after a value has been published.
      unsafe { self.value_unchecked() }
   }

   /// Returns the value mutably, running the producer first if needed.
   pub fn get_mut(&mut self) -> &mut T {
      if !self.is_initialized() {
         let value = (self.producer)();
         self.value.get_mut().write(value);
         self.state.publish();
      }
      // SAFETY: published just above or earlier.
      unsafe { self.value_unchecked_mut() }
   }

   #[cold]
   fn produce(&self) {
      let Some(guard) = self.state.claim() else {
         return;
      };
      let value = (self.producer)();
      // SAFETY: the guard gives us exclusive write access to the slot.
      unsafe { (*self.value.get()).write(value) };
      guard.publish();
   }
}

impl<T, E, F: Fn() -> Result<T, E>> SyncLazyValue<T, F> {
   /// Returns the value, running the fallible producer first if the cell is
   /// empty.
   ///
   /// On `Err` nothing is stored, the error is returned as-is, and any
   /// caller parked on this cell wakes up and tries the producer itself.
   pub fn try_get(&self) -> Result<&T, E> {
      if let Some(value) = self.peek() {
         return Ok(value);
      }
      self.try_produce()?;
      // SAFETY: `try_produce` returned `Ok`, so a value is published.
      Ok(unsafe { self.value_unchecked() })
   }

   /// Mutable form of [`try_get`](Self::try_get).
   pub fn try_get_mut(&mut self) -> Result<&mut T, E> {
      if !self.is_initialized() {
         let value = (self.producer)()?;
         self.value.get_mut().write(value);
         self.state.publish();
      }
      // SAFETY: published just above or earlier.
      Ok(unsafe { self.value_unchecked_mut() })
   }

   #[cold]
   fn try_produce(&self) -> Result<(), E> {
      let Some(guard) = self.state.claim() else {
         return Ok(());
      };
      // An early return drops the guard, which resets the cell.
      let value = (self.producer)()?;
      // SAFETY: the guard gives us exclusive write access to the slot.
      unsafe { (*self.value.get()).write(value) };
      guard.publish();
      Ok(())
   }
}

#[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
impl<T, F, Fut> SyncLazyValue<T, F>
where
   F: Fn() -> Fut,
   Fut: Future<Output = T>,
{
   /// Returns the value, awaiting the producer's future first if the cell is
   /// empty. Concurrent callers wait for the claimant instead of polling a
   /// second future.
   pub async fn get_async(&self) -> &T {
      if let Some(value) = self.peek() {
         return value;
      }
      if let Some(guard) = self.state.claim_async().await {
         let value = (self.producer)().await;
         // SAFETY: the guard gives us exclusive write access to the slot.
         unsafe { (*self.value.get()).write(value) };
         guard.publish();
      }
      // SAFETY: either we published above or `claim_async` saw READY.
      unsafe { self.value_unchecked() }
   }
}

#[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
impl<T, E, F, Fut> SyncLazyValue<T, F>
where
   F: Fn() -> Fut,
   Fut: Future<Output = Result<T, E>>,
{
   /// Fallible form of [`get_async`](Self::get_async).
   ///
   /// Dropping the returned future mid-production releases the claim, the
   /// same as a producer error.
   pub async fn try_get_async(&self) -> Result<&T, E> {
      if let Some(value) = self.peek() {
         return Ok(value);
      }
      if let Some(guard) = self.state.claim_async().await {
         let value = (self.producer)().await?;
         // SAFETY: the guard gives us exclusive write access to the slot.
         unsafe { (*self.value.get()).write(value) };
         guard.publish();
      }
      // SAFETY: either we published above or `claim_async` saw READY.
      Ok(unsafe { self.value_unchecked() })
   }
}

impl<T, F: Fn() -> T> Deref for SyncLazyValue<T, F> {
   type Target = T;

   #[inline]
   fn deref(&self) -> &T {
      self.get()
   }
}

impl<T: Default> Default for SyncLazyValue<T> {
   /// Creates a cell producing `T::default()` on first read.
   #[inline]
   fn default() -> Self {
      Self::new(T::default)
   }
}

impl<T: fmt::Debug, F> fmt::Debug for SyncLazyValue<T, F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("SyncLazyValue");
      match self.peek() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

// SAFETY: shared callers read `T` concurrently (`T: Sync`), the thread that
// produced it need not be the one that drops it (`T: Send`), and any of them
// may call the producer through `&F` (`F: Sync`). Writes to the slot happen
// only under a `ProductionGuard`.
unsafe impl<T: Send + Sync, F: Sync> Sync for SyncLazyValue<T, F> {}

impl<T, F> Drop for SyncLazyValue<T, F> {
   fn drop(&mut self) {
      if self.state.is_ready(Ordering::Relaxed) {
         // SAFETY: READY is set, we have exclusive access, and the slot is
         // never touched again.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }
}
