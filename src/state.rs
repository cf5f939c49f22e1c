//! Atomic initialization state for [`SyncLazyValue`](crate::SyncLazyValue).
//!
//! The whole state lives in one `AtomicU8`:
//! - bit 0 `READY`: the value slot is written and may be read
//! - bit 1 `BUSY`: one caller has claimed the cell and is running the producer
//! - bit 2 `PARKED`: at least one caller sleeps on the state address
//! - bits 3..8: generation, bumped whenever production finishes or is abandoned
//!
//! Readers only need an acquire load of `READY`. Callers that find the cell
//! `BUSY` park on the state address through `parking_lot_core` and are woken
//! when the claimant publishes a value or gives up.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

/// Rounds of `yield_now` an async caller spends before falling back to blocking.
#[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
const YIELD_ROUNDS: usize = 32;

/// Result of one attempt at claiming the cell.
enum Claim<'a> {
   /// A value is already published.
   Ready,
   /// The caller now owns production.
   Claimed(ProductionGuard<'a>),
   /// Someone else is producing; carries the state word that was observed.
   Busy(u8),
}

#[repr(transparent)]
pub(crate) struct InitState(AtomicU8);

impl InitState {
   const READY: u8 = 1 << 0;
   const BUSY: u8 = 1 << 1;
   const PARKED: u8 = 1 << 2;
   const GENERATION_STEP: u8 = 1 << 3;
   const GENERATION_MASK: u8 = !(Self::READY | Self::BUSY | Self::PARKED);

   #[inline]
   pub(crate) const fn uninit() -> Self {
      Self(AtomicU8::new(0))
   }

   #[inline]
   pub(crate) const fn ready() -> Self {
      Self(AtomicU8::new(Self::READY))
   }

   #[inline]
   pub(crate) fn is_ready(&self, order: Ordering) -> bool {
      self.0.load(order) & Self::READY != 0
   }

   /// Address used as the parking key.
   #[inline(always)]
   fn key(&self) -> usize {
      core::ptr::addr_of!(self.0) as usize
   }

   fn wake_all(&self) {
      // SAFETY: `sleep` parks on the same key and none of our callbacks touch
      // the parking lot.
      unsafe {
         parking_lot_core::unpark_all(self.key(), DEFAULT_UNPARK_TOKEN);
      }
   }

   /// Sleeps until the state word moves away from `observed`.
   ///
   /// Spurious wakeups are possible; callers re-check in a loop.
   fn sleep(&self, observed: u8) {
      // SAFETY: see `wake_all`. The validate closure only performs a load.
      unsafe {
         let _ = parking_lot_core::park(
            self.key(),
            || self.0.load(Ordering::Acquire) == observed,
            || {},
            |_, _| {},
            DEFAULT_PARK_TOKEN,
            None,
         );
      }
   }

   /// Replaces the word with a fresh generation, `READY` set or not, and
   /// wakes sleepers. Returns the previous word.
   fn transition(&self, ready: bool) -> u8 {
      let current = self.0.load(Ordering::Relaxed);
      let generation =
         (current & Self::GENERATION_MASK).wrapping_add(Self::GENERATION_STEP) & Self::GENERATION_MASK;
      let next = if ready { generation | Self::READY } else { generation };

      // Release pairs with the acquire loads in `is_ready` and `claim_step`,
      // so a reader that sees READY also sees the written value.
      let previous = self.0.swap(next, Ordering::Release);
      if previous & Self::PARKED != 0 {
         self.wake_all();
      }
      previous
   }

   /// Marks the cell ready. Returns `true` if it was not ready before.
   ///
   /// Callers hold a [`ProductionGuard`] or exclusive access to the cell.
   #[inline]
   pub(crate) fn publish(&self) -> bool {
      self.transition(true) & Self::READY == 0
   }

   /// Marks the cell uninitialized. Returns `true` if it was ready before.
   ///
   /// Callers hold a [`ProductionGuard`] or exclusive access to the cell.
   #[inline]
   pub(crate) fn clear(&self) -> bool {
      self.transition(false) & Self::READY != 0
   }

   fn claim_step(&self, may_park: bool) -> Claim<'_> {
      loop {
         let current = self.0.load(Ordering::Acquire);
         if current & Self::READY != 0 {
            return Claim::Ready;
         }

         if current & Self::BUSY == 0 {
            let claimed = self.0.compare_exchange_weak(
               current,
               current | Self::BUSY,
               Ordering::Acquire,
               Ordering::Relaxed,
            );
            if claimed.is_ok() {
               return Claim::Claimed(ProductionGuard { state: self });
            }
         } else if !may_park || current & Self::PARKED != 0 {
            return Claim::Busy(current);
         } else {
            let flagged = self.0.compare_exchange_weak(
               current,
               current | Self::PARKED,
               Ordering::Relaxed,
               Ordering::Relaxed,
            );
            if flagged.is_ok() {
               return Claim::Busy(current | Self::PARKED);
            }
         }
         core::hint::spin_loop();
      }
   }

   /// Claims production, parking while another caller holds the claim.
   ///
   /// Returns `None` once a value is published.
   pub(crate) fn claim(&self) -> Option<ProductionGuard<'_>> {
      loop {
         match self.claim_step(true) {
            Claim::Ready => return None,
            Claim::Claimed(guard) => return Some(guard),
            Claim::Busy(observed) => self.sleep(observed),
         }
      }
   }

   /// Claims production only if nobody else holds the claim right now.
   pub(crate) fn try_claim(&self) -> Option<ProductionGuard<'_>> {
      match self.claim_step(false) {
         Claim::Claimed(guard) => Some(guard),
         Claim::Ready | Claim::Busy(_) => None,
      }
   }

   /// Async flavor of [`claim`](Self::claim).
   ///
   /// Yields to the runtime while the claim is held elsewhere. On a
   /// multi-threaded runtime it eventually blocks the worker in place instead
   /// of spinning forever.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   pub(crate) async fn claim_async(&self) -> Option<ProductionGuard<'_>> {
      loop {
         let observed = match self.claim_step(false) {
            Claim::Ready => return None,
            Claim::Claimed(guard) => return Some(guard),
            Claim::Busy(observed) => observed,
         };

         for _ in 0..YIELD_ROUNDS {
            tokio::task::yield_now().await;
            if self.0.load(Ordering::Relaxed) != observed {
               break;
            }
         }

         if self.0.load(Ordering::Relaxed) == observed && on_multi_thread_runtime() {
            #[cfg(feature = "async-tokio-mt")]
            return tokio::task::block_in_place(|| self.claim());
         }
      }
   }
}

#[cfg(feature = "async-tokio-mt")]
fn on_multi_thread_runtime() -> bool {
   tokio::runtime::Handle::try_current()
      .map(|handle| handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread)
      .unwrap_or(false)
}

#[cfg(all(feature = "async-tokio", not(feature = "async-tokio-mt")))]
fn on_multi_thread_runtime() -> bool {
   false
}

/// Exclusive right to run the producer and write the value slot.
///
/// Dropping the guard without [`publish`](Self::publish) (producer error,
/// panic, or a cancelled future) resets the cell to uninitialized and wakes
/// everyone parked on it so one of them can retry.
pub(crate) struct ProductionGuard<'a> {
   state: &'a InitState,
}

impl ProductionGuard<'_> {
   /// Marks the value as written and releases the claim.
   #[inline]
   pub(crate) fn publish(self) {
      self.state.publish();
      mem::forget(self);
   }
}

impl Drop for ProductionGuard<'_> {
   #[inline]
   fn drop(&mut self) {
      self.state.clear();
   }
}
