//! Interrupt-safe single-producer/single-consumer ring.
//!
//! Backs the scheduler's `interrupt_queue`. Exactly one producer (an ISR,
//! via [`SpscRing::try_push`]) and one consumer (the mainline dispatcher,
//! via [`SpscRing::try_pop`]) may operate on a given ring; using either
//! method from more than one context at a time is undefined behavior at the
//! scheduler level, though this type itself only relies on the single
//! producer / single consumer contract, not on which contexts they run in.
//!
//! `head` is owned by the producer, `tail` by the consumer. Each side only
//! ever reads the other's index, never writes it, and the lock-free
//! correctness of the handoff rests entirely on the `Release`/`Acquire`
//! pairing below: a `Release` store of an index happens-after the slot data
//! it guards was written, and the corresponding `Acquire` load happens-before
//! that slot is read.

use core::mem::MaybeUninit;

use crate::loom_compat::{AtomicUsize, Ordering, UnsafeCell};

/// A lock-free single-producer/single-consumer ring buffer.
pub struct SpscRing<T: Copy, const N: usize> {
    buf: [UnsafeCell<MaybeUninit<T>>; N],
    head: AtomicUsize,
    tail: AtomicUsize,
}

// SAFETY: `T: Copy` (no destructors to race) and all access to `buf` is
// mediated by the `head`/`tail` handoff protocol documented above: the
// producer only ever writes `buf[head]` before publishing `head`, and the
// consumer only ever reads `buf[tail]` after observing a `head` that proves
// the slot was written.
unsafe impl<T: Copy + Send, const N: usize> Sync for SpscRing<T, N> {}

impl<T: Copy, const N: usize> Default for SpscRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> SpscRing<T, N> {
    /// Creates an empty ring. Does not allocate.
    ///
    /// Not `const`: under `cfg(loom)` the backing atomics are loom's model
    /// atomics, which must be constructed at runtime so the model checker
    /// can register them.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: core::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// The maximum number of elements that can be held at once.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Pushes an element onto the ring. Safe to call from interrupt context
    /// as the sole producer.
    ///
    /// # Errors
    ///
    /// Returns the value back if the ring is full.
    pub fn try_push(&self, value: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if (head + 1) % N == tail {
            return Err(value);
        }
        // SAFETY: only the producer writes `buf[head]`, and the consumer
        // only reads a slot after observing (via Acquire on `head`) that
        // this write happened.
        unsafe { (*self.buf[head].get()).write(value) };
        self.head.store((head + 1) % N, Ordering::Release);
        Ok(())
    }

    /// Pops the element at the front of the ring, if any. Mainline-only;
    /// the sole consumer.
    pub fn try_pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        // SAFETY: `head != tail` (observed via Acquire) proves the producer
        // published a write to `buf[tail]` that happens-before this read.
        let value = unsafe { (*self.buf[tail].get()).assume_init_read() };
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(value)
    }
}

#[cfg(all(test, feature = "std", not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_pops_none() {
        let ring = SpscRing::<u32, 4>::new();
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn fifo_order_is_preserved() {
        let ring = SpscRing::<u32, 8>::new();
        ring.try_push(1).unwrap();
        ring.try_push(2).unwrap();
        ring.try_push(3).unwrap();
        assert_eq!(ring.try_pop(), Some(1));
        assert_eq!(ring.try_pop(), Some(2));
        assert_eq!(ring.try_pop(), Some(3));
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn full_ring_rejects_push() {
        let ring = SpscRing::<u32, 4>::new();
        ring.try_push(1).unwrap();
        ring.try_push(2).unwrap();
        ring.try_push(3).unwrap();
        assert_eq!(ring.try_push(4), Err(4));
    }

    #[test]
    fn concurrent_producer_consumer_preserve_order() {
        use std::sync::Arc;
        use std::thread;

        let ring: Arc<SpscRing<u32, 256>> = Arc::new(SpscRing::new());
        let producer_ring = Arc::clone(&ring);
        let producer = thread::spawn(move || {
            for i in 0..1000u32 {
                while producer_ring.try_push(i).is_err() {
                    thread::yield_now();
                }
            }
        });

        let mut received = Vec::with_capacity(1000);
        while received.len() < 1000 {
            if let Some(v) = ring.try_pop() {
                received.push(v);
            } else {
                thread::yield_now();
            }
        }
        producer.join().unwrap();
        assert_eq!(received, (0..1000).collect::<Vec<_>>());
    }
}

#[cfg(all(loom, test))]
mod loom_tests {
    use super::*;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn loom_single_producer_single_consumer() {
        loom::model(|| {
            let ring: Arc<SpscRing<u32, 4>> = Arc::new(SpscRing::new());
            let producer_ring = ring.clone();

            let producer = thread::spawn(move || {
                producer_ring.try_push(1).unwrap();
                producer_ring.try_push(2).unwrap();
            });

            let mut seen = std::vec::Vec::new();
            while seen.len() < 2 {
                if let Some(v) = ring.try_pop() {
                    seen.push(v);
                }
            }
            producer.join().unwrap();
            assert_eq!(seen, [1, 2]);
        });
    }
}
