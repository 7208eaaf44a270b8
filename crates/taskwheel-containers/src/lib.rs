//! Fixed-capacity, allocation-free containers.
//!
//! Four building blocks, each sized by a compile-time `const N: usize`
//! capacity: a mainline-only FIFO ([`fifo::Fifo`]), an interrupt-safe
//! single-producer/single-consumer ring ([`spsc::SpscRing`]), a
//! comparator-sorted vector with a configurable tie policy
//! ([`sorted::SortedVec`]), and a fixed-block slot pool returning move-safe
//! handles ([`pool::FixedPool`]).
//!
//! None of these types allocate; all backing storage is an inline array.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod fifo;
mod loom_compat;
pub mod pool;
pub mod sorted;
pub mod spsc;

pub use fifo::Fifo;
pub use pool::{FixedPool, PoolHandle};
pub use sorted::{SortedVec, TiePolicy};
pub use spsc::SpscRing;
