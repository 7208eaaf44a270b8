//! Opaque absolute and relative time types.
//!
//! Provides [`AbsTime`] and [`RelTime`], a minimal time abstraction with
//! comparison and offset arithmetic, plus a "now" reader that defaults to a
//! platform clock (under the `std` feature) and can be overridden for testing.
//!
//! This crate carries no allocation and no panics on its hot paths; it is
//! suitable for `#![no_std]` firmware as well as hosted testing.
#![cfg_attr(not(feature = "std"), no_std)]

mod time;

pub use time::{AbsTime, RelTime};
