//! A cooperative, fixed-memory task scheduler for embedded targets.
//!
//! [`Scheduler`] runs three kinds of work in strict priority order on each
//! call to [`Scheduler::step`]: tasks handed in from interrupt context, tasks
//! whose deadline has arrived, and tasks submitted to run as soon as
//! possible, falling back to an idle hook when none of those have anything
//! ready. Every queue the scheduler owns has a compile-time-fixed capacity
//! and none of its containers allocate; see `taskwheel-containers` for the
//! building blocks and `taskwheel-time` for the timestamp types.
#![cfg_attr(not(feature = "std"), no_std)]

mod error;
mod log;
mod scheduler;
mod task;

pub use error::SchedulerError;
pub use scheduler::Scheduler;
pub use task::Task;

pub use log::{set_log_fn, LogFn, LogLevel};
