//! Diagnostic logging hook.
//!
//! Mirrors the "settable function pointer with a silent default" pattern:
//! before [`set_log_fn`] is called, every log call is silently discarded, so
//! a host that never installs a logger pays only the cost of a disabled
//! level's formatting arguments being constructed (and with the `trace!`
//! call sites used on the hot dispatch path, not even that if the optimizer
//! sees through `null_log`).
//!
//! Nothing on [`crate::Scheduler::submit_from_interrupt`]'s path logs:
//! formatting `fmt::Arguments` and calling through an installed backend can
//! take unbounded time, which has no place in an ISR-safe, wait-free push.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Scheduler diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Unexpected internal condition (e.g. the defensive promotion path).
    Warn = 0,
    /// Successful submissions and queue depth after the operation.
    Debug = 1,
    /// Per-step phase taken.
    Trace = 2,
}

/// The signature of the global scheduler log function.
pub type LogFn = fn(LogLevel, fmt::Arguments<'_>);

fn null_log(_level: LogLevel, _args: fmt::Arguments<'_>) {}

static LOG_FN: AtomicPtr<()> = AtomicPtr::new(null_log as *mut ());

/// Registers the global scheduler log function. Pass `None` to silence
/// logging again.
///
/// # Safety
///
/// The provided function must be safe to call from any mainline context the
/// scheduler's non-interrupt entry points run in.
pub unsafe fn set_log_fn(f: Option<LogFn>) {
    let ptr = f.map_or(null_log as *mut (), |f| f as *mut ());
    LOG_FN.store(ptr, Ordering::Release);
}

#[inline]
fn load_log_fn() -> LogFn {
    let ptr = LOG_FN.load(Ordering::Acquire);
    // SAFETY: only `null_log` or a caller-supplied `LogFn` from `set_log_fn`
    // is ever stored here.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

#[doc(hidden)]
pub fn _log(level: LogLevel, args: fmt::Arguments<'_>) {
    load_log_fn()(level, args);
}

macro_rules! sched_warn {
    ($($arg:tt)*) => { $crate::log::_log($crate::log::LogLevel::Warn, format_args!($($arg)*)) };
}

macro_rules! sched_debug {
    ($($arg:tt)*) => { $crate::log::_log($crate::log::LogLevel::Debug, format_args!($($arg)*)) };
}

macro_rules! sched_trace {
    ($($arg:tt)*) => { $crate::log::_log($crate::log::LogLevel::Trace, format_args!($($arg)*)) };
}

pub(crate) use sched_debug;
pub(crate) use sched_trace;
pub(crate) use sched_warn;
