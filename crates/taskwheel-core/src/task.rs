//! The task handle the scheduler invokes.
//!
//! A [`Task`] is not a trait object: the external interface contract
//! requires every queue item to be pointer-width, and a `dyn Trait`
//! reference is a fat (two-word) pointer in Rust. Instead a `Task` pairs a
//! plain function pointer with an opaque context pointer the callback
//! downcasts itself; the scheduler stores `&'static Task` (one word) in its
//! queues and never inspects `ctx`.

use core::fmt;

/// An invocable unit of work.
///
/// The scheduler holds only a borrowed `&'static Task` to values of this
/// type; ownership and lifetime remain with whoever constructs it (typically
/// a `static` or a long-lived owner, since a task may be submitted from
/// interrupt context and must outlive its time in any queue).
pub struct Task {
    run: unsafe fn(*mut ()),
    ctx: *mut (),
}

// SAFETY: a `Task` is just a function pointer plus an opaque context
// pointer; the scheduler never dereferences `ctx` itself; whoever builds the
// callback is responsible for `ctx`'s thread-safety across submission
// contexts.
unsafe impl Send for Task {}
unsafe impl Sync for Task {}

impl Task {
    /// Builds a task from a plain `fn()` with no context.
    #[must_use]
    pub const fn from_fn(f: fn()) -> Self {
        unsafe fn call_fn(ctx: *mut ()) {
            // SAFETY: `ctx` was produced by `from_fn` below as a `fn()`
            // transmuted to a data pointer, and is never written elsewhere.
            let f: fn() = unsafe { core::mem::transmute(ctx) };
            f();
        }
        Self {
            run: call_fn,
            ctx: f as *mut (),
        }
    }

    /// Builds a task from a raw function pointer and context pointer.
    ///
    /// # Safety
    ///
    /// `run` must be safe to call with exactly the `ctx` pointer given here,
    /// any number of times, for as long as this `Task` is reachable from a
    /// scheduler.
    #[must_use]
    pub const unsafe fn from_raw_parts(run: unsafe fn(*mut ()), ctx: *mut ()) -> Self {
        Self { run, ctx }
    }

    /// Invokes the task.
    pub(crate) fn invoke(&self) {
        // SAFETY: `run`/`ctx` were paired at construction time per the
        // safety contract of `from_raw_parts` (or generated correctly by
        // `from_fn`).
        unsafe { (self.run)(self.ctx) }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("run", &(self.run as usize))
            .field("ctx", &self.ctx)
            .finish()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn from_fn_invokes_the_given_function() {
        static CALLED: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);
        fn mark() {
            CALLED.store(true, core::sync::atomic::Ordering::SeqCst);
        }
        let task = Task::from_fn(mark);
        task.invoke();
        assert!(CALLED.load(core::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn from_raw_parts_threads_context_through() {
        let counter = Cell::new(0i32);

        unsafe fn bump(ctx: *mut ()) {
            // SAFETY: `ctx` points at the `Cell<i32>` below for the
            // lifetime of this test.
            let cell = unsafe { &*ctx.cast::<Cell<i32>>() };
            cell.set(cell.get() + 1);
        }

        let task = unsafe { Task::from_raw_parts(bump, (&counter as *const Cell<i32>).cast_mut().cast()) };
        task.invoke();
        task.invoke();
        assert_eq!(counter.get(), 2);
    }
}
