//! The dispatch engine.

use taskwheel_containers::{FixedPool, Fifo, PoolHandle, SortedVec, SpscRing, TiePolicy};
use taskwheel_time::{AbsTime, RelTime};

use crate::error::SchedulerError;
use crate::log::{sched_debug, sched_trace, sched_warn};
use crate::task::Task;

#[derive(Debug, Clone, Copy)]
struct EventWrapper {
    task: &'static Task,
    deadline: AbsTime,
}

/// A cooperative, fixed-memory task scheduler.
///
/// `IQ`, `AQ`, and `EQ` are the interrupt queue, asap queue, and
/// event queue/pool capacities, fixed at compile time. Unlike the design
/// this crate is descended from, there is no runtime "not initialized"
/// flag: a `Scheduler` value is fully usable as soon as it is constructed,
/// because `IQ`, `AQ`, and `EQ` are statically asserted nonzero (see
/// [`Scheduler::new`]) and every field the original's init step populated
/// is given its steady-state value by `Default`/`new` directly. What the
/// original calls "re-init" is simply constructing a new `Scheduler` and
/// discarding the old one.
pub struct Scheduler<const IQ: usize, const AQ: usize, const EQ: usize> {
    interrupt_queue: SpscRing<&'static Task, IQ>,
    asap_queue: Fifo<&'static Task, AQ>,
    event_queue: SortedVec<PoolHandle, EQ>,
    event_pool: FixedPool<EventWrapper, EQ>,
    idle_task: Option<&'static Task>,
    get_time: fn() -> AbsTime,
    current_task: Option<&'static Task>,
}

impl<const IQ: usize, const AQ: usize, const EQ: usize> Default for Scheduler<IQ, AQ, EQ> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const IQ: usize, const AQ: usize, const EQ: usize> Scheduler<IQ, AQ, EQ> {
    // Rejects zero-capacity instantiations at compile time rather than at
    // the top of every entry point. An unnamed associated const is
    // monomorphized (and therefore evaluated) for every concrete `<IQ, AQ,
    // EQ>` this type is used with, regardless of whether anything ever
    // references it.
    const ASSERT_CAPACITIES_NONZERO: () = {
        assert!(IQ > 0, "interrupt queue capacity must be nonzero");
        assert!(AQ > 0, "asap queue capacity must be nonzero");
        assert!(EQ > 0, "event queue/pool capacity must be nonzero");
    };

    /// Creates a scheduler with empty queues, no idle task, and the
    /// platform default clock.
    #[must_use]
    pub fn new() -> Self {
        Self::ASSERT_CAPACITIES_NONZERO;
        Self {
            interrupt_queue: SpscRing::new(),
            asap_queue: Fifo::new(),
            event_queue: SortedVec::new(),
            event_pool: FixedPool::new(),
            idle_task: None,
            get_time: taskwheel_time::now,
            current_task: None,
        }
    }

    // -------------------------------------------------------------------
    // Submission API
    // -------------------------------------------------------------------

    /// Schedules `task` to run as soon as possible.
    ///
    /// Safe to call from within another task's invocation.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::QueueFull`] if the asap queue has no room.
    pub fn submit_asap(&mut self, task: &'static Task) -> Result<(), SchedulerError> {
        self.asap_queue
            .try_push(task)
            .map_err(|_| SchedulerError::QueueFull)?;
        sched_debug!("submit_asap: queued, asap depth={}", self.asap_queue.len());
        Ok(())
    }

    /// Schedules `task` to run at or after `deadline`.
    ///
    /// Safe to call from within another task's invocation.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::PoolExhausted`] if no event wrapper is
    /// available, or [`SchedulerError::QueueFull`] if the event queue is
    /// full (in which case the allocated wrapper is freed before returning).
    pub fn submit_at(&mut self, task: &'static Task, deadline: AbsTime) -> Result<(), SchedulerError> {
        let handle = self
            .event_pool
            .alloc(EventWrapper { task, deadline })
            .ok_or(SchedulerError::PoolExhausted)?;

        let pool = &self.event_pool;
        let cmp = |a: &PoolHandle, b: &PoolHandle| pool.get(*a).deadline.cmp(&pool.get(*b).deadline);
        if let Err(handle) = self.event_queue.sorted_insert(handle, cmp, TiePolicy::First) {
            self.event_pool.free(handle);
            sched_warn!("submit_at: event queue full, wrapper freed");
            return Err(SchedulerError::QueueFull);
        }
        sched_debug!("submit_at: queued, event depth={}", self.event_queue.len());
        Ok(())
    }

    /// Schedules `task` to run after `delay` relative to the current time.
    ///
    /// Equivalent to `submit_at(task, now() ⊕ delay)`. Same failure modes as
    /// [`Scheduler::submit_at`].
    ///
    /// # Errors
    ///
    /// See [`Scheduler::submit_at`].
    pub fn submit_in(&mut self, task: &'static Task, delay: RelTime) -> Result<(), SchedulerError> {
        let deadline = taskwheel_time::offset((self.get_time)(), delay);
        self.submit_at(task, deadline)
    }

    /// Schedules `task` to run from interrupt context.
    ///
    /// Lock-free and wait-free with respect to the mainline. The caller
    /// must ensure `task`'s storage remains valid after the interrupt
    /// returns (e.g. a `static`); this cannot be enforced here. Never logs,
    /// to preserve the wait-free guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::QueueFull`] if the interrupt ring has no
    /// room.
    pub fn submit_from_interrupt(&self, task: &'static Task) -> Result<(), SchedulerError> {
        self.interrupt_queue
            .try_push(task)
            .map_err(|_| SchedulerError::QueueFull)
    }

    // -------------------------------------------------------------------
    // Observation API
    // -------------------------------------------------------------------

    /// Returns `true` iff the asap queue is non-empty.
    ///
    /// Deliberately ignores the interrupt queue (no non-destructive,
    /// ISR-safe emptiness check is assumed to exist, and an interrupt could
    /// race any such check) and the event queue (pending-future events are
    /// not "runnable" yet). Intended for deciding whether to enter a
    /// low-power sleep.
    #[must_use]
    pub fn has_runnable_task(&self) -> bool {
        !self.asap_queue.is_empty()
    }

    /// Returns the task currently being invoked by [`Scheduler::step`], or
    /// `None` outside of any invocation (including between tasks, while
    /// managing queues, or while the idle hook's own invocation has not yet
    /// started).
    #[must_use]
    pub fn current_task(&self) -> Option<&'static Task> {
        self.current_task
    }

    /// Installs or clears the idle task, run when no other work is ready.
    pub fn set_idle_task(&mut self, idle_task: Option<&'static Task>) {
        self.idle_task = idle_task;
    }

    /// Installs a custom time source, or restores the platform default if
    /// `None`.
    pub fn set_time_function(&mut self, f: Option<fn() -> AbsTime>) {
        self.get_time = f.unwrap_or(taskwheel_time::now);
    }

    // -------------------------------------------------------------------
    // Dispatch Engine
    // -------------------------------------------------------------------

    /// Performs one scheduling pass.
    ///
    /// Invokes at most one task: an interrupt-queue task if one is pending
    /// (highest priority), otherwise promotes any due timed events into the
    /// asap queue and then invokes one asap-queue task, otherwise invokes
    /// the idle task if one is installed. A task that calls `step` sees the
    /// recursion guard below and this nested call returns immediately
    /// without dispatching anything.
    pub fn step(&mut self) {
        if self.current_task.is_some() {
            // Recursion guard: a task called step() on itself (or we are
            // already mid-invocation some other way). The outer step
            // continues normally once this call returns.
            return;
        }

        if let Some(task) = self.interrupt_queue.try_pop() {
            sched_trace!("step: interrupt drain");
            self.invoke(task);
            return;
        }

        self.promote_due_events();

        if let Some(task) = self.asap_queue.try_pop() {
            sched_trace!("step: asap dispatch");
            self.invoke(task);
            return;
        }

        if let Some(task) = self.idle_task {
            sched_trace!("step: idle hook");
            self.invoke(task);
        }
    }

    fn invoke(&mut self, task: &'static Task) {
        self.current_task = Some(task);
        task.invoke();
        self.current_task = None;
    }

    fn promote_due_events(&mut self) {
        let now = (self.get_time)();
        while !self.asap_queue.is_full() {
            let Some(handle) = self.event_queue.peek_back() else {
                break;
            };
            let wrapper = *self.event_pool.get(handle);
            if wrapper.deadline.is_after(now) {
                break;
            }

            let popped = self.event_queue.pop_back();
            if popped != Some(handle) {
                // Defensive: peek and pop disagreed. Abort this promotion
                // pass rather than act on a wrapper we can no longer trust;
                // never panics here, per the "scheduler never panics" policy.
                sched_warn!("promote_due_events: peek/pop mismatch, aborting pass");
                self.event_pool.free(handle);
                break;
            }

            if self.asap_queue.try_push(wrapper.task).is_err() {
                // Defensive: the `is_full` precheck above should make this
                // unreachable under the single-threaded model.
                sched_warn!("promote_due_events: asap push failed after capacity precheck");
                self.event_pool.free(handle);
                break;
            }
            self.event_pool.free(handle);
        }
    }
}
