//! Background Tasks Module
//!
//! Deferred work that runs outside the caller's control flow.
//!
//! # Tasks
//! - TTL expiry: removes a key once its time-to-live has elapsed
//!
//! Scheduling is abstracted behind [`Scheduler`] so tests can replace real
//! timers with [`ManualScheduler`].

mod expiry;
mod scheduler;

pub use expiry::expiry_task;
pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
