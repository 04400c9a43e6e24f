//! Utilities for coalescing bursty signals on a single logical thread.
//!
//! Both halves of the editing bridge run cooperatively: there is no
//! runtime, only an owner that pumps time forward. These primitives keep
//! the at-most-one-pending-callback-per-kind guarantee explicit instead of
//! burying it in per-callback timer handles.

mod debounce;
mod timer;

pub use debounce::Debounce;
pub use timer::TimerQueue;
