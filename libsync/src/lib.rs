//! A library containing the synchronization primitives shared by
//! every stage of the pipeline.
//!
//! [`signal`] contains the [`Signal`](signal::Signal) manual-reset
//! latch.
//!
//! [`queue`] contains the [`BoundedQueue`](queue::BoundedQueue)
//! datastructure, a blocking FIFO built on top of the latch.

#![warn(missing_docs)]

pub mod queue;
pub mod signal;

pub use queue::{BoundedQueue, CapacityError};
pub use signal::Signal;
