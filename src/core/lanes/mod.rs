//! Bounded-parallelism lanes
//!
//! One lane per operation kind caps how many operations of that kind run at
//! once. A lane can be suspended as a whole when the remote side signals that
//! it is being called too often.

mod lane;


pub use lane::{ConcurrencyLane, LanePermit, LaneSet};
