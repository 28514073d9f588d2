//! Throttle signal handling
//!
//! A throttle signal from the remote side applies to every caller of the same
//! operation kind, so the whole lane is suspended, not just the offending call.
//! The operation that received the signal is retried exactly once.

mod backoff;


pub use backoff::{Attempt, BackoffOutcome, MAX_RETRY_AFTER, ThrottleBackoff};
pub(crate) use backoff::random_up_to;
