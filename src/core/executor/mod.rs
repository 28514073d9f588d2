//! Per-entity operation execution
//!
//! One call to [`OperationExecutor::execute`] produces exactly one action
//! record, whatever happens to the work in between: remote failures are
//! classified into the record, and a panic or cancellation of the task still
//! leaves a failed record behind.

mod executor;
mod guard;


pub use executor::{
    ABORTED_MESSAGE, CANCELLED_MESSAGE, ExecuteOptions, INVALID_PEER_MESSAGE, OperationExecutor,
    PARTIAL_SELF_ONLY_MESSAGE,
};
