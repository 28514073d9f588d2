//! Per-entity operation spacing
//!
//! Enforces a minimum interval between two operations on the same entity.

mod gate;


pub use gate::RateGate;
