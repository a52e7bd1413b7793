//! Run per-element operations on a fixed pool of threads while keeping the
//! observable behavior of a plain sequential loop: same elements, results in
//! input order, the same early exits and a single propagated failure.

pub mod app;
pub mod engine;
mod pool;
pub mod prelude;
pub mod source;
pub mod threaded;
