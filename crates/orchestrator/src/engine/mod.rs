//! Expression evaluation engine.
//!
//! One [`Driver`] run exists per in-flight expression; all of them dispatch
//! through the shared task queue and suspend on per-task result channels.

pub mod driver;

pub use driver::Driver;
