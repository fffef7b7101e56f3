//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod imgur;
pub mod persistence;
pub mod ports;
