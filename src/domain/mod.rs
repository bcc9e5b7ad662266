//! Domain layer - Port ownership rules, independent of I/O.

pub mod allocation;
pub mod foundation;
