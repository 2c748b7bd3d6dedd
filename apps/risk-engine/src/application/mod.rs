//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the account snapshot, market stats, and audit sink
//! - **Use Cases**: The evaluation pipeline around the pure rule engine

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
