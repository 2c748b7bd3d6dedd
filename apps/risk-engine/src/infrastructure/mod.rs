//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `account/`: Account snapshot sources (JSON file, in-memory)
//!   - `market_stats/`: Market statistics sources (JSON file, in-memory)
//!   - `audit/`: Audit sinks (JSON Lines file, in-memory)
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: REST API controllers

pub mod account;
pub mod audit;
pub mod http;
pub mod market_stats;
