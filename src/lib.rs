//! Byzantine Generals by oral messages
//!
//! - `consensus` - the OM(m) core: orders, generals, topology, handoffs
//! - `scenario` - rosters, concurrent runs, agreement/validity checks
//! - `config` - run configuration (bounded-wait timeout)
//! - `error` - error type shared by the core and the driver
//! - `logger` - tracing subscriber setup

pub mod config;
pub mod consensus;
pub mod error;
pub mod logger;
pub mod scenario;

pub use config::RunConfig;
pub use error::{ByzantineError, Result};
