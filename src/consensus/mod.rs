//! Byzantine agreement by oral messages
//!
//! Generals agree on a binary order even when up to m of them are traitors,
//! provided there are at least 3m + 1 generals. Agreement is reached with
//! the recursive OM(m) algorithm over in-process handoffs.
//!
//! ## Structure
//! - `types.rs` - orders, majority vote and general identities
//! - `channel.rs` - per-subordinate bounded-wait handoff
//! - `tree.rs` - the static OM(m) communication topology
//! - `om.rs` - leader and lieutenant paths of the recursion
//! - `tests.rs` - agreement and validity tests

// Re-export public API
pub use channel::Handoff;
pub use tree::{ConsensusNode, ConsensusTree};
pub use types::{majority, General, GeneralId, Order, TraitorPolicy, DEFAULT_ORDER};


// Internal modules
mod channel;
mod om;
mod tree;
mod types;
