//! Error types shared by the consensus core and the scenario driver

use crate::consensus::GeneralId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ByzantineError {
    #[error("cannot build a consensus tree with {requested} general(s), at least two are required")]
    TooFewGenerals { requested: usize },

    #[error("general {id} cannot run as leader, only general 0 commands the root")]
    NotLeader { id: GeneralId },

    #[error("general 0 is the leader and cannot run as a subordinate")]
    LeaderAsSubordinate,

    #[error("general {id} is not a lieutenant in a tree of {generals} generals")]
    UnknownGeneral { id: GeneralId, generals: usize },

    #[error("unrecognised order `{0}`, expected attack or retreat")]
    UnknownOrder(String),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("invalid value `{value}` for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("general {id} did not finish: {reason}")]
    ActorFailed { id: GeneralId, reason: String },

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode scenario: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ByzantineError>;
