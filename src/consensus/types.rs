//! Decision domain and general identities

use crate::error::ByzantineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type GeneralId = usize;

/// The binary decision the generals must agree on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Attack,
    Retreat,
}

/// Fallback on a missing message, and winner of every tied vote.
pub const DEFAULT_ORDER: Order = Order::Retreat;

impl Order {
    pub const ALL: [Order; 2] = [Order::Attack, Order::Retreat];

    pub fn opposite(self) -> Order {
        match self {
            Order::Attack => Order::Retreat,
            Order::Retreat => Order::Attack,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Attack => write!(f, "Attack"),
            Order::Retreat => write!(f, "Retreat"),
        }
    }
}

impl FromStr for Order {
    type Err = ByzantineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(Order::Attack),
            "retreat" => Ok(Order::Retreat),
            _ => Err(ByzantineError::UnknownOrder(s.to_string())),
        }
    }
}

/// Majority vote over a multiset of orders.
///
/// The order with strictly the largest count wins. Equal counts, including
/// an empty input, fall back to [`DEFAULT_ORDER`].
pub fn majority(orders: &[Order]) -> Order {
    let count = |order: Order| orders.iter().filter(|&&o| o == order).count();

    let mut winner = DEFAULT_ORDER;
    let mut best = count(DEFAULT_ORDER);
    for order in Order::ALL {
        let votes = count(order);
        if votes > best {
            winner = order;
            best = votes;
        }
    }
    winner
}

/// How a traitor misbehaves when it commands a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitorPolicy {
    /// Even-numbered subordinates get the opposite order, odd ones the relayed order.
    #[default]
    Equivocate,
    /// Sends nothing and closes every slot it owns.
    Withhold,
}

/// A participant in the protocol. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct General {
    id: GeneralId,
    traitor: bool,
    policy: TraitorPolicy,
}

impl General {
    pub fn new(id: GeneralId, traitor: bool) -> Self {
        Self {
            id,
            traitor,
            policy: TraitorPolicy::default(),
        }
    }

    /// Only consulted when the general is a traitor.
    pub fn with_policy(mut self, policy: TraitorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> GeneralId {
        self.id
    }

    pub fn is_traitor(&self) -> bool {
        self.traitor
    }

    pub fn policy(&self) -> TraitorPolicy {
        self.policy
    }

    pub fn is_leader(&self) -> bool {
        self.id == 0
    }
}

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = if self.is_leader() { "Commander" } else { "Lieutenant" };
        let loyalty = if self.traitor { "traitor" } else { "loyal" };
        write!(f, "{} {} ({})", role, self.id, loyalty)
    }
}
