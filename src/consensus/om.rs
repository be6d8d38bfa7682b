//! The recursive Oral-Messaging algorithm OM(m)

use super::tree::{ConsensusNode, ConsensusTree};
use super::types::{majority, General, Order, TraitorPolicy, DEFAULT_ORDER};
use crate::config::RunConfig;
use crate::error::{ByzantineError, Result};
use std::future::Future;
use std::pin::Pin;

type Vote<'a> = Pin<Box<dyn Future<Output = Option<Order>> + Send + 'a>>;

impl General {
    /// Issues `initial` to every lieutenant. Only general 0 may lead.
    pub async fn run_as_leader(
        &self,
        tree: &ConsensusTree,
        initial: Order,
        config: &RunConfig,
    ) -> Result<()> {
        if !self.is_leader() {
            return Err(ByzantineError::NotLeader { id: self.id() });
        }

        tracing::debug!(general = self.id(), order = %initial, "leader issuing order");
        self.recurse(tree.root(), initial, config).await;
        Ok(())
    }

    /// Takes part in the recursion as a lieutenant and returns the decision.
    pub async fn run_as_subordinate(
        &self,
        tree: &ConsensusTree,
        config: &RunConfig,
    ) -> Result<Order> {
        if self.is_leader() {
            return Err(ByzantineError::LeaderAsSubordinate);
        }
        if tree.root().handoff(self.id()).is_none() {
            return Err(ByzantineError::UnknownGeneral {
                id: self.id(),
                generals: tree.generals(),
            });
        }

        let decision = self
            .recurse(tree.root(), DEFAULT_ORDER, config)
            .await
            .unwrap_or(DEFAULT_ORDER);
        tracing::debug!(general = self.id(), decision = %decision, "lieutenant decided");
        Ok(decision)
    }

    /// Commanders relay and yield `None`; subordinates yield their vote.
    fn recurse<'a>(
        &'a self,
        node: &'a ConsensusNode,
        order: Order,
        config: &'a RunConfig,
    ) -> Vote<'a> {
        Box::pin(async move {
            if node.commander() == self.id() {
                self.relay(node, order);
                return None;
            }

            let received = match node.handoff(self.id()) {
                Some(handoff) => handoff.receive(config.wait_bound()).await,
                None => {
                    tracing::warn!(
                        general = self.id(),
                        commander = node.commander(),
                        "not addressed at this node"
                    );
                    DEFAULT_ORDER
                }
            };

            let mut votes = Vec::with_capacity(node.children().len() + 1);
            for child in node.children() {
                if let Some(vote) = self.recurse(child, received, config).await {
                    votes.push(vote);
                }
            }
            votes.push(received);

            Some(majority(&votes))
        })
    }

    fn relay(&self, node: &ConsensusNode, order: Order) {
        for (target, handoff) in node.handoffs() {
            let outgoing = match (self.is_traitor(), self.policy()) {
                (false, _) => order,
                (true, TraitorPolicy::Equivocate) if target % 2 == 0 => order.opposite(),
                (true, TraitorPolicy::Equivocate) => order,
                (true, TraitorPolicy::Withhold) => {
                    tracing::debug!(general = self.id(), to = target, "withholding order");
                    handoff.close();
                    continue;
                }
            };

            if !handoff.send(outgoing) {
                tracing::warn!(general = self.id(), to = target, "order dropped, receiver gave up");
            } else {
                tracing::trace!(general = self.id(), to = target, order = %outgoing, "order sent");
            }
        }
    }
}
