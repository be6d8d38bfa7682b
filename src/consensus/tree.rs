//! Static communication topology for OM(m)
//!
//! The tree is built once per run. The root is commanded by general 0 and
//! addresses every other general. Below a node with budget `m > 0` and more
//! than one subordinate, each subordinate becomes the commander of a child
//! node with budget `m - 1` addressing the remaining subordinates.

use super::channel::Handoff;
use super::types::GeneralId;
use crate::error::{ByzantineError, Result};
use std::collections::BTreeMap;

pub struct ConsensusNode {
    commander: GeneralId,
    budget: u32,
    handoffs: BTreeMap<GeneralId, Handoff>,
    children: Vec<ConsensusNode>,
}

impl ConsensusNode {
    fn build(budget: u32, commander: GeneralId, subordinates: &[GeneralId]) -> Self {
        let handoffs = subordinates.iter().map(|&id| (id, Handoff::new())).collect();

        let children = if budget > 0 && subordinates.len() > 1 {
            subordinates
                .iter()
                .enumerate()
                .map(|(i, &next)| {
                    let rest: Vec<GeneralId> = subordinates
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, &id)| id)
                        .collect();
                    ConsensusNode::build(budget - 1, next, &rest)
                })
                .collect()
        } else {
            Vec::new()
        };

        ConsensusNode {
            commander,
            budget,
            handoffs,
            children,
        }
    }

    pub fn commander(&self) -> GeneralId {
        self.commander
    }

    /// Remaining recursion budget at this node.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Subordinate ids in ascending order.
    pub fn subordinates(&self) -> impl Iterator<Item = GeneralId> + '_ {
        self.handoffs.keys().copied()
    }

    pub fn subordinate_count(&self) -> usize {
        self.handoffs.len()
    }

    pub fn handoff(&self, id: GeneralId) -> Option<&Handoff> {
        self.handoffs.get(&id)
    }

    pub fn handoffs(&self) -> impl Iterator<Item = (GeneralId, &Handoff)> + '_ {
        self.handoffs.iter().map(|(&id, handoff)| (id, handoff))
    }

    pub fn children(&self) -> &[ConsensusNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

pub struct ConsensusTree {
    root: ConsensusNode,
    generals: usize,
    faults: u32,
}

impl ConsensusTree {
    /// Builds the OM(`faults`) topology for `generals` participants.
    pub fn build(faults: u32, generals: usize) -> Result<Self> {
        if generals < 2 {
            return Err(ByzantineError::TooFewGenerals {
                requested: generals,
            });
        }

        let lieutenants: Vec<GeneralId> = (1..generals).collect();
        let root = ConsensusNode::build(faults, 0, &lieutenants);
        tracing::debug!(faults, generals, "consensus tree built");

        Ok(Self {
            root,
            generals,
            faults,
        })
    }

    pub fn root(&self) -> &ConsensusNode {
        &self.root
    }

    pub fn generals(&self) -> usize {
        self.generals
    }

    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Whether n >= 3m + 1, the bound under which agreement is guaranteed.
    pub fn tolerates_faults(&self) -> bool {
        self.generals >= 3 * self.faults as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<'a>(
        node: &'a ConsensusNode,
        path: &mut Vec<GeneralId>,
        visit: &mut dyn FnMut(&'a ConsensusNode, &[GeneralId]),
    ) {
        path.push(node.commander());
        visit(node, path);
        for child in node.children() {
            walk(child, path, visit);
        }
        path.pop();
    }

    #[test]
    fn test_too_few_generals() {
        for n in 0..2 {
            match ConsensusTree::build(1, n) {
                Err(ByzantineError::TooFewGenerals { requested }) => assert_eq!(requested, n),
                _ => panic!("Expected TooFewGenerals for n = {}", n),
            }
        }
        assert!(ConsensusTree::build(0, 2).is_ok());
    }

    #[test]
    fn test_root_addresses_every_lieutenant() {
        let tree = ConsensusTree::build(1, 4).unwrap();
        let root = tree.root();

        assert_eq!(root.commander(), 0);
        assert_eq!(root.budget(), 1);
        assert_eq!(root.subordinate_count(), 3);
        assert_eq!(root.subordinates().collect::<Vec<_>>(), vec![1, 2, 3]);

        let commanders: Vec<_> = root.children().iter().map(|c| c.commander()).collect();
        assert_eq!(commanders, vec![1, 2, 3]);
        assert_eq!(
            root.children()[1].subordinates().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_floor_nodes_are_leaves() {
        for (m, n) in [(0, 4), (1, 4), (2, 7), (3, 10)] {
            let tree = ConsensusTree::build(m, n).unwrap();
            let mut deepest = 0;
            walk(tree.root(), &mut Vec::new(), &mut |node, path| {
                deepest = deepest.max(path.len());
                assert_eq!(node.budget() as usize + path.len(), m as usize + 1);
                if node.budget() == 0 {
                    assert!(node.is_leaf());
                } else {
                    assert_eq!(node.children().len(), node.subordinate_count());
                }
            });
            assert_eq!(deepest, m as usize + 1);
        }
    }

    #[test]
    fn test_single_subordinate_stops_recursion() {
        let tree = ConsensusTree::build(5, 3).unwrap();
        let root = tree.root();

        assert_eq!(root.children().len(), 2);
        for child in root.children() {
            assert_eq!(child.subordinate_count(), 1);
            assert!(child.is_leaf());
        }
    }

    #[test]
    fn test_subordinates_exclude_path() {
        let tree = ConsensusTree::build(2, 6).unwrap();
        let mut nodes = 0;
        walk(tree.root(), &mut Vec::new(), &mut |node, path| {
            nodes += 1;
            let expected: Vec<GeneralId> = (0..6).filter(|id| !path.contains(id)).collect();
            assert_eq!(node.subordinates().collect::<Vec<_>>(), expected);
        });
        // 1 root + 5 children + 5 * 4 grandchildren
        assert_eq!(nodes, 26);
    }

    #[test]
    fn test_fault_bound() {
        assert!(ConsensusTree::build(1, 4).unwrap().tolerates_faults());
        assert!(!ConsensusTree::build(1, 3).unwrap().tolerates_faults());
        assert!(ConsensusTree::build(2, 7).unwrap().tolerates_faults());
        assert_eq!(ConsensusTree::build(2, 7).unwrap().generals(), 7);
    }
}
