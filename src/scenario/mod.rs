//! Scenario driver
//!
//! Builds general rosters, launches one tokio task per general against a
//! shared tree and checks the decisions afterwards. The core algorithm never
//! judges its own outcome; agreement and validity are verified here.
//!
//! ## Structure
//! - `mod.rs` - scenario files, traitor placement, run and sweep
//! - `report.rs` - console tables for outcomes and sweeps

pub mod report;

use crate::config::RunConfig;
use crate::consensus::{ConsensusTree, General, GeneralId, Order, TraitorPolicy};
use crate::error::{ByzantineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Largest m for which n >= 3m + 1 holds.
pub fn max_faults(generals: usize) -> u32 {
    (generals.saturating_sub(1) / 3) as u32
}

/// A single run described in JSON
///
/// ```json
/// { "generals": 7, "traitors": [2, 5], "initial_order": "attack" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub generals: usize,
    #[serde(default)]
    pub traitors: Vec<GeneralId>,
    pub initial_order: Order,
    /// Recursion depth m; defaults to the largest tolerable for `generals`.
    #[serde(default)]
    pub faults: Option<u32>,
    /// Overrides the configured timeout for this scenario.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub policy: TraitorPolicy,
}

impl Scenario {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generals < 2 {
            return Err(ByzantineError::InvalidScenario(format!(
                "{} general(s) given, at least two are required",
                self.generals
            )));
        }

        let mut seen = HashSet::new();
        for &id in &self.traitors {
            if id >= self.generals {
                return Err(ByzantineError::InvalidScenario(format!(
                    "traitor id {} is out of range for {} generals",
                    id, self.generals
                )));
            }
            if !seen.insert(id) {
                return Err(ByzantineError::InvalidScenario(format!(
                    "traitor id {} is listed twice",
                    id
                )));
            }
        }
        Ok(())
    }

    pub fn faults(&self) -> u32 {
        self.faults.unwrap_or_else(|| max_faults(self.generals))
    }

    pub fn roster(&self) -> Vec<General> {
        (0..self.generals)
            .map(|id| General::new(id, self.traitors.contains(&id)).with_policy(self.policy))
            .collect()
    }

    pub fn config(&self, base: &RunConfig) -> RunConfig {
        match self.timeout_ms {
            Some(ms) => base.with_timeout_ms(ms),
            None => *base,
        }
    }

    pub async fn run(&self, base: &RunConfig) -> Result<RunOutcome> {
        self.validate()?;
        run_roster(&self.roster(), self.faults(), self.initial_order, &self.config(base)).await
    }
}

/// Every roster of `generals` generals with exactly `traitors` traitors,
/// ordered lexicographically by traitor ids.
pub fn traitor_placements(generals: usize, traitors: usize) -> Vec<Vec<General>> {
    fn choose(
        next: usize,
        generals: usize,
        left: usize,
        picked: &mut Vec<GeneralId>,
        out: &mut Vec<Vec<GeneralId>>,
    ) {
        if left == 0 {
            out.push(picked.clone());
            return;
        }
        for id in next..generals {
            if generals - id < left {
                break;
            }
            picked.push(id);
            choose(id + 1, generals, left - 1, picked, out);
            picked.pop();
        }
    }

    if traitors > generals {
        return Vec::new();
    }

    let mut placements = Vec::new();
    choose(0, generals, traitors, &mut Vec::with_capacity(traitors), &mut placements);

    placements
        .into_iter()
        .map(|ids| {
            (0..generals)
                .map(|id| General::new(id, ids.contains(&id)))
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub general: General,
    pub order: Order,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub generals: usize,
    pub faults: u32,
    pub leader: Option<General>,
    pub initial_order: Order,
    /// One entry per lieutenant, in roster order.
    pub decisions: Vec<Decision>,
    pub elapsed: Duration,
}

impl RunOutcome {
    pub fn decision_of(&self, id: GeneralId) -> Option<Order> {
        self.decisions
            .iter()
            .find(|d| d.general.id() == id)
            .map(|d| d.order)
    }

    pub fn loyal_decisions(&self) -> impl Iterator<Item = &Decision> + '_ {
        self.decisions.iter().filter(|d| !d.general.is_traitor())
    }

    pub fn leader_loyal(&self) -> bool {
        self.leader.is_some_and(|leader| !leader.is_traitor())
    }

    pub fn traitor_ids(&self) -> Vec<GeneralId> {
        self.leader
            .iter()
            .chain(self.decisions.iter().map(|d| &d.general))
            .filter(|g| g.is_traitor())
            .map(|g| g.id())
            .collect()
    }

    /// Every loyal general holds the same order. A loyal leader counts with
    /// the order it issued.
    pub fn agreement(&self) -> bool {
        let leader_order = self.leader_loyal().then_some(self.initial_order);
        let mut orders = leader_order
            .into_iter()
            .chain(self.loyal_decisions().map(|d| d.order));

        match orders.next() {
            Some(first) => orders.all(|o| o == first),
            None => true,
        }
    }

    /// A loyal leader's order is what every loyal lieutenant decided.
    pub fn validity(&self) -> bool {
        !self.leader_loyal() || self.loyal_decisions().all(|d| d.order == self.initial_order)
    }

    pub fn passed(&self) -> bool {
        self.agreement() && self.validity()
    }

    /// The order shared by all loyal lieutenants, if they agree.
    pub fn consensus(&self) -> Option<Order> {
        let mut orders = self.loyal_decisions().map(|d| d.order);
        let first = orders.next()?;
        orders.all(|o| o == first).then_some(first)
    }
}

/// Builds a fresh tree sized to `roster` and runs it.
pub async fn run_roster(
    roster: &[General],
    faults: u32,
    initial: Order,
    config: &RunConfig,
) -> Result<RunOutcome> {
    let tree = ConsensusTree::build(faults, roster.len())?;
    execute(Arc::new(tree), roster, initial, config).await
}

/// Rejects rosters that would leave a lieutenant waiting on nobody.
///
/// Ids must be unique and inside the tree. With an unbounded wait every
/// general must be present; with a timeout, absent generals are allowed
/// and their subordinates fall back to the default order.
pub fn check_roster(tree: &ConsensusTree, roster: &[General], config: &RunConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for general in roster {
        let id = general.id();
        if id >= tree.generals() {
            return Err(ByzantineError::InvalidScenario(format!(
                "general {} is out of range for {} generals",
                id,
                tree.generals()
            )));
        }
        if !seen.insert(id) {
            return Err(ByzantineError::InvalidScenario(format!(
                "general {} appears twice in the roster",
                id
            )));
        }
    }

    if config.wait_bound().is_none() && seen.len() < tree.generals() {
        let missing: Vec<GeneralId> = (0..tree.generals()).filter(|id| !seen.contains(id)).collect();
        return Err(ByzantineError::InvalidScenario(format!(
            "generals {:?} are missing and the wait is unbounded",
            missing
        )));
    }
    Ok(())
}

/// Runs one actor per general in `roster` against `tree`.
///
/// A tree drives exactly one run. The roster is checked first; if any
/// actor fails, the remaining ones are aborted and the error is returned.
pub async fn execute(
    tree: Arc<ConsensusTree>,
    roster: &[General],
    initial: Order,
    config: &RunConfig,
) -> Result<RunOutcome> {
    check_roster(&tree, roster, config)?;

    let start = Instant::now();
    let mut actors = JoinSet::new();
    let mut task_owners = HashMap::with_capacity(roster.len());

    for &general in roster {
        let tree = Arc::clone(&tree);
        let config = *config;
        let handle = actors.spawn(async move {
            if general.is_leader() {
                general.run_as_leader(&tree, initial, &config).await.map(|()| None)
            } else {
                general.run_as_subordinate(&tree, &config).await.map(Some)
            }
        });
        task_owners.insert(handle.id(), general);
    }

    let mut decided = HashMap::with_capacity(roster.len());
    while let Some(joined) = actors.join_next_with_id().await {
        let result = match joined {
            Ok((task, result)) => result.map(|order| (task, order)),
            Err(e) => Err(ByzantineError::ActorFailed {
                id: task_owners.get(&e.id()).map_or(usize::MAX, General::id),
                reason: e.to_string(),
            }),
        };

        match result {
            Ok((task, Some(order))) => {
                if let Some(&general) = task_owners.get(&task) {
                    decided.insert(general.id(), order);
                }
            }
            Ok((_, None)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "aborting remaining generals");
                actors.abort_all();
                return Err(e);
            }
        }
    }

    let decisions = roster
        .iter()
        .filter_map(|&general| {
            decided
                .get(&general.id())
                .map(|&order| Decision { general, order })
        })
        .collect();

    let outcome = RunOutcome {
        generals: tree.generals(),
        faults: tree.faults(),
        leader: roster.iter().copied().find(General::is_leader),
        initial_order: initial,
        decisions,
        elapsed: start.elapsed(),
    };

    tracing::debug!(
        generals = outcome.generals,
        faults = outcome.faults,
        traitors = ?outcome.traitor_ids(),
        passed = outcome.passed(),
        "run finished"
    );
    Ok(outcome)
}

#[derive(Debug, Clone)]
pub struct SweepReport {
    pub generals: usize,
    pub initial_order: Order,
    pub outcomes: Vec<RunOutcome>,
}

impl SweepReport {
    pub fn runs(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(RunOutcome::passed)
    }
}

/// Runs every m in `0..=max_faults(generals)` against every placement of
/// exactly m traitors.
pub async fn sweep(generals: usize, initial: Order, config: &RunConfig) -> Result<SweepReport> {
    let mut outcomes = Vec::new();

    for faults in 0..=max_faults(generals) {
        for roster in traitor_placements(generals, faults as usize) {
            let outcome = run_roster(&roster, faults, initial, config).await?;
            if !outcome.passed() {
                tracing::warn!(
                    generals,
                    faults,
                    traitors = ?outcome.traitor_ids(),
                    "loyal generals did not reach a valid agreement"
                );
            }
            outcomes.push(outcome);
        }
    }

    let report = SweepReport {
        generals,
        initial_order: initial,
        outcomes,
    };
    tracing::info!(
        generals,
        runs = report.runs(),
        failures = report.failures().count(),
        "sweep complete"
    );
    Ok(report)
}
