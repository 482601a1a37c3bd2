//! Even distribution of items across agents.
//!
//! With `n` items and `a` agents, every agent gets `n / a` items and the
//! first `n % a` agents (in the order given) get one more. Items keep their
//! input order and are handed out in contiguous runs: the first agent takes
//! the first run, the second agent the next, and so on. The split is a pure
//! function of the item count and the agent order.

use crate::error::{DistributorError, Result};
use crate::model::{ActiveAgent, AgentId};

/// An item together with the agent it was assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<T> {
    pub agent_id: AgentId,
    pub item: T,
}

/// Number of items each of `agents` agents receives, in agent order.
///
/// The counts always sum to `items` and differ by at most one.
pub fn allotments(items: usize, agents: usize) -> Vec<usize> {
    if agents == 0 {
        return Vec::new();
    }

    let base = items / agents;
    let remainder = items % agents;

    (0..agents)
        .map(|index| if index < remainder { base + 1 } else { base })
        .collect()
}

/// Assign every item to exactly one agent.
///
/// Fails with [`DistributorError::NoActiveAgents`] when `agents` is empty.
/// An empty item list yields an empty assignment.
pub fn distribute<T>(items: Vec<T>, agents: &[ActiveAgent]) -> Result<Vec<Assignment<T>>> {
    if agents.is_empty() {
        return Err(DistributorError::NoActiveAgents);
    }

    let counts = allotments(items.len(), agents.len());
    let mut assigned = Vec::with_capacity(items.len());
    let mut items = items.into_iter();

    for (agent, count) in agents.iter().zip(counts) {
        assigned.extend(items.by_ref().take(count).map(|item| Assignment {
            agent_id: agent.id,
            item,
        }));
    }

    debug_assert!(items.next().is_none(), "allotments must cover every item");

    Ok(assigned)
}
