//! Distribution summaries.
//!
//! Two views exist. The upload response is built from the insert result and
//! lists every agent that took part, zero counts included. The rebuilt view
//! comes from stored items grouped by agent, so it only knows about agents
//! that actually hold items in the batch.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{ActiveAgent, AgentId, AssignedItem, BatchId, ListItem};

/// Per-agent count in an upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCount {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub agent_email: String,
    pub item_count: usize,
}

/// Response to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub upload_batch: BatchId,
    pub total_items: usize,
    pub agents_count: usize,
    pub distribution: Vec<AgentCount>,
}

/// Items held by one agent within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDistribution {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub agent_email: String,
    pub item_count: usize,
    pub items: Vec<ListItem>,
}

/// A batch's distribution rebuilt from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDistribution {
    pub upload_batch: BatchId,
    pub total_items: usize,
    pub agents_count: usize,
    pub distribution: Vec<AgentDistribution>,
}

/// Summarize a freshly inserted batch, one entry per agent in distribution order.
pub fn upload_summary(
    batch: BatchId,
    agents: &[ActiveAgent],
    inserted: &[ListItem],
) -> UploadSummary {
    let distribution = agents
        .iter()
        .map(|agent| AgentCount {
            agent_id: agent.id,
            agent_name: agent.name.clone(),
            agent_email: agent.email.clone(),
            item_count: inserted
                .iter()
                .filter(|item| item.assigned_to == agent.id)
                .count(),
        })
        .collect();

    UploadSummary {
        upload_batch: batch,
        total_items: inserted.len(),
        agents_count: agents.len(),
        distribution,
    }
}

/// Group stored items by agent, sorted by agent name (then id).
///
/// Agents without items do not appear.
pub fn group_by_agent(items: Vec<AssignedItem>) -> Vec<AgentDistribution> {
    let mut groups: IndexMap<AgentId, AgentDistribution> = IndexMap::new();

    for assigned in items {
        let group = groups
            .entry(assigned.item.assigned_to)
            .or_insert_with(|| AgentDistribution {
                agent_id: assigned.item.assigned_to,
                agent_name: assigned.agent_name.clone(),
                agent_email: assigned.agent_email.clone(),
                item_count: 0,
                items: Vec::new(),
            });
        group.item_count += 1;
        group.items.push(assigned.item);
    }

    let mut distribution: Vec<AgentDistribution> = groups.into_values().collect();
    distribution.sort_by(|a, b| {
        a.agent_name
            .cmp(&b.agent_name)
            .then(a.agent_id.cmp(&b.agent_id))
    });
    distribution
}

/// Rebuild a batch's distribution. `None` when the batch holds no items.
pub fn batch_distribution(batch: BatchId, items: Vec<AssignedItem>) -> Option<BatchDistribution> {
    if items.is_empty() {
        return None;
    }

    let distribution = group_by_agent(items);
    Some(BatchDistribution {
        upload_batch: batch,
        total_items: distribution.iter().map(|d| d.item_count).sum(),
        agents_count: distribution.len(),
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListStatus;

    fn agent(id: AgentId, name: &str) -> ActiveAgent {
        ActiveAgent {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn item(id: i64, agent_id: AgentId, batch: BatchId) -> ListItem {
        ListItem {
            id,
            first_name: format!("Contact {}", id),
            phone: format!("555000{}", id),
            notes: String::new(),
            assigned_to: agent_id,
            upload_batch: batch,
            status: ListStatus::Pending,
            uploaded_by: "admin@example.com".to_string(),
            created_at: "2026-10-19T12:00:00.000Z".to_string(),
        }
    }

    fn assigned(item: ListItem, agent: &ActiveAgent) -> AssignedItem {
        AssignedItem {
            item,
            agent_name: agent.name.clone(),
            agent_email: agent.email.clone(),
        }
    }

    #[test]
    fn test_upload_summary_keeps_zero_counts() {
        let batch = BatchId::new();
        let agents: Vec<ActiveAgent> = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, name)| agent(i as AgentId + 1, name))
            .collect();
        let inserted = vec![item(1, 1, batch), item(2, 2, batch)];

        let summary = upload_summary(batch, &agents, &inserted);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.agents_count, 5);
        let counts: Vec<usize> = summary.distribution.iter().map(|d| d.item_count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_group_by_agent_sorted_by_name() {
        let batch = BatchId::new();
        let zed = agent(1, "Zed");
        let amy = agent(2, "Amy");
        let items = vec![
            assigned(item(1, 1, batch), &zed),
            assigned(item(2, 1, batch), &zed),
            assigned(item(3, 2, batch), &amy),
        ];

        let groups = group_by_agent(items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].agent_name, "Amy");
        assert_eq!(groups[0].item_count, 1);
        assert_eq!(groups[1].agent_name, "Zed");
        assert_eq!(
            groups[1].items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_batch_distribution_excludes_idle_agents() {
        let batch = BatchId::new();
        let a = agent(1, "A");
        let b = agent(2, "B");
        let items = vec![assigned(item(1, 1, batch), &a), assigned(item(2, 2, batch), &b)];

        let rebuilt = batch_distribution(batch, items).unwrap();
        assert_eq!(rebuilt.total_items, 2);
        assert_eq!(rebuilt.agents_count, 2);
        assert!(rebuilt.distribution.iter().all(|d| d.item_count > 0));
    }

    #[test]
    fn test_empty_batch_distribution() {
        assert!(batch_distribution(BatchId::new(), Vec::new()).is_none());
    }
}
