//! Agent directory operations.

use distributor::{ActiveAgent, AgentOrder};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Agent, NewAgent};

const AGENT_COLUMNS: &str =
    "id, name, email, country_code, mobile_number, is_active, created_at";

/// Create a new agent. Emails are stored lowercased and must be unique.
pub async fn create_agent(pool: &SqlitePool, agent: &NewAgent) -> Result<Agent> {
    let email = agent.email.trim().to_lowercase();

    sqlx::query_as::<_, Agent>(&format!(
        r#"
        INSERT INTO agents (name, email, country_code, mobile_number)
        VALUES (?, ?, ?, ?)
        RETURNING {AGENT_COLUMNS}
        "#
    ))
    .bind(agent.name.trim())
    .bind(&email)
    .bind(agent.country_code.trim())
    .bind(agent.mobile_number.trim())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Agent",
                    id: email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get an agent by ID.
pub async fn get_agent(pool: &SqlitePool, id: i64) -> Result<Agent> {
    sqlx::query_as::<_, Agent>(&format!(
        r#"
        SELECT {AGENT_COLUMNS}
        FROM agents
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Agent",
        id: id.to_string(),
    })
}

/// List agents, newest first, optionally only active or inactive ones.
pub async fn list_agents(pool: &SqlitePool, active: Option<bool>) -> Result<Vec<Agent>> {
    let agents = sqlx::query_as::<_, Agent>(&format!(
        r#"
        SELECT {AGENT_COLUMNS}
        FROM agents
        WHERE ? IS NULL OR is_active = ?
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(active)
    .bind(active)
    .fetch_all(pool)
    .await?;

    Ok(agents)
}

/// Active agents in the requested order, ready for distribution.
pub async fn list_active_agents(pool: &SqlitePool, order: AgentOrder) -> Result<Vec<ActiveAgent>> {
    // Only fixed column names reach the query text.
    let order_by = match order {
        AgentOrder::CreatedAt => "created_at ASC, id ASC",
        AgentOrder::Name => "name ASC, id ASC",
    };

    let rows = sqlx::query_as::<_, (i64, String, String)>(&format!(
        r#"
        SELECT id, name, email
        FROM agents
        WHERE is_active = 1
        ORDER BY {order_by}
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, email)| ActiveAgent { id, name, email })
        .collect())
}

/// Activate or deactivate an agent.
pub async fn set_agent_active(pool: &SqlitePool, id: i64, is_active: bool) -> Result<Agent> {
    sqlx::query_as::<_, Agent>(&format!(
        r#"
        UPDATE agents
        SET is_active = ?
        WHERE id = ?
        RETURNING {AGENT_COLUMNS}
        "#
    ))
    .bind(is_active)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Agent",
        id: id.to_string(),
    })
}

/// Count agents as `(total, active)`.
pub async fn count_agents(pool: &SqlitePool) -> Result<(i64, i64)> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*), COALESCE(SUM(is_active), 0)
        FROM agents
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
