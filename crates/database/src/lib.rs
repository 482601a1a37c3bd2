//! SQLite record store for distributed contact lists.
//!
//! This crate persists agents and the list items they are assigned, and
//! implements the `distributor` store traits on top of SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{agent, Database, NewAgent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:distribution.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Register an agent
//!     let new_agent = NewAgent {
//!         name: "Asha".to_string(),
//!         email: "asha@example.com".to_string(),
//!         country_code: "+91".to_string(),
//!         mobile_number: "9876543210".to_string(),
//!     };
//!     agent::create_agent(db.pool(), &new_agent).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod batch;
pub mod error;
pub mod list_item;
pub mod models;
mod store_impls;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{Agent, NewAgent};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/distribution.db?mode=rwc").await?;
    ///
    /// // In-memory database (one connection, so every query sees the same data)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distributor::{
        AgentOrder, BatchId, BatchRecorder, Distributor, DistributorConfig, DistributorError,
        ItemFilter, ListStatus, NewListItem, Page, UploadConfig, UploadedFile,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn new_agent(name: &str, email: &str) -> NewAgent {
        NewAgent {
            name: name.to_string(),
            email: email.to_string(),
            country_code: "+91".to_string(),
            mobile_number: "9876543210".to_string(),
        }
    }

    fn new_item(first_name: &str, agent_id: i64, batch: BatchId) -> NewListItem {
        NewListItem {
            first_name: first_name.to_string(),
            phone: "555".to_string(),
            notes: String::new(),
            assigned_to: agent_id,
            upload_batch: batch,
            uploaded_by: "admin".to_string(),
            status: ListStatus::Pending,
        }
    }

    fn distributor(db: &Database, temp: &TempDir) -> Distributor {
        let store = Arc::new(db.clone());
        let config = DistributorConfig {
            upload: UploadConfig {
                temp_directory: temp.path().to_path_buf(),
                ..UploadConfig::default()
            },
            agent_order: AgentOrder::CreatedAt,
        };
        Distributor::new(store.clone(), store, config)
    }

    #[tokio::test]
    async fn test_agent_crud() {
        let db = test_db().await;

        // Create
        let created = agent::create_agent(db.pool(), &new_agent("Asha", "Asha@Example.com"))
            .await
            .unwrap();
        assert_eq!(created.email, "asha@example.com");
        assert!(created.is_active);

        // Read
        let fetched = agent::get_agent(db.pool(), created.id).await.unwrap();
        assert_eq!(fetched.name, "Asha");

        // Deactivate
        let updated = agent::set_agent_active(db.pool(), created.id, false)
            .await
            .unwrap();
        assert!(!updated.is_active);

        // List
        assert_eq!(agent::list_agents(db.pool(), None).await.unwrap().len(), 1);
        assert!(agent::list_agents(db.pool(), Some(true))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(agent::count_agents(db.pool()).await.unwrap(), (1, 0));

        // Missing
        let result = agent::get_agent(db.pool(), 999).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_agent_email() {
        let db = test_db().await;

        agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();
        let result = agent::create_agent(db.pool(), &new_agent("Other", "ASHA@example.com")).await;

        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_active_agent_order() {
        let db = test_db().await;

        let zed = agent::create_agent(db.pool(), &new_agent("Zed", "zed@example.com"))
            .await
            .unwrap();
        let amy = agent::create_agent(db.pool(), &new_agent("Amy", "amy@example.com"))
            .await
            .unwrap();
        let off = agent::create_agent(db.pool(), &new_agent("Off", "off@example.com"))
            .await
            .unwrap();
        agent::set_agent_active(db.pool(), off.id, false)
            .await
            .unwrap();

        let by_creation = agent::list_active_agents(db.pool(), AgentOrder::CreatedAt)
            .await
            .unwrap();
        let ids: Vec<i64> = by_creation.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![zed.id, amy.id]);

        let by_name = agent::list_active_agents(db.pool(), AgentOrder::Name)
            .await
            .unwrap();
        let names: Vec<&str> = by_name.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[tokio::test]
    async fn test_batch_lifecycle() {
        let db = test_db().await;
        let asha = agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();
        let ravi = agent::create_agent(db.pool(), &new_agent("Ravi", "ravi@example.com"))
            .await
            .unwrap();

        let batch = BatchId::new();
        let inserted = list_item::insert_items(
            db.pool(),
            &[
                new_item("A", asha.id, batch),
                new_item("B", asha.id, batch),
                new_item("C", ravi.id, batch),
            ],
        )
        .await
        .unwrap();
        assert_eq!(inserted.len(), 3);
        assert!(inserted.iter().all(|item| item.upload_batch == batch));

        let items = batch::batch_items(db.pool(), batch).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.item.first_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(items[2].agent_name, "Ravi");

        let batches = batch::list_batches(db.pool()).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].upload_batch, batch);
        assert_eq!(batches[0].total_items, 3);
        assert_eq!(batches[0].uploaded_by, "admin");
        assert_eq!(batch::count_batches(db.pool()).await.unwrap(), (1, 3));

        assert_eq!(batch::delete_batch(db.pool(), batch).await.unwrap(), 3);
        assert_eq!(batch::delete_batch(db.pool(), batch).await.unwrap(), 0);
        assert!(batch::batch_items(db.pool(), batch).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rolls_back_on_failure() {
        let db = test_db().await;
        let asha = agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();

        let batch = BatchId::new();
        // Unknown agent id breaks the foreign key on the second row.
        let result = list_item::insert_items(
            db.pool(),
            &[new_item("A", asha.id, batch), new_item("B", 999, batch)],
        )
        .await;

        assert!(result.is_err());
        assert!(batch::batch_items(db.pool(), batch).await.unwrap().is_empty());
        assert_eq!(batch::count_batches(db.pool()).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_list_items_filter_and_pages() {
        let db = test_db().await;
        let asha = agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();
        let ravi = agent::create_agent(db.pool(), &new_agent("Ravi", "ravi@example.com"))
            .await
            .unwrap();

        let batch = BatchId::new();
        let items: Vec<NewListItem> = (0..5)
            .map(|i| new_item(&format!("C{i}"), if i < 3 { asha.id } else { ravi.id }, batch))
            .collect();
        list_item::insert_items(db.pool(), &items).await.unwrap();

        let (page, total) = list_item::list_items(
            db.pool(),
            &ItemFilter::default(),
            Page::new(Some(1), Some(2)),
        )
        .await
        .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        // Newest first
        assert_eq!(page[0].item.first_name, "C4");

        let (last, _) = list_item::list_items(
            db.pool(),
            &ItemFilter::default(),
            Page::new(Some(3), Some(2)),
        )
        .await
        .unwrap();
        assert_eq!(last.len(), 1);

        let filter = ItemFilter {
            agent_id: Some(asha.id),
            ..ItemFilter::default()
        };
        let (mine, total) = list_item::list_items(db.pool(), &filter, Page::new(None, None))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert!(mine.iter().all(|i| i.item.assigned_to == asha.id));

        let filter = ItemFilter {
            status: Some(ListStatus::Completed),
            ..ItemFilter::default()
        };
        let (done, total) = list_item::list_items(db.pool(), &filter, Page::new(None, None))
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(done.is_empty());
    }

    #[tokio::test]
    async fn test_item_status_and_delete() {
        let db = test_db().await;
        let asha = agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();
        let inserted = list_item::insert_items(db.pool(), &[new_item("A", asha.id, BatchId::new())])
            .await
            .unwrap();
        let id = inserted[0].id;

        let updated = list_item::update_status(db.pool(), id, ListStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, ListStatus::InProgress);
        assert_eq!(
            list_item::get_item(db.pool(), id).await.unwrap().status,
            ListStatus::InProgress
        );

        list_item::delete_item(db.pool(), id).await.unwrap();
        assert!(matches!(
            list_item::delete_item(db.pool(), id).await,
            Err(DatabaseError::NotFound { .. })
        ));

        // Through the store trait, missing rows are not errors.
        assert!(db.update_status(id, ListStatus::Completed).await.unwrap().is_none());
        assert!(!BatchRecorder::delete_item(&db, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_with_no_active_agents_writes_nothing() {
        let db = test_db().await;
        let temp = TempDir::new().unwrap();
        let distributor = distributor(&db, &temp);

        let file = UploadedFile::store(
            temp.path(),
            "contacts.csv",
            b"FirstName,Phone,Notes\nAnn,555-0101,\n",
        )
        .unwrap();
        let result = distributor.upload(file, "admin").await;

        assert!(matches!(result, Err(DistributorError::NoActiveAgents)));
        assert_eq!(batch::count_batches(db.pool()).await.unwrap(), (0, 0));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_distributes_and_rebuilds() {
        let db = test_db().await;
        let temp = TempDir::new().unwrap();
        let distributor = distributor(&db, &temp);

        let first = agent::create_agent(db.pool(), &new_agent("Asha", "asha@example.com"))
            .await
            .unwrap();
        agent::create_agent(db.pool(), &new_agent("Ravi", "ravi@example.com"))
            .await
            .unwrap();

        let file = UploadedFile::store(
            temp.path(),
            "contacts.csv",
            b"FirstName,Phone,Notes\nAnn,1,\nBen,2,call\nCid,3,\n",
        )
        .unwrap();
        let summary = distributor.upload(file, "admin").await.unwrap();

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.agents_count, 2);
        assert_eq!(summary.distribution[0].agent_id, first.id);
        assert_eq!(summary.distribution[0].item_count, 2);
        assert_eq!(summary.distribution[1].item_count, 1);

        let rebuilt = distributor.distribution(summary.upload_batch).await.unwrap();
        assert_eq!(rebuilt.total_items, 3);
        assert_eq!(rebuilt.distribution[0].agent_name, "Asha");
        let names: Vec<&str> = rebuilt.distribution[0]
            .items
            .iter()
            .map(|i| i.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ann", "Ben"]);

        assert_eq!(distributor.delete_batch(summary.upload_batch).await.unwrap(), 3);
        assert!(matches!(
            distributor.delete_batch(summary.upload_batch).await,
            Err(DistributorError::BatchNotFound(_))
        ));
    }
}
