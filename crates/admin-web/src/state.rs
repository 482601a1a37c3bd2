//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use distributor::{Distributor, DistributorConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Upload pipeline backed by the database.
    pub distributor: Distributor,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, config: DistributorConfig) -> Self {
        let store = Arc::new(db.clone());
        let distributor = Distributor::new(store.clone(), store, config);
        Self { db, distributor }
    }
}
