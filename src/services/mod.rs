//! Business logic services

pub mod visitors;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub visitors: visitors::VisitorsService,
    repository: Option<Repository>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            visitors: visitors::VisitorsService::new(Arc::new(repository.visitors.clone())),
            repository: Some(repository),
        }
    }

    /// Services over an arbitrary store, without a live database behind them
    pub fn with_store(store: Arc<dyn crate::repository::VisitorStore>) -> Self {
        Self {
            visitors: visitors::VisitorsService::new(store),
            repository: None,
        }
    }

    /// Check database connectivity; services built without a pool are always ready
    pub async fn ready(&self) -> crate::error::AppResult<()> {
        match &self.repository {
            Some(repository) => repository.ping().await,
            None => Ok(()),
        }
    }
}
