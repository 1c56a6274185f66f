use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;
use crate::repository::pagination::{Page, PageRequest};

/// Generic repository trait for browsing stored entities, newest first
#[async_trait]
pub trait ListPage<DB: Database, T: Identifiable>: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
