use async_trait::async_trait;
use sqlx::Database;

use crate::models::auditable::Auditable;
use crate::repository::pagination::{Page, PageRequest};

/// Generic repository trait for loading the version history of an entity
///
/// Versions come newest first.
///
/// # Example
/// ```ignore
/// let page = repo.load_audits(record_id, PageRequest::new(20, 0)).await?;
/// println!("Page {} of {}", page.page_number(), page.total_pages());
/// ```
#[async_trait]
pub trait LoadAudits<DB: Database, T: Auditable>: Send + Sync {
    async fn load_audits(
        &self,
        id: i64,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
