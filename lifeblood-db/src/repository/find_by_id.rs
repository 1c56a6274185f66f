use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading one entity by its identifier
#[async_trait]
pub trait FindById<DB: Database, T: Identifiable>: Send + Sync {
    /// # Returns
    /// * `Ok(Some(T))` - The found entity
    /// * `Ok(None)` - If the entity does not exist
    /// * `Err` - An error if the query could not be executed
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>;
}
