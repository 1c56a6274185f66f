use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for storing a new entity
///
/// The store assigns the identifier and writes the initial history entry in
/// the same transaction.
///
/// # Example
/// ```ignore
/// impl Create<Postgres, InspectionModel> for InspectionRepositoryImpl {
///     async fn create(&self, item: InspectionModel) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait Create<DB: Database, T: Identifiable>: Send + Sync {
    /// Store `item`
    ///
    /// # Returns
    /// * `Ok(T)` - The stored entity with id and hash populated
    /// * `Err` - If the transaction could not be committed; nothing is stored
    async fn create(&self, item: T) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
