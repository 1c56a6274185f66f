use async_trait::async_trait;
use sqlx::Database;

use crate::models::auditable::Auditable;

/// Generic repository trait for updating an entity while extending its history
///
/// The item passed in carries the hash it was loaded with. Implementations
/// write the new state only if the stored hash still matches, append a
/// history entry, and bump the version, all in one transaction.
///
/// # Example
/// ```ignore
/// let mut model = repo.find_by_id(id).await?.ok_or("not found")?;
/// model.apply_edit(&form, &stamp)?;
/// let saved = repo.update(model).await?;
/// assert_eq!(saved.version, 1);
/// ```
#[async_trait]
pub trait UpdateAudited<DB: Database, T: Auditable>: Send + Sync {
    /// # Returns
    /// * `Ok(T)` - The stored entity with its new version and hash
    /// * `Err` - [`lifeblood_api::ApiError::ConcurrentUpdate`] when the row
    ///   changed since it was loaded, [`lifeblood_api::ApiError::NotFound`]
    ///   when it does not exist, or any storage error
    async fn update(&self, item: T) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
