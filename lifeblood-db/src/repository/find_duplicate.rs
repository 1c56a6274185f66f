use async_trait::async_trait;
use lifeblood_api::{DuplicateMatch, InspectionForm};
use sqlx::Database;

/// Repository trait for looking up an earlier submission of the same inspection
///
/// A match requires equality on every business-key field of
/// [`InspectionForm`], with absent notes equal to empty notes. Only the most
/// recent match by submission time is returned.
#[async_trait]
pub trait FindDuplicate<DB: Database>: Send + Sync {
    async fn find_duplicate(
        &self,
        form: &InspectionForm,
    ) -> Result<Option<DuplicateMatch>, Box<dyn std::error::Error + Send + Sync>>;
}
