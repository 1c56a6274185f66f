use async_trait::async_trait;
use lifeblood_api::SubmissionSummary;
use sqlx::Database;

/// Repository trait for table-level submission metrics
#[async_trait]
pub trait Summarize<DB: Database>: Send + Sync {
    async fn summarize(&self) -> Result<SubmissionSummary, Box<dyn std::error::Error + Send + Sync>>;
}
