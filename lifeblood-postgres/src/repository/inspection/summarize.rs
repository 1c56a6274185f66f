use async_trait::async_trait;
use lifeblood_api::SubmissionSummary;
use lifeblood_db::repository::summarize::Summarize;
use sqlx::{Postgres, Row};
use std::error::Error;

use super::repo_impl::InspectionRepositoryImpl;

impl InspectionRepositoryImpl {
    pub(super) async fn summarize_impl(
        &self,
    ) -> Result<SubmissionSummary, Box<dyn Error + Send + Sync>> {
        let mut session = self.executor.session().await?;
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_records,
                COUNT(last_modified_time) AS modified_records,
                COUNT(DISTINCT user_email) AS unique_users
            FROM inspection
            "#,
        )
        .fetch_one(session.conn()?)
        .await?;

        Ok(SubmissionSummary {
            total_records: row.try_get("total_records")?,
            modified_records: row.try_get("modified_records")?,
            unique_users: row.try_get("unique_users")?,
        })
    }
}

#[async_trait]
impl Summarize<Postgres> for InspectionRepositoryImpl {
    async fn summarize(&self) -> Result<SubmissionSummary, Box<dyn Error + Send + Sync>> {
        self.summarize_impl().await
    }
}
