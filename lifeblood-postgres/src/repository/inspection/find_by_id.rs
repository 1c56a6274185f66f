use async_trait::async_trait;
use lifeblood_db::models::inspection::InspectionModel;
use lifeblood_db::repository::find_by_id::FindById;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::InspectionRepositoryImpl;
use crate::utils::TryFromRow;

impl InspectionRepositoryImpl {
    pub(super) async fn find_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<InspectionModel>, Box<dyn Error + Send + Sync>> {
        let mut session = self.executor.session().await?;
        let row = sqlx::query("SELECT * FROM inspection WHERE id = $1")
            .bind(id)
            .fetch_optional(session.conn()?)
            .await?;

        match row {
            Some(row) => Ok(Some(InspectionModel::try_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FindById<Postgres, InspectionModel> for InspectionRepositoryImpl {
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<InspectionModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_id_impl(id).await
    }
}
