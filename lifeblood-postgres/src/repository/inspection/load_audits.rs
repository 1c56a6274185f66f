use async_trait::async_trait;
use lifeblood_db::models::inspection::InspectionModel;
use lifeblood_db::repository::load_audits::LoadAudits;
use lifeblood_db::repository::pagination::{Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::InspectionRepositoryImpl;
use crate::utils::{page_bounds, TryFromRow};

impl InspectionRepositoryImpl {
    pub(super) async fn load_audits_impl(
        &self,
        id: i64,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        let (limit, offset) = page_bounds(&page)?;
        let mut session = self.executor.session().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspection_audit WHERE id = $1")
            .bind(id)
            .fetch_one(session.conn()?)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM inspection_audit
            WHERE id = $1
            ORDER BY version DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id)
        .bind(limit)
        .bind(offset)
        .fetch_all(session.conn()?)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(InspectionModel::try_from_row(&row)?);
        }

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl LoadAudits<Postgres, InspectionModel> for InspectionRepositoryImpl {
    async fn load_audits(
        &self,
        id: i64,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        self.load_audits_impl(id, page).await
    }
}
