use async_trait::async_trait;
use lifeblood_db::models::inspection::InspectionModel;
use lifeblood_db::repository::list_page::ListPage;
use lifeblood_db::repository::pagination::{Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::InspectionRepositoryImpl;
use crate::utils::{page_bounds, TryFromRow};

impl InspectionRepositoryImpl {
    pub(super) async fn list_impl(
        &self,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        let (limit, offset) = page_bounds(&page)?;
        let mut session = self.executor.session().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspection")
            .fetch_one(session.conn()?)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM inspection
            ORDER BY submission_time DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
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
impl ListPage<Postgres, InspectionModel> for InspectionRepositoryImpl {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        self.list_impl(page).await
    }
}
