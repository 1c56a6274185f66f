use sqlx::PgPool;
use std::sync::Arc;

use crate::executor::Executor;
use crate::repository::inspection::InspectionRepositoryImpl;

/// Builds repositories over one connection pool
pub struct PostgresRepositories {
    pool: PgPool,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository whose every call runs in its own committed transaction
    pub fn inspection_repository(&self) -> Arc<InspectionRepositoryImpl> {
        Arc::new(InspectionRepositoryImpl::new(Executor::Pool(self.pool.clone())))
    }

    /// Repository bound to one open transaction, which is never committed by
    /// the repository itself
    pub async fn transactional_inspection_repository(
        &self,
    ) -> Result<Arc<InspectionRepositoryImpl>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Arc::new(InspectionRepositoryImpl::new(
            Executor::from_transaction(tx),
        )))
    }
}
