use lifeblood_api::IdentityResolver;
use lifeblood_db::InspectionService;
use lifeblood_postgres::{PostgresRepositories, repository::db_init::init_database};
use sqlx::{Postgres, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{config::Config, errors::Result, scim::ScimIdentityProvider};

#[derive(Clone)]
pub struct AppState {
    pub service: InspectionService<Postgres>,
    pub identity: IdentityResolver,
}

impl AppState {
    pub fn new(service: InspectionService<Postgres>, identity: IdentityResolver) -> Self {
        Self { service, identity }
    }

    /// Connects the pool and wires the identity chain from `config`.
    pub async fn init(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url)
            .await?;

        if config.init_schema {
            let applied = init_database(&pool).await?;
            info!("Database schema initialized ({})", applied.join(", "));
        }

        let repos = PostgresRepositories::new(pool);
        let service = InspectionService::<Postgres>::new(repos.inspection_repository());

        let mut identity = IdentityResolver::new();
        if let (Some(host), Some(token)) = (&config.identity_host, &config.identity_token) {
            let provider = ScimIdentityProvider::new(host, token)?;
            info!("Identity service fallback at {}", provider.endpoint());
            identity = identity.with_provider(Arc::new(provider));
        }

        Ok(Self::new(service, identity))
    }
}
