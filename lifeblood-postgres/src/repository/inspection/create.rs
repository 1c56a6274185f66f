use async_trait::async_trait;
use lifeblood_api::ApiError;
use lifeblood_db::models::inspection::InspectionModel;
use lifeblood_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;
use tracing::debug;

use super::repo_impl::{bind_model, InspectionRepositoryImpl, INSERT_AUDIT};

impl InspectionRepositoryImpl {
    pub(super) async fn create_impl(
        &self,
        mut item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        if !item.has_consistent_stamp() {
            return Err(ApiError::ValidationError("partial audit stamp".to_string()).into());
        }

        let mut session = self.executor.session().await?;

        let id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('inspection', 'id'))")
            .fetch_one(session.conn()?)
            .await?;

        item.id = id;
        item.version = 0;
        item.antecedent_hash = 0;
        item.hash = item.compute_hash()?;

        bind_model(
            sqlx::query(
                r#"
                INSERT INTO inspection
                (id, form_date, inspector_name, donation_chairs_condition, blood_collection_equipment_condition,
                 monitoring_devices_condition, safety_equipment_condition, donor_name, donor_contact_number,
                 donor_health_screening_completed, donor_consent_form_completed, notes, user_email,
                 submission_time, last_modified_time, last_modified_by, edit_reason, business_key_hash,
                 version, antecedent_hash, hash)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
                "#,
            ),
            &item,
        )
        .execute(session.conn()?)
        .await?;

        bind_model(sqlx::query(INSERT_AUDIT), &item)
            .execute(session.conn()?)
            .await?;

        session.commit().await?;
        debug!("Inserted inspection {} with hash {}", item.id, item.hash);
        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, InspectionModel> for InspectionRepositoryImpl {
    async fn create(
        &self,
        item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        self.create_impl(item).await
    }
}
