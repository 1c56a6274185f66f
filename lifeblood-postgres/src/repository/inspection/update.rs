use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifeblood_api::ApiError;
use lifeblood_db::models::inspection::InspectionModel;
use lifeblood_db::repository::update_audited::UpdateAudited;
use sqlx::{Postgres, Row};
use std::error::Error;
use tracing::{debug, warn};

use super::repo_impl::{bind_model, InspectionRepositoryImpl, INSERT_AUDIT};
use crate::utils::get_heapless_string;

impl InspectionRepositoryImpl {
    pub(super) async fn update_impl(
        &self,
        mut item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        if item.audit_stamp().is_none() {
            return Err(ApiError::ValidationError(
                "update requires a complete audit stamp".to_string(),
            )
            .into());
        }
        let previous_hash = item.hash;

        let mut session = self.executor.session().await?;

        let stored = sqlx::query(
            "SELECT user_email, submission_time, version, hash FROM inspection WHERE id = $1 FOR UPDATE",
        )
        .bind(item.id)
        .fetch_optional(session.conn()?)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("inspection {}", item.id)))?;

        let stored_hash: i64 = stored.try_get("hash")?;
        if stored_hash != previous_hash {
            warn!("Inspection {} changed since it was loaded", item.id);
            return Err(ApiError::ConcurrentUpdate(item.id).into());
        }

        // Submitter and submission time are fixed at creation
        item.user_email = get_heapless_string(&stored, "user_email")?;
        let submission_time: DateTime<Utc> = stored.try_get("submission_time")?;
        item.submission_time = submission_time;
        let stored_version: i32 = stored.try_get("version")?;
        item.version = stored_version + 1;
        item.antecedent_hash = previous_hash;
        item.hash = item.compute_hash()?;

        bind_model(sqlx::query(INSERT_AUDIT), &item)
            .execute(session.conn()?)
            .await?;

        let rows_affected = bind_model(
            sqlx::query(
                r#"
                UPDATE inspection SET
                form_date = $2, inspector_name = $3,
                donation_chairs_condition = $4, blood_collection_equipment_condition = $5,
                monitoring_devices_condition = $6, safety_equipment_condition = $7,
                donor_name = $8, donor_contact_number = $9,
                donor_health_screening_completed = $10, donor_consent_form_completed = $11,
                notes = $12, user_email = $13, submission_time = $14,
                last_modified_time = $15, last_modified_by = $16, edit_reason = $17,
                business_key_hash = $18, version = $19, antecedent_hash = $20, hash = $21
                WHERE id = $1 AND hash = $22
                "#,
            ),
            &item,
        )
        .bind(previous_hash)
        .execute(session.conn()?)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(ApiError::ConcurrentUpdate(item.id).into());
        }

        session.commit().await?;
        debug!("Updated inspection {} to version {}", item.id, item.version);
        Ok(item)
    }
}

#[async_trait]
impl UpdateAudited<Postgres, InspectionModel> for InspectionRepositoryImpl {
    async fn update(
        &self,
        item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        self.update_impl(item).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::inspection::test_utils::{create_test_form, create_test_model, create_test_stamp};
    use crate::test_helper::setup_test_context;
    use lifeblood_api::ApiError;
    use lifeblood_db::repository::create::Create;
    use lifeblood_db::repository::find_by_id::FindById;
    use lifeblood_db::repository::update_audited::UpdateAudited;

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_update_bumps_version_and_chains_hash() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.inspection_repository;

        let saved = repo.create(create_test_model(&create_test_form())).await?;

        let mut changed = saved.clone();
        let mut form = saved.to_form();
        form.notes = Some("Monitor 2 display flickers".to_string());
        changed.apply_edit(&form, &create_test_stamp("flagged monitor"))?;
        let updated = repo.update(changed).await?;

        assert_eq!(updated.version, 1);
        assert_eq!(updated.antecedent_hash, saved.hash);
        assert_ne!(updated.hash, saved.hash);
        assert_eq!(updated.submission_time, saved.submission_time);

        let loaded = repo.find_by_id(saved.id).await?.expect("stored row");
        assert_eq!(loaded, updated);
        assert!(loaded.audit_stamp().is_some());

        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_stale_update_detected() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.inspection_repository;

        let saved = repo.create(create_test_model(&create_test_form())).await?;

        let mut first = saved.clone();
        first.apply_edit(&saved.to_form(), &create_test_stamp("first"))?;
        repo.update(first).await?;

        let mut second = saved.clone();
        second.apply_edit(&saved.to_form(), &create_test_stamp("second"))?;
        let error = repo.update(second).await.expect_err("stale hash");
        assert!(matches!(
            error.downcast_ref::<ApiError>(),
            Some(ApiError::ConcurrentUpdate(_))
        ));

        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial_test::serial]
    async fn test_update_without_stamp_rejected() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.inspection_repository;

        let saved = repo.create(create_test_model(&create_test_form())).await?;
        let error = repo.update(saved).await.expect_err("stamp required");
        assert!(matches!(
            error.downcast_ref::<ApiError>(),
            Some(ApiError::ValidationError(_))
        ));

        Ok(())
    }
}
