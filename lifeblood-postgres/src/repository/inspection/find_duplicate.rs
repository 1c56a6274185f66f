use async_trait::async_trait;
use lifeblood_api::{DuplicateMatch, InspectionForm};
use lifeblood_db::models::inspection::business_key_hash;
use lifeblood_db::repository::find_duplicate::FindDuplicate;
use sqlx::{Postgres, Row};
use std::error::Error;

use super::repo_impl::InspectionRepositoryImpl;

impl InspectionRepositoryImpl {
    pub(super) async fn find_duplicate_impl(
        &self,
        form: &InspectionForm,
    ) -> Result<Option<DuplicateMatch>, Box<dyn Error + Send + Sync>> {
        let key = business_key_hash(form)?;
        let mut session = self.executor.session().await?;

        // The hash narrows the scan through its index, the column
        // comparisons rule out collisions.
        let row = sqlx::query(
            r#"
            SELECT id, submission_time, user_email FROM inspection
            WHERE business_key_hash = $1
              AND form_date = $2
              AND inspector_name = $3
              AND donation_chairs_condition = $4
              AND blood_collection_equipment_condition = $5
              AND monitoring_devices_condition = $6
              AND safety_equipment_condition = $7
              AND donor_name = $8
              AND donor_contact_number = $9
              AND donor_health_screening_completed = $10
              AND donor_consent_form_completed = $11
              AND COALESCE(notes, '') = $12
            ORDER BY submission_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(key)
        .bind(form.form_date)
        .bind(form.inspector_name.as_str())
        .bind(form.donation_chairs_condition)
        .bind(form.blood_collection_equipment_condition)
        .bind(form.monitoring_devices_condition)
        .bind(form.safety_equipment_condition)
        .bind(form.donor_name.as_str())
        .bind(form.donor_contact_number.as_str())
        .bind(form.donor_health_screening_completed)
        .bind(form.donor_consent_form_completed)
        .bind(form.normalized_notes())
        .fetch_optional(session.conn()?)
        .await?;

        match row {
            Some(row) => Ok(Some(DuplicateMatch {
                id: row.try_get("id")?,
                submission_time: row.try_get("submission_time")?,
                user_email: row.try_get("user_email")?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FindDuplicate<Postgres> for InspectionRepositoryImpl {
    async fn find_duplicate(
        &self,
        form: &InspectionForm,
    ) -> Result<Option<DuplicateMatch>, Box<dyn Error + Send + Sync>> {
        self.find_duplicate_impl(form).await
    }
}
