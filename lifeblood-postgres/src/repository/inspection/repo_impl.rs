use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use lifeblood_db::models::inspection::InspectionModel;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use std::error::Error;

pub struct InspectionRepositoryImpl {
    pub executor: Executor,
}

impl InspectionRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

/// Binds every column of [`InspectionModel`] as `$1..$21`, in the column order
/// shared by `inspection` and `inspection_audit`.
pub(super) fn bind_model<'q>(
    query: Query<'q, Postgres, PgArguments>,
    item: &'q InspectionModel,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(item.id)
        .bind(item.form_date)
        .bind(item.inspector_name.as_str())
        .bind(item.donation_chairs_condition)
        .bind(item.blood_collection_equipment_condition)
        .bind(item.monitoring_devices_condition)
        .bind(item.safety_equipment_condition)
        .bind(item.donor_name.as_str())
        .bind(item.donor_contact_number.as_str())
        .bind(item.donor_health_screening_completed)
        .bind(item.donor_consent_form_completed)
        .bind(item.notes.as_deref())
        .bind(item.user_email.as_str())
        .bind(item.submission_time)
        .bind(item.last_modified_time)
        .bind(item.last_modified_by.as_deref())
        .bind(item.edit_reason.as_deref())
        .bind(item.business_key_hash)
        .bind(item.version)
        .bind(item.antecedent_hash)
        .bind(item.hash)
}

pub(super) const INSERT_AUDIT: &str = r#"
    INSERT INTO inspection_audit
    (id, form_date, inspector_name, donation_chairs_condition, blood_collection_equipment_condition,
     monitoring_devices_condition, safety_equipment_condition, donor_name, donor_contact_number,
     donor_health_screening_completed, donor_consent_form_completed, notes, user_email,
     submission_time, last_modified_time, last_modified_by, edit_reason, business_key_hash,
     version, antecedent_hash, hash)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
"#;

impl TryFromRow<PgRow> for InspectionModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(InspectionModel {
            id: row.try_get("id")?,
            form_date: row.try_get("form_date")?,
            inspector_name: get_heapless_string(row, "inspector_name")?,
            donation_chairs_condition: row.try_get("donation_chairs_condition")?,
            blood_collection_equipment_condition: row
                .try_get("blood_collection_equipment_condition")?,
            monitoring_devices_condition: row.try_get("monitoring_devices_condition")?,
            safety_equipment_condition: row.try_get("safety_equipment_condition")?,
            donor_name: get_heapless_string(row, "donor_name")?,
            donor_contact_number: get_heapless_string(row, "donor_contact_number")?,
            donor_health_screening_completed: row.try_get("donor_health_screening_completed")?,
            donor_consent_form_completed: row.try_get("donor_consent_form_completed")?,
            notes: row.try_get("notes")?,
            user_email: get_heapless_string(row, "user_email")?,
            submission_time: row.try_get("submission_time")?,
            last_modified_time: row.try_get("last_modified_time")?,
            last_modified_by: get_optional_heapless_string(row, "last_modified_by")?,
            edit_reason: get_optional_heapless_string(row, "edit_reason")?,
            business_key_hash: row.try_get("business_key_hash")?,
            version: row.try_get("version")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            hash: row.try_get("hash")?,
        })
    }
}
