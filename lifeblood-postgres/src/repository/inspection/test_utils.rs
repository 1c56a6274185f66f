use chrono::{NaiveDate, SubsecRound, Utc};
use lifeblood_api::{AuditStamp, EquipmentCondition, InspectionForm};
use lifeblood_db::models::inspection::InspectionModel;
use rand::Rng;

/// A valid form whose donor contact number is random, so repeated runs do
/// not collide with rows left behind by other tests.
pub fn create_test_form() -> InspectionForm {
    let mut rng = rand::thread_rng();
    let contact: String = (0..12).map(|_| rng.gen_range(0..10).to_string()).collect();
    InspectionForm {
        form_date: NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
        inspector_name: "Test Inspector".to_string(),
        donation_chairs_condition: EquipmentCondition::Good,
        blood_collection_equipment_condition: EquipmentCondition::Good,
        monitoring_devices_condition: EquipmentCondition::NeedsAttention,
        safety_equipment_condition: EquipmentCondition::Good,
        donor_name: "Test Donor".to_string(),
        donor_contact_number: contact,
        donor_health_screening_completed: true,
        donor_consent_form_completed: true,
        notes: None,
    }
}

pub fn create_test_model(form: &InspectionForm) -> InspectionModel {
    InspectionModel::new_submission(form, "tester@lifeblood.example", Utc::now()).unwrap()
}

pub fn create_test_stamp(reason: &str) -> AuditStamp {
    AuditStamp {
        last_modified_time: Utc::now().trunc_subsecs(6),
        last_modified_by: "editor@lifeblood.example".to_string(),
        edit_reason: reason.to_string(),
    }
}
