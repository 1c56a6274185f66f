use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::condition::EquipmentCondition;
use super::field::{FieldValue, InspectionField};
use super::validation::{validate_contact_number, validate_required_text};

/// The user-entered part of an inspection checklist.
///
/// Every field here belongs to the business key: two submissions with equal
/// forms describe the same inspection, regardless of who sent them or when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InspectionForm {
    pub form_date: NaiveDate,

    #[validate(
        custom(function = "validate_required_text", message = "Inspector Name is required"),
        length(max = 100)
    )]
    pub inspector_name: String,

    pub donation_chairs_condition: EquipmentCondition,
    pub blood_collection_equipment_condition: EquipmentCondition,
    pub monitoring_devices_condition: EquipmentCondition,
    pub safety_equipment_condition: EquipmentCondition,

    #[validate(
        custom(function = "validate_required_text", message = "Donor Name is required"),
        length(max = 100)
    )]
    pub donor_name: String,

    /// Digits only, 8 to 15 characters
    #[validate(custom(function = "validate_contact_number"))]
    pub donor_contact_number: String,

    pub donor_health_screening_completed: bool,
    pub donor_consent_form_completed: bool,

    #[validate(length(max = 2000))]
    #[serde(default)]
    pub notes: Option<String>,
}

impl InspectionForm {
    /// Notes with absence collapsed to the empty string, the form used for
    /// duplicate matching.
    pub fn normalized_notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn value_of(&self, field: InspectionField) -> FieldValue {
        match field {
            InspectionField::FormDate => FieldValue::Text(self.form_date.to_string()),
            InspectionField::InspectorName => FieldValue::Text(self.inspector_name.clone()),
            InspectionField::DonationChairsCondition => {
                FieldValue::Text(self.donation_chairs_condition.to_string())
            }
            InspectionField::BloodCollectionEquipmentCondition => {
                FieldValue::Text(self.blood_collection_equipment_condition.to_string())
            }
            InspectionField::MonitoringDevicesCondition => {
                FieldValue::Text(self.monitoring_devices_condition.to_string())
            }
            InspectionField::SafetyEquipmentCondition => {
                FieldValue::Text(self.safety_equipment_condition.to_string())
            }
            InspectionField::DonorName => FieldValue::Text(self.donor_name.clone()),
            InspectionField::DonorContactNumber => {
                FieldValue::Text(self.donor_contact_number.clone())
            }
            InspectionField::DonorHealthScreeningCompleted => {
                FieldValue::Flag(self.donor_health_screening_completed)
            }
            InspectionField::DonorConsentFormCompleted => {
                FieldValue::Flag(self.donor_consent_form_completed)
            }
            InspectionField::Notes => match &self.notes {
                Some(notes) => FieldValue::Text(notes.clone()),
                None => FieldValue::Missing,
            },
        }
    }

    /// Values of all user-facing fields in declaration order
    pub fn field_values(&self) -> Vec<(InspectionField, FieldValue)> {
        InspectionField::ALL
            .iter()
            .map(|field| (*field, self.value_of(*field)))
            .collect()
    }
}

/// Trio recorded on every update. Kept as one value so a record either has
/// all three parts or none of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub last_modified_time: DateTime<Utc>,
    pub last_modified_by: String,
    pub edit_reason: String,
}

/// A stored inspection checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: i64,
    #[serde(flatten)]
    pub form: InspectionForm,
    pub user_email: String,
    pub submission_time: DateTime<Utc>,
    pub last_modification: Option<AuditStamp>,
}

impl InspectionRecord {
    pub fn is_modified(&self) -> bool {
        self.last_modification.is_some()
    }

    /// Short label used when picking a record to edit: `ID - date - inspector - donor`
    pub fn selection_label(&self) -> String {
        format!(
            "ID {} - {} - {} - {}",
            self.id, self.form.form_date, self.form.inspector_name, self.form.donor_name
        )
    }
}

/// Identity of the latest stored record sharing a candidate's business key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub id: i64,
    pub submission_time: DateTime<Utc>,
    pub user_email: String,
}

/// Body of a new submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub form: InspectionForm,

    /// Submit on behalf of another user instead of the resolved identity
    #[validate(email)]
    #[serde(default)]
    pub submitted_as: Option<String>,
}

/// Body of an edit to an existing record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub form: InspectionForm,

    #[validate(
        custom(function = "validate_required_text", message = "Reason for Edit is required"),
        length(max = 500)
    )]
    pub edit_reason: String,

    #[validate(email)]
    #[serde(default)]
    pub submitted_as: Option<String>,
}

/// Table-level metrics shown next to the submission list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub total_records: i64,
    pub modified_records: i64,
    pub unique_users: i64,
}

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;

    pub fn sample_form() -> InspectionForm {
        InspectionForm {
            form_date: NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
            inspector_name: "Jane Inspector".to_string(),
            donation_chairs_condition: EquipmentCondition::Good,
            blood_collection_equipment_condition: EquipmentCondition::Good,
            monitoring_devices_condition: EquipmentCondition::NeedsAttention,
            safety_equipment_condition: EquipmentCondition::Good,
            donor_name: "Sam Donor".to_string(),
            donor_contact_number: "0412345678".to_string(),
            donor_health_screening_completed: true,
            donor_consent_form_completed: true,
            notes: None,
        }
    }

    pub fn sample_record(id: i64) -> InspectionRecord {
        InspectionRecord {
            id,
            form: sample_form(),
            user_email: "jane@lifeblood.example".to_string(),
            submission_time: Utc::now(),
            last_modification: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::{sample_form, sample_record};
    use super::*;

    #[test]
    fn test_valid_form_passes() {
        assert!(sample_form().validate().is_ok());
    }

    #[test]
    fn test_short_contact_number_rejected() {
        let mut form = sample_form();
        form.donor_contact_number = "12345".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("donor_contact_number"));
    }

    #[test]
    fn test_blank_names_rejected() {
        let mut form = sample_form();
        form.inspector_name = "   ".to_string();
        form.donor_name = String::new();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("inspector_name"));
        assert!(fields.contains_key("donor_name"));
    }

    #[test]
    fn test_edit_request_requires_reason() {
        let request = EditRequest {
            form: sample_form(),
            edit_reason: " ".to_string(),
            submitted_as: None,
        };
        let message = crate::format_validation_errors(&request.validate().unwrap_err());
        assert!(message.contains("Reason for Edit is required"));
    }

    #[test]
    fn test_nested_form_errors_reported() {
        let mut form = sample_form();
        form.donor_contact_number = "04-1234-5678".to_string();
        let request = SubmitRequest {
            form,
            submitted_as: Some("not-an-email".to_string()),
        };
        let message = crate::format_validation_errors(&request.validate().unwrap_err());
        assert!(message.contains("donor_contact_number"));
        assert!(message.contains("submitted_as"));
    }

    #[test]
    fn test_submit_request_deserializes_flat_body() {
        let body = r#"{
            "form_date": "2025-09-28",
            "inspector_name": "Jane Inspector",
            "donation_chairs_condition": "Good",
            "blood_collection_equipment_condition": "Out of Service",
            "monitoring_devices_condition": "Needs Attention",
            "safety_equipment_condition": "Good",
            "donor_name": "Sam Donor",
            "donor_contact_number": "12345678",
            "donor_health_screening_completed": true,
            "donor_consent_form_completed": false
        }"#;
        let request: SubmitRequest = serde_json::from_str(body).unwrap();
        assert_eq!(
            request.form.blood_collection_equipment_condition,
            EquipmentCondition::OutOfService
        );
        assert_eq!(request.form.notes, None);
        assert_eq!(request.submitted_as, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_notes_normalization() {
        let mut form = sample_form();
        assert_eq!(form.normalized_notes(), "");
        assert_eq!(form.value_of(InspectionField::Notes), FieldValue::Missing);
        form.notes = Some("chair 3 wobbly".to_string());
        assert_eq!(form.normalized_notes(), "chair 3 wobbly");
    }

    #[test]
    fn test_selection_label() {
        let record = sample_record(7);
        assert_eq!(
            record.selection_label(),
            "ID 7 - 2025-09-28 - Jane Inspector - Sam Donor"
        );
        assert!(!record.is_modified());
    }
}
