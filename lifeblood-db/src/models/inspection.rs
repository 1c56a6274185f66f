use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use heapless::String as HeaplessString;
use lifeblood_api::{
    ApiError, ApiResult, AuditStamp, DuplicateMatch, EquipmentCondition, InspectionForm,
    InspectionRecord,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// Database model for an inspection checklist.
///
/// The same shape is used for the live `inspection` row and for every row of
/// the `inspection_audit` history table; `version` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionModel {
    /// Assigned by storage on insert, `0` before that
    pub id: i64,

    pub form_date: NaiveDate,
    pub inspector_name: HeaplessString<{ NAME_MAX_CHARS * UTF8_MAX_WIDTH }>,
    pub donation_chairs_condition: EquipmentCondition,
    pub blood_collection_equipment_condition: EquipmentCondition,
    pub monitoring_devices_condition: EquipmentCondition,
    pub safety_equipment_condition: EquipmentCondition,
    pub donor_name: HeaplessString<{ NAME_MAX_CHARS * UTF8_MAX_WIDTH }>,
    pub donor_contact_number: HeaplessString<CONTACT_MAX_CHARS>,
    pub donor_health_screening_completed: bool,
    pub donor_consent_form_completed: bool,
    pub notes: Option<String>,

    pub user_email: HeaplessString<{ EMAIL_MAX_CHARS * UTF8_MAX_WIDTH }>,
    pub submission_time: DateTime<Utc>,

    /// Audit stamp. Either all three are set or none is.
    pub last_modified_time: Option<DateTime<Utc>>,
    pub last_modified_by: Option<HeaplessString<{ EMAIL_MAX_CHARS * UTF8_MAX_WIDTH }>>,
    pub edit_reason: Option<HeaplessString<{ REASON_MAX_CHARS * UTF8_MAX_WIDTH }>>,

    /// Hash over the business key, see [`business_key_hash`]
    pub business_key_hash: i64,

    /// 0 for the initial create, incremented on every update
    pub version: i32,

    /// Hash of the previous version for chain verification (0 for initial create)
    pub antecedent_hash: i64,

    /// Hash of the entity with hash field set to 0
    /// - 0: for new entities not yet created
    /// - Non-zero: computed hash providing tamper detection
    pub hash: i64,
}

impl Identifiable for InspectionModel {
    fn get_id(&self) -> i64 {
        self.id
    }
}

impl Auditable for InspectionModel {
    fn get_version(&self) -> i32 {
        self.version
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}

pub const NAME_MAX_CHARS: usize = 100;
pub const CONTACT_MAX_CHARS: usize = 15;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const REASON_MAX_CHARS: usize = 500;

/// Bytes one `char` can take in UTF-8. Column limits count characters, the
/// heapless buffers count bytes.
pub const UTF8_MAX_WIDTH: usize = 4;

fn bounded<const N: usize>(
    field: &str,
    value: &str,
    max_chars: usize,
) -> ApiResult<HeaplessString<N>> {
    let too_long =
        || ApiError::ValidationError(format!("{field}: must be at most {max_chars} characters"));
    if value.chars().count() > max_chars {
        return Err(too_long());
    }
    HeaplessString::from_str(value).map_err(|_| too_long())
}

/// The fields that identify an inspection regardless of who submitted it
/// or when. Absent notes are folded into the empty string.
#[derive(Serialize)]
struct BusinessKey<'a> {
    form_date: NaiveDate,
    inspector_name: &'a str,
    donation_chairs_condition: EquipmentCondition,
    blood_collection_equipment_condition: EquipmentCondition,
    monitoring_devices_condition: EquipmentCondition,
    safety_equipment_condition: EquipmentCondition,
    donor_name: &'a str,
    donor_contact_number: &'a str,
    donor_health_screening_completed: bool,
    donor_consent_form_completed: bool,
    notes: &'a str,
}

/// Stable hash of the business key of `form`, used to narrow duplicate lookups.
pub fn business_key_hash(form: &InspectionForm) -> Result<i64, String> {
    hash_as_i64(&BusinessKey {
        form_date: form.form_date,
        inspector_name: &form.inspector_name,
        donation_chairs_condition: form.donation_chairs_condition,
        blood_collection_equipment_condition: form.blood_collection_equipment_condition,
        monitoring_devices_condition: form.monitoring_devices_condition,
        safety_equipment_condition: form.safety_equipment_condition,
        donor_name: &form.donor_name,
        donor_contact_number: &form.donor_contact_number,
        donor_health_screening_completed: form.donor_health_screening_completed,
        donor_consent_form_completed: form.donor_consent_form_completed,
        notes: form.normalized_notes(),
    })
}

impl InspectionModel {
    /// Builds an unsaved model for a new submission.
    ///
    /// Timestamps are kept at microsecond precision, the resolution of the
    /// stored column.
    pub fn new_submission(
        form: &InspectionForm,
        user_email: &str,
        submission_time: DateTime<Utc>,
    ) -> ApiResult<Self> {
        let mut model = Self {
            id: 0,
            form_date: form.form_date,
            inspector_name: bounded("inspector_name", &form.inspector_name, NAME_MAX_CHARS)?,
            donation_chairs_condition: form.donation_chairs_condition,
            blood_collection_equipment_condition: form.blood_collection_equipment_condition,
            monitoring_devices_condition: form.monitoring_devices_condition,
            safety_equipment_condition: form.safety_equipment_condition,
            donor_name: bounded("donor_name", &form.donor_name, NAME_MAX_CHARS)?,
            donor_contact_number: bounded("donor_contact_number", &form.donor_contact_number, CONTACT_MAX_CHARS)?,
            donor_health_screening_completed: form.donor_health_screening_completed,
            donor_consent_form_completed: form.donor_consent_form_completed,
            notes: form.notes.clone(),
            user_email: bounded("user_email", user_email, EMAIL_MAX_CHARS)?,
            submission_time: submission_time.trunc_subsecs(6),
            last_modified_time: None,
            last_modified_by: None,
            edit_reason: None,
            business_key_hash: 0,
            version: 0,
            antecedent_hash: 0,
            hash: 0,
        };
        model.business_key_hash = business_key_hash(form).map_err(ApiError::InternalError)?;
        Ok(model)
    }

    /// Replaces the form fields and stamps the edit. `id`, `user_email`,
    /// `submission_time` and the hash chain are left for the repository.
    pub fn apply_edit(&mut self, form: &InspectionForm, stamp: &AuditStamp) -> ApiResult<()> {
        self.form_date = form.form_date;
        self.inspector_name = bounded("inspector_name", &form.inspector_name, NAME_MAX_CHARS)?;
        self.donation_chairs_condition = form.donation_chairs_condition;
        self.blood_collection_equipment_condition = form.blood_collection_equipment_condition;
        self.monitoring_devices_condition = form.monitoring_devices_condition;
        self.safety_equipment_condition = form.safety_equipment_condition;
        self.donor_name = bounded("donor_name", &form.donor_name, NAME_MAX_CHARS)?;
        self.donor_contact_number = bounded("donor_contact_number", &form.donor_contact_number, CONTACT_MAX_CHARS)?;
        self.donor_health_screening_completed = form.donor_health_screening_completed;
        self.donor_consent_form_completed = form.donor_consent_form_completed;
        self.notes = form.notes.clone();
        self.last_modified_time = Some(stamp.last_modified_time.trunc_subsecs(6));
        self.last_modified_by = Some(bounded("last_modified_by", &stamp.last_modified_by, EMAIL_MAX_CHARS)?);
        self.edit_reason = Some(bounded("edit_reason", &stamp.edit_reason, REASON_MAX_CHARS)?);
        self.business_key_hash = business_key_hash(form).map_err(ApiError::InternalError)?;
        Ok(())
    }

    pub fn to_form(&self) -> InspectionForm {
        InspectionForm {
            form_date: self.form_date,
            inspector_name: self.inspector_name.to_string(),
            donation_chairs_condition: self.donation_chairs_condition,
            blood_collection_equipment_condition: self.blood_collection_equipment_condition,
            monitoring_devices_condition: self.monitoring_devices_condition,
            safety_equipment_condition: self.safety_equipment_condition,
            donor_name: self.donor_name.to_string(),
            donor_contact_number: self.donor_contact_number.to_string(),
            donor_health_screening_completed: self.donor_health_screening_completed,
            donor_consent_form_completed: self.donor_consent_form_completed,
            notes: self.notes.clone(),
        }
    }

    /// The audit stamp, only when all three parts are present
    pub fn audit_stamp(&self) -> Option<AuditStamp> {
        match (
            self.last_modified_time,
            &self.last_modified_by,
            &self.edit_reason,
        ) {
            (Some(time), Some(by), Some(reason)) => Some(AuditStamp {
                last_modified_time: time,
                last_modified_by: by.to_string(),
                edit_reason: reason.to_string(),
            }),
            _ => None,
        }
    }

    /// True when the stamp is either fully present or fully absent
    pub fn has_consistent_stamp(&self) -> bool {
        let present = [
            self.last_modified_time.is_some(),
            self.last_modified_by.is_some(),
            self.edit_reason.is_some(),
        ];
        present.iter().all(|p| *p) || present.iter().all(|p| !*p)
    }

    pub fn to_record(&self) -> InspectionRecord {
        InspectionRecord {
            id: self.id,
            form: self.to_form(),
            user_email: self.user_email.to_string(),
            submission_time: self.submission_time,
            last_modification: self.audit_stamp(),
        }
    }

    pub fn to_duplicate_match(&self) -> DuplicateMatch {
        DuplicateMatch {
            id: self.id,
            submission_time: self.submission_time,
            user_email: self.user_email.to_string(),
        }
    }

    /// Exact comparison on every business-key field, absent notes equal to empty
    pub fn matches_business_key(&self, form: &InspectionForm) -> bool {
        self.form_date == form.form_date
            && self.inspector_name.as_str() == form.inspector_name
            && self.donation_chairs_condition == form.donation_chairs_condition
            && self.blood_collection_equipment_condition
                == form.blood_collection_equipment_condition
            && self.monitoring_devices_condition == form.monitoring_devices_condition
            && self.safety_equipment_condition == form.safety_equipment_condition
            && self.donor_name.as_str() == form.donor_name
            && self.donor_contact_number.as_str() == form.donor_contact_number
            && self.donor_health_screening_completed == form.donor_health_screening_completed
            && self.donor_consent_form_completed == form.donor_consent_form_completed
            && self.notes.as_deref().unwrap_or("") == form.normalized_notes()
    }

    /// Computes the content hash with the hash field itself zeroed.
    pub fn compute_hash(&self) -> Result<i64, String> {
        let mut entity_for_hashing = self.clone();
        entity_for_hashing.hash = 0;
        hash_as_i64(&entity_for_hashing)
    }
}
