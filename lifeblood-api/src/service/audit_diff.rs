use serde::{Deserialize, Serialize};

use crate::domain::{AuditStamp, FieldValue, InspectionField, InspectionRecord};
use crate::error::{ApiError, ApiResult};

/// Before/after view of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: InspectionField,
    pub field_name: String,
    pub before: String,
    pub after: String,
    pub changed: bool,
}

/// Field-by-field comparison in form declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldDiff {
    pub changes: Vec<FieldChange>,
    pub changed_count: usize,
}

impl FieldDiff {
    pub fn has_changes(&self) -> bool {
        self.changed_count > 0
    }

    pub fn changed_fields(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter().filter(|c| c.changed)
    }

    /// One `Label: 'before' -> 'after'` line per changed field
    pub fn summary_lines(&self) -> Vec<String> {
        self.changed_fields()
            .map(|c| format!("{}: '{}' -> '{}'", c.field_name, c.before, c.after))
            .collect()
    }
}

/// Compares two value sources over every user-facing field.
pub fn diff_with<F, G>(original: F, updated: G) -> FieldDiff
where
    F: Fn(InspectionField) -> FieldValue,
    G: Fn(InspectionField) -> FieldValue,
{
    let mut changed_count = 0;
    let changes = InspectionField::ALL
        .iter()
        .map(|&field| {
            let before = original(field).normalized();
            let after = updated(field).normalized();
            let changed = before != after;
            if changed {
                changed_count += 1;
            }
            FieldChange {
                field,
                field_name: field.label().to_string(),
                before,
                after,
                changed,
            }
        })
        .collect();

    FieldDiff {
        changes,
        changed_count,
    }
}

/// Diffs two snapshots of the same record.
///
/// Snapshots of different records are a caller bug and yield
/// [`ApiError::DiffInputMismatch`].
pub fn diff(original: &InspectionRecord, updated: &InspectionRecord) -> ApiResult<FieldDiff> {
    if original.id != updated.id {
        return Err(ApiError::DiffInputMismatch {
            original: original.id,
            updated: updated.id,
        });
    }
    Ok(diff_with(
        |field| original.form.value_of(field),
        |field| updated.form.value_of(field),
    ))
}

/// Outcome of an edit: what changed and who stamped it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub record_id: i64,
    #[serde(flatten)]
    pub diff: FieldDiff,
    pub stamp: Option<AuditStamp>,
    /// Set when the edit was written but no field actually differs
    pub no_changes: bool,
}

impl AuditReport {
    pub fn build(original: &InspectionRecord, updated: &InspectionRecord) -> ApiResult<Self> {
        let diff = diff(original, updated)?;
        Ok(Self {
            record_id: updated.id,
            no_changes: !diff.has_changes(),
            stamp: updated.last_modification.clone(),
            diff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_utils::sample_record;
    use chrono::Utc;

    #[test]
    fn test_identical_records_have_no_changes() {
        let record = sample_record(1);
        let result = diff(&record, &record).unwrap();
        assert_eq!(result.changed_count, 0);
        assert_eq!(result.changes.len(), InspectionField::ALL.len());
        assert!(result.changes.iter().all(|c| !c.changed));
        assert!(!result.has_changes());
    }

    #[test]
    fn test_notes_only_change() {
        let original = sample_record(1);
        let mut updated = original.clone();
        updated.form.notes = Some("Chair 4 torn upholstery".to_string());

        let result = diff(&original, &updated).unwrap();
        assert_eq!(result.changed_count, 1);
        let changed: Vec<&FieldChange> = result.changed_fields().collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].field, InspectionField::Notes);
        assert_eq!(changed[0].before, "");
        assert_eq!(changed[0].after, "Chair 4 torn upholstery");
    }

    #[test]
    fn test_empty_notes_equal_missing_notes() {
        let original = sample_record(1);
        let mut updated = original.clone();
        updated.form.notes = Some(String::new());
        assert_eq!(diff(&original, &updated).unwrap().changed_count, 0);
    }

    #[test]
    fn test_boolean_transition_uses_yes_no() {
        let original = sample_record(3);
        let mut updated = original.clone();
        updated.form.donor_health_screening_completed = false;

        let result = diff(&original, &updated).unwrap();
        let change = result
            .changes
            .iter()
            .find(|c| c.field == InspectionField::DonorHealthScreeningCompleted)
            .unwrap();
        assert_eq!(change.before, "Yes");
        assert_eq!(change.after, "No");
        assert!(change.changed);
        assert_eq!(result.changed_count, 1);
    }

    #[test]
    fn test_string_true_matches_boolean_true() {
        let result = diff_with(
            |field| match field {
                InspectionField::DonorConsentFormCompleted => FieldValue::from("true"),
                _ => FieldValue::Missing,
            },
            |field| match field {
                InspectionField::DonorConsentFormCompleted => FieldValue::Flag(true),
                _ => FieldValue::Missing,
            },
        );
        assert_eq!(result.changed_count, 0);
        let change = &result.changes[9];
        assert_eq!(change.field, InspectionField::DonorConsentFormCompleted);
        assert_eq!(change.before, "Yes");
        assert!(!change.changed);
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let record = sample_record(1);
        let result = diff(&record, &record).unwrap();
        let fields: Vec<InspectionField> = result.changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, InspectionField::ALL.to_vec());
        assert_eq!(result.changes[0].field_name, "Form Date");
    }

    #[test]
    fn test_mismatched_ids_rejected() {
        let original = sample_record(1);
        let updated = sample_record(2);
        assert!(matches!(
            diff(&original, &updated),
            Err(ApiError::DiffInputMismatch { original: 1, updated: 2 })
        ));
    }

    #[test]
    fn test_report_flags_no_changes_and_carries_stamp() {
        let original = sample_record(5);
        let mut updated = original.clone();
        updated.last_modification = Some(AuditStamp {
            last_modified_time: Utc::now(),
            last_modified_by: "editor@lifeblood.example".to_string(),
            edit_reason: "re-checked on site".to_string(),
        });

        let report = AuditReport::build(&original, &updated).unwrap();
        assert!(report.no_changes);
        assert_eq!(report.record_id, 5);
        assert_eq!(
            report.stamp.as_ref().map(|s| s.last_modified_by.as_str()),
            Some("editor@lifeblood.example")
        );
        assert!(report.diff.summary_lines().is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let original = sample_record(1);
        let mut updated = original.clone();
        updated.form.donor_name = "Alex Donor".to_string();
        let result = diff(&original, &updated).unwrap();
        assert_eq!(
            result.summary_lines(),
            vec!["Donor Name: 'Sam Donor' -> 'Alex Donor'".to_string()]
        );
    }
}
