use serde::{Deserialize, Serialize};

/// User-facing fields of an inspection, in the order they appear on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionField {
    FormDate,
    InspectorName,
    DonationChairsCondition,
    BloodCollectionEquipmentCondition,
    MonitoringDevicesCondition,
    SafetyEquipmentCondition,
    DonorName,
    DonorContactNumber,
    DonorHealthScreeningCompleted,
    DonorConsentFormCompleted,
    Notes,
}

impl InspectionField {
    pub const ALL: [InspectionField; 11] = [
        InspectionField::FormDate,
        InspectionField::InspectorName,
        InspectionField::DonationChairsCondition,
        InspectionField::BloodCollectionEquipmentCondition,
        InspectionField::MonitoringDevicesCondition,
        InspectionField::SafetyEquipmentCondition,
        InspectionField::DonorName,
        InspectionField::DonorContactNumber,
        InspectionField::DonorHealthScreeningCompleted,
        InspectionField::DonorConsentFormCompleted,
        InspectionField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InspectionField::FormDate => "Form Date",
            InspectionField::InspectorName => "Inspector Name",
            InspectionField::DonationChairsCondition => "Donation Chairs Condition",
            InspectionField::BloodCollectionEquipmentCondition => "Blood Collection Equipment",
            InspectionField::MonitoringDevicesCondition => "Monitoring Devices Condition",
            InspectionField::SafetyEquipmentCondition => "Safety Equipment Condition",
            InspectionField::DonorName => "Donor Name",
            InspectionField::DonorContactNumber => "Donor Contact Number",
            InspectionField::DonorHealthScreeningCompleted => "Health Screening Completed",
            InspectionField::DonorConsentFormCompleted => "Consent Form Completed",
            InspectionField::Notes => "Notes",
        }
    }
}

/// Raw value of a field before display normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Missing,
}

impl FieldValue {
    /// Display form used for comparison: missing values become empty,
    /// booleans and `true`/`false` strings (any case) become `Yes`/`No`.
    pub fn normalized(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Flag(flag) => yes_no(*flag).to_string(),
            FieldValue::Text(text) => {
                if text.eq_ignore_ascii_case("true") {
                    yes_no(true).to_string()
                } else if text.eq_ignore_ascii_case("false") {
                    yes_no(false).to_string()
                } else {
                    text.clone()
                }
            }
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Flag(flag)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Missing)
    }
}
