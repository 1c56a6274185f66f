use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Condition reported for one class of donor center equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "equipment_condition"))]
pub enum EquipmentCondition {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Good"))]
    Good,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Needs Attention"))]
    NeedsAttention,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Out of Service"))]
    OutOfService,
}

impl EquipmentCondition {
    pub const ALL: [EquipmentCondition; 3] = [
        EquipmentCondition::Good,
        EquipmentCondition::NeedsAttention,
        EquipmentCondition::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCondition::Good => "Good",
            EquipmentCondition::NeedsAttention => "Needs Attention",
            EquipmentCondition::OutOfService => "Out of Service",
        }
    }
}

impl std::fmt::Display for EquipmentCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Good" => Ok(EquipmentCondition::Good),
            "Needs Attention" => Ok(EquipmentCondition::NeedsAttention),
            "Out of Service" => Ok(EquipmentCondition::OutOfService),
            "" => Err("equipment condition must be selected".to_string()),
            _ => Err(format!("Invalid EquipmentCondition: {s}")),
        }
    }
}

impl Serialize for EquipmentCondition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EquipmentCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str = String::deserialize(deserializer)?;
        value_str.parse().map_err(serde::de::Error::custom)
    }
}
