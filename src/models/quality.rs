use serde::{Deserialize, Serialize};

/// Demographic fields the data-quality check inspects.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age: Option<u16>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
}

/// One laboratory observation with its reference range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabValue {
    pub test_name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub reference_low: Option<f64>,
    pub reference_high: Option<f64>,
}

/// One reported allergy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyEntry {
    pub allergen: String,
    pub reaction: Option<String>,
    #[serde(default)]
    pub verified: bool,
}
