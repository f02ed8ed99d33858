//! Reference lists offered by the admin console when entering prescriptions.

use serde::{Deserialize, Serialize};

const BUNDLED_REFERENCE: &str = include_str!("../resources/reference.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub dosages: Vec<String>,
}

impl ReferenceData {
    /// Lists shipped with the binary.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED_REFERENCE)
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty() && self.dosages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_lists_parse() {
        let data = ReferenceData::bundled().unwrap();
        assert!(data.medications.contains(&"Metformin".to_string()));
        assert!(data.dosages.contains(&"10mg".to_string()));
        assert!(!data.is_empty());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let data: ReferenceData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
    }
}
