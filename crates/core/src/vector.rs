//! The 7-dimensional MAC weight vector.
//!
//! Balance (the weights summing to 1.0) is advisory: `normalize` reports it,
//! no write path enforces it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical dimension keys, in serialization order.
pub const DIMENSIONS: [&str; 7] = [
    "family",
    "group",
    "reciprocity",
    "heroism",
    "deference",
    "fairness",
    "property",
];

/// A vector whose sum is within this distance of 1.0 reads as balanced.
pub const BALANCE_EPSILON: f64 = 0.001;

/// The 7 fixed weights. Absent keys deserialize to 0.0; serialization
/// always emits all 7, so stored records are complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacVector {
    pub family: f64,
    pub group: f64,
    pub reciprocity: f64,
    pub heroism: f64,
    pub deference: f64,
    pub fairness: f64,
    pub property: f64,
}

impl MacVector {
    pub fn sum(&self) -> f64 {
        self.family
            + self.group
            + self.reciprocity
            + self.heroism
            + self.deference
            + self.fairness
            + self.property
    }

    pub fn is_balanced(&self) -> bool {
        (self.sum() - 1.0).abs() < BALANCE_EPSILON
    }

    /// Weight for a canonical dimension key. None for unknown keys.
    pub fn get(&self, dimension: &str) -> Option<f64> {
        match dimension {
            "family" => Some(self.family),
            "group" => Some(self.group),
            "reciprocity" => Some(self.reciprocity),
            "heroism" => Some(self.heroism),
            "deference" => Some(self.deference),
            "fairness" => Some(self.fairness),
            "property" => Some(self.property),
            _ => None,
        }
    }

    /// Set a canonical dimension key. Unknown keys are ignored.
    pub fn set(&mut self, dimension: &str, value: f64) {
        match dimension {
            "family" => self.family = value,
            "group" => self.group = value,
            "reciprocity" => self.reciprocity = value,
            "heroism" => self.heroism = value,
            "deference" => self.deference = value,
            "fairness" => self.fairness = value,
            "property" => self.property = value,
            _ => {}
        }
    }
}

/// Outcome of normalizing a raw weight mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub vector: MacVector,
    pub sum: f64,
    pub balanced: bool,
}

/// Coerce a loosely-typed weight mapping into a full 7-dimension vector.
///
/// Missing, non-numeric, and unparsable entries become 0.0; keys outside
/// the canonical 7 are dropped. Never errors.
pub fn normalize(raw: &serde_json::Map<String, Value>) -> Normalized {
    let mut vector = MacVector::default();
    for dimension in DIMENSIONS {
        let value = raw.get(dimension).map(coerce).unwrap_or(0.0);
        vector.set(dimension, value);
    }
    let sum = vector.sum();
    Normalized {
        vector,
        sum,
        balanced: (sum - 1.0).abs() < BALANCE_EPSILON,
    }
}

fn coerce(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_dimensions_default_to_zero() {
        let out = normalize(&raw(json!({"family": 0.5, "group": 0.5})));
        assert_eq!(out.vector.family, 0.5);
        assert_eq!(out.vector.group, 0.5);
        assert_eq!(out.vector.reciprocity, 0.0);
        assert_eq!(out.vector.property, 0.0);
        assert_eq!(out.sum, 1.0);
        assert!(out.balanced);
    }

    #[test]
    fn non_numeric_entries_coerce_to_zero() {
        let out = normalize(&raw(json!({
            "family": "0.25",
            "group": "not a number",
            "heroism": null,
            "fairness": [0.5],
            "property": true,
        })));
        assert_eq!(out.vector.family, 0.25);
        assert_eq!(out.vector.group, 0.0);
        assert_eq!(out.vector.heroism, 0.0);
        assert_eq!(out.vector.fairness, 0.0);
        assert_eq!(out.vector.property, 0.0);
        assert_eq!(out.sum, 0.25);
        assert!(!out.balanced);
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let out = normalize(&raw(json!({"family": 1.0, "loyalty": 0.4})));
        assert_eq!(out.sum, 1.0);
        assert!(out.balanced);
    }

    #[test]
    fn balance_epsilon_is_exclusive() {
        // 0.999 is off by exactly epsilon: not balanced.
        let out = normalize(&raw(json!({"family": 0.999})));
        assert!(!out.balanced);

        let out = normalize(&raw(json!({"family": 0.9995})));
        assert!(out.balanced);
    }

    #[test]
    fn empty_mapping_is_all_zero() {
        let out = normalize(&serde_json::Map::new());
        assert_eq!(out.vector, MacVector::default());
        assert_eq!(out.sum, 0.0);
        assert!(!out.balanced);
    }

    #[test]
    fn stored_vector_always_carries_all_seven_keys() {
        let value = serde_json::to_value(MacVector::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 7);
        for dimension in DIMENSIONS {
            assert!(object.contains_key(dimension), "missing {dimension}");
        }
    }

    #[test]
    fn get_set_round_trip() {
        let mut vector = MacVector::default();
        for (i, dimension) in DIMENSIONS.iter().enumerate() {
            vector.set(dimension, i as f64 / 10.0);
        }
        for (i, dimension) in DIMENSIONS.iter().enumerate() {
            assert_eq!(vector.get(dimension), Some(i as f64 / 10.0));
        }
        assert_eq!(vector.get("loyalty"), None);
    }
}
