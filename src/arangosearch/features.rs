use std::collections::BTreeSet;
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::arango_ensure;
use crate::common::error::Result;

/// Per-token metadata an analyzer asks the server to record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// How often a term is seen, required for PHRASE().
    Frequency,
    /// The field normalization factor.
    Norm,
    /// Sequentially increasing term position, required for PHRASE().
    Position,
    /// Term offsets; only meaningful together with `position`.
    Offset,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Frequency => "frequency",
            Feature::Norm => "norm",
            Feature::Position => "position",
            Feature::Offset => "offset",
        }
    }

    /// The feature this one cannot be enabled without.
    pub fn requires(&self) -> Option<Feature> {
        match self {
            Feature::Offset => Some(Feature::Position),
            Feature::Position => Some(Feature::Frequency),
            Feature::Frequency | Feature::Norm => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of analyzer features, serialized as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(BTreeSet<Feature>);

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.0.insert(feature);
        self
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.0.insert(feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    /// Features present without the feature they depend on.
    pub fn missing_dependencies(&self) -> Vec<(Feature, Feature)> {
        self.iter()
            .filter_map(|feature| match feature.requires() {
                Some(required) if !self.contains(required) => Some((feature, required)),
                _ => None,
            })
            .collect()
    }

    /// `offset` requires `position`, `position` requires `frequency`.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_dependencies();
        arango_ensure!(
            missing.is_empty(),
            "invalid analyzer features: {}",
            missing
                .iter()
                .map(|(feature, required)| format!("'{}' requires '{}'", feature, required))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(())
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Features(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Feature; N]> for Features {
    fn from(features: [Feature; N]) -> Self {
        features.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_feature_chains() {
        assert!(Features::new().validate().is_ok());
        assert!(Features::from([Feature::Norm]).validate().is_ok());
        assert!(Features::from([Feature::Frequency, Feature::Position]).validate().is_ok());
        assert!(Features::from([Feature::Frequency, Feature::Position, Feature::Offset])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_offset_without_position_is_flagged() {
        let features = Features::from([Feature::Frequency, Feature::Offset]);
        assert_eq!(
            features.missing_dependencies(),
            vec![(Feature::Offset, Feature::Position)]
        );
        let err = features.validate().unwrap_err();
        assert!(err.to_string().contains("'offset' requires 'position'"));
    }

    #[test]
    fn test_position_without_frequency_is_flagged() {
        let features = Features::from([Feature::Position]);
        assert_eq!(
            features.missing_dependencies(),
            vec![(Feature::Position, Feature::Frequency)]
        );
        assert!(features.validate().is_err());
    }

    #[test]
    fn test_wire_form_is_array() {
        let features = Features::from([Feature::Position, Feature::Frequency]);
        assert_eq!(serde_json::to_value(&features).unwrap(), json!(["frequency", "position"]));
        let decoded: Features = serde_json::from_value(json!(["norm"])).unwrap();
        assert!(decoded.contains(Feature::Norm));
        assert_eq!(decoded.len(), 1);
    }
}
