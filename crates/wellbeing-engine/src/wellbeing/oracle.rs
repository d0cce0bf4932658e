use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{NormalizedInput, WellbeingField};

/// Pre-trained model producing a wellbeing score from a normalized submission.
pub trait ScoreOracle: Send + Sync {
    fn predict(&self, input: &NormalizedInput) -> Result<f64, OracleError>;
}

/// Prediction failure; always fatal to the request.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

const INTERCEPT: &str = "intercept";

/// Linear regression weights exported as `feature,weight` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScoreModel {
    intercept: f64,
    weights: [f64; 10],
}

impl LinearScoreModel {
    pub fn new(intercept: f64, weights: [f64; 10]) -> Self {
        Self { intercept, weights }
    }

    pub fn from_path(path: &Path) -> Result<Self, ScoreModelError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreModelError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut intercept = None;
        let mut parsed: HashMap<WellbeingField, f64> = HashMap::new();

        for row in csv_reader.deserialize::<WeightRow>() {
            let WeightRow { feature, weight } = row?;
            if !weight.is_finite() {
                return Err(ScoreModelError::NonFiniteWeight(feature));
            }

            if feature == INTERCEPT {
                if intercept.replace(weight).is_some() {
                    return Err(ScoreModelError::DuplicateFeature(feature));
                }
                continue;
            }

            let field = WellbeingField::from_key(&feature)
                .ok_or_else(|| ScoreModelError::UnknownFeature(feature.clone()))?;
            if parsed.insert(field, weight).is_some() {
                return Err(ScoreModelError::DuplicateFeature(feature));
            }
        }

        let mut weights = [0.0; 10];
        for (slot, field) in weights.iter_mut().zip(WellbeingField::ALL) {
            *slot = *parsed
                .get(&field)
                .ok_or(ScoreModelError::MissingFeature(field.key()))?;
        }

        Ok(Self::new(intercept.unwrap_or(0.0), weights))
    }
}

impl ScoreOracle for LinearScoreModel {
    fn predict(&self, input: &NormalizedInput) -> Result<f64, OracleError> {
        let score = input
            .as_row()
            .iter()
            .zip(self.weights)
            .fold(self.intercept, |acc, ((_, value), weight)| acc + value * weight);

        if score.is_finite() {
            Ok(score)
        } else {
            Err(OracleError::NonFinite)
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    feature: String,
    weight: f64,
}

/// Failure loading model weights at startup.
#[derive(Debug, thiserror::Error)]
pub enum ScoreModelError {
    #[error("failed to read model weights: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown model feature '{0}'")]
    UnknownFeature(String),
    #[error("model feature '{0}' listed more than once")]
    DuplicateFeature(String),
    #[error("model is missing a weight for '{0}'")]
    MissingFeature(&'static str),
    #[error("model weight for '{0}' is not finite")]
    NonFiniteWeight(String),
}
