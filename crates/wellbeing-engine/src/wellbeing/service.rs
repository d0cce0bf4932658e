use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::domain::NormalizedInput;
use super::ledger::{LedgerStore, LedgerStoreError, RewardLedger};
use super::oracle::{OracleError, ScoreOracle};
use super::rewards::{AwardResult, Badge, LedgerState};
use super::rules;

/// Service composing the score oracle, rule tables, and reward ledger.
pub struct WellbeingService<O, S> {
    oracle: Arc<O>,
    ledger: RewardLedger<S>,
}

impl<O, S> WellbeingService<O, S>
where
    O: ScoreOracle + 'static,
    S: LedgerStore + 'static,
{
    pub fn new(oracle: Arc<O>, store: Arc<S>) -> Self {
        Self {
            oracle,
            ledger: RewardLedger::new(store),
        }
    }

    /// Score a raw submission, derive guidance, and record its rewards.
    pub fn assess(&self, raw: &Map<String, Value>) -> Result<Assessment, AssessmentError> {
        let normalization = NormalizedInput::normalize(raw);
        if !normalization.defaulted.is_empty() {
            let fields: Vec<&str> = normalization
                .defaulted
                .iter()
                .map(|field| field.key())
                .collect();
            debug!(?fields, "defaulted missing or invalid fields to 0.0");
        }
        let input = normalization.input;

        let score = self.oracle.predict(&input)?;
        let alerts = rules::alerts(&input);
        let recommendations = rules::recommendations(&input);
        let daily_plan = rules::daily_plan(&input);
        let award = self.ledger.award(&input, score)?;

        info!(
            score,
            points = award.points_delta,
            total_points = award.state.points,
            "assessment recorded"
        );

        Ok(Assessment::assemble(
            score,
            alerts,
            recommendations,
            daily_plan,
            award,
        ))
    }

    pub fn ledger_state(&self) -> LedgerState {
        self.ledger.snapshot()
    }
}

/// Response payload for one assessed submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: f64,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub daily_plan: Vec<String>,
    pub points: u64,
    pub badges: Vec<Badge>,
    pub state: LedgerState,
}

impl Assessment {
    pub fn assemble(
        score: f64,
        alerts: Vec<String>,
        recommendations: Vec<String>,
        daily_plan: Vec<String>,
        award: AwardResult,
    ) -> Self {
        Self {
            score: round_to_hundredths(score),
            alerts,
            recommendations,
            daily_plan,
            points: award.points_delta,
            badges: award.badges_awarded,
            state: award.state,
        }
    }
}

/// Two decimal places, ties rounded away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Error raised by the wellbeing service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("score prediction failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("reward ledger update failed: {0}")]
    Ledger(#[from] LedgerStoreError),
}
