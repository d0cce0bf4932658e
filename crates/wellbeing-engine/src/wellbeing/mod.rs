//! Decision and reward engine for daily wellbeing submissions.
//!
//! A raw submission is normalized into ten numeric fields, scored by a
//! [`ScoreOracle`], run through the alert, recommendation, and daily plan rule
//! tables, and finally credited to the durable [`RewardLedger`].

pub mod domain;
pub mod ledger;
pub mod oracle;
pub mod rewards;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Normalization, NormalizedInput, WellbeingField};
pub use ledger::{JsonFileLedgerStore, LedgerStore, LedgerStoreError, RewardLedger};
pub use oracle::{LinearScoreModel, OracleError, ScoreModelError, ScoreOracle};
pub use rewards::{AwardResult, Badge, EarnedRewards, LedgerState};
pub use router::wellbeing_router;
pub use service::{Assessment, AssessmentError, WellbeingService};
