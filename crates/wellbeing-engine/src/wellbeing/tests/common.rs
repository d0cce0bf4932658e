use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::{json, Map, Value};

use crate::wellbeing::domain::NormalizedInput;
use crate::wellbeing::ledger::{LedgerStore, LedgerStoreError};
use crate::wellbeing::oracle::{OracleError, ScoreOracle};
use crate::wellbeing::rewards::LedgerState;
use crate::wellbeing::service::WellbeingService;

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    record: Arc<Mutex<Option<LedgerState>>>,
    latency: Option<Duration>,
}

impl MemoryLedger {
    pub(super) fn with_state(state: LedgerState) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(state))),
            latency: None,
        }
    }

    /// Sleeps between read and write so racing awards would interleave.
    pub(super) fn slow() -> Self {
        Self {
            record: Arc::default(),
            latency: Some(Duration::from_millis(2)),
        }
    }

    pub(super) fn stored(&self) -> Option<LedgerState> {
        self.record.lock().expect("lock").clone()
    }
}

impl LedgerStore for MemoryLedger {
    fn load(&self) -> Result<LedgerState, LedgerStoreError> {
        let state = self.record.lock().expect("lock").clone();
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }
        state.ok_or(LedgerStoreError::NotFound)
    }

    fn store(&self, state: &LedgerState) -> Result<(), LedgerStoreError> {
        *self.record.lock().expect("lock") = Some(state.clone());
        Ok(())
    }
}

pub(super) struct CorruptLedger {
    pub(super) written: Mutex<Vec<LedgerState>>,
}

impl CorruptLedger {
    pub(super) fn new() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
        }
    }
}

impl LedgerStore for CorruptLedger {
    fn load(&self) -> Result<LedgerState, LedgerStoreError> {
        Err(LedgerStoreError::Corrupt("expected value at line 1".to_string()))
    }

    fn store(&self, state: &LedgerState) -> Result<(), LedgerStoreError> {
        self.written.lock().expect("lock").push(state.clone());
        Ok(())
    }
}

pub(super) struct ReadOnlyLedger;

impl LedgerStore for ReadOnlyLedger {
    fn load(&self) -> Result<LedgerState, LedgerStoreError> {
        Err(LedgerStoreError::NotFound)
    }

    fn store(&self, _state: &LedgerState) -> Result<(), LedgerStoreError> {
        Err(LedgerStoreError::Unavailable("disk full".to_string()))
    }
}

pub(super) struct FixedOracle(pub(super) f64);

impl ScoreOracle for FixedOracle {
    fn predict(&self, _input: &NormalizedInput) -> Result<f64, OracleError> {
        Ok(self.0)
    }
}

pub(super) struct OfflineOracle;

impl ScoreOracle for OfflineOracle {
    fn predict(&self, _input: &NormalizedInput) -> Result<f64, OracleError> {
        Err(OracleError::Unavailable("model not loaded".to_string()))
    }
}

pub(super) fn build_service(
    score: f64,
) -> (WellbeingService<FixedOracle, MemoryLedger>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::default());
    let service = WellbeingService::new(Arc::new(FixedOracle(score)), ledger.clone());
    (service, ledger)
}

pub(super) fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

pub(super) fn strained_submission() -> Map<String, Value> {
    as_map(json!({
        "stress_index": 8,
        "burnout_level": 7,
        "sleep_hours": 5,
        "screen_time": 7,
        "unlock_count": 60,
        "focus_hours": 7,
        "study_hours": 1,
        "physical_activity": 0,
        "breaks": 1,
        "social_media_hours": 2,
    }))
}

pub(super) fn balanced_submission() -> Map<String, Value> {
    as_map(json!({
        "stress_index": 0,
        "burnout_level": 0,
        "sleep_hours": 8,
        "screen_time": 0,
        "unlock_count": 0,
        "focus_hours": 6,
        "study_hours": 4,
        "physical_activity": 1,
        "breaks": 3,
        "social_media_hours": 0.5,
    }))
}

pub(super) fn temp_ledger_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "wellbeing-ledger-{}-{name}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

/// Remove the ledger record together with its staging and lock siblings.
pub(super) fn remove_ledger_files(path: &Path) {
    let _ = std::fs::remove_file(path);
    for suffix in ["tmp", "lock"] {
        let _ = std::fs::remove_file(format!("{}.{suffix}", path.display()));
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
