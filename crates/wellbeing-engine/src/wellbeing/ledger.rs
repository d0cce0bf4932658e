use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fd_lock::RwLock;
use tracing::{debug, warn};

use super::domain::NormalizedInput;
use super::rewards::{earned_rewards, AwardResult, LedgerState};

/// Storage abstraction holding the single durable ledger record.
pub trait LedgerStore: Send + Sync {
    /// `NotFound` means no record has been written yet.
    fn load(&self) -> Result<LedgerState, LedgerStoreError>;
    /// Replace the stored record with `state`.
    fn store(&self, state: &LedgerState) -> Result<(), LedgerStoreError>;

    /// Run `update` while holding exclusive access to the record across every
    /// handle on the same storage, including handles in other processes.
    fn exclusive(
        &self,
        update: &mut dyn FnMut() -> Result<LedgerState, LedgerStoreError>,
    ) -> Result<LedgerState, LedgerStoreError> {
        update()
    }
}

/// Error enumeration for ledger storage failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    #[error("ledger record not found")]
    NotFound,
    #[error("ledger record is corrupt: {0}")]
    Corrupt(String),
    #[error("ledger storage unavailable: {0}")]
    Unavailable(String),
}

/// JSON document on local disk, e.g. `{"points": 45, "badges": ["💪 Keep Improving"]}`.
///
/// Writes go to a `<path>.tmp` staging file that is synced and renamed over
/// the record, so readers only ever see a complete document. Updates from
/// every handle on the same path serialize on an advisory lock held on
/// `<path>.lock`.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerStore {
    path: PathBuf,
}

impl JsonFileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn staging_path(&self) -> PathBuf {
        sibling(&self.path, "tmp")
    }

    pub(crate) fn lock_path(&self) -> PathBuf {
        sibling(&self.path, "lock")
    }

    fn unavailable(path: &Path, err: io::Error) -> LedgerStoreError {
        LedgerStoreError::Unavailable(format!("{}: {err}", path.display()))
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn write_synced(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self) -> Result<LedgerState, LedgerStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(LedgerStoreError::NotFound)
            }
            Err(err) => return Err(Self::unavailable(&self.path, err)),
        };

        serde_json::from_str(&contents).map_err(|err| LedgerStoreError::Corrupt(err.to_string()))
    }

    fn store(&self, state: &LedgerState) -> Result<(), LedgerStoreError> {
        let payload = serde_json::to_vec(state)
            .map_err(|err| LedgerStoreError::Unavailable(err.to_string()))?;
        let staging = self.staging_path();

        write_synced(&staging, &payload)
            .and_then(|()| fs::rename(&staging, &self.path))
            .map_err(|err| {
                let _ = fs::remove_file(&staging);
                Self::unavailable(&self.path, err)
            })
    }

    fn exclusive(
        &self,
        update: &mut dyn FnMut() -> Result<LedgerState, LedgerStoreError>,
    ) -> Result<LedgerState, LedgerStoreError> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|err| Self::unavailable(&lock_path, err))?;

        let mut lock = RwLock::new(file);
        let _held = lock
            .write()
            .map_err(|err| Self::unavailable(&lock_path, err))?;
        update()
    }
}

/// Owner of the durable reward totals.
///
/// Each award runs load, merge, and persist while holding `guard` and the
/// store's exclusive section, so concurrent submissions never overwrite each
/// other's points, whether they arrive through this instance or through
/// another handle on the same storage.
pub struct RewardLedger<S> {
    store: Arc<S>,
    guard: Mutex<()>,
}

impl<S> RewardLedger<S>
where
    S: LedgerStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    /// Compute this submission's rewards and fold them into the stored totals.
    pub fn award(
        &self,
        input: &NormalizedInput,
        score: f64,
    ) -> Result<AwardResult, LedgerStoreError> {
        let earned = earned_rewards(input, score);
        debug!(points = earned.points, badges = earned.badges.len(), "rewards earned");

        let _lock = self
            .guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let state = self.store.exclusive(&mut || {
            let mut state = self.current_state();
            state.merge(&earned);
            self.store.store(&state)?;
            Ok(state)
        })?;

        Ok(AwardResult {
            points_delta: earned.points,
            badges_awarded: earned.badges,
            state,
        })
    }

    /// Current totals, defaulting to an empty ledger when nothing usable is stored.
    pub fn snapshot(&self) -> LedgerState {
        let _lock = self
            .guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.current_state()
    }

    fn current_state(&self) -> LedgerState {
        match self.store.load() {
            Ok(state) => state,
            Err(LedgerStoreError::NotFound) => LedgerState::default(),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable ledger record");
                LedgerState::default()
            }
        }
    }
}
