use super::common::*;
use crate::wellbeing::domain::NormalizedInput;
use crate::wellbeing::ledger::{JsonFileLedgerStore, LedgerStore, LedgerStoreError, RewardLedger};
use crate::wellbeing::rewards::{Badge, LedgerState};
use std::fs;
use std::sync::Arc;

fn rested_input() -> NormalizedInput {
    NormalizedInput {
        sleep_hours: 8.0,
        screen_time: 3.0,
        ..NormalizedInput::default()
    }
}

#[test]
fn missing_file_reports_not_found() {
    let store = JsonFileLedgerStore::new(temp_ledger_path("missing"));
    assert!(matches!(store.load(), Err(LedgerStoreError::NotFound)));
}

#[test]
fn file_store_round_trips_the_original_document_shape() {
    let path = temp_ledger_path("shape");
    fs::write(&path, r#"{"points": 25, "badges": ["💪 Keep Improving"]}"#).expect("seed ledger");
    let store = Arc::new(JsonFileLedgerStore::new(&path));
    let ledger = RewardLedger::new(store.clone());

    let award = ledger.award(&rested_input(), 62.0).expect("award succeeds");

    assert_eq!(award.points_delta, 35);
    assert_eq!(award.badges_awarded, vec![Badge::SilverPerformer, Badge::SleepHero]);
    let reloaded = store.load().expect("ledger readable");
    assert_eq!(reloaded.points, 60);
    assert_eq!(
        reloaded.badges,
        vec![
            "💪 Keep Improving".to_string(),
            "🥈 Silver Performer".to_string(),
            "😴 Sleep Hero".to_string(),
        ]
    );
    assert_eq!(reloaded, award.state);

    remove_ledger_files(&path);
}

#[test]
fn corrupt_file_is_replaced_on_next_award() {
    let path = temp_ledger_path("corrupt");
    fs::write(&path, "{not json").expect("seed ledger");
    let store = Arc::new(JsonFileLedgerStore::new(&path));
    assert!(matches!(store.load(), Err(LedgerStoreError::Corrupt(_))));

    let ledger = RewardLedger::new(store.clone());
    assert_eq!(ledger.snapshot(), LedgerState::default());

    let award = ledger.award(&rested_input(), 10.0).expect("award succeeds");
    assert_eq!(award.state.points, 15);
    assert_eq!(store.load().expect("ledger rewritten"), award.state);

    remove_ledger_files(&path);
}

#[test]
fn unwritable_location_is_an_error() {
    let directory = temp_ledger_path("as-directory");
    fs::create_dir_all(&directory).expect("create directory");
    let ledger = RewardLedger::new(Arc::new(JsonFileLedgerStore::new(&directory)));

    match ledger.award(&rested_input(), 90.0) {
        Err(LedgerStoreError::Unavailable(message)) => {
            assert!(message.contains("as-directory"));
        }
        other => panic!("expected unavailable store, got {other:?}"),
    }

    let _ = fs::remove_dir_all(&directory);
    remove_ledger_files(&directory);
}

#[test]
fn repeated_awards_never_duplicate_badges() {
    let ledger = RewardLedger::new(Arc::new(MemoryLedger::default()));

    let first = ledger.award(&rested_input(), 85.0).expect("first award");
    let second = ledger.award(&rested_input(), 85.0).expect("second award");

    assert_eq!(first.badges_awarded, second.badges_awarded);
    assert_eq!(second.state.points, first.points_delta + second.points_delta);
    assert_eq!(
        second.state.badges,
        vec![
            Badge::GoldAchiever.label().to_string(),
            Badge::SleepHero.label().to_string(),
        ]
    );
}

#[test]
fn concurrent_file_awards_sum_every_delta() {
    let path = temp_ledger_path("concurrent");
    let ledger = RewardLedger::new(Arc::new(JsonFileLedgerStore::new(&path)));

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let ledger = &ledger;
            scope.spawn(move || {
                let score = if worker % 2 == 0 { 90.0 } else { 40.0 };
                ledger.award(&rested_input(), score).expect("award succeeds");
            });
        }
    });

    let state = ledger.snapshot();
    assert_eq!(state.points, 4 * 55 + 4 * 15);
    assert_eq!(state.badges.len(), 3);

    remove_ledger_files(&path);
}

#[test]
fn failed_staging_write_keeps_previous_record() {
    let path = temp_ledger_path("staging");
    let store = JsonFileLedgerStore::new(&path);
    let previous = LedgerState {
        points: 120,
        badges: vec![Badge::GoldAchiever.label().to_string()],
    };
    store.store(&previous).expect("initial write");

    fs::create_dir_all(store.staging_path()).expect("block staging file");
    let next = LedgerState {
        points: 175,
        ..previous.clone()
    };
    assert!(matches!(store.store(&next), Err(LedgerStoreError::Unavailable(_))));

    assert_eq!(store.load().expect("previous record intact"), previous);

    let _ = fs::remove_dir_all(store.staging_path());
    remove_ledger_files(&path);
}

#[test]
fn store_leaves_no_staging_file_behind() {
    let path = temp_ledger_path("rename");
    let store = JsonFileLedgerStore::new(&path);

    store.store(&LedgerState::default()).expect("write succeeds");

    assert!(path.exists());
    assert!(!store.staging_path().exists());
    remove_ledger_files(&path);
}

#[test]
fn separate_handles_on_one_file_do_not_lose_points() {
    let path = temp_ledger_path("shared");
    let server = RewardLedger::new(Arc::new(JsonFileLedgerStore::new(&path)));
    let command = RewardLedger::new(Arc::new(JsonFileLedgerStore::new(&path)));

    std::thread::scope(|scope| {
        for worker in 0..16 {
            let ledger = if worker % 2 == 0 { &server } else { &command };
            scope.spawn(move || {
                ledger.award(&rested_input(), 40.0).expect("award succeeds");
            });
        }
    });

    let state = command.snapshot();
    assert_eq!(state.points, 16 * 15);
    assert_eq!(state, server.snapshot());
    remove_ledger_files(&path);
}
