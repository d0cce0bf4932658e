use crate::infra::build_service;
use clap::Args;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wellbeing_engine::config::AppConfig;
use wellbeing_engine::error::AppError;
use wellbeing_engine::wellbeing::{JsonFileLedgerStore, RewardLedger};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding the day's inputs (any subset of the ten fields)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured reward ledger file
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
    /// Override the configured score model CSV
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RewardsArgs {
    /// Override the configured reward ledger file
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        ledger,
        model,
    } = args;

    let config = AppConfig::load()?;
    let ledger_path = ledger.unwrap_or(config.ledger.path);
    let model_path = model.unwrap_or(config.model.path);

    let raw = read_submission(&input)?;
    let service = build_service(&model_path, &ledger_path)?;
    let assessment = service.assess(&raw)?;

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

pub(crate) fn run_rewards(args: RewardsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ledger_path = args.ledger.unwrap_or(config.ledger.path);

    let ledger = RewardLedger::new(Arc::new(JsonFileLedgerStore::new(ledger_path)));
    println!("{}", serde_json::to_string_pretty(&ledger.snapshot())?);
    Ok(())
}

/// Non-object documents are scored as an empty submission.
fn read_submission(path: &Path) -> Result<Map<String, Value>, AppError> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    Ok(match value {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}
