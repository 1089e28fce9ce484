//! TripSplit settlement CLI
//!
//! Reads a group document (JSON) and prints its balances and settlement
//! transfers as JSON. Pass `-` to read the document from stdin.
//!
//! Balances are computed in the group's own currency. A document without a
//! `currency` field settles in the configured `ledger.currency`.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tripsplit_core::currency::StaticRates;
use tripsplit_core::group::Group;
use tripsplit_core::settlement::{SettlementPlan, plan_with_tolerance};
use tripsplit_shared::config::LoggingConfig;
use tripsplit_shared::types::CurrencyCode;
use tripsplit_shared::{AppConfig, AppResult};

const USAGE: &str = "usage: tripsplit-settle <group.json | ->";

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let path = group_path(std::env::args_os().skip(1))?;
    let raw = read_input(&path, std::io::stdin().lock())
        .with_context(|| format!("Failed to read group from {}", path.display()))?;
    let plan =
        settle(&raw, &config).with_context(|| format!("Invalid group document {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn group_path(mut args: impl Iterator<Item = OsString>) -> anyhow::Result<PathBuf> {
    args.next().map(PathBuf::from).context(USAGE)
}

/// Reads the document from `path`, or from `stdin` when the path is `-`.
fn read_input(path: &Path, mut stdin: impl Read) -> AppResult<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn parse_group(raw: &str, default_currency: &CurrencyCode) -> AppResult<Group> {
    let mut document: Value = serde_json::from_str(raw)?;
    if let Some(fields) = document.as_object_mut()
        && fields.get("currency").is_none_or(Value::is_null)
    {
        fields.insert(
            "currency".to_string(),
            Value::String(default_currency.to_string()),
        );
    }
    Ok(serde_json::from_value(document)?)
}

fn settle(raw: &str, config: &AppConfig) -> AppResult<SettlementPlan> {
    let group = parse_group(raw, &config.ledger.currency)?;
    info!(
        group_id = %group.id,
        currency = %group.currency,
        participants = group.participants.len(),
        expenses = group.expenses.len(),
        "Group loaded"
    );

    let rates = StaticRates::builtin().with_overrides(&config.rates.overrides);
    Ok(plan_with_tolerance(
        &group.participants,
        &group.expenses,
        &rates,
        &group.currency,
        config.ledger.tolerance,
    ))
}
