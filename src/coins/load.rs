use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::parse::parse_ticker_output;
use super::record::Coin;

pub fn load_coins(path: &Path) -> Result<Vec<Coin>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read ticker data from {}", path.display()))?;

    let coins = parse_ticker_output(&raw)
        .with_context(|| format!("failed to parse ticker data in {}", path.display()))?;

    if coins.is_empty() {
        return Err(anyhow!("no coins found in {}", path.display()));
    }

    info!(path = %path.display(), count = coins.len(), "loaded ticker data");
    Ok(coins)
}
