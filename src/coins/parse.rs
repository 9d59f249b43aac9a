use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::record::Coin;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawTicker {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) symbol: Option<String>,
    #[serde(default)]
    pub(super) rank: Value,
    #[serde(default)]
    pub(super) price_usd: Value,
    #[serde(default)]
    pub(super) market_cap_usd: Value,
    #[serde(default)]
    pub(super) percent_change_24h: Value,
}

pub(super) fn parse_ticker_output(raw: &str) -> Result<Vec<Coin>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in ticker data")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("ticker object has no `data` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for ticker data")),
    };

    let mut coins = Vec::with_capacity(entries.len());
    for (index, value) in entries.iter().enumerate() {
        let raw_entry = RawTicker::deserialize(value)
            .with_context(|| format!("invalid ticker entry at index {index}"))?;
        coins.push(coin_from_raw(raw_entry, index)?);
    }

    Ok(coins)
}

fn coin_from_raw(raw: RawTicker, index: usize) -> Result<Coin> {
    let symbol = raw
        .symbol
        .map(|symbol| symbol.trim().to_owned())
        .filter(|symbol| !symbol.is_empty())
        .ok_or_else(|| anyhow!("ticker entry at index {index} has no symbol"))?;

    let market_cap_usd = numeric_field(&raw.market_cap_usd).unwrap_or_else(|| {
        warn!(%symbol, value = %raw.market_cap_usd, "unparseable market_cap_usd");
        f64::NAN
    });
    let percent_change_24h = numeric_field(&raw.percent_change_24h).unwrap_or_else(|| {
        warn!(%symbol, value = %raw.percent_change_24h, "unparseable percent_change_24h");
        f64::NAN
    });

    Ok(Coin {
        id: raw.id,
        name: raw.name,
        rank: numeric_field(&raw.rank)
            .filter(|rank| *rank >= 0.0)
            .map(|rank| rank as u32),
        price_usd: numeric_field(&raw.price_usd),
        symbol,
        market_cap_usd,
        percent_change_24h,
    })
}

/// Ticker feeds encode numbers as strings; accept both shapes.
pub(super) fn numeric_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_encoded_ticker_array() {
        let raw = r#"[
            {"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "rank": "1",
             "price_usd": "47000.5", "market_cap_usd": "800000000000", "percent_change_24h": "2.5"},
            {"symbol": "ETH", "market_cap_usd": "400000000000", "percent_change_24h": "-1.0"}
        ]"#;

        let coins = parse_ticker_output(raw).expect("ticker parses");

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].symbol, "BTC");
        assert_eq!(coins[0].name.as_deref(), Some("Bitcoin"));
        assert_eq!(coins[0].rank, Some(1));
        assert_eq!(coins[0].price_usd, Some(47000.5));
        assert_eq!(coins[0].market_cap_usd, 8.0e11);
        assert_eq!(coins[1].percent_change_24h, -1.0);
        assert_eq!(coins[1].name, None);
    }

    #[test]
    fn accepts_plain_numbers_and_data_wrapper() {
        let raw = r#"{"data": [{"symbol": "XRP", "market_cap_usd": 2.5e10, "percent_change_24h": 0}]}"#;

        let coins = parse_ticker_output(raw).expect("wrapped ticker parses");

        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].market_cap_usd, 2.5e10);
        assert_eq!(coins[0].percent_change_24h, 0.0);
    }

    #[test]
    fn unparseable_numbers_become_nan() {
        let raw = r#"[{"symbol": "BAD", "market_cap_usd": "n/a", "percent_change_24h": null}]"#;

        let coins = parse_ticker_output(raw).expect("entry is kept");

        assert!(coins[0].market_cap_usd.is_nan());
        assert!(coins[0].percent_change_24h.is_nan());
    }

    #[test]
    fn missing_symbol_is_an_error() {
        let raw = r#"[{"market_cap_usd": "1"}]"#;
        let error = parse_ticker_output(raw).expect_err("symbol is required");
        assert!(error.to_string().contains("no symbol"));
    }

    #[test]
    fn rejects_non_collection_json() {
        assert!(parse_ticker_output("42").is_err());
        assert!(parse_ticker_output(r#"{"coins": []}"#).is_err());
        assert!(parse_ticker_output("not json").is_err());
    }
}
