mod app;
mod chart;
mod coins;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::coins::SortKey;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with ticker entries (symbol, market_cap_usd, percent_change_24h).
    #[arg(long, default_value = "demos/coins.json")]
    data: PathBuf,

    /// Metric that sizes the bubbles.
    #[arg(long, value_enum, default_value_t = SortKey::MarketCap)]
    sort_by: SortKey,
}

fn init_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

fn main() -> eframe::Result<()> {
    if let Err(error) = init_tracing() {
        eprintln!("coin-bubbles: logging disabled: {error}");
    }
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1520.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "coin-bubbles",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CoinBubblesApp::new(
                cc,
                args.data.clone(),
                args.sort_by,
            )))
        }),
    )
}
