use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    #[value(name = "market_cap")]
    MarketCap,
    #[value(name = "last24h", alias = "percent_change_24h")]
    PercentChange24h,
}

impl SortKey {
    pub const ALL: [Self; 2] = [Self::MarketCap, Self::PercentChange24h];

    pub fn label(self) -> &'static str {
        match self {
            Self::MarketCap => "Market cap",
            Self::PercentChange24h => "24h change",
        }
    }

    /// Name of the ticker attribute this key sizes bubbles by.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::MarketCap => "market_cap_usd",
            Self::PercentChange24h => "percent_change_24h",
        }
    }
}

/// One ticker entry. Numeric fields that failed to parse hold `NaN`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coin {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: String,
    pub rank: Option<u32>,
    pub price_usd: Option<f64>,
    pub market_cap_usd: f64,
    pub percent_change_24h: f64,
}

impl Coin {
    pub fn metric(&self, sort_key: SortKey) -> f64 {
        match sort_key {
            SortKey::MarketCap => self.market_cap_usd,
            SortKey::PercentChange24h => self.percent_change_24h,
        }
    }

    pub fn is_gaining(&self) -> bool {
        self.percent_change_24h > 0.0
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}
