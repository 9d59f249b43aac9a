use eframe::egui::{Pos2, Vec2};
use tracing::{debug, warn};

use crate::coins::{Coin, SortKey};

mod error;
mod interaction;
mod render;
mod scale;
mod simulation;
mod view;

pub use error::ChartError;
pub use render::{ACCENT_COLOR, BubbleElement};
pub use scale::{RadiusScale, ScaleKind};
pub use simulation::{Simulation, SimulationConfig, SimulationPhase};

pub const CANVAS_SIZE: Vec2 = Vec2::new(1200.0, 768.0);

/// Delivered to the host when a bubble is clicked.
#[derive(Clone, Copy, Debug)]
pub struct BubbleClick {
    pub index: usize,
    pub pointer: Pos2,
}

pub struct BubbleChartProps<'a> {
    pub data: &'a [Coin],
    pub sort_key: SortKey,
    /// Drop every bubble and rebuild scale, layout and elements from `data`.
    pub needs_redraw: bool,
    pub on_bubble_click: &'a mut dyn FnMut(&BubbleClick, &Coin),
}

/// Bubble chart widget. Owns the layout for as long as the widget lives and
/// replaces it wholesale on every redraw.
pub struct BubbleChart {
    config: SimulationConfig,
    mounted: bool,
    revision: u64,
    state: Option<ChartState>,
    error: Option<ChartError>,
}

struct ChartState {
    sort_key: SortKey,
    /// Coins the bubbles were built from, index-aligned with `elements`.
    coins: Vec<Coin>,
    scale: RadiusScale,
    elements: Vec<BubbleElement>,
    simulation: Simulation,
    selected: Option<usize>,
    drag: Option<interaction::ActiveDrag>,
}

impl Default for BubbleChart {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl BubbleChart {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            mounted: false,
            revision: 0,
            state: None,
            error: None,
        }
    }

    /// Builds on first use and whenever `needs_redraw` is raised; otherwise
    /// keeps the current bubbles even if `data` changed.
    pub fn sync(&mut self, data: &[Coin], sort_key: SortKey, needs_redraw: bool) {
        if !self.mounted || needs_redraw {
            self.rebuild(data, sort_key);
        }
    }

    fn rebuild(&mut self, data: &[Coin], sort_key: SortKey) {
        self.mounted = true;
        self.revision = self.revision.wrapping_add(1);
        self.state = None;
        self.error = None;

        match ChartState::build(data, sort_key, self.config) {
            Ok(state) => {
                debug!(
                    revision = self.revision,
                    bubbles = state.elements.len(),
                    sort_key = sort_key.attribute(),
                    domain = ?state.scale.domain(),
                    "rebuilt bubble chart"
                );
                self.state = Some(state);
            }
            Err(error) => {
                warn!(revision = self.revision, %error, "bubble chart not drawn");
                self.error = Some(error);
            }
        }
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn error(&self) -> Option<&ChartError> {
        self.error.as_ref()
    }

    #[cfg(test)]
    pub fn element_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.elements.len())
    }

    #[cfg(test)]
    pub fn elements(&self) -> &[BubbleElement] {
        self.state
            .as_ref()
            .map(|state| state.elements.as_slice())
            .unwrap_or_default()
    }

    pub fn scale(&self) -> Option<&RadiusScale> {
        self.state.as_ref().map(|state| &state.scale)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.state.as_ref().map(|state| &state.simulation)
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.state.as_ref().map(|state| state.sort_key)
    }

    /// Index of the last clicked bubble. Cleared on redraw.
    pub fn selected(&self) -> Option<usize> {
        self.state.as_ref().and_then(|state| state.selected)
    }

    /// Advances the layout one frame; false once it has settled.
    pub fn step(&mut self) -> bool {
        self.state
            .as_mut()
            .is_some_and(|state| state.simulation.step())
    }

    /// Selects bubble `index` and reports the coin it was built from.
    pub fn click(&mut self, click: BubbleClick, props: &mut BubbleChartProps<'_>) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(coin) = state.coins.get(click.index) else {
            return;
        };

        state.selected = Some(click.index);
        debug!(symbol = %coin.symbol, index = click.index, "bubble clicked");
        (props.on_bubble_click)(&click, coin);
    }
}

impl ChartState {
    fn build(
        data: &[Coin],
        sort_key: SortKey,
        config: SimulationConfig,
    ) -> Result<Self, ChartError> {
        let values = data
            .iter()
            .map(|coin| coin.metric(sort_key))
            .collect::<Vec<_>>();
        let scale = RadiusScale::for_values(&values, sort_key)?;

        let elements = data
            .iter()
            .map(|coin| BubbleElement::for_coin(coin, &scale, sort_key))
            .collect::<Vec<_>>();

        let mut simulation =
            Simulation::new(elements.iter().map(|element| element.radius), config);
        simulation.start();

        Ok(Self {
            sort_key,
            coins: data.to_vec(),
            scale,
            elements,
            simulation,
            selected: None,
            drag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(symbol: &str, market_cap_usd: f64, percent_change_24h: f64) -> Coin {
        Coin {
            symbol: symbol.to_owned(),
            market_cap_usd,
            percent_change_24h,
            ..Default::default()
        }
    }

    fn sample() -> Vec<Coin> {
        vec![
            coin("BTC", 8.0e11, 2.5),
            coin("ETH", 4.0e11, -1.0),
            coin("XRP", 3.9e10, -4.2),
            coin("ADA", 3.7e10, 5.8),
        ]
    }

    #[test]
    fn mount_builds_one_element_per_coin() {
        let mut chart = BubbleChart::default();
        assert_eq!(chart.element_count(), 0);

        chart.sync(&sample(), SortKey::MarketCap, false);

        assert_eq!(chart.element_count(), 4);
        assert_eq!(chart.revision(), 1);
        assert_eq!(
            chart.simulation().map(Simulation::phase),
            Some(SimulationPhase::Running)
        );
    }

    #[test]
    fn data_changes_are_ignored_without_redraw_flag() {
        let mut chart = BubbleChart::default();
        chart.sync(&sample(), SortKey::MarketCap, false);
        chart.step();

        let mut grown = sample();
        grown.push(coin("DOGE", 1.98e10, -2.6));
        chart.sync(&grown, SortKey::MarketCap, false);

        assert_eq!(chart.element_count(), 4);
        assert_eq!(chart.revision(), 1);
    }

    #[test]
    fn redraw_replaces_every_element() {
        let mut chart = BubbleChart::default();
        chart.sync(&sample(), SortKey::MarketCap, false);
        for _ in 0..40 {
            chart.step();
        }

        let smaller = vec![coin("SOL", 3.2e10, -6.4), coin("DOT", 2.1e10, 1.2)];
        chart.sync(&smaller, SortKey::PercentChange24h, true);

        assert_eq!(chart.revision(), 2);
        assert_eq!(chart.element_count(), 2);
        let symbols = chart
            .elements()
            .iter()
            .map(|element| element.symbol.as_str())
            .collect::<Vec<_>>();
        assert_eq!(symbols, ["SOL", "DOT"]);
        assert_eq!(chart.sort_key(), Some(SortKey::PercentChange24h));
        assert_eq!(chart.elements()[0].radius, 8.0);
        assert_eq!(chart.elements()[1].radius, 70.0);
    }

    #[test]
    fn invalid_dataset_leaves_no_elements() {
        let mut chart = BubbleChart::default();
        chart.sync(&sample(), SortKey::MarketCap, false);

        let broken = vec![coin("BAD", f64::NAN, 1.0)];
        chart.sync(&broken, SortKey::MarketCap, true);

        assert_eq!(chart.element_count(), 0);
        assert!(matches!(chart.error(), Some(ChartError::InvalidDataset(_))));
        assert!(!chart.step());

        chart.sync(&[], SortKey::MarketCap, true);
        assert!(chart.error().is_some());

        chart.sync(&sample(), SortKey::MarketCap, true);
        assert!(chart.error().is_none());
        assert_eq!(chart.element_count(), 4);
    }

    #[test]
    fn click_selects_and_notifies_host() {
        let data = sample();
        let mut chart = BubbleChart::default();
        chart.sync(&data, SortKey::MarketCap, false);

        let mut clicked = Vec::new();
        let mut on_click = |click: &BubbleClick, coin: &Coin| {
            clicked.push((click.index, coin.symbol.clone()));
        };
        let mut props = BubbleChartProps {
            data: &data,
            sort_key: SortKey::MarketCap,
            needs_redraw: false,
            on_bubble_click: &mut on_click,
        };

        let click = BubbleClick {
            index: 1,
            pointer: Pos2::ZERO,
        };
        chart.click(click, &mut props);
        chart.click(
            BubbleClick {
                index: 9,
                pointer: Pos2::ZERO,
            },
            &mut props,
        );

        assert_eq!(clicked, vec![(1, "ETH".to_owned())]);
        assert_eq!(chart.selected(), Some(1));

        chart.sync(&data, SortKey::MarketCap, true);
        assert_eq!(chart.selected(), None);
    }

    #[test]
    fn click_reports_coin_the_bubble_was_built_from() {
        let mut chart = BubbleChart::default();
        chart.sync(&sample(), SortKey::MarketCap, false);

        let replaced = vec![coin("DOGE", 1.98e10, -2.6)];
        chart.sync(&replaced, SortKey::MarketCap, false);

        let mut clicked = Vec::new();
        let mut on_click = |_: &BubbleClick, coin: &Coin| clicked.push(coin.symbol.clone());
        let mut props = BubbleChartProps {
            data: &replaced,
            sort_key: SortKey::MarketCap,
            needs_redraw: false,
            on_bubble_click: &mut on_click,
        };
        for index in [0, 3] {
            chart.click(
                BubbleClick {
                    index,
                    pointer: Pos2::ZERO,
                },
                &mut props,
            );
        }

        assert_eq!(chart.elements()[0].symbol, "BTC");
        assert_eq!(clicked, ["BTC", "ADA"]);
        assert_eq!(chart.selected(), Some(3));
    }
}
