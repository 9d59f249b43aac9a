use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, RichText};
use tracing::info;

use crate::chart::{
    ACCENT_COLOR, BubbleChart, BubbleChartProps, BubbleClick, ScaleKind, SimulationPhase,
};
use crate::coins::{Coin, SortKey};
use crate::util::{format_percent, format_usd};

use super::ViewModel;

impl ViewModel {
    pub(super) fn new(coins: Vec<Coin>, sort_key: SortKey) -> Self {
        Self {
            coins,
            sort_key,
            chart: BubbleChart::default(),
            needs_redraw: false,
            selected: None,
        }
    }

    pub(super) fn replace_coins(&mut self, coins: Vec<Coin>) {
        self.selected = None;
        self.coins = coins;
        self.needs_redraw = true;
    }

    pub(super) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, data_path, reload_requested, is_reloading));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let selected = &mut self.selected;
                let mut on_bubble_click = |click: &BubbleClick, coin: &Coin| {
                    info!(symbol = %coin.symbol, pointer = ?click.pointer, "bubble selected");
                    *selected = Some(coin.clone());
                };
                self.chart.show(
                    ui,
                    BubbleChartProps {
                        data: &self.coins,
                        sort_key: self.sort_key,
                        needs_redraw: self.needs_redraw,
                        on_bubble_click: &mut on_bubble_click,
                    },
                );
            });
        });

        self.needs_redraw = false;
    }

    fn draw_top_bar(
        &mut self,
        ui: &mut egui::Ui,
        data_path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        ui.horizontal(|ui| {
            ui.heading("coin-bubbles");
            ui.separator();
            ui.label(format!("coins: {}", self.coins.len()));
            ui.label(format!("data: {}", data_path.display()));
            ui.separator();

            ui.label("Size by");
            for sort_key in SortKey::ALL {
                if ui
                    .selectable_value(&mut self.sort_key, sort_key, sort_key.label())
                    .changed()
                {
                    self.needs_redraw = true;
                }
            }
            ui.separator();

            if ui.button("Redraw").clicked() {
                self.needs_redraw = true;
            }
            let reload_button = ui.add_enabled(!is_reloading, egui::Button::new("Reload data"));
            if reload_button.clicked() {
                *reload_requested = true;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(error) = self.chart.error() {
                    ui.colored_label(ui.visuals().error_fg_color, error.to_string());
                    return;
                }

                if let Some(simulation) = self.chart.simulation() {
                    let phase = match simulation.phase() {
                        SimulationPhase::Idle => "idle",
                        SimulationPhase::Running => "running",
                        SimulationPhase::Dragging => "dragging",
                        SimulationPhase::Settled => "settled",
                    };
                    ui.label(format!("layout {phase} (alpha {:.3})", simulation.alpha()));
                }

                if let (Some(scale), Some(sort_key)) = (self.chart.scale(), self.chart.sort_key()) {
                    let kind = match scale.kind() {
                        ScaleKind::Linear => "linear",
                        ScaleKind::Log => "log",
                    };
                    let (low, high) = scale.range();
                    ui.label(format!(
                        "{kind} scale on {} -> {low:.0}..{high:.0}px",
                        sort_key.attribute()
                    ));
                }
            });
        });
    }

    fn draw_details(&self, ui: &mut egui::Ui) {
        ui.heading("Selected coin");
        ui.separator();

        let Some(coin) = self
            .selected
            .as_ref()
            .filter(|_| self.chart.selected().is_some())
        else {
            ui.label("Click a bubble to inspect a coin.");
            return;
        };

        ui.label(RichText::new(coin.display_name()).strong().size(18.0));
        egui::Grid::new("coin_details")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Symbol");
                ui.label(coin.symbol.as_str());
                ui.end_row();

                if let Some(rank) = coin.rank {
                    ui.label("Rank");
                    ui.label(format!("#{rank}"));
                    ui.end_row();
                }

                if let Some(price) = coin.price_usd {
                    ui.label("Price");
                    ui.label(format_usd(price));
                    ui.end_row();
                }

                ui.label("Market cap");
                ui.label(format_usd(coin.market_cap_usd));
                ui.end_row();

                ui.label("24h change");
                let change = RichText::new(format_percent(coin.percent_change_24h));
                if coin.is_gaining() {
                    ui.label(change.color(ACCENT_COLOR));
                } else {
                    ui.label(change);
                }
                ui.end_row();
            });

        if let Some(id) = &coin.id {
            ui.add_space(8.0);
            ui.label(RichText::new(id.as_str()).weak());
        }
    }
}
