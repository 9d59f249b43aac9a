use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::chart::BubbleChart;
use crate::coins::{Coin, SortKey, load_coins};

mod panels;

type LoadResult = Result<Vec<Coin>, String>;

pub struct CoinBubblesApp {
    data_path: PathBuf,
    sort_key: SortKey,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    coins: Vec<Coin>,
    sort_key: SortKey,
    chart: BubbleChart,
    needs_redraw: bool,
    selected: Option<Coin>,
}

impl CoinBubblesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf, sort_key: SortKey) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            sort_key,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_coins(&data_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        info!(path = %data_path.display(), "loading ticker data");
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }

    fn ready_state(result: LoadResult, sort_key: SortKey) -> AppState {
        match result {
            Ok(coins) => AppState::Ready(Box::new(ViewModel::new(coins, sort_key))),
            Err(message) => {
                error!(%message, "failed to load ticker data");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for CoinBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(Self::ready_state(result, self.sort_key)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Self::ready_state(
                            Err("Background load worker disconnected".to_owned()),
                            self.sort_key,
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading ticker data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load ticker data");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);
                self.sort_key = model.sort_key;

                if reload_requested && self.reload_rx.is_none() {
                    info!(path = %self.data_path.display(), "reloading ticker data");
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(coins)) => {
                            info!(count = coins.len(), "reloaded ticker data");
                            model.replace_coins(coins);
                        }
                        Ok(Err(message)) => {
                            transition = Some(Self::ready_state(Err(message), self.sort_key));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Self::ready_state(
                                Err("Background load worker disconnected".to_owned()),
                                self.sort_key,
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
