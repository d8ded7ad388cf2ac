use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Vec2};

use crate::net::{self, NetworkBundle};

mod colors;
mod graph;
mod highlight;
mod layout;
mod render_utils;

pub struct StateNetworkApp {
    net_path: String,
    tree_path: String,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<NetworkBundle, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    bundle: NetworkBundle,
    entropy_rate: f64,
    physical: layout::PhysicalLayout,
    states: layout::StateLayout,
    state_fill: Vec<Color32>,
    state_stroke: Vec<Color32>,
    link_stroke: Vec<Color32>,
    hovered_state: Option<usize>,
    drag: Option<DragTarget>,
    pan: Vec2,
    zoom: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragTarget {
    Node(usize),
    State(usize),
}

impl StateNetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, net_path: String, tree_path: String) -> Self {
        let state = Self::start_load(net_path.clone(), tree_path.clone());
        Self {
            net_path,
            tree_path,
            state,
        }
    }

    fn spawn_load(net_path: String, tree_path: String) -> Receiver<Result<NetworkBundle, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                net::load_bundle(&net_path, &tree_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(net_path: String, tree_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(net_path, tree_path),
        }
    }
}

impl eframe::App for StateNetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(bundle)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(bundle))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading state network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load state network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition =
                            Some(Self::start_load(self.net_path.clone(), self.tree_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
