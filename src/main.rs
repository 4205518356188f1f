mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use std::sync::Arc;

use app::LaunchDashApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::parse();

    // The table is read exactly once; without it there is no dashboard.
    let dataset = match data::loader::load_file(&config.data_path) {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", config.data_path.display());
            eprintln!("error: failed to load {}: {e:#}", config.data_path.display());
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(dataset)))),
    )
}
