use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::data::model::LaunchDataset;
use crate::state::AppState;
use crate::ui::{panels, plot};
use crate::view::RegionId;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: heading ----
        egui::TopBottomPanel::top("heading").show(ctx, |ui| {
            panels::heading(ui, &self.state);
        });

        // ---- Central panel: controls and chart regions in page order ----
        let [upper, lower] = self.state.layout.regions;
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::site_dropdown(ui, &mut self.state);
                    ui.add_space(8.0);
                    chart_region(ui, &self.state, upper);
                    ui.add_space(8.0);
                    panels::payload_slider(ui, &mut self.state);
                    chart_region(ui, &self.state, lower);
                });
        });
    }
}

fn chart_region(ui: &mut Ui, state: &AppState, region: RegionId) {
    match region {
        RegionId::SuccessPie => plot::pie_chart(ui, &state.pie, &state.site_colors),
        RegionId::PayloadScatter => {
            plot::scatter_chart(ui, &state.scatter, state.group_colors.as_ref())
        }
    }
}
