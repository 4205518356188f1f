use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::{PayloadRange, SiteSelection};
use crate::state::{AppState, ControlChange};

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

const HEADING_COLOR: Color32 = Color32::from_rgb(0x50, 0x3D, 0x36);

pub fn heading(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(state.layout.heading)
                .size(40.0)
                .color(HEADING_COLOR),
        );
        ui.label(
            RichText::new(format!(
                "{} launches from {} sites",
                state.dataset.len(),
                state.dataset.sites().len()
            ))
            .weak(),
        );
        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Render the launch-site dropdown and publish any new selection.
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let spec = &state.layout.dropdown;
    let current = &state.selectors.site;
    let mut picked: Option<SiteSelection> = None;

    ui.vertical_centered(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt(spec.id.element_id())
            .selected_text(spec.label_for(current))
            .width(ui.available_width() * 0.6)
            .show_ui(ui, |ui: &mut Ui| {
                for option in &spec.options {
                    let selected = option.value == current.value();
                    if ui.selectable_label(selected, &option.label).clicked() && !selected {
                        picked = Some(SiteSelection::from_value(&option.value));
                    }
                }
            })
            .response
            .on_hover_text(spec.placeholder);
    });

    if let Some(site) = picked {
        publish(state, ControlChange::Site(site));
    }
}

/// Render the dual-handle payload slider and publish the new window when a
/// handle moves.
pub fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    let spec = &state.layout.slider;
    let current = [state.selectors.payload.low(), state.selectors.payload.high()];
    let mut moved: Option<(usize, f64)> = None;

    ui.label(spec.label);
    ui.push_id(spec.id.element_id(), |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            for (handle, name) in ["low", "high"].into_iter().enumerate() {
                let mut value = current[handle];
                let slider = egui::Slider::new(&mut value, spec.min..=spec.max)
                    .text(name)
                    .fixed_decimals(0)
                    .show_value(true);
                if ui.add(slider).changed() {
                    moved = Some((handle, value));
                }
            }
        });
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.weak("marks:");
        for mark in &spec.marks {
            ui.weak(&mark.label);
        }
    });

    if let Some((handle, value)) = moved {
        let next = spec.move_handle(current, handle, value);
        publish(state, ControlChange::Payload(PayloadRange::new(next[0], next[1])));
    }
}

fn publish(state: &mut AppState, change: ControlChange) {
    if let Err(e) = state.publish(change) {
        state.status_message = Some(format!("Error: {e}"));
    }
}
