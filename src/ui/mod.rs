//! egui rendering: page controls and chart regions.

pub mod panels;
pub mod plot;
