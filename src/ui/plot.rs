use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    GridInput, GridMark, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::chart::{AxisTick, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::view::RegionId;

const PLOT_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Proportion chart (pie)
// ---------------------------------------------------------------------------

/// Largest fraction of a turn drawn as one polygon; keeps every piece convex.
const MAX_WEDGE: f64 = 0.25;

/// Angle of a position along the pie, measured as a fraction of a full turn.
/// Slices start at twelve o'clock and run clockwise.
fn turn_angle(fraction: f64) -> f64 {
    FRAC_PI_2 - fraction * TAU
}

/// Outline of a wedge of the unit pie from `start` to `end` (fractions of a
/// turn): the centre followed by points along the arc.
fn wedge_outline(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = ((end - start) * 128.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let angle = turn_angle(start + (end - start) * i as f64 / steps as f64);
        points.push([angle.cos(), angle.sin()]);
    }
    points
}

/// Split a slice into convex wedges.
fn slice_wedges(start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let mut wedges = Vec::new();
    let mut from = start;
    while from < end {
        let to = (from + MAX_WEDGE).min(end);
        wedges.push(wedge_outline(from, to));
        from = to;
    }
    wedges
}

pub fn pie_chart(ui: &mut Ui, chart: &PieChart, colors: &ColorMap) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&chart.title);
    });

    let total = chart.total();
    if total == 0 {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No launches match the current selection.");
        });
        return;
    }

    Plot::new(RegionId::SuccessPie.element_id())
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for slice in &chart.slices {
                let fraction = slice.value as f64 / total as f64;
                let color = colors.slice_color(&slice.label);

                for outline in slice_wedges(start, start + fraction) {
                    let points: PlotPoints = outline.into_iter().collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .name(&slice.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = turn_angle(start + fraction / 2.0);
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        format!("{:.1}%", fraction * 100.0),
                    )
                    .color(Color32::WHITE),
                );
                start += fraction;
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation chart (scatter)
// ---------------------------------------------------------------------------

fn tick_label(ticks: &[AxisTick], value: f64) -> String {
    ticks
        .iter()
        .find(|t| (t.value - value).abs() < 1e-9)
        .map(|t| t.label.to_string())
        .unwrap_or_default()
}

pub fn scatter_chart(ui: &mut Ui, chart: &ScatterChart, colors: Option<&ColorMap>) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&chart.title);
    });

    let ticks = chart.y_ticks;

    // Hover lookup: plot position → hover text of the nearest launch.
    let hover: Vec<([f64; 2], String)> = chart
        .points
        .iter()
        .map(|p| ([p.payload_mass_kg, f64::from(p.class)], chart.hover_text(p)))
        .collect();
    let x_span = hover
        .iter()
        .map(|(xy, _)| xy[0])
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
        .map(|(lo, hi)| (hi - lo).max(1.0))
        .unwrap_or(1.0);

    Plot::new(RegionId::PayloadScatter.element_id())
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label)
        .y_axis_label(chart.y_label)
        .include_y(-0.25)
        .include_y(1.25)
        .y_grid_spacer(move |_input: GridInput| {
            ticks
                .iter()
                .map(|t| GridMark {
                    value: t.value,
                    step_size: 1.0,
                })
                .collect()
        })
        .y_axis_formatter(move |mark, _range| tick_label(&ticks, mark.value))
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return format!("{:.0} kg", value.x);
            }
            hover
                .iter()
                .min_by(|(a, _), (b, _)| {
                    let da = ((a[0] - value.x) / x_span).powi(2) + (a[1] - value.y).powi(2);
                    let db = ((b[0] - value.x) / x_span).powi(2) + (b[1] - value.y).powi(2);
                    da.total_cmp(&db)
                })
                .map(|(_, text)| format!("{name}\n{text}"))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (group, points) in chart.groups() {
                let color = match (group, colors) {
                    (Some(value), Some(map)) => map.color_for(value),
                    (None, Some(map)) => map.default_color(),
                    _ => Color32::LIGHT_BLUE,
                };
                let series: PlotPoints = points
                    .iter()
                    .map(|p| [p.payload_mass_kg, f64::from(p.class)])
                    .collect();
                plot_ui.points(
                    Points::new(series)
                        .name(group.unwrap_or("launches"))
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });

    if let Some(map) = colors {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak(format!("Coloured by {}", map.column));
        });
    }
    if chart.points.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No launches in the selected payload range.");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::OUTCOME_TICKS;

    #[test]
    fn wedges_start_at_the_centre_and_follow_the_arc() {
        let outline = wedge_outline(0.0, 0.25);
        assert_eq!(outline[0], [0.0, 0.0]);
        // Twelve o'clock, then clockwise to three o'clock.
        let first = outline[1];
        let last = outline[outline.len() - 1];
        assert!(first[0].abs() < 1e-9 && (first[1] - 1.0).abs() < 1e-9);
        assert!((last[0] - 1.0).abs() < 1e-9 && last[1].abs() < 1e-9);
    }

    #[test]
    fn large_slices_are_split_into_quarter_turns() {
        assert_eq!(slice_wedges(0.0, 1.0).len(), 4);
        assert_eq!(slice_wedges(0.1, 0.2).len(), 1);
        assert!(slice_wedges(0.5, 0.5).is_empty());
    }

    #[test]
    fn only_outcome_ticks_are_labelled() {
        assert_eq!(tick_label(&OUTCOME_TICKS, 0.0), "Failure (0)");
        assert_eq!(tick_label(&OUTCOME_TICKS, 1.0), "Success (1)");
        assert_eq!(tick_label(&OUTCOME_TICKS, 0.5), "");
    }
}
