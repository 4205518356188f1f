use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{payload_records, site_records, PayloadRange, SiteSelection};
use crate::data::model::{ColorColumn, LaunchDataset, Outcome, COL_CLASS, COL_PAYLOAD_MASS};

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: usize,
}

/// Renderer-agnostic proportion chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl PieChart {
    /// Sum of all slice values.
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub launch_site: String,
    /// Value of the colouring column; `None` when the chart is uncoloured or
    /// the launch has no value for it.
    pub color_group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: &'static str,
}

/// The y axis always shows exactly these two ticks, whatever outcomes are
/// present in the filtered rows.
pub const OUTCOME_TICKS: [AxisTick; 2] = [
    AxisTick {
        value: 0.0,
        label: "Failure (0)",
    },
    AxisTick {
        value: 1.0,
        label: "Success (1)",
    },
];

/// Renderer-agnostic payload/outcome scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub color_by: Option<ColorColumn>,
    pub points: Vec<ScatterPoint>,
    pub y_ticks: [AxisTick; 2],
}

impl ScatterChart {
    /// Points bucketed by colour group, groups in sorted order.
    pub fn groups(&self) -> BTreeMap<Option<&str>, Vec<&ScatterPoint>> {
        let mut groups: BTreeMap<Option<&str>, Vec<&ScatterPoint>> = BTreeMap::new();
        for p in &self.points {
            groups.entry(p.color_group.as_deref()).or_default().push(p);
        }
        groups
    }

    /// Hover text for one point: the launch site plus the colouring value.
    pub fn hover_text(&self, point: &ScatterPoint) -> String {
        let mut text = format!(
            "{COL_PAYLOAD_MASS}: {}\n{COL_CLASS}: {}\nLaunch Site: {}",
            point.payload_mass_kg, point.class, point.launch_site
        );
        if let (Some(col), Some(group)) = (self.color_by, point.color_group.as_deref()) {
            text.push_str(&format!("\n{}: {group}", col.header()));
        }
        text
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Proportion chart for the site dropdown.
///
/// For all sites: successful launches counted per site, sites in sorted order
/// (sites without a success get no slice).  For one site: success and failure
/// counts for that site, larger count first, zero counts omitted.
pub fn proportion_chart(dataset: &LaunchDataset, site: &SiteSelection) -> PieChart {
    match site {
        SiteSelection::All => {
            let mut per_site: BTreeMap<&str, usize> = BTreeMap::new();
            for r in dataset.records().iter().filter(|r| r.outcome.is_success()) {
                *per_site.entry(r.launch_site.as_str()).or_default() += 1;
            }
            PieChart {
                title: "Total Successful Launches by Site".to_string(),
                slices: per_site
                    .into_iter()
                    .map(|(label, value)| Slice {
                        label: label.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
        SiteSelection::Site(name) => {
            let mut per_outcome: BTreeMap<Outcome, usize> = BTreeMap::new();
            for r in site_records(dataset, site) {
                *per_outcome.entry(r.outcome).or_default() += 1;
            }
            let mut counts: Vec<(Outcome, usize)> = per_outcome.into_iter().collect();
            // Descending by count; Success ahead of Failure on ties.
            counts.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
            PieChart {
                title: format!("Success vs Failure for {name}"),
                slices: counts
                    .into_iter()
                    .map(|(outcome, value)| Slice {
                        label: outcome.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
    }
}

/// Payload/outcome scatter chart for the dropdown and the payload slider.
pub fn correlation_chart(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> ScatterChart {
    let color_by = dataset.color_column();
    let points = payload_records(dataset, site, range)
        .into_iter()
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            class: r.outcome.class(),
            launch_site: r.launch_site.clone(),
            color_group: color_by.and_then(|col| r.color_value(col)).map(str::to_string),
        })
        .collect();

    let title = if site.is_all() {
        "Correlation between Payload and Success".to_string()
    } else {
        format!("Payload vs Success for {site}")
    };

    ScatterChart {
        title,
        x_label: COL_PAYLOAD_MASS,
        y_label: COL_CLASS,
        color_by,
        points,
        y_ticks: OUTCOME_TICKS,
    }
}
