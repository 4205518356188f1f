use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::chart::{correlation_chart, proportion_chart, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::data::filter::{PayloadRange, SelectorState, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::view::{ControlId, PageLayout, RegionId};

// ---------------------------------------------------------------------------
// Control → chart region subscriptions
// ---------------------------------------------------------------------------

/// A new value published by one of the page controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlChange {
    Site(SiteSelection),
    Payload(PayloadRange),
}

impl ControlChange {
    pub fn control(&self) -> ControlId {
        match self {
            ControlChange::Site(_) => ControlId::SiteDropdown,
            ControlChange::Payload(_) => ControlId::PayloadSlider,
        }
    }
}

/// Which chart regions re-render when a control publishes.
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    table: BTreeMap<ControlId, Vec<RegionId>>,
}

impl Subscriptions {
    /// The dashboard wiring: the pie follows the dropdown, the scatter follows
    /// both the dropdown and the slider.
    pub fn dashboard() -> Self {
        let mut subs = Self::default();
        subs.subscribe(RegionId::SuccessPie, ControlId::SiteDropdown);
        subs.subscribe(RegionId::PayloadScatter, ControlId::SiteDropdown);
        subs.subscribe(RegionId::PayloadScatter, ControlId::PayloadSlider);
        subs
    }

    pub fn subscribe(&mut self, region: RegionId, control: ControlId) {
        let regions = self.table.entry(control).or_default();
        if !regions.contains(&region) {
            regions.push(region);
        }
    }

    pub fn subscribers(&self, control: ControlId) -> &[RegionId] {
        self.table.get(&control).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PublishError {
    #[error("unknown launch site '{0}'")]
    UnknownSite(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct AppState {
    /// Launch table, read-only after startup.
    pub dataset: Arc<LaunchDataset>,

    /// Static page description derived from the dataset.
    pub layout: PageLayout,

    /// Current control values.
    pub selectors: SelectorState,

    /// Content of the `success-pie-chart` region.
    pub pie: PieChart,

    /// Content of the `success-payload-scatter-chart` region.
    pub scatter: ScatterChart,

    /// Colours for per-site pie slices.
    pub site_colors: ColorMap,

    /// Colours for scatter groups; built over the whole table so a group
    /// keeps its colour as filters change.
    pub group_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    subscriptions: Subscriptions,
}

impl AppState {
    /// Build the page for a loaded dataset and render both regions from the
    /// initial control values.
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        debug_assert!(!dataset.is_empty());
        let layout = PageLayout::build(&dataset);
        let selectors = SelectorState {
            site: layout.dropdown.initial.clone(),
            payload: PayloadRange::new(layout.slider.initial[0], layout.slider.initial[1]),
        };
        let pie = proportion_chart(&dataset, &selectors.site);
        let scatter = correlation_chart(&dataset, &selectors.site, selectors.payload);

        let site_colors = ColorMap::new("Launch Site", dataset.sites().iter().map(String::as_str));
        let group_colors = dataset
            .color_column()
            .map(|col| ColorMap::new(col.header(), dataset.color_values()));

        Self {
            dataset,
            layout,
            selectors,
            pie,
            scatter,
            site_colors,
            group_colors,
            status_message: None,
            subscriptions: Subscriptions::dashboard(),
        }
    }

    /// Apply a control value and re-render every region subscribed to that
    /// control.  Returns the regions that were re-rendered; publishing the
    /// current value is a no-op.
    ///
    /// Site values must be `ALL` or one of the table's sites.  Unknown sites
    /// are rejected and leave the state untouched.
    pub fn publish(&mut self, change: ControlChange) -> Result<Vec<RegionId>, PublishError> {
        let control = change.control();

        let changed = match change {
            ControlChange::Site(site) => {
                if let SiteSelection::Site(name) = &site {
                    if !self.dataset.has_site(name) {
                        log::warn!("Rejected unknown launch site {name:?}");
                        return Err(PublishError::UnknownSite(name.clone()));
                    }
                }
                let changed = self.selectors.site != site;
                self.selectors.site = site;
                changed
            }
            ControlChange::Payload(range) => {
                let changed = self.selectors.payload != range;
                self.selectors.payload = range;
                changed
            }
        };

        if !changed {
            return Ok(Vec::new());
        }

        let regions = self.subscriptions.subscribers(control).to_vec();
        log::debug!(
            "{} published {:?}; re-rendering {:?}",
            control.element_id(),
            self.selectors,
            regions
        );
        for &region in &regions {
            self.render(region);
        }
        self.status_message = None;
        Ok(regions)
    }

    /// Recompute one region from scratch.
    fn render(&mut self, region: RegionId) {
        let SelectorState { site, payload } = &self.selectors;
        match region {
            RegionId::SuccessPie => self.pie = proportion_chart(&self.dataset, site),
            RegionId::PayloadScatter => {
                self.scatter = correlation_chart(&self.dataset, site, *payload)
            }
        }
    }
}
