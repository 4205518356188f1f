use std::fmt;

use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, ALL_SITES};

// ---------------------------------------------------------------------------
// Selector state: which site and which payload window are selected
// ---------------------------------------------------------------------------

/// The dropdown value: every site, or one named site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Interpret a raw dropdown value; `"ALL"` is the synthetic all-sites entry.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// The raw dropdown value.
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(s) => s,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SiteSelection::All)
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Inclusive payload window `[low, high]`, always with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Build a window from two handle positions, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The window spanning the whole table.
    pub fn full(dataset: &LaunchDataset) -> Self {
        Self::new(dataset.min_payload(), dataset.max_payload())
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

/// Current value of every control on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// Launches from the selected site (every launch for [`SiteSelection::All`]).
pub fn site_records<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |r| site.matches(&r.launch_site))
}

/// Launches inside the payload window, then narrowed to the selected site.
pub fn payload_records<'a>(
    dataset: &'a LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .filter(|r| site.matches(&r.launch_site))
        .collect()
}
