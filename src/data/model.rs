use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Column names of the launch table
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

/// Selector value meaning "every launch site".
pub const ALL_SITES: &str = "ALL";
/// Dropdown label shown for [`ALL_SITES`].
pub const ALL_SITES_LABEL: &str = "All Sites";

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Map a raw `class` value; only 0 and 1 are meaningful.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    /// The numeric `class` value (0 or 1).
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ColorColumn – optional booster columns used for scatter colouring
// ---------------------------------------------------------------------------

/// Which optional booster column the table carries.  The category column wins
/// when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorColumn {
    BoosterVersionCategory,
    BoosterVersion,
}

impl ColorColumn {
    /// Pick the colouring column from the set of columns a table provides.
    pub fn detect(has_category: bool, has_version: bool) -> Option<Self> {
        if has_category {
            Some(ColorColumn::BoosterVersionCategory)
        } else if has_version {
            Some(ColorColumn::BoosterVersion)
        } else {
            None
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            ColorColumn::BoosterVersionCategory => COL_BOOSTER_CATEGORY,
            ColorColumn::BoosterVersion => COL_BOOSTER_VERSION,
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: Option<String>,
    pub booster_version: Option<String>,
}

impl LaunchRecord {
    pub fn new(launch_site: impl Into<String>, payload_mass_kg: f64, outcome: Outcome) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            outcome,
            booster_version_category: None,
            booster_version: None,
        }
    }

    /// Value of the given colouring column for this launch, if any.
    pub fn color_value(&self, column: ColorColumn) -> Option<&str> {
        match column {
            ColorColumn::BoosterVersionCategory => self.booster_version_category.as_deref(),
            ColorColumn::BoosterVersion => self.booster_version.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// SiteOption – one dropdown entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the loaded table plus its startup summaries
// ---------------------------------------------------------------------------

/// The full launch table.  Immutable once built; shared by reference with the
/// chart handlers.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    color_column: Option<ColorColumn>,
    min_payload: f64,
    max_payload: f64,
    sites: Vec<String>,
}

impl LaunchDataset {
    /// Build the dataset and its summaries.  Payload masses must be finite so
    /// that min/max are well defined; the loaders guarantee this.
    pub fn from_records(
        records: Vec<LaunchRecord>,
        color_column: Option<ColorColumn>,
    ) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::EmptyDataset);
        }

        let (min_payload, max_payload) = records.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), r| (lo.min(r.payload_mass_kg), hi.max(r.payload_mass_kg)),
        );

        let sites: Vec<String> = records
            .iter()
            .map(|r| r.launch_site.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            records,
            color_column,
            min_payload,
            max_payload,
            sites,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    pub fn color_column(&self) -> Option<ColorColumn> {
        self.color_column
    }

    /// Distinct launch sites, sorted.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.binary_search_by(|s| s.as_str().cmp(site)).is_ok()
    }

    /// Dropdown entries: the synthetic "All Sites" entry followed by every
    /// distinct site.
    pub fn site_options(&self) -> Vec<SiteOption> {
        std::iter::once(SiteOption {
            label: ALL_SITES_LABEL.to_string(),
            value: ALL_SITES.to_string(),
        })
        .chain(self.sites.iter().map(|s| SiteOption {
            label: s.clone(),
            value: s.clone(),
        }))
        .collect()
    }

    /// Sorted distinct values of the colouring column across the whole table.
    pub fn color_values(&self) -> BTreeSet<&str> {
        match self.color_column {
            Some(col) => self.records.iter().filter_map(|r| r.color_value(col)).collect(),
            None => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LaunchDataset {
        LaunchDataset::from_records(
            vec![
                LaunchRecord::new("SiteB", 2500.0, Outcome::Success),
                LaunchRecord::new("SiteA", 500.0, Outcome::Success),
                LaunchRecord::new("SiteA", 1500.0, Outcome::Failure),
                LaunchRecord::new("SiteB", 0.0, Outcome::Success),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn summaries_cover_every_record() {
        let ds = sample();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 2500.0);
        assert_eq!(ds.sites(), ["SiteA".to_string(), "SiteB".to_string()]);
    }

    #[test]
    fn site_options_lead_with_all_sites() {
        let opts = sample().site_options();
        let values: Vec<&str> = opts.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["ALL", "SiteA", "SiteB"]);
        assert_eq!(opts[0].label, "All Sites");
        assert_eq!(opts[1].label, "SiteA");
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = LaunchDataset::from_records(Vec::new(), None).unwrap_err();
        assert_eq!(err, LoadError::EmptyDataset);
    }

    #[test]
    fn category_column_is_preferred() {
        assert_eq!(
            ColorColumn::detect(true, true),
            Some(ColorColumn::BoosterVersionCategory)
        );
        assert_eq!(ColorColumn::detect(false, true), Some(ColorColumn::BoosterVersion));
        assert_eq!(ColorColumn::detect(false, false), None);
    }

    #[test]
    fn class_values_outside_binary_are_invalid() {
        assert_eq!(Outcome::from_class(1), Some(Outcome::Success));
        assert_eq!(Outcome::from_class(0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_class(2), None);
    }

    #[test]
    fn has_site_matches_exact_names() {
        let ds = sample();
        assert!(ds.has_site("SiteA"));
        assert!(!ds.has_site("sitea"));
        assert!(!ds.has_site("ALL"));
    }
}
