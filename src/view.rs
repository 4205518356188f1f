use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, SiteOption};

// ---------------------------------------------------------------------------
// Page element ids
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlId {
    SiteDropdown,
    PayloadSlider,
}

impl ControlId {
    pub fn element_id(self) -> &'static str {
        match self {
            ControlId::SiteDropdown => "site-dropdown",
            ControlId::PayloadSlider => "payload-slider",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionId {
    SuccessPie,
    PayloadScatter,
}

impl RegionId {
    pub fn element_id(self) -> &'static str {
        match self {
            RegionId::SuccessPie => "success-pie-chart",
            RegionId::PayloadScatter => "success-payload-scatter-chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Static page description
// ---------------------------------------------------------------------------

pub const HEADING: &str = "SpaceX Launch Records Dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownSpec {
    pub id: ControlId,
    pub options: Vec<SiteOption>,
    pub initial: SiteSelection,
    pub placeholder: &'static str,
}

impl DropdownSpec {
    /// Label shown for a selection; falls back to the raw value.
    pub fn label_for<'a>(&'a self, selection: &'a SiteSelection) -> &'a str {
        self.options
            .iter()
            .find(|o| o.value == selection.value())
            .map(|o| o.label.as_str())
            .unwrap_or_else(|| selection.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderMark {
    pub value: i64,
    pub label: String,
}

/// Dual-handle payload slider.  Bounds are the table's payload extremes; mark
/// labels are truncated to whole kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSliderSpec {
    pub id: ControlId,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: [f64; 2],
    pub marks: Vec<SliderMark>,
    pub allow_cross: bool,
}

impl RangeSliderSpec {
    pub const STEP_KG: f64 = 1000.0;

    fn build(dataset: &LaunchDataset) -> Self {
        let full = PayloadRange::full(dataset);
        let (min, max) = (full.low(), full.high());
        let mid = (min + max) / 2.0;

        let mut marks: Vec<SliderMark> = Vec::with_capacity(3);
        for value in [min, mid, max].map(|v| v as i64) {
            if marks.iter().all(|m| m.value != value) {
                marks.push(SliderMark {
                    value,
                    label: value.to_string(),
                });
            }
        }

        Self {
            id: ControlId::PayloadSlider,
            label: "Payload range (Kg):",
            min,
            max,
            step: Self::STEP_KG,
            initial: [min, max],
            marks,
            allow_cross: false,
        }
    }

    /// Snap a handle position onto the step grid anchored at `min`.  The
    /// upper bound stays reachable even when it is off-grid.
    pub fn snap(&self, value: f64) -> f64 {
        if value >= self.max {
            return self.max;
        }
        if value <= self.min {
            return self.min;
        }
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        snapped.min(self.max)
    }

    /// Apply a moved handle without letting the handles cross.
    pub fn move_handle(&self, current: [f64; 2], handle: usize, value: f64) -> [f64; 2] {
        let value = self.snap(value);
        let mut next = current;
        match (handle, self.allow_cross) {
            (0, false) => next[0] = value.min(current[1]),
            (_, false) => next[1] = value.max(current[0]),
            (h, true) => next[h.min(1)] = value,
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub heading: &'static str,
    pub dropdown: DropdownSpec,
    pub slider: RangeSliderSpec,
    /// Chart regions in page order.
    pub regions: [RegionId; 2],
}

impl PageLayout {
    pub fn build(dataset: &LaunchDataset) -> Self {
        Self {
            heading: HEADING,
            dropdown: DropdownSpec {
                id: ControlId::SiteDropdown,
                options: dataset.site_options(),
                initial: SiteSelection::All,
                placeholder: "Select Launch Site",
            },
            slider: RangeSliderSpec::build(dataset),
            regions: [RegionId::SuccessPie, RegionId::PayloadScatter],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn dataset(payloads: &[f64]) -> LaunchDataset {
        LaunchDataset::from_records(
            payloads
                .iter()
                .enumerate()
                .map(|(i, &kg)| LaunchRecord::new(format!("S{}", i % 2), kg, Outcome::Success))
                .collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn slider_bounds_and_marks_follow_payload_extremes() {
        let layout = PageLayout::build(&dataset(&[0.0, 9600.0, 3000.0]));
        let slider = &layout.slider;
        assert_eq!((slider.min, slider.max), (0.0, 9600.0));
        assert_eq!(slider.initial, [0.0, 9600.0]);
        assert_eq!(slider.step, 1000.0);
        assert!(!slider.allow_cross);
        let labels: Vec<&str> = slider.marks.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["0", "4800", "9600"]);
    }

    #[test]
    fn marks_collapse_when_payloads_are_equal() {
        let layout = PageLayout::build(&dataset(&[500.0, 500.0]));
        assert_eq!(layout.slider.marks.len(), 1);
    }

    #[test]
    fn dropdown_starts_on_all_sites() {
        let layout = PageLayout::build(&dataset(&[1.0, 2.0]));
        assert_eq!(layout.heading, "SpaceX Launch Records Dashboard");
        assert_eq!(layout.dropdown.initial, SiteSelection::All);
        assert_eq!(layout.dropdown.options.len(), 3);
        assert_eq!(layout.dropdown.label_for(&SiteSelection::All), "All Sites");
    }

    #[test]
    fn snap_anchors_the_grid_at_min() {
        let layout = PageLayout::build(&dataset(&[250.0, 9600.0]));
        let slider = &layout.slider;
        assert_eq!(slider.snap(1100.0), 1250.0);
        assert_eq!(slider.snap(9500.0), 9250.0);
        assert_eq!(slider.snap(9700.0), 9600.0);
        assert_eq!(slider.snap(-5.0), 250.0);
    }

    #[test]
    fn handles_cannot_cross() {
        let layout = PageLayout::build(&dataset(&[0.0, 9000.0]));
        let slider = &layout.slider;
        assert_eq!(slider.move_handle([0.0, 3000.0], 0, 5000.0), [3000.0, 3000.0]);
        assert_eq!(slider.move_handle([4000.0, 9000.0], 1, 1000.0), [4000.0, 4000.0]);
    }
}
