//! Trip list filtering.
//!
//! Each group (months, campsite categories, availability) matches when it is
//! empty or when any of its selections match; a trip is shown when every group
//! matches.

use serde::{Deserialize, Serialize};

use crate::types::Trip;

/// Campsite categories offered as filter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CampsiteCategory {
    FullHookups,
    WaterElectric,
    Primitive,
}

impl CampsiteCategory {
    pub const ALL: [CampsiteCategory; 3] = [
        CampsiteCategory::FullHookups,
        CampsiteCategory::WaterElectric,
        CampsiteCategory::Primitive,
    ];

    /// Lowercase text looked for in a trip's campsite type
    pub fn match_text(&self) -> &'static str {
        match self {
            Self::FullHookups => "full hookups",
            Self::WaterElectric => "water & electric",
            Self::Primitive => "primitive",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Self::FullHookups => "filters.fullHookups",
            Self::WaterElectric => "filters.waterElectric",
            Self::Primitive => "filters.primitive",
        }
    }

    pub fn matches(&self, campsite_type: &str) -> bool {
        campsite_type.to_lowercase().contains(self.match_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    SoldOut,
}

impl Availability {
    pub fn of(trip: &Trip) -> Self {
        if trip.is_available() {
            Self::Available
        } else {
            Self::SoldOut
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripFilter {
    #[serde(default)]
    pub months: Vec<String>,
    #[serde(default)]
    pub campsites: Vec<CampsiteCategory>,
    #[serde(default)]
    pub availability: Vec<Availability>,
}

impl TripFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_month(&mut self, month: &str) {
        toggle(&mut self.months, month.to_string());
    }

    pub fn toggle_campsite(&mut self, category: CampsiteCategory) {
        toggle(&mut self.campsites, category);
    }

    pub fn toggle_availability(&mut self, status: Availability) {
        toggle(&mut self.availability, status);
    }

    pub fn clear(&mut self) {
        self.months.clear();
        self.campsites.clear();
        self.availability.clear();
    }

    /// Number of selections across all groups
    pub fn active_count(&self) -> usize {
        self.months.len() + self.campsites.len() + self.availability.len()
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        let month_ok = self.months.is_empty() || self.months.iter().any(|m| *m == trip.month);
        let campsite_ok = self.campsites.is_empty()
            || self.campsites.iter().any(|c| c.matches(&trip.campsite_type));
        let availability_ok =
            self.availability.is_empty() || self.availability.contains(&Availability::of(trip));

        month_ok && campsite_ok && availability_ok
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|i| *i == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}
