//! Trip catalog loading.
//!
//! The catalog is a TOML document with `[[trips]]`, `[[packages]]` and
//! `[[contacts]]` tables. A copy ships with the crate; `trips.catalog_path`
//! in the config points at a replacement.

use std::collections::HashSet;
use std::path::Path;

use basecamp_core::TripsConfig;
use basecamp_weather::dates::month_number;
use serde::{Deserialize, Serialize};

use crate::error::TripError;
use crate::filter::TripFilter;
use crate::types::{Package, Trip, WhatsAppContact};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
}

impl Catalog {
    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, TripError> {
        Self::parse(BUILTIN_CATALOG)
    }

    pub fn parse(contents: &str) -> Result<Self, TripError> {
        let catalog: Catalog = toml::from_str(contents)?;
        catalog.check_ids()?;
        Ok(catalog)
    }

    pub fn load_from(path: &Path) -> Result<Self, TripError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TripError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&contents)?;
        tracing::info!(
            "Loaded {} trips from {}",
            catalog.trips.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Configured catalog file, or the built-in one
    pub fn load(config: &TripsConfig) -> Result<Self, TripError> {
        match &config.catalog_path {
            Some(path) => Self::load_from(path),
            None => Self::builtin(),
        }
    }

    fn check_ids(&self) -> Result<(), TripError> {
        let mut seen = HashSet::new();
        for trip in &self.trips {
            if !seen.insert(trip.id.as_str()) {
                return Err(TripError::DuplicateId(trip.id.clone()));
            }
            if month_number(&trip.month).is_none() {
                tracing::warn!("Trip {} has unrecognised month {:?}", trip.id, trip.month);
            }
        }
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Result<&Trip, TripError> {
        self.trips
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TripError::UnknownTrip(id.to_string()))
    }

    /// Months that have at least one trip, January first
    pub fn months_with_trips(&self) -> Vec<&str> {
        let mut months: Vec<(u32, &str)> = self
            .trips
            .iter()
            .filter_map(|t| month_number(&t.month).map(|n| (n, t.month.as_str())))
            .collect();
        months.sort_by_key(|(n, _)| *n);
        months.dedup_by_key(|(n, _)| *n);
        months.into_iter().map(|(_, name)| name).collect()
    }

    /// Trips in a month, catalog order
    pub fn trips_in_month<'a>(&'a self, month: &'a str) -> impl Iterator<Item = &'a Trip> + 'a {
        self.trips.iter().filter(move |t| t.month == month)
    }

    pub fn filtered(&self, filter: &TripFilter) -> Vec<&Trip> {
        self.trips.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn featured_package(&self) -> Option<&Package> {
        self.packages.iter().find(|p| p.is_featured)
    }
}
