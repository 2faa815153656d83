//! Per-trip weather cache.
//!
//! Entries live for the whole process and are never replaced: the first
//! successful resolution for a trip id wins. Lookups are by trip id only, so a
//! trip whose dates or location change mid-session keeps its old weather.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::{EventWeatherRequest, WeatherData};

#[derive(Debug, Clone)]
struct CacheEntry {
    request: EventWeatherRequest,
    data: WeatherData,
}

#[derive(Debug, Default)]
pub struct WeatherCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached weather for the request's trip id, if any.
    pub fn get(&self, request: &EventWeatherRequest) -> Option<WeatherData> {
        let entries = self.entries.read();
        let entry = entries.get(&request.event_id)?;

        if !entry.request.same_inputs(request) {
            tracing::warn!(
                "Serving cached weather for {} resolved from different inputs ({} {} -> {} {})",
                request.event_id,
                entry.request.month,
                entry.request.dates,
                request.month,
                request.dates
            );
        } else {
            tracing::debug!("Weather cache hit for {}", request.event_id);
        }

        Some(entry.data.clone())
    }

    /// Store a result unless the trip already has one. Returns whichever
    /// result is cached afterwards.
    pub fn insert(&self, request: &EventWeatherRequest, data: WeatherData) -> WeatherData {
        let mut entries = self.entries.write();
        let entry = entries
            .entry(request.event_id.clone())
            .or_insert_with(|| {
                tracing::info!(
                    "Cached {} weather for {} ({} days)",
                    data.kind,
                    request.event_id,
                    data.days.len()
                );
                CacheEntry {
                    request: request.clone(),
                    data,
                }
            });
        entry.data.clone()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.entries.read().contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, WeatherKind};

    fn request(id: &str, dates: &str) -> EventWeatherRequest {
        EventWeatherRequest::new(id, Coordinates::new(30.04, -97.16), "February", dates)
    }

    fn data(kind: WeatherKind) -> WeatherData {
        WeatherData { kind, days: vec![] }
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = WeatherCache::new();
        let req = request("buescher-feb", "20-22");

        assert!(cache.get(&req).is_none());
        cache.insert(&req, data(WeatherKind::Historical));

        assert_eq!(cache.get(&req), Some(data(WeatherKind::Historical)));
        assert!(cache.contains("buescher-feb"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = WeatherCache::new();
        let req = request("buescher-feb", "20-22");

        cache.insert(&req, data(WeatherKind::Historical));
        let kept = cache.insert(&req, data(WeatherKind::Forecast));

        assert_eq!(kept.kind, WeatherKind::Historical);
        assert_eq!(cache.get(&req).map(|d| d.kind), Some(WeatherKind::Historical));
    }

    #[test]
    fn test_changed_inputs_still_hit() {
        let cache = WeatherCache::new();
        cache.insert(&request("buescher-feb", "20-22"), data(WeatherKind::Historical));

        let moved = request("buescher-feb", "27-29");
        assert_eq!(cache.get(&moved).map(|d| d.kind), Some(WeatherKind::Historical));
    }

    #[test]
    fn test_empty() {
        let cache = WeatherCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains("anything"));
    }
}
