//! Headless map presentation model
//!
//! Tracks the camera, which points are displayed, and the selected point.
//! Rendering is left to whatever front end consumes [`MapView`].

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::MapConfig;
use crate::format::{format_display_datetime, format_price};
use crate::models::{Coordinates, ParkingSpace};

/// Degrees of latitude between a marker and its price label
const LABEL_OFFSET: f64 = 0.00015;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
    /// Animation length of the last camera move, if it was animated
    pub transition: Option<Duration>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            longitude: -0.1151,
            latitude: 51.5301,
            zoom: 14.0,
            bearing: 10.0,
            pitch: 40.0,
            transition: None,
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A space as drawn on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub space: ParkingSpace,
    pub is_search_result: bool,
}

impl MapPoint {
    /// `[lng, lat]` marker position
    #[must_use]
    pub fn position(&self) -> [f64; 2] {
        self.space.coordinates().to_position()
    }

    #[must_use]
    pub fn label_position(&self) -> [f64; 2] {
        let [lng, lat] = self.position();
        [lng, lat + LABEL_OFFSET]
    }

    #[must_use]
    pub fn price_label(&self) -> String {
        price_label(self.space.price)
    }
}

#[must_use]
pub fn price_label(price: f64) -> String {
    format_price(price)
}

/// Hover text: name on the first line, address on the second
#[must_use]
pub fn tooltip(point: &MapPoint) -> String {
    let name = if point.space.name.is_empty() {
        "Unknown"
    } else {
        point.space.name.as_str()
    };
    format!("{name}\n{}", point.space.address)
}

#[derive(Debug, Clone)]
pub struct MapView {
    view: ViewState,
    show_all_spaces: bool,
    all_spaces: Vec<ParkingSpace>,
    search_results: Vec<ParkingSpace>,
    selected: Option<MapPoint>,
    style_url: String,
    street_view_base_url: String,
    street_view_api_key: Option<String>,
    display_timezone: Tz,
}

impl MapView {
    /// Map over `all_spaces` with the "all spaces" layer switched on
    #[must_use]
    pub fn new(config: &MapConfig, all_spaces: Vec<ParkingSpace>) -> Self {
        let display_timezone = config.timezone().unwrap_or_else(|e| {
            warn!("{}, falling back to Europe/London", e);
            chrono_tz::Europe::London
        });
        Self {
            view: ViewState::default(),
            show_all_spaces: true,
            all_spaces,
            search_results: Vec::new(),
            selected: None,
            style_url: config.style_request_url(),
            street_view_base_url: config.street_view_base_url.clone(),
            street_view_api_key: config.street_view_api_key.clone(),
            display_timezone,
        }
    }

    #[must_use]
    pub fn display_timezone(&self) -> Tz {
        self.display_timezone
    }

    /// "Today at 14:24" style label in the configured timezone
    #[must_use]
    pub fn format_time(&self, date_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
        format_display_datetime(date_time, now, &self.display_timezone)
    }

    /// Tile style document for the base map
    #[must_use]
    pub fn style_url(&self) -> &str {
        &self.style_url
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Replace the camera, e.g. after the user pans or zooms
    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    #[must_use]
    pub fn show_all_spaces(&self) -> bool {
        self.show_all_spaces
    }

    pub fn set_show_all_spaces(&mut self, show: bool) {
        self.show_all_spaces = show;
    }

    pub fn toggle_all_spaces(&mut self) {
        self.show_all_spaces = !self.show_all_spaces;
    }

    #[must_use]
    pub fn search_results(&self) -> &[ParkingSpace] {
        &self.search_results
    }

    /// Points to draw. Search results come first; with "all spaces" on the
    /// rest of the dataset follows, minus anything already in the results.
    #[must_use]
    pub fn display_points(&self) -> Vec<MapPoint> {
        let results = self.search_results.iter().map(|space| MapPoint {
            space: space.clone(),
            is_search_result: true,
        });

        if !self.show_all_spaces {
            return results.collect();
        }

        let result_ids: HashSet<&str> = self.search_results.iter().map(|s| s.id.as_str()).collect();
        let rest = self
            .all_spaces
            .iter()
            .filter(|s| !result_ids.contains(s.id.as_str()))
            .map(|space| MapPoint {
                space: space.clone(),
                is_search_result: false,
            });
        results.chain(rest).collect()
    }

    /// Show a new result set and fly to its first entry. An empty set
    /// resets the search layer and leaves the camera alone.
    pub fn on_search_results(&mut self, results: &[ParkingSpace]) {
        let Some(first) = results.first() else {
            self.search_results.clear();
            return;
        };

        debug!("Showing {} search results on map", results.len());
        self.view = ViewState {
            longitude: first.lng,
            latitude: first.lat,
            zoom: 14.0,
            transition: Some(Duration::from_millis(1000)),
            ..self.view
        };
        self.search_results = results.to_vec();
        self.show_all_spaces = false;
    }

    pub fn on_search_cleared(&mut self) {
        self.search_results.clear();
        self.show_all_spaces = true;
    }

    /// Zoom in on a space picked from the result list
    pub fn fly_to_space(&mut self, space: &ParkingSpace) {
        self.view = ViewState {
            longitude: space.lng,
            latitude: space.lat,
            zoom: 16.0,
            pitch: 45.0,
            transition: Some(Duration::from_millis(1000)),
            ..self.view
        };
    }

    pub fn fly_to(&mut self, longitude: f64, latitude: f64) {
        self.view = ViewState {
            longitude,
            latitude,
            zoom: 16.0,
            pitch: 45.0,
            bearing: 10.0,
            transition: Some(Duration::from_millis(1500)),
        };
    }

    pub fn select(&mut self, point: MapPoint) {
        debug!("Selected space {}", point.space.id);
        self.selected = Some(point);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&MapPoint> {
        self.selected.as_ref()
    }

    /// Static street-level image of the point
    #[must_use]
    pub fn street_view_url(&self, point: &MapPoint) -> String {
        let [lng, lat] = point.position();
        let mut url = format!(
            "{}?size=400x300&location={lat},{lng}&fov=90&heading=235&pitch=10",
            self.street_view_base_url
        );
        if let Some(key) = &self.street_view_api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::dataset;
    use chrono::TimeZone;

    fn map() -> MapView {
        MapView::new(&MapConfig::default(), dataset::parking_spaces())
    }

    fn spaces(ids: &[&str]) -> Vec<ParkingSpace> {
        ids.iter().map(|id| dataset::find(id).cloned().unwrap()).collect()
    }

    #[test]
    fn test_initial_camera() {
        let view = *map().view_state();
        assert_eq!(view.center(), Coordinates::new(51.5301, -0.1151));
        assert_eq!(view.zoom, 14.0);
        assert_eq!(view.bearing, 10.0);
        assert_eq!(view.pitch, 40.0);
    }

    #[test]
    fn test_display_all_spaces_without_results() {
        let points = map().display_points();
        assert_eq!(points.len(), 20);
        assert!(points.iter().all(|p| !p.is_search_result));
    }

    #[test]
    fn test_display_merges_results_first_without_duplicates() {
        let mut map = map();
        map.on_search_results(&spaces(&["7", "2"]));
        map.set_show_all_spaces(true);

        let points = map.display_points();
        assert_eq!(points.len(), 20);
        assert_eq!(points[0].space.id, "7");
        assert_eq!(points[1].space.id, "2");
        assert!(points[0].is_search_result && points[1].is_search_result);
        assert!(points[2..].iter().all(|p| !p.is_search_result));
        let ids: HashSet<&str> = points.iter().map(|p| p.space.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_results_only_when_all_spaces_off() {
        let mut map = map();
        map.on_search_results(&spaces(&["3", "9", "12"]));
        assert!(!map.show_all_spaces());
        let ids: Vec<String> = map.display_points().into_iter().map(|p| p.space.id).collect();
        assert_eq!(ids, vec!["3", "9", "12"]);
    }

    #[test]
    fn test_results_fly_to_first() {
        let mut map = map();
        map.on_search_results(&spaces(&["16", "1"]));
        let view = map.view_state();
        assert_eq!((view.longitude, view.latitude), (-0.0823, 51.5179));
        assert_eq!(view.zoom, 14.0);
        assert_eq!(view.pitch, 40.0);
    }

    #[test]
    fn test_empty_results_reset_layer() {
        let mut map = map();
        map.on_search_results(&spaces(&["1"]));
        let camera = *map.view_state();
        map.on_search_results(&[]);
        assert!(map.search_results().is_empty());
        assert_eq!(*map.view_state(), camera);
    }

    #[test]
    fn test_clear_restores_all_spaces() {
        let mut map = map();
        map.on_search_results(&spaces(&["1"]));
        map.on_search_cleared();
        assert!(map.show_all_spaces());
        assert_eq!(map.display_points().len(), 20);
    }

    #[test]
    fn test_fly_to_variants() {
        let mut map = map();
        map.set_view_state(ViewState {
            bearing: 90.0,
            ..ViewState::default()
        });

        map.fly_to_space(&spaces(&["4"])[0]);
        let view = *map.view_state();
        assert_eq!((view.zoom, view.pitch, view.bearing), (16.0, 45.0, 90.0));

        map.fly_to(-0.1, 51.5);
        let view = *map.view_state();
        assert_eq!((view.longitude, view.latitude), (-0.1, 51.5));
        assert_eq!((view.zoom, view.pitch, view.bearing), (16.0, 45.0, 10.0));
    }

    #[test]
    fn test_selection() {
        let mut map = map();
        let point = map.display_points().remove(0);
        map.select(point.clone());
        assert_eq!(map.selected(), Some(&point));
        map.clear_selection();
        assert!(map.selected().is_none());
    }

    #[test]
    fn test_labels_and_tooltip() {
        let point = MapPoint {
            space: dataset::find("1").cloned().unwrap(),
            is_search_result: false,
        };
        assert_eq!(point.price_label(), "£32.00");
        assert_eq!(price_label(16.5), "£16.50");
        assert_eq!(
            tooltip(&point),
            "King's Cross Station Car Park\nEuston Road, King's Cross, London, N1 9AL"
        );
        let [lng, lat] = point.label_position();
        assert_eq!(lng, -0.1239);
        assert!(lat > 51.5301);
    }

    #[test]
    fn test_times_use_configured_timezone() {
        let now = Utc.with_ymd_and_hms(2025, 10, 23, 10, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 10, 23, 13, 24, 0).unwrap();
        assert_eq!(map().format_time(at, now), "Today at 14:24");

        let config = MapConfig {
            display_timezone: "America/New_York".to_string(),
            ..MapConfig::default()
        };
        let map = MapView::new(&config, Vec::new());
        assert_eq!(map.display_timezone(), chrono_tz::America::New_York);
        assert_eq!(map.format_time(at, now), "Today at 09:24");
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_london() {
        let config = MapConfig {
            display_timezone: "Nowhere/Special".to_string(),
            ..MapConfig::default()
        };
        let map = MapView::new(&config, Vec::new());
        assert_eq!(map.display_timezone(), chrono_tz::Europe::London);
    }

    #[test]
    fn test_street_view_url() {
        let config = MapConfig {
            street_view_api_key: Some("a b".to_string()),
            ..MapConfig::default()
        };
        let map = MapView::new(&config, Vec::new());
        assert_eq!(map.style_url(), "https://api.maptiler.com/maps/streets-v2/style.json");
        let point = MapPoint {
            space: dataset::find("5").cloned().unwrap(),
            is_search_result: true,
        };
        assert_eq!(
            map.street_view_url(&point),
            concat!(
                "https://maps.googleapis.com/maps/api/streetview",
                "?size=400x300&location=51.5301,-0.1151&fov=90&heading=235&pitch=10&key=a%20b"
            )
        );
    }
}
