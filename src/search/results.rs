//! Result list filtering and ordering
//!
//! Search results are narrowed by a feature-tag allow-list (every selected
//! tag must be present) and ordered by one of three sort keys. All sorts are
//! stable, so ties keep their original relative order.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::distance_km;
use crate::models::{Coordinates, ParkingSpace};
use crate::ParkingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Backend order
    #[default]
    Recommended,
    /// Ascending price
    Cheapest,
    /// Ascending distance from the reference point
    Closest,
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SortKey::Recommended => "recommended",
            SortKey::Cheapest => "cheapest",
            SortKey::Closest => "closest",
        };
        f.write_str(label)
    }
}

impl FromStr for SortKey {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recommended" => Ok(SortKey::Recommended),
            "cheapest" => Ok(SortKey::Cheapest),
            "closest" => Ok(SortKey::Closest),
            other => Err(ParkingError::validation(format!("Unknown sort key '{other}'"))),
        }
    }
}

/// Keep spaces carrying every tag in `selected`
#[must_use]
pub fn filter_by_features<'a>(
    spaces: &'a [ParkingSpace],
    selected: &[String],
) -> Vec<&'a ParkingSpace> {
    spaces.iter().filter(|s| s.has_all_features(selected)).collect()
}

/// Stable sort in place. `Closest` without a reference keeps the order.
pub fn sort_spaces(spaces: &mut [&ParkingSpace], key: SortKey, reference: Option<Coordinates>) {
    match (key, reference) {
        (SortKey::Cheapest, _) => {
            spaces.sort_by(|a, b| a.price.total_cmp(&b.price));
        }
        (SortKey::Closest, Some(origin)) => {
            spaces.sort_by(|a, b| {
                let da = distance_km(origin, a.coordinates());
                let db = distance_km(origin, b.coordinates());
                da.total_cmp(&db)
            });
        }
        (SortKey::Closest, None) | (SortKey::Recommended, _) => {}
    }
}

/// Filter then sort, returning a new list; `spaces` is left untouched
#[must_use]
pub fn apply(
    spaces: &[ParkingSpace],
    selected: &[String],
    key: SortKey,
    reference: Option<Coordinates>,
) -> Vec<ParkingSpace> {
    let mut kept = filter_by_features(spaces, selected);
    sort_spaces(&mut kept, key, reference);
    kept.into_iter().cloned().collect()
}

/// Sorted, deduplicated union of all feature tags in `spaces`
#[must_use]
pub fn available_features(spaces: &[ParkingSpace]) -> Vec<String> {
    spaces
        .iter()
        .flat_map(|s| s.features.iter())
        .filter(|f| !f.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sort and filter state of the results list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultView {
    pub sort: SortKey,
    selected: Vec<String>,
}

impl ResultView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Select `tag` if unselected, otherwise deselect it
    pub fn toggle_feature(&mut self, tag: &str) {
        let tag = tag.trim();
        if let Some(pos) = self.selected.iter().position(|f| f == tag) {
            self.selected.remove(pos);
        } else {
            self.selected.push(tag.to_string());
        }
    }

    pub fn clear_filters(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn selected_features(&self) -> &[String] {
        &self.selected
    }

    #[must_use]
    pub fn is_filtering(&self) -> bool {
        !self.selected.is_empty()
    }

    #[must_use]
    pub fn apply(
        &self,
        spaces: &[ParkingSpace],
        reference: Option<Coordinates>,
    ) -> Vec<ParkingSpace> {
        apply(spaces, &self.selected, self.sort, reference)
    }

    /// "3 spaces found", with a note when filters are active
    #[must_use]
    pub fn summary(&self, spaces: &[ParkingSpace]) -> String {
        let count = filter_by_features(spaces, &self.selected).len();
        let noun = if count == 1 { "space" } else { "spaces" };
        if self.is_filtering() {
            format!("{count} {noun} found with selected filters")
        } else {
            format!("{count} {noun} found")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::dataset;
    use rstest::rstest;

    fn spaces(ids: &[&str]) -> Vec<ParkingSpace> {
        ids.iter().map(|id| dataset::find(id).cloned().unwrap()).collect()
    }

    fn ids(spaces: &[ParkingSpace]) -> Vec<&str> {
        spaces.iter().map(|s| s.id.as_str()).collect()
    }

    fn tags(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_filter_requires_all_selected_tags() {
        // 1: 24/7 CCTV, 4: CCTV only, 10: 24/7 only, 18: 24/7 CCTV
        let input = spaces(&["1", "4", "10", "18"]);
        let result = apply(&input, &tags(&["CCTV", "24/7"]), SortKey::Recommended, None);
        assert_eq!(ids(&result), vec!["1", "18"]);
    }

    #[test]
    fn test_empty_selection_keeps_order() {
        let input = spaces(&["7", "2", "15"]);
        let result = apply(&input, &[], SortKey::Recommended, None);
        assert_eq!(result, input);
    }

    #[test]
    fn test_cheapest() {
        // prices 32, 15, 38
        let input = spaces(&["1", "3", "16"]);
        let result = apply(&input, &[], SortKey::Cheapest, None);
        let prices: Vec<f64> = result.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![15.0, 32.0, 38.0]);
        // input untouched
        assert_eq!(ids(&input), vec!["1", "3", "16"]);
    }

    #[test]
    fn test_cheapest_tolerates_nan_price() {
        let mut broken = dataset::find("2").cloned().unwrap();
        broken.price = f64::NAN;
        let mut input = vec![broken];
        input.extend(spaces(&["3", "1"]));
        let result = apply(&input, &[], SortKey::Cheapest, None);
        // NaN orders after every real price
        assert_eq!(ids(&result), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_cheapest_is_stable_on_ties() {
        let mut a = dataset::find("8").cloned().unwrap();
        let mut b = dataset::find("19").cloned().unwrap();
        a.price = 16.0;
        b.price = 16.0;
        let result = apply(&[b.clone(), a.clone()], &[], SortKey::Cheapest, None);
        assert_eq!(ids(&result), vec!["19", "8"]);
    }

    #[rstest]
    #[case(Coordinates::new(51.5301, -0.1151))]
    #[case(Coordinates::new(51.53, -0.115))]
    fn test_closest_ranks_caledonian_first(#[case] reference: Coordinates) {
        let input = dataset::parking_spaces();
        let result = apply(&input, &[], SortKey::Closest, Some(reference));
        assert_eq!(result[0].name, "Caledonian Road Driveway");
    }

    #[test]
    fn test_closest_exact_match_is_zero_distance() {
        let caledonian = dataset::find("5").unwrap();
        assert_eq!(distance_km(caledonian.coordinates(), caledonian.coordinates()), 0.0);
    }

    #[test]
    fn test_closest_without_reference_keeps_order() {
        let input = spaces(&["16", "1", "3"]);
        let result = apply(&input, &[], SortKey::Closest, None);
        assert_eq!(result, input);
    }

    #[test]
    fn test_available_features_sorted_unique() {
        let input = spaces(&["1", "2", "5"]);
        assert_eq!(
            available_features(&input),
            vec!["24/7", "Accessible", "CCTV", "Covered", "EV Charging", "Well Lit"]
        );
    }

    #[rstest]
    #[case("recommended", SortKey::Recommended)]
    #[case("Cheapest", SortKey::Cheapest)]
    #[case(" closest ", SortKey::Closest)]
    fn test_sort_key_parse(#[case] input: &str, #[case] expected: SortKey) {
        assert_eq!(input.parse::<SortKey>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<SortKey>().unwrap(), expected);
    }

    #[test]
    fn test_sort_key_rejects_unknown() {
        assert!("fastest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_result_view_toggle_and_summary() {
        let input = spaces(&["1", "4", "10"]);
        let mut view = ResultView::new();
        assert_eq!(view.summary(&input), "3 spaces found");

        view.toggle_feature("Accessible");
        assert_eq!(view.summary(&input), "2 spaces found with selected filters");
        view.toggle_feature("Covered");
        assert_eq!(view.summary(&input), "1 space found with selected filters");

        view.toggle_feature("Covered");
        assert_eq!(view.selected_features(), &["Accessible".to_string()]);

        view.set_sort(SortKey::Cheapest);
        // 4 (28.50) before 1 (32.00)
        assert_eq!(ids(&view.apply(&input, None)), vec!["4", "1"]);

        view.clear_filters();
        assert!(!view.is_filtering());
    }
}
