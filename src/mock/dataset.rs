//! Fixed set of London parking spaces backing the mock search service

use std::sync::LazyLock;

use crate::geo::geojson::{DEFAULT_COLLECTION_NAME, FeatureCollection, to_feature_collection};
use crate::models::{Coordinates, ParkingSpace};

static PARKING_SPACES: LazyLock<Vec<ParkingSpace>> = LazyLock::new(|| {
    vec![
        space(
            "1",
            "King's Cross Station Car Park",
            "Euston Road, King's Cross, London, N1 9AL",
            32.0,
            51.5301,
            -0.1239,
            &["24/7", "CCTV", "Covered", "Accessible"],
        ),
        space(
            "2",
            "Angel Central Car Park",
            "21 Parkfield Street, Islington, London, N1 0PS",
            25.0,
            51.5327,
            -0.1059,
            &["EV Charging", "Covered", "24/7", "CCTV"],
        ),
        space(
            "3",
            "Upper Street Parking",
            "45 Upper Street, Islington, London, N1 0PN",
            15.0,
            51.5416,
            -0.1031,
            &["24/7", "CCTV", "Well Lit"],
        ),
        space(
            "4",
            "Old Street Station Car Park",
            "1 Old Street, London, EC1V 9HL",
            28.5,
            51.5255,
            -0.0879,
            &["CCTV", "Well Lit", "Accessible"],
        ),
        space(
            "5",
            "Caledonian Road Driveway",
            "12 Caledonian Road, London, N1 9DU",
            18.0,
            51.5301,
            -0.1151,
            &["CCTV", "Well Lit"],
        ),
        space(
            "6",
            "City Road Secure Parking",
            "100 City Road, London, EC1Y 2BJ",
            22.0,
            51.5252,
            -0.0876,
            &["24/7", "CCTV", "Covered"],
        ),
        space(
            "7",
            "Finsbury Park Car Park",
            "Finsbury Park Station, Station Place, London, N4 2DH",
            19.5,
            51.5643,
            -0.1065,
            &["CCTV", "Well Lit", "24/7"],
        ),
        space(
            "8",
            "Highbury Corner Parking",
            "Highbury Corner, London, N5 1RD",
            16.0,
            51.5479,
            -0.0991,
            &["CCTV", "Accessible"],
        ),
        space(
            "9",
            "Holloway Road Premium Parking",
            "305 Holloway Road, London, N7 8DQ",
            20.0,
            51.5559,
            -0.1153,
            &["EV Charging", "CCTV", "Covered"],
        ),
        space(
            "10",
            "Essex Road Station Parking",
            "Essex Road, London, N1 2SX",
            17.5,
            51.5399,
            -0.1041,
            &["24/7", "Well Lit"],
        ),
        space(
            "11",
            "Farringdon Station Car Park",
            "Cowcross Street, London, EC1M 6BY",
            35.0,
            51.5203,
            -0.1053,
            &["24/7", "CCTV", "Covered", "EV Charging"],
        ),
        space(
            "12",
            "Clerkenwell Secure Parking",
            "30 Clerkenwell Road, London, EC1M 5PS",
            26.0,
            51.5227,
            -0.1048,
            &["CCTV", "Covered", "Accessible"],
        ),
        space(
            "13",
            "Shoreditch High Street Parking",
            "Shoreditch High Street, London, E1 6JE",
            24.0,
            51.5234,
            -0.0753,
            &["24/7", "CCTV", "Well Lit"],
        ),
        space(
            "14",
            "Barbican Car Park",
            "Silk Street, London, EC2Y 8DS",
            30.0,
            51.5202,
            -0.0937,
            &["24/7", "Covered", "CCTV", "Accessible"],
        ),
        space(
            "15",
            "Moorgate Station Parking",
            "Moorgate, London, EC2M 6TX",
            33.0,
            51.5186,
            -0.0886,
            &["24/7", "CCTV", "EV Charging"],
        ),
        space(
            "16",
            "Liverpool Street Car Park",
            "Liverpool Street, London, EC2M 7QN",
            38.0,
            51.5179,
            -0.0823,
            &["24/7", "Covered", "CCTV", "EV Charging", "Accessible"],
        ),
        space(
            "17",
            "Bethnal Green Parking",
            "Cambridge Heath Road, London, E2 9PA",
            14.0,
            51.5273,
            -0.0559,
            &["CCTV", "Well Lit"],
        ),
        space(
            "18",
            "Hoxton Square Parking",
            "Hoxton Square, London, N1 6NU",
            21.0,
            51.5280,
            -0.0825,
            &["24/7", "CCTV"],
        ),
        space(
            "19",
            "Dalston Junction Parking",
            "Dalston Lane, London, E8 3DF",
            16.5,
            51.5461,
            -0.0750,
            &["CCTV", "Well Lit", "Accessible"],
        ),
        space(
            "20",
            "Canonbury Station Parking",
            "Canonbury Road, London, N1 2DG",
            18.5,
            51.5483,
            -0.0891,
            &["24/7", "CCTV"],
        ),
    ]
});

fn space(
    id: &str,
    name: &str,
    address: &str,
    price: f64,
    lat: f64,
    lng: f64,
    features: &[&str],
) -> ParkingSpace {
    ParkingSpace::new(id, name, address, price, Coordinates::new(lat, lng), features)
}

/// All dataset entries, in id order
#[must_use]
pub fn parking_spaces() -> Vec<ParkingSpace> {
    PARKING_SPACES.clone()
}

/// Borrowed view of the dataset
#[must_use]
pub fn all() -> &'static [ParkingSpace] {
    &PARKING_SPACES
}

#[must_use]
pub fn find(id: &str) -> Option<&'static ParkingSpace> {
    PARKING_SPACES.iter().find(|space| space.id == id)
}

/// The dataset as a GeoJSON collection, as drawn on the "all spaces" layer
#[must_use]
pub fn feature_collection() -> FeatureCollection {
    to_feature_collection(&PARKING_SPACES, DEFAULT_COLLECTION_NAME)
}
