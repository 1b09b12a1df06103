use std::fmt;
use std::str::FromStr;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        let coordinates = Self {
            latitude,
            longitude,
        };

        if !coordinates.is_valid() {
            return Err(invalid_input_error());
        }

        Ok(coordinates)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `lat,lng` as the directions web API expects it.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Same text as `LatLng.toString()` in the browser map SDK, which is what ends
/// up in the hidden form fields.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let inner = s
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .or_else(|| s.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
            .ok_or_else(invalid_input_error)?;

        let mut parts = inner.split(',');

        let (latitude, longitude) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()),
            _ => return Err(invalid_input_error()),
        };

        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => Coordinates::new(latitude, longitude),
            _ => Err(invalid_input_error()),
        }
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn displays_like_the_map_sdk() {
        let c = Coordinates::new(52.2297, 21.0122).unwrap();
        assert_eq!(c.to_string(), "(52.2297, 21.0122)");
        assert_eq!(c.to_query(), "52.2297,21.0122");
    }

    #[test]
    fn parses_tuple_and_list_forms() {
        let c: Coordinates = "(52.2297, 21.0122)".parse().unwrap();
        assert_eq!(c, Coordinates::new(52.2297, 21.0122).unwrap());

        let c: Coordinates = " [-33.5,151] ".parse().unwrap();
        assert_eq!(c, Coordinates::new(-33.5, 151.0).unwrap());
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "52.1, 21.0", "(52.1)", "(a, b)", "(1, 2, 3)", "(95, 0)", "(1, 2]"] {
            assert!(text.parse::<Coordinates>().is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn converts_to_geo_coord_as_lng_lat() {
        let coord: Coord<f64> = Coordinates::new(10.0, 20.0).unwrap().into();
        assert_eq!(coord, Coord { x: 20.0, y: 10.0 });
    }
}
