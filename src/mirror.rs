use std::collections::{BTreeMap, HashMap};

use crate::api::FormMirror;
use crate::entities::Coordinates;
use crate::error::{invalid_input_error, Error};

const FIELD_PREFIX: &str = "marker_";

pub fn field_name(index: usize) -> String {
    format!("{}{}", FIELD_PREFIX, index)
}

/// In-memory mirror holding the fields as they would be submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap {
    fields: BTreeMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(&field_name(index)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FormMirror for FieldMap {
    fn write(&mut self, index: usize, value: &str) {
        self.fields.insert(field_name(index), value.into());
    }

    fn remove(&mut self, index: usize) {
        self.fields.remove(&field_name(index));
    }
}

/// Reads `marker_0`, `marker_1`, ... until the first missing or empty field.
/// A field that does not hold a valid coordinate fails the whole form.
#[tracing::instrument(skip(form))]
pub fn parse_waypoints(form: &HashMap<String, String>) -> Result<Vec<Coordinates>, Error> {
    let mut waypoints = vec![];

    for index in 0.. {
        let value = match form.get(&field_name(index)) {
            Some(value) if !value.trim().is_empty() => value,
            _ => break,
        };

        let coordinates = value.parse::<Coordinates>().map_err(|_| {
            tracing::warn!("malformed waypoint field {}", field_name(index));
            invalid_input_error()
        })?;

        waypoints.push(coordinates);
    }

    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn field_map_creates_then_updates() {
        let mut fields = FieldMap::new();
        fields.write(0, "(1, 2)");
        fields.write(0, "(3, 4)");
        fields.write(1, "(5, 6)");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(0), Some("(3, 4)"));

        fields.remove(1);
        assert_eq!(fields.get(1), None);
    }

    #[test]
    fn parses_in_index_order() {
        let form = form(&[
            ("marker_1", "(52.3, 21.1)"),
            ("marker_0", "(52.2, 21.0)"),
            ("title", "ride"),
        ]);

        let waypoints = parse_waypoints(&form).unwrap();
        assert_eq!(
            waypoints,
            vec![
                Coordinates::new(52.2, 21.0).unwrap(),
                Coordinates::new(52.3, 21.1).unwrap()
            ]
        );
    }

    #[test]
    fn stops_at_first_gap_or_empty_value() {
        let gap = form(&[("marker_0", "(1, 1)"), ("marker_2", "(3, 3)")]);
        assert_eq!(parse_waypoints(&gap).unwrap().len(), 1);

        let empty = form(&[("marker_0", "(1, 1)"), ("marker_1", ""), ("marker_2", "(3, 3)")]);
        assert_eq!(parse_waypoints(&empty).unwrap().len(), 1);

        assert!(parse_waypoints(&HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn malformed_marker_fails_the_form() {
        let form = form(&[("marker_0", "(1, 1)"), ("marker_1", "somewhere")]);
        assert_eq!(parse_waypoints(&form).unwrap_err().code, 101);
    }

    #[test]
    fn field_map_round_trips_through_the_form() {
        let mut fields = FieldMap::new();
        fields.write(0, &Coordinates::new(50.06, 19.94).unwrap().to_string());
        fields.write(1, &Coordinates::new(50.05, 19.93).unwrap().to_string());

        let submitted: HashMap<String, String> = (0..fields.len())
            .filter_map(|i| Some((field_name(i), fields.get(i)?.to_string())))
            .collect();

        let waypoints = parse_waypoints(&submitted).unwrap();
        assert_eq!(waypoints[1], Coordinates::new(50.05, 19.93).unwrap());
    }
}
