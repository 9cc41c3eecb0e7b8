//! Geographic coordinates as handed to the provider.
//!
//! The provider expects decimal strings, so the original textual form is
//! preserved rather than round-tripping through `f64`.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinatesError {
    #[error("{field} \"{value}\" is not a decimal number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    latitude: String,
    longitude: String,
}

impl Coordinates {
    /// Validates and builds a coordinate pair from decimal strings.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] if either value does not parse as a
    /// number or lies outside the valid latitude/longitude range.
    pub fn new(latitude: &str, longitude: &str) -> Result<Self, CoordinatesError> {
        let latitude = latitude.trim();
        let longitude = longitude.trim();
        check_range("latitude", latitude, 90.0)?;
        check_range("longitude", longitude, 180.0)?;
        Ok(Self {
            latitude: latitude.to_owned(),
            longitude: longitude.to_owned(),
        })
    }

    #[must_use]
    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> &str {
        &self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

fn check_range(field: &'static str, raw: &str, bound: f64) -> Result<(), CoordinatesError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| CoordinatesError::NotANumber {
            field,
            value: raw.to_owned(),
        })?;
    // NaN fails both comparisons, so reject it explicitly.
    if value.is_nan() || value < -bound || value > bound {
        return Err(CoordinatesError::OutOfRange {
            field,
            value,
            min: -bound,
            max: bound,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_pair_and_keeps_text() {
        let coords = Coordinates::new("40.7128", "-74.0060").unwrap();
        assert_eq!(coords.latitude(), "40.7128");
        assert_eq!(coords.longitude(), "-74.0060");
        assert_eq!(coords.to_string(), "40.7128,-74.0060");
    }

    #[test]
    fn trims_whitespace() {
        let coords = Coordinates::new(" 19.07 ", "72.87\n").unwrap();
        assert_eq!(coords.latitude(), "19.07");
        assert_eq!(coords.longitude(), "72.87");
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinates::new("90", "180").is_ok());
        assert!(Coordinates::new("-90", "-180").is_ok());
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        let err = Coordinates::new("90.0001", "0").unwrap_err();
        assert!(
            matches!(err, CoordinatesError::OutOfRange { field: "latitude", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_longitude_out_of_range() {
        let err = Coordinates::new("0", "-180.5").unwrap_err();
        assert!(matches!(
            err,
            CoordinatesError::OutOfRange {
                field: "longitude",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = Coordinates::new("north", "0").unwrap_err();
        assert_eq!(
            err,
            CoordinatesError::NotANumber {
                field: "latitude",
                value: "north".to_owned()
            }
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(Coordinates::new("NaN", "0").is_err());
    }

    #[test]
    fn serializes_as_named_fields() {
        let coords = Coordinates::new("1.5", "2.5").unwrap();
        let json = serde_json::to_value(&coords).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": "1.5", "longitude": "2.5"}));
    }
}
