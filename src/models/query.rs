//! Validated search inputs.

use crate::error::{LocatorError, Result};

use super::place::GeoPoint;

/// Free-text area lookup
#[derive(Debug, Clone, PartialEq)]
pub struct NameQuery {
    pub text: String,
}

/// Reverse lookup of a coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateQuery {
    pub point: GeoPoint,
}

/// What the boundary resolver is asked to find
#[derive(Debug, Clone, PartialEq)]
pub enum AreaQuery {
    Name(NameQuery),
    Coordinates(CoordinateQuery),
}

impl AreaQuery {
    /// Build from loosely typed request fields.
    ///
    /// A full coordinate pair wins over a name; a lone `lat` or `lon` is an
    /// error rather than a silent fallback to the name.
    pub fn from_parts(name: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(AreaQuery::Coordinates(CoordinateQuery {
                point: GeoPoint::new(lat, lon)?,
            })),
            (Some(_), None) | (None, Some(_)) => Err(LocatorError::InvalidQuery(
                "both lat and lon are required for a coordinate search".to_string(),
            )),
            (None, None) => {
                let text = name.map(str::trim).unwrap_or_default();
                if text.is_empty() {
                    return Err(LocatorError::InvalidQuery(
                        "No search criteria provided".to_string(),
                    ));
                }
                Ok(AreaQuery::Name(NameQuery {
                    text: text.to_string(),
                }))
            }
        }
    }
}

/// Tag key/value pair selecting features, e.g. `amenity=restaurant`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    key: String,
    value: String,
}

impl TagFilter {
    /// Both parts are embedded in a quoted Overpass QL string, so quotes,
    /// backslashes and line breaks are rejected.
    pub fn new(key: &str, value: &str) -> Result<Self> {
        let key = key.trim();
        let value = value.trim();

        for (label, part) in [("category", key), ("value", value)] {
            if part.is_empty() {
                return Err(LocatorError::InvalidQuery(format!("{} must not be empty", label)));
            }
            if part.contains(|c: char| matches!(c, '"' | '\\' | '\n' | '\r')) {
                return Err(LocatorError::InvalidQuery(format!(
                    "{} contains forbidden characters: {}",
                    label, part
                )));
            }
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for TagFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_take_precedence() {
        let query = AreaQuery::from_parts(Some("Paris"), Some(48.85), Some(2.35)).unwrap();
        assert_eq!(
            query,
            AreaQuery::Coordinates(CoordinateQuery {
                point: GeoPoint { lat: 48.85, lon: 2.35 }
            })
        );
    }

    #[test]
    fn test_name_is_trimmed() {
        let query = AreaQuery::from_parts(Some("  Lyon "), None, None).unwrap();
        assert_eq!(
            query,
            AreaQuery::Name(NameQuery {
                text: "Lyon".to_string()
            })
        );
    }

    #[test]
    fn test_missing_criteria_rejected() {
        assert!(matches!(
            AreaQuery::from_parts(None, None, None),
            Err(LocatorError::InvalidQuery(_))
        ));
        assert!(matches!(
            AreaQuery::from_parts(Some("   "), None, None),
            Err(LocatorError::InvalidQuery(_))
        ));
        assert!(matches!(
            AreaQuery::from_parts(Some("Lyon"), Some(45.0), None),
            Err(LocatorError::InvalidQuery(_))
        ));
        assert!(AreaQuery::from_parts(None, Some(120.0), Some(0.0)).is_err());
    }

    #[test]
    fn test_tag_filter_validation() {
        let tag = TagFilter::new(" shop ", "bakery").unwrap();
        assert_eq!(tag.key(), "shop");
        assert_eq!(tag.to_string(), "shop=bakery");

        assert!(TagFilter::new("", "bakery").is_err());
        assert!(TagFilter::new("shop", "bak\"ery").is_err());
        assert!(TagFilter::new("shop", "a\\b").is_err());
        assert!(TagFilter::new("shop\n", "x\ny").is_err());
    }
}
