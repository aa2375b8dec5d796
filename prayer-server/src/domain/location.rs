//! Where to compute prayer times for.
//!
//! Callers hand over a loosely-filled [`Location`]. It is resolved exactly
//! once, at the boundary, into a [`LocationQuery`] that says which Aladhan
//! lookup to use.

use std::fmt;

use reqwest::Url;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// A location as supplied by a caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Error returned when a location cannot be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Neither coordinates, city and country, nor a city were given
    #[error("incomplete location: provide coordinates, a city and country, or a city")]
    Incomplete,

    /// Coordinates out of range
    #[error("invalid coordinates: latitude {lat}, longitude {lon}")]
    InvalidCoordinates { lat: String, lon: String },

    #[error("cannot build map link: {0}")]
    MapLink(String),
}

/// A resolved lookup, in order of preference.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    CityCountry { city: String, country: String },
    Address(String),
}

impl Location {
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            ..Self::default()
        }
    }

    pub fn city(city: impl Into<String>, country: Option<String>) -> Self {
        Self {
            city: Some(city.into()),
            country,
            ..Self::default()
        }
    }

    /// Pick the lookup to use.
    ///
    /// Coordinates win when both are present; then city with country;
    /// then a bare city, looked up as a free-form address.
    ///
    /// ```
    /// use prayer_server::domain::{Location, LocationQuery};
    ///
    /// let loc = Location::city("Lahore", Some("Pakistan".into()));
    /// assert_eq!(
    ///     loc.resolve().unwrap(),
    ///     LocationQuery::CityCountry { city: "Lahore".into(), country: "Pakistan".into() }
    /// );
    /// assert!(prayer_server::domain::Location::default().resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<LocationQuery, LocationError> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(LocationError::InvalidCoordinates {
                    lat: lat.to_string(),
                    lon: lon.to_string(),
                });
            }
            return Ok(LocationQuery::Coordinates { lat, lon });
        }

        let city = non_blank(self.city.as_deref());
        let country = non_blank(self.country.as_deref());

        match (city, country) {
            (Some(city), Some(country)) => Ok(LocationQuery::CityCountry {
                city: city.to_string(),
                country: country.to_string(),
            }),
            (Some(city), None) => Ok(LocationQuery::Address(city.to_string())),
            _ => Err(LocationError::Incomplete),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl LocationQuery {
    /// Stable key for caching. Coordinates are rounded to 4 decimal
    /// places (about 11 m), well below any change in prayer times.
    pub fn cache_key(&self) -> String {
        match self {
            LocationQuery::Coordinates { lat, lon } => format!("coords:{lat:.4},{lon:.4}"),
            LocationQuery::CityCountry { city, country } => {
                format!("city:{}|{}", city.to_lowercase(), country.to_lowercase())
            }
            LocationQuery::Address(address) => format!("address:{}", address.to_lowercase()),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
            LocationQuery::CityCountry { city, country } => write!(f, "{city}, {country}"),
            LocationQuery::Address(address) => f.write_str(address),
        }
    }
}

/// Google Maps search URL for mosques near a point.
///
/// The coordinates are validated the same way [`Location::resolve`] does.
pub fn nearby_mosques_url(lat: f64, lon: f64) -> Result<Url, LocationError> {
    Location::coordinates(lat, lon).resolve()?;
    let query = format!("mosques near {lat},{lon}");
    Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", query.as_str())])
        .map_err(|e| LocationError::MapLink(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_take_priority() {
        let loc = Location {
            city: Some("Karachi".into()),
            country: Some("Pakistan".into()),
            lat: Some(24.86),
            lon: Some(67.01),
            ..Location::default()
        };
        assert_eq!(
            loc.resolve().unwrap(),
            LocationQuery::Coordinates {
                lat: 24.86,
                lon: 67.01
            }
        );
    }

    #[test]
    fn half_coordinates_fall_back_to_city() {
        let loc = Location {
            city: Some("Leeds".into()),
            lat: Some(53.8),
            ..Location::default()
        };
        assert_eq!(
            loc.resolve().unwrap(),
            LocationQuery::Address("Leeds".into())
        );
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let loc = Location {
            city: Some("  ".into()),
            country: Some("UK".into()),
            region: Some("Yorkshire".into()),
            ..Location::default()
        };
        assert_eq!(loc.resolve(), Err(LocationError::Incomplete));
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let err = Location::coordinates(91.0, 0.0).resolve().unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));
    }

    #[test]
    fn cache_keys_normalize() {
        let a = Location::city("Lahore", Some("Pakistan".into())).resolve().unwrap();
        let b = Location::city("LAHORE", Some("pakistan".into())).resolve().unwrap();
        assert_eq!(a.cache_key(), b.cache_key());

        let c = Location::coordinates(31.52041, 74.35871).resolve().unwrap();
        assert_eq!(c.cache_key(), "coords:31.5204,74.3587");
    }

    #[test]
    fn mosques_url() {
        let url = nearby_mosques_url(31.5, 74.35).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/search/?api=1&query=mosques+near+31.5%2C74.35"
        );
        assert_eq!(
            url.query_pairs().find(|(k, _)| k == "query").map(|(_, v)| v.into_owned()),
            Some("mosques near 31.5,74.35".to_string())
        );
    }

    #[test]
    fn mosques_url_rejects_bad_coordinates() {
        assert!(matches!(
            nearby_mosques_url(-91.0, 10.0),
            Err(LocationError::InvalidCoordinates { .. })
        ));
        assert!(nearby_mosques_url(f64::NAN, 10.0).is_err());
    }
}
