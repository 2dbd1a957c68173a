//! Decoding of the USGS GeoJSON feed into [`Earthquake`] records.
//!
//! Features are decoded one at a time in array order. The first bad feature
//! stops the walk, and the records decoded before it are handed back with
//! the error instead of being thrown away.

use tracing::warn;

use crate::model::{Earthquake, Feature, FeatureCollection};

/// Reasons a feed body produced no (or only some) records.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The body was empty; there was nothing to parse.
    #[error("no data in response")]
    NoData,

    /// The document is not JSON or has no `features` array.
    #[error("malformed feed document: {0}")]
    Document(#[source] serde_json::Error),

    /// Feature `index` is missing a field or has a field of the wrong type.
    #[error("feature {index} is malformed: {source}")]
    Feature {
        index: usize,
        parsed: Vec<Earthquake>,
        source: serde_json::Error,
    },
}

impl ParseError {
    /// Records decoded before the error, in feed order.
    pub fn parsed(&self) -> &[Earthquake] {
        match self {
            ParseError::Feature { parsed, .. } => parsed,
            _ => &[],
        }
    }

    /// Take ownership of the records decoded before the error.
    pub fn into_parsed(self) -> Vec<Earthquake> {
        match self {
            ParseError::Feature { parsed, .. } => parsed,
            _ => Vec::new(),
        }
    }
}

/// Parse a feed body into earthquakes, one per feature, in array order.
///
/// A whitespace-only body is reported as [`ParseError::NoData`], which is
/// distinct from a feed with an empty `features` array (`Ok(vec![])`).
pub fn parse_feed(json: &str) -> Result<Vec<Earthquake>, ParseError> {
    if json.trim().is_empty() {
        return Err(ParseError::NoData);
    }

    let collection: FeatureCollection =
        serde_json::from_str(json).map_err(ParseError::Document)?;

    let mut earthquakes = Vec::with_capacity(collection.features.len());
    for (index, value) in collection.features.into_iter().enumerate() {
        match serde_json::from_value::<Feature>(value) {
            Ok(feature) => earthquakes.push(Earthquake::from(feature.properties)),
            Err(source) => {
                return Err(ParseError::Feature {
                    index,
                    parsed: earthquakes,
                    source,
                });
            }
        }
    }

    Ok(earthquakes)
}

/// Lenient form of [`parse_feed`].
///
/// Returns `None` when there is no data. On any other error the problem is
/// logged and whatever was decoded before it is returned.
pub fn extract_earthquakes(json: &str) -> Option<Vec<Earthquake>> {
    match parse_feed(json) {
        Ok(earthquakes) => Some(earthquakes),
        Err(ParseError::NoData) => None,
        Err(e) => {
            warn!(
                error = %e,
                kept = e.parsed().len(),
                "Problem parsing the earthquake JSON results"
            );
            Some(e.into_parsed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(mag: &str, place: &str, time: i64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"mag":{},"place":"{}","time":{},"url":"https://earthquake.usgs.gov/earthquakes/eventpage/{}"}}}}"#,
            mag, place, time, time
        )
    }

    fn feed(features: &[String]) -> String {
        format!(
            r#"{{"type":"FeatureCollection","metadata":{{"count":{}}},"features":[{}]}}"#,
            features.len(),
            features.join(",")
        )
    }

    #[test]
    fn test_parse_preserves_count_and_order() {
        let body = feed(&[
            feature("7.2", "88km N of Yelizovo, Russia", 3),
            feature("6.1", "94km SW of Paracas, Peru", 2),
            feature("5", "Pacific-Antarctic Ridge", 1),
        ]);

        let quakes = parse_feed(&body).unwrap();

        assert_eq!(quakes.len(), 3);
        assert_eq!(quakes[0].location, "88km N of Yelizovo, Russia");
        assert_eq!(quakes[1].location, "94km SW of Paracas, Peru");
        assert_eq!(quakes[2].location, "Pacific-Antarctic Ridge");
        assert_eq!(quakes[2].magnitude, 5.0);
        assert_eq!(quakes[0].time_in_millis, 3);
        assert!(quakes[0].url.ends_with("/eventpage/3"));
    }

    #[test]
    fn test_parse_empty_features_is_empty_list() {
        let quakes = parse_feed(r#"{"features":[]}"#).unwrap();
        assert!(quakes.is_empty());
    }

    #[test]
    fn test_parse_empty_body_is_no_data() {
        assert!(matches!(parse_feed(""), Err(ParseError::NoData)));
        assert!(matches!(parse_feed("  \n"), Err(ParseError::NoData)));
        assert_eq!(extract_earthquakes(""), None);
    }

    #[test]
    fn test_parse_missing_mag_truncates_at_feature() {
        let body = feed(&[
            feature("6.7", "5km N of Cairo, Egypt", 2),
            r#"{"properties":{"place":"Fiji region","time":1,"url":"u"}}"#.to_string(),
            feature("5.5", "Tonga", 0),
        ]);

        let err = parse_feed(&body).unwrap_err();
        match &err {
            ParseError::Feature { index, parsed, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(parsed.len(), 1);
                assert_eq!(parsed[0].location, "5km N of Cairo, Egypt");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let lenient = extract_earthquakes(&body).unwrap();
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn test_parse_null_place_keeps_walking() {
        let body = feed(&[
            r#"{"properties":{"mag":5.2,"place":null,"time":2,"url":"u"}}"#.to_string(),
            feature("6.0", "Fiji region", 1),
        ]);

        let quakes = parse_feed(&body).unwrap();

        assert_eq!(quakes.len(), 2);
        assert_eq!(quakes[0].location, "");
        assert_eq!(quakes[1].location, "Fiji region");
    }

    #[test]
    fn test_parse_null_mag_is_rejected() {
        let body = feed(&[feature("null", "Somewhere", 1)]);
        let err = parse_feed(&body).unwrap_err();
        assert!(matches!(err, ParseError::Feature { index: 0, .. }));
        assert!(err.parsed().is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_feed("{\"features\": [").unwrap_err();
        assert!(matches!(err, ParseError::Document(_)));
        assert_eq!(extract_earthquakes("{\"features\": ["), Some(vec![]));
    }

    #[test]
    fn test_parse_missing_features_array() {
        let err = parse_feed(r#"{"type":"FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, ParseError::Document(_)));
    }
}
