use std::path::PathBuf;
use thiserror::Error;

/// Problems with a single feature, ring or vertex of an otherwise usable document.
/// These are logged and the offending element is skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("document is not a FeatureCollection")]
    NotFeatureCollection,

    #[error("feature {feature} has no geometry")]
    MissingGeometry { feature: usize },

    #[error("feature {feature} has unsupported geometry type {kind}")]
    UnsupportedGeometry { feature: usize, kind: &'static str },

    #[error("feature {feature} polygon {polygon} ring {ring}: position {point} has fewer than 2 values")]
    MalformedPosition {
        feature: usize,
        polygon: usize,
        ring: usize,
        point: usize,
    },

    #[error("feature {feature} polygon {polygon} ring {ring}: only {distinct} distinct points")]
    DegenerateRing {
        feature: usize,
        polygon: usize,
        ring: usize,
        distinct: usize,
    },

    #[error("non-finite projection of ({lat}, {lng}) at radius {radius}")]
    NonFiniteVertex { lat: f64, lng: f64, radius: f64 },

    #[error("unknown meshMethod {0:?}")]
    UnknownMeshMethod(String),
}

/// Failure to retrieve or parse a country's boundary document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },

    #[error("{path} is not usable GeoJSON: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: InputError,
    },

    #[error("no data for country {0:?}")]
    UnknownCountry(String),
}
