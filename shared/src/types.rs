//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates in WGS84 degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// GeoJSON-ordered coordinate pair (`[lng, lat]`)
    pub fn lng_lat(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

/// Structural census of a farm subtree, one counter per hierarchy level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructureCounts {
    #[serde(rename = "fincas")]
    pub farms: u64,
    #[serde(rename = "lotes")]
    pub lots: u64,
    #[serde(rename = "cultivos")]
    pub crops: u64,
    #[serde(rename = "arboles")]
    pub trees: u64,
    #[serde(rename = "frutos")]
    pub fruits: u64,
}

/// Records dropped during assembly because no parent could be resolved.
///
/// These are expected data-quality conditions in field data, surfaced as
/// counts rather than errors so consumers can render partial results.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnassignedCounts {
    #[serde(rename = "lotes")]
    pub lots: u64,
    #[serde(rename = "cultivos")]
    pub crops: u64,
    #[serde(rename = "arboles")]
    pub trees: u64,
}

impl UnassignedCounts {
    pub fn is_empty(&self) -> bool {
        self.lots == 0 && self.crops == 0 && self.trees == 0
    }
}
