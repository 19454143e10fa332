//! Plaintext share payload
//!
//! `ShareableData` is the snapshot of a pilot's airfields and flights that
//! gets encrypted into a share. It is produced on the client and is never
//! persisted unencrypted by the store.

mod airfield;
mod flight;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use airfield::Airfield;
pub use flight::{FlightTrace, TrackPoint};

use crate::crypto::{self, CryptoError, ShareKey};

/// Current payload format version
pub const SHAREABLE_DATA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMetadata {
    pub created_at: DateTime<Utc>,
    pub airfield_count: usize,
    pub flight_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableData {
    pub version: u32,
    #[serde(default)]
    pub airfields: Vec<Airfield>,
    #[serde(default)]
    pub flights: Vec<FlightTrace>,
    pub metadata: ShareMetadata,
}

impl ShareableData {
    /// Build a payload, filling in counts and the creation timestamp
    pub fn new(airfields: Vec<Airfield>, flights: Vec<FlightTrace>, title: Option<String>) -> Self {
        let metadata = ShareMetadata {
            created_at: Utc::now(),
            airfield_count: airfields.len(),
            flight_count: flights.len(),
            title,
        };
        Self {
            version: SHAREABLE_DATA_VERSION,
            airfields,
            flights,
            metadata,
        }
    }

    /// Recompute the metadata counts after the collections were edited
    pub fn refresh_counts(&mut self) {
        self.metadata.airfield_count = self.airfields.len();
        self.metadata.flight_count = self.flights.len();
    }

    pub fn is_empty(&self) -> bool {
        self.airfields.is_empty() && self.flights.is_empty()
    }

    pub fn encrypt(&self, key: &ShareKey) -> Result<String, CryptoError> {
        crypto::encrypt(self, key)
    }

    pub fn decrypt(blob: &str, key: &ShareKey) -> Result<Self, CryptoError> {
        crypto::decrypt(blob, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShareableData {
        let airfields = vec![
            Airfield::new("lelystad", "Lelystad", 52.4603, 5.5272).with_icao("EHLE"),
            Airfield::new("texel", "Texel", 53.1153, 4.8336).with_icao("EHTX"),
        ];
        let flights = vec![FlightTrace {
            id: "f1".to_string(),
            name: "EHLE - EHTX".to_string(),
            date: None,
            points: vec![
                TrackPoint::new(52.4603, 5.5272),
                TrackPoint::new(53.1153, 4.8336),
            ],
            notes: None,
        }];
        ShareableData::new(airfields, flights, Some("Wadden trip".to_string()))
    }

    #[test]
    fn test_new_fills_metadata() {
        let data = sample();
        assert_eq!(data.version, SHAREABLE_DATA_VERSION);
        assert_eq!(data.metadata.airfield_count, 2);
        assert_eq!(data.metadata.flight_count, 1);
        assert_eq!(data.metadata.title.as_deref(), Some("Wadden trip"));
    }

    #[test]
    fn test_refresh_counts() {
        let mut data = sample();
        data.airfields.pop();
        data.flights.clear();
        data.refresh_counts();
        assert_eq!(data.metadata.airfield_count, 1);
        assert_eq!(data.metadata.flight_count, 0);
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value["metadata"]["createdAt"].is_string());
        assert_eq!(value["metadata"]["airfieldCount"], 2);
        assert_eq!(value["airfields"][0]["icaoCode"], "EHLE");
    }

    #[test]
    fn test_decode_tolerates_missing_collections() {
        let json = r#"{
            "version": 1,
            "metadata": {"createdAt": "2024-05-01T10:00:00Z", "airfieldCount": 0, "flightCount": 0},
            "extra": true
        }"#;
        let data: ShareableData = serde_json::from_str(json).unwrap();
        assert!(data.is_empty());
        assert!(data.metadata.title.is_none());
    }

    #[test]
    fn test_encrypt_decrypt_payload() {
        let key = ShareKey::generate();
        let data = sample();
        let blob = data.encrypt(&key).unwrap();
        assert_eq!(ShareableData::decrypt(&blob, &key).unwrap(), data);
        assert!(ShareableData::decrypt(&blob, &ShareKey::generate())
            .unwrap_err()
            .is_authentication());
    }

    /// xorshift64, so the sample is the same on every run
    fn coordinates(count: usize) -> Vec<(f64, f64)> {
        let mut state = 0x9e37_79b9_7f4a_7c15_u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as f64 / u64::MAX as f64
        };
        (0..count)
            .map(|_| (next() * 180.0 - 90.0, next() * 360.0 - 180.0))
            .collect()
    }

    #[test]
    fn test_full_precision_coordinates_survive_encryption() {
        let points = coordinates(5_000);
        let airfields = points
            .iter()
            .enumerate()
            .map(|(i, (lat, lon))| {
                let mut airfield = Airfield::new(format!("a{i}"), "Field", *lat, *lon);
                airfield.elevation = Some(lat.abs() * 97.3);
                airfield
            })
            .collect();
        let flights = vec![FlightTrace {
            id: "f1".to_string(),
            name: "long trace".to_string(),
            date: None,
            points: points
                .iter()
                .map(|(lat, lon)| TrackPoint {
                    alt: Some(lon.abs() * 31.7),
                    ..TrackPoint::new(*lat, *lon)
                })
                .collect(),
            notes: None,
        }];
        let data = ShareableData::new(airfields, flights, None);

        let key = ShareKey::generate();
        let opened = ShareableData::decrypt(&data.encrypt(&key).unwrap(), &key).unwrap();
        for (before, after) in data.airfields.iter().zip(&opened.airfields) {
            assert_eq!(before.latitude.to_bits(), after.latitude.to_bits());
            assert_eq!(before.longitude.to_bits(), after.longitude.to_bits());
        }
        assert_eq!(opened, data);
    }
}
