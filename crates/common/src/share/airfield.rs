use serde::{Deserialize, Serialize};

/// An airfield in the pilot's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airfield {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in feet above mean sea level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub visited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Airfield {
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icao_code: None,
            latitude,
            longitude,
            elevation: None,
            visited: false,
            notes: None,
        }
    }

    pub fn with_icao(mut self, code: impl Into<String>) -> Self {
        self.icao_code = Some(code.into().to_uppercase());
        self
    }
}
