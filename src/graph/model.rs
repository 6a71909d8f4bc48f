use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{BandtreeError, BandtreeResult};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// A membership graph as handed over by the harvesting/storage collaborator.
///
/// Bands are keyed by their external identifier. The map is ordered, so every pass over it
/// visits bands in the same order regardless of how the JSON was written.
pub struct Graph {
    /// Bands keyed by external identifier.
    #[serde(default)]
    pub bands: BTreeMap<String, BandDef>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// One band and its complete membership history.
pub struct BandDef {
    /// External identifier; may be omitted, in which case the map key is used.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared formation year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<f64>,
    /// Declared dissolution year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<f64>,
    /// Every tenure of every artist in this band, in collaborator order.
    #[serde(default)]
    pub all_members: Vec<MembershipDef>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// One continuous tenure of an artist in a band.
pub struct MembershipDef {
    /// External artist identifier.
    pub artist_id: String,
    /// Artist display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    /// Free-form role ("Vocals", "Bass, Keys", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Year the tenure began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<f64>,
    /// Year the tenure ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<f64>,
    /// Ordering hint within a lineup (lower first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Graph {
    /// Parse a graph from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BandtreeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BandtreeError::serde(format!("parse graph JSON: {e}")))
    }

    /// Parse a graph from a JSON string.
    pub fn from_json_str(s: &str) -> BandtreeResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| BandtreeError::serde(format!("parse graph JSON: {e}")))
    }

    /// Parse a graph from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BandtreeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BandtreeError::validation(format!("open graph JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// `true` when there is nothing to lay out.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Check structural invariants.
    ///
    /// Missing optional fields are fine. Empty identifiers, mismatched band ids and non-finite
    /// years are not, and the error names the offending band and artist.
    pub fn validate(&self) -> BandtreeResult<()> {
        for (key, band) in &self.bands {
            if key.trim().is_empty() {
                return Err(BandtreeError::validation("band key must be non-empty"));
            }
            if !band.id.is_empty() && band.id != *key {
                return Err(BandtreeError::validation(format!(
                    "band '{key}' declares mismatched id '{}'",
                    band.id
                )));
            }
            for (name, value) in [("start_year", band.start_year), ("end_year", band.end_year)] {
                if let Some(y) = value
                    && !y.is_finite()
                {
                    return Err(BandtreeError::validation(format!(
                        "band '{key}' {name} must be finite"
                    )));
                }
            }

            for (idx, m) in band.all_members.iter().enumerate() {
                if m.artist_id.trim().is_empty() {
                    return Err(BandtreeError::validation(format!(
                        "band '{key}' member #{idx} has an empty artist_id"
                    )));
                }
                for (name, value) in [("start_year", m.start_year), ("end_year", m.end_year)] {
                    if let Some(y) = value
                        && !y.is_finite()
                    {
                        return Err(BandtreeError::validation(format!(
                            "band '{key}' artist '{}' {name} must be finite",
                            m.artist_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
