use std::collections::BTreeMap;

use crate::foundation::error::{BandtreeError, BandtreeResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Complete placement handed to the rendering collaborator.
///
/// This is the only structure a renderer needs; it carries no partitioner or allocator
/// internals.
pub struct Layout {
    /// Drawing surface large enough for every box.
    pub canvas: CanvasSize,
    /// Placed lineups keyed by version id (`<band_id>_<number>`).
    pub versions: BTreeMap<String, VersionBox>,
    /// Placed members, grouped by version in placement order.
    pub members: Vec<MemberNode>,
    /// Continuity and migration connectors.
    pub edges: Vec<Edge>,
    /// Non-fatal data-quality and placement diagnostics.
    #[serde(default)]
    pub warnings: Vec<CompileWarning>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas extents in pixels.
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One placed lineup.
pub struct VersionBox {
    /// Version id (`<band_id>_<number>`).
    pub id: String,
    /// Owning band id.
    pub band_id: String,
    /// Upper-cased band name used as the box title.
    pub band_name: String,
    /// `#<n> (<start> - <end>)`.
    pub sublabel: String,
    /// Lineup sequence number within the band, starting at 1.
    pub number: u32,
    /// Lineup start year.
    pub start_year: f64,
    /// Lineup end year.
    pub end_year: f64,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// y of the lineup header line members hang from.
    pub beam_y: f64,
}

impl VersionBox {
    /// Bounding rectangle without margin.
    pub fn rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One artist's appearance inside one placed lineup.
pub struct MemberNode {
    /// `<version_id>_<artist_id>`.
    pub id: String,
    /// External artist id.
    pub artist_id: String,
    /// Version this appearance belongs to.
    pub version_id: String,
    /// Band this appearance belongs to.
    pub band_id: String,
    /// Artist display name.
    pub name: String,
    /// Role during this tenure, when known.
    pub role: Option<String>,
    /// Stable column within the band.
    pub column: u32,
    /// x of the member's tick.
    pub x: f64,
    /// y of the member's name baseline.
    pub y: f64,
    /// y of the owning version's beam.
    pub beam_y: f64,
    /// Start of the tenure this appearance comes from.
    pub start_year: f64,
    /// End of the tenure this appearance comes from.
    pub end_year: f64,
    /// `true` when the member took over a column vacated in the previous lineup.
    pub is_replacement: bool,
    /// Name of the member who last held the column, for replacements.
    pub replaced_from: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Connector classification.
pub enum EdgeKind {
    /// Same artist, same band, consecutive appearances.
    Continuity,
    /// Same artist moving to a different band.
    Migration,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A connector between two consecutive appearances of one artist.
pub struct Edge {
    /// Connector classification.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Artist the connector follows.
    pub artist_id: String,
    /// Member node the connector leaves.
    pub from: String,
    /// Member node the connector reaches.
    pub to: String,
    /// Start x.
    pub x1: f64,
    /// Start y.
    pub y1: f64,
    /// End x.
    pub x2: f64,
    /// End y.
    pub y2: f64,
    /// Optional annotation (migration role summary).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Non-fatal diagnostic recorded while compiling.
pub enum CompileWarning {
    /// Collision search ran out of steps; the box was left at its last-tried position.
    PlacementOverflow {
        /// Version that could not be placed cleanly.
        version_id: String,
        /// Steps tried before giving up.
        steps: u32,
    },
    /// A repeated (artist, band, start year) membership was dropped.
    DuplicateMembership {
        /// Band the duplicate appeared in.
        band_id: String,
        /// Artist the duplicate refers to.
        artist_id: String,
        /// Declared start year shared by both records.
        start_year: Option<f64>,
    },
}

impl Layout {
    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> BandtreeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BandtreeError::serde(format!("serialize layout JSON: {e}")))
    }

    /// Members of one version, in column order.
    pub fn members_of<'a>(&'a self, version_id: &str) -> Vec<&'a MemberNode> {
        let mut out: Vec<&MemberNode> = self
            .members
            .iter()
            .filter(|m| m.version_id == version_id)
            .collect();
        out.sort_by_key(|m| m.column);
        out
    }

    /// `true` when a placement overflow was recorded for `version_id`.
    pub fn has_overflow_for(&self, version_id: &str) -> bool {
        self.warnings.iter().any(|w| {
            matches!(w, CompileWarning::PlacementOverflow { version_id: v, .. } if v == version_id)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/layout.rs"]
mod tests;
