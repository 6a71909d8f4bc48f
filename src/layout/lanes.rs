use std::collections::BTreeMap;

use crate::foundation::core::YearSpan;

#[derive(Clone, Debug, PartialEq)]
/// Horizontal footprint and active time range of one band.
pub struct BandExtent {
    pub band_id: String,
    pub name: String,
    pub span: YearSpan,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// A vertical column reserved for bands whose time ranges never intersect.
pub struct Lane {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    /// Band ids in placement order.
    pub occupants: Vec<String>,
    spans: Vec<YearSpan>,
}

impl Lane {
    fn accepts(&self, span: YearSpan) -> bool {
        self.spans.iter().all(|s| !s.intersects(span))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LanePacking {
    pub lanes: Vec<Lane>,
    lane_of: BTreeMap<String, usize>,
}

impl LanePacking {
    pub fn lane_for(&self, band_id: &str) -> Option<&Lane> {
        self.lane_of.get(band_id).and_then(|&i| self.lanes.get(i))
    }

    /// Total width from the first lane's left edge to the last lane's right edge.
    pub fn span_width(&self) -> f64 {
        match (self.lanes.first(), self.lanes.last()) {
            (Some(first), Some(last)) => last.x + last.width - first.x,
            _ => 0.0,
        }
    }
}

/// First-fit interval colouring.
///
/// Bands are visited by (start year, name, id) and each joins the first lane none of whose
/// occupants overlap it in time; a band that fits nowhere opens a new lane. Lanes are as wide as
/// their widest occupant and laid out left to right from `left`, `gap` apart.
pub fn pack_lanes(bands: &[BandExtent], left: f64, gap: f64) -> LanePacking {
    let mut order: Vec<&BandExtent> = bands.iter().collect();
    order.sort_by(|a, b| {
        a.span
            .start
            .total_cmp(&b.span.start)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.band_id.cmp(&b.band_id))
    });

    let mut lanes = Vec::<Lane>::new();
    let mut lane_of = BTreeMap::new();
    for band in order {
        let idx = match lanes.iter().position(|l| l.accepts(band.span)) {
            Some(idx) => idx,
            None => {
                lanes.push(Lane {
                    index: lanes.len(),
                    x: 0.0,
                    width: 0.0,
                    occupants: Vec::new(),
                    spans: Vec::new(),
                });
                lanes.len() - 1
            }
        };
        let lane = &mut lanes[idx];
        lane.width = lane.width.max(band.width);
        lane.occupants.push(band.band_id.clone());
        lane.spans.push(band.span);
        lane_of.insert(band.band_id.clone(), idx);
    }

    let mut x = left;
    for lane in &mut lanes {
        lane.x = x;
        x += lane.width + gap;
    }

    tracing::debug!(bands = bands.len(), lanes = lanes.len(), "packed bands into lanes");
    LanePacking { lanes, lane_of }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/lanes.rs"]
mod tests;
