use std::collections::BTreeMap;

use crate::foundation::core::{Rect, overlaps_with_margin};

/// Boxes placed so far during one placement pass.
///
/// The accumulator is created by [`place_boxes`] and handed back in its result; nothing outlives
/// a single compilation.
#[derive(Clone, Debug, Default)]
pub struct PlacedBoxes {
    boxes: Vec<(String, Rect)>,
}

impl PlacedBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.boxes.iter().map(|(id, r)| (id.as_str(), *r))
    }

    /// `true` when `rect` overlaps any placed box once both carry `margin`.
    pub fn collides(&self, rect: Rect, margin: f64) -> bool {
        self.boxes
            .iter()
            .any(|(_, r)| overlaps_with_margin(*r, rect, margin))
    }

    pub fn push(&mut self, id: impl Into<String>, rect: Rect) {
        self.boxes.push((id.into(), rect));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    /// Distance between candidates.
    pub step: f64,
    /// Hard ceiling on candidates tried after the preferred one.
    pub max_steps: u32,
    /// Margin added around every box for the overlap test.
    pub margin: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// A collision-free x was found after `steps` moves.
    Clear { x: f64, steps: u32 },
    /// The search budget ran out; `x` is the last candidate tried.
    Overflow { x: f64, steps: u32 },
}

impl Placement {
    pub fn x(self) -> f64 {
        match self {
            Self::Clear { x, .. } | Self::Overflow { x, .. } => x,
        }
    }

    pub fn steps(self) -> u32 {
        match self {
            Self::Clear { steps, .. } | Self::Overflow { steps, .. } => steps,
        }
    }

    pub fn is_overflow(self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

/// Offset of the `k`-th candidate: `0, +s, -s, +2s, -2s, ...`.
pub fn search_offset(k: u32, step: f64) -> f64 {
    let ring = f64::from(k.div_ceil(2));
    if k % 2 == 1 { ring * step } else { -ring * step }
}

/// Search outward from `preferred_x` for a position where a `width` x `height` box at `y`
/// clears every placed box.
pub fn find_clear_x(
    placed: &PlacedBoxes,
    preferred_x: f64,
    y: f64,
    width: f64,
    height: f64,
    params: SearchParams,
) -> Placement {
    let mut x = preferred_x;
    for k in 0..=params.max_steps {
        x = preferred_x + search_offset(k, params.step);
        let rect = Rect::new(x, y, x + width, y + height);
        if !placed.collides(rect, params.margin) {
            return Placement::Clear { x, steps: k };
        }
    }
    Placement::Overflow {
        x,
        steps: params.max_steps,
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One box waiting for an x position.
pub struct BoxRequest {
    /// Version id.
    pub id: String,
    /// Owning band; later boxes of the same band prefer the previous box's x.
    pub band_id: String,
    /// Fixed preferred x (lane mode). Overrides band continuation.
    pub anchor_x: Option<f64>,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBox {
    pub id: String,
    pub rect: Rect,
    pub placement: Placement,
}

#[derive(Clone, Debug, Default)]
/// Result of a placement pass: the final accumulator plus per-box outcomes in request order.
pub struct PlacementPass {
    pub placed: PlacedBoxes,
    pub boxes: Vec<PlacedBox>,
}

impl PlacementPass {
    /// Ids and step counts of boxes left overlapping.
    pub fn overflows(&self) -> impl Iterator<Item = (&str, u32)> {
        self.boxes
            .iter()
            .filter(|b| b.placement.is_overflow())
            .map(|b| (b.id.as_str(), b.placement.steps()))
    }
}

/// Place `requests` in order.
///
/// The preferred x of each box is its anchor if set, else the x of the same band's previously
/// placed box, else `center_x` minus half the box width. Exhausting the search never fails the
/// pass: the box keeps its last-tried position and the overflow is logged.
pub fn place_boxes(requests: &[BoxRequest], center_x: f64, params: SearchParams) -> PlacementPass {
    let mut placed = PlacedBoxes::new();
    let mut last_x_by_band = BTreeMap::<&str, f64>::new();
    let mut boxes = Vec::with_capacity(requests.len());

    for req in requests {
        let preferred_x = req
            .anchor_x
            .or_else(|| last_x_by_band.get(req.band_id.as_str()).copied())
            .unwrap_or(center_x - req.width / 2.0);

        let placement = find_clear_x(&placed, preferred_x, req.y, req.width, req.height, params);
        if let Placement::Overflow { x, steps } = placement {
            tracing::warn!(
                version = %req.id,
                steps,
                x,
                "collision search exhausted; keeping overlapping position"
            );
        }

        let x = placement.x();
        let rect = Rect::new(x, req.y, x + req.width, req.y + req.height);
        placed.push(req.id.clone(), rect);
        last_x_by_band.insert(req.band_id.as_str(), x);
        boxes.push(PlacedBox {
            id: req.id.clone(),
            rect,
            placement,
        });
    }

    PlacementPass { placed, boxes }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/collision.rs"]
mod tests;
